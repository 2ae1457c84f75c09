use codex_hud_types::{RateWindow, Snapshot};

use super::{RenderContext, git_badge, round_percent};
use crate::presentation::formatters::{
    format_remaining, format_window, model_tier, project_name, shorten_model,
};
use crate::presentation::style::{Palette, bar};
use crate::presentation::width::fit_to_width;

/// Widths at which the status line switches layout
pub const GENEROUS_MIN_WIDTH: usize = 135;
pub const MEDIUM_MIN_WIDTH: usize = 105;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Generous,
    Medium,
    Minimal,
}

impl Layout {
    fn for_width(width: usize) -> Self {
        if width >= GENEROUS_MIN_WIDTH {
            Layout::Generous
        } else if width >= MEDIUM_MIN_WIDTH {
            Layout::Medium
        } else {
            Layout::Minimal
        }
    }
}

/// Rounded usage plus reset and window labels of one rate window
struct RateView {
    percent: i64,
    remaining: String,
    window: String,
}

impl RateView {
    fn of(rate: Option<&RateWindow>, ctx: &RenderContext) -> Option<Self> {
        rate.map(|rate| {
            let remaining = format_remaining(rate.resets_at, ctx.now);
            Self {
                percent: round_percent(rate.used_percent),
                remaining: if remaining.is_empty() { "--".to_string() } else { remaining },
                window: format_window(rate.window_minutes),
            }
        })
    }

    fn bar(&self, palette: &Palette, cells: usize) -> String {
        palette.percent(self.percent as f64, &bar(self.percent as f64, cells))
    }

    fn label(&self, palette: &Palette) -> String {
        palette.percent(self.percent as f64, &format!("{}%", self.percent))
    }
}

/// Single status-bar line, never wider than `ctx.width` visible columns
pub fn render_status_line(snapshot: &Snapshot, ctx: &RenderContext) -> String {
    let palette = &ctx.palette;

    let model = snapshot.model.as_deref().unwrap_or("unknown-model");
    let badge = palette.cyan(&format!("[{} | {}]", shorten_model(model), model_tier(model)));

    let project = project_name(snapshot.cwd.as_deref());
    let repo = match git_badge(snapshot) {
        Some(git) => format!("{} {}", project, git),
        None => project.clone(),
    };

    let primary = RateView::of(snapshot.rate_primary.as_ref(), ctx);
    let secondary = RateView::of(snapshot.rate_secondary.as_ref(), ctx);

    let segments: Vec<String> = match Layout::for_width(ctx.width) {
        Layout::Generous => {
            let u5 = match &primary {
                Some(p) => format!(
                    "{} {} {} ({} / {})",
                    palette.blue("Usage"),
                    p.bar(palette, 8),
                    p.label(palette),
                    palette.blue(&p.remaining),
                    palette.magenta(&p.window)
                ),
                None => "Usage --".to_string(),
            };
            let u7 = secondary.map(|s| {
                format!(
                    "{} {} ({} / {})",
                    s.bar(palette, 6),
                    s.label(palette),
                    palette.blue(&s.remaining),
                    palette.magenta(&s.window)
                )
            });
            [Some(badge), Some(palette.blue(&repo)), Some(u5), u7]
                .into_iter()
                .flatten()
                .collect()
        }
        Layout::Medium => {
            let u5 = match &primary {
                Some(p) => format!(
                    "U5 {} {} ({})",
                    p.bar(palette, 6),
                    p.label(palette),
                    palette.blue(&p.remaining)
                ),
                None => "U5 --".to_string(),
            };
            let u7 = secondary.map(|s| {
                format!(
                    "U7 {} {} ({})",
                    s.bar(palette, 5),
                    s.label(palette),
                    palette.blue(&s.remaining)
                )
            });
            [Some(badge), Some(palette.magenta(&repo)), Some(u5), u7]
                .into_iter()
                .flatten()
                .collect()
        }
        Layout::Minimal => {
            let u5 = match &primary {
                Some(p) => format!("U5 {}", p.label(palette)),
                None => "U5 --".to_string(),
            };
            let u7 = secondary.map(|s| format!("U7 {}", s.label(palette)));
            [Some(badge), Some(palette.blue(&project)), Some(u5), u7]
                .into_iter()
                .flatten()
                .collect()
        }
    };

    fit_to_width(&segments.join(" | "), ctx.width)
}
