use codex_hud_types::{HudConfig, Snapshot, ToolActivity, ToolStatus, TurnState};

use super::{RenderContext, git_badge, round_percent};
use crate::presentation::formatters::{format_remaining, format_tokens, project_tail};
use crate::presentation::style::{Palette, Tone, bar};

const CONTEXT_BAR_CELLS: usize = 10;

/// Full HUD: header, usage, tools, plan, session path. Optional lines with
/// nothing to show are left out.
pub fn render_multi_line(snapshot: &Snapshot, config: &HudConfig, ctx: &RenderContext) -> Vec<String> {
    let palette = &ctx.palette;
    let mut lines = vec![header_line(snapshot, palette)];

    lines.extend(usage_line(snapshot, config, ctx));
    lines.extend(tools_line(snapshot, config.max_tools, palette));
    if config.show_plan {
        lines.extend(plan_line(snapshot, palette));
    }

    lines.push(palette.dim(&snapshot.session_path.display().to_string()));
    lines
}

fn header_line(snapshot: &Snapshot, palette: &Palette) -> String {
    let model = snapshot.model.as_deref().unwrap_or("unknown-model");
    let project = project_tail(snapshot.cwd.as_deref());
    let git = git_badge(snapshot)
        .map(|badge| format!(" {}", badge))
        .unwrap_or_default();
    let turn = match snapshot.turn_state {
        TurnState::Running => palette.paint(Tone::Yellow, "running"),
        TurnState::Idle => palette.dim("idle"),
    };

    format!(
        "{} {} │ {}{} │ turn {}",
        palette.cyan("[Codex HUD]"),
        model,
        project,
        git,
        turn
    )
}

fn usage_line(snapshot: &Snapshot, config: &HudConfig, ctx: &RenderContext) -> Option<String> {
    let palette = &ctx.palette;
    let mut parts = Vec::new();

    if let Some(used) = snapshot.context_used_percent {
        let used = f64::from(used);
        let mut segment = format!(
            "Context {} {}",
            bar(used, CONTEXT_BAR_CELLS),
            palette.percent(used, &format!("{}%", used))
        );
        if let Some(tokens) = snapshot.context_tokens {
            let window = snapshot.context_window.unwrap_or(0.0);
            segment.push_str(&format!(" ({}/{})", format_tokens(tokens), format_tokens(window)));
        }
        parts.push(segment);
    }

    if config.show_rates
        && let Some(primary) = &snapshot.rate_primary
    {
        let p = round_percent(primary.used_percent);
        let mut segment = format!("Usage {}", palette.percent(p as f64, &format!("{}%", p)));

        let remaining = format_remaining(primary.resets_at, ctx.now);
        if !remaining.is_empty() {
            segment.push_str(&format!("/{}", remaining));
        }
        if let Some(secondary) = &snapshot.rate_secondary {
            let s = round_percent(secondary.used_percent);
            segment.push_str(&format!(" | {}", palette.percent(s as f64, &format!("{}%", s))));
        }
        parts.push(segment);
    }

    (!parts.is_empty()).then(|| parts.join(" │ "))
}

fn tools_line(snapshot: &Snapshot, max_tools: usize, palette: &Palette) -> Option<String> {
    let tools: Vec<&ToolActivity> = snapshot
        .active_tools
        .iter()
        .chain(&snapshot.recent_tools)
        .collect();
    let skip = tools.len().saturating_sub(max_tools);

    let items: Vec<String> = tools[skip..]
        .iter()
        .map(|tool| format!("{} {}", tool_glyph(tool.status, palette), tool.label))
        .collect();

    (!items.is_empty()).then(|| format!("Tools {}", items.join(" | ")))
}

fn tool_glyph(status: ToolStatus, palette: &Palette) -> String {
    match status {
        ToolStatus::Running => palette.paint(Tone::Yellow, "◐"),
        ToolStatus::Completed => palette.paint(Tone::Green, "✓"),
        ToolStatus::Failed => palette.paint(Tone::Red, "✗"),
    }
}

fn plan_line(snapshot: &Snapshot, palette: &Palette) -> Option<String> {
    let plan = &snapshot.plan;
    let first = plan.first()?;

    let completed = plan.iter().filter(|item| item.is_completed()).count();
    let title = plan
        .iter()
        .find(|item| item.is_in_progress())
        .unwrap_or(first)
        .step
        .as_str();

    let mut line = format!("{} {}/{}", palette.cyan("Plan"), completed, plan.len());
    if !title.is_empty() {
        line.push_str(&format!(" • {}", title));
    }
    Some(line)
}
