//! Color capability and the handful of styles the HUD uses.

use owo_colors::{OwoColorize, Style};

/// Percent at or above which usage is shown as critical
pub const HIGH_THRESHOLD: f64 = 85.0;
/// Percent at or above which usage is shown as a warning
pub const MEDIUM_THRESHOLD: f64 = 50.0;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Decide whether to emit color escapes from the given environment.
///
/// `FORCE_COLOR` wins, then `NO_COLOR`, then `CLICOLOR=0`, then
/// `CLICOLOR_FORCE`; otherwise color is on.
pub fn detect_color<F>(env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(force) = env("FORCE_COLOR") {
        return !is_off(&force);
    }
    if env("NO_COLOR").is_some() {
        return false;
    }
    if env("CLICOLOR").as_deref() == Some("0") {
        return false;
    }
    if let Some(force) = env("CLICOLOR_FORCE") {
        return !is_off(&force);
    }
    true
}

fn is_off(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    value == "0" || value == "false"
}

/// Lookup against the real process environment
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Dim,
    Cyan,
    Blue,
    Magenta,
    Green,
    Yellow,
    Red,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Dim => Style::new().dimmed(),
            Tone::Cyan => Style::new().cyan(),
            Tone::Blue => Style::new().blue(),
            Tone::Magenta => Style::new().magenta(),
            Tone::Green => Style::new().green(),
            Tone::Yellow => Style::new().yellow(),
            Tone::Red => Style::new().red(),
        }
    }
}

/// Severity of a usage percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentBucket {
    Low,
    Medium,
    High,
}

impl PercentBucket {
    pub fn of(percent: f64) -> Self {
        if percent >= HIGH_THRESHOLD {
            PercentBucket::High
        } else if percent >= MEDIUM_THRESHOLD {
            PercentBucket::Medium
        } else {
            PercentBucket::Low
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            PercentBucket::Low => Tone::Green,
            PercentBucket::Medium => Tone::Yellow,
            PercentBucket::High => Tone::Red,
        }
    }
}

/// Styling switch, resolved once per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn from_env<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(detect_color(env))
    }

    /// Wrap `text` in `tone`, closed by a full reset. No-op when disabled.
    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if self.enabled {
            text.style(tone.style()).to_string()
        } else {
            text.to_string()
        }
    }

    /// Color `text` by the severity of `percent`
    pub fn percent(&self, percent: f64, text: &str) -> String {
        self.paint(PercentBucket::of(percent).tone(), text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(Tone::Dim, text)
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(Tone::Cyan, text)
    }

    pub fn blue(&self, text: &str) -> String {
        self.paint(Tone::Blue, text)
    }

    pub fn magenta(&self, text: &str) -> String {
        self.paint(Tone::Magenta, text)
    }
}

/// `size` cells of filled/empty blocks proportional to `percent`
pub fn bar(percent: f64, size: usize) -> String {
    let ratio = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) / 100.0 };
    let filled = ((ratio * size as f64).round() as usize).min(size);

    let mut out = String::with_capacity(size * FILLED.len_utf8());
    out.extend(std::iter::repeat_n(FILLED, filled));
    out.extend(std::iter::repeat_n(EMPTY, size - filled));
    out
}
