//! Visible-width measurement and truncation over ANSI-styled text.

use regex::Regex;
use std::sync::LazyLock;

/// Full SGR reset
pub const RESET: &str = "\x1b[0m";

/// Columns assumed when nothing else says otherwise
pub const FALLBACK_WIDTH: usize = 120;

const ELLIPSIS: char = '…';

/// Padding added after a line that already fits
const TRAILING_PAD: usize = 2;

/// Below this width the ellipsis is not worth its column
const MIN_ELLIPSIS_WIDTH: usize = 6;

static ANSI_SGR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());

pub fn strip_ansi(text: &str) -> String {
    ANSI_SGR.replace_all(text, "").into_owned()
}

/// Characters a terminal would show, escape sequences excluded
pub fn visible_length(text: &str) -> usize {
    ANSI_SGR.replace_all(text, "").chars().count()
}

pub fn has_ansi(text: &str) -> bool {
    ANSI_SGR.is_match(text)
}

/// Keep at most `max_visible` visible characters.
///
/// Escape sequences are copied whole and never split. If the input carried any
/// styling, the result ends with [`RESET`].
pub fn truncate_to_visible(text: &str, max_visible: usize) -> String {
    if max_visible == 0 {
        return String::new();
    }
    if visible_length(text) <= max_visible {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut visible = 0;
    let mut rest = text;

    while visible < max_visible {
        if let Some(m) = ANSI_SGR.find(rest).filter(|m| m.start() == 0) {
            out.push_str(m.as_str());
            rest = &rest[m.end()..];
            continue;
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
        visible += 1;
    }

    if has_ansi(text) && !out.ends_with(RESET) {
        out.push_str(RESET);
    }
    out
}

/// Fit one line into exactly `width` columns or fewer.
///
/// A line that fits gets up to two trailing spaces without passing `width`.
/// A longer line is cut and marked with `…`, except on very narrow targets.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let visible = visible_length(text);
    if visible <= width {
        let pad = TRAILING_PAD.min(width - visible);
        return format!("{}{}", text, " ".repeat(pad));
    }

    if width < MIN_ELLIPSIS_WIDTH {
        return truncate_to_visible(text, width);
    }

    let mut out = truncate_to_visible(text, width - 1);
    out.push(ELLIPSIS);
    if has_ansi(text) {
        out.push_str(RESET);
    }
    out
}

/// Pick the status-line width.
///
/// Order: explicit flag, `CODEX_HUD_WIDTH`, `COLUMNS`, the terminal, then
/// [`FALLBACK_WIDTH`]. Unparseable or zero values are skipped.
pub fn resolve_width<F>(explicit: Option<usize>, env: F, terminal: Option<usize>) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let from_env = |key: &str| {
        env(key)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|w| *w > 0)
    };

    explicit
        .filter(|w| *w > 0)
        .or_else(|| from_env("CODEX_HUD_WIDTH"))
        .or_else(|| from_env("COLUMNS"))
        .or(terminal.filter(|w| *w > 0))
        .unwrap_or(FALLBACK_WIDTH)
}

/// Columns of the attached terminal, when stdout is one
pub fn terminal_columns() -> Option<usize> {
    use is_terminal::IsTerminal;

    if !std::io::stdout().is_terminal() {
        return None;
    }
    terminal_size::terminal_size().map(|(terminal_size::Width(w), _)| w as usize)
}
