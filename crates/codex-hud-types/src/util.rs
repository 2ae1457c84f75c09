/// Truncate to at most `max` characters, ending in "..." when shortened.
///
/// The ellipsis counts toward `max`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let kept: String = s.chars().take(max - 3).collect();
    format!("{}...", kept)
}
