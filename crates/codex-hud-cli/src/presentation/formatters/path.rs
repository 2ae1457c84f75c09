fn segments(cwd: &str) -> Vec<&str> {
    cwd.split(['/', '\\']).filter(|s| !s.is_empty()).collect()
}

/// Last two segments of `cwd`, or `(no-cwd)`
pub fn project_tail(cwd: Option<&str>) -> String {
    let parts = cwd.map(segments).unwrap_or_default();
    if parts.is_empty() {
        return "(no-cwd)".to_string();
    }
    parts[parts.len().saturating_sub(2)..].join("/")
}

/// Last segment of `cwd`, or `project`
pub fn project_name(cwd: Option<&str>) -> String {
    cwd.map(segments)
        .and_then(|parts| parts.last().map(|s| s.to_string()))
        .unwrap_or_else(|| "project".to_string())
}
