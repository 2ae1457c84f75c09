use crate::Result;
use std::path::Path;

use super::schema::RolloutRecord;

/// Read the whole rollout file.
///
/// Invalid UTF-8 is replaced rather than rejected, so a bad byte sequence only
/// spoils its own line.
pub fn read_rollout(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(path = %path.display(), "rollout contains invalid UTF-8");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    })
}

/// Parse rollout text into records, skipping blank and malformed lines
pub fn parse_rollout_lines<'a, I, S>(lines: I) -> impl Iterator<Item = RolloutRecord> + 'a
where
    I: IntoIterator<Item = S> + 'a,
    S: AsRef<str> + 'a,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.as_ref().trim();
            if line.is_empty() {
                return None;
            }
            match RolloutRecord::parse(line) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::debug!(line = index + 1, error = %err, "skipping malformed rollout line");
                    None
                }
            }
        })
}
