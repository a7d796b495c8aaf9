use std::error::Error;

/// Parses 1-based line numbers and inclusive ranges: `"3,5-7"` gives
/// `[3, 5, 6, 7]`.
pub(crate) fn parse_highlight_lines(input: &str) -> Result<Vec<usize>, Box<dyn Error>> {
    let mut lines = Vec::new();
    for part in input.split([',', ' ']).filter(|s| !s.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start: usize = start.trim().parse()?;
                let end: usize = end.trim().parse()?;
                if start == 0 || end < start {
                    return Err(format!("invalid line range: {part}").into());
                }
                lines.extend(start..=end);
            }
            None => {
                let line: usize = part.parse()?;
                if line == 0 {
                    return Err("line numbers start at 1".into());
                }
                lines.push(line);
            }
        }
    }
    Ok(lines)
}

pub(crate) fn parse_font_dirs(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Milliseconds from a bare number or a humantime duration (`500ms`, `10s`).
pub(crate) fn parse_timeout_ms(input: &str) -> Result<u64, Box<dyn Error>> {
    let trimmed = input.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Ok(trimmed.parse()?);
    }
    let millis = humantime::parse_duration(trimmed)?.as_millis();
    u64::try_from(millis).map_err(|_| "timeout too large".into())
}
