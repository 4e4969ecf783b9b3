use crate::error::Result;

/// Splits UTF-8 text into one block per line.
///
/// Every `\n` starts a new block, so a trailing newline yields a trailing
/// empty block. A `\r` left over from CRLF line endings is stripped.
pub fn extract_lines(bytes: &[u8], keep_blank_lines: bool) -> Result<Vec<String>> {
    let text = String::from_utf8(bytes.to_vec())?;

    let lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| keep_blank_lines || !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    Ok(lines)
}
