use crate::parser::error::ParseError;

/// Pre-scan the raw source for a fenced code block that is opened but never
/// closed. pulldown-cmark silently closes such a fence at end of input, so
/// the event walk cannot see the problem; a line scan can.
pub fn check_fences(source: &str, file_id: usize) -> Result<(), Vec<ParseError>> {
    let mut open: Option<OpenFence> = None;
    let mut offset = 0usize;

    for (line_no, raw) in source.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(marker) = fence_marker(line) {
            match open.take() {
                None => {
                    open = Some(OpenFence {
                        ch: marker.ch,
                        count: marker.count,
                        line: line_no + 1,
                        span: offset..offset + line.len(),
                    });
                }
                Some(fence) => {
                    // A closing fence uses the same character, at least as
                    // many markers, and carries no info string.
                    let closes =
                        marker.ch == fence.ch && marker.count >= fence.count && marker.closes;
                    if !closes {
                        open = Some(fence);
                    }
                }
            }
        }
        offset += raw.len() + 1;
    }

    match open {
        Some(fence) => Err(vec![
            ParseError::error(
                format!("code fence opened on line {} is never closed", fence.line),
                fence.span,
                fence.line,
                file_id,
            )
            .with_note("every ``` fence must have a matching closing fence".to_string()),
        ]),
        None => Ok(()),
    }
}

struct OpenFence {
    ch: char,
    count: usize,
    line: usize,
    span: std::ops::Range<usize>,
}

struct FenceMarker {
    ch: char,
    count: usize,
    /// True when nothing but whitespace follows the markers, so the line
    /// is eligible to close an open fence.
    closes: bool,
}

/// Recognize a fence line: up to three leading spaces, then three or more
/// backticks or tildes.
fn fence_marker(line: &str) -> Option<FenceMarker> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let ch = trimmed.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let count = trimmed.chars().take_while(|&c| c == ch).count();
    if count < 3 {
        return None;
    }
    let rest = &trimmed[count..];
    Some(FenceMarker {
        ch,
        count,
        closes: rest.trim().is_empty(),
    })
}
