// JSON validity check with a bounded context window around the failure

use serde::de::IgnoredAny;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonCheck {
    Valid { chars: usize },
    Invalid(JsonDiagnostic),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonDiagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// Character (not byte) offset of the error in the document.
    pub offset: usize,
    pub context_start: usize,
    pub context_end: usize,
    pub context: String,
}

/// Parse `document` as a single JSON value.
///
/// On failure the diagnostic carries up to `radius` characters on each side
/// of the error offset.
pub fn check_json(document: &str, radius: usize) -> JsonCheck {
    match serde_json::from_str::<IgnoredAny>(document) {
        Ok(_) => JsonCheck::Valid {
            chars: document.chars().count(),
        },
        Err(e) => {
            let offset = char_offset(document, e.line(), e.column());
            let (context_start, context_end, context) = context_window(document, offset, radius);
            JsonCheck::Invalid(JsonDiagnostic {
                message: e.to_string(),
                line: e.line(),
                column: e.column(),
                offset,
                context_start,
                context_end,
                context: context.to_string(),
            })
        }
    }
}

/// Map serde_json's 1-based line and byte column to a char offset.
fn char_offset(document: &str, line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        document
            .match_indices('\n')
            .nth(line - 2)
            .map(|(i, _)| i + 1)
            .unwrap_or(document.len())
    };

    let mut byte = (line_start + column.saturating_sub(1)).min(document.len());
    while !document.is_char_boundary(byte) {
        byte -= 1;
    }

    document[..byte].chars().count()
}

/// Char range `[offset - radius, offset + radius)` clamped to the document.
pub fn context_window(document: &str, offset: usize, radius: usize) -> (usize, usize, &str) {
    let total = document.chars().count();
    let start = offset.saturating_sub(radius).min(total);
    let end = offset.saturating_add(radius).min(total);

    let byte_at = |char_idx: usize| {
        document
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(document.len())
    };

    (start, end, &document[byte_at(start)..byte_at(end)])
}
