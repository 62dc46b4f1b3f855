//! Cleanup applied to every scraped string before matching.

/// Hint value the scraper emits when it could not infer anything.
pub const UNKNOWN_HINT: &str = "unknown";

/// Trims, lowercases and strips invisible characters from `raw`.
///
/// Zero-width and bidi-control characters are dropped outright; any other
/// whitespace or control character becomes a single space, and runs of
/// spaces collapse to one.
pub fn normalize(raw: &str) -> String {
    let visible: String = raw
        .chars()
        .filter(|c| !is_invisible(*c))
        .map(|c| if c.is_whitespace() || c.is_control() { ' ' } else { c })
        .collect();

    visible
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalizes a material hint. Absent, empty and `"unknown"` hints all
/// come back as `None`.
pub fn normalize_hint(raw: Option<&str>) -> Option<String> {
    let hint = normalize(raw.unwrap_or_default());
    if hint.is_empty() || hint == UNKNOWN_HINT {
        None
    } else {
        Some(hint)
    }
}

fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{061C}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{2069}'
            | '\u{FEFF}'
    )
}
