// src/core/sanitize.rs

/// Collapse every whitespace run (including NBSP) to one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Length in characters, not bytes; the bounds in the specs are visual.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Case-insensitive equality after whitespace normalization.
pub fn same_text(a: &str, b: &str) -> bool {
    normalize_ws(a).to_lowercase() == normalize_ws(b).to_lowercase()
}

/// Drop a "(closed)" / "(temporarily closed)" marker wherever it sits.
pub fn strip_closed_marker(s: &str) -> String {
    let cut = re!(r"(?i)\s*\(\s*(?:temporarily\s+|permanently\s+)?closed\s*\)").replace_all(s, " ");
    normalize_ws(&cut)
}

pub fn has_closed_marker(s: &str) -> bool {
    re!(r"(?i)\(\s*(?:temporarily\s+|permanently\s+)?closed\s*\)").is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_collapses_nbsp_and_newlines() {
        assert_eq!(normalize_ws("  Road\u{a0}to\n\t Nationals "), "Road to Nationals");
    }

    #[test]
    fn closed_marker_is_stripped() {
        assert!(has_closed_marker("Game Haven (Temporarily Closed)"));
        assert_eq!(strip_closed_marker("Game Haven (Temporarily Closed)"), "Game Haven");
        assert_eq!(strip_closed_marker("Dragon's Lair (closed) Austin"), "Dragon's Lair Austin");
        assert!(!has_closed_marker("Closed Circuit Games"));
    }
}
