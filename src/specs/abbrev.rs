// src/specs/abbrev.rs
use std::sync::LazyLock;

use regex::Regex;

/// Tournament short codes and their canonical names.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("RTN", "Road to Nationals"),
    ("PQ", "ProQuest"),
    ("BH", "Battle Hardened"),
];

/// Expand short codes in an event heading.
///
/// A heading that *is* a code (any case) maps straight to the canonical name;
/// otherwise every code appearing as a whole word is substituted in place.
/// Names without a known code come back unchanged.
pub fn expand_event_name(name: &str) -> String {
    let trimmed = name.trim();
    if let Some((_, full)) = ABBREVIATIONS.iter().find(|(code, _)| code.eq_ignore_ascii_case(trimmed)) {
        return s!(*full);
    }

    let mut out = s!(trimmed);
    for (pat, full) in CODE_PATTERNS.iter() {
        if pat.is_match(&out) {
            out = pat.replace_all(&out, *full).into_owned();
        }
    }
    out
}

static CODE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ABBREVIATIONS
        .iter()
        .map(|(code, full)| {
            let pat = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(code))).unwrap();
            (pat, *full)
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_string_codes() {
        assert_eq!(expand_event_name("RtN"), "Road to Nationals");
        assert_eq!(expand_event_name(" pq "), "ProQuest");
    }

    #[test]
    fn word_boundary_codes() {
        assert_eq!(expand_event_name("DapperGames RTN"), "DapperGames Road to Nationals");
        assert_eq!(expand_event_name("PQ Las Vegas"), "ProQuest Las Vegas");
        assert_eq!(expand_event_name("Card Shop BH - Classic Constructed"), "Card Shop Battle Hardened - Classic Constructed");
    }

    #[test]
    fn codes_inside_words_are_left_alone() {
        assert_eq!(expand_event_name("Armory at PQuarters"), "Armory at PQuarters");
        assert_eq!(expand_event_name("Weekly Armory"), "Weekly Armory");
    }
}
