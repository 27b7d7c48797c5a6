// src/specs/hero.rs
//
// Which hero did the player bring? The page only says so inside a loosely
// structured "Decklists" block near the results, so this is conservative on
// purpose: an "Unknown" is fine, naming the wrong hero is not.

use scraper::ElementRef;

use super::context::is_generic;
use super::metadata::FORMATS;
use super::rows;
use crate::config::consts::{HERO_MAX_DEPTH, UNKNOWN_HERO};
use crate::core::html::{element_child_count, is_inside, parent_element, same_node, tag, text_of};
use crate::core::sanitize::char_len;

pub const DECKLISTS_MARKER: &str = "Decklists";

/// Hero for the event owning `results`, or the `"Unknown"` sentinel.
pub fn find_hero(results: ElementRef<'_>) -> String {
    decklists_container(results)
        .and_then(|c| from_tables(c, results).or_else(|| from_leaf_scan(c, results)))
        .unwrap_or_else(|| s!(UNKNOWN_HERO))
}

/// Closest ancestor mentioning the marker. The climb gives up once it reaches
/// a block shared with another event, since a decklist found there may be
/// that event's.
fn decklists_container<'a>(results: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let mut current = results;
    for _ in 0..HERO_MAX_DEPTH {
        current = parent_element(current)?;
        if spans_other_events(current, results) {
            return None;
        }
        if current.text().any(|t| t.contains(DECKLISTS_MARKER)) {
            return Some(current);
        }
    }
    None
}

/// A second results table, or more than one event heading.
fn spans_other_events(container: ElementRef<'_>, results: ElementRef<'_>) -> bool {
    let other_results = container
        .select(sel!("table"))
        .filter(|t| !same_node(*t, results) && !is_inside(*t, results) && !is_inside(results, *t))
        .any(|t| rows::parse_table(t).is_some());
    if other_results {
        return true;
    }
    let event_headings = container
        .select(sel!("h1, h2, h3, h4, h5, h6"))
        .map(text_of)
        .filter(|t| char_len(t) > 2 && !is_generic(t.trim_end_matches(':')))
        .count();
    event_headings > 1
}

fn from_tables(container: ElementRef<'_>, results: ElementRef<'_>) -> Option<String> {
    container
        .select(sel!("table"))
        .filter(|t| !same_node(*t, results) && !is_inside(*t, results) && !is_inside(results, *t))
        .filter(|t| !stats_like_header(*t))
        .find_map(|t| {
            t.select(sel!("td, th")).find_map(|cell| {
                let text = cell
                    .select(sel!("a"))
                    .map(text_of)
                    .find(|s| !s.is_empty())
                    .unwrap_or_else(|| text_of(cell));
                is_valid_hero_name(&text).then_some(text)
            })
        })
}

/// Header rows of round, playoff or standings tables.
fn stats_like_header(table: ElementRef<'_>) -> bool {
    let Some(first_row) = table.select(sel!("tr")).next() else {
        return true;
    };
    let head = text_of(first_row);
    re!(r"(?i)\b(?:round|rnd|playoffs?|top\s*\d+|opponent|result|wins?|losses|record|points|rank|standings?)\b")
        .is_match(&head)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Seeking,
    AfterMarker,
    AfterFormat,
}

/// Marker, then a format name, then the next hero-shaped string.
fn from_leaf_scan(container: ElementRef<'_>, results: ElementRef<'_>) -> Option<String> {
    let mut state = Scan::Seeking;
    let leaves = container
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| element_child_count(*el) == 0)
        .filter(|el| !same_node(*el, results) && !is_inside(*el, results))
        .filter(|el| !matches!(tag(*el), "script" | "style"));

    for el in leaves {
        let text = text_of(el);
        if text.is_empty() {
            continue;
        }
        if text.contains(DECKLISTS_MARKER) {
            state = Scan::AfterMarker;
            continue;
        }
        match state {
            Scan::Seeking => {}
            Scan::AfterMarker if FORMATS.mentions(&text) => state = Scan::AfterFormat,
            Scan::AfterMarker => {}
            Scan::AfterFormat if FORMATS.is_bare_label(&text) => {}
            Scan::AfterFormat if is_valid_hero_name(&text) => return Some(text),
            Scan::AfterFormat => {}
        }
    }
    None
}

/// Hero-shaped: 3–80 chars and not a player name, format, number or score.
pub fn is_valid_hero_name(raw: &str) -> bool {
    let s = raw.trim();
    let len = char_len(s);
    if !(3..=80).contains(&len) {
        return false;
    }
    // "Last, First (12345)"
    if re!(r"^[^,]+,\s*[^,]+\(\s*\d+\s*\)$").is_match(s) {
        return false;
    }
    // "Last, First" and "Van Der Berg, Jan"; hero titles run longer after the comma
    if re!(r"^[\p{L}'.\-]+(?:\s+[\p{L}'.\-]+)*,\s*[\p{L}'.\-]+$").is_match(s) {
        return false;
    }
    if FORMATS.is_bare_label(s) {
        return false;
    }
    if re!(r"^\d+(?:\s*[-–:/]\s*\d+)*$").is_match(s) {
        return false;
    }
    !re!(r"(?i)^(?:hero|heroes|decklists?|view(?:\s+decklist)?|format|player|name|deck|list)$").is_match(s)
}
