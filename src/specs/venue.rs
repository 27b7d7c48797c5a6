// src/specs/venue.rs
//
// Venue lookup, strongest signal first:
//   1. an element whose attributes say venue/location/store
//   2. an element flagged "(closed)" / "(temporarily closed)"
//   3. a short leaf text that looks like a shop name (keyword or chain)
//   4. the "Venue - Type Format" shape of the event name itself
// Tiers 3 and 4 are plain-text guesses and only run when 1 and 2 come up empty.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use super::context::EventContext;
use super::metadata::{parse_date, EVENT_TYPES, FORMATS};
use crate::core::html::{child_elements, element_child_count, tag, text_of};
use crate::core::sanitize::{char_len, has_closed_marker, same_text, strip_closed_marker};

/// Attribute fragments that mark an element as carrying the venue.
pub const VENUE_ATTR_KEYS: &[&str] = &["venue", "location", "store", "shop"];

/// Words that make a short line read like a shop. Tunable; will over- and
/// under-match on names it has never seen.
pub const VENUE_KEYWORDS: &[&str] = &[
    "games", "gaming", "game", "cards", "card", "comics", "comic", "hobbies", "hobby",
    "collectibles", "tcg", "ccg", "store", "shop", "cafe", "café", "lounge", "tavern",
    "guild", "emporium", "arena", "hall", "library", "pub", "center", "centre", "club",
    "dojo", "den", "lair", "vault", "citadel", "castle", "realm", "outpost", "boardgames",
];

/// Chains whose names carry none of the keywords above.
pub const CHAIN_STORES: &[&str] = &[
    "card kingdom",
    "face to face",
    "mox boarding house",
    "cool stuff inc",
    "hobbytown",
    "games workshop",
    "good games",
    "untapped",
    "guf",
];

static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alts: Vec<String> = VENUE_KEYWORDS.iter().map(|k| regex::escape(k)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", alts.join("|"))).unwrap()
});

pub fn find_venue(ctx: &EventContext<'_>, event_name: &str) -> Option<String> {
    let scoped = ctx.scoped_elements();
    let title = ctx.title();
    by_attribute(&scoped)
        .or_else(|| by_closed_marker(&scoped))
        .or_else(|| by_leaf_text(&scoped, ctx.heading, &[event_name, title.as_str()]))
        .or_else(|| from_event_name(event_name))
}

fn by_attribute(scoped: &[ElementRef<'_>]) -> Option<String> {
    scoped.iter().copied().filter(|el| has_venue_attr(*el)).find_map(|el| {
        let text = strip_closed_marker(&text_of(el));
        let len = char_len(&text);
        (len > 1 && len <= 100).then_some(text)
    })
}

fn has_venue_attr(el: ElementRef<'_>) -> bool {
    el.value().attrs().any(|(name, value)| {
        let name = name.to_ascii_lowercase();
        let value = value.to_ascii_lowercase();
        let watched = matches!(name.as_str(), "class" | "id" | "itemprop" | "itemtype")
            || name.starts_with("data-");
        let in_href = name == "href" && ["/store", "/venue", "/location"].iter().any(|p| value.contains(p));
        in_href
            || VENUE_ATTR_KEYS.iter().any(|k| {
                name.starts_with("data-") && name.contains(k) || watched && value.contains(k)
            })
    })
}

fn by_closed_marker(scoped: &[ElementRef<'_>]) -> Option<String> {
    let marked = |el: ElementRef<'_>| has_closed_marker(&text_of(el));
    scoped
        .iter()
        .copied()
        .find(|el| marked(*el) && !child_elements(*el).any(marked))
        .map(|el| strip_closed_marker(&text_of(el)))
        .filter(|t| !t.is_empty())
}

fn by_leaf_text(scoped: &[ElementRef<'_>], heading: ElementRef<'_>, names: &[&str]) -> Option<String> {
    scoped
        .iter()
        .copied()
        .filter(|el| element_child_count(*el) <= 1)
        .filter(|el| !in_table(*el) && el.id() != heading.id())
        .map(text_of)
        .find(|text| passes_exclusions(text, names) && looks_like_venue(text))
}

fn in_table(el: ElementRef<'_>) -> bool {
    matches!(tag(el), "table" | "tr" | "td" | "th")
        || el.ancestors().filter_map(ElementRef::wrap).any(|a| tag(a) == "table")
}

fn passes_exclusions(text: &str, names: &[&str]) -> bool {
    let len = char_len(text);
    if len <= 5 || len >= 100 {
        return false;
    }
    if parse_date(text).is_some() || FORMATS.is_bare_label(text) || EVENT_TYPES.is_bare_label(text) {
        return false;
    }
    if re!(r"(?i)^(?:round|rnd|top\s*\d|playoffs?|win|loss|draw|bye|record|[wld])\b|^\d+(?:\s*[-:/]\s*\d+)*$")
        .is_match(text)
    {
        return false;
    }
    if re!(r"(?i)^(?:not\s+)?rated$|^unrated$|decklists?").is_match(text) {
        return false;
    }
    let lc = text.to_lowercase();
    !names
        .iter()
        .filter(|n| !n.is_empty())
        .any(|n| same_text(text, n) || n.to_lowercase().contains(&lc))
}

fn looks_like_venue(text: &str) -> bool {
    let lc = text.to_lowercase();
    KEYWORD_RE.is_match(text) || CHAIN_STORES.iter().any(|c| lc.contains(c))
}

/// "Card Dojo - Armory Blitz" → "Card Dojo" when the tail is known vocabulary.
pub fn from_event_name(name: &str) -> Option<String> {
    let (head, tail) = [" - ", " – ", " — "].iter().find_map(|sep| name.split_once(sep))?;
    let head = head.trim();
    if char_len(head) <= 2 {
        return None;
    }
    (EVENT_TYPES.mentions(tail) || FORMATS.mentions(tail)).then(|| s!(head))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::context::locate;
    use scraper::Html;

    fn venue_of(html: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        let table = doc.select(sel!("table")).next().unwrap();
        let ctx = locate(table).unwrap();
        let name = super::super::abbrev::expand_event_name(&ctx.title());
        find_venue(&ctx, &name)
    }

    #[test]
    fn tier1_attribute_wins_over_text() {
        let v = venue_of(
            "<div><h4>Weekly Armory</h4>\
             <p>Game Haven (closed)</p>\
             <div class=\"event__venue\"><a href=\"/stores/12\">Card Dojo</a></div>\
             <table></table></div>",
        );
        assert_eq!(v.as_deref(), Some("Card Dojo"));
    }

    #[test]
    fn tier2_closed_marker_is_stripped() {
        let v = venue_of(
            "<div><h4>Weekly Armory</h4><p>Blitz</p>\
             <div><span>Game Haven (Temporarily Closed)</span></div><table></table></div>",
        );
        assert_eq!(v.as_deref(), Some("Game Haven"));
    }

    #[test]
    fn tier3_leaf_with_keyword() {
        let v = venue_of(
            "<div><h4>Skirmish Season 9</h4><p>March 3, 2024</p><p>Classic Constructed</p>\
             <p>Round 1</p><p>Dragonfly Games</p><table><tr><td>Win</td></tr></table></div>",
        );
        assert_eq!(v.as_deref(), Some("Dragonfly Games"));
    }

    #[test]
    fn tier3_skips_event_name_and_tokens() {
        let v = venue_of(
            "<div><h4>Card Club Armory</h4><p>Card Club Armory</p><p>Not Rated</p>\
             <table></table></div>",
        );
        assert_eq!(v, None);
    }

    #[test]
    fn tier4_from_dashed_name() {
        assert_eq!(from_event_name("The Mana Pool - Armory Blitz").as_deref(), Some("The Mana Pool"));
        assert_eq!(from_event_name("Summer Bash - Team Party"), None);
        assert_eq!(from_event_name("No dash here"), None);
    }
}
