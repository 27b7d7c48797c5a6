// src/specs/context.rs
//
// Ties a results table to the heading of the event it belongs to.
//
// The site nests each event as loose blocks with no stable ids, so we walk up
// from the table and look at *preceding siblings* at each level. The first
// acceptable heading wins, and together with the table's ancestor at that same
// level it bounds a sibling range. Everything downstream reads only from that
// range (plus a short lead-in before the heading), which is what keeps one
// event's date or venue from bleeding into the next event's matches.

use scraper::ElementRef;

use crate::config::consts::{CONTEXT_MAX_DEPTH, PRE_HEADING_WINDOW};
use crate::core::html::{
    class_and_id, contains_tag, first_heading, is_heading_tag, next_elements, parent_element,
    prev_elements, same_node, text_of,
};
use crate::core::sanitize::char_len;

/// Section labels that never name an event.
pub const GENERIC_HEADINGS: &[&str] = &[
    "results",
    "matches",
    "history",
    "match history",
    "player history",
    "event history",
    "tournament history",
    "events",
    "decklists",
    "decklist",
    "standings",
    "rounds",
    "swiss rounds",
    "playoffs",
    "overview",
];

#[derive(Clone, Copy, Debug)]
pub struct EventContext<'a> {
    /// Heading-like sibling naming the event.
    pub heading: ElementRef<'a>,
    /// The table itself, or its ancestor that is a sibling of `heading`.
    pub table_ancestor: ElementRef<'a>,
}

/// Find the event heading for `table`, or `None` within the depth bound.
pub fn locate<'a>(table: ElementRef<'a>) -> Option<EventContext<'a>> {
    let mut current = table;
    for _ in 0..CONTEXT_MAX_DEPTH {
        if let Some(heading) = prev_elements(current).find(|sib| heading_title(*sib).is_some()) {
            return Some(EventContext { heading, table_ancestor: current });
        }
        current = parent_element(current)?;
    }
    None
}

impl<'a> EventContext<'a> {
    /// Event title as written on the page (before abbreviation expansion).
    pub fn title(&self) -> String {
        heading_title(self.heading).unwrap_or_default()
    }

    /// `heading` through `table_ancestor`, document order, both ends included.
    pub fn range(&self) -> Vec<ElementRef<'a>> {
        let mut out = vec![self.heading];
        if same_node(self.heading, self.table_ancestor) {
            return out;
        }
        for el in next_elements(self.heading) {
            out.push(el);
            if same_node(el, self.table_ancestor) {
                break;
            }
        }
        out
    }

    /// Up to a few elements right before the heading, document order. Stops at
    /// anything carrying a table or another heading; dates often sit here.
    pub fn lead_in(&self) -> Vec<ElementRef<'a>> {
        let mut out: Vec<ElementRef<'a>> = prev_elements(self.heading)
            .take(PRE_HEADING_WINDOW)
            .take_while(|el| !contains_tag(*el, "table") && !is_heading_like(*el))
            .collect();
        out.reverse();
        out
    }

    /// Lead-in plus range, as one newline-separated block of text.
    pub fn scoped_text(&self) -> String {
        self.lead_in()
            .into_iter()
            .chain(self.range())
            .map(text_of)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Every element in scope, descendants included, document order.
    pub fn scoped_elements(&self) -> Vec<ElementRef<'a>> {
        let mut out = Vec::new();
        for top in self.lead_in().into_iter().chain(self.range()) {
            out.push(top);
            out.extend(crate::core::html::descendant_elements(top));
        }
        out
    }
}

/// Accepted event title of a sibling, if it is heading-like.
fn heading_title(el: ElementRef<'_>) -> Option<String> {
    if !is_heading_like(el) {
        return None;
    }
    let text = match first_heading(el) {
        Some(h) => text_of(h),
        None => text_of(el),
    };
    let text = text.trim_end_matches(':').trim().to_string();
    let len = char_len(&text);
    if len <= 2 || len >= 250 || is_generic(&text) {
        return None;
    }
    Some(text)
}

/// `h1`..`h6`, a wrapper holding one, or a title-ish block. Blocks holding a
/// table are another event's body, never a heading.
fn is_heading_like(el: ElementRef<'_>) -> bool {
    if contains_tag(el, "table") {
        return false;
    }
    if is_heading_tag(el) || first_heading(el).is_some() {
        return true;
    }
    let attrs = class_and_id(el);
    ["title", "heading", "event-name"].iter().any(|k| attrs.contains(k))
}

/// Section labels like "Results" or "Decklists" that never name an event.
pub fn is_generic(text: &str) -> bool {
    let lc = text.to_lowercase();
    GENERIC_HEADINGS.iter().any(|g| *g == lc)
}
