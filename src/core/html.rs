// src/core/html.rs
//
// Read-only helpers over the parsed content tree. Everything here takes
// `ElementRef`s and never mutates; the specs build on these so they can be
// exercised against in-memory fixtures.

use scraper::ElementRef;

use super::sanitize::normalize_ws;

/// Visible text of an element, text nodes joined by a space and normalized.
pub fn text_of(el: ElementRef<'_>) -> String {
    let joined: Vec<&str> = el.text().collect();
    normalize_ws(&joined.join(" "))
}

pub fn tag(el: ElementRef<'_>) -> &str {
    el.value().name()
}

pub fn is_heading_tag(el: ElementRef<'_>) -> bool {
    matches!(tag(el), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

pub fn parent_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

pub fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

/// Preceding element siblings, closest first.
pub fn prev_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.prev_siblings().filter_map(ElementRef::wrap)
}

pub fn next_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.next_siblings().filter_map(ElementRef::wrap)
}

/// Element descendants in document order, `el` itself excluded.
pub fn descendant_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

pub fn element_child_count(el: ElementRef<'_>) -> usize {
    child_elements(el).count()
}

/// `el` is `tag_name` or has a descendant that is.
pub fn contains_tag(el: ElementRef<'_>, tag_name: &str) -> bool {
    tag(el) == tag_name || descendant_elements(el).any(|d| tag(d) == tag_name)
}

/// True when `el` sits somewhere below `ancestor`.
pub fn is_inside(el: ElementRef<'_>, ancestor: ElementRef<'_>) -> bool {
    let id = ancestor.id();
    el.ancestors().any(|a| a.id() == id)
}

pub fn same_node(a: ElementRef<'_>, b: ElementRef<'_>) -> bool {
    a.id() == b.id()
}

/// First `h1`..`h6` at or below `el`.
pub fn first_heading<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    if is_heading_tag(el) {
        return Some(el);
    }
    descendant_elements(el).find(|d| is_heading_tag(*d))
}

/// Lowercased `class` + `id` of an element, for substring sniffing.
pub fn class_and_id(el: ElementRef<'_>) -> String {
    let v = el.value();
    let mut out = String::new();
    if let Some(c) = v.attr("class") { out.push_str(c); }
    out.push(' ');
    if let Some(i) = v.attr("id") { out.push_str(i); }
    out.to_ascii_lowercase()
}
