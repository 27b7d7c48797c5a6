// src/harvest/pager.rs
use scraper::{ElementRef, Html};
use url::Url;

use crate::config::consts::PAGE_PARAM;
use crate::core::html::{class_and_id, parent_element, text_of};

const NEXT_TEXTS: &[&str] = &["next", "next »", "next ›", "next page", "»", "›", ">"];

/// Absolute URL of the page after `current_url`, if the page links to one.
///
/// A link whose `page` parameter is exactly one past the current page wins;
/// otherwise the first enabled link reading "Next" (or an arrow) is taken.
pub fn find_next_page(doc: &Html, current_url: &str) -> Option<String> {
    let base = Url::parse(current_url).ok()?;
    let current = page_number(&base).unwrap_or(1);

    let links: Vec<(ElementRef<'_>, Url)> = doc
        .select(sel!("a[href]"))
        .filter(|a| !is_disabled(*a))
        .filter_map(|a| resolve(&base, a.value().attr("href")?).map(|u| (a, u)))
        .collect();

    links
        .iter()
        .find(|(_, url)| page_number(url) == Some(current + 1))
        .or_else(|| links.iter().find(|(a, _)| reads_next(*a)))
        .map(|(_, url)| url.to_string())
}

fn page_number(url: &Url) -> Option<u32> {
    url.query_pairs()
        .find(|(k, _)| k == PAGE_PARAM)
        .and_then(|(_, v)| v.trim().parse().ok())
}

fn resolve(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }
    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url)
}

fn reads_next(a: ElementRef<'_>) -> bool {
    if a.value().attr("rel").is_some_and(|r| r.split_whitespace().any(|t| t.eq_ignore_ascii_case("next"))) {
        return true;
    }
    let text = text_of(a).to_lowercase();
    let label = a.value().attr("aria-label").unwrap_or_default().to_lowercase();
    NEXT_TEXTS.contains(&text.as_str()) || label.starts_with("next")
}

/// Disabled on the link itself or on its list item, the usual pager markup.
fn is_disabled(a: ElementRef<'_>) -> bool {
    let flagged = |el: ElementRef<'_>| {
        el.value().attr("aria-disabled") == Some("true")
            || el.value().attr("disabled").is_some()
            || class_and_id(el).split_whitespace().any(|c| c == "disabled")
    };
    flagged(a) || parent_element(a).is_some_and(flagged)
}
