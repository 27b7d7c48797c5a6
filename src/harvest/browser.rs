// src/harvest/browser.rs
//
// The page the harvest is looking at. `ChromeBrowser` (feature `chrome`) drives
// a real headless browser and is what opens collapsed sections on the live
// site. `HttpBrowser` is the static fallback: it fetches markup and has nothing
// to click. `StaticBrowser` replays pages from memory, including the markup a
// page shows once its toggles have been clicked.

use std::collections::{HashMap, HashSet, VecDeque};

use reqwest::blocking::Client;
use scraper::{ElementRef, Html};

use super::machine::Vocabulary;
use crate::config::options::NetOptions;
use crate::core::html::{parent_element, tag, text_of};
use crate::core::net::{build_client, http_get};
use crate::error::HarvestError;

pub trait Browser {
    /// URL of the loaded page, `None` before the first navigation.
    fn current_url(&self) -> Option<&str>;

    fn navigate(&mut self, url: &str) -> Result<(), HarvestError>;

    /// Markup of the loaded page as currently rendered.
    fn page_html(&self) -> Result<&str, HarvestError>;

    /// Trigger every not-yet-triggered toggle that `vocabulary` accepts, calling
    /// `settle` after each one. Returns how many were triggered this call.
    fn expand(&mut self, vocabulary: Vocabulary, settle: &mut dyn FnMut()) -> Result<usize, HarvestError>;
}

/// Elements of `doc` that open a collapsed section under `vocabulary`, in
/// document order.
pub fn toggles<'a>(doc: &'a Html, vocabulary: Vocabulary) -> impl Iterator<Item = ElementRef<'a>> {
    doc.select(sel!("*")).filter(move |el| is_toggle(*el, vocabulary))
}

/// Collapsed-section toggles: structural ones (`aria-expanded="false"`,
/// bootstrap `data-*-toggle="collapse"`, `<summary>`) for the primary pass,
/// and any clickable whose wording matches the vocabulary.
fn is_toggle(el: ElementRef<'_>, vocabulary: Vocabulary) -> bool {
    let v = el.value();
    let structural = v.attr("aria-expanded").is_some_and(|a| a.eq_ignore_ascii_case("false"))
        || ["data-bs-toggle", "data-toggle"]
            .iter()
            .any(|k| v.attr(k).is_some_and(|a| a.eq_ignore_ascii_case("collapse")))
        || (tag(el) == "summary" && !is_open_details(el));
    let clickable = matches!(tag(el), "button" | "a" | "summary") || v.attr("role") == Some("button");

    (structural && vocabulary == Vocabulary::Primary) || (clickable && vocabulary.matches(&text_of(el)))
}

fn is_open_details(summary: ElementRef<'_>) -> bool {
    parent_element(summary).is_some_and(|p| tag(p) == "details" && p.value().attr("open").is_some())
}

/// Identity of a toggle that survives markup being inserted around it: tag,
/// text, and how many identical toggles came before it.
fn toggle_keys(doc: &Html, vocabulary: Vocabulary) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    toggles(doc, vocabulary)
        .map(|el| {
            let base = format!("{}:{}", tag(el), text_of(el));
            let n = seen.entry(base.clone()).or_default();
            *n += 1;
            format!("{base}:{n}")
        })
        .collect()
}

/// The live site over blocking HTTP with the session cookie. Markup only:
/// nothing runs, so there is nothing to expand and `expand` reports zero.
pub struct HttpBrowser {
    client: Client,
    net: NetOptions,
    page: Option<(String, String)>,
}

impl HttpBrowser {
    pub fn new(net: NetOptions) -> Result<Self, HarvestError> {
        let client = build_client(&net)?;
        Ok(Self { client, net, page: None })
    }
}

impl Browser for HttpBrowser {
    fn current_url(&self) -> Option<&str> {
        self.page.as_ref().map(|(url, _)| url.as_str())
    }

    fn navigate(&mut self, url: &str) -> Result<(), HarvestError> {
        url::Url::parse(url)?;
        let html = http_get(&self.client, &self.net, url)?;
        logf!("Fetched {url} ({} bytes)", html.len());
        self.page = Some((s!(url), html));
        Ok(())
    }

    fn page_html(&self) -> Result<&str, HarvestError> {
        self.page.as_ref().map(|(_, html)| html.as_str()).ok_or(HarvestError::NoPage)
    }

    fn expand(&mut self, vocabulary: Vocabulary, _settle: &mut dyn FnMut()) -> Result<usize, HarvestError> {
        let (url, html) = self.page.as_ref().ok_or(HarvestError::NoPage)?;
        let seen = toggles(&Html::parse_document(html), vocabulary).count();
        if seen > 0 {
            logd!("Expand: {seen} toggles ({vocabulary:?}) on {url} left closed; static fetch cannot click");
        }
        Ok(0)
    }
}

/// One replayed page: what it shows now, what each further click reveals, and
/// the toggles already clicked.
#[derive(Debug, Default)]
struct Replay {
    url: String,
    html: String,
    reveals: VecDeque<String>,
    triggered: HashSet<String>,
}

/// Pages keyed by URL. Unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct StaticBrowser {
    pages: HashMap<String, Vec<String>>,
    page: Option<Replay>,
    /// Every URL navigated to, in order.
    pub visits: Vec<String>,
}

impl StaticBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(s!(url), vec![html.into()]);
        self
    }

    /// Markup `url` shows after one more toggle has been clicked. Stages are
    /// consumed in the order given, one per triggered toggle.
    pub fn with_reveal(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.entry(s!(url)).or_default().push(html.into());
        self
    }
}

impl Browser for StaticBrowser {
    fn current_url(&self) -> Option<&str> {
        self.page.as_ref().map(|p| p.url.as_str())
    }

    fn navigate(&mut self, url: &str) -> Result<(), HarvestError> {
        self.visits.push(s!(url));
        let mut stages: VecDeque<String> = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| HarvestError::Status { status: 404, url: s!(url) })?
            .into();
        let html = stages.pop_front().unwrap_or_default();
        self.page = Some(Replay { url: s!(url), html, reveals: stages, triggered: HashSet::new() });
        Ok(())
    }

    fn page_html(&self) -> Result<&str, HarvestError> {
        self.page.as_ref().map(|p| p.html.as_str()).ok_or(HarvestError::NoPage)
    }

    fn expand(&mut self, vocabulary: Vocabulary, settle: &mut dyn FnMut()) -> Result<usize, HarvestError> {
        let page = self.page.as_mut().ok_or(HarvestError::NoPage)?;
        let keys = toggle_keys(&Html::parse_document(&page.html), vocabulary);
        let mut count = 0;
        for key in keys {
            if !page.triggered.insert(key) {
                continue;
            }
            if let Some(next) = page.reveals.pop_front() {
                page.html = next;
            }
            count += 1;
            settle();
        }
        logd!("Expand: {count} toggles ({vocabulary:?}) on {}", page.url);
        Ok(count)
    }
}
