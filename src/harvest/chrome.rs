// src/harvest/chrome.rs
//
// A headless Chrome tab over the DevTools protocol. This is the browser that
// can actually open the site's collapsed sections: toggles are found in the
// rendered markup with the same rules as everywhere else, clicked in the live
// DOM, and the markup is re-read afterwards.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser as Chrome, LaunchOptions, Tab};
use scraper::Html;

use super::browser::{toggles, Browser};
use super::machine::Vocabulary;
use crate::config::options::NetOptions;
use crate::error::HarvestError;

/// Attribute stamped on every live element so a toggle found in a markup
/// snapshot can be clicked in the DOM it came from.
const STAMP_ATTR: &str = "data-gem-idx";

const STAMP_JS: &str = r#"(() => {
    let n = window.__gemIdx || 0;
    for (const el of document.querySelectorAll('*')) {
        if (!el.hasAttribute('data-gem-idx')) el.setAttribute('data-gem-idx', String(n++));
    }
    window.__gemIdx = n;
    return n;
})()"#;

/// The browser process stays alive across long settles between pages.
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

fn browser_err(e: impl Display) -> HarvestError {
    HarvestError::Browser(e.to_string())
}

pub struct ChromeBrowser {
    // Owns the process; the tab dies with it
    _chrome: Chrome,
    tab: Arc<Tab>,
    url: Option<String>,
    html: String,
    triggered: HashSet<String>,
}

impl ChromeBrowser {
    /// Launch headless Chrome with the session's user agent and cookie.
    pub fn launch(net: &NetOptions) -> Result<Self, HarvestError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .idle_browser_timeout(IDLE_TIMEOUT)
            .build()
            .map_err(browser_err)?;
        let chrome = Chrome::new(options).map_err(browser_err)?;
        let tab = chrome.new_tab().map_err(browser_err)?;
        tab.set_default_timeout(net.timeout);
        tab.set_user_agent(&net.user_agent, None, None).map_err(browser_err)?;
        if let Some(cookie) = &net.cookie {
            tab.set_extra_http_headers(HashMap::from([("Cookie", cookie.as_str())]))
                .map_err(browser_err)?;
        }
        logf!("Chrome: launched headless tab");
        Ok(Self { _chrome: chrome, tab, url: None, html: String::new(), triggered: HashSet::new() })
    }

    fn refresh(&mut self) -> Result<(), HarvestError> {
        self.html = self.tab.get_content().map_err(browser_err)?;
        Ok(())
    }

    /// Click the live element carrying `stamp`; false if it has gone away.
    fn click(&self, stamp: &str) -> Result<bool, HarvestError> {
        let js = format!(
            "(() => {{ const el = document.querySelector('[{STAMP_ATTR}=\"{stamp}\"]'); \
             if (!el) return false; el.click(); return true; }})()"
        );
        let clicked = self.tab.evaluate(&js, false).map_err(browser_err)?;
        Ok(clicked.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

impl Browser for ChromeBrowser {
    fn current_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn navigate(&mut self, url: &str) -> Result<(), HarvestError> {
        url::Url::parse(url)?;
        self.tab.navigate_to(url).map_err(browser_err)?;
        self.tab.wait_until_navigated().map_err(browser_err)?;
        self.url = Some(s!(url));
        self.triggered.clear();
        self.refresh()?;
        logf!("Chrome: loaded {url} ({} bytes)", self.html.len());
        Ok(())
    }

    fn page_html(&self) -> Result<&str, HarvestError> {
        match self.url {
            Some(_) => Ok(&self.html),
            None => Err(HarvestError::NoPage),
        }
    }

    fn expand(&mut self, vocabulary: Vocabulary, settle: &mut dyn FnMut()) -> Result<usize, HarvestError> {
        if self.url.is_none() {
            return Err(HarvestError::NoPage);
        }
        self.tab.evaluate(STAMP_JS, false).map_err(browser_err)?;
        self.refresh()?;

        let stamps: Vec<String> = {
            let doc = Html::parse_document(&self.html);
            toggles(&doc, vocabulary)
                .filter_map(|el| el.value().attr(STAMP_ATTR).map(String::from))
                .collect()
        };

        let mut count = 0;
        for stamp in stamps {
            if !self.triggered.insert(stamp.clone()) {
                continue;
            }
            if self.click(&stamp)? {
                count += 1;
                settle();
            }
        }

        self.refresh()?;
        logd!("Chrome: clicked {count} toggles ({vocabulary:?})");
        Ok(count)
    }
}
