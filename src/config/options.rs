// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarvestOptions {
    /// First page of the player's match history.
    pub start_url: Option<String>,
    /// Receiving application; the payload rides in its fragment.
    pub import_url: String,
    pub store_dir: PathBuf,
    /// Optional JSON export next to the clipboard copy.
    pub out: Option<PathBuf>,
    pub max_pages: u32,
    /// Start over even when a persisted harvest exists.
    pub fresh: bool,
    /// Plain HTTP fetches instead of a headless browser; collapsed sections stay closed.
    pub http_only: bool,
    pub wait: WaitOptions,
    pub net: NetOptions,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            start_url: None,
            import_url: s!(DEFAULT_IMPORT_URL),
            store_dir: PathBuf::from(STORE_DIR),
            out: None,
            max_pages: DEFAULT_MAX_PAGES,
            fresh: false,
            http_only: false,
            wait: WaitOptions::default(),
            net: NetOptions::default(),
        }
    }
}

impl HarvestOptions {
    pub fn state_path(&self) -> PathBuf {
        self.store_dir.join(format!("{STATE_KEY}.json"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.store_dir.join(LOG_FILE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitOptions {
    pub settle: Duration,
    pub second_pass: Duration,
    pub navigate: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            settle: SETTLE_AFTER_TRIGGER,
            second_pass: SECOND_PASS_DELAY,
            navigate: NAVIGATE_DELAY,
        }
    }
}

impl WaitOptions {
    /// No waiting at all; for offline pages and tests.
    pub fn instant() -> Self {
        Self { settle: Duration::ZERO, second_pass: Duration::ZERO, navigate: Duration::ZERO }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetOptions {
    pub user_agent: String,
    /// Raw `Cookie` header for the logged-in session.
    pub cookie: Option<String>,
    pub retries: u32,
    pub timeout: Duration,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            user_agent: s!(USER_AGENT),
            cookie: None,
            retries: FETCH_RETRIES,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}
