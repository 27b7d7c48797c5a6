// src/config/consts.rs
use std::time::Duration;

// Local persistence
pub const STORE_DIR: &str = ".store";
pub const STATE_KEY: &str = "gem_scrape_harvest";
pub const LOG_FILE: &str = "debug.log";

// Hand-off
pub const DEFAULT_IMPORT_URL: &str = "http://localhost:3000/import";
pub const FRAGMENT_KEY: &str = "ext";
pub const MAX_FRAGMENT_CHARS: usize = 1_000_000;

// Extraction bounds
pub const CONTEXT_MAX_DEPTH: usize = 10;
pub const HERO_MAX_DEPTH: usize = 8;
pub const PRE_HEADING_WINDOW: usize = 3;
pub const UNKNOWN_EVENT: &str = "Unknown Event";
pub const UNKNOWN_HERO: &str = "Unknown";

// Pagination
pub const PAGE_PARAM: &str = "page";
pub const DEFAULT_MAX_PAGES: u32 = 200;

// Waiting
pub const SETTLE_AFTER_TRIGGER: Duration = Duration::from_millis(300);
pub const SECOND_PASS_DELAY: Duration = Duration::from_millis(1500);
pub const NAVIGATE_DELAY: Duration = Duration::from_millis(500);

// Net
pub const USER_AGENT: &str = "gem_scrape/0.1";
pub const FETCH_RETRIES: u32 = 3;
pub const REQUEST_PAUSE_MS: u64 = 750; // be polite
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const COOKIE_ENV: &str = "GEM_COOKIE";
