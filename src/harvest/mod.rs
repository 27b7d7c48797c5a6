// src/harvest/mod.rs
//! The multi-page harvest.
//!
//! `machine` decides, `runner` does. A page visit is: open collapsed sections
//! (`browser`), scan every table (`crate::specs::page`), find the next page
//! (`pager`), then persist and navigate, or hand the payload off.
//!
//! Navigation may tear the process down. Whatever drives a [`runner::Harvester`]
//! just calls `resume` again afterwards (in the same process or a new one); the
//! persisted state carries the harvest across.
pub mod browser;
#[cfg(feature = "chrome")]
pub mod chrome;
pub mod machine;
pub mod pager;
pub mod runner;

pub use browser::{Browser, HttpBrowser, StaticBrowser};
#[cfg(feature = "chrome")]
pub use chrome::ChromeBrowser;
pub use machine::{step, Effect, Event, Machine, Phase, Vocabulary};
pub use runner::{Harvester, InstantSleeper, Outcome, Sleeper, ThreadSleeper};
