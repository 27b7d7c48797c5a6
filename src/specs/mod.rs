// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! This module hosts the **page reading rules** for the tournament site's
//! match-history view. The site renders each event as loosely nested blocks
//! (heading, a few metadata lines, a results table, sometimes a decklist
//! block) with no stable ids, so everything here is positional and textual
//! heuristics over the parsed content tree.
//!
//! ## What lives here
//! - **Pure extraction** over `scraper::Html` / `ElementRef`: no I/O, no
//!   state, no clock (the harvest date is passed in).
//! - **Scoping** (`context`): which heading owns which table, and the sibling
//!   range between them that every other reader is confined to.
//! - **Classifiers** (`metadata`, `venue`, `abbrev`): date, format, event
//!   type, rated flag, venue, and the event-name short-code table.
//! - **Hero** (`hero`): the conservative decklist reader.
//! - **Rows** (`rows`): header column classification and per-row parsing.
//! - **Page** (`page`): runs all of the above for every table on a page.
//!
//! ## What does **not** live here
//! - Expanding collapsed sections, pagination, persistence, payloads: that is
//!   the harvest loop (`crate::harvest`) and friends.
//!
//! ## Conventions & invariants
//! - Nothing here returns an error. Missing metadata resolves to a documented
//!   default (`"Unknown Event"`, harvest date, empty string, `"Unknown"` hero).
//! - Rows that are byes or whose result is not win/loss/draw are dropped,
//!   never recorded with a placeholder.
//! - Tiered lookups are `Option` chains: the first tier that answers wins.
//! - Keyword lists are tunables; expect misses on names never seen before.
//!
//! ## Typical call chain
//! ```text
//! harvest runner → specs::page::scan_document
//!                     ↳ rows::parse_table        (skip non-results tables)
//!                     ↳ context::locate          (heading + table ancestor)
//!                     ↳ metadata::classify_event (→ venue, abbrev)
//!                     ↳ hero::find_hero
//! ```
pub mod abbrev;
pub mod context;
pub mod hero;
pub mod metadata;
pub mod page;
pub mod rows;
pub mod venue;
