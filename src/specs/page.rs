// src/specs/page.rs
use std::panic::{self, AssertUnwindSafe};

use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use super::{context, hero, metadata, rows};
use crate::data::{EventInfo, MatchRecord};

/// Parse a page and extract every match on it.
pub fn scan_page(html_doc: &str, today: NaiveDate) -> Vec<MatchRecord> {
    let doc = Html::parse_document(html_doc);
    scan_document(&doc, today)
}

/// Every table on the page, in document order. Non-results tables yield
/// nothing; so does a table whose extraction blows up, without taking the
/// rest of the page with it.
pub fn scan_document(doc: &Html, today: NaiveDate) -> Vec<MatchRecord> {
    let t = std::time::Instant::now();
    let mut out = Vec::new();
    let mut tables = 0usize;
    for (i, table) in doc.select(sel!("table")).enumerate() {
        tables += 1;
        match panic::catch_unwind(AssertUnwindSafe(|| scan_table(table, today))) {
            Ok(records) => out.extend(records),
            Err(_) => loge!("Scan: table #{i} panicked during extraction; skipped"),
        }
    }
    logd!("Scan: {} matches from {tables} tables in {:?}", out.len(), t.elapsed());
    out
}

/// Locator, classifiers, hero and rows for one table.
pub fn scan_table(table: ElementRef<'_>, today: NaiveDate) -> Vec<MatchRecord> {
    let Some(parsed) = rows::parse_table(table) else {
        return Vec::new();
    };
    if parsed.is_empty() {
        return Vec::new();
    }

    let event = match context::locate(table) {
        Some(ctx) => metadata::classify_event(&ctx, today),
        None => {
            logd!("Scan: no event heading above results table; using placeholder");
            EventInfo::unknown(today)
        }
    };
    let hero = hero::find_hero(table);

    parsed.into_iter().map(|row| row.into_record(&event, &hero)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MatchResult;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    #[test]
    fn orphan_table_gets_placeholder_event() {
        let recs = scan_page(
            "<table><tr><th>Round</th><th>Opponent</th><th>Result</th></tr>\
             <tr><td>1</td><td>Doe, John</td><td>L</td></tr></table>",
            today(),
        );
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].event, "Unknown Event");
        assert_eq!(recs[0].date, "2025-01-02");
        assert_eq!(recs[0].hero, "Unknown");
        assert_eq!(recs[0].venue, "");
        assert_eq!(recs[0].result, MatchResult::Loss);
    }

    #[test]
    fn decklist_tables_do_not_produce_matches() {
        let recs = scan_page(
            "<div><h4>Armory Night</h4>\
             <table><tr><th>Round</th><th>Opponent</th><th>Result</th></tr>\
               <tr><td>1</td><td>Doe, John</td><td>W</td></tr></table>\
             <h5>Decklists</h5>\
             <table><tr><th>Hero</th><th>Format</th></tr><tr><td>Fai</td><td>Blitz</td></tr></table>\
             </div>",
            today(),
        );
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].event, "Armory Night");
        assert_eq!(recs[0].event_type, "Armory");
        assert_eq!(recs[0].hero, "Fai");
    }
}
