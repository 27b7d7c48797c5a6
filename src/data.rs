// src/data.rs
//
// Record shapes shared by the specs, the harvest loop and the payload.
//
// - MatchRecord:  one resolved row of a results table (the wire shape).
// - EventInfo:    per-table metadata, built once and copied into each record.
// - HarvestState: the only thing that outlives a page; persisted between navigations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::consts::{UNKNOWN_EVENT, UNKNOWN_HERO};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

impl MatchResult {
    /// Accepts single-letter and full-word forms, any case. Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "w" | "win" => Some(Self::Win),
            "l" | "loss" => Some(Self::Loss),
            "d" | "draw" => Some(Self::Draw),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub event: String,
    pub date: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub rated: bool,
    pub hero: String,
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub round_label: String,
    pub opponent: String,
    #[serde(default)]
    pub opponent_gem_id: String,
    pub result: MatchResult,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventInfo {
    pub name: String,
    pub date: NaiveDate,
    pub venue: String,
    pub event_type: String,
    pub format: String,
    pub rated: bool,
}

impl EventInfo {
    /// Placeholder for a table whose heading could not be located.
    pub fn unknown(today: NaiveDate) -> Self {
        Self {
            name: s!(UNKNOWN_EVENT),
            date: today,
            venue: s!(),
            event_type: s!(),
            format: s!(),
            rated: false,
        }
    }
}

/// One parsed results row before it is joined with its event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowMatch {
    pub round: u32,
    pub round_label: String,
    pub opponent: String,
    pub opponent_gem_id: String,
    pub result: MatchResult,
}

impl RowMatch {
    pub fn into_record(self, event: &EventInfo, hero: &str) -> MatchRecord {
        MatchRecord {
            event: event.name.clone(),
            date: event.date.format("%Y-%m-%d").to_string(),
            venue: event.venue.clone(),
            event_type: event.event_type.clone(),
            format: event.format.clone(),
            rated: event.rated,
            hero: if hero.is_empty() { s!(UNKNOWN_HERO) } else { s!(hero) },
            round: self.round,
            round_label: self.round_label,
            opponent: self.opponent,
            opponent_gem_id: self.opponent_gem_id,
            result: self.result,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestState {
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub pages_scraped: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_accepts_letters_and_words() {
        for raw in ["Win", "W", "win", " w "] {
            assert_eq!(MatchResult::parse(raw), Some(MatchResult::Win));
        }
        assert_eq!(MatchResult::parse("L"), Some(MatchResult::Loss));
        assert_eq!(MatchResult::parse("Draw"), Some(MatchResult::Draw));
        assert_eq!(MatchResult::parse("Pending"), None);
        assert_eq!(MatchResult::parse(""), None);
    }

    #[test]
    fn state_layout_is_camel_case_and_omits_missing_next_url() {
        let st = HarvestState { matches: Vec::new(), pages_scraped: 2, next_url: None };
        let json = serde_json::to_string(&st).unwrap();
        assert_eq!(json, r#"{"matches":[],"pagesScraped":2}"#);

        let back: HarvestState =
            serde_json::from_str(r#"{"matches":[],"pagesScraped":1,"nextUrl":"https://x/?page=2"}"#)
                .unwrap();
        assert_eq!(back.next_url.as_deref(), Some("https://x/?page=2"));
    }

    #[test]
    fn record_uses_wire_field_names() {
        let ev = EventInfo::unknown(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        let row = RowMatch {
            round: 1,
            round_label: s!(),
            opponent: s!("Smith, Jane"),
            opponent_gem_id: s!("1234"),
            result: MatchResult::Win,
        };
        let rec = row.into_record(&ev, "");
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["event"], "Unknown Event");
        assert_eq!(v["date"], "2024-03-09");
        assert_eq!(v["hero"], "Unknown");
        assert_eq!(v["opponentGemId"], "1234");
        assert_eq!(v["roundLabel"], "");
        assert_eq!(v["result"], "win");
    }
}
