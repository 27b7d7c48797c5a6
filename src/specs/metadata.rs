// src/specs/metadata.rs
//
// Per-event classifiers over the scoped text. Each returns `Option` and the
// callers chain them with `or_else`, so the first tier that finds something
// wins and nothing here ever fails.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::abbrev::expand_event_name;
use super::context::EventContext;
use super::venue;
use crate::data::EventInfo;

/// Ordered keyword rules mapping text to a canonical label.
pub struct Vocabulary {
    rules: Vec<(Regex, &'static str)>,
}

impl Vocabulary {
    fn new(table: &[(&str, &'static str)]) -> Self {
        let rules = table
            .iter()
            .map(|(pat, label)| (Regex::new(pat).unwrap(), *label))
            .collect();
        Self { rules }
    }

    /// Label of the first rule matching anywhere in `text`.
    pub fn classify(&self, text: &str) -> Option<&'static str> {
        self.rules.iter().find(|(re, _)| re.is_match(text)).map(|(_, label)| *label)
    }

    pub fn mentions(&self, text: &str) -> bool {
        self.classify(text).is_some()
    }

    /// `text` is nothing but a vocabulary word (e.g. a bare "Blitz" cell).
    pub fn is_bare_label(&self, text: &str) -> bool {
        let t = text.trim();
        self.rules.iter().any(|(re, label)| {
            label.eq_ignore_ascii_case(t) || re.find(t).is_some_and(|m| m.as_str().len() == t.len())
        })
    }
}

pub static FORMATS: LazyLock<Vocabulary> = LazyLock::new(|| {
    Vocabulary::new(&[
        (r"(?i)\bultimate\s+pit\s+fight\b", "Ultimate Pit Fight"),
        (r"(?i)\bliving\s+legend\b", "Living Legend"),
        (r"(?i)\bsilver\s+age\b", "Silver Age"),
        (r"(?i)\bclassic\s+constructed\b|\bCC\b", "Classic Constructed"),
        (r"(?i)\bblitz\b", "Blitz"),
        (r"(?i)\bcommoner\b", "Commoner"),
        (r"(?i)\b(?:booster\s+)?draft\b", "Draft"),
        (r"(?i)\bsealed(?:\s+deck)?\b", "Sealed"),
        (r"(?i)\bclash\b", "Clash"),
    ])
});

pub static EVENT_TYPES: LazyLock<Vocabulary> = LazyLock::new(|| {
    Vocabulary::new(&[
        (r"(?i)\bworld\s+championship\b|\bworlds\b", "World Championship"),
        (r"(?i)\bpro\s+tour\b", "Pro Tour"),
        (r"(?i)\broad\s+to\s+nationals\b|\bRTN\b", "Road to Nationals"),
        (r"(?i)\bnational\s+championship\b|\bnationals\b", "Nationals"),
        (r"(?i)\bbattle\s+hardened\b", "Battle Hardened"),
        (r"(?i)\bthe\s+calling\b|\bcalling\b", "The Calling"),
        (r"(?i)\bpro\s?quest\b|\bPQ\b", "ProQuest"),
        (r"(?i)\bskirmish\b", "Skirmish"),
        (r"(?i)\bpre-?release\b", "Pre-Release"),
        (r"(?i)\barmou?ry\b", "Armory"),
        (r"(?i)\bon\s+demand\b", "On Demand"),
    ])
});

/// Build the event aggregate for one located table.
pub fn classify_event(ctx: &EventContext<'_>, today: NaiveDate) -> EventInfo {
    let name = expand_event_name(&ctx.title());
    let text = ctx.scoped_text();

    let format = FORMATS
        .classify(&text)
        .or_else(|| FORMATS.classify(&name))
        .unwrap_or_default();
    let event_type = EVENT_TYPES
        .classify(&text)
        .or_else(|| EVENT_TYPES.classify(&name))
        .unwrap_or_default();

    EventInfo {
        date: parse_date(&text).unwrap_or(today),
        venue: venue::find_venue(ctx, &name).unwrap_or_default(),
        event_type: s!(event_type),
        format: s!(format),
        rated: is_rated(&text),
        name,
    }
}

/// First date in `text`: full month names, then abbreviated ones.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let full = re!(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b"
    );
    let short = re!(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sept|sep|oct|nov|dec)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b"
    );
    first_date(full, text).or_else(|| first_date(short, text))
}

fn first_date(re: &Regex, text: &str) -> Option<NaiveDate> {
    re.captures_iter(text).find_map(|c| {
        let month = month_number(&c[1])?;
        let day: u32 = c[2].parse().ok()?;
        let year: i32 = c[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] =
        ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];
    let key = name.get(..3)?.to_ascii_lowercase();
    MONTHS.iter().position(|m| *m == key).map(|i| i as u32 + 1)
}

/// "Rated" present and neither "Not Rated" nor "Unrated".
pub fn is_rated(text: &str) -> bool {
    re!(r"(?i)\brated\b").is_match(text) && !re!(r"(?i)\bnot\s+rated\b|\bunrated\b").is_match(text)
}
