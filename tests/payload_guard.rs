// tests/payload_guard.rs
use chrono::NaiveDate;

use gem_scrape::clipboard::MemoryClipboard;
use gem_scrape::config::consts::MAX_FRAGMENT_CHARS;
use gem_scrape::config::options::{HarvestOptions, WaitOptions};
use gem_scrape::data::{HarvestState, MatchRecord, MatchResult};
use gem_scrape::harvest::{Harvester, InstantSleeper, Outcome, StaticBrowser};
use gem_scrape::payload::{self, decode_fragment};
use gem_scrape::progress::NullProgress;
use gem_scrape::store::MemoryStateStore;

fn record(i: usize) -> MatchRecord {
    MatchRecord {
        event: format!("Road to Nationals Session {i} at a Rather Long Venue Name"),
        date: "2024-02-10".into(),
        venue: "The Very Long Hobby Emporium and Card Lounge".into(),
        event_type: "Road to Nationals".into(),
        format: "Classic Constructed".into(),
        rated: true,
        hero: "Kano, Dracai of Aether".into(),
        round: (i % 9) as u32,
        round_label: String::new(),
        opponent: format!("Lastname{i}, Firstname"),
        opponent_gem_id: format!("{}", 100_000 + i),
        result: MatchResult::Loss,
    }
}

#[test]
fn oversized_payload_drops_fragment_but_keeps_everything_on_clipboard() {
    // ~350 bytes of JSON per record, ~470 base64 chars: 3000 records clear the ceiling
    let matches: Vec<MatchRecord> = (0..3000).map(record).collect();
    let encoded = payload::encode_fragment(&matches).unwrap();
    assert!(encoded.len() > MAX_FRAGMENT_CHARS);

    let mut browser = StaticBrowser::new().with_page("https://gem.example/h", "<html><body></body></html>");
    let mut store = MemoryStateStore::with_state(HarvestState {
        matches: matches.clone(),
        pages_scraped: 40,
        next_url: Some("https://gem.example/h".into()),
    });
    let mut clipboard = MemoryClipboard::default();
    let mut progress = NullProgress;
    let sleeper = InstantSleeper::default();
    let opts = HarvestOptions { wait: WaitOptions::instant(), ..HarvestOptions::default() };

    let outcome = Harvester {
        browser: &mut browser,
        store: &mut store,
        clipboard: &mut clipboard,
        progress: &mut progress,
        sleeper: &sleeper,
        opts: &opts,
        today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    }
    .resume();

    let Outcome::Done(report) = outcome else {
        panic!("expected the harvest to finish");
    };
    assert_eq!(report.import_url, opts.import_url);
    assert!(report.clipboard_ok);
    let pasted: Vec<MatchRecord> = serde_json::from_str(clipboard.contents.as_deref().unwrap()).unwrap();
    assert_eq!(pasted, matches);
}

#[test]
fn small_payload_round_trips_through_the_fragment() {
    let matches: Vec<MatchRecord> = (0..5).map(record).collect();
    let p = payload::encode(&matches, "https://app.example/import", MAX_FRAGMENT_CHARS).unwrap();
    assert!(p.fragment_included);
    let fragment = p.url.split_once('#').map(|(_, f)| f).unwrap();
    assert_eq!(decode_fragment(fragment).unwrap(), matches);
}
