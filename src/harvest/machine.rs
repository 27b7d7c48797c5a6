// src/harvest/machine.rs
//
// The harvest as a pure transition function. Nothing here touches the page,
// the clock or the store: every side effect is handed back as an `Effect`
// for the runner to execute, and the outcome comes back in as an `Event`.
//
//   Idle ─Start/Resume→ Expanding ─(2 passes, maybe secondary)→ Scanning
//   Scanning ─next page→ NavigatingNext   (persist, navigate, process may die)
//   Scanning ─no next──→ Finalizing ─Finalized→ Done
//   Expanding/Scanning/NavigatingNext ─Failed→ Finalizing (partial) | Failed

use std::time::Duration;

use crate::config::options::WaitOptions;
use crate::core::sanitize::{normalize_ws, same_text};
use crate::data::{HarvestState, MatchRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Expanding,
    Scanning,
    NavigatingNext,
    Finalizing,
    Done,
    Failed,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Expanding => "Expanding",
            Phase::Scanning => "Scanning",
            Phase::NavigatingNext => "Navigating",
            Phase::Finalizing => "Finalizing",
            Phase::Done => "Done",
            Phase::Failed => "Failed",
        }
    }
}

/// Which interactive elements count as "open this section".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vocabulary {
    /// Explicit result toggles and open/expand affordances.
    Primary,
    /// Looser wording, tried once when the primary pass found nothing.
    Secondary,
}

pub const PRIMARY_TERMS: &[&str] = &[
    "view results",
    "show results",
    "view matches",
    "show matches",
    "expand",
    "expand all",
    "show more",
    "open",
];

pub const SECONDARY_TERMS: &[&str] = &["results", "matches", "details", "more", "show", "view"];

impl Vocabulary {
    pub fn matches(self, text: &str) -> bool {
        let text = normalize_ws(text).to_lowercase();
        if text.is_empty() {
            return false;
        }
        match self {
            Vocabulary::Primary => PRIMARY_TERMS
                .iter()
                .any(|t| same_text(&text, t) || text.starts_with(&format!("{t} "))),
            Vocabulary::Secondary => SECONDARY_TERMS.iter().any(|t| text.contains(t)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A fresh harvest on the page now loaded at `url`.
    Start { url: String },
    /// Persisted state was found after a navigation; `url` is the page now loaded.
    Resume { state: HarvestState, url: String },
    /// Persisted state was found but its page could not be loaded.
    ResumeFailed { state: HarvestState, message: String },
    /// One expansion pass finished, having triggered `count` elements.
    Expanded { count: usize },
    Scanned { matches: Vec<MatchRecord>, next: Option<String> },
    /// The payload was handed off.
    Finalized,
    Failed { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Status { status: String, detail: String, match_count: usize },
    Expand { vocabulary: Vocabulary, settle: Duration },
    AwaitSettle(Duration),
    Scan,
    Persist(HarvestState),
    ClearPersisted,
    Navigate(String),
    /// Build and hand off the payload for these matches.
    Finalize(HarvestState),
    ReportFailure(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Expansion {
    pass: u8,
    triggered: usize,
    secondary_tried: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Machine {
    pub phase: Phase,
    pub state: HarvestState,
    pub current_url: String,
    pub max_pages: u32,
    pub wait: WaitOptions,
    expansion: Expansion,
}

impl Machine {
    pub fn new(max_pages: u32, wait: WaitOptions) -> Self {
        Self {
            phase: Phase::Idle,
            state: HarvestState::default(),
            current_url: s!(),
            max_pages,
            wait,
            expansion: Expansion::default(),
        }
    }

    fn status(&self, detail: impl Into<String>) -> Effect {
        Effect::Status {
            status: s!(self.phase.label()),
            detail: detail.into(),
            match_count: self.state.matches.len(),
        }
    }

    fn begin_expanding(&mut self, detail: String) -> Vec<Effect> {
        self.phase = Phase::Expanding;
        self.expansion = Expansion { pass: 1, ..Expansion::default() };
        vec![
            self.status(detail),
            Effect::Expand { vocabulary: Vocabulary::Primary, settle: self.wait.settle },
        ]
    }

    fn fail(&mut self, message: String) -> Vec<Effect> {
        if self.state.matches.is_empty() {
            self.phase = Phase::Failed;
            vec![self.status(message.clone()), Effect::ClearPersisted, Effect::ReportFailure(message)]
        } else {
            self.begin_finalizing(format!("partial: {message}"))
        }
    }

    fn begin_finalizing(&mut self, detail: String) -> Vec<Effect> {
        self.phase = Phase::Finalizing;
        self.state.next_url = None;
        vec![self.status(detail), Effect::ClearPersisted, Effect::Finalize(self.state.clone())]
    }
}

/// One transition. Pairs that make no sense for the current phase are ignored.
pub fn step(mut m: Machine, event: Event) -> (Machine, Vec<Effect>) {
    let effects = match (m.phase, event) {
        (Phase::Idle, Event::Start { url }) => {
            m.state = HarvestState::default();
            m.current_url = url;
            m.begin_expanding(s!("page 1"))
        }
        (Phase::Idle, Event::Resume { state, url }) => {
            m.state = state;
            m.state.next_url = None;
            m.current_url = url;
            let detail = format!("resuming at page {}", m.state.pages_scraped + 1);
            m.begin_expanding(detail)
        }

        (Phase::Expanding, Event::Expanded { count }) => {
            m.expansion.triggered += count;
            match m.expansion.pass {
                1 => {
                    m.expansion.pass = 2;
                    vec![
                        Effect::AwaitSettle(m.wait.second_pass),
                        Effect::Expand { vocabulary: Vocabulary::Primary, settle: m.wait.settle },
                    ]
                }
                2 if m.expansion.triggered == 0 && !m.expansion.secondary_tried => {
                    m.expansion.pass = 3;
                    m.expansion.secondary_tried = true;
                    vec![
                        m.status("nothing to open; trying looser wording"),
                        Effect::Expand { vocabulary: Vocabulary::Secondary, settle: m.wait.settle },
                    ]
                }
                _ => {
                    m.phase = Phase::Scanning;
                    let detail = format!("{} sections opened", m.expansion.triggered);
                    vec![m.status(detail), Effect::Scan]
                }
            }
        }

        (Phase::Scanning, Event::Scanned { matches, next }) => {
            let found = matches.len();
            m.state.matches.extend(matches);
            m.state.pages_scraped += 1;

            let next = next.filter(|url| url != &m.current_url);
            match next {
                Some(url) if m.state.pages_scraped < m.max_pages => {
                    m.phase = Phase::NavigatingNext;
                    m.state.next_url = Some(url.clone());
                    vec![
                        m.status(format!("+{found} on page {}; next {url}", m.state.pages_scraped)),
                        Effect::Persist(m.state.clone()),
                        Effect::AwaitSettle(m.wait.navigate),
                        Effect::Navigate(url),
                    ]
                }
                Some(_) => m.begin_finalizing(format!("page limit {} reached", m.max_pages)),
                None => m.begin_finalizing(format!("+{found} on last page")),
            }
        }

        (Phase::Idle, Event::ResumeFailed { state, message }) => {
            m.state = state;
            m.fail(message)
        }
        (Phase::Expanding | Phase::Scanning | Phase::NavigatingNext, Event::Failed { message }) => m.fail(message),

        (Phase::Finalizing, Event::Finalized) => {
            m.phase = Phase::Done;
            vec![m.status(format!("{} pages", m.state.pages_scraped))]
        }
        (Phase::Finalizing, Event::Failed { message }) => {
            m.phase = Phase::Failed;
            vec![m.status(message.clone()), Effect::ReportFailure(message)]
        }

        (phase, event) => {
            logd!("Harvest: ignoring {event:?} while {phase:?}");
            Vec::new()
        }
    };
    (m, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MatchResult;

    fn machine() -> Machine {
        Machine::new(200, WaitOptions::default())
    }

    fn rec(n: u32) -> MatchRecord {
        MatchRecord {
            event: s!("E"),
            date: s!("2024-01-01"),
            venue: s!(),
            event_type: s!(),
            format: s!(),
            rated: false,
            hero: s!("Unknown"),
            round: n,
            round_label: s!(),
            opponent: s!("X Y"),
            opponent_gem_id: s!(),
            result: MatchResult::Win,
        }
    }

    fn kinds(effects: &[Effect]) -> Vec<&'static str> {
        effects
            .iter()
            .map(|e| match e {
                Effect::Status { .. } => "status",
                Effect::Expand { vocabulary: Vocabulary::Primary, .. } => "expand",
                Effect::Expand { vocabulary: Vocabulary::Secondary, .. } => "expand2",
                Effect::AwaitSettle(_) => "wait",
                Effect::Scan => "scan",
                Effect::Persist(_) => "persist",
                Effect::ClearPersisted => "clear",
                Effect::Navigate(_) => "navigate",
                Effect::Finalize(_) => "finalize",
                Effect::ReportFailure(_) => "fail",
            })
            .collect()
    }

    fn scanning(url: &str) -> Machine {
        let (m, _) = step(machine(), Event::Start { url: s!(url) });
        let (m, _) = step(m, Event::Expanded { count: 2 });
        let (m, _) = step(m, Event::Expanded { count: 0 });
        assert_eq!(m.phase, Phase::Scanning);
        m
    }

    #[test]
    fn two_primary_passes_then_scan() {
        let (m, fx) = step(machine(), Event::Start { url: s!("u1") });
        assert_eq!(kinds(&fx), ["status", "expand"]);
        let (m, fx) = step(m, Event::Expanded { count: 1 });
        assert_eq!(kinds(&fx), ["wait", "expand"]);
        let (m, fx) = step(m, Event::Expanded { count: 0 });
        assert_eq!(kinds(&fx), ["status", "scan"]);
        assert_eq!(m.phase, Phase::Scanning);
    }

    #[test]
    fn secondary_vocabulary_runs_once_when_nothing_opened() {
        let (m, _) = step(machine(), Event::Start { url: s!("u1") });
        let (m, _) = step(m, Event::Expanded { count: 0 });
        let (m, fx) = step(m, Event::Expanded { count: 0 });
        assert_eq!(kinds(&fx), ["status", "expand2"]);
        let (m, fx) = step(m, Event::Expanded { count: 0 });
        assert_eq!(kinds(&fx), ["status", "scan"]);
        assert_eq!(m.phase, Phase::Scanning);
    }

    #[test]
    fn next_page_persists_before_navigating() {
        let (m, fx) = step(
            scanning("u1"),
            Event::Scanned { matches: vec![rec(1), rec(2)], next: Some(s!("u2")) },
        );
        assert_eq!(kinds(&fx), ["status", "persist", "wait", "navigate"]);
        assert_eq!(m.phase, Phase::NavigatingNext);
        let Effect::Persist(saved) = &fx[1] else { unreachable!() };
        assert_eq!(saved.matches.len(), 2);
        assert_eq!(saved.pages_scraped, 1);
        assert_eq!(saved.next_url.as_deref(), Some("u2"));
    }

    #[test]
    fn last_page_clears_and_finalizes() {
        let (m, fx) = step(scanning("u1"), Event::Scanned { matches: vec![rec(1)], next: None });
        assert_eq!(kinds(&fx), ["status", "clear", "finalize"]);
        let (m2, _) = step(m, Event::Finalized);
        assert_eq!(m2.phase, Phase::Done);
    }

    #[test]
    fn self_link_and_page_cap_finalize() {
        let (_, fx) = step(scanning("u1"), Event::Scanned { matches: vec![], next: Some(s!("u1")) });
        assert_eq!(kinds(&fx), ["status", "clear", "finalize"]);

        let mut capped = scanning("u1");
        capped.max_pages = 1;
        let (_, fx) = step(capped, Event::Scanned { matches: vec![], next: Some(s!("u2")) });
        assert_eq!(kinds(&fx), ["status", "clear", "finalize"]);
    }

    #[test]
    fn resume_keeps_accumulated_matches() {
        let persisted = HarvestState { matches: vec![rec(1), rec(2), rec(3)], pages_scraped: 1, next_url: Some(s!("u2")) };
        let (m, fx) = step(machine(), Event::Resume { state: persisted, url: s!("u2") });
        assert_eq!(kinds(&fx), ["status", "expand"]);
        assert_eq!(m.state.matches.len(), 3);
        assert_eq!(m.state.next_url, None);
    }

    #[test]
    fn failure_with_matches_finalizes_partially() {
        let (m, _) = step(scanning("u1"), Event::Scanned { matches: vec![rec(1)], next: Some(s!("u2")) });
        let (m, fx) = step(m, Event::Failed { message: s!("navigation failed") });
        assert_eq!(kinds(&fx), ["status", "clear", "finalize"]);
        assert_eq!(m.phase, Phase::Finalizing);
    }

    #[test]
    fn failure_without_matches_is_terminal() {
        let (m, fx) = step(scanning("u1"), Event::Failed { message: s!("boom") });
        assert_eq!(kinds(&fx), ["status", "clear", "fail"]);
        assert_eq!(m.phase, Phase::Failed);
        assert_eq!(fx[2], Effect::ReportFailure(s!("boom")));
    }

    #[test]
    fn unreachable_resume_page_still_hands_off() {
        let persisted = HarvestState { matches: vec![rec(1)], pages_scraped: 1, next_url: Some(s!("u2")) };
        let (m, fx) = step(machine(), Event::ResumeFailed { state: persisted, message: s!("404") });
        assert_eq!(kinds(&fx), ["status", "clear", "finalize"]);
        assert_eq!(m.phase, Phase::Finalizing);

        let (m, fx) = step(machine(), Event::ResumeFailed { state: HarvestState::default(), message: s!("404") });
        assert_eq!(kinds(&fx), ["status", "clear", "fail"]);
        assert_eq!(m.phase, Phase::Failed);
    }

    #[test]
    fn stray_events_are_ignored() {
        let (m, fx) = step(machine(), Event::Finalized);
        assert!(fx.is_empty());
        assert_eq!(m.phase, Phase::Idle);
    }

    #[test]
    fn vocabularies() {
        assert!(Vocabulary::Primary.matches("  View   Results "));
        assert!(Vocabulary::Primary.matches("Expand all rounds"));
        assert!(!Vocabulary::Primary.matches("Results"));
        assert!(Vocabulary::Secondary.matches("Match details"));
        assert!(!Vocabulary::Secondary.matches("Log out"));
    }
}
