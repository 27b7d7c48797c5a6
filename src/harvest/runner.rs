// src/harvest/runner.rs
//
// Executes what the machine asks for against the real ports. One call runs
// until the harvest either navigates away (and this process may be torn
// down), finishes, or fails.

use std::collections::VecDeque;
use std::fs;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use scraper::Html;

use super::browser::Browser;
use super::machine::{step, Effect, Event, Machine};
use super::pager::find_next_page;
use crate::clipboard::Clipboard;
use crate::config::consts::MAX_FRAGMENT_CHARS;
use crate::config::options::HarvestOptions;
use crate::data::{HarvestState, MatchRecord};
use crate::error::HarvestError;
use crate::payload;
use crate::progress::{CompletionReport, Progress};
use crate::specs::page::scan_document;
use crate::store::StateStore;

pub trait Sleeper {
    fn sleep(&self, d: Duration);
}

pub struct ThreadSleeper;
impl Sleeper for ThreadSleeper {
    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            thread::sleep(d);
        }
    }
}

/// Returns immediately; waits are only counted.
#[derive(Debug, Default)]
pub struct InstantSleeper {
    pub waits: std::cell::Cell<usize>,
}
impl Sleeper for InstantSleeper {
    fn sleep(&self, _d: Duration) {
        self.waits.set(self.waits.get() + 1);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// State was persisted and the browser moved to this URL.
    Navigated(String),
    Done(CompletionReport),
    Failed(String),
    /// `resume` found nothing persisted.
    NothingToResume,
}

pub struct Harvester<'a> {
    pub browser: &'a mut dyn Browser,
    pub store: &'a mut dyn StateStore,
    pub clipboard: &'a mut dyn Clipboard,
    pub progress: &'a mut dyn Progress,
    pub sleeper: &'a dyn Sleeper,
    pub opts: &'a HarvestOptions,
    /// Fallback date for events that do not show one.
    pub today: NaiveDate,
}

impl<'a> Harvester<'a> {
    /// New harvest from `url`, clobbering any persisted one.
    pub fn start(&mut self, url: &str) -> Outcome {
        if let Err(e) = self.store.clear() {
            loge!("Harvest: could not clear old state: {e}");
        }
        if let Err(e) = self.browser.navigate(url) {
            let msg = format!("could not open {url}: {e}");
            loge!("Harvest: {msg}");
            self.progress.failed(&msg);
            return Outcome::Failed(msg);
        }
        self.sleeper.sleep(self.opts.wait.navigate);
        logf!("Harvest: starting at {url}");
        self.drive(Event::Start { url: s!(url) })
    }

    /// Continue a persisted harvest; loads its page first if the browser is elsewhere.
    pub fn resume(&mut self) -> Outcome {
        let state = match self.store.load() {
            Ok(Some(state)) => state,
            Ok(None) => return Outcome::NothingToResume,
            Err(e) => {
                // The state may still be there; leave it for the next attempt
                let msg = format!("could not read persisted state: {e}");
                loge!("Harvest: {msg}");
                self.progress.failed(&msg);
                return Outcome::Failed(msg);
            }
        };
        let Some(url) = state.next_url.clone().or_else(|| self.browser.current_url().map(String::from)) else {
            loge!("Harvest: persisted state has no page to resume on");
            return self.drive_from(state, None);
        };
        logf!(
            "Harvest: resuming with {} matches after {} pages at {url}",
            state.matches.len(),
            state.pages_scraped
        );
        if self.browser.current_url() != Some(url.as_str()) {
            if let Err(e) = self.browser.navigate(&url) {
                return self.drive_from(state, Some(format!("could not open {url}: {e}")));
            }
            self.sleeper.sleep(self.opts.wait.navigate);
        }
        self.drive(Event::Resume { state, url })
    }

    /// The persisted page cannot be loaded: the machine decides partial vs terminal.
    fn drive_from(&mut self, state: HarvestState, failure: Option<String>) -> Outcome {
        let message = failure.unwrap_or_else(|| s!("nowhere to resume"));
        self.drive(Event::ResumeFailed { state, message })
    }

    fn drive(&mut self, first: Event) -> Outcome {
        let machine = Machine::new(self.opts.max_pages, self.opts.wait);
        self.run(machine, first)
    }

    fn run(&mut self, mut machine: Machine, first: Event) -> Outcome {
        let mut queue = VecDeque::from([first]);
        let mut outcome = None;

        while let Some(event) = queue.pop_front() {
            let (next, effects) = step(machine, event);
            machine = next;
            for effect in effects {
                match self.execute(effect, &machine, &mut outcome) {
                    Ok(Some(ev)) => queue.push_back(ev),
                    Ok(None) => {}
                    Err(e) => {
                        loge!("Harvest: {} failed: {e}", machine.phase.label());
                        queue.push_back(Event::Failed { message: e.to_string() });
                        break;
                    }
                }
            }
        }

        outcome.unwrap_or_else(|| {
            let msg = format!("harvest stalled while {}", machine.phase.label());
            loge!("Harvest: {msg}");
            Outcome::Failed(msg)
        })
    }

    fn execute(
        &mut self,
        effect: Effect,
        machine: &Machine,
        outcome: &mut Option<Outcome>,
    ) -> Result<Option<Event>, HarvestError> {
        match effect {
            Effect::Status { status, detail, match_count } => {
                logd!("Harvest: [{status}] {detail} ({match_count} matches)");
                self.progress.status(&status, &detail, match_count);
                Ok(None)
            }
            Effect::Expand { vocabulary, settle } => {
                let sleeper = self.sleeper;
                let count = self.browser.expand(vocabulary, &mut || sleeper.sleep(settle))?;
                Ok(Some(Event::Expanded { count }))
            }
            Effect::AwaitSettle(d) => {
                self.sleeper.sleep(d);
                Ok(None)
            }
            Effect::Scan => {
                let (matches, next) = self.scan(&machine.current_url)?;
                Ok(Some(Event::Scanned { matches, next }))
            }
            Effect::Persist(state) => {
                self.store.save(&state)?;
                Ok(None)
            }
            Effect::ClearPersisted => {
                // Not worth failing a finished harvest over
                if let Err(e) = self.store.clear() {
                    loge!("Harvest: could not clear persisted state: {e}");
                }
                Ok(None)
            }
            Effect::Navigate(url) => {
                self.browser.navigate(&url)?;
                logf!("Harvest: navigated to {url}");
                *outcome = Some(Outcome::Navigated(url));
                Ok(None)
            }
            Effect::Finalize(state) => {
                let report = self.finalize(&state)?;
                self.progress.complete(&report);
                *outcome = Some(Outcome::Done(report));
                Ok(Some(Event::Finalized))
            }
            Effect::ReportFailure(message) => {
                loge!("Harvest: failed: {message}");
                self.progress.failed(&message);
                *outcome = Some(Outcome::Failed(message));
                Ok(None)
            }
        }
    }

    fn scan(&self, current_url: &str) -> Result<(Vec<MatchRecord>, Option<String>), HarvestError> {
        let html = self.browser.page_html()?;
        let doc = Html::parse_document(html);
        let matches = scan_document(&doc, self.today);
        let next = find_next_page(&doc, current_url);
        logf!("Harvest: {} matches on {current_url}; next: {next:?}", matches.len());
        Ok((matches, next))
    }

    fn finalize(&mut self, state: &HarvestState) -> Result<CompletionReport, HarvestError> {
        let payload = payload::encode(&state.matches, &self.opts.import_url, MAX_FRAGMENT_CHARS)?;

        let clipboard_ok = match self.clipboard.write_text(&payload.pretty) {
            Ok(()) => true,
            Err(e) => {
                loge!("Harvest: clipboard unavailable: {e}");
                false
            }
        };

        if let Some(out) = &self.opts.out {
            if let Some(parent) = out.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(out, &payload.pretty)?;
            logf!("Harvest: wrote {} matches to {}", state.matches.len(), out.display());
        }

        logf!(
            "Harvest: done; {} matches over {} pages, fragment {}",
            state.matches.len(),
            state.pages_scraped,
            if payload.fragment_included { "attached" } else { "omitted" }
        );
        Ok(CompletionReport {
            match_count: state.matches.len(),
            pages_scraped: state.pages_scraped,
            import_url: payload.url,
            clipboard_ok,
        })
    }
}

/// True once the machine can make no further progress in this process.
pub fn is_terminal(outcome: &Outcome) -> bool {
    !matches!(outcome, Outcome::Navigated(_))
}
