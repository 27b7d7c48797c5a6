// src/progress.rs

/// What the user needs to see once a harvest has been handed off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionReport {
    pub match_count: usize,
    pub pages_scraped: u32,
    /// Hand-off URL, with the `#ext=` fragment when it fit.
    pub import_url: String,
    /// The pretty JSON made it onto the clipboard.
    pub clipboard_ok: bool,
}

/// Lightweight status reporting for the harvest loop.
/// Frontends implement this to surface what is going on to users.
pub trait Progress {
    /// Called at every state transition.
    fn status(&mut self, _status: &str, _detail: &str, _match_count: usize) {}

    /// Called once, after the payload was handed off.
    fn complete(&mut self, _report: &CompletionReport) {}

    /// Terminal failure with nothing worth handing off.
    fn failed(&mut self, _message: &str) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Keeps everything it is told; handy for assertions.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub statuses: Vec<(String, String, usize)>,
    pub completed: Option<CompletionReport>,
    pub failure: Option<String>,
}

impl Progress for RecordingProgress {
    fn status(&mut self, status: &str, detail: &str, match_count: usize) {
        self.statuses.push((s!(status), s!(detail), match_count));
    }

    fn complete(&mut self, report: &CompletionReport) {
        self.completed = Some(report.clone());
    }

    fn failed(&mut self, message: &str) {
        self.failure = Some(s!(message));
    }
}
