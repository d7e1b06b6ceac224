//! A scripted **in‑process stand‑in** for the presentation surface and the
//! output log.
//!
//! *  Queue the answers the "user" will give with `push_pick`, `push_text`, ...
//!    An exhausted queue behaves like the user pressing Escape.
//! *  Everything the dispatcher asked or showed is recorded for assertions.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use zowe_core::core::Prompt;
use zowe_core::ui::{FilteredPick, InputOptions, OutputLog, PickOptions, Presentation};

#[derive(Default)]
pub struct ScriptedSurface {
    picks: Mutex<VecDeque<Prompt<usize>>>,
    filtered: Mutex<VecDeque<Prompt<FilteredPick>>>,
    texts: Mutex<VecDeque<Prompt<String>>>,
    secrets: Mutex<VecDeque<Prompt<String>>>,

    /// `(items, options)` of every `pick_one` call.
    pub pick_calls: Mutex<Vec<(Vec<String>, PickOptions)>>,
    pub filtered_calls: Mutex<Vec<Vec<String>>>,
    pub text_calls: Mutex<Vec<InputOptions>>,
    pub secret_calls: Mutex<Vec<InputOptions>>,
    pub notifications: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub progress: Mutex<Vec<String>>,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_pick(&self, answer: Prompt<usize>) -> &Self {
        self.picks.lock().unwrap().push_back(answer);
        self
    }

    pub fn push_filtered(&self, index: usize, filter: &str) -> &Self {
        self.filtered.lock().unwrap().push_back(Prompt::Value(FilteredPick {
            index,
            filter: filter.to_string(),
        }));
        self
    }

    pub fn push_filtered_answer(&self, answer: Prompt<FilteredPick>) -> &Self {
        self.filtered.lock().unwrap().push_back(answer);
        self
    }

    pub fn push_text(&self, answer: Prompt<String>) -> &Self {
        self.texts.lock().unwrap().push_back(answer);
        self
    }

    pub fn push_secret(&self, answer: Prompt<String>) -> &Self {
        self.secrets.lock().unwrap().push_back(answer);
        self
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn pick_calls(&self) -> Vec<(Vec<String>, PickOptions)> {
        self.pick_calls.lock().unwrap().clone()
    }

    pub fn filtered_calls(&self) -> Vec<Vec<String>> {
        self.filtered_calls.lock().unwrap().clone()
    }

    pub fn text_calls(&self) -> Vec<InputOptions> {
        self.text_calls.lock().unwrap().clone()
    }

    /// Forget recorded calls between two runs of the same scenario.
    pub fn clear_records(&self) {
        self.pick_calls.lock().unwrap().clear();
        self.filtered_calls.lock().unwrap().clear();
        self.text_calls.lock().unwrap().clear();
        self.secret_calls.lock().unwrap().clear();
        self.notifications.lock().unwrap().clear();
        self.errors.lock().unwrap().clear();
        self.progress.lock().unwrap().clear();
    }
}

fn next<T>(queue: &Mutex<VecDeque<Prompt<T>>>) -> Prompt<T> {
    queue.lock().unwrap().pop_front().unwrap_or(Prompt::Cancelled)
}

#[async_trait]
impl Presentation for ScriptedSurface {
    async fn pick_one(&self, items: &[String], options: &PickOptions) -> Prompt<usize> {
        self.pick_calls
            .lock()
            .unwrap()
            .push((items.to_vec(), options.clone()));
        next(&self.picks)
    }

    async fn pick_filtered(&self, items: &[String], _: &PickOptions) -> Prompt<FilteredPick> {
        self.filtered_calls.lock().unwrap().push(items.to_vec());
        next(&self.filtered)
    }

    async fn prompt_text(&self, options: &InputOptions) -> Prompt<String> {
        self.text_calls.lock().unwrap().push(options.clone());
        next(&self.texts)
    }

    async fn prompt_secret(&self, options: &InputOptions) -> Prompt<String> {
        self.secret_calls.lock().unwrap().push(options.clone());
        next(&self.secrets)
    }

    fn notify(&self, message: &str) {
        self.notifications.lock().unwrap().push(message.to_string());
    }

    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn progress_started(&self, label: &str) {
        self.progress.lock().unwrap().push(format!("start:{label}"));
    }

    fn progress_finished(&self, label: &str) {
        self.progress.lock().unwrap().push(format!("end:{label}"));
    }
}

/// Keeps every line written, plus how often the log was revealed.
#[derive(Default)]
pub struct RecordingLog {
    pub lines: Mutex<Vec<String>>,
    pub reveals: AtomicUsize,
}

impl RecordingLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn reveal_count(&self) -> usize {
        self.reveals.load(Ordering::SeqCst)
    }
}

impl OutputLog for RecordingLog {
    fn write_line(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }

    fn reveal(&self) {
        self.reveals.fetch_add(1, Ordering::SeqCst);
    }
}
