use std::io::{self, Write};

use async_trait::async_trait;
use log::debug;
use zowe_core::core::Prompt;
use zowe_core::ui::{FilteredPick, InputOptions, OutputLog, PickOptions, Presentation};
use zowe_core::{HostCapability, ZoweError};

use super::picker::{read_hidden_line, run_filtered_picker, PickerResult};

/// Wrong answers tolerated by the numbered picker before it gives up.
const MAX_ATTEMPTS: usize = 3;

/// Prompts and notifications on the controlling terminal.
///
/// Everything interactive goes to stderr; command output is left to
/// [`ConsoleLog`] on stdout so it can be piped.
pub struct TerminalSurface {
    host: HostCapability,
}

impl TerminalSurface {
    pub fn new(host: HostCapability) -> Self {
        Self { host }
    }

    fn rich(&self) -> bool {
        self.host == HostCapability::RichPicker
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Index(usize),
    Cancel,
    Invalid,
}

/// Interprets an answer to the numbered picker (1-based).
fn parse_choice(input: Option<&str>, len: usize, default_index: Option<usize>) -> Choice {
    let Some(input) = input else {
        return Choice::Cancel;
    };
    let input = input.trim();
    if input.is_empty() {
        return default_index.map_or(Choice::Invalid, Choice::Index);
    }
    if input.eq_ignore_ascii_case("q") {
        return Choice::Cancel;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Choice::Index(n - 1),
        _ => Choice::Invalid,
    }
}

/// One line from stdin without its line ending; `None` at end of input.
async fn read_line() -> Result<Option<String>, ZoweError> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        let n = io::stdin().read_line(&mut line)?;
        Ok(if n == 0 {
            None
        } else {
            Some(line.trim_end_matches(['\r', '\n']).to_string())
        })
    })
    .await
    .map_err(|e| ZoweError::Other(format!("stdin reader failed: {}", e)))?
}

async fn blocking<T: Send + 'static>(
    f: impl FnOnce() -> io::Result<T> + Send + 'static,
) -> Result<T, ZoweError> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ZoweError::Other(format!("terminal worker failed: {}", e)))?
        .map_err(ZoweError::from)
}

fn flush_prompt(text: &str) {
    let mut err = io::stderr();
    let _ = write!(err, "{text}");
    let _ = err.flush();
}

impl TerminalSurface {
    async fn numbered_pick(&self, items: &[String], options: &PickOptions) -> Prompt<usize> {
        let mut listing = format!("{}\n", options.placeholder);
        for (i, item) in items.iter().enumerate() {
            let marker = if Some(i) == options.default_index { '*' } else { ' ' };
            listing.push_str(&format!("{marker}{:>3}) {item}\n", i + 1));
        }
        flush_prompt(&listing);

        for _ in 0..MAX_ATTEMPTS {
            flush_prompt(&format!("Choose 1-{} (q to cancel): ", items.len()));
            let answer = match read_line().await {
                Ok(answer) => answer,
                Err(e) => return Prompt::Failed(e),
            };
            match parse_choice(answer.as_deref(), items.len(), options.default_index) {
                Choice::Index(i) => return Prompt::Value(i),
                Choice::Cancel => return Prompt::Cancelled,
                Choice::Invalid => eprintln!("Not a valid choice."),
            }
        }
        Prompt::Cancelled
    }

    async fn interactive_pick(
        &self,
        items: &[String],
        options: &PickOptions,
        pin_first: bool,
    ) -> Prompt<FilteredPick> {
        let items_owned = items.to_vec();
        let placeholder = options.placeholder.clone();
        let default_index = options.default_index;
        let result = blocking(move || {
            run_filtered_picker(&items_owned, &placeholder, default_index, pin_first)
        })
        .await;
        match result {
            Ok(PickerResult::Picked { index, filter }) => {
                Prompt::Value(FilteredPick { index, filter })
            }
            Ok(PickerResult::Cancelled) => Prompt::Cancelled,
            Err(e) => Prompt::Failed(e),
        }
    }
}

#[async_trait]
impl Presentation for TerminalSurface {
    async fn pick_one(&self, items: &[String], options: &PickOptions) -> Prompt<usize> {
        if self.rich() {
            self.interactive_pick(items, options, false)
                .await
                .map(|pick| pick.index)
        } else {
            self.numbered_pick(items, options).await
        }
    }

    async fn pick_filtered(&self, items: &[String], options: &PickOptions) -> Prompt<FilteredPick> {
        if self.rich() {
            self.interactive_pick(items, options, true).await
        } else {
            self.numbered_pick(items, options).await.map(|index| FilteredPick {
                index,
                filter: String::new(),
            })
        }
    }

    async fn prompt_text(&self, options: &InputOptions) -> Prompt<String> {
        let mut question = options.prompt.clone();
        if !options.placeholder.is_empty() {
            question.push_str(&format!(" ({})", options.placeholder));
        }
        if let Some(value) = &options.value {
            question.push_str(&format!(" [{value}]"));
        }
        flush_prompt(&format!("{question}: "));

        match read_line().await {
            Ok(Some(line)) if line.trim().is_empty() => Prompt::from_text(options.value.clone()),
            Ok(line) => Prompt::from_text(line),
            Err(e) => Prompt::Failed(e),
        }
    }

    async fn prompt_secret(&self, options: &InputOptions) -> Prompt<String> {
        if !self.rich() {
            // Piped input: nothing to hide from.
            flush_prompt(&format!("{}: ", options.prompt));
            return match read_line().await {
                Ok(line) => Prompt::from_text(line),
                Err(e) => Prompt::Failed(e),
            };
        }
        let prompt = options.prompt.clone();
        match blocking(move || read_hidden_line(&prompt)).await {
            Ok(line) => Prompt::from_text(line),
            Err(e) => Prompt::Failed(e),
        }
    }

    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }

    fn show_error(&self, message: &str) {
        eprintln!("Error: {message}");
    }

    fn progress_started(&self, label: &str) {
        eprintln!("{label}");
    }

    fn progress_finished(&self, label: &str) {
        debug!("Finished: {label}");
    }
}

/// Command output on stdout.
#[derive(Debug, Default)]
pub struct ConsoleLog;

impl OutputLog for ConsoleLog {
    fn write_line(&self, text: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{text}");
    }

    fn reveal(&self) {
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_answers() {
        assert_eq!(parse_choice(Some("2"), 3, None), Choice::Index(1));
        assert_eq!(parse_choice(Some(" 3 "), 3, None), Choice::Index(2));
        assert_eq!(parse_choice(Some("4"), 3, None), Choice::Invalid);
        assert_eq!(parse_choice(Some("0"), 3, None), Choice::Invalid);
        assert_eq!(parse_choice(Some("abc"), 3, None), Choice::Invalid);
    }

    #[test]
    fn empty_answer_takes_the_default() {
        assert_eq!(parse_choice(Some(""), 3, Some(1)), Choice::Index(1));
        assert_eq!(parse_choice(Some(""), 3, None), Choice::Invalid);
    }

    #[test]
    fn q_and_end_of_input_cancel() {
        assert_eq!(parse_choice(Some("Q"), 3, Some(0)), Choice::Cancel);
        assert_eq!(parse_choice(None, 3, Some(0)), Choice::Cancel);
    }
}
