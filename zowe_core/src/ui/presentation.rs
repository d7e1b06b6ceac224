use async_trait::async_trait;

use crate::core::prompt::Prompt;

/// What the hosting UI can do when asking for a command.
///
/// Resolved once at startup and handed to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCapability {
    /// A picker the user can type into to filter, or to start a new entry.
    RichPicker,
    /// Plain pickers and line prompts only.
    Restricted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickOptions {
    pub placeholder: String,
    /// Highlighted when the picker opens.
    pub default_index: Option<usize>,
    /// The user may dismiss the picker without choosing.
    pub cancellable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOptions {
    pub prompt: String,
    pub placeholder: String,
    /// Pre-filled text.
    pub value: Option<String>,
}

/// Result of a rich pick: the chosen row plus whatever the user had typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredPick {
    pub index: usize,
    pub filter: String,
}

/// Pickers, prompts and notifications of the hosting UI.
#[async_trait]
pub trait Presentation: Send + Sync {
    /// Single-select over `items`; yields the chosen index.
    async fn pick_one(&self, items: &[String], options: &PickOptions) -> Prompt<usize>;

    /// Single-select with a type-to-filter line. Hosts without one fall back
    /// to [`Presentation::pick_one`] with an empty filter.
    async fn pick_filtered(&self, items: &[String], options: &PickOptions) -> Prompt<FilteredPick> {
        self.pick_one(items, options).await.map(|index| FilteredPick {
            index,
            filter: String::new(),
        })
    }

    async fn prompt_text(&self, options: &InputOptions) -> Prompt<String>;

    /// Like `prompt_text`, without echoing the input.
    async fn prompt_secret(&self, options: &InputOptions) -> Prompt<String>;

    fn notify(&self, message: &str);
    fn show_error(&self, message: &str);

    fn progress_started(&self, label: &str);
    fn progress_finished(&self, label: &str);
}

/// Append-only command output.
pub trait OutputLog: Send + Sync {
    fn write_line(&self, text: &str);
    /// Bring the output into view.
    fn reveal(&self);
}
