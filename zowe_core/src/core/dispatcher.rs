use std::sync::Arc;

use log::{debug, error, info, warn};

use super::prompt::Prompt;
use crate::connections::errors::ZoweError;
use crate::connections::session::SessionProvider;
use crate::connections::transport::{ApiRegister, CommandResponse};
use crate::storage::history::HistoryStore;
use crate::storage::profile::Profile;
use crate::storage::registry::ProfileRegistry;
use crate::ui::presentation::{
    HostCapability, InputOptions, OutputLog, PickOptions, Presentation,
};

pub const NO_PROFILES: &str = "No profiles available";
pub const NO_SELECTION: &str = "No selection made.";
pub const NO_COMMAND: &str = "No command entered.";
pub const INVALID_CREDENTIALS: &str = "Credentials are invalid.";
pub const PROFILE_PLACEHOLDER: &str = "Select the Profile to use to submit the command";
pub const COMMAND_PLACEHOLDER: &str = "Command example: D IPLINFO";
pub const CREATE_COMMAND: &str = "\u{FF0B} Create a new Command";
pub const PROGRESS_LABEL: &str = "Issuing command...";

/// Where a run was abandoned by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelPoint {
    ProfilePicker,
    CommandPicker,
    CommandInput,
}

/// How one `issue_command` run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NoProfiles,
    Cancelled(CancelPoint),
    /// Profiles could not be listed.
    RegistryFailure,
    /// A picker or prompt itself broke (terminal gone, ...).
    PromptFailure,
    CredentialError,
    TransportFailure,
    Completed,
}

/// Picks a profile, makes sure it has credentials, gets a command (new or
/// from history) and runs it.
///
/// Build one at startup and share it by reference. Runs are independent:
/// nothing is locked across them, so two runs touching the same profile's
/// history race and the later write wins.
pub struct CommandDispatcher {
    registry: Arc<dyn ProfileRegistry>,
    sessions: Arc<dyn SessionProvider>,
    apis: ApiRegister,
    presentation: Arc<dyn Presentation>,
    output: Arc<dyn OutputLog>,
    history: HistoryStore,
    host: HostCapability,
}

/// Outcome of a step: carry on with `T` or stop with an outcome.
type Step<T> = Result<T, Outcome>;

impl CommandDispatcher {
    pub fn new(
        registry: Arc<dyn ProfileRegistry>,
        sessions: Arc<dyn SessionProvider>,
        apis: ApiRegister,
        presentation: Arc<dyn Presentation>,
        output: Arc<dyn OutputLog>,
        history: HistoryStore,
        host: HostCapability,
    ) -> Self {
        Self {
            registry,
            sessions,
            apis,
            presentation,
            output,
            history,
            host,
        }
    }

    pub fn host(&self) -> HostCapability {
        self.host
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Runs the whole interactive flow once. Never fails: cancellations end
    /// with a notification, errors with exactly one error message.
    pub async fn issue_command(&self) -> Outcome {
        match self.run().await {
            Ok(()) => Outcome::Completed,
            Err(outcome) => {
                debug!("issue_command ended early: {:?}", outcome);
                outcome
            }
        }
    }

    async fn run(&self) -> Step<()> {
        let name = self.select_profile().await?;
        let profile = self.ensure_credentials(&name).await?;
        let command = self.acquire_command(&profile).await?;
        self.dispatch(&profile, &command).await
    }

    async fn select_profile(&self) -> Step<String> {
        let listing = self.registry.list_profiles().await.map_err(|e| {
            error!("Listing profiles failed: {}", e);
            self.presentation.show_error(&e.to_string());
            Outcome::RegistryFailure
        })?;
        if listing.all.is_empty() {
            self.presentation.notify(NO_PROFILES);
            return Err(Outcome::NoProfiles);
        }

        let names = listing.names();
        let options = PickOptions {
            placeholder: PROFILE_PLACEHOLDER.into(),
            default_index: listing.default_index(),
            cancellable: true,
        };
        match self.presentation.pick_one(&names, &options).await {
            Prompt::Value(index) => match names.get(index) {
                Some(name) => Ok(name.clone()),
                None => self.cancel(NO_SELECTION, CancelPoint::ProfilePicker),
            },
            Prompt::Cancelled => self.cancel(NO_SELECTION, CancelPoint::ProfilePicker),
            Prompt::Failed(e) => Err(self.prompt_error(e)),
        }
    }

    async fn ensure_credentials(&self, name: &str) -> Step<Profile> {
        let profile = self
            .registry
            .resolve_by_name(name)
            .await
            .map_err(|e| self.credential_error(e))?;
        if profile.has_credentials() {
            return Ok(profile);
        }

        info!("Profile '{}' lacks credentials, prompting", name);
        let credentials = match self.registry.prompt_credentials(&profile).await {
            Prompt::Value(credentials) => credentials,
            Prompt::Cancelled => {
                return Err(self.credential_error(ZoweError::Credentials(
                    INVALID_CREDENTIALS.into(),
                )))
            }
            Prompt::Failed(e) => return Err(self.credential_error(e)),
        };

        let updated = profile.with_credentials(credentials);
        self.registry
            .update_profile(&updated)
            .await
            .map_err(|e| self.credential_error(e))?;
        let resolved = self
            .registry
            .resolve_by_name(name)
            .await
            .map_err(|e| self.credential_error(e))?;
        if resolved.has_credentials() {
            Ok(resolved)
        } else {
            Err(self.credential_error(ZoweError::Credentials(INVALID_CREDENTIALS.into())))
        }
    }

    async fn acquire_command(&self, profile: &Profile) -> Step<String> {
        let recent = self.history.get(&profile.name).await;

        let prefill = match self.host {
            HostCapability::RichPicker => {
                let items = Self::picker_items(&recent);
                let options = Self::command_pick_options();
                match self.presentation.pick_filtered(&items, &options).await {
                    Prompt::Value(pick) if pick.index == 0 => {
                        Some(pick.filter).filter(|f| !f.trim().is_empty())
                    }
                    Prompt::Value(pick) => return self.history_entry(&items, pick.index),
                    Prompt::Cancelled => {
                        return self.cancel(NO_SELECTION, CancelPoint::CommandPicker)
                    }
                    Prompt::Failed(e) => return Err(self.prompt_error(e)),
                }
            }
            HostCapability::Restricted if recent.is_empty() => None,
            HostCapability::Restricted => {
                let items = Self::picker_items(&recent);
                let options = Self::command_pick_options();
                match self.presentation.pick_one(&items, &options).await {
                    Prompt::Value(0) => None,
                    Prompt::Value(index) => return self.history_entry(&items, index),
                    Prompt::Cancelled => {
                        return self.cancel(NO_SELECTION, CancelPoint::CommandPicker)
                    }
                    Prompt::Failed(e) => return Err(self.prompt_error(e)),
                }
            }
        };

        let options = InputOptions {
            prompt: format!("Command to issue on '{}'", profile.name),
            placeholder: COMMAND_PLACEHOLDER.into(),
            value: prefill,
        };
        match self.presentation.prompt_text(&options).await {
            Prompt::Value(text) if !text.trim().is_empty() => Ok(text),
            Prompt::Value(_) | Prompt::Cancelled => {
                self.cancel(NO_COMMAND, CancelPoint::CommandInput)
            }
            Prompt::Failed(e) => Err(self.prompt_error(e)),
        }
    }

    async fn dispatch(&self, profile: &Profile, command: &str) -> Step<()> {
        let command = strip_slash(command);
        match self.execute(profile, command).await {
            Ok(response) => {
                if !response.success {
                    warn!("'{}' on '{}' reported failure", command, profile.name);
                }
                self.output.write_line(&format!("> {}", command));
                self.output.write_line(&response.command_response);
                self.output.reveal();
                if let Err(e) = self.history.put(&profile.name, command).await {
                    // The command ran; a history write failure is not worth an error dialog.
                    warn!("Could not save command history: {}", e);
                }
                Ok(())
            }
            Err(e) => Err(self.transport_error(e)),
        }
    }

    async fn execute(&self, profile: &Profile, command: &str) -> Result<CommandResponse, ZoweError> {
        let transport = self.apis.transport_for(profile)?;
        let session = self.sessions.session_for(profile).await?;
        info!("Issuing '{}' on '{}'", command, profile.name);

        self.presentation.progress_started(PROGRESS_LABEL);
        let result = transport.execute(&session, command).await;
        self.presentation.progress_finished(PROGRESS_LABEL);
        result
    }

    fn picker_items(recent: &[String]) -> Vec<String> {
        std::iter::once(CREATE_COMMAND.to_string())
            .chain(recent.iter().cloned())
            .collect()
    }

    fn command_pick_options() -> PickOptions {
        PickOptions {
            placeholder: COMMAND_PLACEHOLDER.into(),
            default_index: None,
            cancellable: true,
        }
    }

    fn history_entry(&self, items: &[String], index: usize) -> Step<String> {
        match items.get(index) {
            Some(label) => Ok(label.clone()),
            None => self.cancel(NO_SELECTION, CancelPoint::CommandPicker),
        }
    }

    fn cancel<T>(&self, message: &str, point: CancelPoint) -> Step<T> {
        self.presentation.notify(message);
        Err(Outcome::Cancelled(point))
    }

    fn prompt_error(&self, e: ZoweError) -> Outcome {
        error!("Prompt failed: {}", e);
        self.presentation.show_error(&e.to_string());
        Outcome::PromptFailure
    }

    fn credential_error(&self, e: ZoweError) -> Outcome {
        error!("Credential resolution failed: {}", e);
        self.presentation.show_error(&e.to_string());
        Outcome::CredentialError
    }

    fn transport_error(&self, e: ZoweError) -> Outcome {
        error!("Command failed: {}", e);
        self.presentation.show_error(&e.to_string());
        Outcome::TransportFailure
    }
}

/// Console commands are often typed with the leading slash of the MVS
/// console; the remote side wants them without.
pub fn strip_slash(command: &str) -> &str {
    command.strip_prefix('/').unwrap_or(command)
}
