use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::errors::ZoweError;
use super::session::Session;
use crate::storage::profile::Profile;

/// What a remote command returned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResponse {
    pub success: bool,
    /// Possibly multi-line.
    pub command_response: String,
}

/// Executes a command through a session.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Profile type this transport serves, e.g. `"zosmf"`.
    fn profile_type_name(&self) -> &str;

    async fn execute(&self, session: &Session, command: &str)
        -> Result<CommandResponse, ZoweError>;
}

/// Command transports keyed by the profile type they serve.
///
/// Registering a second transport for the same type replaces the first.
#[derive(Clone, Default)]
pub struct ApiRegister {
    transports: HashMap<String, Arc<dyn CommandTransport>>,
}

impl ApiRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, transport: Arc<dyn CommandTransport>) {
        let type_name = transport.profile_type_name().to_string();
        debug!("Registering command transport for '{}'", type_name);
        self.transports.insert(type_name, transport);
    }

    pub fn transport_for(&self, profile: &Profile) -> Result<Arc<dyn CommandTransport>, ZoweError> {
        self.transports
            .get(profile.type_name())
            .cloned()
            .ok_or_else(|| {
                ZoweError::Transport(format!(
                    "No command API registered for profile type '{}'",
                    profile.type_name()
                ))
            })
    }

    /// Sorted.
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.transports.keys().cloned().collect();
        types.sort();
        types
    }
}
