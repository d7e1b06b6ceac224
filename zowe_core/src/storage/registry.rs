use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::config::{keys, ConfigStore};
use super::profile::{Credentials, Profile};
use super::secrets::{MemorySecrets, SecretStore};
use super::store::ProfileStore;
use crate::connections::errors::ZoweError;
use crate::core::prompt::Prompt;
use crate::ui::presentation::{InputOptions, Presentation};

/// Every profile plus the name of the default one, if any.
#[derive(Debug, Clone, Default)]
pub struct ProfileListing {
    pub all: Vec<Profile>,
    pub default: Option<String>,
}

impl ProfileListing {
    pub fn names(&self) -> Vec<String> {
        self.all.iter().map(|p| p.name.clone()).collect()
    }

    pub fn default_index(&self) -> Option<usize> {
        let default = self.default.as_deref()?;
        self.all.iter().position(|p| p.name == default)
    }
}

/// Source of profiles and the credential prompting that goes with them.
#[async_trait]
pub trait ProfileRegistry: Send + Sync {
    async fn list_profiles(&self) -> Result<ProfileListing, ZoweError>;

    /// The full profile, credentials merged in where they are stored.
    async fn resolve_by_name(&self, name: &str) -> Result<Profile, ZoweError>;

    async fn prompt_credentials(&self, profile: &Profile) -> Prompt<Credentials>;

    /// Persist `profile`, including its password.
    async fn update_profile(&self, profile: &Profile) -> Result<(), ZoweError>;
}

/// Profiles on disk, passwords in a [`SecretStore`], prompts through the
/// presentation surface.
///
/// Passwords the secret store refuses are kept in memory for the rest of the
/// process instead.
#[derive(Clone)]
pub struct StoreRegistry {
    store: ProfileStore,
    secrets: Arc<dyn SecretStore>,
    unsaved: MemorySecrets,
    config: ConfigStore,
    presentation: Arc<dyn Presentation>,
}

impl StoreRegistry {
    pub fn new(
        store: ProfileStore,
        secrets: Arc<dyn SecretStore>,
        config: ConfigStore,
        presentation: Arc<dyn Presentation>,
    ) -> Self {
        Self {
            store,
            secrets,
            unsaved: MemorySecrets::new(),
            config,
            presentation,
        }
    }

    pub async fn set_default(&self, name: &str) -> Result<(), ZoweError> {
        self.store.load(name)?;
        self.config.update(keys::DEFAULT_PROFILE, &name).await
    }

    /// Removes the profile file, its secret and, if it was the default,
    /// the default marker. `Ok(false)` if there was no such profile.
    pub async fn delete(&self, name: &str) -> Result<bool, ZoweError> {
        let removed = self.store.delete(name)?;
        self.unsaved.delete(name)?;
        if let Err(e) = self.secrets.delete(name) {
            warn!("Could not remove stored password for '{}': {}", name, e);
        }
        if self.config.get::<String>(keys::DEFAULT_PROFILE).await.as_deref() == Some(name) {
            self.config.remove(keys::DEFAULT_PROFILE).await?;
        }
        Ok(removed)
    }
}

#[async_trait]
impl ProfileRegistry for StoreRegistry {
    async fn list_profiles(&self) -> Result<ProfileListing, ZoweError> {
        let all = self.store.list()?;
        let default = self
            .config
            .get::<String>(keys::DEFAULT_PROFILE)
            .await
            .filter(|name| all.iter().any(|p| &p.name == name));
        debug!("Listed {} profile(s), default {:?}", all.len(), default);
        Ok(ProfileListing { all, default })
    }

    async fn resolve_by_name(&self, name: &str) -> Result<Profile, ZoweError> {
        let mut profile = self.store.load(name)?;
        if let Some(password) = self.unsaved.get(name)? {
            profile.password = Some(password);
            return Ok(profile);
        }
        match self.secrets.get(name) {
            Ok(password) => profile.password = password,
            // A locked or missing keyring just means we prompt.
            Err(e) => warn!("Password lookup for '{}' failed: {}", name, e),
        }
        Ok(profile)
    }

    async fn prompt_credentials(&self, profile: &Profile) -> Prompt<Credentials> {
        let user = match self
            .presentation
            .prompt_text(&InputOptions {
                prompt: format!("User name for profile '{}'", profile.name),
                placeholder: "User Name".into(),
                value: profile.user.clone(),
            })
            .await
        {
            Prompt::Value(user) => user.trim().to_string(),
            Prompt::Cancelled => return Prompt::Cancelled,
            Prompt::Failed(e) => return Prompt::Failed(e),
        };
        let password = match self
            .presentation
            .prompt_secret(&InputOptions {
                prompt: format!("Password for {}@{}", user, profile.host),
                placeholder: "Password".into(),
                value: None,
            })
            .await
        {
            Prompt::Value(password) => password,
            Prompt::Cancelled => return Prompt::Cancelled,
            Prompt::Failed(e) => return Prompt::Failed(e),
        };
        Prompt::Value(Credentials { user, password })
    }

    async fn update_profile(&self, profile: &Profile) -> Result<(), ZoweError> {
        self.store.save(profile)?;
        if let Some(password) = &profile.password {
            if let Err(e) = self.secrets.set(&profile.name, password) {
                warn!(
                    "Could not store password for '{}' ({}); keeping it for this session only",
                    profile.name, e
                );
                self.unsaved.set(&profile.name, password)?;
            }
        }
        info!("Profile '{}' updated", profile.name);
        Ok(())
    }
}
