use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::Mutex;

use super::errors::ZoweError;
use crate::storage::profile::{Profile, ProfileKind};

/// An authenticated handle bound to one profile.
///
/// Only constructible from a profile that carries both user and password.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    profile_name: String,
    kind: ProfileKind,
    host: String,
    port: u16,
    user: String,
    password: String,
    reject_unauthorized: bool,
}

impl Session {
    /// Basic (user/password) session for `profile`.
    pub fn basic(profile: &Profile) -> Result<Self, ZoweError> {
        let credentials = profile.credentials().ok_or_else(|| {
            ZoweError::Session(format!(
                "profile '{}' has no complete user/password",
                profile.name
            ))
        })?;
        Ok(Self {
            profile_name: profile.name.clone(),
            kind: profile.kind,
            host: profile.host.clone(),
            port: profile.port,
            user: credentials.user,
            password: credentials.password,
            reject_unauthorized: profile.reject_unauthorized,
        })
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn reject_unauthorized(&self) -> bool {
        self.reject_unauthorized
    }

    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("profile_name", &self.profile_name)
            .field("kind", &self.kind)
            .field("address", &self.address())
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Hands out sessions for profiles.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn session_for(&self, profile: &Profile) -> Result<Arc<Session>, ZoweError>;
}

/// Creates sessions lazily and keeps one per profile name.
///
/// A cached session is rebuilt when the profile it was made from has
/// changed (new password, other host, ...). Cloning shares the cache.
#[derive(Clone, Default)]
pub struct SessionManager {
    inner: Arc<Mutex<HashMap<String, Arc<Session>>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached session for `profile_name`, if any.
    pub async fn forget(&self, profile_name: &str) -> bool {
        self.inner.lock().await.remove(profile_name).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionProvider for SessionManager {
    async fn session_for(&self, profile: &Profile) -> Result<Arc<Session>, ZoweError> {
        let fresh = Session::basic(profile)?;
        let mut map = self.inner.lock().await;
        if let Some(cached) = map.get(&profile.name) {
            if **cached == fresh {
                debug!("Reusing session for '{}'", profile.name);
                return Ok(Arc::clone(cached));
            }
        }
        info!("Creating session for '{}' at {}", profile.name, fresh.address());
        let session = Arc::new(fresh);
        map.insert(profile.name.clone(), Arc::clone(&session));
        Ok(session)
    }
}
