use serde::{Deserialize, Serialize};

use crate::connections::errors::ZoweError;

/// Which kind of service a profile talks to.
///
/// Serialized lowercase so the JSON reads like
/// `{ "name":"lpar1", "kind":"zosmf", "host":"mf.example.com", "port":443, ... }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Zosmf,
    Ssh,
}

impl ProfileKind {
    /// The profile type name transports register themselves under.
    pub fn type_name(self) -> &'static str {
        match self {
            ProfileKind::Zosmf => "zosmf",
            ProfileKind::Ssh => "ssh",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            ProfileKind::Zosmf => 443,
            ProfileKind::Ssh => 22,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A user-named connection preset.
///
/// `password` is kept out of the JSON file; the store writes it to the
/// keyring and the registry merges it back on lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub kind: ProfileKind,
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default = "default_true")]
    pub reject_unauthorized: bool,
}

/// A complete user / password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Profile {
    pub fn new(name: impl Into<String>, kind: ProfileKind, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            host: host.into(),
            port: kind.default_port(),
            user: None,
            password: None,
            reject_unauthorized: true,
        }
    }

    /// Returns the unique, human-readable identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Both user and password are present and non-empty.
    pub fn has_credentials(&self) -> bool {
        self.credentials().is_some()
    }

    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some(Credentials {
                    user: user.clone(),
                    password: password.clone(),
                })
            }
            _ => None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.user = Some(credentials.user);
        self.password = Some(credentials.password);
        self
    }

    /// Profile names become file names and keyring entries.
    pub fn validate(&self) -> Result<(), ZoweError> {
        validate_name(&self.name)?;
        if self.host.trim().is_empty() {
            return Err(ZoweError::InvalidProfile(format!(
                "profile '{}' has no host",
                self.name
            )));
        }
        Ok(())
    }
}

/// Letters, digits, `_`, `-` and `.`, and not made of dots alone.
pub fn validate_name(name: &str) -> Result<(), ZoweError> {
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if name.is_empty() || !allowed || name.chars().all(|c| c == '.') {
        return Err(ZoweError::InvalidProfile(format!(
            "name '{}' may only contain letters, digits, '_', '-' and '.'",
            name
        )));
    }
    Ok(())
}
