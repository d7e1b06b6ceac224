use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::connections::errors::ZoweError;

const KEYRING_SERVICE: &str = "zowe_rs";

/// Where profile passwords live.
pub trait SecretStore: Send + Sync {
    fn get(&self, profile: &str) -> Result<Option<String>, ZoweError>;
    fn set(&self, profile: &str, password: &str) -> Result<(), ZoweError>;
    /// `Ok(true)` if something was removed.
    fn delete(&self, profile: &str) -> Result<bool, ZoweError>;
}

/// Passwords in the OS keyring, one entry per profile.
#[derive(Debug, Clone, Default)]
pub struct KeyringSecrets;

impl KeyringSecrets {
    fn entry(profile: &str) -> Result<keyring::Entry, ZoweError> {
        Ok(keyring::Entry::new(KEYRING_SERVICE, profile)?)
    }
}

impl SecretStore for KeyringSecrets {
    fn get(&self, profile: &str) -> Result<Option<String>, ZoweError> {
        match Self::entry(profile)?.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => {
                debug!("No keyring entry for '{}'", profile);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, profile: &str, password: &str) -> Result<(), ZoweError> {
        Self::entry(profile)?.set_password(password)?;
        Ok(())
    }

    fn delete(&self, profile: &str) -> Result<bool, ZoweError> {
        match Self::entry(profile)?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local secrets, for tests and `--no-keyring` style setups.
#[derive(Debug, Clone, Default)]
pub struct MemorySecrets {
    inner: Arc<std::sync::Mutex<HashMap<String, String>>>,
}

impl MemorySecrets {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_map<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> Result<T, ZoweError> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| ZoweError::Other("secret map poisoned".into()))?;
        Ok(f(&mut map))
    }
}

impl SecretStore for MemorySecrets {
    fn get(&self, profile: &str) -> Result<Option<String>, ZoweError> {
        self.with_map(|m| m.get(profile).cloned())
    }

    fn set(&self, profile: &str, password: &str) -> Result<(), ZoweError> {
        self.with_map(|m| {
            m.insert(profile.to_string(), password.to_string());
        })
    }

    fn delete(&self, profile: &str) -> Result<bool, ZoweError> {
        self.with_map(|m| m.remove(profile).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_secrets_round_trip() {
        let secrets = MemorySecrets::new();
        assert_eq!(secrets.get("prod").unwrap(), None);
        secrets.set("prod", "pw").unwrap();
        assert_eq!(secrets.get("prod").unwrap().as_deref(), Some("pw"));
        assert!(secrets.delete("prod").unwrap());
        assert!(!secrets.delete("prod").unwrap());
    }
}
