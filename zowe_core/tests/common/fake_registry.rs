//! In-memory profile registry with a scripted credential prompt.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use zowe_core::core::Prompt;
use zowe_core::storage::{Credentials, Profile, ProfileKind, ProfileListing, ProfileRegistry};
use zowe_core::ZoweError;

pub struct FakeRegistry {
    profiles: Mutex<Vec<Profile>>,
    default: Option<String>,
    credential_answers: Mutex<VecDeque<Prompt<Credentials>>>,

    pub prompt_calls: Mutex<Vec<String>>,
    /// Every profile handed to `update_profile`.
    pub updates: Mutex<Vec<Profile>>,
}

impl FakeRegistry {
    pub fn new(profiles: Vec<Profile>, default: Option<&str>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
            default: default.map(str::to_string),
            credential_answers: Mutex::new(VecDeque::new()),
            prompt_calls: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    /// "firstName" with credentials, "secondName" without; "firstName" is the default.
    pub fn two_profiles() -> Self {
        Self::new(
            vec![zosmf("firstName", Some(("firstName", "12345"))), zosmf("secondName", None)],
            Some("firstName"),
        )
    }

    pub fn push_credentials(&self, answer: Prompt<Credentials>) {
        self.credential_answers.lock().unwrap().push_back(answer);
    }

    pub fn prompt_count(&self) -> usize {
        self.prompt_calls.lock().unwrap().len()
    }

    pub fn updates(&self) -> Vec<Profile> {
        self.updates.lock().unwrap().clone()
    }
}

pub fn zosmf(name: &str, credentials: Option<(&str, &str)>) -> Profile {
    profile(name, ProfileKind::Zosmf, credentials)
}

pub fn profile(name: &str, kind: ProfileKind, credentials: Option<(&str, &str)>) -> Profile {
    let profile = Profile::new(name, kind, "mf.example.com");
    match credentials {
        Some((user, password)) => profile.with_credentials(Credentials {
            user: user.into(),
            password: password.into(),
        }),
        None => profile,
    }
}

#[async_trait]
impl ProfileRegistry for FakeRegistry {
    async fn list_profiles(&self) -> Result<ProfileListing, ZoweError> {
        Ok(ProfileListing {
            all: self.profiles.lock().unwrap().clone(),
            default: self.default.clone(),
        })
    }

    async fn resolve_by_name(&self, name: &str) -> Result<Profile, ZoweError> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| ZoweError::ProfileNotFound(name.to_string()))
    }

    async fn prompt_credentials(&self, profile: &Profile) -> Prompt<Credentials> {
        self.prompt_calls.lock().unwrap().push(profile.name.clone());
        self.credential_answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Prompt::Cancelled)
    }

    async fn update_profile(&self, profile: &Profile) -> Result<(), ZoweError> {
        self.updates.lock().unwrap().push(profile.clone());
        let mut profiles = self.profiles.lock().unwrap();
        match profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile.clone(),
            None => profiles.push(profile.clone()),
        }
        Ok(())
    }
}
