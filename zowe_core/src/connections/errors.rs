use std::fmt::{self, Display};

/// A central error enum for everything that can go wrong between picking a
/// profile and reading a command response.
#[derive(Debug)]
pub enum ZoweError {
    IoError(std::io::Error),
    /// Malformed JSON in a profile, the settings file or a CLI response.
    Format(String),
    ProfileNotFound(String),
    InvalidProfile(String),
    /// Credential lookup or prompting failed. Displays the bare message.
    Credentials(String),
    Keyring(String),
    Session(String),
    /// The remote command could not be executed. Displays the bare message.
    Transport(String),
    Other(String),
}

/// Convert from std::io::Error.
impl From<std::io::Error> for ZoweError {
    fn from(err: std::io::Error) -> ZoweError {
        ZoweError::IoError(err)
    }
}

impl From<serde_json::Error> for ZoweError {
    fn from(err: serde_json::Error) -> Self {
        ZoweError::Format(err.to_string())
    }
}

impl From<keyring::Error> for ZoweError {
    fn from(err: keyring::Error) -> Self {
        ZoweError::Keyring(err.to_string())
    }
}

/// Without this, `?` on ssh2 calls won't work inside the SSH transport.
#[cfg(feature = "ssh")]
impl From<ssh2::Error> for ZoweError {
    fn from(err: ssh2::Error) -> Self {
        ZoweError::Transport(err.message().to_string())
    }
}

impl Display for ZoweError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoweError::IoError(e) => write!(f, "IO error: {}", e),
            ZoweError::Format(msg) => write!(f, "Format error: {}", msg),
            ZoweError::ProfileNotFound(name) => write!(f, "Profile '{}' not found", name),
            ZoweError::InvalidProfile(msg) => write!(f, "Invalid profile: {}", msg),
            ZoweError::Credentials(msg) => write!(f, "{}", msg),
            ZoweError::Keyring(msg) => write!(f, "Keyring error: {}", msg),
            ZoweError::Session(msg) => write!(f, "Session error: {}", msg),
            ZoweError::Transport(msg) => write!(f, "{}", msg),
            ZoweError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl std::error::Error for ZoweError {}
