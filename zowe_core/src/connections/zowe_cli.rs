//! Console commands for `zosmf` profiles, delegated to the Zowe CLI.
//!
//! The session's endpoint and credentials travel as `ZOWE_OPT_*`
//! environment variables so the password never shows up in a process list.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use tokio::process::Command;

use super::errors::ZoweError;
use super::session::Session;
use super::transport::{CommandResponse, CommandTransport};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliEnvelope {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    stderr: String,
    #[serde(default)]
    data: Option<ConsoleData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsoleData {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    command_response: String,
}

#[derive(Debug, Clone)]
pub struct ZoweCliTransport {
    program: PathBuf,
}

impl ZoweCliTransport {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Uses `configured` if given, else looks `zowe` up on the PATH.
    pub fn locate(configured: Option<PathBuf>) -> Result<Self, ZoweError> {
        if let Some(program) = configured {
            return Ok(Self::new(program));
        }
        let program = which::which("zowe").map_err(|e| {
            ZoweError::Transport(format!("Zowe CLI not found on PATH: {}", e))
        })?;
        info!("Using Zowe CLI at {:?}", program);
        Ok(Self::new(program))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn arguments(command: &str) -> Vec<String> {
        vec![
            "zos-console".into(),
            "issue".into(),
            "command".into(),
            command.into(),
            "--response-format-json".into(),
        ]
    }

    fn environment(session: &Session) -> Vec<(&'static str, String)> {
        vec![
            ("ZOWE_OPT_HOST", session.host().to_string()),
            ("ZOWE_OPT_PORT", session.port().to_string()),
            ("ZOWE_OPT_USER", session.user().to_string()),
            ("ZOWE_OPT_PASSWORD", session.password().to_string()),
            (
                "ZOWE_OPT_REJECT_UNAUTHORIZED",
                session.reject_unauthorized().to_string(),
            ),
        ]
    }
}

/// Turn the CLI's `--response-format-json` output into a response.
fn parse_response(stdout: &str) -> Result<CommandResponse, ZoweError> {
    let envelope: CliEnvelope = serde_json::from_str(stdout.trim())?;
    if !envelope.success {
        let message = [envelope.message.trim(), envelope.stderr.trim()]
            .into_iter()
            .find(|m| !m.is_empty())
            .unwrap_or("Zowe CLI reported a failure without a message")
            .to_string();
        return Err(ZoweError::Transport(message));
    }
    let data = envelope.data.unwrap_or(ConsoleData {
        success: None,
        command_response: String::new(),
    });
    Ok(CommandResponse {
        success: data.success.unwrap_or(true),
        command_response: data.command_response,
    })
}

#[async_trait]
impl CommandTransport for ZoweCliTransport {
    fn profile_type_name(&self) -> &str {
        "zosmf"
    }

    async fn execute(&self, session: &Session, command: &str) -> Result<CommandResponse, ZoweError> {
        debug!("Running {:?} for '{}'", self.program, session.profile_name());
        let output = Command::new(&self.program)
            .args(Self::arguments(command))
            .envs(Self::environment(session))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ZoweError::Transport(format!("Could not run {}: {}", self.program.display(), e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_response(&stdout) {
            Ok(response) => Ok(response),
            // Non-JSON output on failure: the CLI itself broke, report its stderr.
            Err(ZoweError::Format(_)) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ZoweError::Transport(format!(
                    "Zowe CLI exited with {}: {}",
                    output.status,
                    stderr.trim()
                )))
            }
            Err(e) => Err(e),
        }
    }
}
