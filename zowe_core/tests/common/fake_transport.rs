//! A command transport that answers from a queue and records every call.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use zowe_core::{CommandResponse, CommandTransport, Session, ZoweError};

pub struct FakeTransport {
    type_name: &'static str,
    answers: Mutex<VecDeque<Result<CommandResponse, ZoweError>>>,
    /// `(profile name, command)` per call.
    pub executed: Mutex<Vec<(String, String)>>,
}

impl FakeTransport {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            answers: Mutex::new(VecDeque::new()),
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(&self, text: &str) -> &Self {
        self.answers.lock().unwrap().push_back(Ok(CommandResponse {
            success: true,
            command_response: text.to_string(),
        }));
        self
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.answers
            .lock()
            .unwrap()
            .push_back(Err(ZoweError::Transport(message.to_string())));
        self
    }

    pub fn executed(&self) -> Vec<(String, String)> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandTransport for FakeTransport {
    fn profile_type_name(&self) -> &str {
        self.type_name
    }

    async fn execute(&self, session: &Session, command: &str) -> Result<CommandResponse, ZoweError> {
        self.executed
            .lock()
            .unwrap()
            .push((session.profile_name().to_string(), command.to_string()));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(CommandResponse {
                    success: true,
                    command_response: "fake response".into(),
                })
            })
    }
}
