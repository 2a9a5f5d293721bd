//! Test doubles for the remote backends.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::chat::{ChatRequest, ChatTransport};

enum Script {
    Reply(String),
    Fail { status: u16, message: String },
}

/// Transport returning a canned reply and recording every request.
pub struct ScriptedTransport {
    script: Script,
    requests: Mutex<Vec<(String, ChatRequest)>>,
}

impl ScriptedTransport {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            script: Script::Reply(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self {
            script: Script::Fail {
                status,
                message: message.into(),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<(String, ChatRequest)> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, api_key: &str, request: &ChatRequest) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((api_key.to_string(), request.clone()));

        match &self.script {
            Script::Reply(reply) => Ok(reply.clone()),
            Script::Fail { status, message } => Err(Error::backend("Scripted", *status, message)),
        }
    }
}
