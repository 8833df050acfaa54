//! Interfaces of the collaborators the console drives.
//!
//! The console never talks to the network itself. It triggers the collection
//! loader once and hands role/status intents to [`UserCommands`]. Whatever
//! implements these traits is responsible for reconciling the store.

use std::fmt::{Debug, Formatter};

use async_trait::async_trait;
use http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{Role, UserId, UserStatus};

/// Opaque authorization token, passed through to every command unchanged.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the transport only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// What a role-update command resolved with. Only `status` is inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandReply {
    pub status: StatusCode,
}

impl CommandReply {
    pub fn new(status: StatusCode) -> Self {
        Self { status }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server replied with status {0}")]
    Status(StatusCode),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("no async runtime to run `{0}`")]
    NoRuntime(&'static str),
}

impl From<reqwest::Error> for CommandError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Populates the user collection. Invoked once, when the console mounts.
pub trait UsersLoader: Send + Sync + Debug {
    /// Start loading; completion is reported through the store, never returned.
    fn request_users(&self);
}

/// Remote authority for role and status changes.
#[async_trait]
pub trait UserCommands: Send + Sync + Debug {
    /// Ask for `role` on `id` and wait for the verdict.
    async fn update_role(
        &self,
        id: UserId,
        role: Role,
        credential: &Credential,
    ) -> Result<CommandReply, CommandError>;

    /// Ask for `status` on `id`. Returns immediately; the outcome is not reported back.
    fn update_status(&self, id: UserId, status: UserStatus, credential: &Credential);
}
