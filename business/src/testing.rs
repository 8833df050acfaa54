//! In-memory collaborators for tests.
//!
//! Available inside this crate's tests and, with the `test-utils` feature, to
//! downstream crates (`moderation-ui`, `moderation-cli`).

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use http::StatusCode;
use moderation_states::Updater;

use crate::commands::{CommandError, CommandReply, Credential, UserCommands, UsersLoader};
use crate::list_state::ModerationListState;
use crate::model::{Role, UserId, UserRecord, UserStatus};

/// The fixture used across the console tests.
pub fn sample_users() -> Vec<UserRecord> {
    vec![
        UserRecord::new(1, "alice@x.com", Role::Admin, UserStatus::Active).with_full_name("Alice"),
        UserRecord::new(2, "bob@x.com", Role::User, UserStatus::Blocked),
        UserRecord::new(3, "carol@x.com", Role::Moderator, UserStatus::Active)
            .with_full_name("Carol"),
    ]
}

/// Counts load requests and optionally answers them with a fixed collection.
#[derive(Debug, Default)]
pub struct ScriptedLoader {
    requests: AtomicUsize,
    serve: Option<(Updater, Vec<UserRecord>)>,
}

impl ScriptedLoader {
    /// A loader that never answers, leaving the list loading.
    pub fn silent() -> Self {
        Self::default()
    }

    /// A loader that immediately publishes `users` through `updater`.
    pub fn serving(updater: Updater, users: Vec<UserRecord>) -> Self {
        Self {
            requests: AtomicUsize::new(0),
            serve: Some((updater, users)),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl UsersLoader for ScriptedLoader {
    fn request_users(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some((updater, users)) = &self.serve {
            let users = users.clone();
            updater.update::<ModerationListState>(move |list| list.finish_loading(users));
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scripted answer for the next `update_role` call.
#[derive(Debug, Clone, Copy)]
pub enum RoleReply {
    Ok,
    Status(StatusCode),
    Fail(fn() -> CommandError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Role {
        id: UserId,
        role: Role,
        credential: String,
    },
    Status {
        id: UserId,
        status: UserStatus,
        credential: String,
    },
}

/// Records every command and answers role changes from a script.
///
/// An empty script answers `200 OK`. With [`ScriptedCommands::reporting_to`]
/// successful commands are also applied to the list, like the HTTP client does.
#[derive(Debug, Default)]
pub struct ScriptedCommands {
    script: Mutex<VecDeque<RoleReply>>,
    calls: Mutex<Vec<RecordedCall>>,
    updater: Option<Updater>,
}

impl ScriptedCommands {
    pub fn reporting_to(updater: Updater) -> Self {
        Self {
            updater: Some(updater),
            ..Default::default()
        }
    }

    /// Queue the reply of a future `update_role` call.
    pub fn script_role(&self, reply: RoleReply) {
        lock(&self.script).push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: RecordedCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl UserCommands for ScriptedCommands {
    async fn update_role(
        &self,
        id: UserId,
        role: Role,
        credential: &Credential,
    ) -> Result<CommandReply, CommandError> {
        self.record(RecordedCall::Role {
            id,
            role,
            credential: credential.expose().to_owned(),
        });
        let reply = lock(&self.script).pop_front().unwrap_or(RoleReply::Ok);
        // Let concurrent callers interleave like real requests would.
        tokio::task::yield_now().await;

        match reply {
            RoleReply::Ok => {
                if let Some(updater) = &self.updater {
                    updater.update::<ModerationListState>(move |list| {
                        list.apply_role(id, role);
                    });
                }
                Ok(CommandReply::ok())
            }
            RoleReply::Status(status) => Ok(CommandReply::new(status)),
            RoleReply::Fail(error) => Err(error()),
        }
    }

    fn update_status(&self, id: UserId, status: UserStatus, credential: &Credential) {
        self.record(RecordedCall::Status {
            id,
            status,
            credential: credential.expose().to_owned(),
        });
        if let Some(updater) = &self.updater {
            updater.update::<ModerationListState>(move |list| {
                list.apply_status(id, status);
            });
        }
    }
}
