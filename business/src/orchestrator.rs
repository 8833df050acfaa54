//! Bridges row-level intents to [`UserCommands`].
//!
//! Role and status changes follow different completion rules:
//!
//! - [`ActionOrchestrator::change_role`] awaits the command and only closes the
//!   row's edit mode after the backend confirmed with `200 OK`. A rejected edit
//!   therefore never looks committed.
//! - [`ActionOrchestrator::change_status`] is a one-click toggle with nothing
//!   to protect in the UI. It is dispatched and forgotten.
//!
//! Neither operation retries or de-duplicates. Two role changes for the same
//! row resolve independently and the last one to resolve decides the row.

use std::sync::Arc;

use log::{error, info};

use crate::commands::{Credential, UserCommands};
use crate::model::{Role, UserId, UserStatus};

/// How a role change ended, as far as the row is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChangeOutcome {
    /// Confirmed by the backend; the edit-mode callback ran.
    Committed,
    /// Rejected or failed; the row stays in edit mode.
    Rejected,
}

#[derive(Debug, Clone)]
pub struct ActionOrchestrator {
    commands: Arc<dyn UserCommands>,
    credential: Credential,
}

impl ActionOrchestrator {
    pub fn new(commands: Arc<dyn UserCommands>, credential: Credential) -> Self {
        Self {
            commands,
            credential,
        }
    }

    /// Commit `role` for `id`, calling `close_edit_mode` only on confirmed success.
    ///
    /// Failures are logged and swallowed; they never reach the caller.
    pub async fn change_role<F>(&self, id: UserId, role: Role, close_edit_mode: F) -> RoleChangeOutcome
    where
        F: FnOnce() + Send,
    {
        match self.commands.update_role(id, role, &self.credential).await {
            Ok(reply) if reply.is_ok() => {
                info!("Role of user {id} changed to {role}");
                close_edit_mode();
                RoleChangeOutcome::Committed
            }
            Ok(reply) => {
                error!(
                    "Failed to update user role: user {id} to {role}, server replied {}",
                    reply.status
                );
                RoleChangeOutcome::Rejected
            }
            Err(err) => {
                error!("Failed to update user role: user {id} to {role}: {err}");
                RoleChangeOutcome::Rejected
            }
        }
    }

    /// Dispatch a status change for `id` without waiting for it.
    pub fn change_status(&self, id: UserId, status: UserStatus) {
        info!("Requesting status {status} for user {id}");
        self.commands.update_status(id, status, &self.credential);
    }
}
