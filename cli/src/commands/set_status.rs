//! Block or unblock a user.

use std::sync::Arc;

use anyhow::Result;
use moderation_business::{
    ActionOrchestrator, ConsoleConfig, HttpModerationClient, SettingsStatus, UserId, UserStatus,
    moderation_store,
};
use tracing::instrument;

use crate::output::Output;

/// Dispatch a status change, wait for it to drain and return the request error, if any.
pub async fn change_status(config: &ConsoleConfig, id: UserId, status: UserStatus) -> Option<String> {
    let mut ctx = moderation_store();
    let client = Arc::new(HttpModerationClient::new(config, &ctx));
    let orchestrator = ActionOrchestrator::new(client, config.credential.clone());

    orchestrator.change_status(id, status);
    ctx.settle().await;

    ctx.state::<SettingsStatus>().error.clone()
}

#[instrument(skip_all, name = "set_status", fields(id = id, status = %status))]
pub async fn run_set_status(config: &ConsoleConfig, id: u64, status: UserStatus) -> Result<()> {
    let out = Output::new();

    match change_status(config, UserId(id), status).await {
        None => {
            out.success(format!("User {id} is now {status}"));
            Ok(())
        }
        Some(error) => {
            out.error(format!("Status of user {id} was not changed: {error}"));
            std::process::exit(1);
        }
    }
}
