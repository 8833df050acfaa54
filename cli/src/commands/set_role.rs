//! Change a user's role.

use std::sync::Arc;

use anyhow::Result;
use moderation_business::{
    ActionOrchestrator, ConsoleConfig, HttpModerationClient, Role, RoleChangeOutcome,
    SettingsStatus, UserId, moderation_store,
};
use tracing::{debug, instrument};

use crate::output::Output;

/// Run a gated role change and report how it ended, plus any request error.
pub async fn change_role(
    config: &ConsoleConfig,
    id: UserId,
    role: Role,
) -> (RoleChangeOutcome, Option<String>) {
    let mut ctx = moderation_store();
    let client = Arc::new(HttpModerationClient::new(config, &ctx));
    let orchestrator = ActionOrchestrator::new(client, config.credential.clone());

    let outcome = orchestrator
        .change_role(id, role, || debug!("Role change for user {id} confirmed"))
        .await;

    ctx.sync();
    (outcome, ctx.state::<SettingsStatus>().error.clone())
}

#[instrument(skip_all, name = "set_role", fields(id = id, role = %role))]
pub async fn run_set_role(config: &ConsoleConfig, id: u64, role: Role) -> Result<()> {
    let out = Output::new();

    match change_role(config, UserId(id), role).await {
        (RoleChangeOutcome::Committed, _) => {
            out.success(format!("User {id} is now {role}"));
            Ok(())
        }
        (RoleChangeOutcome::Rejected, error) => {
            let reason = error.unwrap_or_else(|| "rejected by the server".to_owned());
            out.error(format!("Role of user {id} was not changed: {reason}"));
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use moderation_business::Credential;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn server(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/users/5"))
            .and(header("X-CSRF-Token", "token"))
            .and(body_json(serde_json::json!({"user": {"role": "moderator"}})))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn config(server: &MockServer) -> ConsoleConfig {
        ConsoleConfig::new(server.uri(), Credential::new("token"))
    }

    #[tokio::test]
    async fn test_ok_reply_commits() {
        let server = server(200).await;
        let (outcome, error) = change_role(&config(&server), UserId(5), Role::Moderator).await;
        assert_eq!(outcome, RoleChangeOutcome::Committed);
        assert_eq!(error, None);
    }

    #[tokio::test]
    async fn test_created_is_not_ok() {
        let server = server(201).await;
        let (outcome, error) = change_role(&config(&server), UserId(5), Role::Moderator).await;
        assert_eq!(outcome, RoleChangeOutcome::Rejected);
        assert!(error.is_some());
    }
}
