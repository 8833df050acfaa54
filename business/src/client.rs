//! `reqwest` implementation of the console collaborators.
//!
//! Endpoints:
//! - `GET   {base}/users` returns the whole collection as a JSON array.
//! - `PATCH {base}/users/{id}` with `{"user":{"role":..}}` or `{"user":{"status":..}}`.
//!
//! Every request carries the credential in `X-CSRF-Token`. Results are never
//! written to the store directly: they are sent through an [`Updater`] and
//! land on the owner's next `sync`.

use async_trait::async_trait;
use http::StatusCode;
use log::{error, info, warn};
use moderation_states::{StateCtx, Tasks, Updater};
use reqwest::{Client, RequestBuilder, header};
use serde::Serialize;

use crate::commands::{CommandError, CommandReply, Credential, UserCommands, UsersLoader};
use crate::config::ConsoleConfig;
use crate::list_state::{ModerationListState, SettingsStatus};
use crate::model::{Role, UserId, UserRecord, UserStatus};

pub const CSRF_HEADER: &str = "X-CSRF-Token";

#[derive(Debug, Default, Serialize)]
struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<UserStatus>,
}

#[derive(Debug, Serialize)]
struct UserPatchRequest {
    user: UserPatch,
}

fn with_headers(request: RequestBuilder, credential: &Credential) -> RequestBuilder {
    let request = request.header(header::ACCEPT, "application/json");
    if credential.is_empty() {
        request
    } else {
        request.header(CSRF_HEADER, credential.expose())
    }
}

/// GET `{base}/users`
pub async fn fetch_users(
    client: &Client,
    api_base_url: &str,
    credential: &Credential,
) -> Result<Vec<UserRecord>, CommandError> {
    let url = format!("{api_base_url}/users");
    let response = with_headers(client.get(&url), credential).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(CommandError::Status(status));
    }

    Ok(response.json().await?)
}

/// PATCH `{base}/users/{id}`, returning whatever status the server replied with.
async fn patch_user(
    client: &Client,
    api_base_url: &str,
    id: UserId,
    patch: UserPatch,
    credential: &Credential,
) -> Result<StatusCode, CommandError> {
    let url = format!("{api_base_url}/users/{id}");
    let response = with_headers(client.patch(&url), credential)
        .header(header::CONTENT_TYPE, "application/json")
        .json(&UserPatchRequest { user: patch })
        .send()
        .await?;

    Ok(response.status())
}

/// Talks to the moderation backend and reports back through the store.
#[derive(Debug, Clone)]
pub struct HttpModerationClient {
    client: Client,
    api_base_url: String,
    credential: Credential,
    updater: Updater,
    tasks: Tasks,
}

impl HttpModerationClient {
    /// Create a client reporting into `ctx`.
    pub fn new(config: &ConsoleConfig, ctx: &StateCtx) -> Self {
        Self::with_client(Client::new(), config, ctx)
    }

    pub fn with_client(client: Client, config: &ConsoleConfig, ctx: &StateCtx) -> Self {
        Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            credential: config.credential.clone(),
            updater: ctx.updater(),
            tasks: ctx.tasks().clone(),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

impl UsersLoader for HttpModerationClient {
    fn request_users(&self) {
        self.updater
            .update::<ModerationListState>(ModerationListState::start_loading);

        let client = self.client.clone();
        let api_base_url = self.api_base_url.clone();
        let credential = self.credential.clone();
        let updater = self.updater.clone();

        let spawned = self.tasks.spawn("fetch users", async move {
            match fetch_users(&client, &api_base_url, &credential).await {
                Ok(users) => {
                    info!("Loaded {} users", users.len());
                    updater.update::<ModerationListState>(move |list| list.finish_loading(users));
                }
                Err(err) => {
                    error!("Failed to fetch users: {err}");
                    let message = err.to_string();
                    updater.update::<ModerationListState>(move |list| list.fail_loading(message));
                }
            }
        });

        if !spawned {
            let message = CommandError::NoRuntime("fetch users").to_string();
            self.updater
                .update::<ModerationListState>(move |list| list.fail_loading(message));
        }
    }
}

#[async_trait]
impl UserCommands for HttpModerationClient {
    async fn update_role(
        &self,
        id: UserId,
        role: Role,
        credential: &Credential,
    ) -> Result<CommandReply, CommandError> {
        self.updater.update::<SettingsStatus>(SettingsStatus::start_update);

        let patch = UserPatch {
            role: Some(role),
            ..Default::default()
        };
        match patch_user(&self.client, &self.api_base_url, id, patch, credential).await {
            Ok(status) if status == StatusCode::OK => {
                self.updater.update::<ModerationListState>(move |list| {
                    if !list.apply_role(id, role) {
                        warn!("Role committed for user {id} which is not in the list");
                    }
                });
                self.updater.update::<SettingsStatus>(SettingsStatus::finish_update);
                Ok(CommandReply::ok())
            }
            Ok(status) => {
                let message = CommandError::Status(status).to_string();
                self.updater
                    .update::<SettingsStatus>(move |settings| settings.fail_update(message));
                Ok(CommandReply::new(status))
            }
            Err(err) => {
                let message = err.to_string();
                self.updater
                    .update::<SettingsStatus>(move |settings| settings.fail_update(message));
                Err(err)
            }
        }
    }

    fn update_status(&self, id: UserId, status: UserStatus, credential: &Credential) {
        self.updater.update::<SettingsStatus>(SettingsStatus::start_update);

        let client = self.client.clone();
        let api_base_url = self.api_base_url.clone();
        let credential = credential.clone();
        let updater = self.updater.clone();

        let spawned = self.tasks.spawn("update user status", async move {
            let patch = UserPatch {
                status: Some(status),
                ..Default::default()
            };
            let result = patch_user(&client, &api_base_url, id, patch, &credential).await;
            let failure = match result {
                Ok(code) if code == StatusCode::OK => {
                    info!("Status of user {id} changed to {status}");
                    updater.update::<ModerationListState>(move |list| {
                        list.apply_status(id, status);
                    });
                    updater.update::<SettingsStatus>(SettingsStatus::finish_update);
                    return;
                }
                Ok(code) => CommandError::Status(code),
                Err(err) => err,
            };
            error!("Failed to update user status: user {id} to {status}: {failure}");
            let message = failure.to_string();
            updater.update::<SettingsStatus>(move |settings| settings.fail_update(message));
        });

        if !spawned {
            let message = CommandError::NoRuntime("update user status").to_string();
            self.updater
                .update::<SettingsStatus>(move |settings| settings.fail_update(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_body_only_carries_the_changed_field() {
        let role = UserPatchRequest {
            user: UserPatch {
                role: Some(Role::Moderator),
                ..Default::default()
            },
        };
        let status = UserPatchRequest {
            user: UserPatch {
                status: Some(UserStatus::Blocked),
                ..Default::default()
            },
        };

        assert_eq!(
            serde_json::to_string(&role).unwrap(),
            r#"{"user":{"role":"moderator"}}"#
        );
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#"{"user":{"status":"blocked"}}"#
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let ctx = StateCtx::new();
        let config = ConsoleConfig::new("http://localhost:3000/", Credential::default());
        let client = HttpModerationClient::new(&config, &ctx);
        assert_eq!(client.api_base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_status_update_without_runtime_records_error() {
        let mut ctx = StateCtx::new();
        ctx.add_state(SettingsStatus::default());
        let config = ConsoleConfig::new("http://localhost:3000", Credential::default());
        let client = HttpModerationClient::new(&config, &ctx);

        client.update_status(UserId(1), UserStatus::Blocked, &Credential::default());
        ctx.sync();

        let settings = ctx.state::<SettingsStatus>();
        assert!(!settings.are_updating);
        assert!(settings.error.is_some());
    }
}
