//! Business layer of the user moderation console.
//!
//! Filtering of the loaded user collection, the role/status action
//! orchestration, and the HTTP collaborators that back them.

mod client;
mod commands;
mod config;
mod console;
mod edit_mode;
mod filter;
mod list_state;
mod model;
mod orchestrator;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use client::{CSRF_HEADER, HttpModerationClient, fetch_users};
pub use commands::{CommandError, CommandReply, Credential, UserCommands, UsersLoader};
pub use config::{API_BASE_URL_ENV, CREDENTIAL_ENV, ConfigError, ConsoleConfig};
pub use console::{ModerationConsole, moderation_store};
pub use edit_mode::{RowEditMode, RowEditModes};
pub use filter::{FilterCriteria, FilteredUsers, RoleFilter, StatusFilter, filter_users};
pub use list_state::{ModerationListState, SettingsStatus};
pub use model::{OperatorIdentity, Role, UserId, UserRecord, UserStatus};
pub use orchestrator::{ActionOrchestrator, RoleChangeOutcome};
