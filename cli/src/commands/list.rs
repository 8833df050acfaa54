//! List users command.

use anyhow::{Context as _, Result, bail};
use moderation_business::{ConsoleConfig, FilterCriteria, ModerationConsole, UserRecord};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::output::Output;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&UserRecord> for UserRow {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.0,
            email: user.email.clone(),
            name: user.full_name.clone().unwrap_or_default(),
            role: user.role.to_string(),
            status: user.status.to_string(),
        }
    }
}

/// Load every user once and return the ones matching `criteria`, in server order.
pub async fn load_users(config: &ConsoleConfig, criteria: FilterCriteria) -> Result<Vec<UserRecord>> {
    let mut console = ModerationConsole::with_http(config);
    console.mount();
    console.settle().await;

    if let Some(error) = &console.list().error {
        bail!("Failed to load users: {error}");
    }

    console.set_search_text(criteria.search_text);
    console.set_status_filter(criteria.status_filter);
    console.set_role_filter(criteria.role_filter);

    Ok(console
        .visible_users()
        .unwrap_or_default()
        .into_iter()
        .cloned()
        .collect())
}

fn render_table(users: &[UserRecord]) -> String {
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.to_string()
}

#[instrument(skip_all, name = "list", fields(status = criteria.status_filter.as_str(), role = criteria.role_filter.as_str()))]
pub async fn run_list(config: &ConsoleConfig, criteria: FilterCriteria, json: bool) -> Result<()> {
    let out = Output::new();
    let users = load_users(config, criteria).await?;

    if json {
        out.print(serde_json::to_string_pretty(&users).context("Failed to encode users")?);
        return Ok(());
    }

    if users.is_empty() {
        out.dim("No users match the given filters.");
    } else {
        out.print(render_table(&users));
    }
    out.total(users.len());
    Ok(())
}
