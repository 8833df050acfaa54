use clap::{Parser, Subcommand};
use clap_complete::Shell;
use moderation_business::{
    API_BASE_URL_ENV, CREDENTIAL_ENV, Role, RoleFilter, StatusFilter, UserStatus,
};

#[derive(Parser)]
#[command(name = "modctl")]
#[command(about = "Moderate users from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the moderation API
    #[arg(long, global = true, env = API_BASE_URL_ENV)]
    pub api_base_url: Option<String>,

    /// CSRF token sent with every request
    #[arg(long, global = true, env = CREDENTIAL_ENV, hide_env_values = true)]
    pub credential: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List users matching the given filters
    List {
        /// Case-insensitive text matched against email and full name
        #[arg(long, short = 's', default_value = "")]
        search: String,

        /// Filter by status: all, active, blocked
        #[arg(long, default_value = "all", value_parser = parse_status_filter)]
        status: StatusFilter,

        /// Filter by role: all, admin, moderator, user
        #[arg(long, short = 'r', default_value = "all", value_parser = parse_role_filter)]
        role: RoleFilter,

        /// Print the users as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Change the role of a user; fails unless the server confirms
    SetRole {
        /// User ID
        id: u64,

        /// admin, moderator or user
        #[arg(value_parser = parse_role)]
        role: Role,
    },
    /// Block or unblock a user
    SetStatus {
        /// User ID
        id: u64,

        /// active or blocked
        #[arg(value_parser = parse_status)]
        status: UserStatus,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Filters are lenient: anything unknown means no constraint.
fn parse_status_filter(value: &str) -> Result<StatusFilter, String> {
    Ok(StatusFilter::parse_lenient(value))
}

fn parse_role_filter(value: &str) -> Result<RoleFilter, String> {
    Ok(RoleFilter::parse_lenient(value))
}

fn parse_role(value: &str) -> Result<Role, String> {
    Role::parse(value)
        .ok_or_else(|| format!("unknown role `{value}`, expected admin, moderator or user"))
}

fn parse_status(value: &str) -> Result<UserStatus, String> {
    UserStatus::parse(value)
        .ok_or_else(|| format!("unknown status `{value}`, expected active or blocked"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_defaults_to_no_constraint() {
        let cli = Cli::try_parse_from(["modctl", "list"]).unwrap();
        let Commands::List {
            search,
            status,
            role,
            json,
        } = cli.command
        else {
            panic!("expected list");
        };
        assert_eq!(search, "");
        assert_eq!(status, StatusFilter::All);
        assert_eq!(role, RoleFilter::All);
        assert!(!json);
    }

    #[test]
    fn test_list_filters_are_lenient() {
        let cli =
            Cli::try_parse_from(["modctl", "list", "--status", "blocked", "--role", "superuser"])
                .unwrap();
        let Commands::List { status, role, .. } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(status, StatusFilter::Blocked);
        assert_eq!(role, RoleFilter::All);
    }

    #[test]
    fn test_set_role_is_strict() {
        let cli = Cli::try_parse_from(["modctl", "set-role", "7", "Moderator"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::SetRole {
                id: 7,
                role: Role::Moderator
            }
        ));

        assert!(Cli::try_parse_from(["modctl", "set-role", "7", "owner"]).is_err());
    }

    #[test]
    fn test_set_status_parses_both_states() {
        let cli = Cli::try_parse_from(["modctl", "set-status", "3", "blocked"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::SetStatus {
                id: 3,
                status: UserStatus::Blocked
            }
        ));
        assert!(Cli::try_parse_from(["modctl", "set-status", "3", "banned"]).is_err());
    }

    #[test]
    fn test_global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "modctl",
            "list",
            "--api-base-url",
            "http://localhost:3000",
            "--credential",
            "token",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.api_base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(cli.credential.as_deref(), Some("token"));
        assert!(cli.verbose);
    }
}
