//! Command implementations for `modctl`.
//!
//! Each subcommand is implemented in its own module.

pub mod completions;
pub mod list;
pub mod set_role;
pub mod set_status;

pub use completions::generate_completions;
pub use list::run_list;
pub use set_role::run_set_role;
pub use set_status::run_set_status;
