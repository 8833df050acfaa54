//! Owned state store for the moderation console.
//!
//! Screens never share ambient mutable globals. They own a [`StateCtx`],
//! read immutable borrows of its slots, and change it through explicit
//! updates: directly via [`StateCtx::update`] or, from background tasks,
//! through an [`Updater`] whose messages are applied on [`StateCtx::sync`].

mod ctx;
mod error;
mod state;
mod task;

pub use ctx::StateCtx;
pub use error::Error;
pub use state::{State, Updater};
pub use task::Tasks;
