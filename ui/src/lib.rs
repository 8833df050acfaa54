//! egui front-end of the user moderation console.

#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod widgets;

pub use app::ModerationApp;
