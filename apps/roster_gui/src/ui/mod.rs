//! UI layer: app shell, list rendering, and avatar strategies.

pub mod app;
pub mod avatar;

pub use app::RosterApp;
