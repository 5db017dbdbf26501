//! Controller layer: backend events and reducer-style state transitions for
//! the roster screen.

pub mod events;
pub mod state;
