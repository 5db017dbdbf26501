//! Bridge between the UI command queue and the fetch worker.

pub mod commands;
pub mod runtime;
