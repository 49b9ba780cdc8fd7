// src/application/mod.rs
//
// Application Layer - operator commands
//
// ARCHITECTURE:
// - Sits above services and repositories
// - Boundary between the command line and the watchlist store
// - Every command returns a plain human-readable message

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{operator_message, ToOperatorMessage};
pub use state::AppState;
