// src/application/commands/mod.rs
//
// Operator Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the command line and the store
// - Commands handle error conversion to operator messages
// - Read-modify-write sequences run under the store lock

pub mod watchlist_commands;

pub use watchlist_commands::*;
