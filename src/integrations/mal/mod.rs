pub mod client;

pub use client::MalClient;
