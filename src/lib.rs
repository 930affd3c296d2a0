// Quiz engine shared by the terminal front-end, integration tests and benchmarks.
// The binary entry point is main.rs; it owns the terminal UI modules.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod session;
