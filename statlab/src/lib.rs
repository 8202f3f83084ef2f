// statlab/src/lib.rs
//! # statlab CLI and Web Server
//!
//! This crate wires `statlab-core` to the outside world: an axum server that
//! hosts the interactive pages, and a `compute` command that runs a single
//! recompute from a JSON payload.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod server;
pub mod ui;

pub use server::{router, AppState};
