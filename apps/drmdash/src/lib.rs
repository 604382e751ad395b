//! # drmdash
//!
//! Library half of the drmdash binary: configuration, the HTTP API and the
//! CLI commands. Exposed as a library so integration tests can build a
//! router without binding a socket.

pub mod api;
pub mod cli;
pub mod config;
