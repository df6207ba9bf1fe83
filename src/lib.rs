//! StatusHawk Console - terminal client for the StatusHawk uptime-monitoring service
//!
//! This library provides the session lifecycle, typed API client, and
//! query-cache layer behind the `statushawk` command-line console.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod query;
pub mod session;
