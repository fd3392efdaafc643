//! Fetch a GitHub user's public activity through a client that paces itself
//! by the poll-interval and rate-limit headers GitHub returns.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod digest;
pub mod domain;
pub mod logging;
pub mod report;
pub mod result;
