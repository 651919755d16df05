//! Athena - interactive and batch console for AWS Athena.
//!
//! This library exposes the core modules for use in integration tests.

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod interrupt;
pub mod logging;
pub mod output;
pub mod query;
pub mod session;
pub mod shell;
