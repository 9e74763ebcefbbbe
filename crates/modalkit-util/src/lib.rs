//! Shared utilities for modalkit.
//!
//! This crate provides common utilities used across the modalkit workspace:
//! - ULID-based identifier generation for views and dialog flows
//! - Logging setup with tracing

pub mod id;
pub mod log;

pub use id::{IdPrefix, Identifier};
pub use log::{LogConfig, LogLevel};
