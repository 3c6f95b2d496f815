// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tracing setup for hosts that use this crate.
//!
//! While the terminal is handed off to an external command, anything written to the
//! display would land on top of the command's screen. So hosts should log to a file,
//! eg: with [`TracingConfig::new_file()`].

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use rolling_file_appender_impl::*;
pub use tracing_config::*;
pub use tracing_init::*;
