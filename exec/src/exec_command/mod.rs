// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod exec_command_api;
pub mod os_exec_command;
pub mod run_error;
pub mod stdio_source;
mod stdin_pump;

// Re-export.
pub use exec_command_api::*;
pub use os_exec_command::*;
pub use run_error::*;
pub use stdio_source::*;
