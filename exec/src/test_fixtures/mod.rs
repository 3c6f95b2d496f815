// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Test doubles for the host side (devices, terminal) and the command side of a hand
//! off. They never touch the real terminal and never spawn a process.

// Attach.
pub mod call_counter;
pub mod input_device_ext;
pub mod mock_exec_command;
pub mod mock_host_terminal;
pub mod output_device_ext;
pub mod stdin_mock;
pub mod stdout_mock;

// Re-export.
pub use call_counter::*;
pub use input_device_ext::*;
pub use mock_exec_command::*;
pub use mock_host_terminal::*;
pub use output_device_ext::*;
pub use stdin_mock::*;
pub use stdout_mock::*;
