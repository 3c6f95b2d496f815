// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Hand the host's terminal off to an external command, and get it back.
//!
//! The pieces, in the order that they are used:
//! 1. [`exec()`] or [`exec_process()`] wraps a command and an optional
//!    [`ExecCallback`] into an [`ExecRequest`].
//! 2. [`request_exec()`] enqueues it on the host's channel as [`HandoffSignal::Exec`].
//! 3. The host's main event loop hands every signal it receives to
//!    [`ExecController::handle_signal()`], which runs [`ExecController::exec()`] for
//!    an exec request: release the [`HostTerminal`], wire the proxies, run, restore.
//! 4. The callback's message comes back on the same channel as
//!    [`HandoffSignal::Message`].

// Attach.
pub mod crossterm_host_terminal;
pub mod exec_controller;
pub mod exec_request;
pub mod handoff_signal;
pub mod host_terminal;
pub mod terminal_mode_error;
pub mod terminal_modes;

// Re-export.
pub use crossterm_host_terminal::*;
pub use exec_controller::*;
pub use exec_request::*;
pub use handoff_signal::*;
pub use host_terminal::*;
pub use terminal_mode_error::*;
pub use terminal_modes::*;
