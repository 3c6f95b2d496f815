// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_exec
//!
//! Hand the terminal off from a full screen TUI app to a blocking external command (an
//! editor, a shell, a pager), and get it back when the command is done.
//!
//! 1. The app builds a request with [`exec_process()`] (for a [`std::process::Command`])
//!    or [`exec()`] (for anything that implements [`ExecCommand`]), and enqueues it with
//!    [`request_exec()`].
//! 2. The app's main event loop passes every [`HandoffSignal`] it receives to
//!    [`ExecController::handle_signal()`]. For an exec request, the controller:
//!    - releases the [`HostTerminal`] (raw mode, alternate screen, mouse capture, etc),
//!    - wires the command's stdin, stdout, and stderr to the host's devices through a
//!      [`ReaderProxy`] and two [`WriterProxy`]s,
//!    - runs the command until it exits,
//!    - restores the [`HostTerminal`].
//! 3. The outcome is passed to the request's [`ExecCallback`], and the message that it
//!    returns comes back on the same channel as [`HandoffSignal::Message`].
//!
//! The proxies are byte transparent. They only let you observe what flows through, eg:
//! to count bytes or to record a session.
//!
//! ```no_run
//! use std::process::Command;
//! use r3bl_exec::{CHANNEL_WIDTH, CrosstermHostTerminal, ExecController, HandoffSignal,
//!                 OsExecCommand, TerminalModes, request_exec};
//!
//! #[derive(Debug)]
//! enum AppMsg {
//!     EditorClosed(Option<String>),
//! }
//!
//! # fn main() -> miette::Result<()> {
//! let (sender, mut receiver) = tokio::sync::mpsc::channel::<HandoffSignal<AppMsg>>(CHANNEL_WIDTH);
//! let mut host_terminal = CrosstermHostTerminal::new(TerminalModes::default());
//! host_terminal.enter()?;
//! let mut controller = ExecController::new(host_terminal, sender.clone());
//!
//! let mut vim = Command::new("vim");
//! vim.arg("notes.md");
//! request_exec(
//!     &sender,
//!     OsExecCommand::new(vim).inherit_terminal(),
//!     Some(Box::new(|result: miette::Result<()>| {
//!         AppMsg::EditorClosed(result.err().map(|it| it.to_string()))
//!     })),
//! );
//!
//! while let Some(signal) = receiver.blocking_recv() {
//!     if let Some(AppMsg::EditorClosed(_)) = controller.handle_signal(signal) {
//!         break;
//!     }
//! }
//! controller.host_terminal.exit()?;
//! # Ok(())
//! # }
//! ```

// Enforce strict error handling in production library code only. Tests and examples are
// allowed to use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide a flat public API).
pub mod exec_command;
pub mod handoff;
pub mod log;
pub mod stream_proxy;
pub mod terminal_io;
pub mod test_fixtures;

// Re-export.
pub use exec_command::*;
pub use handoff::*;
pub use log::*;
pub use stream_proxy::*;
pub use terminal_io::*;
pub use test_fixtures::*;
