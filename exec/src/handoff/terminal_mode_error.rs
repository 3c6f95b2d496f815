// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

/// Which [`crate::CrosstermHostTerminal`] operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TerminalOp {
    Enter,
    Release,
    Restore,
    Exit,
}

/// Failures while switching the host's terminal modes.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TerminalModeError {
    /// Writing the escape sequences (alternate screen, mouse capture, cursor, etc) or
    /// flushing them failed.
    #[error("Failed to write terminal mode sequences ({op})")]
    #[diagnostic(
        code(r3bl_exec::terminal::write_sequences),
        help("The output device might be closed, or the terminal went away")
    )]
    WriteSequences {
        op: TerminalOp,
        #[source]
        source: io::Error,
    },

    /// Enabling or disabling raw mode failed.
    #[error("Failed to switch raw mode ({op})")]
    #[diagnostic(
        code(r3bl_exec::terminal::raw_mode),
        help("Make sure that the app is running in an interactive terminal")
    )]
    RawMode {
        op: TerminalOp,
        #[source]
        source: io::Error,
    },
}
