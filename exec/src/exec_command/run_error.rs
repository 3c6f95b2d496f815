// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io, process::ExitStatus};

/// Why [`crate::OsExecCommand::run()`] failed. It is returned wrapped in a
/// [`miette::Report`], so callers that only care about success or failure don't have to
/// deal with it. To get at the exit code, downcast the report:
///
/// ```
/// use r3bl_exec::RunError;
///
/// fn exit_code(report: &miette::Report) -> Option<i32> {
///     report.downcast_ref::<RunError>().and_then(RunError::exit_code)
/// }
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum RunError {
    /// The program could not be spawned (eg: binary missing, permission denied).
    #[error("Failed to start {program}")]
    #[diagnostic(
        code(r3bl_exec::run::failed_to_start),
        help("Check that the program exists, is on the PATH, and is executable")
    )]
    FailedToStart {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program ran, and exited with a non zero exit code (or was killed by a
    /// signal).
    #[error("{program} exited unsuccessfully ({status})")]
    #[diagnostic(code(r3bl_exec::run::exited_unsuccessfully))]
    ExitedUnsuccessfully { program: String, status: ExitStatus },

    /// Waiting for the program, or pumping one of its streams, failed.
    #[error("I/O error while running {program} ({what})")]
    #[diagnostic(code(r3bl_exec::run::io))]
    Io {
        program: String,
        what: &'static str,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    /// The exit code, if the program ran and exited on its own.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunError::ExitedUnsuccessfully { status, .. } => status.code(),
            RunError::FailedToStart { .. } | RunError::Io { .. } => None,
        }
    }
}
