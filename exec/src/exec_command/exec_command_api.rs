// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BoxedReader, BoxedWriter, ReaderProxy, WriterProxy};

/// Anything that can be run in a blocking fashion while it owns the host's terminal.
///
/// [`crate::OsExecCommand`] is the built-in implementation, it runs a
/// [`std::process::Command`]. Implement this trait yourself to run something else, eg: a
/// test double that never spawns a process.
///
/// # The "only fill an empty slot" rule for the setters
///
/// [`crate::ExecController`] always calls [`Self::set_stdin()`], [`Self::set_stdout()`],
/// and [`Self::set_stderr()`] with its (bound) proxies. An implementation must only
/// accept the given stream when it doesn't already have one for that slot. If the
/// caller pre-configured a stream (eg: to inherit the terminal directly), it must be
/// left untouched. This is how a caller opts out of proxying, one stream at a time.
pub trait ExecCommand: Send {
    /// Run to completion on the calling thread. Must block until the external process
    /// has exited, or has failed to start. Must not deliver anything in the background.
    ///
    /// # Errors
    ///
    /// Failing to start and exiting unsuccessfully are both reported as an error. Callers
    /// that need more detail can downcast the report, eg: to [`crate::RunError`].
    fn run(&mut self) -> miette::Result<()>;

    /// Set stdin, only if it isn't set already.
    fn set_stdin(&mut self, reader: BoxedReader);

    /// Set stdout, only if it isn't set already.
    fn set_stdout(&mut self, writer: BoxedWriter);

    /// Set stderr, only if it isn't set already.
    fn set_stderr(&mut self, writer: BoxedWriter);

    /// The proxies this command wants installed for stdin, stdout, and stderr. A command
    /// with no taps returns proxies with no-op handlers.
    fn get_proxies(&self) -> (ReaderProxy, WriterProxy, WriterProxy);
}

/// A command that is consumed exactly once by [`crate::ExecController::exec()`].
pub type BoxedExecCommand = Box<dyn ExecCommand>;
