// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{Read, Write};

use miette::IntoDiagnostic;

use crate::{BoxedReader,
            BoxedWriter,
            CallCounter,
            CallLog,
            ExecCommand,
            ReaderProxy,
            StdoutMock,
            WriterProxy};

/// An [`ExecCommand`] that doesn't spawn anything. When run, it:
/// 1. Counts the call (see [`Self::run_counter`]).
/// 2. Optionally reads its stdin to the end, into [`Self::stdin_capture`].
/// 3. Writes the scripted bytes to its stdout and stderr.
/// 4. Fails with the scripted error message, if any.
#[allow(missing_debug_implementations)]
#[derive(Default)]
pub struct MockExecCommand {
    pub run_counter: CallCounter,
    pub call_log: CallLog,
    pub maybe_run_error: Option<String>,
    pub read_stdin_to_end: bool,
    pub stdin_capture: StdoutMock,
    pub stdout_bytes: Vec<u8>,
    pub stderr_bytes: Vec<u8>,
    pub proxies: (ReaderProxy, WriterProxy, WriterProxy),
    pub stdin: Option<BoxedReader>,
    pub stdout: Option<BoxedWriter>,
    pub stderr: Option<BoxedWriter>,
}

impl MockExecCommand {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_run_error(mut self, message: &str) -> Self {
        self.maybe_run_error = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn with_call_log(mut self, call_log: CallLog) -> Self {
        self.call_log = call_log;
        self
    }

    #[must_use]
    pub fn with_stdin_read_to_end(mut self) -> Self {
        self.read_stdin_to_end = true;
        self
    }

    #[must_use]
    pub fn with_stdout_bytes(mut self, bytes: &[u8]) -> Self {
        self.stdout_bytes = bytes.to_vec();
        self
    }

    #[must_use]
    pub fn with_stderr_bytes(mut self, bytes: &[u8]) -> Self {
        self.stderr_bytes = bytes.to_vec();
        self
    }

    #[must_use]
    pub fn with_proxies(
        mut self,
        stdin_proxy: ReaderProxy,
        stdout_proxy: WriterProxy,
        stderr_proxy: WriterProxy,
    ) -> Self {
        self.proxies = (stdin_proxy, stdout_proxy, stderr_proxy);
        self
    }

    /// Pre-configure stdout, so the proxy that gets installed later is ignored.
    #[must_use]
    pub fn with_stdout(mut self, writer: BoxedWriter) -> Self {
        self.stdout = Some(writer);
        self
    }
}

impl ExecCommand for MockExecCommand {
    fn run(&mut self) -> miette::Result<()> {
        self.run_counter.increment();
        self.call_log.push("run");

        if self.read_stdin_to_end
            && let Some(stdin) = self.stdin.as_mut()
        {
            let mut acc = vec![];
            stdin.read_to_end(&mut acc).into_diagnostic()?;
            self.stdin_capture.write_all(&acc).into_diagnostic()?;
        }

        write_scripted_bytes(self.stdout.as_mut(), &self.stdout_bytes)?;
        write_scripted_bytes(self.stderr.as_mut(), &self.stderr_bytes)?;

        match &self.maybe_run_error {
            Some(message) => Err(miette::miette!("{message}")),
            None => Ok(()),
        }
    }

    fn set_stdin(&mut self, reader: BoxedReader) {
        if self.stdin.is_none() {
            self.stdin = Some(reader);
        }
    }

    fn set_stdout(&mut self, writer: BoxedWriter) {
        if self.stdout.is_none() {
            self.stdout = Some(writer);
        }
    }

    fn set_stderr(&mut self, writer: BoxedWriter) {
        if self.stderr.is_none() {
            self.stderr = Some(writer);
        }
    }

    fn get_proxies(&self) -> (ReaderProxy, WriterProxy, WriterProxy) {
        self.proxies.clone()
    }
}

fn write_scripted_bytes(
    maybe_writer: Option<&mut BoxedWriter>,
    bytes: &[u8],
) -> miette::Result<()> {
    if let Some(writer) = maybe_writer
        && !bytes.is_empty()
    {
        writer.write_all(bytes).into_diagnostic()?;
        writer.flush().into_diagnostic()?;
    }
    Ok(())
}
