// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          io::{self, Read, Write},
          process::{Child, ChildStdin, Command, Stdio},
          thread::{self, JoinHandle}};

use crate::{BoxedReader,
            BoxedWriter,
            ExecCommand,
            ReaderProxy,
            RunError,
            StdioSource,
            WriterProxy,
            fill_if_unset};

use super::stdin_pump::StdinPump;

/// Runs a [`std::process::Command`] as an [`ExecCommand`].
///
/// Each of stdin, stdout, and stderr is an explicit slot that starts out empty. A slot
/// can be pre-configured by the caller (see [`Self::with_stdin()`],
/// [`Self::inherit_terminal()`], etc), in which case the proxies that
/// [`crate::ExecController`] installs are ignored for that slot.
///
/// When [`Self::run()`] is called:
/// - A slot holding a [`Stdio`] is handed to the child as is.
/// - A slot holding a stream is connected to the child with a pipe, and a pump thread
///   copies bytes between the pipe and the stream. All the pumps are joined before
///   `run()` returns. So every byte the child wrote has gone through the stream, and
///   nothing reads the host's input after the child exits. This needs a stdin stream
///   with a file descriptor (see [`crate::InputStream`]). A stream without one is
///   copied by a detached thread that ends when the stream does.
/// - An empty slot is inherited from the host process.
///
/// ```no_run
/// use std::process::Command;
/// use r3bl_exec::{OsExecCommand, ReaderProxy, WriterProxy};
///
/// // Run the editor directly on the terminal, no proxies.
/// let vim = OsExecCommand::new(Command::new("vim")).inherit_terminal();
///
/// // Tap what `ls` writes to stdout.
/// let ls = OsExecCommand::new(Command::new("ls")).with_stdout_proxy(WriterProxy::default());
/// ```
pub struct OsExecCommand {
    pub command: Command,
    pub stdin_proxy: ReaderProxy,
    pub stdout_proxy: WriterProxy,
    pub stderr_proxy: WriterProxy,
    pub stdin: Option<StdioSource<BoxedReader>>,
    pub stdout: Option<StdioSource<BoxedWriter>>,
    pub stderr: Option<StdioSource<BoxedWriter>>,
}

impl Debug for OsExecCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsExecCommand")
            .field("command", &self.command)
            .field("stdin", &self.stdin)
            .field("stdout", &self.stdout)
            .field("stderr", &self.stderr)
            .finish_non_exhaustive()
    }
}

impl OsExecCommand {
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            command,
            stdin_proxy: ReaderProxy::default(),
            stdout_proxy: WriterProxy::default(),
            stderr_proxy: WriterProxy::default(),
            stdin: None,
            stdout: None,
            stderr: None,
        }
    }

    #[must_use]
    pub fn with_stdin_proxy(mut self, proxy: ReaderProxy) -> Self {
        self.stdin_proxy = proxy;
        self
    }

    #[must_use]
    pub fn with_stdout_proxy(mut self, proxy: WriterProxy) -> Self {
        self.stdout_proxy = proxy;
        self
    }

    #[must_use]
    pub fn with_stderr_proxy(mut self, proxy: WriterProxy) -> Self {
        self.stderr_proxy = proxy;
        self
    }

    #[must_use]
    pub fn with_stdin(mut self, stdio: Stdio) -> Self {
        self.stdin = Some(StdioSource::Stdio(stdio));
        self
    }

    #[must_use]
    pub fn with_stdout(mut self, stdio: Stdio) -> Self {
        self.stdout = Some(StdioSource::Stdio(stdio));
        self
    }

    #[must_use]
    pub fn with_stderr(mut self, stdio: Stdio) -> Self {
        self.stderr = Some(StdioSource::Stdio(stdio));
        self
    }

    /// Let the child use the host's terminal directly for all three streams. This is what
    /// you want for editors and shells that check whether stdin is a tty.
    #[must_use]
    pub fn inherit_terminal(self) -> Self {
        self.with_stdin(Stdio::inherit())
            .with_stdout(Stdio::inherit())
            .with_stderr(Stdio::inherit())
    }

    fn program(&self) -> String {
        self.command.get_program().to_string_lossy().into_owned()
    }
}

impl ExecCommand for OsExecCommand {
    fn run(&mut self) -> miette::Result<()> {
        let program = self.program();

        let maybe_stdin_stream = apply_slot(self.stdin.take(), |it| {
            self.command.stdin(it);
        });
        let maybe_stdout_stream = apply_slot(self.stdout.take(), |it| {
            self.command.stdout(it);
        });
        let maybe_stderr_stream = apply_slot(self.stderr.take(), |it| {
            self.command.stderr(it);
        });

        tracing::debug!(
            message = "OsExecCommand::run -> spawn",
            program = %program,
            stdin_is_proxied = maybe_stdin_stream.is_some(),
            stdout_is_proxied = maybe_stdout_stream.is_some(),
            stderr_is_proxied = maybe_stderr_stream.is_some(),
        );

        let mut child = self
            .command
            .spawn()
            .map_err(|source| RunError::FailedToStart {
                program: program.clone(),
                source,
            })?;

        let pumps = match start_pumps(
            &mut child,
            maybe_stdin_stream,
            maybe_stdout_stream,
            maybe_stderr_stream,
        ) {
            Ok(it) => it,
            Err(source) => {
                // Don't leave the child running with nobody draining its pipes.
                drop(child.kill());
                drop(child.wait());
                return Err(RunError::Io {
                    program,
                    what: "spawn pump thread",
                    source,
                }
                .into());
            }
        };

        let wait_result = child.wait();

        // Stop the stdin pump and drain stdout and stderr before reporting, even if
        // waiting failed.
        let copy_result = pumps.stop_and_join();

        let status = wait_result.map_err(|source| RunError::Io {
            program: program.clone(),
            what: "wait",
            source,
        })?;

        if !status.success() {
            return Err(RunError::ExitedUnsuccessfully { program, status }.into());
        }

        copy_result.map_err(|(what, source)| {
            RunError::Io {
                program,
                what,
                source,
            }
            .into()
        })
    }

    fn set_stdin(&mut self, reader: BoxedReader) {
        // If unset, have the command read from the given stream.
        fill_if_unset(&mut self.stdin, StdioSource::Stream(reader));
    }

    fn set_stdout(&mut self, writer: BoxedWriter) {
        // If unset, have the command write to the given stream.
        fill_if_unset(&mut self.stdout, StdioSource::Stream(writer));
    }

    fn set_stderr(&mut self, writer: BoxedWriter) {
        fill_if_unset(&mut self.stderr, StdioSource::Stream(writer));
    }

    fn get_proxies(&self) -> (ReaderProxy, WriterProxy, WriterProxy) {
        (
            self.stdin_proxy.clone(),
            self.stdout_proxy.clone(),
            self.stderr_proxy.clone(),
        )
    }
}

/// Hand a [`Stdio`] slot to the command via `set_stdio`, or set up a pipe for a stream
/// slot and return the stream so it can be pumped.
fn apply_slot<S>(
    maybe_source: Option<StdioSource<S>>,
    mut set_stdio: impl FnMut(Stdio),
) -> Option<S> {
    match maybe_source {
        Some(StdioSource::Stdio(stdio)) => {
            set_stdio(stdio);
            None
        }
        Some(StdioSource::Stream(stream)) => {
            set_stdio(Stdio::piped());
            Some(stream)
        }
        None => None,
    }
}

type PumpHandle = JoinHandle<io::Result<u64>>;

#[derive(Default)]
struct Pumps {
    maybe_stdin: Option<StdinPump>,
    maybe_stdout: Option<PumpHandle>,
    maybe_stderr: Option<PumpHandle>,
}

impl Pumps {
    /// Call this once the child has exited. The first copy error wins.
    fn stop_and_join(self) -> Result<(), (&'static str, io::Error)> {
        let stdin_result = match self.maybe_stdin {
            Some(stdin_pump) => stdin_pump
                .stop_and_join()
                .map(|_bytes_copied| ())
                .map_err(|error| ("copy stdin", error)),
            None => Ok(()),
        };
        let stdout_result = join_pump(self.maybe_stdout, "copy stdout");
        let stderr_result = join_pump(self.maybe_stderr, "copy stderr");
        stdout_result.and(stderr_result).and(stdin_result)
    }
}

fn join_pump(
    maybe_handle: Option<PumpHandle>,
    what: &'static str,
) -> Result<(), (&'static str, io::Error)> {
    let Some(handle) = maybe_handle else {
        return Ok(());
    };
    match handle.join() {
        Ok(Ok(_bytes_copied)) => Ok(()),
        Ok(Err(error)) => Err((what, error)),
        Err(_) => Err((what, io::Error::other("pump thread panicked"))),
    }
}

fn start_pumps(
    child: &mut Child,
    maybe_stdin_stream: Option<BoxedReader>,
    maybe_stdout_stream: Option<BoxedWriter>,
    maybe_stderr_stream: Option<BoxedWriter>,
) -> io::Result<Pumps> {
    let mut pumps = Pumps::default();

    if let (Some(stream), Some(pipe)) = (maybe_stdin_stream, child.stdin.take()) {
        pumps.maybe_stdin = start_stdin_pump(stream, pipe)?;
    }

    if let (Some(mut stream), Some(mut pipe)) = (maybe_stdout_stream, child.stdout.take())
    {
        pumps.maybe_stdout = Some(spawn_pump("exec-stdout-pump", move || {
            copy_and_flush(&mut pipe, &mut stream)
        })?);
    }

    if let (Some(mut stream), Some(mut pipe)) = (maybe_stderr_stream, child.stderr.take())
    {
        pumps.maybe_stderr = Some(spawn_pump("exec-stderr-pump", move || {
            copy_and_flush(&mut pipe, &mut stream)
        })?);
    }

    Ok(pumps)
}

/// Returns `None` when the pump can't be stopped, because the stream has no file
/// descriptor that can be waited on.
fn start_stdin_pump(
    mut stream: BoxedReader,
    mut pipe: ChildStdin,
) -> io::Result<Option<StdinPump>> {
    if let Some(raw_fd) = stream.maybe_raw_fd() {
        match StdinPump::try_create_poll(raw_fd) {
            Ok((poll, waker)) => return StdinPump::spawn(poll, waker, stream, pipe).map(Some),
            Err(error) => tracing::debug!(
                message = "stdin pump -> can't wait on the input, copying it directly",
                ?error
            ),
        }
    }

    // Detached. Dropping the handle doesn't stop the thread.
    drop(spawn_pump("exec-stdin-pump", move || {
        let result = io::copy(&mut stream, &mut pipe);
        tracing::debug!(message = "stdin pump -> done", ?result);
        result
    })?);
    Ok(None)
}

fn spawn_pump(
    name: &str,
    pump: impl FnOnce() -> io::Result<u64> + Send + 'static,
) -> io::Result<PumpHandle> {
    thread::Builder::new().name(name.into()).spawn(pump)
}

fn copy_and_flush(reader: &mut impl Read, writer: &mut BoxedWriter) -> io::Result<u64> {
    let bytes_copied = io::copy(reader, writer)?;
    writer.flush()?;
    Ok(bytes_copied)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc,
                    atomic::{AtomicUsize, Ordering}};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{InputDevice, OutputDevice, OutputDeviceExt, ProxyHandler, StdoutMock};

    #[test]
    fn test_setters_fill_empty_slots() {
        let mut cmd = OsExecCommand::new(Command::new("true"));
        assert!(cmd.stdin.is_none() && cmd.stdout.is_none() && cmd.stderr.is_none());

        cmd.set_stdin(Box::new(io::empty()));
        cmd.set_stdout(Box::new(io::sink()));
        cmd.set_stderr(Box::new(io::sink()));

        assert!(cmd.stdin.as_ref().is_some_and(StdioSource::is_stream));
        assert!(cmd.stdout.as_ref().is_some_and(StdioSource::is_stream));
        assert!(cmd.stderr.as_ref().is_some_and(StdioSource::is_stream));
    }

    #[test]
    fn test_setters_leave_preset_slots_alone() {
        let mut cmd = OsExecCommand::new(Command::new("true")).inherit_terminal();

        cmd.set_stdin(Box::new(io::empty()));
        cmd.set_stdout(Box::new(io::sink()));
        cmd.set_stderr(Box::new(io::sink()));

        assert!(matches!(cmd.stdin, Some(StdioSource::Stdio(_))));
        assert!(matches!(cmd.stdout, Some(StdioSource::Stdio(_))));
        assert!(matches!(cmd.stderr, Some(StdioSource::Stdio(_))));
    }

    #[test]
    fn test_get_proxies_returns_the_configured_proxies() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = {
            let count = count.clone();
            ProxyHandler::new(move |_, _, _| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        let cmd = OsExecCommand::new(Command::new("true"))
            .with_stdout_proxy(WriterProxy::new(handler));

        let (stdin_proxy, mut stdout_proxy, stderr_proxy) = cmd.get_proxies();
        assert!(!stdin_proxy.is_bound() && !stderr_proxy.is_bound());

        let (output_device, _stdout_mock) = OutputDevice::new_mock();
        stdout_proxy.bind(output_device);
        stdout_proxy.write_all(b"x").unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_program_is_a_failed_to_start_error() {
        let mut cmd =
            OsExecCommand::new(Command::new("r3bl_exec_this_program_does_not_exist"));
        let report = cmd.run().unwrap_err();

        let run_error = report.downcast_ref::<RunError>().unwrap();
        assert!(matches!(run_error, RunError::FailedToStart { .. }));
        assert_eq!(run_error.exit_code(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_reported_with_its_exit_code() {
        let mut command = Command::new("sh");
        command.args(["-c", "exit 3"]);
        let mut cmd = OsExecCommand::new(command).with_stdin(Stdio::null());

        let report = cmd.run().unwrap_err();

        let run_error = report.downcast_ref::<RunError>().unwrap();
        assert!(matches!(run_error, RunError::ExitedUnsuccessfully { .. }));
        assert_eq!(run_error.exit_code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_streams_are_pumped_byte_for_byte() {
        let mut command = Command::new("sh");
        command.args(["-c", "printf 'out\\001\\377'; printf 'err' 1>&2"]);
        let mut cmd = OsExecCommand::new(command).with_stdin(Stdio::null());

        let stdout_mock = StdoutMock::default();
        let stderr_mock = StdoutMock::default();
        cmd.set_stdout(Box::new(stdout_mock.clone()));
        cmd.set_stderr(Box::new(stderr_mock.clone()));

        cmd.run().unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer(), b"out\x01\xff".to_vec());
        assert_eq!(stderr_mock.get_copy_of_buffer_as_string(), "err");
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_stream_is_pumped_into_the_child() {
        let mut command = Command::new("sh");
        command.args(["-c", "read line; printf \"got:$line\""]);
        let mut cmd = OsExecCommand::new(command);

        let stdout_mock = StdoutMock::default();
        cmd.set_stdin(Box::new(io::Cursor::new(b"hello\n".to_vec())));
        cmd.set_stdout(Box::new(stdout_mock.clone()));
        cmd.set_stderr(Box::new(io::sink()));

        cmd.run().unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "got:hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_host_input_is_read_only_while_the_child_runs() {
        let (reader, mut writer) = io::pipe().unwrap();
        let host_input = InputDevice::new_with_fd(reader);
        writer.write_all(b"hello\n").unwrap();

        let mut stdin_proxy = ReaderProxy::default();
        stdin_proxy.bind(host_input.clone());

        let mut command = Command::new("sh");
        command.args(["-c", "read line; printf \"got:$line\""]);
        let mut cmd = OsExecCommand::new(command);
        let stdout_mock = StdoutMock::default();
        cmd.set_stdin(Box::new(stdin_proxy));
        cmd.set_stdout(Box::new(stdout_mock.clone()));
        cmd.set_stderr(Box::new(io::sink()));

        cmd.run().unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "got:hello");

        // The host's input is still open, and the next bytes belong to the host.
        writer.write_all(b"after").unwrap();
        let mut buf = [0_u8; 5];
        host_input.lock().unwrap().read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"after");
    }

    #[cfg(unix)]
    #[test]
    fn test_preset_stream_wins_over_a_later_set() {
        let mut command = Command::new("sh");
        command.args(["-c", "printf hi"]);

        let preset = StdoutMock::default();
        let late = StdoutMock::default();

        let mut cmd = OsExecCommand::new(command).with_stdin(Stdio::null());
        cmd.set_stdout(Box::new(preset.clone()));
        cmd.set_stdout(Box::new(late.clone()));

        cmd.run().unwrap();

        assert_eq!(preset.get_copy_of_buffer_as_string(), "hi");
        assert_eq!(late.get_copy_of_buffer_as_string(), "");
    }
}
