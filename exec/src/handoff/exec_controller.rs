// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Debug;

use tokio::sync::mpsc;

use crate::{ExecCallback,
            ExecCommand,
            ExecRequest,
            HandoffSignal,
            HostTerminal,
            send_signal_without_blocking};

/// Where a single [`ExecController::exec()`] is at. Only used in trace logs.
///
/// `Idle → Releasing → Reporting → Idle` when the release fails, and
/// `Idle → Releasing → Wiring → Running → Restoring → Reporting → Idle` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ExecPhase {
    Idle,
    Releasing,
    Wiring,
    Running,
    Restoring,
    Reporting,
}

/// Owns the host's terminal while an external command runs, and reports the outcome
/// back to the host's main event loop through `sender`.
///
/// The host's main event loop is expected to own this, and to pass every
/// [`HandoffSignal`] it receives to [`Self::handle_signal()`]. An exec blocks that loop
/// until the command is done, which is the point: nothing else may touch the terminal
/// in the meantime.
#[allow(missing_debug_implementations)]
pub struct ExecController<T, M> {
    pub host_terminal: T,
    pub sender: mpsc::Sender<HandoffSignal<M>>,
}

impl<T, M> ExecController<T, M>
where
    T: HostTerminal,
    M: Debug + Send + 'static,
{
    pub fn new(host_terminal: T, sender: mpsc::Sender<HandoffSignal<M>>) -> Self {
        Self {
            host_terminal,
            sender,
        }
    }

    /// Dispatch helper for the host's main event loop. An exec request is run right
    /// away, and `None` is returned. A message is handed back to the caller, for the
    /// app to handle.
    pub fn handle_signal(&mut self, signal: HandoffSignal<M>) -> Option<M> {
        match signal {
            HandoffSignal::Exec(request) => {
                self.exec(request);
                None
            }
            HandoffSignal::Message(message) => Some(message),
        }
    }

    /// Same as [`Self::exec()`], without building an [`ExecRequest`] first.
    pub fn exec_command(
        &mut self,
        command: impl ExecCommand + 'static,
        maybe_callback: Option<ExecCallback<M>>,
    ) {
        self.exec(ExecRequest::new(command, maybe_callback));
    }

    /// Hand the terminal off to the request's command, and get it back:
    /// 1. Release the host terminal. If this fails, the command is not run, the terminal
    ///    is not restored, and the release failure is reported.
    /// 2. Bind the command's proxies to the host's input and output devices, and install
    ///    them. Streams that the command already has are left alone.
    /// 3. Run the command. This blocks until it is done.
    /// 4. Restore the host terminal. This is attempted even if the run failed.
    /// 5. Report the outcome to the callback, if there is one, and send its message on
    ///    [`Self::sender`] without waiting for it to be received.
    ///
    /// When both the run and the restore fail, the run failure is reported. The
    /// restore failure is only logged.
    pub fn exec(&mut self, request: ExecRequest<M>) {
        let ExecRequest {
            mut command,
            maybe_callback,
        } = request;

        let result = self.run_with_terminal_released(command.as_mut());

        log_phase(ExecPhase::Reporting);
        self.report(result, maybe_callback);
        log_phase(ExecPhase::Idle);
    }

    fn run_with_terminal_released(
        &mut self,
        command: &mut dyn ExecCommand,
    ) -> miette::Result<()> {
        log_phase(ExecPhase::Releasing);
        if let Err(report) = self.host_terminal.release_terminal() {
            tracing::warn!(
                message = "ExecController::exec -> release failed, command not run",
                error = ?report
            );
            return Err(report);
        }

        log_phase(ExecPhase::Wiring);
        self.wire_streams(command);

        log_phase(ExecPhase::Running);
        let run_result = command.run();

        log_phase(ExecPhase::Restoring);
        let restore_result = self.host_terminal.restore_terminal();

        match (run_result, restore_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Ok(()), Err(restore_error)) => {
                tracing::error!(
                    message = "ExecController::exec -> restore failed",
                    error = ?restore_error
                );
                Err(restore_error)
            }
            (Err(run_error), Ok(())) => Err(run_error),
            (Err(run_error), Err(restore_error)) => {
                tracing::warn!(
                    message = "ExecController::exec -> restore failed after a failed run, \
                               reporting the run failure",
                    run_error = ?run_error,
                    suppressed_restore_error = ?restore_error
                );
                Err(run_error)
            }
        }
    }

    fn wire_streams(&self, command: &mut dyn ExecCommand) {
        let (mut stdin_proxy, mut stdout_proxy, mut stderr_proxy) = command.get_proxies();

        stdin_proxy.bind(self.host_terminal.input_device());
        let output_device = self.host_terminal.output_device();
        stdout_proxy.bind(output_device.clone());
        stderr_proxy.bind(output_device);

        command.set_stdin(Box::new(stdin_proxy));
        command.set_stdout(Box::new(stdout_proxy));
        command.set_stderr(Box::new(stderr_proxy));
    }

    fn report(&self, result: miette::Result<()>, maybe_callback: Option<ExecCallback<M>>) {
        match maybe_callback {
            Some(callback) => {
                let message = callback(result);
                send_signal_without_blocking(
                    self.sender.clone(),
                    HandoffSignal::Message(message),
                );
            }
            None => {
                if let Err(report) = result {
                    tracing::debug!(
                        message = "ExecController::exec -> no callback, dropping failure",
                        error = ?report
                    );
                }
            }
        }
    }
}

fn log_phase(phase: ExecPhase) {
    tracing::debug!(message = "ExecController::exec", phase = %phase);
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::{CallCounter,
                CallLog,
                MockExecCommand,
                MockHostTerminal,
                ProxyHandler,
                ReaderProxy,
                StdoutMock,
                WriterProxy};

    /// The message a test callback produces: the failure's text, if any.
    type Outcome = Option<String>;

    fn outcome_callback() -> Option<ExecCallback<Outcome>> {
        Some(Box::new(|result: miette::Result<()>| {
            result.err().map(|it| it.to_string())
        }))
    }

    fn new_controller(
        host_terminal: MockHostTerminal,
    ) -> (
        ExecController<MockHostTerminal, Outcome>,
        mpsc::Receiver<HandoffSignal<Outcome>>,
    ) {
        let (sender, receiver) = mpsc::channel(crate::CHANNEL_WIDTH);
        (ExecController::new(host_terminal, sender), receiver)
    }

    fn recording_handler(sink: &StdoutMock) -> ProxyHandler {
        let sink = sink.clone();
        ProxyHandler::new(move |buf, n, _| {
            let _ = sink.clone().write_all(&buf[..n.min(buf.len())]);
        })
    }

    fn recording_write_handler(sink: &StdoutMock) -> ProxyHandler {
        let sink = sink.clone();
        ProxyHandler::new(move |buf, _, _| {
            let _ = sink.clone().write_all(buf);
        })
    }

    fn recv_outcome(receiver: &mut mpsc::Receiver<HandoffSignal<Outcome>>) -> Outcome {
        match receiver.blocking_recv() {
            Some(HandoffSignal::Message(outcome)) => outcome,
            other => panic!("expected a message, got {other:?}"),
        }
    }

    #[test_case(None, None, None ; "run ok and restore ok")]
    #[test_case(None, Some("restore failed"), Some("restore failed") ; "run ok and restore err")]
    #[test_case(Some("run failed"), None, Some("run failed") ; "run err and restore ok")]
    #[test_case(Some("run failed"), Some("restore failed"), Some("run failed") ; "run err and restore err")]
    fn test_outcome_of_run_and_restore(
        maybe_run_error: Option<&str>,
        maybe_restore_error: Option<&str>,
        expected: Option<&str>,
    ) {
        let mut host_terminal = MockHostTerminal::default();
        if let Some(message) = maybe_restore_error {
            host_terminal = host_terminal.with_restore_error(message);
        }
        let release_counter = host_terminal.release_counter.clone();
        let restore_counter = host_terminal.restore_counter.clone();

        let mut command = MockExecCommand::new();
        if let Some(message) = maybe_run_error {
            command = command.with_run_error(message);
        }
        let run_counter = command.run_counter.clone();

        let (mut controller, mut receiver) = new_controller(host_terminal);
        controller.exec_command(command, outcome_callback());

        assert_eq!(recv_outcome(&mut receiver), expected.map(str::to_string));
        assert_eq!(release_counter.get(), 1);
        assert_eq!(run_counter.get(), 1);
        assert_eq!(restore_counter.get(), 1);
    }

    #[test]
    fn test_release_failure_skips_run_and_restore() {
        let host_terminal = MockHostTerminal::default().with_release_error("release failed");
        let restore_counter = host_terminal.restore_counter.clone();
        let command = MockExecCommand::new();
        let run_counter = command.run_counter.clone();

        let (mut controller, mut receiver) = new_controller(host_terminal);
        controller.exec_command(command, outcome_callback());

        assert_eq!(recv_outcome(&mut receiver), Some("release failed".to_string()));
        assert_eq!(run_counter.get(), 0);
        assert_eq!(restore_counter.get(), 0);
    }

    #[test]
    fn test_no_callback_delivers_nothing() {
        let command = MockExecCommand::new().with_run_error("run failed");
        let run_counter = command.run_counter.clone();

        let (mut controller, mut receiver) = new_controller(MockHostTerminal::default());
        controller.exec_command(command, None);
        drop(controller);

        assert_eq!(run_counter.get(), 1);
        assert!(receiver.blocking_recv().is_none());
    }

    #[test]
    fn test_steps_happen_in_order() {
        let call_log = CallLog::default();
        let host_terminal = MockHostTerminal::default().with_call_log(call_log.clone());
        let command = MockExecCommand::new().with_call_log(call_log.clone());

        let (mut controller, mut receiver) = new_controller(host_terminal);
        controller.exec_command(command, outcome_callback());

        assert_eq!(recv_outcome(&mut receiver), None);
        assert_eq!(call_log.get(), vec!["release", "run", "restore"]);
    }

    #[test]
    fn test_output_goes_through_the_proxies_to_the_host() {
        let seen_stdout = StdoutMock::default();
        let seen_stderr = StdoutMock::default();
        let host_terminal = MockHostTerminal::default();
        let host_stdout = host_terminal.stdout_mock.clone();
        let command = MockExecCommand::new()
            .with_proxies(
                ReaderProxy::default(),
                WriterProxy::new(recording_write_handler(&seen_stdout)),
                WriterProxy::new(recording_write_handler(&seen_stderr)),
            )
            .with_stdout_bytes(b"hello")
            .with_stderr_bytes(b"oops");

        let (mut controller, mut receiver) = new_controller(host_terminal);
        controller.exec_command(command, outcome_callback());

        assert_eq!(recv_outcome(&mut receiver), None);
        assert_eq!(seen_stdout.get_copy_of_buffer_as_string(), "hello");
        assert_eq!(seen_stderr.get_copy_of_buffer_as_string(), "oops");
        assert_eq!(host_stdout.get_copy_of_buffer_as_string(), "hellooops");
    }

    #[test]
    fn test_input_is_read_through_the_proxy_from_the_host() {
        let seen_stdin = StdoutMock::default();
        let host_terminal = MockHostTerminal::new(b"typed by the user");
        let command = MockExecCommand::new()
            .with_proxies(
                ReaderProxy::new(recording_handler(&seen_stdin)),
                WriterProxy::default(),
                WriterProxy::default(),
            )
            .with_stdin_read_to_end();
        let stdin_capture = command.stdin_capture.clone();

        let (mut controller, mut receiver) = new_controller(host_terminal);
        controller.exec_command(command, outcome_callback());

        assert_eq!(recv_outcome(&mut receiver), None);
        assert_eq!(stdin_capture.get_copy_of_buffer_as_string(), "typed by the user");
        assert_eq!(seen_stdin.get_copy_of_buffer_as_string(), "typed by the user");
    }

    #[cfg(unix)]
    #[test]
    fn test_host_input_after_the_command_exits_is_left_for_the_host() {
        use std::process::Command;

        use crate::{InputDevice, OsExecCommand};

        let (reader, mut writer) = std::io::pipe().unwrap();
        let host_input = InputDevice::new_with_fd(reader);
        let mut host_terminal = MockHostTerminal::default();
        host_terminal.input_device = host_input.clone();

        let (mut controller, _receiver) = new_controller(host_terminal);
        controller.exec_command(OsExecCommand::new(Command::new("true")), None);

        writer.write_all(b"k").unwrap();
        let mut buf = [0_u8; 1];
        let bytes_read = host_input.lock().unwrap().read(&mut buf).unwrap();
        assert_eq!((bytes_read, buf), (1, *b"k"));
    }

    #[test]
    fn test_preset_stdout_bypasses_the_proxy() {
        let preset = StdoutMock::default();
        let proxy_calls = CallCounter::default();
        let proxy_calls_in_handler = proxy_calls.clone();
        let host_terminal = MockHostTerminal::default();
        let host_stdout = host_terminal.stdout_mock.clone();
        let command = MockExecCommand::new()
            .with_proxies(
                ReaderProxy::default(),
                WriterProxy::new(ProxyHandler::new(move |_, _, _| {
                    proxy_calls_in_handler.increment();
                })),
                WriterProxy::default(),
            )
            .with_stdout(Box::new(preset.clone()))
            .with_stdout_bytes(b"direct");

        let (mut controller, mut receiver) = new_controller(host_terminal);
        controller.exec_command(command, outcome_callback());

        assert_eq!(recv_outcome(&mut receiver), None);
        assert_eq!(preset.get_copy_of_buffer_as_string(), "direct");
        assert_eq!(host_stdout.get_copy_of_buffer_as_string(), "");
        assert_eq!(proxy_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_outcome_is_delivered_from_inside_a_runtime() {
        let (sender, mut receiver) = mpsc::channel(crate::CHANNEL_WIDTH);
        let mut controller = ExecController::new(MockHostTerminal::default(), sender);

        controller.exec_command(
            MockExecCommand::new().with_run_error("boom"),
            outcome_callback(),
        );

        match receiver.recv().await {
            Some(HandoffSignal::Message(outcome)) => {
                assert_eq!(outcome, Some("boom".to_string()));
            }
            other => panic!("expected a message, got {other:?}"),
        }
    }

    #[test]
    fn test_handle_signal_routes_exec_and_message() {
        let command = MockExecCommand::new();
        let run_counter = command.run_counter.clone();
        let (mut controller, mut receiver) = new_controller(MockHostTerminal::default());

        let handled =
            controller.handle_signal(HandoffSignal::Exec(ExecRequest::new(command, None)));
        assert!(handled.is_none());
        assert_eq!(run_counter.get(), 1);

        let handled = controller.handle_signal(HandoffSignal::Message(Some("hi".into())));
        assert_eq!(handled, Some(Some("hi".to_string())));

        drop(controller);
        assert!(receiver.blocking_recv().is_none());
    }
}
