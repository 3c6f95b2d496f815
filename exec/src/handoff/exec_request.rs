// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          process::Command};

use crate::{BoxedExecCommand, ExecCommand, OsExecCommand, ReaderProxy, WriterProxy};

/// Turns the outcome of an exec into a message for the host app. It gets `Ok(())` when
/// everything worked, or the failure otherwise. See [`crate::ExecController::exec()`]
/// for which failure is reported when more than one step fails.
pub type ExecCallback<M> = Box<dyn FnOnce(miette::Result<()>) -> M + Send>;

/// A command waiting to be run by [`crate::ExecController`], along with the callback
/// that reports its outcome. If there's no callback, the outcome is dropped.
pub struct ExecRequest<M> {
    pub command: BoxedExecCommand,
    pub maybe_callback: Option<ExecCallback<M>>,
}

impl<M> Debug for ExecRequest<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecRequest")
            .field("has_callback", &self.maybe_callback.is_some())
            .finish_non_exhaustive()
    }
}

impl<M> ExecRequest<M> {
    pub fn new(
        command: impl ExecCommand + 'static,
        maybe_callback: Option<ExecCallback<M>>,
    ) -> Self {
        Self {
            command: Box::new(command),
            maybe_callback,
        }
    }
}

/// Run any [`ExecCommand`] in a blocking fashion, pausing the host app while it runs and
/// resuming it when it's done. Most of the time you'll want [`exec_process()`] instead.
///
/// ```
/// use r3bl_exec::{ExecRequest, MockExecCommand, exec};
///
/// #[derive(Debug)]
/// enum Msg {
///     Done(Option<String>),
/// }
///
/// let request: ExecRequest<Msg> = exec(
///     MockExecCommand::new(),
///     Some(Box::new(|result: miette::Result<()>| {
///         Msg::Done(result.err().map(|it| it.to_string()))
///     })),
/// );
/// ```
pub fn exec<M>(
    command: impl ExecCommand + 'static,
    maybe_callback: Option<ExecCallback<M>>,
) -> ExecRequest<M> {
    ExecRequest::new(command, maybe_callback)
}

/// Run a [`Command`] in a blocking fashion with the given proxies on its streams. It's
/// useful for spawning other interactive programs such as editors and shells from
/// within the host app.
///
/// ```no_run
/// use std::process::Command;
/// use r3bl_exec::{ExecRequest, ReaderProxy, WriterProxy, exec_process};
///
/// #[derive(Debug)]
/// struct VimFinished(miette::Result<()>);
///
/// let mut vim = Command::new("vim");
/// vim.arg("file.txt");
///
/// let request: ExecRequest<VimFinished> = exec_process(
///     vim,
///     ReaderProxy::default(),
///     WriterProxy::default(),
///     WriterProxy::default(),
///     Some(Box::new(VimFinished)),
/// );
/// ```
///
/// Or, if you don't care about the outcome, pass `None` for the callback.
pub fn exec_process<M>(
    command: Command,
    stdin_proxy: ReaderProxy,
    stdout_proxy: WriterProxy,
    stderr_proxy: WriterProxy,
    maybe_callback: Option<ExecCallback<M>>,
) -> ExecRequest<M> {
    exec(
        OsExecCommand::new(command)
            .with_stdin_proxy(stdin_proxy)
            .with_stdout_proxy(stdout_proxy)
            .with_stderr_proxy(stderr_proxy),
        maybe_callback,
    )
}
