// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Debug;

use tokio::sync::mpsc;

use crate::{ExecCallback, ExecCommand, ExecRequest};

/// Capacity for the host's signal channel, when it is created with
/// [`mpsc::channel()`].
pub const CHANNEL_WIDTH: usize = 1_000;

/// What travels on the host's main event loop channel, from the app (or from
/// [`crate::ExecController`]) to the main event loop.
#[derive(Debug)]
pub enum HandoffSignal<M> {
    /// Hand the terminal off to a command. Route this to
    /// [`crate::ExecController::exec()`].
    Exec(ExecRequest<M>),
    /// A message for the app, eg: the outcome of an exec produced by its callback.
    Message(M),
}

/// Enqueue a command (and the callback that reports its outcome) on the host's channel.
/// This is the entry point an app uses to ask for the terminal to be handed off. It never
/// blocks, see [`send_signal_without_blocking()`].
pub fn request_exec<M>(
    sender: &mpsc::Sender<HandoffSignal<M>>,
    command: impl ExecCommand + 'static,
    maybe_callback: Option<ExecCallback<M>>,
) where
    M: Debug + Send + 'static,
{
    send_signal_without_blocking(
        sender.clone(),
        HandoffSignal::Exec(ExecRequest::new(command, maybe_callback)),
    );
}

/// Send `signal` on a separate unit of work, so that the caller never waits for the
/// receiver to have room (or to be polled at all).
/// - Inside a tokio runtime, the send happens on a spawned task. More info:
///   <https://tokio.rs/tokio/tutorial/channels>.
/// - Outside of one, it happens on a detached thread.
///
/// If the receiver is gone, the signal is dropped and a warning is logged.
pub fn send_signal_without_blocking<M>(
    sender: mpsc::Sender<HandoffSignal<M>>,
    signal: HandoffSignal<M>,
) where
    M: Debug + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            drop(handle.spawn(async move {
                if let Err(error) = sender.send(signal).await {
                    tracing::warn!(
                        message = "send_signal_without_blocking -> receiver dropped",
                        signal = ?error.0
                    );
                }
            }));
        }
        Err(_) => {
            let spawn_result = std::thread::Builder::new()
                .name("exec-signal-sender".into())
                .spawn(move || {
                    if let Err(error) = sender.blocking_send(signal) {
                        tracing::warn!(
                            message = "send_signal_without_blocking -> receiver dropped",
                            signal = ?error.0
                        );
                    }
                });
            if let Err(error) = spawn_result {
                tracing::error!(
                    message = "send_signal_without_blocking -> could not spawn sender thread",
                    error = %error
                );
            }
        }
    }
}
