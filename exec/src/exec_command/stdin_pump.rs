// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Copy the host's input into a child's stdin pipe, until the child exits.
//!
//! A plain [`io::copy()`] would sit in a blocking read of the host's input after the
//! child is gone, and take the host's next keystroke. Instead, the pump thread waits on
//! a [`mio::Poll`] for two things:
//! - [`INPUT_READY`]: the input's file descriptor is readable. One read, one write.
//! - [`CHILD_EXITED`]: [`StdinPump::stop_and_join()`] woke the [`Waker`]. The pump
//!   returns without reading, even if input is ready in the same batch of events.

use std::{io::{self, ErrorKind, Write},
          process::ChildStdin,
          thread::{self, JoinHandle}};

use mio::{Events, Poll, Token, Waker};

use crate::{BoxedReader, RawInputFd};

pub const INPUT_READY: Token = Token(0);
pub const CHILD_EXITED: Token = Token(1);

const EVENTS_CAPACITY: usize = 4;
const STDIN_READ_BUFFER_SIZE: usize = 16_384;

/// The running pump thread, and the [`Waker`] that stops it. Dropping this wakes the
/// thread, so that an early return from `run()` doesn't leave it reading.
#[derive(Debug)]
pub struct StdinPump {
    waker: Waker,
    maybe_handle: Option<JoinHandle<io::Result<u64>>>,
}

impl StdinPump {
    /// Register `raw_fd` for reading. This fails for descriptors that can't be polled,
    /// eg: a regular file on Linux.
    ///
    /// # Errors
    ///
    /// If the poll or the waker can't be created, or the descriptor can't be registered.
    pub fn try_create_poll(raw_fd: RawInputFd) -> io::Result<(Poll, Waker)> {
        try_register(raw_fd)
    }

    /// # Errors
    ///
    /// If the thread can't be spawned.
    pub fn spawn(
        poll: Poll,
        waker: Waker,
        stream: BoxedReader,
        pipe: ChildStdin,
    ) -> io::Result<Self> {
        let handle = thread::Builder::new()
            .name("exec-stdin-pump".into())
            .spawn(move || {
                let result = pump_until_child_exits(poll, stream, pipe);
                tracing::debug!(message = "stdin pump -> done", ?result);
                result
            })?;
        Ok(Self {
            waker,
            maybe_handle: Some(handle),
        })
    }

    /// Wake the pump and wait for its thread to end. Once this returns, nothing reads the
    /// host's input on the child's behalf.
    ///
    /// # Errors
    ///
    /// The pump's own error, or if it can't be woken, or if it panicked.
    pub fn stop_and_join(mut self) -> io::Result<u64> {
        self.waker.wake()?;
        let Some(handle) = self.maybe_handle.take() else {
            return Ok(0);
        };
        handle
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stdin pump thread panicked")))
    }
}

impl Drop for StdinPump {
    fn drop(&mut self) {
        if self.maybe_handle.is_some() {
            drop(self.waker.wake());
        }
    }
}

#[cfg(unix)]
fn try_register(raw_fd: RawInputFd) -> io::Result<(Poll, Waker)> {
    use mio::{Interest, unix::SourceFd};

    let poll = Poll::new()?;
    // Create the waker before registering other sources.
    let waker = Waker::new(poll.registry(), CHILD_EXITED)?;
    poll.registry()
        .register(&mut SourceFd(&raw_fd), INPUT_READY, Interest::READABLE)?;
    Ok((poll, waker))
}

#[cfg(not(unix))]
fn try_register(raw_fd: RawInputFd) -> io::Result<(Poll, Waker)> { match raw_fd {} }

fn pump_until_child_exits(
    mut poll: Poll,
    mut stream: BoxedReader,
    mut pipe: ChildStdin,
) -> io::Result<u64> {
    let mut events = Events::with_capacity(EVENTS_CAPACITY);
    let mut buffer = vec![0_u8; STDIN_READ_BUFFER_SIZE];
    let mut bytes_copied = 0_u64;

    loop {
        if let Err(error) = poll.poll(&mut events, None) {
            if error.kind() == ErrorKind::Interrupted {
                continue;
            }
            return Err(error);
        }

        let mut is_input_ready = false;
        for event in &events {
            match event.token() {
                CHILD_EXITED => return Ok(bytes_copied),
                INPUT_READY => is_input_ready = true,
                _ => {}
            }
        }
        if !is_input_ready {
            continue;
        }

        match io::Read::read(&mut stream, &mut buffer) {
            Ok(0) => return Ok(bytes_copied),
            Ok(bytes_read) => {
                match pipe.write_all(&buffer[..bytes_read]).and_then(|()| pipe.flush()) {
                    Ok(()) => bytes_copied += bytes_read as u64,
                    // The child closed its stdin.
                    Err(error) if error.kind() == ErrorKind::BrokenPipe => {
                        return Ok(bytes_copied);
                    }
                    Err(error) => return Err(error),
                }
            }
            Err(error)
                if matches!(error.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {}
            Err(error) => return Err(error),
        }
    }
}
