// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

/// Disambiguate the type of `StdMutex` from stdlib and tokio to avoid conflicts.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Type alias for a `Send`-able output device (raw terminal, mock, etc).
pub type SendRawTerminal = dyn std::io::Write + Send;
/// Type alias for a `Send`-able raw terminal wrapped in an `Arc<StdMutex>`.
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

/// Type alias for a `Send`-able input source (stdin, `/dev/tty`, mock, etc).
pub type SendRawInput = dyn std::io::Read + Send;
/// Type alias for a `Send`-able input source wrapped in an `Arc<StdMutex>`.
pub type SafeRawInput = Arc<StdMutex<SendRawInput>>;

/// A file descriptor that can be waited on for input.
#[cfg(unix)]
pub type RawInputFd = std::os::fd::RawFd;
/// Only unix hosts have input that can be waited on, so there is never one here.
#[cfg(not(unix))]
pub type RawInputFd = std::convert::Infallible;

/// A stream that an [`crate::ExecCommand`] reads its stdin from.
pub type BoxedReader = Box<dyn crate::InputStream>;
/// A stream that an [`crate::ExecCommand`] writes its stdout or stderr to.
pub type BoxedWriter = Box<dyn std::io::Write + Send>;
