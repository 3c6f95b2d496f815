// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io,
          sync::{Arc, MutexGuard}};

use crate::{RawInputFd, SafeRawInput, SendRawInput, StdMutex};

/// This struct represents the host's raw input stream. While the terminal is handed off,
/// an external command's stdin reads from it (through a [`crate::ReaderProxy`]). See
/// [`crate::InputDeviceExt`] for testing features.
///
/// This is a blocking [`io::Read`] source, and not an event stream. The host app must
/// stop its own reader before releasing the terminal, so that the two don't race for
/// the same bytes.
#[derive(Clone)]
pub struct InputDevice {
    pub resource: SafeRawInput,
    pub is_mock: bool,
    /// The file descriptor that `resource` reads from, if it has one. It lets the stdin
    /// pump wait for input without blocking in a read, so that it can stop when the
    /// external command exits. It stays open as long as `resource` is alive.
    pub maybe_raw_fd: Option<RawInputFd>,
}

impl std::fmt::Debug for InputDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputDevice")
            .field("is_mock", &self.is_mock)
            .field("maybe_raw_fd", &self.maybe_raw_fd)
            .finish_non_exhaustive()
    }
}

impl Default for InputDevice {
    fn default() -> Self { Self::new_stdin() }
}

impl InputDevice {
    #[must_use]
    pub fn new_stdin() -> Self {
        let stdin = io::stdin();
        let maybe_raw_fd = stdin_raw_fd(&stdin);
        Self {
            resource: Arc::new(StdMutex::new(stdin)),
            is_mock: false,
            maybe_raw_fd,
        }
    }

    /// Read from anything with a file descriptor, eg: a pipe or `/dev/tty`.
    #[cfg(unix)]
    #[must_use]
    pub fn new_with_fd(reader: impl io::Read + std::os::fd::AsRawFd + Send + 'static) -> Self {
        let raw_fd = reader.as_raw_fd();
        Self {
            resource: Arc::new(StdMutex::new(reader)),
            is_mock: false,
            maybe_raw_fd: Some(raw_fd),
        }
    }

    /// Locks the input device for reading.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the mutex is poisoned.
    pub fn lock(&self) -> io::Result<MutexGuard<'_, SendRawInput>> {
        self.resource
            .lock()
            .map_err(|e| io::Error::other(format!("input device lock poisoned: {e}")))
    }
}

#[cfg(unix)]
fn stdin_raw_fd(stdin: &io::Stdin) -> Option<RawInputFd> {
    use std::os::fd::AsRawFd as _;
    Some(stdin.as_raw_fd())
}

#[cfg(not(unix))]
fn stdin_raw_fd(_stdin: &io::Stdin) -> Option<RawInputFd> { None }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InputDeviceExt;

    #[test]
    fn test_mock_input_device_reads_scripted_bytes() {
        let device = InputDevice::new_mock(b"abc");
        assert!(device.is_mock);

        let mut acc = String::new();
        device.lock().unwrap().read_to_string(&mut acc).unwrap();
        pretty_assertions::assert_eq!(acc, "abc");
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_input_device_has_a_raw_fd() {
        use std::io::Write as _;

        let (reader, mut writer) = io::pipe().unwrap();
        let device = InputDevice::new_with_fd(reader);
        assert!(!device.is_mock);
        assert!(device.maybe_raw_fd.is_some());

        writer.write_all(b"xyz").unwrap();
        drop(writer);
        let mut acc = String::new();
        device.lock().unwrap().read_to_string(&mut acc).unwrap();
        pretty_assertions::assert_eq!(acc, "xyz");
    }
}
