// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Read};

use crate::RawInputFd;

/// A source of bytes for an external command's stdin.
///
/// A stream that is backed by a file descriptor (the host's stdin, a pipe) should return
/// it from [`Self::maybe_raw_fd()`]. Then the stdin pump waits for the descriptor to be
/// readable before each read, and stops as soon as the command exits. Without one, the
/// pump blocks in [`Read::read()`], and is left to run until the stream ends.
pub trait InputStream: Read + Send {
    fn maybe_raw_fd(&self) -> Option<RawInputFd> { None }
}

impl InputStream for io::Empty {}

impl<T: AsRef<[u8]> + Send> InputStream for io::Cursor<T> {}

#[cfg(unix)]
impl InputStream for io::PipeReader {
    fn maybe_raw_fd(&self) -> Option<RawInputFd> {
        use std::os::fd::AsRawFd as _;
        Some(self.as_raw_fd())
    }
}

#[cfg(unix)]
impl InputStream for std::fs::File {
    fn maybe_raw_fd(&self) -> Option<RawInputFd> {
        use std::os::fd::AsRawFd as _;
        Some(self.as_raw_fd())
    }
}
