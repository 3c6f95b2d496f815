// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Cursor, Read};

use crate::InputStream;

/// Scripted stdin: yields `bytes`, then (optionally) one error of the given kind, then
/// end of stream.
#[derive(Debug)]
pub struct StdinMock {
    pub cursor: Cursor<Vec<u8>>,
    pub maybe_trailing_error: Option<io::ErrorKind>,
}

impl StdinMock {
    #[must_use]
    pub fn new(bytes: &[u8], maybe_trailing_error: Option<io::ErrorKind>) -> Self {
        Self {
            cursor: Cursor::new(bytes.to_vec()),
            maybe_trailing_error,
        }
    }
}

impl Read for StdinMock {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bytes_read = self.cursor.read(buf)?;
        if bytes_read == 0 && !buf.is_empty() {
            if let Some(kind) = self.maybe_trailing_error.take() {
                return Err(io::Error::new(kind, "scripted stdin error"));
            }
        }
        Ok(bytes_read)
    }
}

impl InputStream for StdinMock {}
