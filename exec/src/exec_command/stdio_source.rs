// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          process::Stdio};

/// What an [`crate::OsExecCommand`] connects one of its standard streams to. Each slot is
/// held as an `Option<StdioSource<_>>` so that "not configured yet" is explicit.
pub enum StdioSource<S> {
    /// Handed to the child process as is, eg: [`Stdio::inherit()`] to use the terminal
    /// directly, or [`Stdio::null()`].
    Stdio(Stdio),
    /// Connected with a pipe, and pumped to or from this stream on a separate thread.
    Stream(S),
}

impl<S> StdioSource<S> {
    #[must_use]
    pub fn is_stream(&self) -> bool { matches!(self, StdioSource::Stream(_)) }
}

impl<S> Debug for StdioSource<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StdioSource::Stdio(stdio) => write!(f, "Stdio({stdio:?})"),
            StdioSource::Stream(_) => write!(f, "Stream"),
        }
    }
}

/// Store `source` in `slot`, only if the slot is empty. Returns `true` if it was stored.
pub fn fill_if_unset<S>(slot: &mut Option<StdioSource<S>>, source: StdioSource<S>) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(source);
    true
}
