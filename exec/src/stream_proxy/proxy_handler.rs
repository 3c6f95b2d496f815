// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          io,
          sync::Arc};

/// Signature of the observer that a proxy calls on every read or write: the buffer
/// passed to the call, the number of bytes transferred, and the error, if any.
pub type ProxyHandlerFn = dyn Fn(&[u8], usize, Option<&io::Error>) + Send + Sync;

/// Side channel observer for [`crate::ReaderProxy`] and [`crate::WriterProxy`].
///
/// It only gets a shared reference to the buffer, so it can't change what is delivered.
/// It returns nothing, so it can't fail the operation it observes. The default handler
/// is a no-op.
#[derive(Clone)]
pub struct ProxyHandler(Arc<ProxyHandlerFn>);

impl ProxyHandler {
    pub fn new(
        handler: impl Fn(&[u8], usize, Option<&io::Error>) + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(handler))
    }

    #[must_use]
    pub fn noop() -> Self { Self::new(|_, _, _| {}) }

    pub fn observe(&self, buf: &[u8], bytes_transferred: usize, maybe_error: Option<&io::Error>) {
        (self.0)(buf, bytes_transferred, maybe_error);
    }
}

impl Default for ProxyHandler {
    fn default() -> Self { Self::noop() }
}

impl Debug for ProxyHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "ProxyHandler") }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_noop_handler_is_callable() {
        let handler = ProxyHandler::default();
        handler.observe(b"abc", 3, None);
        handler.observe(b"", 0, Some(&io::Error::other("boom")));
    }

    #[test]
    fn test_clones_share_the_same_observer() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = {
            let count = count.clone();
            ProxyHandler::new(move |_, n, _| {
                count.fetch_add(n, Ordering::SeqCst);
            })
        };

        handler.clone().observe(b"ab", 2, None);
        handler.observe(b"cde", 3, None);

        assert_eq!(count.load(Ordering::SeqCst), 5);
    }
}
