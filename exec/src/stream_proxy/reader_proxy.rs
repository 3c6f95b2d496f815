// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Read};

use crate::{InputDevice, InputStream, ProxyError, ProxyHandler, RawInputFd};

/// Wraps the host's [`InputDevice`] so that an external command's stdin can be observed.
///
/// [`Read::read`] delegates to the source first, then calls the handler with
/// `(buf, bytes_read, maybe_err)`, then returns the source's result unchanged. When
/// the source returns an error, `bytes_read` is `0`.
///
/// The `from` field is empty until [`crate::ExecController`] binds it to the host's
/// input device. An unbound proxy is still safe to call, it returns
/// [`io::ErrorKind::NotConnected`].
#[derive(Debug, Clone, Default)]
pub struct ReaderProxy {
    pub from: Option<InputDevice>,
    pub handler: ProxyHandler,
}

impl ReaderProxy {
    #[must_use]
    pub fn new(handler: ProxyHandler) -> Self {
        Self {
            from: None,
            handler,
        }
    }

    pub fn bind(&mut self, input_device: InputDevice) { self.from = Some(input_device); }

    #[must_use]
    pub fn is_bound(&self) -> bool { self.from.is_some() }
}

impl Read for ReaderProxy {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let result = match &self.from {
            Some(input_device) => input_device.lock().and_then(|mut it| it.read(buf)),
            None => Err(ProxyError::Unbound { which: "reader" }.into()),
        };

        match &result {
            Ok(bytes_read) => self.handler.observe(buf, *bytes_read, None),
            Err(error) => self.handler.observe(buf, 0, Some(error)),
        }

        result
    }
}

impl InputStream for ReaderProxy {
    fn maybe_raw_fd(&self) -> Option<RawInputFd> {
        self.from.as_ref().and_then(|it| it.maybe_raw_fd)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{InputDeviceExt, StdinMock};

    /// What the handler saw on a single call: `(buf, bytes_read, maybe_error_kind)`.
    type Observed = (Vec<u8>, usize, Option<io::ErrorKind>);

    fn recording_handler() -> (ProxyHandler, Arc<Mutex<Vec<Observed>>>) {
        let observed = Arc::new(Mutex::new(Vec::new()));
        let handler = {
            let observed = observed.clone();
            ProxyHandler::new(move |buf, n, maybe_err| {
                observed.lock().unwrap().push((
                    buf.to_vec(),
                    n,
                    maybe_err.map(io::Error::kind),
                ));
            })
        };
        (handler, observed)
    }

    #[test]
    fn test_read_passes_bytes_through_and_reports_each_call() {
        let (handler, observed) = recording_handler();
        let mut proxy = ReaderProxy::new(handler);
        proxy.bind(InputDevice::new_mock(b"hello"));

        let mut buf = [0_u8; 3];

        assert_eq!(proxy.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"hel");

        assert_eq!(proxy.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"lo");

        assert_eq!(proxy.read(&mut buf).unwrap(), 0);

        let observed = observed.lock().unwrap();
        assert_eq!(observed.len(), 3);
        assert_eq!(observed[0], (b"hel".to_vec(), 3, None));
        // The handler gets the whole buffer, stale tail included.
        assert_eq!(observed[1], (b"lol".to_vec(), 2, None));
        assert_eq!(observed[2].1, 0);
    }

    #[test]
    fn test_read_error_is_passed_through_and_reported() {
        let (handler, observed) = recording_handler();
        let mut proxy = ReaderProxy::new(handler);
        proxy.bind(InputDevice::new_mock_with(StdinMock::new(
            b"ab",
            Some(io::ErrorKind::BrokenPipe),
        )));

        let mut buf = [0_u8; 8];
        assert_eq!(proxy.read(&mut buf).unwrap(), 2);

        let error = proxy.read(&mut buf).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);

        let observed = observed.lock().unwrap();
        assert_eq!(observed.len(), 2);
        assert_eq!(observed[0].1, 2);
        assert_eq!(observed[1].1, 0);
        assert_eq!(observed[1].2, Some(io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_proxy_output_is_identical_to_source_output() {
        let payload = (0..=255_u8).cycle().take(10_000).collect::<Vec<_>>();

        let mut proxy = ReaderProxy::default();
        proxy.bind(InputDevice::new_mock(&payload));

        let mut acc = Vec::new();
        proxy.read_to_end(&mut acc).unwrap();

        assert_eq!(acc, payload);
    }

    #[test]
    fn test_raw_fd_comes_from_the_bound_device() {
        let mut proxy = ReaderProxy::default();
        assert_eq!(proxy.maybe_raw_fd(), None);

        proxy.bind(InputDevice::new_mock(b""));
        assert_eq!(proxy.maybe_raw_fd(), None);

        #[cfg(unix)]
        {
            let (reader, _writer) = io::pipe().unwrap();
            let device = InputDevice::new_with_fd(reader);
            proxy.bind(device.clone());
            assert_eq!(proxy.maybe_raw_fd(), device.maybe_raw_fd);
        }
    }

    #[test]
    fn test_unbound_reader_errors_without_panicking() {
        let (handler, observed) = recording_handler();
        let mut proxy = ReaderProxy::new(handler);
        assert!(!proxy.is_bound());

        let error = proxy.read(&mut [0_u8; 4]).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotConnected);
        assert_eq!(
            observed.lock().unwrap()[0].2,
            Some(io::ErrorKind::NotConnected)
        );
    }
}
