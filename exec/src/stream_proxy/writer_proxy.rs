// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crate::{OutputDevice, ProxyError, ProxyHandler};

/// Wraps the host's [`OutputDevice`] so that an external command's stdout or stderr can
/// be observed.
///
/// [`Write::write`] calls the handler with `(buf, 0, None)` *before* handing the bytes
/// to the sink, so a handler can log what is about to be sent. It then returns the
/// sink's result unchanged. [`Write::flush`] is delegated without calling the handler.
///
/// The `from` field is empty until [`crate::ExecController`] binds it to the host's
/// output device. Both the stdout and the stderr proxies end up bound to the same
/// device.
#[derive(Debug, Clone, Default)]
pub struct WriterProxy {
    pub from: Option<OutputDevice>,
    pub handler: ProxyHandler,
}

impl WriterProxy {
    #[must_use]
    pub fn new(handler: ProxyHandler) -> Self {
        Self {
            from: None,
            handler,
        }
    }

    pub fn bind(&mut self, output_device: OutputDevice) {
        self.from = Some(output_device);
    }

    #[must_use]
    pub fn is_bound(&self) -> bool { self.from.is_some() }
}

impl Write for WriterProxy {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.handler.observe(buf, 0, None);

        match &self.from {
            Some(output_device) => output_device.lock()?.write(buf),
            None => Err(ProxyError::Unbound { which: "writer" }.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.from {
            Some(output_device) => output_device.lock()?.flush(),
            None => Ok(()),
        }
    }
}
