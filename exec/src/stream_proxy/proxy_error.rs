// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

/// Errors produced by the proxies themselves (as opposed to errors from the streams
/// they wrap, which are passed through unchanged).
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ProxyError {
    /// The proxy was used before it was bound to a host stream.
    #[error("{which} proxy is not bound to a host stream")]
    #[diagnostic(
        code(r3bl_exec::proxy::unbound),
        help(
            "Proxies are bound to the host's input and output devices by the \
             ExecController right before the command runs"
        )
    )]
    Unbound {
        /// Which proxy (`"reader"` or `"writer"`).
        which: &'static str,
    },
}

impl From<ProxyError> for io::Error {
    fn from(error: ProxyError) -> Self {
        match error {
            ProxyError::Unbound { .. } => io::Error::new(io::ErrorKind::NotConnected, error),
        }
    }
}
