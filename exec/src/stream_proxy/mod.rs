// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Byte transparent wrappers around the host's input and output streams. Each proxy
//! forwards every byte unchanged, and reports the traffic to a [`ProxyHandler`] on the
//! side. This is how an app taps what an external command reads and writes while it owns
//! the terminal (eg: to log it, or count it) without changing what the command sees.
//!
//! The two variants call their handler at different points, and this is observable:
//!
//! | Proxy           | Handler is called                   | Handler sees                    |
//! | :-------------- | :---------------------------------- | :------------------------------ |
//! | [`ReaderProxy`] | after the source produced the bytes | `(buf, bytes_read, maybe_err)`  |
//! | [`WriterProxy`] | before the sink gets the bytes      | `(buf, 0, None)`                |
//!
//! Neither proxy buffers, splits, or retries anything.

// Attach.
pub mod proxy_error;
pub mod proxy_handler;
pub mod reader_proxy;
pub mod writer_proxy;

// Re-export.
pub use proxy_error::*;
pub use proxy_handler::*;
pub use reader_proxy::*;
pub use writer_proxy::*;
