// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{InputDevice, OutputDevice};

/// What [`crate::ExecController`] needs from the host app's terminal.
///
/// [`crate::CrosstermHostTerminal`] is the built-in implementation. Tests use
/// [`crate::MockHostTerminal`].
pub trait HostTerminal {
    /// Leave the host's managed terminal mode (raw mode, alternate screen, mouse
    /// capture, etc) so that an external command can use the terminal, and flush any
    /// pending output.
    ///
    /// # Errors
    ///
    /// If the terminal could not be released. Nothing is run in this case.
    fn release_terminal(&mut self) -> miette::Result<()>;

    /// Go back into the host's managed terminal mode after the external command is done.
    ///
    /// # Errors
    ///
    /// If the terminal could not be restored.
    fn restore_terminal(&mut self) -> miette::Result<()>;

    /// The host's raw input stream. The command's stdin proxy reads from this.
    fn input_device(&self) -> InputDevice;

    /// The host's raw output stream. The command's stdout and stderr proxies both write
    /// to this.
    fn output_device(&self) -> OutputDevice;
}
