// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

use crossterm::{QueueableCommand,
                cursor::{Hide, MoveTo, Show},
                event::{DisableBracketedPaste,
                        DisableFocusChange,
                        DisableMouseCapture,
                        EnableBracketedPaste,
                        EnableFocusChange,
                        EnableMouseCapture},
                terminal::{self,
                           Clear,
                           ClearType,
                           EnterAlternateScreen,
                           LeaveAlternateScreen}};

use crate::{HostTerminal,
            InputDevice,
            OutputDevice,
            SendRawTerminal,
            TerminalModeError,
            TerminalModes,
            TerminalOp};

/// The built-in [`HostTerminal`], for hosts that drive their terminal with crossterm.
///
/// - [`Self::enter()`] and [`Self::exit()`] are for the host's own startup and shutdown.
/// - [`HostTerminal::release_terminal()`] and [`HostTerminal::restore_terminal()`] are
///   called by [`crate::ExecController`] around each external command.
///
/// When the output device is a mock, raw mode is never touched, only the escape
/// sequences are written. This is what the tests rely on.
#[allow(missing_debug_implementations)]
pub struct CrosstermHostTerminal {
    pub terminal_modes: TerminalModes,
    input_device: InputDevice,
    output_device: OutputDevice,
    set_raw_mode: RawModeSwitch,
    is_alternate_screen_active: bool,
    was_alternate_screen_active: bool,
}

impl CrosstermHostTerminal {
    /// Uses the process' stdin and stdout.
    #[must_use]
    pub fn new(terminal_modes: TerminalModes) -> Self {
        Self::new_with_devices(
            terminal_modes,
            InputDevice::new_stdin(),
            OutputDevice::new_stdout(),
        )
    }

    #[must_use]
    pub fn new_with_devices(
        terminal_modes: TerminalModes,
        input_device: InputDevice,
        output_device: OutputDevice,
    ) -> Self {
        let set_raw_mode: RawModeSwitch = if output_device.is_mock {
            skip_raw_mode
        } else {
            crossterm_raw_mode
        };
        Self {
            terminal_modes,
            input_device,
            output_device,
            set_raw_mode,
            is_alternate_screen_active: false,
            was_alternate_screen_active: false,
        }
    }

    /// Replace the function that turns raw mode on (`true`) and off (`false`).
    #[must_use]
    pub fn with_raw_mode_switch(mut self, set_raw_mode: RawModeSwitch) -> Self {
        self.set_raw_mode = set_raw_mode;
        self
    }

    #[must_use]
    pub fn is_alternate_screen_active(&self) -> bool { self.is_alternate_screen_active }

    /// Put the terminal into the host's managed mode: raw mode, then every mode in
    /// [`Self::terminal_modes`], then a cleared screen.
    ///
    /// # Errors
    ///
    /// [`TerminalModeError`] if raw mode can't be enabled or the sequences can't be
    /// written.
    pub fn enter(&mut self) -> miette::Result<()> {
        self.enable_raw_mode(TerminalOp::Enter)?;
        let enter_alternate_screen = self.terminal_modes.alternate_screen;
        self.write_enter_sequences(TerminalOp::Enter, enter_alternate_screen)?;
        tracing::debug!(message = "CrosstermHostTerminal::enter", modes = ?self.terminal_modes);
        Ok(())
    }

    /// Leave the host's managed mode for good. Unlike a release, nothing is remembered
    /// for a later restore.
    ///
    /// # Errors
    ///
    /// [`TerminalModeError`] if raw mode can't be disabled or the sequences can't be
    /// written.
    pub fn exit(&mut self) -> miette::Result<()> {
        self.leave(TerminalOp::Exit)?;
        self.was_alternate_screen_active = false;
        tracing::debug!(message = "CrosstermHostTerminal::exit");
        Ok(())
    }
}

impl HostTerminal for CrosstermHostTerminal {
    fn release_terminal(&mut self) -> miette::Result<()> {
        let was_alternate_screen_active = self.is_alternate_screen_active;
        self.leave(TerminalOp::Release)?;
        self.was_alternate_screen_active = was_alternate_screen_active;
        tracing::debug!(
            message = "CrosstermHostTerminal::release_terminal",
            was_alternate_screen_active = self.was_alternate_screen_active
        );
        Ok(())
    }

    fn restore_terminal(&mut self) -> miette::Result<()> {
        self.enable_raw_mode(TerminalOp::Restore)?;
        let enter_alternate_screen = self.was_alternate_screen_active;
        self.write_enter_sequences(TerminalOp::Restore, enter_alternate_screen)?;
        tracing::debug!(
            message = "CrosstermHostTerminal::restore_terminal",
            is_alternate_screen_active = self.is_alternate_screen_active
        );
        Ok(())
    }

    fn input_device(&self) -> InputDevice { self.input_device.clone() }

    fn output_device(&self) -> OutputDevice { self.output_device.clone() }
}

impl CrosstermHostTerminal {
    /// Raw mode goes first, so that a failure leaves the terminal untouched. If the
    /// sequences can't be written after that, raw mode is turned back on.
    fn leave(&mut self, op: TerminalOp) -> miette::Result<()> {
        self.disable_raw_mode(op)?;
        if let Err(report) = self.write_leave_sequences(op) {
            if let Err(undo_report) = self.enable_raw_mode(op) {
                tracing::warn!(
                    message = "CrosstermHostTerminal::leave -> can't re-enable raw mode",
                    ?op,
                    error = ?undo_report
                );
            }
            return Err(report);
        }
        Ok(())
    }

    fn write_enter_sequences(
        &mut self,
        op: TerminalOp,
        enter_alternate_screen: bool,
    ) -> miette::Result<()> {
        let modes = self.terminal_modes;
        self.write_sequences(op, |writer| {
            if enter_alternate_screen {
                writer.queue(EnterAlternateScreen)?;
            }
            // So that the host's next render repaints everything.
            writer.queue(MoveTo(0, 0))?;
            writer.queue(Clear(ClearType::All))?;
            if modes.mouse_capture {
                writer.queue(EnableMouseCapture)?;
            }
            if modes.bracketed_paste {
                writer.queue(EnableBracketedPaste)?;
            }
            if modes.focus_change {
                writer.queue(EnableFocusChange)?;
            }
            if modes.hide_cursor {
                writer.queue(Hide)?;
            }
            Ok(())
        })?;
        self.is_alternate_screen_active = enter_alternate_screen;
        Ok(())
    }

    fn write_leave_sequences(&mut self, op: TerminalOp) -> miette::Result<()> {
        let modes = self.terminal_modes;
        let leave_alternate_screen = self.is_alternate_screen_active;
        self.write_sequences(op, |writer| {
            if modes.mouse_capture {
                writer.queue(DisableMouseCapture)?;
            }
            if modes.bracketed_paste {
                writer.queue(DisableBracketedPaste)?;
            }
            if modes.focus_change {
                writer.queue(DisableFocusChange)?;
            }
            writer.queue(Show)?;
            if leave_alternate_screen {
                writer.queue(LeaveAlternateScreen)?;
            }
            Ok(())
        })?;
        self.is_alternate_screen_active = false;
        Ok(())
    }

    /// Queue the sequences with the output device locked, then flush.
    fn write_sequences(
        &self,
        op: TerminalOp,
        queue_fn: impl FnOnce(&mut SendRawTerminal) -> io::Result<()>,
    ) -> miette::Result<()> {
        let result = self.output_device.lock().and_then(|mut guard| {
            queue_fn(&mut *guard)?;
            guard.flush()
        });
        result.map_err(|source| TerminalModeError::WriteSequences { op, source }.into())
    }

    fn enable_raw_mode(&self, op: TerminalOp) -> miette::Result<()> {
        (self.set_raw_mode)(true)
            .map_err(|source| TerminalModeError::RawMode { op, source }.into())
    }

    fn disable_raw_mode(&self, op: TerminalOp) -> miette::Result<()> {
        (self.set_raw_mode)(false)
            .map_err(|source| TerminalModeError::RawMode { op, source }.into())
    }
}

/// Turns raw mode on when passed `true`, and off when passed `false`.
pub type RawModeSwitch = fn(bool) -> io::Result<()>;

fn crossterm_raw_mode(enable: bool) -> io::Result<()> {
    if enable {
        terminal::enable_raw_mode()
    } else {
        terminal::disable_raw_mode()
    }
}

fn skip_raw_mode(_enable: bool) -> io::Result<()> { Ok(()) }
