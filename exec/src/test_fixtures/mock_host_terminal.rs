// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CallCounter,
            CallLog,
            HostTerminal,
            InputDevice,
            InputDeviceExt,
            OutputDevice,
            OutputDeviceExt,
            StdoutMock};

/// A [`HostTerminal`] with scripted release and restore outcomes, call counters, and mock
/// devices. Keep clones of the counters (and the [`StdoutMock`]) around before moving
/// this into an [`crate::ExecController`].
#[allow(missing_debug_implementations)]
pub struct MockHostTerminal {
    pub maybe_release_error: Option<String>,
    pub maybe_restore_error: Option<String>,
    pub release_counter: CallCounter,
    pub restore_counter: CallCounter,
    pub call_log: CallLog,
    pub input_device: InputDevice,
    pub output_device: OutputDevice,
    pub stdout_mock: StdoutMock,
}

impl Default for MockHostTerminal {
    fn default() -> Self { Self::new(b"") }
}

impl MockHostTerminal {
    /// A host whose input device yields `stdin_bytes`.
    #[must_use]
    pub fn new(stdin_bytes: &[u8]) -> Self {
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        Self {
            maybe_release_error: None,
            maybe_restore_error: None,
            release_counter: CallCounter::default(),
            restore_counter: CallCounter::default(),
            call_log: CallLog::default(),
            input_device: InputDevice::new_mock(stdin_bytes),
            output_device,
            stdout_mock,
        }
    }

    #[must_use]
    pub fn with_release_error(mut self, message: &str) -> Self {
        self.maybe_release_error = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn with_restore_error(mut self, message: &str) -> Self {
        self.maybe_restore_error = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn with_call_log(mut self, call_log: CallLog) -> Self {
        self.call_log = call_log;
        self
    }
}

impl HostTerminal for MockHostTerminal {
    fn release_terminal(&mut self) -> miette::Result<()> {
        self.release_counter.increment();
        self.call_log.push("release");
        match &self.maybe_release_error {
            Some(message) => Err(miette::miette!("{message}")),
            None => Ok(()),
        }
    }

    fn restore_terminal(&mut self) -> miette::Result<()> {
        self.restore_counter.increment();
        self.call_log.push("restore");
        match &self.maybe_restore_error {
            Some(message) => Err(miette::miette!("{message}")),
            None => Ok(()),
        }
    }

    fn input_device(&self) -> InputDevice { self.input_device.clone() }

    fn output_device(&self) -> OutputDevice { self.output_device.clone() }
}
