// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use crate::{InputDevice, StdMutex, StdinMock};

pub trait InputDeviceExt {
    /// An input device that yields `bytes` and then reaches end of stream.
    fn new_mock(bytes: &[u8]) -> InputDevice;

    fn new_mock_with(stdin_mock: StdinMock) -> InputDevice;
}

impl InputDeviceExt for InputDevice {
    fn new_mock(bytes: &[u8]) -> InputDevice {
        Self::new_mock_with(StdinMock::new(bytes, None))
    }

    fn new_mock_with(stdin_mock: StdinMock) -> InputDevice {
        InputDevice {
            resource: Arc::new(StdMutex::new(stdin_mock)),
            is_mock: true,
            maybe_raw_fd: None,
        }
    }
}
