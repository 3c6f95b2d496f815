/*
 *   Copyright (c) 2024-2025 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

use std::{io,
          sync::{Arc, MutexGuard}};

use crate::{SafeRawTerminal, SendRawTerminal, StdMutex};

/// This struct represents the host's output device, the thing that the host app paints
/// to, and that an external command's stdout and stderr get routed to while the terminal
/// is handed off.
/// - It is safe to clone. All the clones share the same underlying resource.
/// - To write to it, see [`Self::lock()`].
#[derive(Clone)]
pub struct OutputDevice {
    pub resource: SafeRawTerminal,
    pub is_mock: bool,
}

impl std::fmt::Debug for OutputDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputDevice")
            .field("is_mock", &self.is_mock)
            .finish_non_exhaustive()
    }
}

impl Default for OutputDevice {
    fn default() -> Self { Self::new_stdout() }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Arc::new(StdMutex::new(io::stdout())),
            is_mock: false,
        }
    }
}

impl OutputDevice {
    /// Locks the output device for writing.
    ///
    /// ```
    /// use r3bl_exec::OutputDevice;
    ///
    /// let device = OutputDevice::new_stdout();
    /// if let Ok(mut locked) = device.lock() {
    ///     let _ = locked.write_all(b"Hello, world!\n");
    /// }
    /// ```
    ///
    /// Don't call this again while the returned guard is alive in the same scope, it
    /// will deadlock.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the mutex is poisoned, which happens when a thread
    /// panicked while holding the lock.
    pub fn lock(&self) -> io::Result<MutexGuard<'_, SendRawTerminal>> {
        self.resource
            .lock()
            .map_err(|e| io::Error::other(format!("output device lock poisoned: {e}")))
    }
}
