// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, PoisonError,
                atomic::{AtomicUsize, Ordering}};

use crate::StdMutex;

/// A counter that is cloned into a test double before it is moved away (eg: into
/// [`crate::ExecController`]), so the test can still see how often it was called.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn increment(&self) { self.0.fetch_add(1, Ordering::SeqCst); }

    #[must_use]
    pub fn get(&self) -> usize { self.0.load(Ordering::SeqCst) }
}

/// Ordered record of calls made across several test doubles, eg: to check that release
/// happens before run, and run before restore.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<StdMutex<Vec<&'static str>>>);

impl CallLog {
    pub fn push(&self, call: &'static str) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    #[must_use]
    pub fn get(&self) -> Vec<&'static str> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
