// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

use crate::util::get_system_time;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Source of processing time in epoch milliseconds
pub trait Clock {
    fn now(&self) -> u64;
}

/// Wall clock time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> u64 {
        get_system_time()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a host can keep one handle while the
/// operator reads from another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    time: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        ManualClock {
            time: Arc::new(AtomicU64::new(start)),
        }
    }

    #[inline]
    pub fn set(&self, time: u64) {
        self.time.store(time, Ordering::SeqCst);
    }

    #[inline]
    pub fn advance(&self, by: u64) {
        self.time.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> u64 {
        self.time.load(Ordering::SeqCst)
    }
}
