// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

use hierarchical_hash_wheel_timer::{
    wheels::{quad_wheel::*, *},
    *,
};
use std::time::Duration;

/// Timer queue for a local host
///
/// Wraps a [QuadWheelWithOverflow] with an absolute notion of time in
/// epoch milliseconds. Entries scheduled at or before the current time
/// are kept aside and fire on the next poll, so nothing fires early.
pub struct TimerQueue {
    timer: QuadWheelWithOverflow<String>,
    time: u64,
    ready: Vec<String>,
}

impl TimerQueue {
    pub fn new(start: u64) -> Self {
        TimerQueue {
            timer: QuadWheelWithOverflow::default(),
            time: start,
            ready: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn current_time(&self) -> u64 {
        self.time
    }

    /// Amount of entries that are due right now
    pub fn ready(&self) -> usize {
        self.ready.len()
    }

    pub fn schedule_at(&mut self, key: String, time: u64) {
        if time <= self.time {
            self.ready.push(key);
            return;
        }
        let delay = time - self.time;
        // insertion only fails for entries that are already due
        if let Err(TimerError::Expired(key)) = self
            .timer
            .insert_with_delay(key, Duration::from_millis(delay))
        {
            self.ready.push(key);
        }
    }

    /// Puts entries back so they fire on the next poll
    pub fn requeue(&mut self, keys: impl IntoIterator<Item = String>) {
        self.ready.extend(keys);
    }

    /// Moves time forward until the next batch of entries expires
    ///
    /// Returns the batch together with its expiry time, or `None` once
    /// `until` is reached without anything expiring. Time never moves
    /// past `until`.
    pub fn poll(&mut self, until: u64) -> Option<(u64, Vec<String>)> {
        if !self.ready.is_empty() {
            return Some((self.time, std::mem::take(&mut self.ready)));
        }

        while self.time < until {
            let time_left = std::cmp::min(until - self.time, std::u32::MAX as u64) as u32;
            match self.timer.can_skip() {
                Skip::Empty => {
                    // Timer is empty, no point in ticking it
                    self.time = until;
                    return None;
                }
                Skip::Millis(skip_ms) if skip_ms > 0 => {
                    let skip_ms = std::cmp::min(skip_ms, time_left);
                    self.timer.skip(skip_ms);
                    self.time += skip_ms as u64;
                }
                _ => {
                    let expired = self.timer.tick();
                    self.time += 1;
                    if !expired.is_empty() {
                        return Some((self.time, expired));
                    }
                }
            }
        }
        None
    }
}
