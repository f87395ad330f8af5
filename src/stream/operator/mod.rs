// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

/// Available window operators
pub mod window;

use crate::error::{Error, WindowResult};
use bytes::Bytes;
use std::{fmt, str::FromStr};

/// Capabilities a hosting runtime hands to an operator
///
/// All calls happen on the host's dispatch thread, from inside one of the
/// operator's entry points.
pub trait Host {
    /// Request a one-shot callback for `key` at or after `fire_at` (epoch millis)
    ///
    /// A timer may fire late but never early.
    fn schedule_timer(&mut self, key: &str, fire_at: u64) -> WindowResult<()>;
    /// Publish a message on an output stream, fire-and-forget
    fn emit_record(&mut self, stream: &str, key: String, value: Bytes);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn schedule_timer(&mut self, key: &str, fire_at: u64) -> WindowResult<()> {
        (**self).schedule_timer(key, fire_at)
    }
    fn emit_record(&mut self, stream: &str, key: String, value: Bytes) {
        (**self).emit_record(stream, key, value)
    }
}

/// Timer keys understood by the window operator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Opens the next window and reschedules itself one slide later
    Open,
    /// Closes every window whose end has passed
    Close,
}

impl TimerKey {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TimerKey::Open => "open",
            TimerKey::Close => "close",
        }
    }
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TimerKey::Open),
            "close" => Ok(TimerKey::Close),
            other => Err(Error::Unsupported {
                msg: format!("unexpected timer key {:?}", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_keys_round_trip_through_host_strings() {
        for key in &[TimerKey::Open, TimerKey::Close] {
            assert_eq!(key.as_str().parse::<TimerKey>().unwrap(), *key);
        }
        assert!("interval_loop".parse::<TimerKey>().is_err());
    }
}
