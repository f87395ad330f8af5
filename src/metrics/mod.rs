// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

#[cfg(feature = "metrics")]
use ::metrics::increment_counter;

/// Counters kept by a time window operator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowMetrics {
    pub windows_opened: u64,
    pub windows_emitted: u64,
    pub empty_windows: u64,
    pub records_routed: u64,
    pub records_dropped: u64,
}

impl WindowMetrics {
    #[inline]
    pub(crate) fn window_opened(&mut self) {
        self.windows_opened += 1;
        #[cfg(feature = "metrics")]
        increment_counter!("timewin_windows_opened");
    }

    #[inline]
    pub(crate) fn window_emitted(&mut self, records: usize) {
        self.windows_emitted += 1;
        if records == 0 {
            self.empty_windows += 1;
        }
        #[cfg(feature = "metrics")]
        increment_counter!("timewin_windows_emitted");
    }

    #[inline]
    pub(crate) fn record_routed(&mut self) {
        self.records_routed += 1;
        #[cfg(feature = "metrics")]
        increment_counter!("timewin_records_routed");
    }

    #[inline]
    pub(crate) fn record_dropped(&mut self) {
        self.records_dropped += 1;
        #[cfg(feature = "metrics")]
        increment_counter!("timewin_records_dropped");
    }
}
