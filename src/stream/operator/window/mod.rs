// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

pub mod options;
pub mod processing_time;

pub use options::{display_serializer, prost_serializer, WindowOptions};
pub use processing_time::TimeWindow;

use crate::{
    data::{Record, RecordArena, RecordId},
    error::WindowResult,
};
use std::collections::VecDeque;

/// A window over processing time
///
/// Holds records whose timestamp lies strictly between `begin` and `end`.
#[derive(Debug)]
pub struct Window {
    begin: u64,
    end: u64,
    records: Vec<RecordId>,
}

impl Window {
    fn new(begin: u64, end: u64) -> Self {
        debug_assert!(end > begin);
        Window {
            begin,
            end,
            records: Vec::new(),
        }
    }

    #[inline]
    pub fn begin(&self) -> u64 {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Amount of records assigned to the window
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Boundary timestamps belong to neither neighbour
    #[inline]
    pub fn contains(&self, timestamp: u64) -> bool {
        timestamp > self.begin && timestamp < self.end
    }

    #[inline]
    pub fn is_closed(&self, now: u64) -> bool {
        now >= self.end
    }
}

/// Open windows in creation order
///
/// Windows are appended at the tail and only ever removed from the head.
/// All windows share one length, so begin and end are both non-decreasing
/// along the queue and only the head has to be checked for closure.
pub struct WindowStore {
    window_length: u64,
    windows: VecDeque<Window>,
    arena: RecordArena,
}

impl WindowStore {
    pub fn new(window_length: u64) -> WindowResult<Self> {
        if window_length == 0 {
            return crate::reportable_error!("WindowStore created with a zero window length");
        }
        Ok(WindowStore {
            window_length,
            windows: VecDeque::new(),
            arena: RecordArena::new(),
        })
    }

    /// Append a window starting at `now`, returning its (begin, end)
    pub fn create_window(&mut self, now: u64) -> (u64, u64) {
        let end = now.saturating_add(self.window_length);
        self.windows.push_back(Window::new(now, end));
        (now, end)
    }

    /// Assign the record to every window containing its timestamp
    ///
    /// Returns the amount of windows it was assigned to. A record that
    /// matches nothing is dropped right away.
    pub fn route(&mut self, record: Record) -> usize {
        let ts = record.timestamp();
        let holders = self.windows.iter().filter(|w| w.contains(ts)).count();
        if holders == 0 {
            return 0;
        }

        let id = self.arena.insert(record, holders);
        for window in self.windows.iter_mut().filter(|w| w.contains(ts)) {
            window.records.push(id);
        }
        holders
    }

    /// Remove the head window if it has closed
    pub fn pop_closed(&mut self, now: u64) -> Option<Window> {
        match self.windows.front() {
            Some(head) if head.is_closed(now) => self.windows.pop_front(),
            _ => None,
        }
    }

    /// Remove every closed window at the head, oldest first
    ///
    /// Records of the returned windows stay available through
    /// [records](WindowStore::records) until the window is released.
    pub fn drain_closed(&mut self, now: u64) -> Vec<Window> {
        let mut closed = Vec::new();
        while let Some(window) = self.pop_closed(now) {
            closed.push(window);
        }
        closed
    }

    /// Records of a window in delivery order
    pub fn records<'a>(&'a self, window: &'a Window) -> impl Iterator<Item = &'a Record> + 'a {
        window
            .records
            .iter()
            .filter_map(move |id| self.arena.get(*id))
    }

    /// Give up a closed window's hold on its records
    pub fn release(&mut self, window: Window) {
        for id in window.records {
            self.arena.release(id);
        }
    }

    #[inline]
    pub fn window_length(&self) -> u64 {
        self.window_length
    }

    pub fn head(&self) -> Option<&Window> {
        self.windows.front()
    }

    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter()
    }

    /// Amount of open windows
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Amount of records held by at least one window
    pub fn buffered_records(&self) -> usize {
        self.arena.live()
    }
}
