// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

use super::Record;
use std::collections::VecDeque;

/// Handle to a record stored in a [RecordArena]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

struct Slot {
    record: Option<Record>,
    holders: usize,
}

/// Storage for records shared by overlapping windows
///
/// Every record is stored once together with the number of windows
/// holding it. The record is dropped when its last holder releases it,
/// and slots are reclaimed from the front as soon as they are empty.
/// Ids grow monotonically so a handle never aliases a newer record.
#[derive(Default)]
pub struct RecordArena {
    slots: VecDeque<Slot>,
    base: u64,
}

impl RecordArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record that is held by `holders` windows
    pub fn insert(&mut self, record: Record, holders: usize) -> RecordId {
        debug_assert!(holders > 0, "records without holders are dropped, not stored");
        let id = RecordId(self.base + self.slots.len() as u64);
        self.slots.push_back(Slot {
            record: Some(record),
            holders,
        });
        id
    }

    #[inline]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.slot(id).and_then(|s| s.record.as_ref())
    }

    /// Drop one holder of the record
    pub fn release(&mut self, id: RecordId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.holders = slot.holders.saturating_sub(1);
            if slot.holders == 0 {
                slot.record = None;
            }
        }
        self.compact();
    }

    /// Amount of records still held by some window
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|s| s.record.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn compact(&mut self) {
        while let Some(Slot { record: None, .. }) = self.slots.front() {
            self.slots.pop_front();
            self.base += 1;
        }
    }

    #[inline]
    fn index(&self, id: RecordId) -> Option<usize> {
        id.0.checked_sub(self.base).map(|i| i as usize)
    }

    fn slot(&self, id: RecordId) -> Option<&Slot> {
        self.index(id).and_then(move |i| self.slots.get(i))
    }

    fn slot_mut(&mut self, id: RecordId) -> Option<&mut Slot> {
        match self.index(id) {
            Some(i) => self.slots.get_mut(i),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_record_lives_until_last_release() {
        let mut arena = RecordArena::new();
        let id = arena.insert(Record::new("k", "v", 10), 2);

        arena.release(id);
        assert_eq!(arena.get(id).map(|r| r.timestamp()), Some(10));

        arena.release(id);
        assert!(arena.get(id).is_none());
        assert!(arena.is_empty());
    }

    #[test]
    fn slots_are_reclaimed_from_the_front() {
        let mut arena = RecordArena::new();
        let first = arena.insert(Record::new("a", "1", 1), 1);
        let second = arena.insert(Record::new("b", "2", 2), 1);

        // releasing the newer record frees it but keeps the slot
        arena.release(second);
        assert!(arena.get(second).is_none());
        assert_eq!(arena.live(), 1);
        assert!(!arena.is_empty());

        arena.release(first);
        assert!(arena.is_empty());

        // ids keep growing after compaction
        let third = arena.insert(Record::new("c", "3", 3), 1);
        assert!(third > second);
        assert_eq!(arena.get(third).map(|r| r.key()), Some("c"));
        assert!(arena.get(first).is_none());
    }
}
