// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

pub mod arena;

pub use arena::{RecordArena, RecordId};
use bytes::Bytes;

/// A record received from the host
///
/// The timestamp is assigned by the operator at receipt and is the only
/// time used for windowing. Records are read-only once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    key: String,
    value: Bytes,
    timestamp: u64,
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<Bytes>, timestamp: u64) -> Self {
        Record {
            key: key.into(),
            value: value.into(),
            timestamp,
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Processing time (epoch millis) at which the record was received
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// A message handed to an output stream
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRecord {
    pub stream: String,
    pub key: String,
    pub value: Bytes,
}
