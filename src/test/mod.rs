// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only


use crate::{
    data::OutputRecord,
    error::{Error, WindowResult},
    stream::operator::Host,
};
use bytes::Bytes;

/// Host that only remembers what it was asked to do
#[derive(Default)]
pub struct RecordingHost {
    pub timers: Vec<(String, u64)>,
    pub outputs: Vec<OutputRecord>,
    refused: Option<String>,
}

impl RecordingHost {
    /// A host that rejects every timer scheduled under `key`
    pub fn refusing(key: &str) -> Self {
        RecordingHost {
            refused: Some(key.to_string()),
            ..Default::default()
        }
    }
}

impl Host for RecordingHost {
    fn schedule_timer(&mut self, key: &str, fire_at: u64) -> WindowResult<()> {
        if self.refused.as_deref() == Some(key) {
            return Err(Error::Unsupported {
                msg: format!("timer {} refused", key),
            });
        }
        self.timers.push((key.to_string(), fire_at));
        Ok(())
    }

    fn emit_record(&mut self, stream: &str, key: String, value: Bytes) {
        self.outputs.push(OutputRecord {
            stream: stream.to_string(),
            key,
            value,
        });
    }
}
