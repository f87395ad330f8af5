// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

//! timewin aggregates streams over processing-time windows.
//!
//! A [TimeWindow](stream::operator::window::TimeWindow) is driven by a
//! host runtime through timer and record callbacks. Every slide interval
//! it opens a window, buffers the records that arrive strictly inside it,
//! and once the window has closed it folds them with a user reduction and
//! emits the result to every configured output.

// Public Interface

/// Configuration and logging
pub mod conf;
/// Records and the storage shared by overlapping windows
pub mod data;
/// Error types
pub mod error;
/// In-process host that drives operators on simulated time
pub mod host;
/// Batch joining of latency and hardware CSV files
pub mod join;
/// Operator counters
pub mod metrics;
/// Contains the core stream logic
pub mod stream;

// Internal modules

/// Test module containing some more complex unit tests
#[cfg(test)]
mod test;
/// Internal Utilities
mod util;

/// Helper module that imports everything related to timewin into scope
pub mod prelude {
    pub use crate::{
        conf::{
            logger::{discard_logger, file_logger, term_logger, LoggerType, WindowLogger},
            WindowConf,
        },
        data::{OutputRecord, Record},
        error::{Error, WindowResult},
        host::{LocalHost, LocalRuntime},
        metrics::WindowMetrics,
        stream::{
            operator::{
                window::{
                    display_serializer, prost_serializer, TimeWindow, Window, WindowOptions,
                    WindowStore,
                },
                Host, TimerKey,
            },
            time::{Clock, ManualClock, SystemClock},
        },
    };
}
