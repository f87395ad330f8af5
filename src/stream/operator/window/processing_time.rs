// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

use super::{Window, WindowOptions, WindowStore};
use crate::{
    conf::logger::WindowLogger,
    data::Record,
    error::WindowResult,
    metrics::WindowMetrics,
    stream::{
        operator::{Host, TimerKey},
        time::{Clock, SystemClock},
    },
};
use bytes::Bytes;
use slog::{crit, debug, info, trace};

/*
    TimeWindow
        * Windows over processing time, records are stamped on arrival
        * An "open" timer creates a window every slide interval
        * A "close" timer per window reduces and emits every closed window
        * Results leave in window creation order, keyed by window begin
*/

/// Sliding or tumbling window operator over processing time
///
/// ACC: Accumulator of the reduction
/// H: Host capabilities for timers and output
/// C: Clock used to stamp records and open/close windows
pub struct TimeWindow<ACC, H, C = SystemClock>
where
    H: Host,
    C: Clock,
{
    options: WindowOptions<ACC>,
    store: WindowStore,
    host: H,
    clock: C,
    logger: WindowLogger,
    metrics: WindowMetrics,
}

impl<ACC, H> TimeWindow<ACC, H, SystemClock>
where
    ACC: Default + 'static,
    H: Host,
{
    pub fn new(options: WindowOptions<ACC>, host: H, logger: WindowLogger) -> WindowResult<Self> {
        Self::with_clock(options, host, SystemClock, logger)
    }
}

impl<ACC, H, C> TimeWindow<ACC, H, C>
where
    ACC: Default + 'static,
    H: Host,
    C: Clock,
{
    pub fn with_clock(
        options: WindowOptions<ACC>,
        host: H,
        clock: C,
        logger: WindowLogger,
    ) -> WindowResult<Self> {
        Ok(TimeWindow {
            store: WindowStore::new(options.window_length)?,
            options,
            host,
            clock,
            logger,
            metrics: WindowMetrics::default(),
        })
    }

    /// Schedules the first window to open right away
    pub fn on_start(&mut self) -> WindowResult<()> {
        let now = self.clock.now();
        debug!(self.logger, "Starting time window"; "now" => now,
            "length" => self.options.window_length, "slide" => self.options.slide_interval);
        self.host.schedule_timer(TimerKey::Open.as_str(), now)
    }

    /// Stamps the record with the current time and adds it to every open
    /// window containing that time
    pub fn on_record_received(&mut self, key: impl Into<String>, value: impl Into<Bytes>) {
        let record = Record::new(key, value, self.clock.now());
        let timestamp = record.timestamp();
        if self.store.route(record) == 0 {
            trace!(self.logger, "Dropping record outside of any open window"; "timestamp" => timestamp);
            self.metrics.record_dropped();
        } else {
            self.metrics.record_routed();
        }
    }

    /// Handles a timer the operator scheduled earlier
    ///
    /// # Panics
    ///
    /// Panics on a key the operator never scheduled, as that means the host
    /// broke its scheduling contract.
    pub fn on_timer_fired(&mut self, key: &str, fired_at: u64) -> WindowResult<()> {
        match key.parse::<TimerKey>() {
            Ok(TimerKey::Open) => self.open_window(),
            Ok(TimerKey::Close) => self.close_windows(fired_at),
            Err(err) => {
                crit!(self.logger, "Unexpected type of timer was fired"; "key" => key);
                panic!("{}", err)
            }
        }
    }

    fn open_window(&mut self) -> WindowResult<()> {
        let (begin, end) = self.store.create_window(self.clock.now());
        self.metrics.window_opened();
        info!(self.logger, "Creating window"; "begin" => begin, "end" => end);

        // keep the open chain alive even if the close timer is refused
        self.host.schedule_timer(
            TimerKey::Open.as_str(),
            begin.saturating_add(self.options.slide_interval),
        )?;
        self.host.schedule_timer(TimerKey::Close.as_str(), end)
    }

    // Close timers may arrive in any order, so flush the whole closed prefix
    fn close_windows(&mut self, fired_at: u64) -> WindowResult<()> {
        let now = self.clock.now();
        debug!(self.logger, "Processing windows"; "fired_at" => fired_at, "now" => now);
        while let Some(window) = self.store.pop_closed(now) {
            self.emit(window)?;
        }
        Ok(())
    }

    fn emit(&mut self, window: Window) -> WindowResult<()> {
        let begin = window.begin();
        let records = window.len();

        let reducer = &self.options.reducer;
        let acc = self
            .store
            .records(&window)
            .try_fold(ACC::default(), |acc, record| reducer(acc, record));
        self.store.release(window);
        let acc = acc?;

        (self.options.result_fn)(begin, &acc)?;
        let value = (self.options.serializer)(&acc)?;
        let key = begin.to_string();
        for stream in &self.options.output_streams {
            self.host.emit_record(stream, key.clone(), value.clone());
        }

        self.metrics.window_emitted(records);
        debug!(self.logger, "Closing window"; "begin" => begin, "records" => records);
        Ok(())
    }

    pub fn options(&self) -> &WindowOptions<ACC> {
        &self.options
    }

    pub fn store(&self) -> &WindowStore {
        &self.store
    }

    pub fn metrics(&self) -> WindowMetrics {
        self.metrics
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
