// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

pub mod timer;

pub use timer::TimerQueue;

use crate::{
    conf::{logger::WindowLogger, WindowConf},
    data::{OutputRecord, Record},
    error::WindowResult,
    stream::{
        operator::{
            window::{TimeWindow, WindowOptions},
            Host,
        },
        time::{Clock, ManualClock},
    },
};
use bytes::Bytes;
use slog::trace;

/// In-process [Host] keeping timers in a hash wheel and collecting output
pub struct LocalHost {
    timers: TimerQueue,
    outputs: Vec<OutputRecord>,
}

impl LocalHost {
    pub fn new(start: u64) -> Self {
        LocalHost {
            timers: TimerQueue::new(start),
            outputs: Vec::new(),
        }
    }

    pub fn outputs(&self) -> &[OutputRecord] {
        &self.outputs
    }

    pub fn take_outputs(&mut self) -> Vec<OutputRecord> {
        std::mem::take(&mut self.outputs)
    }
}

impl Host for LocalHost {
    fn schedule_timer(&mut self, key: &str, fire_at: u64) -> WindowResult<()> {
        self.timers.schedule_at(key.to_string(), fire_at);
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

/// Drives a [TimeWindow] on simulated processing time
///
/// Time only moves through [advance_to](LocalRuntime::advance_to), which
/// fires every due timer in time order with the clock set to the firing
/// instant. Records are delivered at the current time.
pub struct LocalRuntime<ACC> {
    operator: TimeWindow<ACC, LocalHost, ManualClock>,
    clock: ManualClock,
    logger: WindowLogger,
}

impl<ACC> LocalRuntime<ACC>
where
    ACC: Default + 'static,
{
    /// Creates the operator, starts it, and opens the first window at `start`
    pub fn new(options: WindowOptions<ACC>, start: u64, logger: WindowLogger) -> WindowResult<Self> {
        let clock = ManualClock::new(start);
        let mut operator = TimeWindow::with_clock(
            options,
            LocalHost::new(start),
            clock.clone(),
            logger.clone(),
        )?;
        operator.on_start()?;

        let mut runtime = LocalRuntime {
            operator,
            clock,
            logger,
        };
        runtime.advance_to(start)?;
        Ok(runtime)
    }

    /// Builds the runtime from a [WindowConf], logging where it says
    pub fn from_conf(
        conf: &WindowConf,
        reducer: impl Fn(ACC, &Record) -> WindowResult<ACC> + Send + 'static,
        start: u64,
    ) -> WindowResult<Self> {
        let options = WindowOptions::from_conf(conf, reducer)?;
        Self::new(options, start, conf.logger()?)
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Fires all timers due up to and including `time`
    ///
    /// If a timer handler fails, the timers of the same instant that did
    /// not run yet stay queued and the error is returned.
    pub fn advance_to(&mut self, time: u64) -> WindowResult<()> {
        while let Some((fired_at, keys)) = self.operator.host_mut().timers.poll(time) {
            self.clock.set(fired_at);
            let mut keys = keys.into_iter();
            while let Some(key) = keys.next() {
                trace!(self.logger, "Firing timer"; "key" => &key, "time" => fired_at);
                if let Err(err) = self.operator.on_timer_fired(&key, fired_at) {
                    self.operator.host_mut().timers.requeue(keys);
                    return Err(err);
                }
            }
        }
        if time > self.clock.now() {
            self.clock.set(time);
        }
        Ok(())
    }

    pub fn advance_by(&mut self, millis: u64) -> WindowResult<()> {
        self.advance_to(self.now().saturating_add(millis))
    }

    /// Hands a record to the operator at the current time
    pub fn deliver(&mut self, key: impl Into<String>, value: impl Into<Bytes>) {
        self.operator.on_record_received(key, value);
    }

    /// Moves time to `time` and delivers the record there
    pub fn deliver_at(
        &mut self,
        time: u64,
        key: impl Into<String>,
        value: impl Into<Bytes>,
    ) -> WindowResult<()> {
        self.advance_to(time)?;
        self.deliver(key, value);
        Ok(())
    }

    pub fn outputs(&self) -> &[OutputRecord] {
        self.operator.host().outputs()
    }

    pub fn take_outputs(&mut self) -> Vec<OutputRecord> {
        self.operator.host_mut().take_outputs()
    }

    pub fn operator(&self) -> &TimeWindow<ACC, LocalHost, ManualClock> {
        &self.operator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        conf::logger::{discard_logger, LoggerType},
        error::Error,
        stream::operator::window::display_serializer,
    };

    fn counting(length: u64, slide: u64) -> WindowOptions<u64> {
        WindowOptions::new(length, slide, |acc: u64, _: &Record| Ok(acc + 1))
            .unwrap()
            .serializer(display_serializer::<u64>())
            .output("out")
    }

    #[test]
    fn first_window_opens_at_start() {
        let runtime = LocalRuntime::new(counting(1000, 500), 5000, discard_logger()).unwrap();
        let head = runtime.operator().store().head().unwrap();
        assert_eq!((head.begin(), head.end()), (5000, 6000));
        assert_eq!(runtime.now(), 5000);
    }

    #[test]
    fn windows_keep_opening_every_slide() {
        let mut runtime = LocalRuntime::new(counting(1000, 250), 0, discard_logger()).unwrap();
        runtime.advance_to(2000).unwrap();

        let keys: Vec<&str> = runtime.outputs().iter().map(|o| o.key.as_str()).collect();
        // windows [0,1000) .. [1000,2000) have closed
        assert_eq!(keys, vec!["0", "250", "500", "750", "1000"]);
        assert_eq!(runtime.operator().metrics().windows_opened, 9);
        assert_eq!(runtime.now(), 2000);
    }

    #[test]
    fn failed_close_keeps_remaining_timers() {
        let options = WindowOptions::new(100, 100, |acc: u64, _: &Record| Ok(acc))
            .unwrap()
            .on_result(|begin, _| {
                if begin == 0 {
                    crate::udf_error!("first window rejected")
                } else {
                    Ok(())
                }
            })
            .output("out");
        let mut runtime = LocalRuntime::new(options, 0, discard_logger()).unwrap();

        // open and close are both due at 100, whichever fails first the other survives
        assert!(matches!(runtime.advance_to(100), Err(Error::Udf { .. })));
        runtime.advance_to(300).unwrap();

        let keys: Vec<&str> = runtime.outputs().iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["100", "200"]);
    }

    #[test]
    fn runtime_from_conf_logs_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let conf = WindowConf {
            window_length: 100,
            slide_interval: 100,
            output_streams: vec!["a".into(), "b".into()],
            logger_type: LoggerType::File,
            log_dir: dir.path().to_path_buf(),
        };
        let mut runtime =
            LocalRuntime::<u64>::from_conf(&conf, |acc, _| Ok(acc + 1), 0).unwrap();
        runtime.deliver_at(50, "k", "v").unwrap();
        runtime.advance_to(100).unwrap();

        let streams: Vec<&str> = runtime.outputs().iter().map(|o| o.stream.as_str()).collect();
        assert_eq!(streams, vec!["a", "b"]);
        assert!(dir.path().join(crate::conf::logger::WINDOW_LOG_NAME).is_file());
    }
}
