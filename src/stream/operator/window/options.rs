// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

use crate::{
    conf::WindowConf,
    data::Record,
    error::{Error, WindowResult},
};
use bytes::Bytes;
use std::fmt;

pub type ReduceFn<ACC> = Box<dyn Fn(ACC, &Record) -> WindowResult<ACC> + Send>;
pub type ResultFn<ACC> = Box<dyn Fn(u64, &ACC) -> WindowResult<()> + Send>;
pub type SerializeFn<ACC> = Box<dyn Fn(&ACC) -> WindowResult<Bytes> + Send>;

/// Immutable settings of a [TimeWindow](super::TimeWindow)
///
/// The accumulator starts every window at `ACC::default()`, which must be
/// the identity of the reduction.
pub struct WindowOptions<ACC> {
    pub(crate) window_length: u64,
    pub(crate) slide_interval: u64,
    pub(crate) reducer: ReduceFn<ACC>,
    pub(crate) result_fn: ResultFn<ACC>,
    pub(crate) serializer: SerializeFn<ACC>,
    pub(crate) output_streams: Vec<String>,
}

impl<ACC> WindowOptions<ACC>
where
    ACC: Default + 'static,
{
    /// Creates options with a no-op result callback, no outputs and a
    /// serializer producing empty payloads
    pub fn new(
        window_length: u64,
        slide_interval: u64,
        reducer: impl Fn(ACC, &Record) -> WindowResult<ACC> + Send + 'static,
    ) -> WindowResult<Self> {
        if window_length == 0 {
            return Err(Error::Unsupported {
                msg: String::from("window length must be positive"),
            });
        }
        if slide_interval == 0 {
            return Err(Error::Unsupported {
                msg: String::from("slide interval must be positive"),
            });
        }

        Ok(WindowOptions {
            window_length,
            slide_interval,
            reducer: Box::new(reducer),
            result_fn: Box::new(|_: u64, _: &ACC| Ok(())),
            serializer: Box::new(|_: &ACC| Ok(Bytes::new())),
            output_streams: Vec::new(),
        })
    }

    /// Creates options from a loaded [WindowConf]
    pub fn from_conf(
        conf: &WindowConf,
        reducer: impl Fn(ACC, &Record) -> WindowResult<ACC> + Send + 'static,
    ) -> WindowResult<Self> {
        let mut opts = Self::new(conf.window_length, conf.slide_interval, reducer)?;
        opts.output_streams = conf.output_streams.clone();
        Ok(opts)
    }

    /// Callback invoked with (window begin, accumulator) for every closed window
    pub fn on_result(
        mut self,
        f: impl Fn(u64, &ACC) -> WindowResult<()> + Send + 'static,
    ) -> Self {
        self.result_fn = Box::new(f);
        self
    }

    pub fn serializer(mut self, f: impl Fn(&ACC) -> WindowResult<Bytes> + Send + 'static) -> Self {
        self.serializer = Box::new(f);
        self
    }

    pub fn output(mut self, stream: impl Into<String>) -> Self {
        self.output_streams.push(stream.into());
        self
    }

    #[inline]
    pub fn window_length(&self) -> u64 {
        self.window_length
    }

    #[inline]
    pub fn slide_interval(&self) -> u64 {
        self.slide_interval
    }

    #[inline]
    pub fn output_streams(&self) -> &[String] {
        &self.output_streams
    }
}

impl<ACC> fmt::Debug for WindowOptions<ACC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowOptions")
            .field("window_length", &self.window_length)
            .field("slide_interval", &self.slide_interval)
            .field("output_streams", &self.output_streams)
            .finish()
    }
}

/// Serializer for accumulators that are protobuf messages
pub fn prost_serializer<ACC: prost::Message>() -> impl Fn(&ACC) -> WindowResult<Bytes> + Send {
    |acc: &ACC| {
        let mut buf = Vec::with_capacity(acc.encoded_len());
        acc.encode(&mut buf)?;
        Ok(Bytes::from(buf))
    }
}

/// Serializer writing the accumulator's `Display` form as UTF-8
pub fn display_serializer<ACC: fmt::Display>() -> impl Fn(&ACC) -> WindowResult<Bytes> + Send {
    |acc: &ACC| Ok(Bytes::from(acc.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[derive(Message, Clone, PartialEq)]
    struct Summary {
        #[prost(uint64, tag = "1")]
        count: u64,
        #[prost(uint64, tag = "2")]
        max_latency: u64,
    }

    #[test]
    fn zero_length_or_slide_is_rejected() {
        assert!(matches!(
            WindowOptions::<u64>::new(0, 10, |acc, _| Ok(acc)),
            Err(Error::Unsupported { .. })
        ));
        assert!(matches!(
            WindowOptions::<u64>::new(10, 0, |acc, _| Ok(acc)),
            Err(Error::Unsupported { .. })
        ));
    }

    #[test]
    fn options_from_conf() {
        let conf = WindowConf {
            window_length: 6000,
            slide_interval: 2000,
            output_streams: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let opts = WindowOptions::<u64>::from_conf(&conf, |acc, _| Ok(acc + 1))
            .unwrap()
            .output("c");
        assert_eq!(opts.window_length(), 6000);
        assert_eq!(opts.slide_interval(), 2000);
        assert_eq!(opts.output_streams(), &["a", "b", "c"]);
    }

    #[test]
    fn prost_accumulator_serialises() {
        let summary = Summary {
            count: 3,
            max_latency: 42,
        };
        let bytes = (prost_serializer::<Summary>())(&summary).unwrap();
        assert_eq!(Summary::decode(bytes).unwrap(), summary);
    }

    #[test]
    fn display_accumulator_serialises() {
        let bytes = (display_serializer::<u64>())(&1337).unwrap();
        assert_eq!(&bytes[..], b"1337");
    }
}
