// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

use crate::error::WindowResult;
use serde::Deserialize;
use slog::{o, Drain, Logger};
use std::{fs::OpenOptions, path::Path};

/// Alias for logger in timewin
pub type WindowLogger = Logger;

pub const WINDOW_LOG_NAME: &str = "timewin.log";

/// Defines a logger type
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum LoggerType {
    /// Logs output directly to the terminal
    Terminal,
    /// Logs output to file
    File,
}

impl Default for LoggerType {
    fn default() -> Self {
        LoggerType::Terminal
    }
}

pub fn term_logger() -> WindowLogger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).chan_size(1024).build().fuse();

    slog::Logger::root(
        drain,
        o!(
        "location" => slog::PushFnValue(|r: &slog::Record<'_>, ser: slog::PushFnValueSerializer<'_>| {
            ser.emit(format_args!("{}:{}", r.file(), r.line()))
        })),
    )
}

pub fn file_logger(log_path: impl AsRef<Path>) -> WindowResult<WindowLogger> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let decorator = slog_term::PlainDecorator::new(file);
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).chan_size(1024).build().fuse();

    Ok(slog::Logger::root(
        drain,
        o!(
        "location" => slog::PushFnValue(|r: &slog::Record<'_>, ser: slog::PushFnValueSerializer<'_>| {
            ser.emit(format_args!("{}:{}", r.file(), r.line()))
        })),
    ))
}

/// Logger that drops everything, handy for embedding and tests
pub fn discard_logger() -> WindowLogger {
    slog::Logger::root(slog::Discard, o!())
}
