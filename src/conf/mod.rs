// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

pub mod logger;

use crate::error::{Error, WindowResult};
use hocon::HoconLoader;
use logger::{file_logger, term_logger, LoggerType, WindowLogger};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration for a time window operator
///
/// The window functions themselves are code and are supplied when
/// building [WindowOptions](crate::stream::operator::window::WindowOptions)
/// from this configuration.
#[derive(Deserialize, Clone, Debug)]
pub struct WindowConf {
    /// Length of every window in milliseconds
    #[serde(default = "window_length_default")]
    pub window_length: u64,
    /// Milliseconds between the start of two consecutive windows
    #[serde(default = "slide_interval_default")]
    pub slide_interval: u64,
    /// Streams that every window result is emitted to
    #[serde(default = "output_streams_default")]
    pub output_streams: Vec<String>,
    /// [LoggerType] for operator logging
    #[serde(default)]
    pub logger_type: LoggerType,
    /// Directory for the log file when `logger_type` is `File`
    #[serde(default = "log_dir_default")]
    pub log_dir: PathBuf,
}

impl Default for WindowConf {
    fn default() -> Self {
        WindowConf {
            window_length: window_length_default(),
            slide_interval: slide_interval_default(),
            output_streams: output_streams_default(),
            logger_type: Default::default(),
            log_dir: log_dir_default(),
        }
    }
}

impl WindowConf {
    /// Builds the logger selected by `logger_type`
    ///
    /// The file logger writes to `log_dir`, which is created if missing.
    pub fn logger(&self) -> WindowResult<WindowLogger> {
        match self.logger_type {
            LoggerType::File => {
                std::fs::create_dir_all(&self.log_dir)?;
                let mut path = self.log_dir.clone();
                path.push(logger::WINDOW_LOG_NAME);
                file_logger(path)
            }
            LoggerType::Terminal => Ok(term_logger()),
        }
    }

    /// Loads WindowConf from a file
    pub fn from_file(path: impl AsRef<Path>) -> WindowResult<WindowConf> {
        let data = std::fs::read_to_string(path).map_err(|e| Error::Config {
            msg: format!("Failed to read config file with err {}", e),
        })?;
        Self::from_hocon_str(&data)
    }

    /// Loads WindowConf from a HOCON string
    pub fn from_hocon_str(data: &str) -> WindowResult<WindowConf> {
        let loader: HoconLoader = HoconLoader::new().load_str(data).map_err(|e| Error::Config {
            msg: format!("Failed to load Hocon Loader with err {}", e),
        })?;

        let conf = loader.resolve().map_err(|e| Error::Config {
            msg: format!("Failed to resolve WindowConf with err {}", e),
        })?;
        Ok(conf)
    }
}

// Default values

fn window_length_default() -> u64 {
    1000
}

fn slide_interval_default() -> u64 {
    1000
}

fn output_streams_default() -> Vec<String> {
    vec![String::from("windowed")]
}

fn log_dir_default() -> PathBuf {
    let mut res = std::env::temp_dir();
    res.push("timewin");
    res
}
