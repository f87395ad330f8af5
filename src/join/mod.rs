// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

//! Line-joins latency and hardware CSV files into one table.

use crate::{conf::logger::WindowLogger, error::WindowResult};
use slog::{debug, info};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

pub const DEFAULT_OUTPUT_CSV: &str = "latency_hardware_aggregate.csv";

const MAX_NAME_LEN: usize = 25;
const KEPT_NAME_LEN: usize = 21;

/// Kinds of CSV files the joiner understands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// date, time, p50, p999
    Latency,
    /// date, time, 1min, 5min, free_mem_gb, used_mem_gb, percentage_used
    Hardware,
}

impl SourceKind {
    fn prefix(self) -> &'static str {
        match self {
            SourceKind::Latency => "latency_",
            SourceKind::Hardware => "hardware_",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            SourceKind::Latency => &["date", "time", "p50", "p999"],
            SourceKind::Hardware => &[
                "date",
                "time",
                "1min",
                "5min",
                "free_mem_gb",
                "used_mem_gb",
                "percentage_used",
            ],
        }
    }

    /// Row of empty columns written for an exhausted file
    pub fn delimiter(self) -> &'static str {
        match self {
            SourceKind::Latency => ",,,",
            SourceKind::Hardware => ",,,,,,",
        }
    }

    /// Column names for a file of this kind
    ///
    /// Long file names keep 21 characters starting 25 from the end, and
    /// characters that are awkward in a column name become `_`.
    pub fn header(self, file_name: &str) -> String {
        let chars: Vec<char> = file_name.chars().collect();
        let name: String = if chars.len() > MAX_NAME_LEN {
            let start = chars.len() - MAX_NAME_LEN;
            chars[start..start + KEPT_NAME_LEN].iter().collect()
        } else {
            file_name.to_string()
        };
        let base: String = format!("{}{}", self.prefix(), name)
            .chars()
            .map(|c| match c {
                ':' | '/' | '.' | '-' => '_',
                c => c,
            })
            .collect();

        self.columns()
            .iter()
            .map(|col| format!("{}_{}", base, col))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// What the joiner needs from an input
pub trait LineSource {
    fn delimiter(&self) -> &'static str;
    fn header(&self) -> String;
    /// Next line without trailing whitespace, or the delimiter row once
    /// the line is blank or the input is exhausted
    fn next_line(&mut self) -> WindowResult<String>;
    fn is_exhausted(&self) -> bool;
}

/// A CSV input of a given [SourceKind]
pub struct CsvSource<R: BufRead> {
    kind: SourceKind,
    name: String,
    reader: R,
    lines: u64,
    exhausted: bool,
}

impl CsvSource<BufReader<File>> {
    pub fn open(kind: SourceKind, path: impl AsRef<Path>) -> WindowResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("File {}, failed to open: {}", path.display(), e),
            )
        })?;
        Ok(Self::from_reader(
            kind,
            path.to_string_lossy(),
            BufReader::new(file),
        ))
    }
}

impl<R: BufRead> CsvSource<R> {
    pub fn from_reader(kind: SourceKind, name: impl Into<String>, reader: R) -> Self {
        CsvSource {
            kind,
            name: name.into(),
            reader,
            lines: 0,
            exhausted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Lines requested so far
    pub fn lines(&self) -> u64 {
        self.lines
    }
}

impl<R: BufRead> LineSource for CsvSource<R> {
    fn delimiter(&self) -> &'static str {
        self.kind.delimiter()
    }

    fn header(&self) -> String {
        self.kind.header(&self.name)
    }

    fn next_line(&mut self) -> WindowResult<String> {
        self.lines += 1;
        if !self.exhausted {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                self.exhausted = true;
            } else {
                let trimmed = line.trim_end_matches(&[' ', '\n', '\r', '\t'][..]);
                if !trimmed.is_empty() {
                    return Ok(trimmed.to_string());
                }
            }
        }
        Ok(self.delimiter().to_string())
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Splits a comma separated list of paths, skipping empty entries
pub fn split_files(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|f| !f.is_empty())
        .map(String::from)
        .collect()
}

/// Writes the joined table of `sources` to `out`, returning the amount of data rows
///
/// The first line of every source is its own header and is skipped. Rows
/// are written until every source is exhausted.
pub fn join<S, W>(sources: &mut [S], out: &mut W, logger: &WindowLogger) -> WindowResult<u64>
where
    S: LineSource,
    W: Write,
{
    let header = sources
        .iter()
        .map(|s| s.header())
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out, "{}", header)?;

    for source in sources.iter_mut() {
        source.next_line()?;
    }

    let mut rows = 0;
    loop {
        let mut row = Vec::with_capacity(sources.len());
        for source in sources.iter_mut() {
            row.push(source.next_line()?);
        }
        if sources.iter().all(|s| s.is_exhausted()) {
            break;
        }
        writeln!(out, "{}", row.join(","))?;
        rows += 1;
    }
    out.flush()?;

    debug!(logger, "Joined {} rows from {} files", rows, sources.len());
    Ok(rows)
}

/// Opens all inputs, then writes their joined table to `output`
pub fn join_files(
    latency_files: &[String],
    hardware_files: &[String],
    output: impl AsRef<Path>,
    logger: &WindowLogger,
) -> WindowResult<u64> {
    let mut sources = Vec::with_capacity(latency_files.len() + hardware_files.len());
    for f in latency_files {
        info!(logger, "Adding latency file: {}", f);
        sources.push(CsvSource::open(SourceKind::Latency, f)?);
    }
    for f in hardware_files {
        info!(logger, "Adding hardware file: {}", f);
        sources.push(CsvSource::open(SourceKind::Hardware, f)?);
    }
    info!(logger, "Processing {} files", sources.len());

    let output = output.as_ref();
    let file = File::create(output).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("could not open {}: {}", output.display(), e),
        )
    })?;
    let mut writer = BufWriter::new(file);
    let rows = join(&mut sources, &mut writer, logger)?;
    info!(logger, "Finished processing");
    Ok(rows)
}
