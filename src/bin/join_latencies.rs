// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

#[macro_use]
extern crate clap;

use clap::{App, Arg};
use slog::{crit, warn};
use timewin::{
    conf::logger::term_logger,
    join::{join_files, split_files, DEFAULT_OUTPUT_CSV},
};

fn main() {
    let matches = App::new("join_latencies")
        .version(crate_version!())
        .about("Joins latency and hardware CSV files line by line into one table")
        .arg(
            Arg::with_name("latency_files")
                .long("latency_files")
                .takes_value(true)
                .help("Comma delimited list of latency files"),
        )
        .arg(
            Arg::with_name("hardware_files")
                .long("hardware_files")
                .takes_value(true)
                .help("Comma delimited list of hardware files"),
        )
        .arg(
            Arg::with_name("output_csv")
                .long("output_csv")
                .takes_value(true)
                .default_value(DEFAULT_OUTPUT_CSV)
                .help("CSV output file"),
        )
        .get_matches();

    let logger = term_logger();

    let latency_files = split_files(matches.value_of("latency_files").unwrap_or(""));
    let hardware_files = split_files(matches.value_of("hardware_files").unwrap_or(""));
    let output = matches
        .value_of("output_csv")
        .expect("Has default, should not fail");

    if latency_files.is_empty() {
        warn!(logger, "No latency files to process");
    }
    if hardware_files.is_empty() {
        warn!(logger, "No hardware files to process");
    }

    if let Err(err) = join_files(&latency_files, &hardware_files, output, &logger) {
        crit!(logger, "{}", err);
        // let the async drain flush before exiting
        drop(logger);
        std::process::exit(1);
    }
}
