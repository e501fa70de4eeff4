//! Searches for magic multipliers and writes the attack tables to a file.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use clap::{App, Arg, crate_version};
use log::info;
use simplelog::{WriteLogger, LevelFilter, Config as LogConfig};
use bitmove::chess::AttackTables;
use bitmove::chess::error::{MagicError, TableError};
use bitmove::config::{Config, ConfigError};

fn main() -> Result<(), Error> {
    let matches =
        App::new("magic-gen")
            .version(crate_version!())
            .author("Mike Leany")
            .about("Searches for magic multipliers and writes the rook, bishop, knight, king \
                    and pawn\nattack tables to OUTPUT.")
            .arg(Arg::with_name("output")
                .value_name("OUTPUT")
                .required(true)
                .help("File to write the tables to"))
            .arg(Arg::with_name("seed")
                .long("seed")
                .short("s")
                .value_name("SEED")
                .takes_value(true)
                .help("Seeds the random number generator, for reproducible tables"))
            .arg(Arg::with_name("max-tries")
                .long("max-tries")
                .value_name("COUNT")
                .takes_value(true)
                .help("Candidates to try per square before giving up"))
            .arg(Arg::with_name("config")
                .long("config")
                .short("c")
                .value_name("CONFIG_FILE")
                .takes_value(true)
                .help("Reads settings from CONFIG_FILE instead of ~/.bitmove/config.yaml"))
            .arg(Arg::with_name("log")
                .long("log")
                .short("l")
                .help("Turns on logging"))
            .arg(Arg::with_name("log-file")
                .long("log-file")
                .value_name("LOG_FILE")
                .takes_value(true)
                .help("Sets the log file if logging is turned on [default: bitmove.log]"))
            .arg(Arg::with_name("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .takes_value(true)
                .help("Sets the log level if logging is turned on [default: info]"))
            .get_matches();

    let mut config = Config::load(matches.value_of_os("config").map(Path::new))?;
    if matches.is_present("log") {
        config.log.enabled = true;
    }
    if let Some(file) = matches.value_of_os("log-file") {
        config.log.file = PathBuf::from(file);
    }
    if let Some(level) = matches.value_of("log-level") {
        config.log.level = level.to_owned();
    }
    if let Some(seed) = matches.value_of("seed") {
        config.magic.seed = Some(seed.parse().map_err(|_| Error("seed must be numeric".to_owned()))?);
    }
    if let Some(tries) = matches.value_of("max-tries") {
        config.magic.max_tries = Some(
            tries.parse().map_err(|_| Error("max-tries must be numeric".to_owned()))?
        );
    }

    let _logger = if config.log.enabled {
        WriteLogger::init(
            config.log.level_filter()?,
            LogConfig::default(),
            File::create(&config.log.file).map_err(|err| {
                Error(format!("{}: {}", config.log.file.display(), err))
            })?)
    } else {
        WriteLogger::init(LevelFilter::Off, LogConfig::default(), std::io::sink())
    };

    let output = PathBuf::from(matches.value_of_os("output").expect("INFALLIBLE"));

    let start = Instant::now();
    let tables = AttackTables::build(&mut config.magic.builder())?;
    info!("tables built in {:?}", start.elapsed());

    tables.write_to(&output)?;
    info!("tables written to {}", output.display());

    Ok(())
}

struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.fmt(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error { }

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error(err.to_string())
    }
}

impl From<MagicError> for Error {
    fn from(err: MagicError) -> Self {
        Error(err.to_string())
    }
}

impl From<TableError> for Error {
    fn from(err: TableError) -> Self {
        Error(err.to_string())
    }
}
