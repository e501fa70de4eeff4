//! Runs the bitmove move generator and search from the command line.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]
#![warn(clippy::option_unwrap_used, clippy::result_unwrap_used)]

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use clap::{App, Arg, ArgMatches, SubCommand, crate_version};
use log::info;
use simplelog::{WriteLogger, LevelFilter, Config as LogConfig};
use bitmove::chess::{variations, AttackTables, GameState};
use bitmove::chess::error::MagicError;
use bitmove::config::{Config, ConfigError};
use bitmove::engine::Searcher;

fn main() -> Result<(), Error> {
    let matches =
        App::new("bitmove")
            .version(crate_version!())
            .author("Mike Leany")
            .about("Bitboard move generation and search")
            .arg(Arg::with_name("config")
                .long("config")
                .short("c")
                .global(true)
                .value_name("CONFIG_FILE")
                .takes_value(true)
                .help("Reads settings from CONFIG_FILE instead of ~/.bitmove/config.yaml"))
            .arg(Arg::with_name("tables")
                .long("tables")
                .short("t")
                .global(true)
                .value_name("TABLE_FILE")
                .takes_value(true)
                .help("Loads the attack tables from a file written by magic-gen"))
            .arg(Arg::with_name("log")
                .long("log")
                .short("l")
                .global(true)
                .help("Turns on logging"))
            .arg(Arg::with_name("log-file")
                .long("log-file")
                .global(true)
                .value_name("LOG_FILE")
                .takes_value(true)
                .help("Sets the log file if logging is turned on [default: bitmove.log]"))
            .arg(Arg::with_name("log-level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .takes_value(true)
                .help("Sets the log level if logging is turned on [default: info]"))
            .subcommand(SubCommand::with_name("counts")
                .about("Counts the number of variations from the starting position to a \
                        specified depth")
                .arg(Arg::with_name("depth")
                    .long("depth")
                    .short("d")
                    .value_name("DEPTH")
                    .takes_value(true)
                    .required(true)
                    .help("Depth to search the position")))
            .subcommand(SubCommand::with_name("search")
                .about("Searches for the best move from the starting position, or after the \
                        given moves")
                .arg(Arg::with_name("depth")
                    .long("depth")
                    .short("d")
                    .value_name("DEPTH")
                    .takes_value(true)
                    .help("Depth to search, in plies [default: 4]"))
                .arg(Arg::with_name("moves")
                    .value_name("MOVES")
                    .multiple(true)
                    .help("Moves to play before searching, in coordinate notation (e2e4)")))
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
    if let Some(tables) = matches.value_of_os("tables") {
        config.tables = Some(PathBuf::from(tables));
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

    match matches.subcommand() {
        ("counts", Some(matches)) => {
            let depth = parse_depth(matches)?.ok_or_else(|| Error("missing depth".to_owned()))?;
            let tables = load_tables(&config)?;
            let mut state = GameState::new();

            let start = Instant::now();
            println!("\n{}", state);
            let count = variations::print(&mut state, &tables, depth);
            println!("Depth {} total:\t{:12}\n", depth, count);
            info!("counted {} variations at depth {} in {:?}", count, depth, start.elapsed());
        },
        ("search", Some(matches)) => {
            let depth = parse_depth(matches)?.or(config.search.depth).unwrap_or(4);
            let tables = load_tables(&config)?;
            let mut state = GameState::new();

            for text in matches.values_of("moves").into_iter().flatten() {
                let mv = state.parse_move(&tables, text)
                    .map_err(|err| Error(format!("{}: {}", text, err)))?;
                state.record_game_move(mv);
            }

            let mut searcher = Searcher::new(&tables);
            let best = searcher.search(&mut state, depth);
            match best.mv {
                Some(mv) => println!("best move: {} ({})", mv, best.value),
                None => println!("no legal moves ({})", best.value),
            }
            println!("nodes: {}", searcher.nodes());
        },
        _ => {
            eprintln!("{}", matches.usage());
        },
    }

    Ok(())
}

fn parse_depth(matches: &ArgMatches) -> Result<Option<usize>, Error> {
    match matches.value_of("depth") {
        Some(depth) => depth
            .parse()
            .map(Some)
            .map_err(|_| Error("depth must be numeric".to_owned())),
        None => Ok(None),
    }
}

fn load_tables(config: &Config) -> Result<AttackTables, Error> {
    let start = Instant::now();
    let tables = match &config.tables {
        Some(path) => {
            AttackTables::read_from(path)
                .map_err(|err| Error(format!("{}: {}", path.display(), err)))?
        },
        None => AttackTables::build(&mut config.magic.builder())?,
    };
    info!("attack tables ready in {:?}", start.elapsed());
    Ok(tables)
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
