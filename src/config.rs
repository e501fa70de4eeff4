//! Settings read from a YAML configuration file
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! Every setting is optional. A file may look like this:
//!
//! ```yaml
//! tables: /usr/share/bitmove/tables.bin
//! log:
//!   enabled: true
//!   file: bitmove.log
//!   level: debug
//! magic:
//!   seed: 12345
//!   max_tries: 1000000
//! search:
//!   depth: 4
//! ```
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use crate::chess::magic::MagicBuilder;

/// Name of the configuration directory under the user's home directory
pub const APP_DIR: &str = ".bitmove";

/// Name of the configuration file inside `APP_DIR`
pub const CONFIG_FILE: &str = "config.yaml";

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error reading a configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read
    Io(String),
    /// The file is not valid YAML or does not match the expected layout
    Yaml(String),
    /// Unknown log level name
    InvalidLogLevel(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ConfigError::*;

        match self {
            Io(err) => write!(f, "cannot read configuration: {}", err),
            Yaml(err) => write!(f, "invalid configuration: {}", err),
            InvalidLogLevel(level) => write!(f, "{}: invalid log level", level),
        }
    }
}

impl std::error::Error for ConfigError { }

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err.to_string())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Turns on logging
    pub enabled: bool,
    /// The file to log to
    pub file: PathBuf,
    /// One of `off`, `error`, `warn`, `info`, `debug` or `trace`
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            enabled: false,
            file: PathBuf::from("bitmove.log"),
            level: "info".to_owned(),
        }
    }
}

impl LogConfig {
    /// Returns the configured level, or `Off` if logging is turned off
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        if self.enabled {
            parse_log_level(&self.level)
        } else {
            Ok(LevelFilter::Off)
        }
    }
}

/// Settings for the magic number search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicConfig {
    /// Seed for the random number generator; drawn from the OS when absent
    pub seed: Option<u64>,
    /// Candidates to try per square before giving up
    pub max_tries: Option<u64>,
}

impl MagicConfig {
    /// Returns a builder seeded and limited as configured
    pub fn builder(&self) -> MagicBuilder {
        let builder = match self.seed {
            Some(seed) => MagicBuilder::seeded(seed),
            None => MagicBuilder::from_entropy(),
        };
        match self.max_tries {
            Some(max_tries) => builder.max_tries(max_tries),
            None => builder,
        }
    }
}

/// Settings for the game-tree search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search depth in plies
    pub depth: Option<usize>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// All settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Attack-table file to load instead of building the tables
    pub tables: Option<PathBuf>,
    /// Logging
    pub log: LogConfig,
    /// Magic number search
    pub magic: MagicConfig,
    /// Game-tree search
    pub search: SearchConfig,
}

impl Config {
    /// The default configuration file, `~/.bitmove/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Parses a configuration from YAML text
    pub fn from_yaml(text: &str) -> Result<Config, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads the configuration file at `path`
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(format!("{}: {}", path.display(), err)))?;
        Config::from_yaml(&text)
    }

    /// Reads the configuration from `path` if one is given, otherwise from the default file if
    /// it exists
    ///
    /// A missing default file gives the default configuration; a missing explicit file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Config::read_from(path),
            None => match Config::default_path() {
                Some(path) if path.is_file() => Config::read_from(path),
                _ => Ok(Config::default()),
            },
        }
    }
}

/// Parses a log level name
pub fn parse_log_level(level: &str) -> Result<LevelFilter, ConfigError> {
    match level {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        _ => Err(ConfigError::InvalidLogLevel(level.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
        assert_eq!(Config::default().log.level_filter().unwrap(), LevelFilter::Off);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_yaml("magic:\n  seed: 7\n").unwrap();
        assert_eq!(config.magic.seed, Some(7));
        assert_eq!(config.magic.max_tries, None);
        assert_eq!(config.log, LogConfig::default());
        assert_eq!(config.tables, None);
    }

    #[test]
    fn full_file() {
        let text = "
tables: tables.bin
log:
  enabled: true
  file: out.log
  level: debug
magic:
  seed: 1
  max_tries: 1000
search:
  depth: 3
";
        let config = Config::from_yaml(text).unwrap();
        assert_eq!(config.tables, Some(PathBuf::from("tables.bin")));
        assert_eq!(config.log.file, PathBuf::from("out.log"));
        assert_eq!(config.log.level_filter().unwrap(), LevelFilter::Debug);
        assert_eq!(config.magic.max_tries, Some(1000));
        assert_eq!(config.search.depth, Some(3));

        let again = Config::from_yaml(&serde_yaml::to_string(&config).unwrap()).unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn bad_input_is_an_error() {
        match Config::from_yaml("search: [1, 2") {
            Err(ConfigError::Yaml(_)) => {},
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            parse_log_level("loud"),
            Err(ConfigError::InvalidLogLevel("loud".to_owned()))
        );
        match Config::read_from("/nonexistent/bitmove/config.yaml") {
            Err(ConfigError::Io(_)) => {},
            other => panic!("unexpected {:?}", other),
        }
    }
}
