/*
 * Created on Mon Mar 03 2025
 *
 * This file is a part of LexiDB
 * LexiDB is a free and open-source in-memory key/value database that
 * aims to deliver predictable performance through a compact typed object
 * model and a vectorized keyspace engine
 *
 * Copyright (c) 2025, the LexiDB authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! Server configuration: the evaluated settings struct, the config-file
//! loader and the line-oriented parser in [`cfgfile`]

pub mod cfgfile;

use crate::auth::User;
use std::fmt;
use std::fs;
use std::io::Error as IoError;
use std::io::ErrorKind;
use std::net::Ipv4Addr;

/// The config file consulted when none is named on the command line
pub const DEFAULT_CONFIG_PATH: &str = "../lexi.conf";
/// How many descriptors the event loop is sized for
pub const DEFAULT_MAX_CLIENTS: usize = 1024;

#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the file at all
    Io(IoError),
    /// A line that would not parse
    OnLine { line: usize, msg: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(ioe) => write!(f, "failed to read config file: {}", ioe),
            Self::OnLine { line, msg } => write!(f, "config file, line {}: {}", line, msg),
        }
    }
}

impl From<IoError> for ConfigError {
    fn from(ioe: IoError) -> Self {
        Self::Io(ioe)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Nothing,
    Info,
    Warning,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn parse(input: &str) -> Option<LogLevel> {
        match input {
            "nothing" => Some(LogLevel::Nothing),
            "info" => Some(LogLevel::Info),
            "warning" => Some(LogLevel::Warning),
            "verbose" => Some(LogLevel::Verbose),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// The filter string handed to the logger backend
    pub const fn filter_str(&self) -> &'static str {
        match self {
            LogLevel::Nothing => "off",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Verbose => "trace",
            LogLevel::Debug => "debug",
        }
    }
}

/// Every evaluated setting the server runs with
#[derive(Debug, PartialEq)]
pub struct ConfigurationSet {
    pub bind: Ipv4Addr,
    pub port: u16,
    pub protected_mode: bool,
    pub tcp_backlog: i32,
    pub loglevel: LogLevel,
    /// `None` means stdout
    pub logfile: Option<String>,
    pub databases: usize,
    pub users: Vec<User>,
}

impl Default for ConfigurationSet {
    fn default() -> Self {
        Self {
            bind: Ipv4Addr::new(127, 0, 0, 1),
            port: 6969,
            protected_mode: false,
            tcp_backlog: 511,
            loglevel: LogLevel::Info,
            logfile: None,
            databases: 16,
            users: Vec::new(),
        }
    }
}

/// Where the settings came from, so startup can log accordingly
pub enum ConfigType {
    /// Parsed from a config file
    Custom(ConfigurationSet),
    /// Built-in defaults (no config file found)
    Def(ConfigurationSet),
}

/// Resolve the configuration. An explicitly named file must exist; the
/// default path is allowed to be absent, in which case the built-in
/// defaults are used
pub fn get_config_or_defaults(explicit: Option<&str>) -> Result<ConfigType, ConfigError> {
    match explicit {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            Ok(ConfigType::Custom(cfgfile::parse(&contents)?))
        }
        None => match fs::read_to_string(DEFAULT_CONFIG_PATH) {
            Ok(contents) => Ok(ConfigType::Custom(cfgfile::parse(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Ok(ConfigType::Def(ConfigurationSet::default()))
            }
            Err(e) => Err(ConfigError::Io(e)),
        },
    }
}
