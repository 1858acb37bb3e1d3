/*
 * Created on Mon Feb 03 2025
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

use crate::config::ConfigError;
use std::fmt;
use std::io::Error as IoError;

pub type LexiResult<T> = Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// An error that occurred while evaluating the configuration
    Config(ConfigError),
    /// An I/O error
    IoError(IoError),
    /// An I/O error with an additional description of the operation that
    /// was being attempted
    IoErrorExtra(IoError, String),
    /// Some other kind of error described by the message
    OtherError(String),
}

impl Error {
    pub fn ioerror_extra(ioe: IoError, extra: impl ToString) -> Self {
        Self::IoErrorExtra(ioe, extra.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(cerr) => write!(f, "Configuration error: {}", cerr),
            Self::IoError(ioe) => write!(f, "I/O error: {}", ioe),
            Self::IoErrorExtra(ioe, extra) => write!(f, "I/O error while {extra}: {ioe}"),
            Self::OtherError(oerr) => write!(f, "Error: {}", oerr),
        }
    }
}

impl From<IoError> for Error {
    fn from(ioe: IoError) -> Self {
        Self::IoError(ioe)
    }
}

impl From<ConfigError> for Error {
    fn from(cerr: ConfigError) -> Self {
        Self::Config(cerr)
    }
}

impl From<String> for Error {
    fn from(estr: String) -> Self {
        Self::OtherError(estr)
    }
}
