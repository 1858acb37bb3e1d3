/*
 * Created on Tue Jan 14 2025
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

//! # LexiDB
//!
//! The `lexid` crate is LexiDB's database server. The interesting parts
//! live in `vmap` (the keyspace engine), `protocol` (the wire codec),
//! `queryengine`/`actions` (dispatch) and `ev`/`dbnet` (the event loop and
//! connection plumbing); see the module docs for the details

use crate::config::{ConfigType, ConfigurationSet};
use liblexi::util::terminal;
use liblexi::{URL, VERSION};
use std::env;
use std::fs;
use std::process;

mod actions;
mod auth;
mod config;
mod corestore;
mod dbnet;
mod ev;
mod protocol;
mod queryengine;
#[cfg(test)]
mod tests;
mod util;
mod vmap;

#[cfg(all(not(target_env = "msvc"), not(miri)))]
use jemallocator::Jemalloc;

#[cfg(all(not(target_env = "msvc"), not(miri)))]
#[global_allocator]
/// Jemallocator - this is the default memory allocator for platforms other than msvc
static GLOBAL: Jemalloc = Jemalloc;

/// The terminal art printed on startup
static TEXT: &str = "\n██      ███████ ██   ██ ██ ██████  ██████  \n██      ██       ██ ██  ██ ██   ██ ██   ██ \n██      █████     ███   ██ ██   ██ ██████  \n██      ██       ██ ██  ██ ██   ██ ██   ██ \n███████ ███████ ██   ██ ██ ██████  ██████  \n";

const USAGE: &str = "\
usage: lexid [path-to-config]

With no argument, ../lexi.conf is read if it exists; otherwise the
built-in defaults apply.

Options
    --help (-h)     = Print this information
    --version (-v)  = Print the current version
";

fn main() {
    let (cfg, using_defaults) = check_args_and_get_cfg();
    init_logger(&cfg);
    println!("LexiDB v{} | {}\n{}", VERSION, URL, TEXT);
    if using_defaults {
        log::warn!("No configuration file supplied. Using default settings");
    } else {
        log::info!("Using settings from the supplied configuration");
    }
    match dbnet::run(cfg) {
        Ok(()) => {
            let _ = terminal::write_info("Goodbye :)\n");
        }
        Err(e) => {
            log::error!("{}", e);
            util::exit_error();
        }
    }
}

/// Evaluate the command line and resolve the configuration, or print an
/// error to stderr and terminate with exit code 1
fn check_args_and_get_cfg() -> (ConfigurationSet, bool) {
    let mut args = env::args().skip(1);
    let path = match args.next() {
        Some(arg) if arg == "--help" || arg == "-h" => {
            println!("{}", USAGE);
            process::exit(0);
        }
        Some(arg) if arg == "--version" || arg == "-v" => {
            println!("lexid v{}", VERSION);
            process::exit(0);
        }
        Some(path) => Some(path),
        None => None,
    };
    if args.next().is_some() {
        eprintln!("lexid takes at most one argument\n{}", USAGE);
        util::exit_error();
    }
    match config::get_config_or_defaults(path.as_deref()) {
        Ok(ConfigType::Custom(cfg)) => (cfg, false),
        Ok(ConfigType::Def(cfg)) => (cfg, true),
        Err(e) => {
            let _ = terminal::write_error(format!("startup failure: {}\n", e));
            util::exit_error();
        }
    }
}

/// Stand the logger up from the evaluated settings. `LEXI_LOG` overrides
/// the configured level; failure to open the logfile is fatal
fn init_logger(cfg: &ConfigurationSet) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(
        &env::var("LEXI_LOG").unwrap_or_else(|_| cfg.loglevel.filter_str().to_owned()),
    );
    if let Some(path) = &cfg.logfile {
        match fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                let _ = terminal::write_error(format!(
                    "startup failure: failed to open logfile {}: {}\n",
                    path, e
                ));
                util::exit_error();
            }
        }
    }
    builder.init();
}
