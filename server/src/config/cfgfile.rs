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

//! The line-oriented config file parser. One directive per line, `#`
//! starts a comment, `user` lines accumulate, everything else may appear
//! at most once

use super::{ConfigError, ConfigurationSet, LogLevel};
use crate::auth::{Category, User};

fn err_on<T>(line: usize, msg: impl ToString) -> Result<T, ConfigError> {
    Err(ConfigError::OnLine {
        line,
        msg: msg.to_string(),
    })
}

pub fn parse(input: &str) -> Result<ConfigurationSet, ConfigError> {
    let mut cfg = ConfigurationSet::default();
    let mut seen: Vec<&str> = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let directive = match tokens.next() {
            Some(d) => d,
            None => continue,
        };
        // `user` may repeat; everything else is single-shot
        if directive != "user" {
            if seen.contains(&directive) {
                return err_on(line_no, format!("duplicate directive `{}`", directive));
            }
        }
        match directive {
            "bind" => {
                let value = expect_value(&mut tokens, line_no, "bind")?;
                cfg.bind = match value.parse() {
                    Ok(addr) => addr,
                    Err(_) => return err_on(line_no, format!("`{}` is not an IPv4 address", value)),
                };
            }
            "port" => {
                let value = expect_value(&mut tokens, line_no, "port")?;
                cfg.port = match value.parse() {
                    Ok(port) => port,
                    Err(_) => return err_on(line_no, format!("`{}` is not a valid port", value)),
                };
            }
            "protected-mode" => {
                let value = expect_value(&mut tokens, line_no, "protected-mode")?;
                cfg.protected_mode = match value {
                    "yes" => true,
                    "no" => false,
                    _ => return err_on(line_no, "protected-mode takes `yes` or `no`"),
                };
            }
            "tcp-backlog" => {
                let value = expect_value(&mut tokens, line_no, "tcp-backlog")?;
                cfg.tcp_backlog = match value.parse() {
                    Ok(backlog) => backlog,
                    Err(_) => return err_on(line_no, format!("`{}` is not a valid backlog", value)),
                };
            }
            "loglevel" => {
                let value = expect_value(&mut tokens, line_no, "loglevel")?;
                cfg.loglevel = match LogLevel::parse(value) {
                    Some(level) => level,
                    None => {
                        return err_on(
                            line_no,
                            "loglevel takes nothing|info|warning|verbose|debug",
                        )
                    }
                };
            }
            "logfile" => {
                // take the raw remainder so paths with spaces survive
                let rest = line["logfile".len()..].trim();
                if rest.is_empty() {
                    return err_on(line_no, "logfile needs a path or \"\" for stdout");
                }
                let unquoted = rest.trim_matches('"');
                cfg.logfile = if unquoted.is_empty() {
                    None
                } else {
                    Some(unquoted.to_owned())
                };
            }
            "databases" => {
                let value = expect_value(&mut tokens, line_no, "databases")?;
                cfg.databases = match value.parse::<u64>() {
                    Ok(count) if count >= 1 => count as usize,
                    _ => return err_on(line_no, "databases takes a positive count"),
                };
            }
            "user" => {
                let user = parse_user(&mut tokens, line_no)?;
                cfg.users.push(user);
            }
            unknown => {
                return err_on(line_no, format!("unknown directive `{}`", unknown));
            }
        }
        seen.push(directive);
    }
    Ok(cfg)
}

/// `user <name> [on|off] [nopass] [+<cmd> | +$<category>]* [><password>]*`
fn parse_user<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<User, ConfigError> {
    let name = match tokens.next() {
        Some(name) => name,
        None => return err_on(line_no, "user needs a name"),
    };
    let mut user = User::new(name);
    for token in tokens {
        if token == "on" {
            user.enabled = true;
        } else if token == "off" {
            user.enabled = false;
        } else if token == "nopass" {
            user.nopass = true;
        } else if let Some(password) = token.strip_prefix('>') {
            user.passwords.push(password.as_bytes().to_vec());
        } else if let Some(category) = token.strip_prefix("+$") {
            match Category::parse(category) {
                Some(cat) => user.categories.push(cat),
                None => {
                    return err_on(line_no, format!("unknown command category `{}`", category))
                }
            }
        } else if let Some(command) = token.strip_prefix('+') {
            user.commands.push(command.to_uppercase());
        } else {
            return err_on(line_no, format!("unexpected token `{}` in user rule", token));
        }
    }
    Ok(user)
}

fn expect_value<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    directive: &str,
) -> Result<&'a str, ConfigError> {
    match tokens.next() {
        Some(value) => Ok(value),
        None => err_on(line_no, format!("`{}` needs a value", directive)),
    }
}
