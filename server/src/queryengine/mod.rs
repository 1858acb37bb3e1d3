/*
 * Created on Mon Mar 10 2025
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

//! # The query engine
//!
//! Sits between the decoder and the actions: a decoded frame comes in, the
//! arity/shape/permission gates run, and exactly one framed response is
//! appended to the connection's write buffer. Commands never suspend;
//! everything below this point is synchronous

use crate::actions;
use crate::auth::{AuthProvider, Category};
use crate::corestore::object::Object;
use crate::corestore::Corestore;
use crate::protocol::responses;
use bytes::BytesMut;

/// The protocol-visible state of one client: its selected database and
/// login
#[derive(Debug, Default)]
pub struct ClientState {
    pub db_index: usize,
    /// Index of the logged-in user in the auth provider, if any
    pub user: Option<usize>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Everything a command may touch besides the client itself
pub struct ExecCtx<'a> {
    pub store: &'a mut Corestore,
    pub auth: &'a AuthProvider,
    /// Currently connected client count (INFO)
    pub clients: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Ping,
    Select,
    Set,
    Get,
    Del,
    Exists,
    Keys,
    Auth,
    Info,
}

impl Action {
    /// Command names match case-insensitively
    fn parse(name: &[u8]) -> Option<Action> {
        if name.eq_ignore_ascii_case(b"PING") {
            Some(Action::Ping)
        } else if name.eq_ignore_ascii_case(b"SELECT") {
            Some(Action::Select)
        } else if name.eq_ignore_ascii_case(b"SET") {
            Some(Action::Set)
        } else if name.eq_ignore_ascii_case(b"GET") {
            Some(Action::Get)
        } else if name.eq_ignore_ascii_case(b"DEL") {
            Some(Action::Del)
        } else if name.eq_ignore_ascii_case(b"EXISTS") {
            Some(Action::Exists)
        } else if name.eq_ignore_ascii_case(b"KEYS") {
            Some(Action::Keys)
        } else if name.eq_ignore_ascii_case(b"AUTH") {
            Some(Action::Auth)
        } else if name.eq_ignore_ascii_case(b"INFO") {
            Some(Action::Info)
        } else {
            None
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Action::Ping => "PING",
            Action::Select => "SELECT",
            Action::Set => "SET",
            Action::Get => "GET",
            Action::Del => "DEL",
            Action::Exists => "EXISTS",
            Action::Keys => "KEYS",
            Action::Auth => "AUTH",
            Action::Info => "INFO",
        }
    }

    pub const fn category(&self) -> Category {
        match self {
            Action::Ping | Action::Select | Action::Auth => Category::Connection,
            Action::Get | Action::Exists | Action::Keys => Category::Read,
            Action::Set | Action::Del => Category::Write,
            Action::Info => Category::Admin,
        }
    }
}

/// Run one decoded frame to completion, appending the framed response to
/// `out`
pub fn execute(ctx: &mut ExecCtx<'_>, client: &mut ClientState, out: &mut BytesMut, query: Object) {
    // a command is an array whose head names the action
    let mut elements = match query {
        Object::Array(elements) => elements,
        _ => {
            out.extend_from_slice(responses::E_INVCMD);
            return;
        }
    };
    if elements.is_empty() {
        out.extend_from_slice(responses::E_INVCMD);
        return;
    }
    let action = match elements[0].as_str_bytes().and_then(Action::parse) {
        Some(action) => action,
        None => {
            out.extend_from_slice(responses::E_INVCMD);
            return;
        }
    };
    elements.remove(0);
    let args = elements;

    if ctx.auth.is_protected() {
        match client.user {
            None => {
                // connection-category commands (PING/SELECT/AUTH) stay
                // reachable so a client can actually log in
                if !matches!(action.category(), Category::Connection) {
                    out.extend_from_slice(responses::E_UNAUTHED);
                    return;
                }
            }
            Some(index) => {
                if ctx
                    .auth
                    .check(index, action.name(), action.category())
                    .is_err()
                {
                    out.extend_from_slice(responses::E_UNAUTHED);
                    return;
                }
            }
        }
    }

    match action {
        Action::Ping => actions::ping::run(ctx, client, out, args),
        Action::Select => actions::select::run(ctx, client, out, args),
        Action::Set => actions::set::run(ctx, client, out, args),
        Action::Get => actions::get::run(ctx, client, out, args),
        Action::Del => actions::del::run(ctx, client, out, args),
        Action::Exists => actions::exists::run(ctx, client, out, args),
        Action::Keys => actions::keys::run(ctx, client, out, args),
        Action::Auth => actions::auth::run(ctx, client, out, args),
        Action::Info => actions::info::run(ctx, client, out, args),
    }
}
