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

//! # `INFO` queries

use crate::corestore::object::Object;
use crate::ev;
use crate::protocol::builder::Builder;
use crate::protocol::responses;
use crate::queryengine::{ClientState, ExecCtx};
use bytes::BytesMut;
use std::fmt::Write;
use std::process;

/// Run an `INFO` query: server stats as one bulk string
pub fn run(ctx: &mut ExecCtx<'_>, _client: &mut ClientState, out: &mut BytesMut, args: Vec<Object>) {
    if !args.is_empty() {
        out.extend_from_slice(responses::E_INVCMD);
        return;
    }
    let mut info = String::new();
    let _ = writeln!(info, "# server");
    let _ = writeln!(info, "version:{}", liblexi::VERSION);
    let _ = writeln!(info, "pid:{}", process::id());
    let _ = writeln!(info, "poller:{}", ev::backend_name());
    let _ = writeln!(
        info,
        "protected_mode:{}",
        if ctx.auth.is_protected() { "yes" } else { "no" }
    );
    let _ = writeln!(info, "databases:{}", ctx.store.db_count());
    let _ = writeln!(info, "keys:{}", ctx.store.total_keys());
    let _ = writeln!(info, "clients:{}", ctx.clients);
    let _ = writeln!(info, "# keyspace");
    for db in ctx.store.databases() {
        if db.len() != 0 {
            let _ = writeln!(
                info,
                "db{}:keys={},tombstones={}",
                db.id(),
                db.len(),
                db.tombstones()
            );
        }
    }
    let mut response = Builder::with_capacity(info.len() + 16);
    response.bulk_string(info.as_bytes());
    out.extend_from_slice(response.as_bytes());
}
