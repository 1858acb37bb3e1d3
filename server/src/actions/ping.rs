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

//! # `PING` queries

use crate::corestore::object::Object;
use crate::protocol::builder::Builder;
use crate::protocol::responses;
use crate::queryengine::{ClientState, ExecCtx};
use bytes::BytesMut;

/// Run a `PING` query: `+PONG` bare, or the message echoed back as a bulk
/// string
pub fn run(_ctx: &mut ExecCtx<'_>, _client: &mut ClientState, out: &mut BytesMut, args: Vec<Object>) {
    match args.as_slice() {
        [] => out.extend_from_slice(responses::PONG),
        [Object::String(message)] => {
            let mut response = Builder::with_capacity(message.len() + 16);
            response.bulk_string(message);
            out.extend_from_slice(response.as_bytes());
        }
        _ => out.extend_from_slice(responses::E_INVCMD),
    }
}
