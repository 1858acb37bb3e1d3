/*
 * Created on Mon Mar 24 2025
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

use crate::queryengine::ClientState;
use bytes::BytesMut;
use std::os::unix::io::RawFd;

/// The loop's view of where a client is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// accepted, nothing read yet
    Accepting,
    Reading,
    Writing,
    /// drain the write buffer, then drop the connection
    Closing,
}

/// One connected client: its descriptor, both buffers and its
/// protocol-visible state. Owned by the server for exactly as long as the
/// descriptor is registered with the loop
pub struct Connection {
    fd: RawFd,
    /// append-only until a whole frame is consumed off the front
    pub read_buf: BytesMut,
    pub write_buf: BytesMut,
    /// bytes of `write_buf` already handed to the kernel
    pub write_cursor: usize,
    pub state: ConnState,
    pub client: ClientState,
}

impl Connection {
    pub fn new(fd: RawFd) -> Self {
        Self {
            fd,
            read_buf: BytesMut::with_capacity(liblexi::BUF_CAP),
            write_buf: BytesMut::new(),
            write_cursor: 0,
            state: ConnState::Accepting,
            client: ClientState::new(),
        }
    }

    pub fn fd(&self) -> RawFd {
        self.fd
    }
}
