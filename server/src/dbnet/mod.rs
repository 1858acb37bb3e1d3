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

//! # Networking
//!
//! Ties the event loop to the query engine: the listener accepts until
//! EAGAIN, connection read handlers feed the streaming decoder and run
//! complete frames through dispatch, and write handlers drain buffered
//! responses. Within one connection, responses always leave in request
//! order -- dispatch appends to the write buffer synchronously, so
//! pipelined requests fall out naturally

pub mod connection;

use self::connection::{ConnState, Connection};
use crate::auth::AuthProvider;
use crate::config::{self, ConfigurationSet};
use crate::corestore::Corestore;
use crate::ev::{self, EventLoop, LoopContext, EV_INVERT, EV_READ, EV_WRITE};
use crate::protocol::builder::Builder;
use crate::protocol::{Decoder, ParseError};
use crate::queryengine::{self, ExecCtx};
use crate::util::error::{Error, LexiResult};
use crate::util::os;
use crate::vmap::Vmap;
use bytes::{Buf, BytesMut};
use std::io::{Error as IoError, ErrorKind};
use std::os::unix::io::RawFd;
use std::ptr;

/// Process-wide server state, owned by [`run`] and borrowed by every
/// handler through the loop's context parameter
pub struct Server {
    store: Corestore,
    auth: AuthProvider,
    connections: Vmap<RawFd, Connection>,
    listener: RawFd,
}

impl LoopContext for Server {
    fn shutdown_requested(&self) -> bool {
        os::shutdown_requested()
    }
}

/// Bring the server up, run it until SIGINT, tear it down
pub fn run(cfg: ConfigurationSet) -> LexiResult<()> {
    os::install_sigint_handler()
        .map_err(|e| Error::ioerror_extra(e, "installing the SIGINT handler"))?;
    let listener = os::tcp_server(cfg.bind, cfg.port, cfg.tcp_backlog)
        .map_err(|e| Error::ioerror_extra(e, format!("binding to {}:{}", cfg.bind, cfg.port)))?;
    let mut el = match EventLoop::<Server>::new(config::DEFAULT_MAX_CLIENTS) {
        Ok(el) => el,
        Err(e) => {
            os::close_fd(listener);
            return Err(Error::ioerror_extra(e, "creating the event loop"));
        }
    };
    if let Err(e) = el.add_event(listener, EV_READ, accept_handler) {
        os::close_fd(listener);
        return Err(Error::ioerror_extra(e, "registering the listener"));
    }
    let mut server = Server {
        store: Corestore::new(cfg.databases),
        auth: AuthProvider::new(cfg.protected_mode, cfg.users),
        connections: Vmap::new(),
        listener,
    };
    log::info!(
        "ready to accept connections on {}:{} ({} backend, {} databases)",
        cfg.bind,
        cfg.port,
        ev::backend_name(),
        cfg.databases
    );
    el.run(&mut server);
    log::info!("shutting down");
    let open: Vec<RawFd> = server.connections.iter().map(|(fd, _)| *fd).collect();
    for fd in open {
        close_connection(&mut el, &mut server, fd);
    }
    os::close_fd(server.listener);
    Ok(())
}

/// Listener readiness: accept until the backlog is dry
fn accept_handler(el: &mut EventLoop<Server>, srv: &mut Server, fd: RawFd, _mask: u8) {
    loop {
        let cfd = unsafe { libc::accept(fd, ptr::null_mut(), ptr::null_mut()) };
        if cfd == -1 {
            let err = IoError::last_os_error();
            match err.kind() {
                ErrorKind::WouldBlock => break,
                ErrorKind::Interrupted => continue,
                _ => {
                    log::error!("accept failed: {}", err);
                    break;
                }
            }
        }
        if let Err(e) = os::set_nonblocking(cfd) {
            log::error!("failed to set fd {} non-blocking: {}", cfd, e);
            os::close_fd(cfd);
            continue;
        }
        if let Err(e) = el.add_event(cfd, EV_READ, client_read_handler) {
            log::warn!("rejecting connection on fd {}: {}", cfd, e);
            os::close_fd(cfd);
            continue;
        }
        let conn = Connection::new(cfd);
        log::debug!("accepted a connection on fd {}", conn.fd());
        if srv.connections.insert(cfd, conn).is_err() {
            el.delete_event(cfd, EV_READ | EV_WRITE);
            os::close_fd(cfd);
        }
    }
}

enum ReadOutcome {
    Proceed,
    Close,
}

/// Pull everything the socket has for us right now
fn drain_socket(fd: RawFd, buf: &mut BytesMut) -> ReadOutcome {
    let mut chunk = [0u8; 4096];
    loop {
        let n = unsafe { libc::read(fd, chunk.as_mut_ptr() as *mut libc::c_void, chunk.len()) };
        if n > 0 {
            buf.extend_from_slice(&chunk[..n as usize]);
            continue;
        }
        if n == 0 {
            // orderly EOF from the peer
            return ReadOutcome::Close;
        }
        let err = IoError::last_os_error();
        return match err.kind() {
            ErrorKind::WouldBlock => ReadOutcome::Proceed,
            ErrorKind::Interrupted => continue,
            _ => {
                log::debug!("read error on fd {}: {}", fd, err);
                ReadOutcome::Close
            }
        };
    }
}

/// Connection readiness (read side): buffer, decode, dispatch. A protocol
/// violation answers with a bulk error and flags the connection Closing;
/// the write handler drops it once the error has flushed
fn client_read_handler(el: &mut EventLoop<Server>, srv: &mut Server, fd: RawFd, _mask: u8) {
    let mut close_now = false;
    let mut closing = false;
    let mut wants_write = false;
    {
        let clients = srv.connections.len();
        let Server {
            ref mut store,
            ref auth,
            ref mut connections,
            ..
        } = *srv;
        let conn = match connections.get_mut(&fd) {
            Some(conn) => conn,
            None => return,
        };
        conn.state = ConnState::Reading;
        match drain_socket(fd, &mut conn.read_buf) {
            ReadOutcome::Close => close_now = true,
            ReadOutcome::Proceed => {
                // run every complete frame in arrival order (pipelining)
                while !conn.read_buf.is_empty() {
                    match Decoder::parse(&conn.read_buf) {
                        Ok((query, consumed)) => {
                            conn.read_buf.advance(consumed);
                            let mut ctx = ExecCtx {
                                store: &mut *store,
                                auth,
                                clients,
                            };
                            queryengine::execute(
                                &mut ctx,
                                &mut conn.client,
                                &mut conn.write_buf,
                                query,
                            );
                        }
                        Err(ParseError::NotEnough) => break,
                        Err(ParseError::Protocol(perr)) => {
                            log::debug!("protocol error on fd {}: {}", fd, perr);
                            let mut response = Builder::new();
                            response.bulk_error(perr.to_string().as_bytes());
                            conn.write_buf.extend_from_slice(response.as_bytes());
                            conn.state = ConnState::Closing;
                            break;
                        }
                    }
                }
                wants_write = !conn.write_buf.is_empty();
                closing = conn.state == ConnState::Closing;
            }
        }
    }
    if close_now {
        close_connection(el, srv, fd);
        return;
    }
    if closing {
        el.delete_event(fd, EV_READ);
    }
    if wants_write {
        // EV_INVERT: flush what we owe the client before reading more
        if let Err(e) = el.add_event(fd, EV_WRITE | EV_INVERT, client_write_handler) {
            log::error!("failed to arm write interest on fd {}: {}", fd, e);
            close_connection(el, srv, fd);
        }
    }
}

/// Connection readiness (write side): drain from the cursor; on full
/// drain, drop write interest and release the connection if it was
/// Closing
fn client_write_handler(el: &mut EventLoop<Server>, srv: &mut Server, fd: RawFd, _mask: u8) {
    let mut dead = false;
    let mut stalled = false;
    let mut close_after = false;
    let mut drained = false;
    {
        let conn = match srv.connections.get_mut(&fd) {
            Some(conn) => conn,
            None => return,
        };
        if conn.state != ConnState::Closing {
            conn.state = ConnState::Writing;
        }
        loop {
            let pending = &conn.write_buf[conn.write_cursor..];
            if pending.is_empty() {
                drained = true;
                break;
            }
            let n = unsafe {
                libc::write(
                    fd,
                    pending.as_ptr() as *const libc::c_void,
                    pending.len(),
                )
            };
            if n > 0 {
                conn.write_cursor += n as usize;
                continue;
            }
            let err = IoError::last_os_error();
            match err.kind() {
                ErrorKind::WouldBlock => {
                    stalled = true;
                    break;
                }
                ErrorKind::Interrupted => continue,
                // EPIPE/ECONNRESET land here: pending bytes are discarded
                _ => {
                    log::debug!("write error on fd {}: {}", fd, err);
                    dead = true;
                    break;
                }
            }
        }
        if drained {
            conn.write_buf.clear();
            conn.write_cursor = 0;
            close_after = conn.state == ConnState::Closing;
            if !close_after {
                conn.state = ConnState::Reading;
            }
        }
    }
    if dead {
        close_connection(el, srv, fd);
        return;
    }
    if stalled {
        return;
    }
    if drained {
        el.delete_event(fd, EV_WRITE);
        if close_after {
            close_connection(el, srv, fd);
        }
    }
}

/// Unregister, forget and close a client in that order
fn close_connection(el: &mut EventLoop<Server>, srv: &mut Server, fd: RawFd) {
    el.delete_event(fd, EV_READ | EV_WRITE);
    if srv.connections.remove(&fd).is_some() {
        log::debug!("closed fd {}", fd);
    }
    os::close_fd(fd);
}
