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

//! Raw interactions with the operating system: sockets, descriptor flags
//! and signal handling. Everything in here talks to libc directly, so read
//! the man pages before touching anything

use std::io::{Error as IoError, Result as IoResult};
use std::mem;
use std::net::Ipv4Addr;
use std::os::unix::io::RawFd;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the SIGINT handler; polled by the event loop between batches
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Has an orderly shutdown been requested?
pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

extern "C" fn sigint_handler(_sig: libc::c_int) {
    // async-signal-safe: a single atomic store and nothing else
    SHUTDOWN.store(true, Ordering::Relaxed);
}

/// Install the SIGINT handler that flags an orderly shutdown
pub fn install_sigint_handler() -> IoResult<()> {
    unsafe {
        let mut action: libc::sigaction = mem::zeroed();
        action.sa_sigaction = sigint_handler as libc::sighandler_t;
        libc::sigemptyset(&mut action.sa_mask);
        // no SA_RESTART: a pending shutdown must interrupt the poller
        action.sa_flags = 0;
        if libc::sigaction(libc::SIGINT, &action, ptr::null_mut()) == -1 {
            return Err(IoError::last_os_error());
        }
    }
    Ok(())
}

/// Flip a descriptor to non-blocking mode
pub fn set_nonblocking(fd: RawFd) -> IoResult<()> {
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL, 0);
        if flags == -1 {
            return Err(IoError::last_os_error());
        }
        if libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) == -1 {
            return Err(IoError::last_os_error());
        }
    }
    Ok(())
}

/// Create a non-blocking IPv4 listener with `SO_REUSEADDR`, bound to
/// `addr:port` and listening with the provided backlog
pub fn tcp_server(addr: Ipv4Addr, port: u16, backlog: i32) -> IoResult<RawFd> {
    unsafe {
        let fd = libc::socket(libc::AF_INET, libc::SOCK_STREAM, 0);
        if fd == -1 {
            return Err(IoError::last_os_error());
        }
        let fail = |fd: RawFd| -> IoError {
            let e = IoError::last_os_error();
            libc::close(fd);
            e
        };
        let yes: libc::c_int = 1;
        if libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_REUSEADDR,
            &yes as *const libc::c_int as *const libc::c_void,
            mem::size_of::<libc::c_int>() as libc::socklen_t,
        ) == -1
        {
            return Err(fail(fd));
        }
        let mut sa: libc::sockaddr_in = mem::zeroed();
        sa.sin_family = libc::AF_INET as libc::sa_family_t;
        sa.sin_port = port.to_be();
        sa.sin_addr = libc::in_addr {
            s_addr: u32::from(addr).to_be(),
        };
        if libc::bind(
            fd,
            &sa as *const libc::sockaddr_in as *const libc::sockaddr,
            mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
        ) == -1
        {
            return Err(fail(fd));
        }
        if libc::listen(fd, backlog) == -1 {
            return Err(fail(fd));
        }
        if let Err(e) = set_nonblocking(fd) {
            libc::close(fd);
            return Err(e);
        }
        Ok(fd)
    }
}

/// Close a raw descriptor, ignoring any error (the kernel releases the
/// descriptor either way)
pub fn close_fd(fd: RawFd) {
    unsafe {
        libc::close(fd);
    }
}
