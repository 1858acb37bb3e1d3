/*
 * Created on Mon Mar 17 2025
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

//! The `select(2)` fallback backend for hosts without epoll. Interest sets
//! are kept as master copies and re-cloned before every wait, since the
//! kernel scribbles over them in place

use super::{FiredEvent, EV_READ, EV_WRITE};
use std::io::{Error as IoError, ErrorKind, Result as IoResult};
use std::mem;
use std::os::unix::io::RawFd;
use std::ptr;

pub struct Poller {
    rfds: libc::fd_set,
    wfds: libc::fd_set,
}

impl Poller {
    pub fn new(num_fds: usize) -> IoResult<Self> {
        // the fd_set type simply cannot index past FD_SETSIZE
        if num_fds > libc::FD_SETSIZE {
            return Err(IoError::new(
                ErrorKind::InvalidInput,
                "the select backend is capped at FD_SETSIZE descriptors",
            ));
        }
        unsafe {
            let mut rfds: libc::fd_set = mem::zeroed();
            let mut wfds: libc::fd_set = mem::zeroed();
            libc::FD_ZERO(&mut rfds);
            libc::FD_ZERO(&mut wfds);
            Ok(Self { rfds, wfds })
        }
    }

    pub const fn name() -> &'static str {
        "select"
    }

    pub fn modify(&mut self, fd: RawFd, _old: u8, new: u8) -> IoResult<()> {
        unsafe {
            if new & EV_READ != 0 {
                libc::FD_SET(fd, &mut self.rfds);
            } else {
                libc::FD_CLR(fd, &mut self.rfds);
            }
            if new & EV_WRITE != 0 {
                libc::FD_SET(fd, &mut self.wfds);
            } else {
                libc::FD_CLR(fd, &mut self.wfds);
            }
        }
        Ok(())
    }

    pub fn poll(&mut self, max_fd: RawFd, fired: &mut [FiredEvent]) -> IoResult<usize> {
        let mut read_ready = self.rfds;
        let mut write_ready = self.wfds;
        let count = unsafe {
            libc::select(
                max_fd + 1,
                &mut read_ready,
                &mut write_ready,
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        if count == -1 {
            let err = IoError::last_os_error();
            return if err.kind() == ErrorKind::Interrupted {
                Ok(0)
            } else {
                Err(err)
            };
        }
        let mut fired_count = 0;
        for fd in 0..=max_fd {
            let mut mask = 0u8;
            unsafe {
                if libc::FD_ISSET(fd, &read_ready) {
                    mask |= EV_READ;
                }
                if libc::FD_ISSET(fd, &write_ready) {
                    mask |= EV_WRITE;
                }
            }
            if mask != 0 {
                fired[fired_count] = FiredEvent { fd, mask };
                fired_count += 1;
            }
        }
        Ok(fired_count)
    }
}
