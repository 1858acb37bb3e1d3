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

//! The `epoll(7)` backend (level-triggered)

use super::{FiredEvent, EV_NONE, EV_READ, EV_WRITE};
use std::io::{Error as IoError, ErrorKind, Result as IoResult};
use std::os::unix::io::RawFd;

pub struct Poller {
    epfd: RawFd,
    events: Vec<libc::epoll_event>,
}

impl Poller {
    pub fn new(num_fds: usize) -> IoResult<Self> {
        let epfd = unsafe { libc::epoll_create1(0) };
        if epfd == -1 {
            return Err(IoError::last_os_error());
        }
        Ok(Self {
            epfd,
            events: (0..num_fds)
                .map(|_| libc::epoll_event { events: 0, u64: 0 })
                .collect(),
        })
    }

    pub const fn name() -> &'static str {
        "epoll"
    }

    /// Move `fd`'s kernel registration from the `old` to the `new` I/O
    /// mask. Which ctl op applies falls out of the two masks
    pub fn modify(&mut self, fd: RawFd, old: u8, new: u8) -> IoResult<()> {
        if old == new {
            return Ok(());
        }
        let op = if new == EV_NONE {
            libc::EPOLL_CTL_DEL
        } else if old == EV_NONE {
            libc::EPOLL_CTL_ADD
        } else {
            libc::EPOLL_CTL_MOD
        };
        let mut flags: u32 = 0;
        if new & EV_READ != 0 {
            flags |= libc::EPOLLIN as u32;
        }
        if new & EV_WRITE != 0 {
            flags |= libc::EPOLLOUT as u32;
        }
        let mut event = libc::epoll_event {
            events: flags,
            u64: fd as u64,
        };
        if unsafe { libc::epoll_ctl(self.epfd, op, fd, &mut event) } == -1 {
            return Err(IoError::last_os_error());
        }
        Ok(())
    }

    /// Block until readiness, then translate the kernel's report into
    /// loop-level fired events. Error/hangup conditions fire as both
    /// directions so the handlers observe the failure on their next I/O
    pub fn poll(&mut self, _max_fd: RawFd, fired: &mut [FiredEvent]) -> IoResult<usize> {
        let count = unsafe {
            libc::epoll_wait(
                self.epfd,
                self.events.as_mut_ptr(),
                self.events.len() as libc::c_int,
                -1,
            )
        };
        if count == -1 {
            let err = IoError::last_os_error();
            // a signal (SIGINT) unblocks the wait; the caller re-checks
            // the shutdown flag
            return if err.kind() == ErrorKind::Interrupted {
                Ok(0)
            } else {
                Err(err)
            };
        }
        let count = count as usize;
        for i in 0..count {
            let flags = self.events[i].events;
            let data = self.events[i].u64;
            let mut mask = 0u8;
            if flags & libc::EPOLLIN as u32 != 0 {
                mask |= EV_READ;
            }
            if flags & libc::EPOLLOUT as u32 != 0 {
                mask |= EV_WRITE;
            }
            if flags & libc::EPOLLERR as u32 != 0 {
                mask |= EV_READ | EV_WRITE;
            }
            if flags & libc::EPOLLHUP as u32 != 0 {
                mask |= EV_READ | EV_WRITE;
            }
            fired[i] = FiredEvent {
                fd: data as RawFd,
                mask,
            };
        }
        Ok(count)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.epfd);
        }
    }
}
