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

//! # The event loop
//!
//! A single-threaded readiness loop over non-blocking descriptors. Fd
//! interest is registered per direction with plain function pointers; the
//! context value (the server) is threaded through every dispatch so
//! handlers borrow it instead of reaching for globals.
//!
//! The polling backend is chosen at compile time: `epoll` on Linux, a
//! `select` fallback elsewhere (capped at `FD_SETSIZE` descriptors). Both
//! expose the same four operations -- create, modify, poll, name -- and
//! nothing outside this module knows which one is underneath.
//!
//! Ordering: each poll returns a batch which is fully processed before the
//! next poll. A descriptor ready in both directions runs its read handler
//! first unless its registration carries [`EV_INVERT`], which flips the
//! order so a connection can flush pending responses before reading more


cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod epoll;
        use self::epoll as imp;
    } else {
        mod select;
        use self::select as imp;
    }
}

use std::io::{Error as IoError, ErrorKind, Result as IoResult};
use std::os::unix::io::RawFd;

pub const EV_NONE: u8 = 0;
pub const EV_READ: u8 = 1;
pub const EV_WRITE: u8 = 2;
/// Run the write handler before the read handler when both are ready
pub const EV_INVERT: u8 = 4;

const IO_MASK: u8 = EV_READ | EV_WRITE;

/// A readiness handler. Handlers receive the loop itself (to re-arm or
/// drop interest), the shared context, the ready descriptor and the mask
/// it fired with
pub type EvHandler<C> = fn(&mut EventLoop<C>, &mut C, RawFd, u8);

/// Implemented by the loop's context so `run` knows when to stop polling
pub trait LoopContext {
    fn shutdown_requested(&self) -> bool;
}

struct FileEvent<C> {
    mask: u8,
    read_fn: Option<EvHandler<C>>,
    write_fn: Option<EvHandler<C>>,
}

// fn pointers are Copy no matter what C is, so these cannot be derived
impl<C> Clone for FileEvent<C> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<C> Copy for FileEvent<C> {}

impl<C> Default for FileEvent<C> {
    fn default() -> Self {
        Self {
            mask: EV_NONE,
            read_fn: None,
            write_fn: None,
        }
    }
}

#[derive(Clone, Copy)]
pub struct FiredEvent {
    pub fd: RawFd,
    pub mask: u8,
}

pub struct EventLoop<C> {
    /// registrations, indexed by fd
    events: Vec<FileEvent<C>>,
    /// scratch space the backend reports each batch into
    fired: Vec<FiredEvent>,
    max_fd: RawFd,
    poller: imp::Poller,
}

/// The compile-time selected backend's name (INFO)
pub fn backend_name() -> &'static str {
    imp::Poller::name()
}

impl<C> EventLoop<C> {
    /// A loop sized for at most `num_fds` descriptors
    pub fn new(num_fds: usize) -> IoResult<Self> {
        let poller = imp::Poller::new(num_fds)?;
        Ok(Self {
            events: (0..num_fds).map(|_| FileEvent::default()).collect(),
            fired: vec![FiredEvent { fd: -1, mask: 0 }; num_fds],
            max_fd: -1,
            poller,
        })
    }

    /// Register `handler` for the directions in `mask` on `fd`. Adding on
    /// top of an existing registration merges the masks
    pub fn add_event(&mut self, fd: RawFd, mask: u8, handler: EvHandler<C>) -> IoResult<()> {
        let index = fd as usize;
        if fd < 0 || index >= self.events.len() {
            return Err(IoError::new(
                ErrorKind::InvalidInput,
                "descriptor outside the loop's range",
            ));
        }
        let old = self.events[index].mask;
        let new = old | mask;
        self.poller.modify(fd, old & IO_MASK, new & IO_MASK)?;
        let event = &mut self.events[index];
        event.mask = new;
        if mask & EV_READ != 0 {
            event.read_fn = Some(handler);
        }
        if mask & EV_WRITE != 0 {
            event.write_fn = Some(handler);
        }
        if fd > self.max_fd {
            self.max_fd = fd;
        }
        Ok(())
    }

    /// Drop the directions in `mask` from `fd`'s registration. Dropping
    /// write interest also clears the invert flag
    pub fn delete_event(&mut self, fd: RawFd, mask: u8) {
        let index = fd as usize;
        if fd < 0 || index >= self.events.len() {
            return;
        }
        let old = self.events[index].mask;
        if old == EV_NONE {
            return;
        }
        let mut mask = mask;
        if mask & EV_WRITE != 0 {
            mask |= EV_INVERT;
        }
        let new = old & !mask;
        // best effort: the descriptor may already be gone from the kernel's
        // point of view
        let _ = self.poller.modify(fd, old & IO_MASK, new & IO_MASK);
        self.events[index].mask = new;
        if new == EV_NONE && fd == self.max_fd {
            let mut fd = self.max_fd - 1;
            while fd >= 0 && self.events[fd as usize].mask == EV_NONE {
                fd -= 1;
            }
            self.max_fd = fd;
        }
    }

    /// One poll + dispatch pass. Handlers may re-register or drop
    /// descriptors mid-batch; the registration is re-read around every
    /// call so a closed connection is not dispatched into
    pub fn poll_once(&mut self, ctx: &mut C) -> IoResult<usize> {
        let count = self.poller.poll(self.max_fd, &mut self.fired)?;
        for i in 0..count {
            let fired = self.fired[i];
            let index = fired.fd as usize;
            if index >= self.events.len() {
                continue;
            }
            let event = self.events[index];
            let invert = event.mask & EV_INVERT != 0;
            let mut called = false;
            if !invert && event.mask & fired.mask & EV_READ != 0 {
                if let Some(read_fn) = event.read_fn {
                    read_fn(self, ctx, fired.fd, fired.mask);
                    called = true;
                }
            }
            let event = self.events[index];
            if event.mask & fired.mask & EV_WRITE != 0 {
                if let Some(write_fn) = event.write_fn {
                    if !called || event.write_fn != event.read_fn {
                        write_fn(self, ctx, fired.fd, fired.mask);
                        called = true;
                    }
                }
            }
            if invert {
                let event = self.events[index];
                if event.mask & fired.mask & EV_READ != 0 {
                    if let Some(read_fn) = event.read_fn {
                        if !called || event.write_fn != event.read_fn {
                            read_fn(self, ctx, fired.fd, fired.mask);
                        }
                    }
                }
            }
        }
        Ok(count)
    }

    /// Poll and dispatch until the context requests shutdown. A poller
    /// failure (other than an interrupting signal, which the backends
    /// swallow) ends the loop
    pub fn run(&mut self, ctx: &mut C)
    where
        C: LoopContext,
    {
        while !ctx.shutdown_requested() {
            if let Err(e) = self.poll_once(ctx) {
                log::error!("event loop poller failure: {}", e);
                break;
            }
        }
    }
}
