/*
 * Created on Mon Feb 24 2025
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

use super::{keys, AuthError};

/// Result of an auth operation
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Read,
    Write,
    Admin,
    Connection,
}

impl Category {
    pub fn parse(input: &str) -> Option<Category> {
        match input {
            "read" => Some(Category::Read),
            "write" => Some(Category::Write),
            "admin" => Some(Category::Admin),
            "connection" => Some(Category::Connection),
            _ => None,
        }
    }
}

/// One ACL record from the configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub enabled: bool,
    pub nopass: bool,
    /// `+CMD` grants, stored uppercased
    pub commands: Vec<String>,
    /// `+$category` grants
    pub categories: Vec<Category>,
    /// `>password` entries; a user may rotate through several
    pub passwords: Vec<Vec<u8>>,
}

impl User {
    pub fn new(username: impl ToString) -> Self {
        Self {
            username: username.to_string(),
            // a user someone bothered to write down is on unless said
            // otherwise
            enabled: true,
            nopass: false,
            commands: Vec::new(),
            categories: Vec::new(),
            passwords: Vec::new(),
        }
    }

    /// A record with no `+` grants at all may run everything
    fn is_unrestricted(&self) -> bool {
        self.commands.is_empty() && self.categories.is_empty()
    }

    pub fn may_run(&self, command: &str, category: Category) -> bool {
        self.is_unrestricted()
            || self.categories.contains(&category)
            || self
                .commands
                .iter()
                .any(|granted| granted.eq_ignore_ascii_case(command))
    }
}

/// The authn/authz provider: the protected-mode flag plus the user list
pub struct AuthProvider {
    protected: bool,
    users: Vec<User>,
}

impl AuthProvider {
    pub fn new(protected: bool, users: Vec<User>) -> Self {
        Self { protected, users }
    }

    /// Is AUTH required before data commands?
    pub const fn is_protected(&self) -> bool {
        self.protected
    }

    pub fn user(&self, index: usize) -> Option<&User> {
        self.users.get(index)
    }

    /// Verify credentials and return the matching user's index. Every
    /// candidate password is compared in constant time and all of them are
    /// walked even after a match
    pub fn login(&self, username: &[u8], password: &[u8]) -> AuthResult<usize> {
        for (index, user) in self.users.iter().enumerate() {
            if user.username.as_bytes() != username {
                continue;
            }
            if !user.enabled {
                return Err(AuthError::BadCredentials);
            }
            if user.nopass {
                return Ok(index);
            }
            let mut matched = false;
            for candidate in &user.passwords {
                matched |= keys::time_safe_eq(candidate, password);
            }
            return if matched {
                Ok(index)
            } else {
                Err(AuthError::BadCredentials)
            };
        }
        Err(AuthError::BadCredentials)
    }

    /// Check an authenticated user's grants against a command
    pub fn check(&self, user_index: usize, command: &str, category: Category) -> AuthResult<()> {
        match self.users.get(user_index) {
            Some(user) if user.may_run(command, category) => Ok(()),
            _ => Err(AuthError::PermissionDenied),
        }
    }
}
