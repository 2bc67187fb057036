// jmap-lib, a Rust library for JMAP email management.
// Copyright (C) 2022  soywod <clement.douin@posteo.net>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Folder module.
//!
//! This module contains the flat representation of the folders of an
//! account, as listed by [`Backend::list_folders`](crate::Backend::list_folders).

use serde::Serialize;
use std::{fmt, iter::FromIterator, ops};

/// Represents a folder listed by its full mailbox path.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    /// Represents the delimiter joining the mailbox names of the path.
    pub delim: String,
    /// Represents the mailbox path.
    pub name: String,
    /// Represents the mailbox role, empty for user-defined mailboxes.
    pub desc: String,
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Represents the list of folders, parents listed before their
/// children.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Folders(pub Vec<Folder>);

impl ops::Deref for Folders {
    type Target = Vec<Folder>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Folder> for Folders {
    fn from_iter<T: IntoIterator<Item = Folder>>(iter: T) -> Self {
        Folders(iter.into_iter().collect())
    }
}
