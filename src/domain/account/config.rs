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

//! Account config module.
//!
//! This module contains the representation of the user account.

use std::{collections::HashMap, env, result};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot expand folder alias {1}")]
    ExpandFolderAliasError(#[source] shellexpand::LookupError<env::VarError>, String),
}

pub type Result<T> = result::Result<T, Error>;

/// Represents the configuration of the user account.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct AccountConfig {
    /// Represents the name of the user account.
    pub name: String,
    /// Represents the email address of the user.
    pub email: String,
    /// Represents the display name of the user.
    pub display_name: Option<String>,
    /// Represents the folder aliases map. Keys are lowercase aliases,
    /// values are either mailbox roles or mailbox paths.
    pub folder_aliases: HashMap<String, String>,
}

impl AccountConfig {
    /// Gets the alias of the given folder if exists, otherwise
    /// returns the folder itself. Also tries to expand shell
    /// variables.
    pub fn folder_alias(&self, folder: &str) -> Result<String> {
        let lowercase_folder = folder.trim().to_lowercase();
        let alias = self
            .folder_aliases
            .get(&lowercase_folder)
            .map(String::as_str)
            .unwrap_or(folder);
        let alias = shellexpand::full(alias)
            .map(String::from)
            .map_err(|err| Error::ExpandFolderAliasError(err, alias.to_owned()))?;
        Ok(alias)
    }

    /// Gets the display name of the user, falling back to the email
    /// address.
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use std::iter::FromIterator;

    use super::*;

    #[test]
    fn folder_alias() {
        let config = AccountConfig {
            folder_aliases: HashMap::from_iter([
                ("work".into(), "Inbox/Work".into()),
                ("archive".into(), "Archive/${JMAP_LIB_TEST_YEAR}".into()),
            ]),
            ..AccountConfig::default()
        };

        assert_eq!("Inbox/Work", config.folder_alias("Work").unwrap());
        assert_eq!("Projects", config.folder_alias("Projects").unwrap());

        env::set_var("JMAP_LIB_TEST_YEAR", "2025");
        assert_eq!("Archive/2025", config.folder_alias("archive").unwrap());
    }

    #[test]
    fn folder_alias_with_unknown_var() {
        let config = AccountConfig {
            folder_aliases: HashMap::from_iter([(
                "broken".into(),
                "${JMAP_LIB_UNDEFINED_VAR}".into(),
            )]),
            ..AccountConfig::default()
        };

        assert!(matches!(
            config.folder_alias("broken"),
            Err(Error::ExpandFolderAliasError(_, _))
        ));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut config = AccountConfig {
            email: "alice@localhost".into(),
            ..AccountConfig::default()
        };
        assert_eq!("alice@localhost", config.display_name());

        config.display_name = Some("Alice".into());
        assert_eq!("Alice", config.display_name());
    }
}
