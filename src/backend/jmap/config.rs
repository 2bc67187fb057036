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

//! JMAP backend config module.
//!
//! This module contains the representation of the JMAP backend
//! configuration of the user account.

use std::{result, time::Duration};
use thiserror::Error;

use crate::process;

/// Capability every JMAP request declares.
pub const CORE_CAPABILITY: &str = "urn:ietf:params:jmap:core";
/// Capability of the mail data model.
pub const MAIL_CAPABILITY: &str = "urn:ietf:params:jmap:mail";
/// Capability needed to send emails.
pub const SUBMISSION_CAPABILITY: &str = "urn:ietf:params:jmap:submission";

/// Prefix of the Fastmail API tokens, always sent as bearer tokens.
const BEARER_TOKEN_PREFIX: &str = "fmu";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot get jmap password")]
    GetPasswdError(#[source] process::Error),
    #[error("cannot get jmap password: password is empty")]
    GetPasswdEmptyError,
}

pub type Result<T> = result::Result<T, Error>;

/// Represents the JMAP backend configuration.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct JmapConfig {
    /// Represents the JMAP server base URL, for example
    /// `https://api.fastmail.com`.
    pub url: String,
    /// Represents the JMAP server login.
    pub login: String,
    /// Represents the command giving the password or API token.
    pub passwd_cmd: String,
    /// Forces the bearer authentication. When unset, API tokens are
    /// detected from their prefix.
    pub bearer: Option<bool>,
    /// Represents the HTTP timeout, in seconds.
    pub timeout: Option<u64>,
    /// Trusts any certificate.
    pub insecure: Option<bool>,
    /// Overrides the primary mail account given by the session.
    pub account_id: Option<String>,
    /// Overrides the capabilities declared by requests.
    pub capabilities: Option<Vec<String>>,
}

impl JmapConfig {
    /// Executes the JMAP password command in order to retrieve the
    /// JMAP server password or API token.
    pub fn passwd(&self) -> Result<String> {
        let passwd = process::run(&self.passwd_cmd).map_err(Error::GetPasswdError)?;
        let passwd = passwd
            .lines()
            .next()
            .map(str::trim)
            .filter(|passwd| !passwd.is_empty())
            .ok_or(Error::GetPasswdEmptyError)?;
        Ok(passwd.to_owned())
    }

    /// Tells if the given secret should be sent as a bearer token
    /// rather than as a basic auth password.
    pub fn bearer(&self, passwd: &str) -> bool {
        self.bearer
            .unwrap_or_else(|| passwd.starts_with(BEARER_TOKEN_PREFIX))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn insecure(&self) -> bool {
        self.insecure.unwrap_or_default()
    }

    /// Gets the URL of the session resource.
    pub fn session_url(&self) -> String {
        format!("{}/.well-known/jmap", self.url.trim_end_matches('/'))
    }

    /// Gets the capabilities declared by requests, core and mail by
    /// default.
    pub fn capabilities(&self) -> Vec<String> {
        self.capabilities
            .as_ref()
            .filter(|caps| !caps.is_empty())
            .cloned()
            .unwrap_or_else(|| vec![CORE_CAPABILITY.into(), MAIL_CAPABILITY.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_url() {
        let config = JmapConfig {
            url: "https://api.fastmail.com/".into(),
            ..JmapConfig::default()
        };
        assert_eq!("https://api.fastmail.com/.well-known/jmap", config.session_url());
    }

    #[test]
    fn bearer_detection() {
        let config = JmapConfig::default();
        assert!(config.bearer("fmu1-abcdef"));
        assert!(!config.bearer("hunter2"));

        let config = JmapConfig {
            bearer: Some(true),
            ..JmapConfig::default()
        };
        assert!(config.bearer("hunter2"));
    }

    #[test]
    fn defaults() {
        let config = JmapConfig::default();
        assert_eq!(Duration::from_secs(30), config.timeout());
        assert!(!config.insecure());
        assert_eq!(
            vec![CORE_CAPABILITY.to_owned(), MAIL_CAPABILITY.to_owned()],
            config.capabilities()
        );
    }

    #[cfg(unix)]
    #[test]
    fn passwd() {
        let config = JmapConfig {
            passwd_cmd: "echo 'password'".into(),
            ..JmapConfig::default()
        };
        assert_eq!("password", config.passwd().unwrap());

        let config = JmapConfig {
            passwd_cmd: "printf ''".into(),
            ..JmapConfig::default()
        };
        assert!(matches!(config.passwd(), Err(Error::GetPasswdEmptyError)));
    }
}
