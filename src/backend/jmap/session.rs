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

//! JMAP session module.
//!
//! This module contains the representation of the session resource,
//! which tells the API URL, the capabilities of the server and the
//! accounts the user can access.

#[cfg(feature = "jmap-backend")]
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::HashMap, result};
use thiserror::Error;

use super::{
    config::{MAIL_CAPABILITY, SUBMISSION_CAPABILITY},
    transport,
};

#[cfg(feature = "jmap-backend")]
use super::http::HttpTransport;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot fetch jmap session from {1}")]
    FetchSessionError(#[source] transport::Error, String),
    #[error("cannot parse jmap session")]
    ParseSessionError(#[source] serde_json::Error),
    #[error("cannot find primary account for capability {0}")]
    FindPrimaryAccountError(String),
    #[error("cannot find account {0}")]
    FindAccountError(String),
}

pub type Result<T> = result::Result<T, Error>;

/// Represents an account the user can access.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub name: String,
    #[serde(default)]
    pub is_personal: bool,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub account_capabilities: HashMap<String, Value>,
}

/// Represents the session resource.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub capabilities: HashMap<String, Value>,
    pub accounts: HashMap<String, Account>,
    pub primary_accounts: HashMap<String, String>,
    #[serde(default)]
    pub username: String,
    pub api_url: String,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub upload_url: String,
    #[serde(default)]
    pub event_source_url: String,
    #[serde(default)]
    pub state: String,
}

impl Session {
    /// Fetches the session resource at the given URL.
    #[cfg(feature = "jmap-backend")]
    pub fn discover(transport: &HttpTransport, url: &str) -> Result<Self> {
        let body = transport
            .fetch(url)
            .map_err(|err| Error::FetchSessionError(err, url.to_owned()))?;
        let session = Self::from_json(&body)?;
        debug!(
            "discovered jmap session of {} with api url {}",
            session.username, session.api_url
        );
        Ok(session)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::ParseSessionError)
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains_key(capability)
    }

    pub fn can_read_mail(&self) -> bool {
        self.has_capability(MAIL_CAPABILITY)
    }

    pub fn can_send_mail(&self) -> bool {
        self.has_capability(SUBMISSION_CAPABILITY)
    }

    pub fn primary_account_id(&self, capability: &str) -> Result<&str> {
        self.primary_accounts
            .get(capability)
            .map(String::as_str)
            .ok_or_else(|| Error::FindPrimaryAccountError(capability.to_owned()))
    }

    /// Gets the primary mail account id.
    pub fn account_id(&self) -> Result<&str> {
        self.primary_account_id(MAIL_CAPABILITY)
    }

    pub fn account(&self, id: &str) -> Result<&Account> {
        self.accounts
            .get(id)
            .ok_or_else(|| Error::FindAccountError(id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = r#"{
        "capabilities": {
            "urn:ietf:params:jmap:core": { "maxCallsInRequest": 32 },
            "urn:ietf:params:jmap:mail": {}
        },
        "accounts": {
            "u1": {
                "name": "alice@localhost",
                "isPersonal": true,
                "isReadOnly": false,
                "accountCapabilities": { "urn:ietf:params:jmap:mail": {} }
            }
        },
        "primaryAccounts": { "urn:ietf:params:jmap:mail": "u1" },
        "username": "alice@localhost",
        "apiUrl": "https://jmap.localhost/api/",
        "downloadUrl": "https://jmap.localhost/download/{accountId}/{blobId}/{name}",
        "uploadUrl": "https://jmap.localhost/upload/{accountId}/",
        "eventSourceUrl": "https://jmap.localhost/events/",
        "state": "s0"
    }"#;

    #[test]
    fn parse_session() {
        let session = Session::from_json(SESSION).unwrap();

        assert_eq!("https://jmap.localhost/api/", session.api_url);
        assert_eq!("u1", session.account_id().unwrap());
        assert_eq!("alice@localhost", session.account("u1").unwrap().name);
        assert!(session.account("u1").unwrap().is_personal);
        assert!(session.can_read_mail());
        assert!(!session.can_send_mail());
    }

    #[test]
    fn missing_accounts() {
        let session = Session::from_json(SESSION).unwrap();

        assert!(matches!(
            session.primary_account_id(SUBMISSION_CAPABILITY),
            Err(Error::FindPrimaryAccountError(_))
        ));
        assert!(matches!(
            session.account("u2"),
            Err(Error::FindAccountError(id)) if id == "u2"
        ));
    }

    #[test]
    fn invalid_session() {
        assert!(matches!(
            Session::from_json(r#"{ "capabilities": {} }"#),
            Err(Error::ParseSessionError(_))
        ));
    }
}
