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

//! Mailbox module.
//!
//! This module contains the flat representation of a JMAP mailbox,
//! as returned by the `Mailbox/get` method.

use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

/// Represents a well-known mailbox role.
///
/// Roles are case-insensitive: custom roles are kept lowercase.
///
/// See the [IANA registry](https://www.iana.org/assignments/imap-mailbox-name-attributes).
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    All,
    Archive,
    Drafts,
    Flagged,
    Important,
    Inbox,
    Junk,
    Sent,
    Subscribed,
    Trash,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Archive => "archive",
            Self::Drafts => "drafts",
            Self::Flagged => "flagged",
            Self::Important => "important",
            Self::Inbox => "inbox",
            Self::Junk => "junk",
            Self::Sent => "sent",
            Self::Subscribed => "subscribed",
            Self::Trash => "trash",
            Self::Other(role) => role,
        }
    }

    /// Returns `true` for roles defined by the registry.
    pub fn is_well_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        match role.trim().to_lowercase().as_str() {
            "all" => Self::All,
            "archive" => Self::Archive,
            "drafts" => Self::Drafts,
            "flagged" => Self::Flagged,
            "important" => Self::Important,
            "inbox" => Self::Inbox,
            "junk" | "spam" => Self::Junk,
            "sent" => Self::Sent,
            "subscribed" => Self::Subscribed,
            "trash" => Self::Trash,
            _ => Self::Other(role.trim().to_lowercase()),
        }
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        role.as_str().into()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_owned()
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(role: &str) -> Result<Self, Self::Err> {
        Ok(role.into())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the rights the user has on a mailbox.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rights {
    pub may_read_items: bool,
    pub may_add_items: bool,
    pub may_remove_items: bool,
    pub may_set_seen: bool,
    pub may_set_keywords: bool,
    pub may_create_child: bool,
    pub may_rename: bool,
    pub may_delete: bool,
    pub may_submit: bool,
}

/// Represents a mailbox record as sent by the server.
///
/// Counters default to zero and rights default to none when the
/// server omits them from the response.
#[derive(Debug, Default, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mailbox {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default)]
    pub total_emails: u64,
    #[serde(default)]
    pub unread_emails: u64,
    #[serde(default)]
    pub total_threads: u64,
    #[serde(default)]
    pub unread_threads: u64,
    #[serde(default)]
    pub my_rights: Option<Rights>,
    #[serde(default)]
    pub is_subscribed: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn role_from_str() {
        assert_eq!(Role::Inbox, "inbox".into());
        assert_eq!(Role::Inbox, "INBOX".into());
        assert_eq!(Role::Junk, "spam".into());
        assert_eq!(Role::Junk, "junk".into());
        assert_eq!(Role::Other("receipts".into()), "receipts".into());
        assert_eq!(Role::Other("receipts".into()), " Receipts ".into());
        assert!(!Role::from("receipts").is_well_known());
    }

    #[test]
    fn deserialize_full_mailbox() {
        let mailbox: Mailbox = serde_json::from_value(json!({
            "id": "mb1",
            "name": "Inbox",
            "parentId": null,
            "role": "inbox",
            "sortOrder": 1,
            "totalEmails": 10,
            "unreadEmails": 3,
            "totalThreads": 8,
            "unreadThreads": 2,
            "isSubscribed": true,
            "myRights": {
                "mayReadItems": true,
                "mayAddItems": true,
                "mayRemoveItems": true,
                "maySetSeen": true,
                "maySetKeywords": true,
                "mayCreateChild": true,
                "mayRename": false,
                "mayDelete": false,
                "maySubmit": true
            }
        }))
        .unwrap();

        assert_eq!("mb1", mailbox.id);
        assert_eq!(Some(Role::Inbox), mailbox.role);
        assert_eq!(10, mailbox.total_emails);
        assert_eq!(2, mailbox.unread_threads);

        let rights = mailbox.my_rights.unwrap();
        assert!(rights.may_read_items);
        assert!(!rights.may_delete);
    }

    #[test]
    fn deserialize_sparse_mailbox() {
        let mailbox: Mailbox = serde_json::from_value(json!({
            "id": "mb2",
            "name": "Projects",
            "parentId": "mb1",
            "myRights": { "mayReadItems": true }
        }))
        .unwrap();

        assert_eq!(Some("mb1"), mailbox.parent_id.as_deref());
        assert_eq!(None, mailbox.role);
        assert_eq!(0, mailbox.total_emails);

        let rights = mailbox.my_rights.unwrap();
        assert!(rights.may_read_items);
        assert!(!rights.may_add_items);
    }
}
