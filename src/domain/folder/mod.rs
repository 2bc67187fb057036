//! Folder module.
//!
//! This module contains everything related to mailboxes: the flat
//! records sent by the server, the tree built from them and the
//! folders listing.

pub mod folder;
pub use folder::*;

pub mod mailbox;
pub use mailbox::*;

pub mod node;
pub use node::*;

pub mod tree;
pub use tree::{MailboxTree, Statistics, DEFAULT_PATH_DELIM};

mod print;
