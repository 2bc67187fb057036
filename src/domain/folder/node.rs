//! Mailbox node module.
//!
//! This module contains the representation of a mailbox placed in a
//! [`MailboxTree`](crate::MailboxTree).

use std::fmt;

use crate::{Mailbox, Rights, Role};

/// Represents a mailbox together with its position in the tree.
///
/// Structural links are indexes into the arena of the owning tree:
/// the parent link is a plain lookup relation, only the tree owns
/// nodes. Use the tree to follow them.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MailboxNode {
    pub(super) mailbox: Mailbox,
    pub(super) index: usize,
    pub(super) parent: Option<usize>,
    pub(super) children: Vec<usize>,
    pub(super) depth: usize,
    pub(super) path: String,
}

impl MailboxNode {
    pub(super) fn new(mailbox: Mailbox, index: usize) -> Self {
        Self {
            mailbox,
            index,
            parent: None,
            children: Vec::new(),
            depth: 0,
            path: String::new(),
        }
    }

    /// Gets the underlying mailbox record.
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn id(&self) -> &str {
        &self.mailbox.id
    }

    pub fn name(&self) -> &str {
        &self.mailbox.name
    }

    pub fn role(&self) -> Option<&Role> {
        self.mailbox.role.as_ref()
    }

    /// Gets the parent id as declared by the server. The parent may
    /// be absent from the tree, in which case the node is a root.
    pub fn parent_id(&self) -> Option<&str> {
        self.mailbox.parent_id.as_deref()
    }

    /// Gets the depth of the node, roots being at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Gets the names of the ancestors and of the node itself, joined
    /// by the tree delimiter.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn children_len(&self) -> usize {
        self.children.len()
    }

    pub fn total_emails(&self) -> u64 {
        self.mailbox.total_emails
    }

    pub fn unread_emails(&self) -> u64 {
        self.mailbox.unread_emails
    }

    pub fn total_threads(&self) -> u64 {
        self.mailbox.total_threads
    }

    pub fn unread_threads(&self) -> u64 {
        self.mailbox.unread_threads
    }

    /// Gets the rights of the mailbox. Missing rights mean no right
    /// at all.
    pub fn rights(&self) -> Rights {
        self.mailbox.my_rights.unwrap_or_default()
    }

    pub fn can_read(&self) -> bool {
        self.rights().may_read_items
    }

    pub fn can_write(&self) -> bool {
        self.rights().may_add_items
    }

    pub fn can_delete(&self) -> bool {
        self.rights().may_delete
    }
}

impl fmt::Display for MailboxNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if let Some(role) = self.role() {
            write!(f, " [{}]", role)?;
        }
        write!(f, " ({}/{})", self.unread_emails(), self.total_emails())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_without_rights() {
        let node = MailboxNode::new(Mailbox::default(), 0);

        assert!(!node.can_read());
        assert!(!node.can_write());
        assert!(!node.can_delete());
    }

    #[test]
    fn permissions_with_rights() {
        let mailbox = Mailbox {
            my_rights: Some(Rights {
                may_read_items: true,
                may_add_items: true,
                ..Rights::default()
            }),
            ..Mailbox::default()
        };
        let node = MailboxNode::new(mailbox, 0);

        assert!(node.can_read());
        assert!(node.can_write());
        assert!(!node.can_delete());
    }

    #[test]
    fn display() {
        let mailbox = Mailbox {
            name: "Inbox".into(),
            role: Some(Role::Inbox),
            total_emails: 10,
            unread_emails: 3,
            ..Mailbox::default()
        };
        assert_eq!("Inbox [inbox] (3/10)", MailboxNode::new(mailbox, 0).to_string());

        let mailbox = Mailbox {
            name: "Work".into(),
            total_emails: 4,
            unread_emails: 1,
            ..Mailbox::default()
        };
        assert_eq!("Work (1/4)", MailboxNode::new(mailbox, 0).to_string());
    }
}
