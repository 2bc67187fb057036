//! Mailbox tree printing module.
//!
//! This module contains the textual rendering of a mailbox tree.

use std::fmt::{self, Write};

use crate::MailboxTree;

const INDENT: &str = "  ";

impl MailboxTree {
    /// Renders one mailbox per line, indented by depth. When
    /// `show_counts` is enabled each line also shows the role and
    /// the unread/total emails of the mailbox.
    pub fn to_tree_string(&self, show_counts: bool) -> String {
        let mut out = String::new();
        // writing into a string cannot fail
        let _ = self.write_tree(&mut out, show_counts);
        out
    }

    fn write_tree<W: Write>(&self, out: &mut W, show_counts: bool) -> fmt::Result {
        for node in self.iter() {
            write!(out, "{}", INDENT.repeat(node.depth()))?;
            if show_counts {
                writeln!(out, "{}", node)?;
            } else {
                writeln!(out, "{}", node.name())?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for MailboxTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_tree(f, true)
    }
}
