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

//! Mailbox tree module.
//!
//! This module contains the hierarchical view of the mailboxes of an
//! account. The tree is built once from the flat list returned by
//! `Mailbox/get`, then only queried: a changed mailbox set means
//! building a new tree.

use log::{debug, trace, warn};
use serde::Serialize;
use std::{cmp::Ordering, collections::HashMap, result};
use thiserror::Error;

use crate::{Folder, Folders, Mailbox, MailboxNode, Role};

/// Delimiter used to join mailbox names into paths.
pub const DEFAULT_PATH_DELIM: &str = "/";

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot build mailbox tree: mailbox {0} is its own ancestor")]
    CycleError(String),
}

pub type Result<T> = result::Result<T, Error>;

/// Represents aggregated numbers over a whole tree.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Statistics {
    pub total_mailboxes: usize,
    pub root_mailboxes: usize,
    pub total_emails: u64,
    pub unread_emails: u64,
    pub total_threads: u64,
    pub unread_threads: u64,
    pub deepest_level: usize,
}

/// Represents the forest of mailboxes of an account.
///
/// Nodes live in a flat arena and reference each other by index.
/// Methods taking a [`MailboxNode`] expect a node borrowed from the
/// same tree.
#[derive(Debug, Clone, Default)]
pub struct MailboxTree {
    delim: String,
    nodes: Vec<MailboxNode>,
    roots: Vec<usize>,
    preorder: Vec<usize>,
    ids: HashMap<String, usize>,
    roles: HashMap<Role, usize>,
    names: HashMap<String, Vec<usize>>,
    paths: HashMap<String, usize>,
}

impl MailboxTree {
    /// Builds the tree from mailboxes given in any order, using
    /// [`DEFAULT_PATH_DELIM`] to join paths.
    pub fn build<I>(mailboxes: I) -> Result<Self>
    where
        I: IntoIterator<Item = Mailbox>,
    {
        Self::build_with_delim(mailboxes, DEFAULT_PATH_DELIM)
    }

    /// Builds the tree from mailboxes given in any order.
    ///
    /// Mailboxes whose parent is absent from the list become roots.
    /// Fails if parent links form a cycle.
    pub fn build_with_delim<I>(mailboxes: I, delim: &str) -> Result<Self>
    where
        I: IntoIterator<Item = Mailbox>,
    {
        let mut tree = Self {
            delim: delim.to_owned(),
            ..Self::default()
        };

        tree.insert_nodes(mailboxes);
        tree.link_parents();
        tree.check_cycles()?;
        tree.link_children();
        tree.compute_paths();
        tree.build_indexes();

        debug!(
            "built mailbox tree with {} mailbox(es) and {} root(s)",
            tree.nodes.len(),
            tree.roots.len()
        );

        Ok(tree)
    }

    fn insert_nodes<I>(&mut self, mailboxes: I)
    where
        I: IntoIterator<Item = Mailbox>,
    {
        for mailbox in mailboxes {
            match self.ids.get(&mailbox.id) {
                Some(&index) => {
                    warn!("duplicate mailbox id {}, keeping the last one", mailbox.id);
                    self.nodes[index] = MailboxNode::new(mailbox, index);
                }
                None => {
                    let index = self.nodes.len();
                    self.ids.insert(mailbox.id.clone(), index);
                    self.nodes.push(MailboxNode::new(mailbox, index));
                }
            }
        }
    }

    fn link_parents(&mut self) {
        for index in 0..self.nodes.len() {
            let parent_id = self.nodes[index].mailbox.parent_id.as_ref();
            match parent_id.and_then(|id| self.ids.get(id)) {
                Some(&parent) => self.nodes[index].parent = Some(parent),
                None => {
                    if let Some(parent_id) = parent_id {
                        warn!(
                            "parent {} of mailbox {} not found, treating it as root",
                            parent_id, self.nodes[index].mailbox.id
                        );
                    }
                    self.roots.push(index);
                }
            }
        }
    }

    /// Walks up from every node. An acyclic chain reaches a root in
    /// less than `nodes.len()` steps; `checked` memoizes nodes already
    /// known to lead to a root.
    fn check_cycles(&self) -> Result<()> {
        let len = self.nodes.len();
        let mut checked = vec![false; len];

        for index in 0..len {
            let mut chain = vec![index];
            let mut cursor = index;

            while let Some(parent) = self.nodes[cursor].parent {
                if checked[parent] {
                    break;
                }
                if chain.len() > len {
                    return Err(Error::CycleError(self.nodes[cursor].mailbox.id.clone()));
                }
                chain.push(parent);
                cursor = parent;
            }

            for index in chain {
                checked[index] = true;
            }
        }

        Ok(())
    }

    fn link_children(&mut self) {
        for index in 0..self.nodes.len() {
            if let Some(parent) = self.nodes[index].parent {
                self.nodes[parent].children.push(index);
            }
        }

        for index in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[index].children);
            children.sort_by(|a, b| self.cmp_nodes(*a, *b));
            self.nodes[index].children = children;
        }

        let mut roots = std::mem::take(&mut self.roots);
        roots.sort_by(|a, b| self.cmp_nodes(*a, *b));
        self.roots = roots;
    }

    fn cmp_nodes(&self, a: usize, b: usize) -> Ordering {
        let (a, b) = (&self.nodes[a].mailbox, &self.nodes[b].mailbox);
        a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
    }

    fn compute_paths(&mut self) {
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();

        while let Some(index) = stack.pop() {
            let (depth, path) = match self.nodes[index].parent {
                Some(parent) => {
                    let parent = &self.nodes[parent];
                    let path = format!(
                        "{}{}{}",
                        parent.path, self.delim, self.nodes[index].mailbox.name
                    );
                    (parent.depth + 1, path)
                }
                None => (0, self.nodes[index].mailbox.name.clone()),
            };

            trace!("mailbox {} at depth {}: {}", index, depth, path);

            let node = &mut self.nodes[index];
            node.depth = depth;
            node.path = path;
            stack.extend(node.children.iter().rev());
            self.preorder.push(index);
        }
    }

    fn build_indexes(&mut self) {
        for node in &self.nodes {
            if let Some(role) = &node.mailbox.role {
                if let Some(prev) = self.roles.insert(role.clone(), node.index) {
                    warn!(
                        "role {} declared by mailboxes {} and {}, keeping {}",
                        role, self.nodes[prev].mailbox.id, node.mailbox.id, node.mailbox.id
                    );
                }
            }
        }

        for &index in &self.preorder {
            let node = &self.nodes[index];
            self.names
                .entry(node.mailbox.name.clone())
                .or_default()
                .push(index);
            self.paths.entry(node.path.clone()).or_insert(index);
        }
    }

    pub fn delim(&self) -> &str {
        &self.delim
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over root mailboxes, sorted by name.
    pub fn roots(&self) -> impl Iterator<Item = &MailboxNode> {
        self.roots.iter().map(move |&index| &self.nodes[index])
    }

    /// Iterates over all mailboxes, parents before children and
    /// siblings sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &MailboxNode> {
        self.preorder.iter().map(move |&index| &self.nodes[index])
    }

    pub fn get_by_id(&self, id: &str) -> Option<&MailboxNode> {
        self.ids.get(id).map(|&index| &self.nodes[index])
    }

    pub fn get_by_role<R: Into<Role>>(&self, role: R) -> Option<&MailboxNode> {
        self.roles.get(&role.into()).map(|&index| &self.nodes[index])
    }

    /// Gets all the mailboxes matching the given name, in tree order.
    pub fn get_by_name(&self, name: &str) -> Vec<&MailboxNode> {
        self.names
            .get(name)
            .map(|indexes| indexes.iter().map(|&index| &self.nodes[index]).collect())
            .unwrap_or_default()
    }

    /// Gets the mailbox whose full path is exactly `path`, including
    /// names that contain the delimiter themselves. When several
    /// mailboxes render to the same path, the first one in tree order
    /// wins.
    pub fn get_by_path(&self, path: &str) -> Option<&MailboxNode> {
        self.paths.get(path).map(|&index| &self.nodes[index])
    }

    /// Resolves a path of names joined by the tree delimiter.
    ///
    /// When several siblings share a name, the first one in sorted
    /// order wins.
    pub fn find_by_path(&self, path: &str) -> Option<&MailboxNode> {
        let mut segments = path.split(self.delim.as_str());
        let first = segments.next()?;

        let mut node = self.roots().find(|node| node.name() == first)?;
        for segment in segments {
            node = self.children(node).find(|node| node.name() == segment)?;
        }

        Some(node)
    }

    pub fn parent(&self, node: &MailboxNode) -> Option<&MailboxNode> {
        node.parent.and_then(|index| self.nodes.get(index))
    }

    /// Iterates over the direct children of the node, sorted by name.
    pub fn children<'a>(
        &'a self,
        node: &'a MailboxNode,
    ) -> impl Iterator<Item = &'a MailboxNode> + 'a {
        node.children
            .iter()
            .filter_map(move |&index| self.nodes.get(index))
    }

    /// Gets all the descendants of the node in tree order, the node
    /// itself excluded.
    pub fn descendants(&self, node: &MailboxNode) -> Vec<&MailboxNode> {
        let mut descendants = Vec::new();
        let mut stack: Vec<usize> = node.children.iter().rev().copied().collect();

        while let Some(index) = stack.pop() {
            if let Some(node) = self.nodes.get(index) {
                descendants.push(node);
                stack.extend(node.children.iter().rev());
            }
        }

        descendants
    }

    fn sum_recursive<F>(&self, node: &MailboxNode, count: F) -> u64
    where
        F: Fn(&MailboxNode) -> u64,
    {
        count(node)
            + self
                .descendants(node)
                .into_iter()
                .map(&count)
                .sum::<u64>()
    }

    pub fn total_emails_recursive(&self, node: &MailboxNode) -> u64 {
        self.sum_recursive(node, MailboxNode::total_emails)
    }

    pub fn unread_emails_recursive(&self, node: &MailboxNode) -> u64 {
        self.sum_recursive(node, MailboxNode::unread_emails)
    }

    pub fn total_threads_recursive(&self, node: &MailboxNode) -> u64 {
        self.sum_recursive(node, MailboxNode::total_threads)
    }

    pub fn unread_threads_recursive(&self, node: &MailboxNode) -> u64 {
        self.sum_recursive(node, MailboxNode::unread_threads)
    }

    pub fn statistics(&self) -> Statistics {
        self.nodes.iter().fold(
            Statistics {
                root_mailboxes: self.roots.len(),
                ..Statistics::default()
            },
            |mut stats, node| {
                stats.total_mailboxes += 1;
                stats.total_emails += node.total_emails();
                stats.unread_emails += node.unread_emails();
                stats.total_threads += node.total_threads();
                stats.unread_threads += node.unread_threads();
                stats.deepest_level = stats.deepest_level.max(node.depth());
                stats
            },
        )
    }

    /// Flattens the tree into folders named after mailbox paths.
    pub fn to_folders(&self) -> Folders {
        Folders(
            self.iter()
                .map(|node| Folder {
                    delim: self.delim.clone(),
                    name: node.path().to_owned(),
                    desc: node.role().map(Role::to_string).unwrap_or_default(),
                })
                .collect(),
        )
    }
}
