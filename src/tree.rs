//! Per-bucket binary search tree
//!
//! Entries whose addresses share a hash key live in an unbalanced binary
//! search tree ordered by order key. Each node owns its children and each
//! bucket slot owns its root. There are no back references, no rotations
//! and no deletions, so a tree only ever grows at its leaves.
//!
//! Insertion order determines shape: monotonically increasing keys within a
//! bucket degrade the tree into a chain. Traversal and drop are iterative
//! so a long chain costs time, not stack.

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use crate::codec::{self, OrderKey};
use crate::entry::BridgeEntry;
use crate::error::{Error, Result};

const STACK_INLINE: usize = 32;

/// Owned, possibly empty, subtree
pub type Link = Option<Box<Node>>;

/// Tree node holding one entry
pub struct Node {
    entry: BridgeEntry,
    key: OrderKey,
    left: Link,
    right: Link,
}

impl Node {
    fn new(entry: BridgeEntry, key: OrderKey) -> Self {
        Self {
            entry,
            key,
            left: None,
            right: None,
        }
    }

    /// The stored entry
    pub fn entry(&self) -> &BridgeEntry {
        &self.entry
    }

    /// Order key of the stored entry
    pub fn key(&self) -> OrderKey {
        self.key
    }

    /// Subtree of smaller keys
    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    /// Subtree of larger keys
    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        Self {
            entry: self.entry,
            key: self.key,
            left: clone_subtree(self.left()),
            right: clone_subtree(self.right()),
        }
    }
}

enum CloneStep<'a> {
    Visit(Option<&'a Node>),
    Build(&'a Node),
}

/// Copy a subtree bottom-up with explicit stacks
fn clone_subtree(root: Option<&Node>) -> Link {
    let mut steps: SmallVec<[CloneStep<'_>; STACK_INLINE]> = SmallVec::new();
    let mut built: SmallVec<[Link; STACK_INLINE]> = SmallVec::new();
    steps.push(CloneStep::Visit(root));

    while let Some(step) = steps.pop() {
        match step {
            CloneStep::Visit(None) => built.push(None),
            CloneStep::Visit(Some(node)) => {
                // left is built first, so it sits below right on `built`
                steps.push(CloneStep::Build(node));
                steps.push(CloneStep::Visit(node.right()));
                steps.push(CloneStep::Visit(node.left()));
            }
            CloneStep::Build(node) => {
                let right = built.pop().flatten();
                let left = built.pop().flatten();
                built.push(Some(Box::new(Node {
                    entry: node.entry,
                    key: node.key,
                    left,
                    right,
                })));
            }
        }
    }
    built.pop().flatten()
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("entry", &self.entry)
            .field("key", &self.key)
            .field("left", &self.left().map(Node::key))
            .field("right", &self.right().map(Node::key))
            .finish()
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending: SmallVec<[Box<Node>; STACK_INLINE]> = SmallVec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());

        // Children are detached before each box drops, so this never recurses.
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

/// Where `key` lies relative to `node`
#[inline]
fn direction(key: OrderKey, node: &Node) -> Ordering {
    key.cmp(&node.key)
}

/// Insert `entry` below `root`
///
/// Returns the depth (root = 1) of the new node. Fails with
/// [`Error::DuplicateKey`] if the address is already present, in which case
/// the tree is untouched.
pub fn insert(root: &mut Link, entry: BridgeEntry) -> Result<usize> {
    let key = codec::order_key(entry.address());
    let mut cursor = root;
    let mut depth = 1;

    while let Some(node) = cursor {
        cursor = match direction(key, node) {
            Ordering::Equal => return Err(Error::DuplicateKey(*entry.address())),
            Ordering::Less => &mut node.left,
            Ordering::Greater => &mut node.right,
        };
        depth += 1;
    }

    *cursor = Some(Box::new(Node::new(entry, key)));
    Ok(depth)
}

/// Find the entry whose order key equals `key`
pub fn find(root: &Link, key: OrderKey) -> Option<&BridgeEntry> {
    let mut current = root.as_deref();

    while let Some(node) = current {
        current = match direction(key, node) {
            Ordering::Equal => return Some(&node.entry),
            Ordering::Less => node.left.as_deref(),
            Ordering::Greater => node.right.as_deref(),
        };
    }
    None
}

/// Number of entries in the tree
pub fn len(root: &Link) -> usize {
    iter(root).count()
}

/// Length of the longest root-to-leaf path, 0 for an empty tree
pub fn depth(root: &Link) -> usize {
    let mut stack: SmallVec<[(&Node, usize); STACK_INLINE]> = SmallVec::new();
    stack.extend(root.as_deref().map(|node| (node, 1)));

    let mut max_depth = 0;
    while let Some((node, level)) = stack.pop() {
        max_depth = max_depth.max(level);
        stack.extend(node.left.as_deref().map(|child| (child, level + 1)));
        stack.extend(node.right.as_deref().map(|child| (child, level + 1)));
    }
    max_depth
}

/// In-order iterator over the tree's entries
pub fn iter(root: &Link) -> Iter<'_> {
    let mut iter = Iter {
        stack: SmallVec::new(),
    };
    iter.push_left_spine(root.as_deref());
    iter
}

/// Iterator over entries in ascending order key
pub struct Iter<'a> {
    stack: SmallVec<[&'a Node; STACK_INLINE]>,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a BridgeEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.entry)
    }
}
