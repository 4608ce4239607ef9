//! Persistent AVL tree
//!
//! Nodes are immutable and shared through `Arc`. An insert copies only the
//! root-to-leaf path it touches, so cloning the tree is a pointer copy and
//! a clone never sees writes made to the original afterwards.
//!
//! There is no removal: a delete is an insert of a tombstone.

use std::cmp::Ordering;
use std::sync::Arc;

use bytes::Bytes;

use crate::entry::{Entry, KeyValueDeletable};

type Link = Option<Arc<Node>>;

#[derive(Debug)]
struct Node {
    key: Bytes,
    entry: Entry,
    height: u8,
    left: Link,
    right: Link,
}

/// Sorted map from key bytes to [`Entry`] with O(1) clone
#[derive(Debug, Clone, Default)]
pub(crate) struct PersistentTree {
    root: Link,
    len: usize,
}

impl PersistentTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn get(&self, key: &[u8]) -> Option<&Entry> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match key.cmp(&node.key[..]) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.entry),
            };
        }
        None
    }

    /// Insert or replace, returning the entry previously stored for `key`
    pub(crate) fn insert(&mut self, key: Bytes, entry: Entry) -> Option<Entry> {
        let mut replaced = None;
        self.root = Some(insert_at(&self.root, key, entry, &mut replaced));
        if replaced.is_none() {
            self.len += 1;
        }
        replaced
    }

    /// In-order traversal starting at the first key `>= lower` (or the
    /// smallest key when `lower` is `None`)
    pub(crate) fn range_from(&self, lower: Option<&[u8]>) -> TreeIter {
        let mut stack = Vec::new();
        let mut cur = self.root.clone();

        while let Some(node) = cur {
            if lower.map_or(true, |k| &node.key[..] >= k) {
                cur = node.left.clone();
                stack.push(node);
            } else {
                cur = node.right.clone();
            }
        }

        TreeIter { stack }
    }
}

// =============================================================================
// Path-Copying Insert
// =============================================================================

fn insert_at(link: &Link, key: Bytes, entry: Entry, replaced: &mut Option<Entry>) -> Arc<Node> {
    let Some(node) = link else {
        return Arc::new(Node {
            key,
            entry,
            height: 1,
            left: None,
            right: None,
        });
    };

    match key[..].cmp(&node.key[..]) {
        Ordering::Equal => {
            *replaced = Some(node.entry.clone());
            Arc::new(Node {
                key: node.key.clone(),
                entry,
                height: node.height,
                left: node.left.clone(),
                right: node.right.clone(),
            })
        }
        Ordering::Less => {
            let left = insert_at(&node.left, key, entry, replaced);
            balance(
                node.key.clone(),
                node.entry.clone(),
                Some(left),
                node.right.clone(),
            )
        }
        Ordering::Greater => {
            let right = insert_at(&node.right, key, entry, replaced);
            balance(
                node.key.clone(),
                node.entry.clone(),
                node.left.clone(),
                Some(right),
            )
        }
    }
}

fn height(link: &Link) -> u8 {
    link.as_ref().map_or(0, |n| n.height)
}

fn make(key: Bytes, entry: Entry, left: Link, right: Link) -> Arc<Node> {
    let height = 1 + height(&left).max(height(&right));
    Arc::new(Node {
        key,
        entry,
        height,
        left,
        right,
    })
}

/// Build a node from its parts, rotating if the subtrees differ in height
/// by two (the most a single insert can cause)
fn balance(key: Bytes, entry: Entry, left: Link, right: Link) -> Arc<Node> {
    let (hl, hr) = (height(&left), height(&right));

    if hl > hr + 1 {
        if let Some(l) = left.as_deref() {
            if height(&l.left) >= height(&l.right) {
                // single right rotation
                let new_right = make(key, entry, l.right.clone(), right);
                return make(l.key.clone(), l.entry.clone(), l.left.clone(), Some(new_right));
            }
            if let Some(lr) = l.right.as_deref() {
                // left-right
                let new_left = make(l.key.clone(), l.entry.clone(), l.left.clone(), lr.left.clone());
                let new_right = make(key, entry, lr.right.clone(), right);
                return make(lr.key.clone(), lr.entry.clone(), Some(new_left), Some(new_right));
            }
        }
    } else if hr > hl + 1 {
        if let Some(r) = right.as_deref() {
            if height(&r.right) >= height(&r.left) {
                // single left rotation
                let new_left = make(key, entry, left, r.left.clone());
                return make(r.key.clone(), r.entry.clone(), Some(new_left), r.right.clone());
            }
            if let Some(rl) = r.left.as_deref() {
                // right-left
                let new_left = make(key, entry, left, rl.left.clone());
                let new_right = make(r.key.clone(), r.entry.clone(), rl.right.clone(), r.right.clone());
                return make(rl.key.clone(), rl.entry.clone(), Some(new_left), Some(new_right));
            }
        }
    }

    make(key, entry, left, right)
}

// =============================================================================
// Iterator
// =============================================================================

/// In-order iterator that owns its path through a tree snapshot
pub(crate) struct TreeIter {
    stack: Vec<Arc<Node>>,
}

impl Iterator for TreeIter {
    type Item = KeyValueDeletable;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        let mut cur = node.right.clone();
        while let Some(child) = cur {
            cur = child.left.clone();
            self.stack.push(child);
        }

        Some(KeyValueDeletable {
            key: node.key.clone(),
            entry: node.entry.clone(),
        })
    }
}
