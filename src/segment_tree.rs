//! A dynamic interval tree, for finding which active items overlap a query range.
//!
//! This is a treap ordered by interval start, where every node also records
//! the largest interval end in its subtree. That's enough to prune whole
//! subtrees that end before the query starts.

use std::collections::HashMap;
use std::hash::Hash;

use crate::num::CheapOrderedFloat;

type Key = (CheapOrderedFloat, u64);
type Link<T> = Option<Box<Node<T>>>;

#[derive(Clone, Debug)]
struct Node<T> {
    lo: f64,
    hi: f64,
    seq: u64,
    priority: u64,
    // The largest `hi` in this subtree.
    max_hi: f64,
    item: T,
    left: Link<T>,
    right: Link<T>,
}

impl<T> Node<T> {
    fn key(&self) -> Key {
        (CheapOrderedFloat::from(self.lo), self.seq)
    }

    fn update(&mut self) {
        let mut max_hi = self.hi;
        if let Some(left) = &self.left {
            max_hi = max_hi.max(left.max_hi);
        }
        if let Some(right) = &self.right {
            max_hi = max_hi.max(right.max_hi);
        }
        self.max_hi = max_hi;
    }
}

// splitmix64, so that priorities are well-mixed but deterministic.
fn priority(seq: u64) -> u64 {
    let mut z = seq.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Splits a subtree into the nodes that go left (according to `goes_left`)
/// and the rest. `goes_left` must be monotone in the key order.
fn split<T>(link: Link<T>, goes_left: &impl Fn(Key) -> bool) -> (Link<T>, Link<T>) {
    let Some(mut node) = link else {
        return (None, None);
    };
    if goes_left(node.key()) {
        let (mid, right) = split(node.right.take(), goes_left);
        node.right = mid;
        node.update();
        (Some(node), right)
    } else {
        let (left, mid) = split(node.left.take(), goes_left);
        node.left = mid;
        node.update();
        (left, Some(node))
    }
}

/// Joins two subtrees, where everything in `left` comes before everything in `right`.
fn merge<T>(left: Link<T>, right: Link<T>) -> Link<T> {
    match (left, right) {
        (None, r) => r,
        (l, None) => l,
        (Some(mut l), Some(mut r)) => {
            if l.priority > r.priority {
                l.right = merge(l.right.take(), Some(r));
                l.update();
                Some(l)
            } else {
                r.left = merge(Some(l), r.left.take());
                r.update();
                Some(r)
            }
        }
    }
}

fn query<T: Copy>(link: &Link<T>, lo: f64, hi: f64, out: &mut Vec<T>) {
    let Some(node) = link else {
        return;
    };
    if node.max_hi < lo {
        return;
    }
    query(&node.left, lo, hi, out);
    if node.lo <= hi {
        if node.hi >= lo {
            out.push(node.item);
        }
        query(&node.right, lo, hi, out);
    }
}

/// A set of closed intervals `[lo, hi]`, each tagged with an item.
///
/// Each item can be in the tree at most once.
#[derive(Clone, Debug)]
pub struct SegmentTree<T> {
    root: Link<T>,
    keys: HashMap<T, Key>,
    next_seq: u64,
}

impl<T> Default for SegmentTree<T> {
    fn default() -> Self {
        SegmentTree {
            root: None,
            keys: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T: Copy + Eq + Hash> SegmentTree<T> {
    /// The number of intervals in the tree.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Is the tree empty?
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Adds an interval, replacing the item's previous interval if it had one.
    pub fn insert(&mut self, lo: f64, hi: f64, item: T) {
        debug_assert!(lo <= hi);
        self.remove(&item);

        let seq = self.next_seq;
        self.next_seq += 1;
        let node = Box::new(Node {
            lo,
            hi,
            seq,
            priority: priority(seq),
            max_hi: hi,
            item,
            left: None,
            right: None,
        });
        let key = node.key();
        self.keys.insert(item, key);

        let (left, right) = split(self.root.take(), &|k| k < key);
        self.root = merge(merge(left, Some(node)), right);
    }

    /// Removes an item's interval. Returns false if it wasn't there.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(key) = self.keys.remove(item) else {
            return false;
        };
        let (left, rest) = split(self.root.take(), &|k| k < key);
        let (node, right) = split(rest, &|k| k <= key);
        debug_assert!(node.as_ref().is_some_and(|n| n.left.is_none() && n.right.is_none()));
        self.root = merge(left, right);
        true
    }

    /// Collects every item whose interval intersects `[lo, hi]`.
    pub fn query(&self, lo: f64, hi: f64, out: &mut Vec<T>) {
        query(&self.root, lo, hi, out);
    }
}
