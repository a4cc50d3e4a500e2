//! The sweep-line skeleton shared by the deduplication passes.
//!
//! Items (edges or vertices) are scheduled with their bounding boxes. The
//! sweep moves in increasing `y`: when an item's box starts it becomes a
//! candidate for comparisons, and when its box ends it stops being one.
//! The caller drives the loop, resolving each new item against the active
//! items that [`Sweep::candidates`] returns.
//!
//! Items that get replaced mid-sweep aren't dug out of the queue. Instead,
//! every scheduling of an item gets a fresh stamp, and queue entries whose
//! stamp doesn't match the item's current one are skipped when they come up.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use kurbo::Rect;
use slotmap::{Key, SecondaryMap};

use crate::num::CheapOrderedFloat;
use crate::segment_tree::SegmentTree;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    // Starts sort before ends, so that boxes that touch in y get compared.
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Event<K> {
    y: CheapOrderedFloat,
    kind: EventKind,
    stamp: u64,
    key: K,
}

/// An event queue and an active set, for sweeping over bounding boxes.
#[derive(Debug)]
pub struct Sweep<K: Key> {
    queue: BinaryHeap<Reverse<Event<K>>>,
    active: SegmentTree<K>,
    stamps: SecondaryMap<K, u64>,
    generation: u64,
    padding: f64,
}

impl<K: Key + Ord + std::hash::Hash> Sweep<K> {
    /// Creates an empty sweep. Every box is padded by `padding` on all sides.
    pub fn new(padding: f64) -> Self {
        Sweep {
            queue: BinaryHeap::new(),
            active: SegmentTree::default(),
            stamps: SecondaryMap::new(),
            generation: 0,
            padding,
        }
    }

    /// Queues an item, or re-queues it if its bounding box has changed.
    ///
    /// A re-queued item stops being active until its new start event comes up.
    pub fn schedule(&mut self, key: K, bounds: Rect) {
        self.generation += 1;
        let stamp = self.generation;
        self.stamps.insert(key, stamp);
        self.active.remove(&key);

        let y0 = CheapOrderedFloat::from(bounds.y0 - self.padding);
        let y1 = CheapOrderedFloat::from(bounds.y1 + self.padding);
        self.queue.push(Reverse(Event {
            y: y0,
            kind: EventKind::Start,
            stamp,
            key,
        }));
        self.queue.push(Reverse(Event {
            y: y1,
            kind: EventKind::End,
            stamp,
            key,
        }));
    }

    /// Forgets about an item that has been removed or replaced.
    pub fn retire(&mut self, key: K) {
        self.stamps.remove(key);
        self.active.remove(&key);
    }

    /// Advances the sweep to the next item whose box starts.
    ///
    /// Items whose boxes end along the way are deactivated.
    pub fn next_start(&mut self) -> Option<K> {
        while let Some(Reverse(event)) = self.queue.pop() {
            if self.stamps.get(event.key) != Some(&event.stamp) {
                continue;
            }
            match event.kind {
                EventKind::Start => return Some(event.key),
                EventKind::End => {
                    self.active.remove(&event.key);
                }
            }
        }
        None
    }

    /// Makes an item available as a candidate for the items that come after it.
    pub fn activate(&mut self, key: K, bounds: Rect) {
        self.active
            .insert(bounds.x0 - self.padding, bounds.x1 + self.padding, key);
    }

    /// Collects the active items whose padded horizontal extent meets `bounds`.
    pub fn candidates(&self, bounds: Rect, out: &mut Vec<K>) {
        out.clear();
        self.active
            .query(bounds.x0 - self.padding, bounds.x1 + self.padding, out);
        // The tree's order depends on insertion history; sorting keeps the
        // passes deterministic.
        out.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::{new_key_type, SlotMap};

    new_key_type! {
        struct ItemId;
    }

    #[test]
    fn pairs_with_overlapping_boxes() {
        let mut items: SlotMap<ItemId, Rect> = SlotMap::with_key();
        let a = items.insert(Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = items.insert(Rect::new(0.5, 0.5, 2.0, 2.0));
        items.insert(Rect::new(5.0, 0.0, 6.0, 1.0));
        items.insert(Rect::new(0.0, 3.0, 1.0, 4.0));

        let mut sweep = Sweep::new(0.01);
        for (key, bounds) in &items {
            sweep.schedule(key, *bounds);
        }

        let mut pairs = Vec::new();
        let mut cands = Vec::new();
        while let Some(key) = sweep.next_start() {
            sweep.candidates(items[key], &mut cands);
            pairs.extend(cands.iter().map(|&other| (other, key)));
            sweep.activate(key, items[key]);
        }
        assert_eq!(pairs, vec![(a, b)]);
    }

    #[test]
    fn stale_entries_are_skipped() {
        let mut items: SlotMap<ItemId, Rect> = SlotMap::with_key();
        let a = items.insert(Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = items.insert(Rect::new(0.0, 2.0, 1.0, 3.0));

        let mut sweep = Sweep::new(0.0);
        sweep.schedule(a, items[a]);
        sweep.schedule(b, items[b]);
        sweep.retire(a);
        // Moving `b` leaves its old events behind in the queue.
        items[b] = Rect::new(0.0, 10.0, 1.0, 11.0);
        sweep.schedule(b, items[b]);

        assert_eq!(sweep.next_start(), Some(b));
        assert_eq!(sweep.next_start(), None);
    }
}
