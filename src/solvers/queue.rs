use std::{cmp::Ordering, collections::BinaryHeap};

/// Binary min-heap ordered by a key computed from each item when it is pushed.
///
/// Items with equal keys pop in insertion order, so weighted searches replay identically
/// no matter how the heap happens to be laid out.
pub struct MinQueue<T, K, F>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    heap: BinaryHeap<Entry<T, K>>,
    key: F,
    /// Insertion counter used as the tie-breaker
    next_seq: u64,
}

struct Entry<T, K> {
    key: K,
    seq: u64,
    item: T,
}

impl<T, K: Ord> PartialEq for Entry<T, K> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl<T, K: Ord> Eq for Entry<T, K> {}

impl<T, K: Ord> PartialOrd for Entry<T, K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, K: Ord> Ord for Entry<T, K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so std's max-heap pops the smallest key, then the oldest entry
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T, K, F> MinQueue<T, K, F>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    pub fn new(key: F) -> Self {
        MinQueue {
            heap: BinaryHeap::new(),
            key,
            next_seq: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        let key = (self.key)(&item);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { key, seq, item });
    }

    /// Removes and returns the item with the smallest key.
    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
