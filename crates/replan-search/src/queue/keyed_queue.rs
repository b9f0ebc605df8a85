//! `KeyedQueue`: indexed binary min-heap.

use std::hash::Hash;

use replan_core::types::collections::FxHashMap;

use super::key::Key;

/// Min-priority queue holding at most one entry per item.
///
/// Entries are ordered by `(key, item)`, so equal keys drain in ascending item order.
/// `positions[item]` is the slot of `item` in `heap`; every swap rewrites both slots.
#[derive(Debug, Clone)]
pub struct KeyedQueue<T> {
    heap: Vec<(Key, T)>,
    positions: FxHashMap<T, usize>,
}

impl<T> Default for KeyedQueue<T> {
    fn default() -> Self {
        Self {
            heap: Vec::new(),
            positions: FxHashMap::default(),
        }
    }
}

impl<T: Copy + Eq + Hash + Ord> KeyedQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, item: T) -> bool {
        self.positions.contains_key(&item)
    }

    /// The key `item` is queued with, if queued.
    pub fn key_of(&self, item: T) -> Option<Key> {
        self.positions.get(&item).map(|&pos| self.heap[pos].0)
    }

    /// Insert `item`, or move it to `key` if already queued.
    pub fn push(&mut self, item: T, key: Key) {
        if let Some(&pos) = self.positions.get(&item) {
            let old = self.heap[pos].0;
            self.heap[pos].0 = key;
            if key < old {
                self.sift_up(pos);
            } else {
                self.sift_down(pos);
            }
            return;
        }
        let pos = self.heap.len();
        self.heap.push((key, item));
        self.positions.insert(item, pos);
        self.sift_up(pos);
    }

    /// Remove and return the minimum entry.
    pub fn pop(&mut self) -> Option<(T, Key)> {
        let (key, item) = self.take(0)?;
        Some((item, key))
    }

    /// Remove `item` if queued, returning its key.
    pub fn remove(&mut self, item: T) -> Option<Key> {
        let pos = *self.positions.get(&item)?;
        self.take(pos).map(|(key, _)| key)
    }

    pub fn peek(&self) -> Option<(T, Key)> {
        self.heap.first().map(|&(key, item)| (item, key))
    }

    /// Minimum key, or [`Key::INFINITE`] when empty.
    pub fn peek_key(&self) -> Key {
        self.heap.first().map_or(Key::INFINITE, |&(key, _)| key)
    }

    /// Queued items in heap order (unspecified, but stable between mutations).
    pub fn vertices(&self) -> impl Iterator<Item = T> + '_ {
        self.heap.iter().map(|&(_, item)| item)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.positions.clear();
    }

    /// Check the heap property and the position index. Test and debug aid.
    pub fn is_valid(&self) -> bool {
        if self.positions.len() != self.heap.len() {
            return false;
        }
        self.heap.iter().enumerate().all(|(pos, entry)| {
            let indexed = self.positions.get(&entry.1) == Some(&pos);
            let ordered = pos == 0 || self.heap[(pos - 1) / 2] <= *entry;
            indexed && ordered
        })
    }

    fn take(&mut self, pos: usize) -> Option<(Key, T)> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(pos, last);
        let entry = self.heap.pop()?;
        self.positions.remove(&entry.1);
        if pos < self.heap.len() {
            // The moved entry may belong above or below its new slot.
            self.sift_up(pos);
            self.sift_down(pos);
        }
        Some(entry)
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.positions.insert(self.heap[a].1, a);
        self.positions.insert(self.heap[b].1, b);
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.heap[pos] < self.heap[parent] {
                self.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.heap[left] < self.heap[smallest] {
                smallest = left;
            }
            if right < len && self.heap[right] < self.heap[smallest] {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(p: f64) -> Key {
        Key::new(p, p)
    }

    #[test]
    fn test_pops_in_key_order() {
        let mut q = KeyedQueue::new();
        for (item, p) in [(1u32, 5.0), (2, 1.0), (3, 3.0), (4, 4.0), (5, 2.0)] {
            q.push(item, k(p));
        }
        let order: Vec<u32> = std::iter::from_fn(|| q.pop().map(|(v, _)| v)).collect();
        assert_eq!(order, vec![2, 5, 3, 4, 1]);
        assert!(q.is_empty());
        assert!(q.pop().is_none());
    }

    #[test]
    fn test_push_existing_rekeys_without_duplicates() {
        let mut q = KeyedQueue::new();
        q.push(7u32, k(10.0));
        q.push(8, k(5.0));
        q.push(7, k(1.0));
        assert_eq!(q.len(), 2);
        assert_eq!(q.peek(), Some((7, k(1.0))));
        q.push(7, k(20.0));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some((8, k(5.0))));
        assert_eq!(q.pop(), Some((7, k(20.0))));
    }

    #[test]
    fn test_remove_arbitrary_keeps_index_consistent() {
        let mut q = KeyedQueue::new();
        for i in 0u32..20 {
            q.push(i, k(f64::from((i * 7) % 20)));
        }
        for i in [3u32, 0, 19, 11] {
            assert!(q.remove(i).is_some());
            assert!(!q.contains(i));
            assert!(q.is_valid());
        }
        assert!(q.remove(3).is_none());
        assert_eq!(q.len(), 16);
    }

    #[test]
    fn test_equal_keys_break_ties_on_item() {
        let mut q = KeyedQueue::new();
        q.push(9u32, k(1.0));
        q.push(2, k(1.0));
        q.push(5, k(1.0));
        assert_eq!(q.pop().map(|(v, _)| v), Some(2));
        assert_eq!(q.pop().map(|(v, _)| v), Some(5));
        assert_eq!(q.pop().map(|(v, _)| v), Some(9));
    }

    #[test]
    fn test_peek_key_of_empty_queue_is_infinite() {
        let mut q: KeyedQueue<u32> = KeyedQueue::new();
        assert_eq!(q.peek_key(), Key::INFINITE);
        q.push(1, Key::new(2.0, 1.0));
        assert_eq!(q.peek_key(), Key::new(2.0, 1.0));
        assert_eq!(q.key_of(1), Some(Key::new(2.0, 1.0)));
        assert_eq!(q.key_of(2), None);
    }
}
