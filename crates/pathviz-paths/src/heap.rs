//! A binary min-heap ordered by a caller-supplied key function.

use std::fmt;
use std::marker::PhantomData;

/// Returned by [`MinHeap::pop`] when the heap holds no elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyQueue;

impl fmt::Display for EmptyQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("pop from an empty priority queue")
    }
}

impl std::error::Error for EmptyQueue {}

/// Binary min-heap on an implicit array.
///
/// The element with the smallest `key(&element)` is at the root. Ties are
/// broken arbitrarily. Children of slot `i` live at `2i + 1` and `2i + 2`.
pub struct MinHeap<T, K, F = fn(&T) -> K> {
    heap: Vec<T>,
    key: F,
    _key: PhantomData<fn() -> K>,
}

impl<T, K, F> MinHeap<T, K, F>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    /// Create an empty heap.
    pub fn new(key: F) -> Self {
        Self {
            heap: Vec::new(),
            key,
            _key: PhantomData,
        }
    }

    /// Build a heap from an initial set of elements in `O(n)`.
    pub fn from_vec(items: Vec<T>, key: F) -> Self {
        let mut h = Self {
            heap: items,
            key,
            _key: PhantomData,
        };
        for i in (0..h.heap.len() / 2).rev() {
            h.sift_down(i);
        }
        h
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Insert an element.
    pub fn push(&mut self, item: T) {
        self.heap.push(item);
        self.sift_up(self.heap.len() - 1);
    }

    /// Remove and return the element with the smallest key.
    pub fn pop(&mut self) -> Result<T, EmptyQueue> {
        if self.heap.is_empty() {
            return Err(EmptyQueue);
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let result = self.heap.pop().ok_or(EmptyQueue)?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok(result)
    }

    /// The element with the smallest key, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Consume the heap, returning its elements in heap order.
    pub fn into_vec(self) -> Vec<T> {
        self.heap
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        (self.key)(&self.heap[a]) < (self.key)(&self.heap[b])
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if !self.less(idx, parent) {
                break;
            }
            self.heap.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.heap.swap(idx, smallest);
            idx = smallest;
        }
    }
}

impl<T: fmt::Debug, K, F> fmt::Debug for MinHeap<T, K, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinHeap").field("heap", &self.heap).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(x: &i32) -> i32 {
        *x
    }

    fn assert_heap_property<T, K: PartialOrd, F: Fn(&T) -> K>(h: &MinHeap<T, K, F>) {
        for i in 1..h.heap.len() {
            let parent = (i - 1) / 2;
            assert!((h.key)(&h.heap[parent]) <= (h.key)(&h.heap[i]));
        }
    }

    #[test]
    fn pop_empty_is_an_error() {
        let mut h: MinHeap<i32, i32> = MinHeap::new(ident);
        assert_eq!(h.pop(), Err(EmptyQueue));
        assert!(h.peek().is_none());
        assert_eq!(h.len(), 0);
    }

    #[test]
    fn from_vec_heapifies() {
        let h: MinHeap<i32, i32> = MinHeap::from_vec(vec![9, 4, 7, 1, 8, 2, 6, 3, 5, 0], ident);
        assert_heap_property(&h);
        assert_eq!(h.peek(), Some(&0));
        assert_eq!(h.len(), 10);
    }

    #[test]
    fn pops_in_key_order() {
        let mut h: MinHeap<i32, i32> = MinHeap::from_vec(vec![5, 3, 8, 1], ident);
        h.push(4);
        h.push(0);
        let mut out = Vec::new();
        while let Ok(x) = h.pop() {
            out.push(x);
        }
        assert_eq!(out, vec![0, 1, 3, 4, 5, 8]);
    }

    #[test]
    fn interleaved_push_pop_keeps_minimum() {
        // Deterministic pseudo-random sequence (LCG).
        let mut seed: u32 = 12345;
        let mut next = || {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (seed >> 16) as i32 % 100
        };
        let mut h: MinHeap<i32, i32> = MinHeap::new(ident);
        let mut shadow: Vec<i32> = Vec::new();
        for round in 0..500 {
            if round % 3 == 2 && !h.is_empty() {
                let got = h.pop().unwrap();
                assert!(shadow.iter().all(|&x| got <= x));
                let pos = shadow.iter().position(|&x| x == got).unwrap();
                shadow.swap_remove(pos);
            } else {
                let v = next();
                h.push(v);
                shadow.push(v);
            }
            assert_heap_property(&h);
        }
        assert_eq!(h.len(), shadow.len());
    }

    #[test]
    fn closure_keys_on_structs() {
        #[derive(Debug)]
        struct Job {
            name: &'static str,
            priority: f64,
        }
        let mut h = MinHeap::new(|j: &Job| j.priority);
        h.push(Job { name: "b", priority: 2.5 });
        h.push(Job { name: "a", priority: 0.5 });
        h.push(Job { name: "c", priority: 9.0 });
        assert_eq!(h.peek().map(|j| j.name), Some("a"));
        assert_eq!(h.pop().map(|j| j.name), Ok("a"));
        assert_eq!(h.pop().map(|j| j.name), Ok("b"));
        assert_eq!(h.into_vec().len(), 1);
    }
}
