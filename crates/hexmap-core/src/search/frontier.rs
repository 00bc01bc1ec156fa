//! Bucket-sorted priority queue over small integer priorities.
//!
//! Buckets hold cell indices and are indexed by absolute priority. The
//! `minimum` cursor only ever moves forward between `clear()` calls, except
//! when an insert lands below it. Bucket storage outlives a search, but
//! `clear()` only touches the buckets used since the previous clear.

/// Frontier of a flood fill or graph search.
#[derive(Debug, Default, Clone)]
pub struct FrontierQueue {
    buckets: Vec<Vec<usize>>,
    minimum: usize,
    /// One past the highest bucket used since the last clear.
    used: usize,
    count: usize,
}

impl FrontierQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn enqueue(&mut self, cell: usize, priority: u32) {
        let p = priority as usize;
        if p >= self.buckets.len() {
            self.buckets.resize_with(p + 1, Vec::new);
        }
        self.buckets[p].push(cell);
        self.used = self.used.max(p + 1);
        if p < self.minimum {
            self.minimum = p;
        }
        self.count += 1;
    }

    /// Remove and return a cell with the lowest priority.
    ///
    /// # Panics
    /// Panics if the queue is empty.
    pub fn dequeue(&mut self) -> usize {
        assert!(self.count > 0, "dequeue on an empty frontier");
        while self.minimum < self.used {
            if let Some(cell) = self.buckets[self.minimum].pop() {
                self.count -= 1;
                return cell;
            }
            self.minimum += 1;
        }
        unreachable!("frontier count {} but every bucket is empty", self.count)
    }

    /// Move `cell` from `old_priority` to `new_priority`.
    ///
    /// # Panics
    /// Panics if `cell` is not queued at `old_priority`.
    pub fn change_key(&mut self, cell: usize, old_priority: u32, new_priority: u32) {
        let bucket = &mut self.buckets[old_priority as usize];
        let pos = bucket
            .iter()
            .position(|&c| c == cell)
            .unwrap_or_else(|| panic!("cell {cell} is not queued at priority {old_priority}"));
        bucket.swap_remove(pos);
        self.count -= 1;
        self.enqueue(cell, new_priority);
    }

    /// Drop every queued cell. Bucket storage is kept for reuse.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets[..self.used] {
            bucket.clear();
        }
        self.used = 0;
        self.minimum = 0;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn dequeues_in_priority_order() {
        let mut q = FrontierQueue::new();
        q.enqueue(10, 5);
        q.enqueue(11, 2);
        q.enqueue(12, 9);
        q.enqueue(13, 2);
        let mut out = Vec::new();
        while !q.is_empty() {
            out.push(q.dequeue());
        }
        assert_eq!(out.len(), 4);
        assert!(out[..2].contains(&11) && out[..2].contains(&13));
        assert_eq!(&out[2..], &[10, 12]);
    }

    #[test]
    fn insert_below_cursor_is_seen() {
        let mut q = FrontierQueue::new();
        q.enqueue(1, 6);
        q.enqueue(2, 7);
        assert_eq!(q.dequeue(), 1);
        q.enqueue(3, 3);
        assert_eq!(q.dequeue(), 3);
        assert_eq!(q.dequeue(), 2);
    }

    #[test]
    fn change_key_moves_cell_forward() {
        let mut q = FrontierQueue::new();
        q.enqueue(1, 4);
        q.enqueue(2, 8);
        q.change_key(2, 8, 1);
        assert_eq!(q.len(), 2);
        assert_eq!(q.dequeue(), 2);
        assert_eq!(q.dequeue(), 1);
    }

    #[test]
    fn clear_empties_queue() {
        let mut q = FrontierQueue::new();
        for i in 0..20 {
            q.enqueue(i, (i % 7) as u32);
        }
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
        q.enqueue(99, 3);
        assert_eq!(q.dequeue(), 99);
    }

    /// One far-reaching search does not make later clears walk every
    /// bucket it ever grew.
    #[test]
    fn clear_only_touches_used_buckets() {
        let mut q = FrontierQueue::new();
        q.enqueue(1, 50_000);
        q.enqueue(2, 4);
        q.clear();
        assert_eq!(q.used, 0);
        assert!(q.buckets.len() > 50_000);

        q.enqueue(3, 6);
        q.enqueue(4, 2);
        assert_eq!(q.used, 7);
        q.clear();
        assert!(q.buckets[..=50_000].iter().all(Vec::is_empty));
        q.enqueue(5, 9);
        assert_eq!(q.dequeue(), 5);
        assert!(q.is_empty());
    }

    #[test]
    #[should_panic(expected = "empty frontier")]
    fn dequeue_on_empty_panics() {
        let mut q = FrontierQueue::new();
        q.dequeue();
    }

    /// Random interleavings of enqueue / change_key / dequeue against a
    /// brute-force model: every dequeue yields a current minimum.
    #[test]
    fn matches_reference_model_under_random_ops() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut q = FrontierQueue::new();
        let mut model: Vec<(usize, u32)> = Vec::new();
        let mut next_cell = 0usize;

        for _ in 0..5_000 {
            match rng.gen_range(0..3) {
                0 => {
                    let p = rng.gen_range(0..40);
                    q.enqueue(next_cell, p);
                    model.push((next_cell, p));
                    next_cell += 1;
                }
                1 if !model.is_empty() => {
                    let k = rng.gen_range(0..model.len());
                    let (cell, old) = model[k];
                    let new = rng.gen_range(0..=old);
                    q.change_key(cell, old, new);
                    model[k].1 = new;
                }
                _ if !model.is_empty() => {
                    let min = model.iter().map(|&(_, p)| p).min().unwrap();
                    let cell = q.dequeue();
                    let k = model.iter().position(|&(c, _)| c == cell).unwrap();
                    assert_eq!(model[k].1, min, "dequeued priority {} but minimum is {min}", model[k].1);
                    model.swap_remove(k);
                }
                _ => {}
            }
            assert_eq!(q.len(), model.len());
        }
    }
}
