//! Search phase stamping.
//!
//! Every search session reserves two consecutive phase values: `frontier`
//! (cell discovered) and `settled` (cell dequeued for good). A cell whose
//! stamp is below the session's `frontier` value is unvisited, whatever its
//! stale distance says, so per-cell arrays never need a bulk reset.

use super::frontier::FrontierQueue;

/// Phase values reserved by one search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub frontier: u32,
    pub settled: u32,
}

/// Monotonic phase counter.
#[derive(Debug, Default, Clone)]
pub struct SearchPhase {
    counter: u32,
}

impl SearchPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next two phase values. Returns `None` when the counter
    /// would overflow; the caller must reset its stamps and the counter.
    pub fn start_session(&mut self) -> Option<Session> {
        let frontier = self.counter.checked_add(2)?;
        frontier.checked_add(1)?;
        self.counter = frontier;
        Some(Session { frontier, settled: frontier + 1 })
    }

    pub fn current(&self) -> u32 {
        self.counter
    }

    fn reset(&mut self) {
        self.counter = 0;
    }
}

/// Per-cell search bookkeeping plus the frontier queue, owned by exactly one
/// driver (the generator or a navigator).
#[derive(Debug, Default, Clone)]
pub struct SearchWorkspace {
    phase: SearchPhase,
    session: Option<Session>,
    stamps: Vec<u32>,
    distance: Vec<u32>,
    heuristic: Vec<u32>,
    path_from: Vec<Option<usize>>,
    frontier: FrontierQueue,
}

impl SearchWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session over `cell_count` cells. Any session in progress
    /// is abandoned; its writes become unreadable.
    pub fn begin(&mut self, cell_count: usize) -> Session {
        if self.stamps.len() != cell_count {
            self.stamps = vec![0; cell_count];
            self.distance = vec![0; cell_count];
            self.heuristic = vec![0; cell_count];
            self.path_from = vec![None; cell_count];
            self.phase.reset();
        }
        self.frontier.clear();
        let session = match self.phase.start_session() {
            Some(s) => s,
            None => {
                self.stamps.iter_mut().for_each(|s| *s = 0);
                self.phase.reset();
                self.phase
                    .start_session()
                    .unwrap_or_else(|| unreachable!("fresh phase counter cannot overflow"))
            }
        };
        self.session = Some(session);
        session
    }

    fn session(&self) -> Session {
        self.session
            .unwrap_or_else(|| panic!("search workspace used before begin()"))
    }

    /// Not yet reached in the active session.
    #[inline]
    pub fn is_unvisited(&self, cell: usize) -> bool {
        self.stamps[cell] < self.session().frontier
    }

    /// Already dequeued for good in the active session.
    #[inline]
    pub fn is_settled(&self, cell: usize) -> bool {
        self.stamps[cell] >= self.session().settled
    }

    /// Distance recorded this session; `None` means infinite.
    pub fn distance(&self, cell: usize) -> Option<u32> {
        (!self.is_unvisited(cell)).then(|| self.distance[cell])
    }

    pub fn predecessor(&self, cell: usize) -> Option<usize> {
        if self.is_unvisited(cell) {
            None
        } else {
            self.path_from[cell]
        }
    }

    #[inline]
    fn priority(&self, cell: usize) -> u32 {
        self.distance[cell] + self.heuristic[cell]
    }

    /// First discovery of `cell` this session: record it and queue it.
    pub fn visit(&mut self, cell: usize, distance: u32, heuristic: u32, from: Option<usize>) {
        debug_assert!(self.is_unvisited(cell), "cell {cell} visited twice");
        self.stamps[cell] = self.session().frontier;
        self.distance[cell] = distance;
        self.heuristic[cell] = heuristic;
        self.path_from[cell] = from;
        self.frontier.enqueue(cell, distance + heuristic);
    }

    /// Record a shorter distance for a cell already on the frontier.
    /// Returns `false` if `distance` is no improvement.
    pub fn relax(&mut self, cell: usize, distance: u32, from: usize) -> bool {
        if distance >= self.distance[cell] {
            return false;
        }
        let old = self.priority(cell);
        self.distance[cell] = distance;
        self.path_from[cell] = Some(from);
        let new = self.priority(cell);
        self.frontier.change_key(cell, old, new);
        true
    }

    /// Pop the next frontier cell and mark it settled.
    pub fn settle_next(&mut self) -> Option<usize> {
        if self.frontier.is_empty() {
            return None;
        }
        let cell = self.frontier.dequeue();
        self.stamps[cell] = self.session().settled;
        Some(cell)
    }

    /// End the session's frontier early. Stamps are left as they are.
    pub fn clear_frontier(&mut self) {
        self.frontier.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_advance_by_two() {
        let mut p = SearchPhase::new();
        let a = p.start_session().unwrap();
        let b = p.start_session().unwrap();
        assert_eq!(a.settled, a.frontier + 1);
        assert_eq!(b.frontier, a.frontier + 2);
        assert_eq!(p.current(), b.frontier);
    }

    /// Writes from one session are invisible to the next.
    #[test]
    fn sessions_do_not_observe_each_other() {
        let mut ws = SearchWorkspace::new();
        ws.begin(10);
        ws.visit(3, 7, 0, None);
        ws.visit(4, 2, 0, Some(3));
        assert_eq!(ws.distance(3), Some(7));
        assert_eq!(ws.predecessor(4), Some(3));

        ws.begin(10);
        for cell in 0..10 {
            assert_eq!(ws.distance(cell), None, "cell {cell} leaked a distance");
            assert_eq!(ws.predecessor(cell), None);
            assert!(ws.is_unvisited(cell));
        }
        assert!(ws.settle_next().is_none(), "frontier must start empty");
    }

    #[test]
    fn settle_next_orders_by_distance_plus_heuristic() {
        let mut ws = SearchWorkspace::new();
        ws.begin(4);
        ws.visit(0, 5, 0, None);
        ws.visit(1, 1, 1, None);
        ws.visit(2, 1, 6, None);
        assert_eq!(ws.settle_next(), Some(1));
        assert!(ws.is_settled(1));
        assert!(!ws.is_settled(0));
        assert!(ws.relax(2, 0, 1));
        assert!(!ws.relax(0, 9, 1));
        assert_eq!(ws.settle_next(), Some(0));
        assert_eq!(ws.settle_next(), Some(2));
        assert_eq!(ws.predecessor(2), Some(1));
        assert_eq!(ws.settle_next(), None);
    }

    #[test]
    fn resizing_resets_every_stamp() {
        let mut ws = SearchWorkspace::new();
        ws.begin(4);
        ws.visit(1, 3, 0, None);
        ws.begin(6);
        assert!((0..6).all(|c| ws.is_unvisited(c)));
    }

    /// Counter overflow restarts cleanly instead of aliasing old stamps.
    #[test]
    fn overflow_restarts_phase() {
        let mut ws = SearchWorkspace::new();
        ws.begin(3);
        ws.phase.counter = u32::MAX - 2;
        ws.stamps[0] = u32::MAX;
        let s = ws.begin(3);
        assert_eq!(s.frontier, 2);
        assert!(ws.is_unvisited(0));
    }
}
