use std::iter::FusedIterator;

use pathviz_core::GridCell;

use crate::algorithm::Algorithm;
use crate::heap::MinHeap;
use crate::search::{Frontier, SearchError, SearchState, Step, find_endpoints, frontier_key};
use crate::traits::PathFinder;

/// Label-setting shortest-path search keyed by distance from the source.
///
/// Supports any non-negative edge costs. The search stops the moment the
/// target is settled.
pub struct Dijkstra<C> {
    state: SearchState<C>,
    open: MinHeap<Frontier<i32>, i32>,
    improved: Vec<usize>,
}

impl<C: GridCell + Clone> Dijkstra<C> {
    /// Prepare a search from `source` to `target` over a grid snapshot.
    pub fn new(source: C, target: C, grid: &[Vec<C>]) -> Self {
        let state = SearchState::new("dijkstra", source, target, grid);
        let mut open = MinHeap::new(frontier_key as fn(&Frontier<i32>) -> i32);
        if let Some(si) = state.source_idx {
            open.push(Frontier { idx: si, key: 0 });
        }
        Self {
            state,
            open,
            improved: Vec::with_capacity(4),
        }
    }

    /// Prepare a search between the cells flagged as source and target.
    pub fn from_grid(grid: &[Vec<C>]) -> Result<Self, SearchError> {
        let (source, target) = find_endpoints(grid)?;
        Ok(Self::new(source, target, grid))
    }
}

impl<C: GridCell + Clone> Iterator for Dijkstra<C> {
    type Item = Step<C>;

    fn next(&mut self) -> Option<Step<C>> {
        if self.state.status.is_finished() {
            return None;
        }
        loop {
            let Ok(current) = self.open.pop() else {
                let outcome = self.state.outcome();
                self.state.finish(outcome);
                return None;
            };
            let ci = current.idx;
            // Skip stale entries.
            if self.state.settled[ci] {
                continue;
            }

            let step = self.state.settle(ci);
            if Some(ci) == self.state.target_idx {
                let outcome = self.state.outcome();
                self.state.finish(outcome);
                return Some(step);
            }

            self.state.relax(ci, &mut self.improved);
            for &ni in &self.improved {
                self.open.push(Frontier {
                    idx: ni,
                    key: self.state.dist[ni],
                });
            }
            return Some(step);
        }
    }
}

impl<C: GridCell + Clone> FusedIterator for Dijkstra<C> {}

impl<C: GridCell + Clone> PathFinder<C> for Dijkstra<C> {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Dijkstra
    }

    fn state(&self) -> &SearchState<C> {
        &self.state
    }
}
