use pathviz_core::GridCell;

use crate::algorithm::Algorithm;
use crate::reveal::PathReveal;
use crate::search::{SearchState, SearchStatus, Step};

/// A steppable shortest-path search.
///
/// The search itself is the iterator: every `next()` performs one settle
/// event (Dijkstra/A*: pop and relax one vertex; Bellman-Ford: one full
/// relaxation pass) and returns it, so a caller can redraw between ticks.
/// The sequence is finite and cannot be restarted; build a new search from a
/// fresh grid snapshot instead.
pub trait PathFinder<C: GridCell + Clone>: Iterator<Item = Step<C>> {
    /// Which algorithm drives this search.
    fn algorithm(&self) -> Algorithm;

    /// Distances, parents and graph of the run.
    fn state(&self) -> &SearchState<C>;

    fn status(&self) -> SearchStatus {
        self.state().status()
    }

    /// Run every remaining step and return the terminal status.
    fn execute(&mut self) -> SearchStatus {
        while self.next().is_some() {}
        self.status()
    }

    fn distance_to(&self, cell: &C) -> Option<i32> {
        self.state().distance_to(cell)
    }

    fn path_to(&self, cell: &C) -> Option<Vec<C>> {
        self.state().path_to(cell)
    }

    /// Mark the path to `target` on the board.
    ///
    /// With `instant` every cell is marked before returning and the returned
    /// reveal is already exhausted; otherwise each `next()` on the reveal
    /// marks one more cell. Without a path this is a no-op.
    fn show_path(&self, target: &C, instant: bool) -> PathReveal<C> {
        let state = self.state();
        let mut reveal = match state.path_to(target) {
            Some(path) => PathReveal::new(path, state.source(), target),
            None => PathReveal::empty(),
        };
        if instant {
            reveal.finish();
        }
        reveal
    }
}
