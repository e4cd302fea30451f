use std::iter::FusedIterator;

use pathviz_core::GridCell;

use crate::algorithm::Algorithm;
use crate::graph::UNREACHABLE;
use crate::search::{SearchError, SearchState, SearchStatus, Step, find_endpoints};
use crate::traits::PathFinder;

/// Edge-relaxation search: `|V| - 1` passes over every edge, then one more
/// pass to detect negative cycles.
///
/// The first tick announces the source. Each later tick runs one full pass
/// and, for animation, announces the closest reached cell that has not been
/// announced yet. Passes do not stop early on convergence.
pub struct BellmanFord<C> {
    state: SearchState<C>,
    pass: usize,
    passes: usize,
    started: bool,
}

impl<C: GridCell + Clone> BellmanFord<C> {
    /// Prepare a search from `source` to `target` over a grid snapshot.
    pub fn new(source: C, target: C, grid: &[Vec<C>]) -> Self {
        let state = SearchState::new("bellman-ford", source, target, grid);
        let passes = state.graph.len().saturating_sub(1);
        Self {
            state,
            pass: 0,
            passes,
            started: false,
        }
    }

    /// Prepare a search between the cells flagged as source and target.
    pub fn from_grid(grid: &[Vec<C>]) -> Result<Self, SearchError> {
        let (source, target) = find_endpoints(grid)?;
        Ok(Self::new(source, target, grid))
    }

    /// Number of relaxation passes completed so far.
    pub fn passes_done(&self) -> usize {
        self.pass
    }

    /// Relax every edge once. Returns whether any distance improved.
    fn relax_all(&mut self) -> bool {
        let st = &mut self.state;
        let mut changed = false;
        for u in 0..st.graph.len() {
            let base = st.dist[u];
            if base == UNREACHABLE {
                continue;
            }
            for e in st.graph.edges(u) {
                let candidate = base.saturating_add(e.cost);
                if candidate < st.dist[e.to] {
                    st.dist[e.to] = candidate;
                    st.parent[e.to] = u;
                    changed = true;
                }
            }
        }
        changed
    }

    /// The reached, not yet announced vertex with the smallest distance.
    fn closest_unannounced(&self) -> Option<usize> {
        let st = &self.state;
        (0..st.graph.len())
            .filter(|&i| !st.settled[i] && st.dist[i] != UNREACHABLE)
            .min_by_key(|&i| (st.dist[i], i))
    }

    fn conclude(&mut self) {
        let status = if self.relax_all() {
            SearchStatus::NegativeCycle
        } else {
            self.state.outcome()
        };
        self.state.finish(status);
    }
}

impl<C: GridCell + Clone> Iterator for BellmanFord<C> {
    type Item = Step<C>;

    fn next(&mut self) -> Option<Step<C>> {
        if self.state.status.is_finished() {
            return None;
        }

        if !self.started {
            self.started = true;
            let Some(si) = self.state.source_idx else {
                self.state.finish(SearchStatus::Unreachable);
                return None;
            };
            let step = self.state.settle(si);
            if self.state.target_idx == Some(si) {
                self.state.finish(SearchStatus::Found { distance: 0 });
            } else if self.passes == 0 {
                self.conclude();
            }
            return Some(step);
        }

        self.relax_all();
        self.pass += 1;
        log::trace!("bellman-ford: pass {}/{}", self.pass, self.passes);
        let step = match self.closest_unannounced() {
            Some(i) => self.state.settle(i),
            None => Step::Pass { pass: self.pass },
        };
        if self.pass >= self.passes {
            self.conclude();
        }
        Some(step)
    }
}

impl<C: GridCell + Clone> FusedIterator for BellmanFord<C> {}

impl<C: GridCell + Clone> PathFinder<C> for BellmanFord<C> {
    fn algorithm(&self) -> Algorithm {
        Algorithm::BellmanFord
    }

    fn state(&self) -> &SearchState<C> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dijkstra::Dijkstra;
    use pathviz_core::{CellRef, GraphNode, Grid, Position};

    #[test]
    fn open_grid_matches_dijkstra() {
        let grid = Grid::new(5, 5);
        grid.set_source(Position::new(0, 0)).unwrap();
        grid.set_target(Position::new(4, 4)).unwrap();
        let mut bf = BellmanFord::from_grid(&grid.cells()).unwrap();
        assert_eq!(bf.execute(), SearchStatus::Found { distance: 8 });
        let target = grid.cell(Position::new(4, 4)).unwrap();
        let path = bf.path_to(&target).unwrap();
        assert_eq!(path.len(), 9);
        for w in path.windows(2) {
            assert!(w[0].position().is_adjacent(w[1].position()));
        }
    }

    #[test]
    fn runs_exactly_v_minus_one_passes() {
        let grid = Grid::parse("S..\n...\n..T").unwrap();
        let mut bf: BellmanFord<CellRef> = BellmanFord::from_grid(&grid.cells()).unwrap();
        let ticks = bf.by_ref().count();
        // One tick for the source, then one per pass.
        assert_eq!(bf.passes_done(), 8);
        assert_eq!(ticks, 9);
        assert_eq!(bf.status(), SearchStatus::Found { distance: 4 });
        // Every reached cell was announced and explored.
        assert_eq!(grid.count(|c| c.is_explored()), 9);
    }

    #[test]
    fn idle_passes_are_reported() {
        // Two reachable cells out of five vertices: the last passes announce
        // nothing.
        let grid = Grid::parse("S.#.\n##.T").unwrap();
        let bf: BellmanFord<CellRef> = BellmanFord::from_grid(&grid.cells()).unwrap();
        let steps: Vec<_> = bf.collect();
        assert_eq!(steps.len(), 5);
        assert!(matches!(steps[0], Step::Settled { distance: 0, .. }));
        assert!(matches!(steps[1], Step::Settled { distance: 1, .. }));
        assert!(matches!(steps[2], Step::Pass { pass: 2 }));
        assert!(matches!(steps[4], Step::Pass { pass: 4 }));
    }

    #[test]
    fn unreachable_target() {
        let grid = Grid::parse("S.#.\n##.T").unwrap();
        let mut bf = BellmanFord::from_grid(&grid.cells()).unwrap();
        assert_eq!(bf.execute(), SearchStatus::Unreachable);
        let target = grid.cell(Position::new(1, 3)).unwrap();
        assert!(bf.path_to(&target).is_none());
        bf.show_path(&target, true);
        assert_eq!(grid.count(|c| c.is_on_path()), 0);
    }

    #[test]
    fn walled_target_is_unreachable() {
        let grid = Grid::new(3, 3);
        grid.set_source(Position::new(0, 0)).unwrap();
        grid.set_wall(Position::new(2, 2));
        let source = grid.cell(Position::new(0, 0)).unwrap();
        let target = grid.cell(Position::new(2, 2)).unwrap();
        let mut bf = BellmanFord::new(source, target.clone(), &grid.cells());
        assert_eq!(bf.execute(), SearchStatus::Unreachable);
        assert_eq!(bf.distance_to(&target), None);
        assert_eq!(bf.passes_done(), 7);
    }

    #[test]
    fn source_equals_target_needs_no_passes() {
        let grid = Grid::new(4, 4);
        let c = grid.cell(Position::new(2, 1)).unwrap();
        let mut bf = BellmanFord::new(c.clone(), c.clone(), &grid.cells());
        assert_eq!(bf.execute(), SearchStatus::Found { distance: 0 });
        assert_eq!(bf.passes_done(), 0);
    }

    #[test]
    fn isolated_source() {
        let grid = Grid::parse("S#T").unwrap();
        let mut bf = BellmanFord::from_grid(&grid.cells()).unwrap();
        // The target is cut off; only the source is a reachable vertex.
        assert_eq!(bf.execute(), SearchStatus::Unreachable);
    }

    #[test]
    fn detects_negative_cycle() {
        let grid = Grid::parse("S..T").unwrap();
        let mut bf: BellmanFord<CellRef> = BellmanFord::from_grid(&grid.cells()).unwrap();
        bf.state.graph.set_cost(1, 2, -5);
        assert_eq!(bf.execute(), SearchStatus::NegativeCycle);
        let target = grid.cell(Position::new(0, 3)).unwrap();
        assert!(bf.path_to(&target).is_none());
    }

    #[test]
    fn agrees_with_dijkstra_on_walls() {
        let text = "
            S..#....
            .#.#.##.
            .#...#..
            .####.#.
            ......#T
            ";
        let a = Grid::parse(text).unwrap();
        let b = Grid::parse(text).unwrap();
        let bf = BellmanFord::from_grid(&a.cells()).unwrap().execute();
        let d = Dijkstra::from_grid(&b.cells()).unwrap().execute();
        assert_eq!(bf, d);
    }
}
