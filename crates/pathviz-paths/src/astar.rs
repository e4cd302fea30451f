use std::iter::FusedIterator;

use pathviz_core::{GridCell, Position};

use crate::algorithm::Algorithm;
use crate::distance::euclidean;
use crate::heap::MinHeap;
use crate::search::{Frontier, SearchError, SearchState, Step, find_endpoints, frontier_key};
use crate::traits::PathFinder;

/// Best-first search ordered by `g(n) + h(n)`, where `h` is the Euclidean
/// distance to the target.
///
/// Euclidean distance never overestimates on a grid with unit moves and is
/// consistent, so the first time the target is popped its distance is final.
pub struct AStar<C> {
    state: SearchState<C>,
    open: MinHeap<Frontier<f64>, f64>,
    goal: Position,
    // Memoized heuristic, computed on first use.
    h: Vec<Option<f64>>,
    improved: Vec<usize>,
}

impl<C: GridCell + Clone> AStar<C> {
    /// Prepare a search from `source` to `target` over a grid snapshot.
    pub fn new(source: C, target: C, grid: &[Vec<C>]) -> Self {
        let goal = target.position();
        let state = SearchState::new("astar", source, target, grid);
        let n = state.graph.len();
        let mut search = Self {
            state,
            open: MinHeap::new(frontier_key as fn(&Frontier<f64>) -> f64),
            goal,
            h: vec![None; n],
            improved: Vec::with_capacity(4),
        };
        if let Some(si) = search.state.source_idx {
            let key = search.heuristic(si);
            search.open.push(Frontier { idx: si, key });
        }
        search
    }

    /// Prepare a search between the cells flagged as source and target.
    pub fn from_grid(grid: &[Vec<C>]) -> Result<Self, SearchError> {
        let (source, target) = find_endpoints(grid)?;
        Ok(Self::new(source, target, grid))
    }

    /// `h(i)`: straight-line distance from vertex `i` to the target.
    fn heuristic(&mut self, i: usize) -> f64 {
        if let Some(h) = self.h[i] {
            return h;
        }
        let h = euclidean(self.state.graph.node(i).position(), self.goal);
        self.h[i] = Some(h);
        h
    }
}

impl<C: GridCell + Clone> Iterator for AStar<C> {
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
            let improved = std::mem::take(&mut self.improved);
            for &ni in &improved {
                let key = f64::from(self.state.dist[ni]) + self.heuristic(ni);
                self.open.push(Frontier { idx: ni, key });
            }
            self.improved = improved;
            return Some(step);
        }
    }
}

impl<C: GridCell + Clone> FusedIterator for AStar<C> {}

impl<C: GridCell + Clone> PathFinder<C> for AStar<C> {
    fn algorithm(&self) -> Algorithm {
        Algorithm::AStar
    }

    fn state(&self) -> &SearchState<C> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dijkstra::Dijkstra;
    use crate::search::SearchStatus;
    use pathviz_core::{CellRef, Grid};

    fn run_both(text: &str) -> (SearchStatus, SearchStatus) {
        let a = Grid::parse(text).unwrap();
        let b = Grid::parse(text).unwrap();
        let astar = AStar::from_grid(&a.cells()).unwrap().execute();
        let dijkstra = Dijkstra::from_grid(&b.cells()).unwrap().execute();
        (astar, dijkstra)
    }

    #[test]
    fn open_grid_distance() {
        let grid = Grid::new(5, 5);
        grid.set_source(Position::new(0, 0)).unwrap();
        grid.set_target(Position::new(4, 4)).unwrap();
        let mut a = AStar::from_grid(&grid.cells()).unwrap();
        assert_eq!(a.execute(), SearchStatus::Found { distance: 8 });
        let target = grid.cell(Position::new(4, 4)).unwrap();
        assert_eq!(a.path_to(&target).unwrap().len(), 9);
    }

    #[test]
    fn agrees_with_dijkstra() {
        let boards = [
            "
            S.....#...
            .####.#.#.
            .#....#.#.
            .#.####.#.
            .#......#T
            ",
            "
            S#....
            .#.##.
            .#..#.
            ...#T.
            ",
            "
            ...#..
            .S.#..
            ...#T.
            ",
        ];
        for board in boards {
            let (a, d) = run_both(board);
            assert_eq!(a, d, "board:\n{board}");
        }
    }

    #[test]
    fn explores_no_more_than_dijkstra_on_open_grid() {
        let text = "
            S.........
            ..........
            ..........
            .........T
            ";
        let a = Grid::parse(text).unwrap();
        let d = Grid::parse(text).unwrap();
        AStar::from_grid(&a.cells()).unwrap().execute();
        Dijkstra::from_grid(&d.cells()).unwrap().execute();
        let explored = |g: &Grid| g.count(|c| c.is_explored());
        assert!(explored(&a) <= explored(&d));
    }

    #[test]
    fn heuristic_is_memoized() {
        let grid = Grid::parse("S..T").unwrap();
        let mut a: AStar<CellRef> = AStar::from_grid(&grid.cells()).unwrap();
        assert_eq!(a.h.iter().filter(|h| h.is_some()).count(), 1);
        a.execute();
        let computed = a.h.iter().filter(|h| h.is_some()).count();
        assert_eq!(a.heuristic(0), 3.0);
        assert_eq!(a.h.iter().filter(|h| h.is_some()).count(), computed);
    }

    #[test]
    fn unreachable_target() {
        let (a, d) = run_both(
            "
            S.#..
            ..#.T
            ..#..
            ",
        );
        assert_eq!(a, SearchStatus::Unreachable);
        assert_eq!(d, SearchStatus::Unreachable);

        let grid = Grid::parse(
            "
            S.#..
            ..#.T
            ..#..
            ",
        )
        .unwrap();
        let mut a = AStar::from_grid(&grid.cells()).unwrap();
        a.execute();
        let target = grid.cell(Position::new(1, 4)).unwrap();
        assert!(a.path_to(&target).is_none());
        a.show_path(&target, true);
        assert_eq!(grid.count(|c| c.is_on_path()), 0);
    }

    #[test]
    fn walled_target_is_unreachable() {
        let grid = Grid::new(3, 3);
        grid.set_source(Position::new(0, 0)).unwrap();
        grid.set_wall(Position::new(2, 2));
        let source = grid.cell(Position::new(0, 0)).unwrap();
        let target = grid.cell(Position::new(2, 2)).unwrap();
        let mut a = AStar::new(source, target.clone(), &grid.cells());
        assert_eq!(a.execute(), SearchStatus::Unreachable);
        assert_eq!(a.distance_to(&target), None);
        // Every open cell was tried before giving up.
        assert_eq!(grid.count(|c| c.is_explored()), 8);
    }
}
