//! Wilson's algorithm over the half-resolution grid.

use pathviz_core::{EditableCell, GraphNode, Position};
use pathviz_paths::Graph;
use rand::Rng;

/// Edge cost marking a carved spanning-tree edge. Uncarved edges keep the
/// cost 1 they were built with.
const CARVED: i32 = 0;

/// A vertex of the coarse maze graph. Coarse cell `(r, c)` stands for the
/// full-grid cell `(2r, 2c)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeNode {
    pub position: Position,
}

impl GraphNode for MazeNode {
    fn position(&self) -> Position {
        self.position
    }

    fn is_wall(&self) -> bool {
        false
    }
}

/// Maze generator, generic over its random source.
pub struct MazeGen<R: Rng> {
    pub rng: R,
}

impl<R: Rng> MazeGen<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Coarse dimensions for a `rows x cols` grid: `ceil((n + 1) / 2)` on
    /// each axis.
    pub fn coarse_size(rows: i32, cols: i32) -> (i32, i32) {
        (rows / 2 + 1, cols / 2 + 1)
    }

    /// Overwrite `grid` with a perfect maze.
    ///
    /// Every cell on an odd row or odd column becomes a wall and every other
    /// cell is cleared, then the wall between each pair of coarse cells
    /// joined by the spanning tree is removed. Source and target cells are
    /// never walled nor cleared.
    ///
    /// Returns the number of passages carved.
    pub fn create_maze<C: EditableCell>(&mut self, grid: &[Vec<C>]) -> usize {
        let rows = grid.len() as i32;
        let cols = grid.first().map_or(0, Vec::len) as i32;
        if rows == 0 || cols == 0 {
            return 0;
        }

        for cell in grid.iter().flatten() {
            let p = cell.position();
            if p.row % 2 != 0 || p.col % 2 != 0 {
                cell.set_wall();
            } else {
                cell.clear_wall();
            }
        }

        let tree = self.spanning_tree(rows, cols);
        let mut carved = 0;
        for (a, b, cost) in tree.undirected_edges() {
            if cost != CARVED {
                continue;
            }
            // Coarse positions are halves of full positions, so the sum is
            // the wall cell between them.
            let mid = tree.node(a).position + tree.node(b).position;
            let Some(cell) = cell_at(grid, mid) else {
                continue;
            };
            if cell.is_source() || cell.is_target() {
                continue;
            }
            cell.clear_wall();
            carved += 1;
        }
        log::debug!("maze: {rows}x{cols}, {carved} passages carved");
        carved
    }

    /// Uniform spanning tree of the coarse grid for a `rows x cols` grid.
    ///
    /// Returns the fully connected coarse graph with the tree's edges set to
    /// cost 0.
    pub fn spanning_tree(&mut self, rows: i32, cols: i32) -> Graph<MazeNode> {
        let (cr, cc) = Self::coarse_size(rows, cols);
        let coarse: Vec<Vec<MazeNode>> = (0..cr)
            .map(|row| {
                (0..cc)
                    .map(|col| MazeNode {
                        position: Position::new(row, col),
                    })
                    .collect()
            })
            .collect();
        let mut graph = Graph::from_grid(&coarse);
        let n = graph.len();
        if n == 0 {
            return graph;
        }

        let mut in_tree = vec![false; n];
        in_tree[0] = true;
        // Index of each vertex in the current walk.
        let mut on_walk: Vec<Option<usize>> = vec![None; n];
        let mut walk: Vec<usize> = Vec::new();

        for start in 1..n {
            if in_tree[start] {
                continue;
            }
            walk.clear();
            walk.push(start);
            on_walk[start] = Some(0);
            let mut cur = start;
            while !in_tree[cur] {
                let edges = graph.edges(cur);
                if edges.is_empty() {
                    break;
                }
                let next = edges[self.rng.random_range(0..edges.len())].to;
                if let Some(k) = on_walk[next] {
                    // Erase the loop just closed.
                    for &v in &walk[k + 1..] {
                        on_walk[v] = None;
                    }
                    log::trace!(
                        "maze: erased loop of {} at {}",
                        walk.len() - k - 1,
                        graph.node(next).id()
                    );
                    walk.truncate(k + 1);
                } else {
                    on_walk[next] = Some(walk.len());
                    walk.push(next);
                }
                cur = next;
            }

            for pair in walk.windows(2) {
                graph.set_cost(pair[0], pair[1], CARVED);
            }
            for &v in &walk {
                in_tree[v] = true;
                on_walk[v] = None;
            }
            log::trace!(
                "maze: spliced walk of {} from {}",
                walk.len(),
                graph.node(start).id()
            );
        }
        graph
    }
}

fn cell_at<C>(grid: &[Vec<C>], p: Position) -> Option<&C> {
    let row = usize::try_from(p.row).ok()?;
    let col = usize::try_from(p.col).ok()?;
    grid.get(row)?.get(col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathviz_core::{Bounds, Grid};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn maze_gen(seed: u64) -> MazeGen<StdRng> {
        MazeGen::new(StdRng::seed_from_u64(seed))
    }

    fn is_open(grid: &Grid, p: Position) -> bool {
        grid.state(p).is_some_and(|s| !s.is_wall())
    }

    /// (open cells, open adjacencies, connected components of open cells)
    fn open_topology(grid: &Grid) -> (usize, usize, usize) {
        let bounds: Bounds = grid.bounds();
        let open: Vec<Position> = bounds.iter().filter(|&p| is_open(grid, p)).collect();
        let mut edges = 0;
        for &p in &open {
            for q in [p.shift(0, 1), p.shift(1, 0)] {
                if is_open(grid, q) {
                    edges += 1;
                }
            }
        }
        let idx = |p: Position| bounds.index(p).unwrap();
        let mut seen = vec![false; bounds.len()];
        let mut components = 0;
        for &p in &open {
            if seen[idx(p)] {
                continue;
            }
            components += 1;
            let mut stack = vec![p];
            seen[idx(p)] = true;
            while let Some(c) = stack.pop() {
                for q in c.neighbors_4() {
                    if is_open(grid, q) && !seen[idx(q)] {
                        seen[idx(q)] = true;
                        stack.push(q);
                    }
                }
            }
        }
        (open.len(), edges, components)
    }

    #[test]
    fn coarse_graph_size() {
        for (rows, cols, expect) in [(5, 5, 9), (4, 6, 12), (1, 1, 1), (10, 3, 12)] {
            let tree = maze_gen(1).spanning_tree(rows, cols);
            assert_eq!(tree.len(), expect, "{rows}x{cols}");
        }
    }

    #[test]
    fn tree_has_one_fewer_carved_edge_than_nodes() {
        for seed in 0..8 {
            let tree = maze_gen(seed).spanning_tree(15, 21);
            let carved = tree
                .undirected_edges()
                .filter(|&(_, _, c)| c == CARVED)
                .count();
            assert_eq!(carved, tree.len() - 1);
        }
    }

    #[test]
    fn odd_grid_is_a_connected_tree() {
        for seed in 0..8 {
            let grid = Grid::new(11, 15);
            let carved = maze_gen(seed).create_maze(&grid.cells());
            let (v, e, components) = open_topology(&grid);
            assert_eq!(components, 1);
            assert_eq!(e, v - 1);
            assert_eq!(carved, 6 * 8 - 1);
        }
    }

    #[test]
    fn even_grid_has_no_cycles() {
        for seed in 0..8 {
            let grid = Grid::new(10, 12);
            maze_gen(seed).create_maze(&grid.cells());
            let (v, e, components) = open_topology(&grid);
            assert_eq!(e, v - components);
        }
    }

    #[test]
    fn odd_cells_are_walls() {
        let grid = Grid::new(9, 9);
        maze_gen(3).create_maze(&grid.cells());
        for p in grid.bounds().iter() {
            let wall = grid.state(p).is_some_and(|s| s.is_wall());
            if p.row % 2 == 1 && p.col % 2 == 1 {
                assert!(wall, "{p}");
            }
            if p.row % 2 == 0 && p.col % 2 == 0 {
                assert!(!wall, "{p}");
            }
        }
    }

    #[test]
    fn endpoints_are_never_walled() {
        for seed in 0..8 {
            let grid = Grid::new(9, 9);
            grid.set_source(Position::new(1, 1)).unwrap();
            grid.set_target(Position::new(3, 4)).unwrap();
            maze_gen(seed).create_maze(&grid.cells());
            let s = grid.state(Position::new(1, 1)).unwrap();
            let t = grid.state(Position::new(3, 4)).unwrap();
            assert!(s.is_source() && !s.is_wall());
            assert!(t.is_target() && !t.is_wall());
        }
    }

    #[test]
    fn endpoints_on_passage_cells_keep_the_maze_acyclic() {
        for seed in 0..50 {
            let grid = Grid::new(10, 12);
            grid.set_source(Position::new(0, 0)).unwrap();
            grid.set_target(Position::new(8, 10)).unwrap();
            maze_gen(seed).create_maze(&grid.cells());
            let (v, e, components) = open_topology(&grid);
            assert_eq!(e, v - components, "seed {seed}");
            assert!(grid.state(Position::new(8, 10)).unwrap().is_target());
        }
    }

    #[test]
    fn overwrites_previous_walls() {
        let grid = Grid::new(7, 7);
        for p in grid.bounds().iter() {
            grid.set_wall(p);
        }
        maze_gen(9).create_maze(&grid.cells());
        let (_, _, components) = open_topology(&grid);
        assert_eq!(components, 1);
    }

    #[test]
    fn same_seed_same_maze() {
        let a = Grid::new(9, 13);
        let b = Grid::new(9, 13);
        maze_gen(42).create_maze(&a.cells());
        maze_gen(42).create_maze(&b.cells());
        assert_eq!(a.render(), b.render());
    }

    #[test]
    fn empty_grid_is_a_no_op() {
        let grid: Vec<Vec<pathviz_core::CellRef>> = Vec::new();
        assert_eq!(maze_gen(0).create_maze(&grid), 0);
    }
}
