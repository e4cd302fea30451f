//! Adjacency-list graph built from a grid of cells.

use std::collections::HashMap;

use pathviz_core::{CellId, GraphNode};

/// Sentinel cost meaning "no edge" / "not reached". Larger than any real
/// path cost.
pub const UNREACHABLE: i32 = i32::MAX;

/// A directed half of an undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Index of the neighbour vertex.
    pub to: usize,
    pub cost: i32,
}

/// A graph vertex: the node it was built from plus its outgoing edges.
#[derive(Debug, Clone)]
pub struct Vertex<N> {
    pub node: N,
    pub edges: Vec<Edge>,
}

/// Undirected weighted graph over cells, indexed both by dense vertex index
/// and by [`CellId`].
///
/// Edges are always stored in both directions with the same cost, and
/// self-loops are never created.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    vertices: Vec<Vertex<N>>,
    index: HashMap<CellId, usize>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<N: GraphNode + Clone> Graph<N> {
    /// Build the graph of a rectangular grid snapshot.
    ///
    /// Every non-wall cell becomes a vertex; orthogonally adjacent non-wall
    /// cells are joined by an edge of cost 1. Runs in `O(rows * cols)`.
    pub fn from_grid(grid: &[Vec<N>]) -> Self {
        let mut g = Self::default();
        // Dense vertex index of each grid slot, `None` for walls.
        let mut slots: Vec<Vec<Option<usize>>> = Vec::with_capacity(grid.len());
        for row in grid {
            let ids = row
                .iter()
                .map(|cell| (!cell.is_wall()).then(|| g.add_node(cell.clone())))
                .collect();
            slots.push(ids);
        }

        for (i, row) in slots.iter().enumerate() {
            for (j, slot) in row.iter().enumerate() {
                let Some(a) = *slot else {
                    continue;
                };
                if let Some(Some(b)) = row.get(j + 1) {
                    g.add_edge(a, *b, 1);
                }
                if let Some(Some(b)) = slots.get(i + 1).and_then(|r| r.get(j)) {
                    g.add_edge(a, *b, 1);
                }
            }
        }

        log::debug!(
            "graph: built {} vertices and {} edges from {} rows",
            g.len(),
            g.edge_count(),
            grid.len()
        );
        g
    }
}

impl<N: GraphNode> Graph<N> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex, returning its index. Adding a node whose id is already
    /// present returns the existing index.
    pub fn add_node(&mut self, node: N) -> usize {
        let id = node.id();
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.vertices.len();
        self.vertices.push(Vertex {
            node,
            edges: Vec::new(),
        });
        self.index.insert(id, i);
        i
    }

    /// Join `a` and `b` in both directions. Self-loops are ignored; an
    /// existing edge has its cost replaced.
    pub fn add_edge(&mut self, a: usize, b: usize, cost: i32) {
        if a == b || a >= self.vertices.len() || b >= self.vertices.len() {
            return;
        }
        if self.set_cost(a, b, cost) {
            return;
        }
        self.vertices[a].edges.push(Edge { to: b, cost });
        self.vertices[b].edges.push(Edge { to: a, cost });
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.vertices.iter().map(|v| v.edges.len()).sum::<usize>() / 2
    }

    /// Dense index of the vertex with the given id.
    #[inline]
    pub fn index_of(&self, id: &CellId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Whether a vertex with the given id exists.
    #[inline]
    pub fn contains(&self, id: &CellId) -> bool {
        self.index.contains_key(id)
    }

    /// The node stored at vertex `i`.
    #[inline]
    pub fn node(&self, i: usize) -> &N {
        &self.vertices[i].node
    }

    /// Outgoing edges of vertex `i`.
    #[inline]
    pub fn edges(&self, i: usize) -> &[Edge] {
        &self.vertices[i].edges
    }

    /// All vertices in index order.
    pub fn vertices(&self) -> &[Vertex<N>] {
        &self.vertices
    }

    /// Every undirected edge once, as `(a, b, cost)` with `a < b`.
    pub fn undirected_edges(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        self.vertices.iter().enumerate().flat_map(|(a, v)| {
            v.edges
                .iter()
                .filter(move |e| a < e.to)
                .map(move |e| (a, e.to, e.cost))
        })
    }

    /// Cost between two vertex indices: 0 for the same vertex, the edge
    /// weight when adjacent, [`UNREACHABLE`] otherwise.
    pub fn cost_between(&self, a: usize, b: usize) -> i32 {
        if a == b {
            return 0;
        }
        self.vertices
            .get(a)
            .and_then(|v| v.edges.iter().find(|e| e.to == b))
            .map_or(UNREACHABLE, |e| e.cost)
    }

    /// Cost between two cells by id. See [`cost_between`](Self::cost_between).
    pub fn cost(&self, a: &CellId, b: &CellId) -> i32 {
        if a == b {
            return 0;
        }
        match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) => self.cost_between(ia, ib),
            _ => UNREACHABLE,
        }
    }

    /// Overwrite the cost of an existing edge in both directions. Returns
    /// `false` when `a` and `b` are not adjacent.
    pub fn set_cost(&mut self, a: usize, b: usize, cost: i32) -> bool {
        let mut found = false;
        if let Some(e) = self
            .vertices
            .get_mut(a)
            .and_then(|v| v.edges.iter_mut().find(|e| e.to == b))
        {
            e.cost = cost;
            found = true;
        }
        if let Some(e) = self
            .vertices
            .get_mut(b)
            .and_then(|v| v.edges.iter_mut().find(|e| e.to == a))
        {
            e.cost = cost;
        }
        found
    }
}
