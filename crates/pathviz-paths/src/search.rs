//! State shared by every search: the graph, tentative distances, parents and
//! the settled set, plus predecessor-based path reconstruction.

use std::fmt;

use pathviz_core::{CellId, GridCell};

use crate::graph::{Graph, UNREACHABLE};

/// Parent value of a vertex with no predecessor.
pub(crate) const NO_PARENT: usize = usize::MAX;

/// A frontier entry: vertex index plus its priority.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frontier<K> {
    pub(crate) idx: usize,
    pub(crate) key: K,
}

pub(crate) fn frontier_key<K: Copy>(f: &Frontier<K>) -> K {
    f.key
}

/// Where a search currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    /// More steps remain.
    Searching,
    /// The target was reached at the given distance.
    Found { distance: i32 },
    /// The frontier ran out (or the passes finished) without reaching the
    /// target. Not an error.
    Unreachable,
    /// A negative-cost cycle is reachable from the source, so no shortest
    /// path exists. Only Bellman-Ford reports this.
    NegativeCycle,
}

impl SearchStatus {
    /// Whether no further steps will be produced.
    #[inline]
    pub fn is_finished(self) -> bool {
        self != Self::Searching
    }
}

/// One tick of a search, the unit of animation.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<C> {
    /// A cell was settled (its distance finalized) and marked explored.
    Settled { cell: C, distance: i32 },
    /// A Bellman-Ford relaxation pass that settled no new cell.
    Pass { pass: usize },
}

/// Configuration errors raised when constructing a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// No cell of the grid is flagged as the source.
    SourceNotDefined,
    /// No cell of the grid is flagged as the target.
    TargetNotDefined,
    /// An algorithm name that does not match any implemented search.
    UnknownAlgorithm(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotDefined => f.write_str("search: source is not defined"),
            Self::TargetNotDefined => f.write_str("search: target is not defined"),
            Self::UnknownAlgorithm(name) => write!(f, "search: unknown algorithm \u{201c}{name}\u{201d}"),
        }
    }
}

impl std::error::Error for SearchError {}

/// Find the source and target cells of a grid by their flags.
pub(crate) fn find_endpoints<C: GridCell + Clone>(grid: &[Vec<C>]) -> Result<(C, C), SearchError> {
    let source = grid
        .iter()
        .flatten()
        .find(|c| c.is_source())
        .cloned()
        .ok_or(SearchError::SourceNotDefined)?;
    let target = grid
        .iter()
        .flatten()
        .find(|c| c.is_target())
        .cloned()
        .ok_or(SearchError::TargetNotDefined)?;
    Ok((source, target))
}

/// Everything a single search run owns.
///
/// Built fresh from a grid snapshot for each run; nothing is shared between
/// runs.
pub struct SearchState<C> {
    pub(crate) graph: Graph<C>,
    pub(crate) source: C,
    pub(crate) target: C,
    pub(crate) source_idx: Option<usize>,
    pub(crate) target_idx: Option<usize>,
    pub(crate) dist: Vec<i32>,
    pub(crate) parent: Vec<usize>,
    pub(crate) settled: Vec<bool>,
    pub(crate) status: SearchStatus,
    pub(crate) name: &'static str,
}

impl<C: GridCell + Clone> SearchState<C> {
    pub(crate) fn new(name: &'static str, source: C, target: C, grid: &[Vec<C>]) -> Self {
        let graph = Graph::from_grid(grid);
        let n = graph.len();
        let source_idx = graph.index_of(&source.id());
        let target_idx = graph.index_of(&target.id());
        let mut dist = vec![UNREACHABLE; n];
        if let Some(si) = source_idx {
            dist[si] = 0;
        }
        log::debug!(
            "{name}: {} vertices, source {}, target {}",
            n,
            source.id(),
            target.id()
        );
        Self {
            graph,
            source,
            target,
            source_idx,
            target_idx,
            dist,
            parent: vec![NO_PARENT; n],
            settled: vec![false; n],
            status: SearchStatus::Searching,
            name,
        }
    }

    /// Finalize vertex `i`, firing the explored hook on its cell.
    pub(crate) fn settle(&mut self, i: usize) -> Step<C> {
        self.settled[i] = true;
        let cell = self.graph.node(i).clone();
        cell.mark_explored();
        log::trace!("{}: settled {} at {}", self.name, cell.id(), self.dist[i]);
        Step::Settled {
            cell,
            distance: self.dist[i],
        }
    }

    /// Relax every edge out of settled vertex `i`, pushing the indices whose
    /// distance strictly improved into `improved`.
    pub(crate) fn relax(&mut self, i: usize, improved: &mut Vec<usize>) {
        improved.clear();
        let base = self.dist[i];
        if base == UNREACHABLE {
            return;
        }
        for e in self.graph.edges(i) {
            if self.settled[e.to] {
                continue;
            }
            let candidate = base.saturating_add(e.cost);
            if candidate < self.dist[e.to] {
                self.dist[e.to] = candidate;
                self.parent[e.to] = i;
                improved.push(e.to);
            }
        }
    }

    pub(crate) fn finish(&mut self, status: SearchStatus) {
        self.status = status;
        log::debug!("{}: finished with {:?}", self.name, status);
    }

    /// Terminal status for a search whose frontier is exhausted or whose
    /// passes are done.
    pub(crate) fn outcome(&self) -> SearchStatus {
        match self.target_idx {
            Some(t) if self.dist[t] != UNREACHABLE => SearchStatus::Found {
                distance: self.dist[t],
            },
            _ => SearchStatus::Unreachable,
        }
    }

    /// Vertex indices from the source to `to`, following parents.
    pub(crate) fn path_indices(&self, to: usize) -> Option<Vec<usize>> {
        if self.dist[to] == UNREACHABLE {
            return None;
        }
        let mut path = vec![to];
        let mut cur = to;
        while self.parent[cur] != NO_PARENT {
            cur = self.parent[cur];
            path.push(cur);
            // A parent cycle only exists under a negative cycle.
            if path.len() > self.graph.len() {
                return None;
            }
        }
        if Some(cur) != self.source_idx {
            return None;
        }
        path.reverse();
        Some(path)
    }

    /// The graph this search runs on.
    pub fn graph(&self) -> &Graph<C> {
        &self.graph
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    pub fn target(&self) -> &C {
        &self.target
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Whether the cell's distance has been finalized.
    pub fn is_settled(&self, id: &CellId) -> bool {
        self.graph.index_of(id).is_some_and(|i| self.settled[i])
    }

    /// Best known distance from the source to `cell`, or `None` when the cell
    /// has not been reached (walls are never reached).
    pub fn distance_to(&self, cell: &C) -> Option<i32> {
        let i = self.graph.index_of(&cell.id())?;
        (self.dist[i] != UNREACHABLE).then_some(self.dist[i])
    }

    /// Best known path from the source to `cell`, both endpoints included.
    ///
    /// Reconstructed from the parent links on every call. `None` when the
    /// cell has not been reached or a negative cycle was detected.
    pub fn path_to(&self, cell: &C) -> Option<Vec<C>> {
        if self.status == SearchStatus::NegativeCycle {
            return None;
        }
        let i = self.graph.index_of(&cell.id())?;
        let path = self.path_indices(i)?;
        Some(path.into_iter().map(|j| self.graph.node(j).clone()).collect())
    }
}
