use std::fmt;
use std::str::FromStr;

use pathviz_core::GridCell;

use crate::astar::AStar;
use crate::bellman_ford::BellmanFord;
use crate::dijkstra::Dijkstra;
use crate::search::{SearchError, find_endpoints};
use crate::traits::PathFinder;

/// The implemented search algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    #[default]
    Dijkstra,
    AStar,
    BellmanFord,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Self::Dijkstra, Self::AStar, Self::BellmanFord];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dijkstra => "Dijkstra",
            Self::AStar => "A*",
            Self::BellmanFord => "Bellman-Ford",
        }
    }

    /// One-paragraph description of how the algorithm works.
    pub fn explanation(self) -> &'static str {
        match self {
            Self::Dijkstra => {
                "Dijkstra's algorithm starts with the source at distance zero and every other \
                 cell at infinity. It repeatedly settles the unvisited cell with the smallest \
                 known distance and updates the distances of its neighbours, until the target \
                 is settled or every reachable cell has been visited."
            }
            Self::AStar => {
                "A* ranks cells by f(n) = g(n) + h(n), where g(n) is the cost of reaching n from \
                 the source and h(n) estimates the remaining distance to the target. Expanding \
                 the lowest f(n) first steers the search toward the target while still \
                 returning a shortest path."
            }
            Self::BellmanFord => {
                "Bellman-Ford relaxes every edge of the graph once per pass, |V| - 1 times. \
                 After pass k every cell whose shortest path uses at most k edges has its final \
                 distance. A further pass that still improves a distance reveals a negative \
                 cycle."
            }
        }
    }

    /// Build a search of this kind from `source` to `target`.
    pub fn build<C>(self, source: C, target: C, grid: &[Vec<C>]) -> Box<dyn PathFinder<C>>
    where
        C: GridCell + Clone + 'static,
    {
        match self {
            Self::Dijkstra => Box::new(Dijkstra::new(source, target, grid)),
            Self::AStar => Box::new(AStar::new(source, target, grid)),
            Self::BellmanFord => Box::new(BellmanFord::new(source, target, grid)),
        }
    }

    /// Build a search between the cells flagged as source and target.
    pub fn build_from_grid<C>(self, grid: &[Vec<C>]) -> Result<Box<dyn PathFinder<C>>, SearchError>
    where
        C: GridCell + Clone + 'static,
    {
        let (source, target) = find_endpoints(grid)?;
        Ok(self.build(source, target, grid))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "dijkstra" => Ok(Self::Dijkstra),
            "astar" | "a*" => Ok(Self::AStar),
            "bellmanford" | "bf" => Ok(Self::BellmanFord),
            _ => Err(SearchError::UnknownAlgorithm(s.to_string())),
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::search::SearchStatus;

    #[test]
    fn algorithm_and_status_round_trip() {
        let json = serde_json::to_string(&Algorithm::BellmanFord).unwrap();
        assert_eq!(serde_json::from_str::<Algorithm>(&json).unwrap(), Algorithm::BellmanFord);

        let status = SearchStatus::Found { distance: 12 };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(serde_json::from_str::<SearchStatus>(&json).unwrap(), status);
    }
}
