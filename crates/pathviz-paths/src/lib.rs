//! Steppable shortest-path search over grid graphs.
//!
//! This crate turns a grid of cells into a weighted graph and runs
//! shortest-path searches over it one *settle event* at a time, so that a
//! presentation layer can animate the search between ticks:
//!
//! - **Dijkstra** label-setting search ([`Dijkstra`])
//! - **A\*** with a memoized Euclidean heuristic ([`AStar`])
//! - **Bellman-Ford** pass-based relaxation with negative-cycle detection
//!   ([`BellmanFord`])
//!
//! Every search is an [`Iterator`] of [`Step`]s and implements
//! [`PathFinder`], which adds status, distance and path queries plus
//! [`PathFinder::show_path`]. A [`Pacer`] drives any step iterator with a
//! delay between ticks.
//!
//! # Building blocks
//!
//! | Type | Role |
//! |---|---|
//! | [`Graph`] | adjacency list over non-wall cells, unit edge costs |
//! | [`MinHeap`] | binary min-heap with a caller-supplied key |
//! | [`SearchState`] | distances, parents and settled set of one run |
//! | [`PathReveal`] | marks a path on the board one cell per tick |

mod algorithm;
mod astar;
mod bellman_ford;
mod dijkstra;
mod distance;
mod graph;
mod heap;
mod pacer;
mod reveal;
mod search;
mod traits;

pub use algorithm::Algorithm;
pub use astar::AStar;
pub use bellman_ford::BellmanFord;
pub use dijkstra::Dijkstra;
pub use distance::{euclidean, manhattan};
pub use graph::{Edge, Graph, UNREACHABLE, Vertex};
pub use heap::{EmptyQueue, MinHeap};
pub use pacer::{Paced, Pacer};
pub use reveal::PathReveal;
pub use search::{SearchError, SearchState, SearchStatus, Step};
pub use traits::PathFinder;
