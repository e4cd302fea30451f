//! Maze generation for pathviz grids.
//!
//! [`MazeGen`] turns any grid of [`EditableCell`](pathviz_core::EditableCell)
//! values into a perfect maze: walls on every odd row and column, then
//! passages carved along a uniform spanning tree of the half-resolution grid,
//! built with Wilson's loop-erased random walks.

pub mod wilson;

pub use wilson::{MazeGen, MazeNode};
