//! Grid cell model for the pathviz search visualizer.
//!
//! This crate provides the foundational types shared by the search engine and
//! the maze generator: grid positions, cell identity, the capability traits
//! the engine consumes ([`GraphNode`], [`GridCell`], [`EditableCell`]), and a
//! concrete shared-buffer [`Grid`] whose [`CellRef`] handles implement them.

pub mod cell;
pub mod geom;
pub mod grid;

pub use cell::{CellId, CellState, EditableCell, GraphNode, GridCell};
pub use geom::{Bounds, Position};
pub use grid::{CellRef, Grid, GridError};
