//! Cell identity, the capability traits the search engine consumes, and the
//! [`CellState`] flags stored by the concrete [`Grid`](crate::Grid).

use std::fmt;

use crate::geom::Position;

/// Unique identifier of a cell, derived from its grid position.
///
/// Renders as `(row,col)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub Position);

impl CellId {
    /// The position this id was derived from.
    #[inline]
    pub const fn position(self) -> Position {
        self.0
    }
}

impl From<Position> for CellId {
    fn from(p: Position) -> Self {
        Self(p)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.0.row, self.0.col)
    }
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Anything that can become a vertex of a search graph.
pub trait GraphNode {
    /// Grid position. Immutable for the lifetime of the cell.
    fn position(&self) -> Position;

    /// Whether the cell blocks movement. Walls never become graph vertices.
    fn is_wall(&self) -> bool;

    /// Unique id, derived from the position by default.
    fn id(&self) -> CellId {
        CellId(self.position())
    }
}

/// A board cell as seen by the search engine.
///
/// The mutation hooks take `&self`: implementors are handles into state owned
/// by the presentation layer.
pub trait GridCell: GraphNode {
    fn is_source(&self) -> bool;
    fn is_target(&self) -> bool;

    /// Mark the cell as explored. Idempotent; ignored on walls.
    fn mark_explored(&self);

    /// Mark the cell as part of the shortest path. Ignored unless the cell
    /// was explored and is neither the source nor the target.
    fn mark_on_path(&self);
}

/// A board cell whose wall flag can be rewritten (maze generation).
pub trait EditableCell: GridCell {
    /// Turn the cell into a wall. Ignored on source and target cells.
    fn set_wall(&self);

    /// Remove the wall flag, leaving the cell blank. Ignored on source and
    /// target cells.
    fn clear_wall(&self);
}

// ---------------------------------------------------------------------------
// CellState
// ---------------------------------------------------------------------------

/// The subset of a cell's state that is restored when the source or target
/// moves off it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Snapshot {
    wall: bool,
    explored: bool,
    on_path: bool,
}

/// Flags of a single board cell.
///
/// A cell is at most one of wall/source/target. `on_path` implies `explored`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellState {
    wall: bool,
    source: bool,
    target: bool,
    explored: bool,
    on_path: bool,
    prev: Option<Snapshot>,
}

impl CellState {
    #[inline]
    pub fn is_wall(&self) -> bool {
        self.wall
    }

    #[inline]
    pub fn is_source(&self) -> bool {
        self.source
    }

    #[inline]
    pub fn is_target(&self) -> bool {
        self.target
    }

    #[inline]
    pub fn is_explored(&self) -> bool {
        self.explored
    }

    #[inline]
    pub fn is_on_path(&self) -> bool {
        self.on_path
    }

    /// Whether the cell is neither a wall nor an endpoint and carries no
    /// search marks.
    pub fn is_blank(&self) -> bool {
        !(self.wall || self.source || self.target || self.explored || self.on_path)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            wall: self.wall,
            explored: self.explored,
            on_path: self.on_path,
        }
    }

    /// Clear every flag.
    pub fn set_blank(&mut self) {
        *self = Self::default();
    }

    /// Turn into a wall. Endpoints are left untouched.
    pub fn set_wall(&mut self) {
        if self.source || self.target {
            return;
        }
        *self = Self {
            wall: true,
            ..Self::default()
        };
    }

    /// Drop the wall flag. Endpoints are left untouched.
    pub fn clear_wall(&mut self) {
        if self.source || self.target {
            return;
        }
        self.wall = false;
    }

    /// Wall to blank, anything else to wall. Endpoints are left untouched.
    pub fn toggle_wall(&mut self) {
        if self.wall {
            self.set_blank();
        } else {
            self.set_wall();
        }
    }

    /// Become the source, remembering the state to restore later.
    pub fn set_source(&mut self) {
        let prev = self.prev.or(Some(self.snapshot()));
        *self = Self {
            source: true,
            prev,
            ..Self::default()
        };
    }

    /// Become the target, remembering the state to restore later.
    pub fn set_target(&mut self) {
        let prev = self.prev.or(Some(self.snapshot()));
        *self = Self {
            target: true,
            prev,
            ..Self::default()
        };
    }

    /// Return to the state held before the cell became source or target.
    pub fn restore_previous(&mut self) {
        let prev = self.prev.take().unwrap_or_default();
        *self = Self {
            wall: prev.wall,
            explored: prev.explored && !prev.wall,
            on_path: prev.on_path && !prev.wall,
            ..Self::default()
        };
    }

    /// Mark as explored. Walls are ignored; endpoints only record the flag.
    pub fn mark_explored(&mut self) {
        if self.wall {
            return;
        }
        self.explored = true;
        if !(self.source || self.target) {
            self.on_path = false;
        }
    }

    /// Mark as part of the shortest path. Requires an explored, non-endpoint,
    /// non-wall cell.
    pub fn mark_on_path(&mut self) {
        if self.source || self.target || self.wall || !self.explored {
            return;
        }
        self.on_path = true;
    }

    /// Demote an on-path cell back to merely explored.
    pub fn clear_path(&mut self) {
        self.on_path = false;
    }

    /// Forget search marks, keeping wall and endpoint flags.
    pub fn clear_exploration(&mut self) {
        self.explored = false;
        self.on_path = false;
    }
}
