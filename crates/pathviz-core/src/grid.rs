//! A board of [`CellState`] values with shared backing storage.
//!
//! Clones of a [`Grid`] share the same buffer (`Rc<RefCell<...>>`), and
//! [`CellRef`] handles point into it. The search engine and the maze
//! generator only ever see `CellRef`s, through the traits in
//! [`cell`](crate::cell).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cell::{CellState, EditableCell, GraphNode, GridCell};
use crate::geom::{Bounds, Position};

/// Errors raised by board edits and board parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The position lies outside the board.
    OutOfBounds(Position),
    /// The position is already taken by the other endpoint.
    Occupied(Position),
    /// Rows of a textual board have different widths.
    InconsistentSize(String),
    /// A character outside `.#ST` was found in a textual board.
    InvalidChar { ch: char, pos: Position },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(p) => write!(f, "grid: position {p} is out of bounds"),
            Self::Occupied(p) => write!(f, "grid: position {p} is occupied by the other endpoint"),
            Self::InconsistentSize(s) => write!(f, "grid: inconsistent size:\n{s}"),
            Self::InvalidChar { ch, pos } => {
                write!(f, "grid: invalid character \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Debug)]
struct GridBuffer {
    cells: Vec<CellState>,
    bounds: Bounds,
    source: Option<Position>,
    target: Option<Position>,
}

impl GridBuffer {
    fn get(&self, p: Position) -> Option<&CellState> {
        self.bounds.index(p).map(|i| &self.cells[i])
    }

    fn get_mut(&mut self, p: Position) -> Option<&mut CellState> {
        self.bounds.index(p).map(|i| &mut self.cells[i])
    }
}

/// A `rows x cols` board of cells.
#[derive(Debug, Clone)]
pub struct Grid {
    buf: Rc<RefCell<GridBuffer>>,
}

impl Grid {
    /// Create a new board with every cell blank and no endpoints.
    pub fn new(rows: i32, cols: i32) -> Self {
        let bounds = Bounds::new(rows, cols);
        let buf = GridBuffer {
            cells: vec![CellState::default(); bounds.len()],
            bounds,
            source: None,
            target: None,
        };
        Self {
            buf: Rc::new(RefCell::new(buf)),
        }
    }

    /// Parse a board from text: `.` blank, `#` wall, `S` source, `T` target.
    ///
    /// Leading and trailing blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        if lines.iter().any(|l| l.chars().count() != cols) {
            return Err(GridError::InconsistentSize(text.to_string()));
        }
        let grid = Grid::new(lines.len() as i32, cols as i32);
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let pos = Position::new(row as i32, col as i32);
                match ch {
                    '.' => {}
                    '#' => grid.set_wall(pos),
                    'S' => grid.set_source(pos)?,
                    'T' => grid.set_target(pos)?,
                    _ => return Err(GridError::InvalidChar { ch, pos }),
                }
            }
        }
        Ok(grid)
    }

    /// The extent of the board.
    pub fn bounds(&self) -> Bounds {
        self.buf.borrow().bounds
    }

    pub fn rows(&self) -> i32 {
        self.bounds().rows
    }

    pub fn cols(&self) -> i32 {
        self.bounds().cols
    }

    /// Whether the board contains the given position.
    pub fn contains(&self, p: Position) -> bool {
        self.bounds().contains(p)
    }

    /// Copy of the state at a position, or `None` if out of bounds.
    pub fn state(&self, p: Position) -> Option<CellState> {
        self.buf.borrow().get(p).copied()
    }

    /// A handle to the cell at a position, or `None` if out of bounds.
    pub fn cell(&self, p: Position) -> Option<CellRef> {
        if !self.contains(p) {
            return None;
        }
        Some(CellRef {
            grid: self.clone(),
            pos: p,
        })
    }

    /// Row-major snapshot of handles to every cell.
    pub fn cells(&self) -> Vec<Vec<CellRef>> {
        let bounds = self.bounds();
        (0..bounds.rows)
            .map(|row| {
                (0..bounds.cols)
                    .map(|col| CellRef {
                        grid: self.clone(),
                        pos: Position::new(row, col),
                    })
                    .collect()
            })
            .collect()
    }

    /// Position of the source, if placed.
    pub fn source(&self) -> Option<Position> {
        self.buf.borrow().source
    }

    /// Position of the target, if placed.
    pub fn target(&self) -> Option<Position> {
        self.buf.borrow().target
    }

    /// Move the source to `p`. The vacated cell returns to the state it had
    /// before the source was placed on it.
    pub fn set_source(&self, p: Position) -> Result<(), GridError> {
        let mut buf = self.buf.borrow_mut();
        if !buf.bounds.contains(p) {
            return Err(GridError::OutOfBounds(p));
        }
        if buf.target == Some(p) {
            return Err(GridError::Occupied(p));
        }
        if buf.source == Some(p) {
            return Ok(());
        }
        if let Some(old) = buf.source.take() {
            if let Some(c) = buf.get_mut(old) {
                c.restore_previous();
            }
        }
        if let Some(c) = buf.get_mut(p) {
            c.set_source();
        }
        buf.source = Some(p);
        Ok(())
    }

    /// Move the target to `p`. The vacated cell returns to the state it had
    /// before the target was placed on it.
    pub fn set_target(&self, p: Position) -> Result<(), GridError> {
        let mut buf = self.buf.borrow_mut();
        if !buf.bounds.contains(p) {
            return Err(GridError::OutOfBounds(p));
        }
        if buf.source == Some(p) {
            return Err(GridError::Occupied(p));
        }
        if buf.target == Some(p) {
            return Ok(());
        }
        if let Some(old) = buf.target.take() {
            if let Some(c) = buf.get_mut(old) {
                c.restore_previous();
            }
        }
        if let Some(c) = buf.get_mut(p) {
            c.set_target();
        }
        buf.target = Some(p);
        Ok(())
    }

    /// Turn the cell at `p` into a wall. Does nothing if out of bounds or on
    /// an endpoint.
    pub fn set_wall(&self, p: Position) {
        self.update(p, CellState::set_wall);
    }

    /// Toggle the wall at `p`, the way dragging across the board edits it.
    pub fn toggle_wall(&self, p: Position) {
        self.update(p, CellState::toggle_wall);
    }

    /// Remove the wall at `p`.
    pub fn clear_wall(&self, p: Position) {
        self.update(p, CellState::clear_wall);
    }

    /// Demote every on-path cell back to explored.
    pub fn clear_path(&self) {
        self.update_all(CellState::clear_path);
    }

    /// Forget every explored and on-path mark.
    pub fn clear_exploration(&self) {
        self.update_all(CellState::clear_exploration);
    }

    /// Count how many cells satisfy a predicate.
    pub fn count(&self, mut f: impl FnMut(&CellState) -> bool) -> usize {
        self.buf.borrow().cells.iter().filter(|&c| f(c)).count()
    }

    /// Draw the board: `#` wall, `S` source, `T` target, `*` path,
    /// `o` explored, `.` blank.
    pub fn render(&self) -> String {
        let buf = self.buf.borrow();
        let cols = buf.bounds.cols.max(1) as usize;
        let mut out = String::with_capacity(buf.cells.len() + buf.bounds.rows as usize);
        for (i, c) in buf.cells.iter().enumerate() {
            let ch = if c.is_wall() {
                '#'
            } else if c.is_source() {
                'S'
            } else if c.is_target() {
                'T'
            } else if c.is_on_path() {
                '*'
            } else if c.is_explored() {
                'o'
            } else {
                '.'
            };
            out.push(ch);
            if (i + 1) % cols == 0 {
                out.push('\n');
            }
        }
        out
    }

    fn update(&self, p: Position, f: impl FnOnce(&mut CellState)) {
        if let Some(c) = self.buf.borrow_mut().get_mut(p) {
            f(c);
        }
    }

    fn update_all(&self, mut f: impl FnMut(&mut CellState)) {
        for c in self.buf.borrow_mut().cells.iter_mut() {
            f(c);
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ---------------------------------------------------------------------------
// CellRef
// ---------------------------------------------------------------------------

/// A cheap handle to one cell of a [`Grid`].
#[derive(Clone)]
pub struct CellRef {
    grid: Grid,
    pos: Position,
}

impl CellRef {
    /// Copy of the current state of the cell.
    pub fn state(&self) -> CellState {
        self.grid.state(self.pos).unwrap_or_default()
    }

    pub fn is_explored(&self) -> bool {
        self.state().is_explored()
    }

    pub fn is_on_path(&self) -> bool {
        self.state().is_on_path()
    }
}

impl fmt::Debug for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellRef")
            .field("pos", &self.pos)
            .field("state", &self.state())
            .finish()
    }
}

impl GraphNode for CellRef {
    fn position(&self) -> Position {
        self.pos
    }

    fn is_wall(&self) -> bool {
        self.state().is_wall()
    }
}

impl GridCell for CellRef {
    fn is_source(&self) -> bool {
        self.state().is_source()
    }

    fn is_target(&self) -> bool {
        self.state().is_target()
    }

    fn mark_explored(&self) {
        self.grid.update(self.pos, CellState::mark_explored);
    }

    fn mark_on_path(&self) {
        self.grid.update(self.pos, CellState::mark_on_path);
    }
}

impl EditableCell for CellRef {
    fn set_wall(&self) {
        self.grid.set_wall(self.pos);
    }

    fn clear_wall(&self) {
        self.grid.clear_wall(self.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = "
        S.#.
        ..#.
        ...T
    ";

    #[test]
    fn new_and_size() {
        let g = Grid::new(5, 10);
        assert_eq!(g.rows(), 5);
        assert_eq!(g.cols(), 10);
        assert_eq!(g.count(CellState::is_blank), 50);
        assert_eq!(g.source(), None);
    }

    #[test]
    fn parse_and_render() {
        let g = Grid::parse(BOARD).unwrap();
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cols(), 4);
        assert_eq!(g.source(), Some(Position::new(0, 0)));
        assert_eq!(g.target(), Some(Position::new(2, 3)));
        assert_eq!(g.render(), "S.#.\n..#.\n...T\n");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            Grid::parse("..\n..."),
            Err(GridError::InconsistentSize(_))
        ));
        assert_eq!(
            Grid::parse("..\n.x").unwrap_err(),
            GridError::InvalidChar {
                ch: 'x',
                pos: Position::new(1, 1)
            }
        );
    }

    #[test]
    fn handles_share_state() {
        let g = Grid::new(3, 3);
        let c = g.cell(Position::new(1, 1)).unwrap();
        c.mark_explored();
        assert!(g.state(Position::new(1, 1)).unwrap().is_explored());
        g.set_wall(Position::new(1, 1));
        assert!(c.is_wall());
        assert!(g.cell(Position::new(3, 0)).is_none());
    }

    #[test]
    fn cells_snapshot_is_row_major() {
        let g = Grid::new(2, 3);
        let cells = g.cells();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].len(), 3);
        assert_eq!(cells[1][2].position(), Position::new(1, 2));
        assert_eq!(cells[1][2].id().to_string(), "(1,2)");
    }

    #[test]
    fn moving_source_restores_vacated_cell() {
        let g = Grid::new(3, 3);
        g.set_wall(Position::new(1, 1));
        g.set_source(Position::new(0, 0)).unwrap();
        g.set_source(Position::new(1, 1)).unwrap();
        assert!(g.state(Position::new(1, 1)).unwrap().is_source());
        assert!(g.state(Position::new(0, 0)).unwrap().is_blank());
        g.set_source(Position::new(2, 2)).unwrap();
        assert!(g.state(Position::new(1, 1)).unwrap().is_wall());
        assert_eq!(g.count(CellState::is_source), 1);
    }

    #[test]
    fn endpoints_cannot_overlap() {
        let g = Grid::new(2, 2);
        g.set_source(Position::new(0, 0)).unwrap();
        assert_eq!(
            g.set_target(Position::new(0, 0)),
            Err(GridError::Occupied(Position::new(0, 0)))
        );
        assert_eq!(
            g.set_target(Position::new(5, 0)),
            Err(GridError::OutOfBounds(Position::new(5, 0)))
        );
    }

    #[test]
    fn clear_path_and_exploration() {
        let g = Grid::new(1, 3);
        let c = g.cell(Position::new(0, 1)).unwrap();
        c.mark_explored();
        c.mark_on_path();
        assert_eq!(g.render(), ".*.\n");
        g.clear_path();
        assert_eq!(g.render(), ".o.\n");
        g.clear_exploration();
        assert_eq!(g.render(), "...\n");
    }

    #[test]
    fn editable_cell_respects_endpoints() {
        let g = Grid::parse("S.T").unwrap();
        for c in g.cells().into_iter().flatten() {
            c.set_wall();
        }
        assert_eq!(g.render(), "S#T\n");
        for c in g.cells().into_iter().flatten() {
            c.clear_wall();
        }
        assert_eq!(g.render(), "S.T\n");
    }
}
