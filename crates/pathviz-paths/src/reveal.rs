use std::iter::FusedIterator;

use pathviz_core::GridCell;

/// Marks the cells of a shortest path one at a time.
///
/// Each call to `next` fires the on-path hook of the next cell, walking from
/// the source side toward the target. Endpoints are never included. An empty
/// reveal stands for "no path": nothing is marked.
pub struct PathReveal<C> {
    cells: std::vec::IntoIter<C>,
}

impl<C: GridCell> PathReveal<C> {
    /// Build a reveal over `path` (source to target, endpoints included).
    pub fn new(path: Vec<C>, source: &C, target: &C) -> Self {
        let (sid, tid) = (source.id(), target.id());
        let cells: Vec<C> = path
            .into_iter()
            .filter(|c| !c.is_source() && !c.is_target())
            .filter(|c| c.id() != sid && c.id() != tid)
            .collect();
        Self {
            cells: cells.into_iter(),
        }
    }

    /// A reveal that marks nothing.
    pub fn empty() -> Self {
        Self {
            cells: Vec::new().into_iter(),
        }
    }

    /// Mark every remaining cell at once. Returns how many were marked.
    pub fn finish(&mut self) -> usize {
        let mut n = 0;
        for _ in self.by_ref() {
            n += 1;
        }
        n
    }
}

impl<C: GridCell> Iterator for PathReveal<C> {
    type Item = C;

    fn next(&mut self) -> Option<C> {
        let cell = self.cells.next()?;
        cell.mark_on_path();
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cells.size_hint()
    }
}

impl<C: GridCell> ExactSizeIterator for PathReveal<C> {}

impl<C: GridCell> FusedIterator for PathReveal<C> {}
