//! Time-sliced driving of step iterators.

use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

/// Summary of a paced run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Paced {
    /// Number of ticks delivered to the callback.
    pub ticks: usize,
    /// Whether the callback stopped the run before the iterator ran out.
    pub abandoned: bool,
}

/// Drives a step iterator one tick at a time, pausing between ticks so a
/// caller can redraw.
///
/// The delay only paces the run; it never changes what the steps compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pacer {
    pub tick_delay: Duration,
}

impl Pacer {
    /// A pacer sleeping `tick_delay` between ticks.
    pub const fn new(tick_delay: Duration) -> Self {
        Self { tick_delay }
    }

    /// A pacer sleeping `ms` milliseconds between ticks.
    pub const fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Feed every item of `steps` to `on_tick`, sleeping before each tick
    /// but the first.
    ///
    /// `on_tick` is the resumption point: returning [`ControlFlow::Break`]
    /// abandons the run (for instance when the board it draws on is gone),
    /// leaving the iterator where it stopped.
    pub fn drive<I, F>(&self, steps: I, mut on_tick: F) -> Paced
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> ControlFlow<()>,
    {
        let mut paced = Paced::default();
        for item in steps {
            if paced.ticks > 0 && !self.tick_delay.is_zero() {
                thread::sleep(self.tick_delay);
            }
            paced.ticks += 1;
            if on_tick(item).is_break() {
                paced.abandoned = true;
                break;
            }
        }
        paced
    }
}
