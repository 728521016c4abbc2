#![allow(clippy::suspicious_op_assign_impl)]

use std::ops::AddAssign;

/// Accumulates reasons to re-render the panorama view during a frame.
#[derive(Debug, Default)]
pub struct Redraw {
    needed: bool,
}

impl Redraw {
    pub fn new() -> Self {
        Self { needed: false }
    }

    pub fn needed(&self) -> bool {
        self.needed
    }

    /// Returns whether a redraw was requested and resets the flag.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.needed)
    }
}

impl AddAssign<bool> for Redraw {
    fn add_assign(&mut self, rhs: bool) {
        self.needed |= rhs;
    }
}
