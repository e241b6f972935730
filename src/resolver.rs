#![warn(clippy::all, clippy::pedantic)]

//! Overlap resolution and scoring for a block landing on the tower.

use crate::components::{ActiveBlock, SettledBlock};
use crate::game::{BLOCK_HEIGHT, MIN_OVERLAP, PERFECT_THRESHOLD};

/// Outcome of a landed block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Within the perfect threshold: snaps onto the top block with its full width
    Perfect(SettledBlock),
    /// Trimmed to the intersection of the two blocks
    Partial(SettledBlock),
    /// Not enough overlap to stand on
    Collapse,
}

impl Placement {
    #[must_use]
    pub fn block(&self) -> Option<&SettledBlock> {
        match self {
            Placement::Perfect(block) | Placement::Partial(block) => Some(block),
            Placement::Collapse => None,
        }
    }
}

/// Signed offset between the left edges and the resulting overlap width.
#[must_use]
pub fn overlap(active: &ActiveBlock, top: &SettledBlock) -> (f64, f64) {
    let diff = active.x - top.x;
    (diff, active.width - diff.abs())
}

/// Decides how `active` settles on `top`.
#[must_use]
pub fn resolve(active: &ActiveBlock, top: &SettledBlock) -> Placement {
    let (diff, overlap) = overlap(active, top);

    if overlap <= MIN_OVERLAP {
        return Placement::Collapse;
    }

    let y = top.y - BLOCK_HEIGHT;
    if diff.abs() < PERFECT_THRESHOLD {
        Placement::Perfect(SettledBlock {
            x: top.x,
            y,
            width: top.width,
            height: BLOCK_HEIGHT,
            color: active.color,
        })
    } else {
        Placement::Partial(SettledBlock {
            x: if diff > 0.0 { active.x } else { top.x },
            y,
            width: overlap,
            height: BLOCK_HEIGHT,
            color: active.color,
        })
    }
}

/// Score and perfect-placement streak of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub score: u32,
    pub combo: u32,
}

impl Tally {
    /// Applies a placement and returns the points it earned. A perfect
    /// placement pays `combo + 1` (the streak it extends, plus one).
    pub fn record(&mut self, placement: &Placement) -> u32 {
        let points = match placement {
            Placement::Perfect(_) => {
                let points = self.combo + 1;
                self.combo += 1;
                points
            }
            Placement::Partial(_) => {
                self.combo = 0;
                1
            }
            Placement::Collapse => 0,
        };
        self.score += points;
        points
    }
}
