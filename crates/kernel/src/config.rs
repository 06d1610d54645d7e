use gateflow_common::GridPos;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Smallest grid axis that still has an interior cell for gates.
pub const MIN_CELLS: u32 = 3;
/// Largest grid axis whose cells fit in a [`GridPos`] coordinate.
pub const MAX_CELLS: u32 = i32::MAX as u32;

/// Grid dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub cells_x: u32,
    pub cells_y: u32,
}

impl GridSize {
    pub fn new(cells_x: u32, cells_y: u32) -> Self {
        Self { cells_x, cells_y }
    }

    /// Whether a token at `pos` is still on the board.
    ///
    /// The Y bound is inclusive (`y <= cells_y`) while X is exclusive.
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.cells_x as i32 && pos.y <= self.cells_y as i32
    }

    /// Whether `pos` is strictly inside the border ring, where gates live.
    pub fn is_interior(&self, pos: GridPos) -> bool {
        pos.x >= 1 && pos.y >= 1 && pos.x <= self.cells_x as i32 - 2 && pos.y <= self.cells_y as i32 - 2
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(20, 20)
    }
}

/// A `min`/`max` pair fed to [`Lcg::range_draw`](crate::Lcg::range_draw).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Smallest value a range draw can produce.
    pub fn draw_floor(&self) -> u32 {
        self.max - self.min + 1
    }

    /// Largest value a range draw can produce.
    pub fn draw_ceiling(&self) -> u32 {
        self.max + 1
    }

    fn validate(&self, field: &'static str) -> ConfigResult<()> {
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        // A draw can land on `max + 1`.
        if self.max == u32::MAX {
            return Err(ConfigError::RangeOverflow { field, max: self.max });
        }
        Ok(())
    }
}

/// Fully resolved simulation configuration.
///
/// Missing fields in a serialized document fall back to [`Default`], so the
/// value handed to the kernel is always complete. Any change to these fields
/// calls for a full regeneration of the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub grid: GridSize,
    /// Number of token clusters placed at generation.
    pub clusters: CountRange,
    /// Tokens released together in one cluster.
    pub cluster_size: CountRange,
    /// Probability of spawning one more cluster on each tick.
    pub chance_to_spawn: f64,
    /// Number of gates placed at generation.
    pub gates: CountRange,
    /// Lifetime redirection cap per gate.
    pub gate_limit: CountRange,
    /// Per-tick redirection cap per gate.
    pub gate_recent_limit: CountRange,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            clusters: CountRange::new(5, 10),
            cluster_size: CountRange::new(3, 8),
            chance_to_spawn: 0.1,
            gates: CountRange::new(150, 225),
            gate_limit: CountRange::new(1, 4),
            gate_recent_limit: CountRange::new(1, 7),
        }
    }
}

impl SimConfig {
    /// Reject configurations the generator cannot honour. Nothing is clamped.
    pub fn validate(&self) -> ConfigResult<()> {
        for (axis, cells) in [("x", self.grid.cells_x), ("y", self.grid.cells_y)] {
            if cells < MIN_CELLS {
                return Err(ConfigError::GridTooSmall {
                    axis,
                    cells,
                    min: MIN_CELLS,
                });
            }
            if cells > MAX_CELLS {
                return Err(ConfigError::GridTooLarge {
                    axis,
                    cells,
                    max: MAX_CELLS,
                });
            }
        }
        self.clusters.validate("clusters")?;
        self.cluster_size.validate("cluster_size")?;
        self.gates.validate("gates")?;
        self.gate_limit.validate("gate_limit")?;
        self.gate_recent_limit.validate("gate_recent_limit")?;
        if !(0.0..=1.0).contains(&self.chance_to_spawn) {
            return Err(ConfigError::InvalidProbability {
                value: self.chance_to_spawn,
            });
        }
        Ok(())
    }
}
