use thiserror::Error;

/// Reasons a [`SimConfig`](crate::SimConfig) is rejected before generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid axis {axis} has {cells} cells, need at least {min}")]
    GridTooSmall {
        axis: &'static str,
        cells: u32,
        min: u32,
    },

    #[error("grid axis {axis} has {cells} cells, at most {max} are addressable")]
    GridTooLarge {
        axis: &'static str,
        cells: u32,
        max: u32,
    },

    #[error("range {field} is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: u32,
        max: u32,
    },

    #[error("range {field} max {max} leaves no room for the draw offset")]
    RangeOverflow { field: &'static str, max: u32 },

    #[error("spawn chance {value} is not a probability in [0, 1]")]
    InvalidProbability { value: f64 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
