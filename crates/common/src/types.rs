use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

/// A cell coordinate on the simulation grid. `y` grows upward.
pub type GridPos = IVec2;

/// Unique identifier for a token. Assigned sequentially, so ids order by spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u64);

/// Unique identifier for a gate. Equal to its registration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// One of the four cardinal directions.
///
/// The discriminants are signed so that negation yields the opposite
/// direction: `-Up == Down` and `-Left == Right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i8)]
pub enum Direction {
    Up = 1,
    Down = -1,
    Left = -2,
    Right = 2,
}

impl Direction {
    /// All directions, in the order used for uniform random picks.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Signed integer form of the direction.
    pub fn as_i8(self) -> i8 {
        self as i8
    }

    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            1 => Some(Self::Up),
            -1 => Some(Self::Down),
            -2 => Some(Self::Left),
            2 => Some(Self::Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        -self
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// The two directions at a right angle to this one.
    pub fn perpendicular(self) -> [Direction; 2] {
        if self.is_vertical() {
            [Direction::Left, Direction::Right]
        } else {
            [Direction::Up, Direction::Down]
        }
    }

    /// Unit step for one cell of movement.
    pub fn delta(self) -> GridPos {
        match self {
            Self::Up => IVec2::new(0, 1),
            Self::Down => IVec2::new(0, -1),
            Self::Left => IVec2::new(-1, 0),
            Self::Right => IVec2::new(1, 0),
        }
    }
}

impl Neg for Direction {
    type Output = Direction;

    fn neg(self) -> Direction {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_matches_signed_encoding() {
        for dir in Direction::ALL {
            assert_eq!((-dir).as_i8(), -dir.as_i8());
            assert_eq!(Direction::from_i8(dir.as_i8()), Some(dir));
        }
        assert_eq!(-Direction::Up, Direction::Down);
        assert_eq!(-Direction::Left, Direction::Right);
    }

    #[test]
    fn perpendicular_never_contains_axis() {
        for dir in Direction::ALL {
            let perp = dir.perpendicular();
            assert!(!perp.contains(&dir));
            assert!(!perp.contains(&dir.opposite()));
        }
        assert_eq!(Direction::Up.perpendicular(), [Direction::Left, Direction::Right]);
        assert_eq!(Direction::Right.perpendicular(), [Direction::Up, Direction::Down]);
    }

    #[test]
    fn delta_is_unit_step() {
        assert_eq!(Direction::Up.delta(), IVec2::new(0, 1));
        assert_eq!(Direction::Down.delta(), IVec2::new(0, -1));
        for dir in Direction::ALL {
            assert_eq!(dir.delta() + dir.opposite().delta(), IVec2::ZERO);
        }
    }

    #[test]
    fn from_i8_rejects_unknown() {
        assert_eq!(Direction::from_i8(0), None);
        assert_eq!(Direction::from_i8(3), None);
    }

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(TokenId(7).to_string(), "t7");
        assert_eq!(GateId(3).to_string(), "g3");
    }
}
