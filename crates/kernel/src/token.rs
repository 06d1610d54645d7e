use gateflow_common::{Direction, GridPos, TokenId};
use serde::{Deserialize, Serialize};

/// A moving data token and the path it has taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub position: GridPos,
    pub direction: Direction,
    /// Every cell visited, starting with the spawn cell.
    pub trail: Vec<GridPos>,
    /// False once the token has left the grid.
    pub active: bool,
}

impl Token {
    pub fn new(id: TokenId, position: GridPos, direction: Direction, active: bool) -> Self {
        Self {
            id,
            position,
            direction,
            trail: vec![position],
            active,
        }
    }

    /// Move one cell along the current direction and record it.
    pub fn advance(&mut self) -> GridPos {
        self.position += self.direction.delta();
        self.trail.push(self.position);
        self.position
    }

    /// Drop the newest trail cell.
    pub fn retract(&mut self) -> Option<GridPos> {
        self.trail.pop()
    }
}
