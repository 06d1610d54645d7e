//! Shared types for the gateflow workspace: grid coordinates, directions and ids.

mod types;

pub use types::{Direction, GateId, GridPos, TokenId};
