use std::collections::HashMap;

use gateflow_common::{Direction, GateId, GridPos};
use serde::{Deserialize, Serialize};

/// Parameters for a gate before it is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSpec {
    pub position: GridPos,
    pub in_direction: Direction,
    pub out_direction: Direction,
    pub hit_limit: u32,
    pub recent_hit_limit: u32,
}

/// A fixed cell that turns tokens arriving against its inbound direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub id: GateId,
    pub position: GridPos,
    pub in_direction: Direction,
    pub out_direction: Direction,
    pub hit_count: u32,
    pub recent_hit_count: u32,
    pub hit_limit: u32,
    pub recent_hit_limit: u32,
}

impl Gate {
    /// Whether both the lifetime and the per-tick caps still have room.
    pub fn has_capacity(&self) -> bool {
        self.hit_count < self.hit_limit && self.recent_hit_count < self.recent_hit_limit
    }

    /// A token moving `incoming` matches when it travels opposite to the
    /// gate's declared inbound direction.
    pub fn accepts(&self, incoming: Direction) -> bool {
        incoming == -self.in_direction && self.has_capacity()
    }

    /// Lifetime cap reached; the gate will never redirect again.
    pub fn is_exhausted(&self) -> bool {
        self.hit_count >= self.hit_limit
    }

    fn hit(&mut self) {
        self.hit_count += 1;
        self.recent_hit_count += 1;
        debug_assert!(self.hit_count <= self.hit_limit);
        debug_assert!(self.recent_hit_count <= self.recent_hit_limit);
    }
}

/// Outcome of a successful redirection query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// New heading for the token, from the last matching gate.
    pub direction: Direction,
    /// Every gate that took a hit, in registration order.
    pub gates: Vec<GateId>,
}

/// All gates of a world, indexed by cell.
///
/// Gates are never removed, so a gate's id is its index into `gates`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GateRegistry {
    gates: Vec<Gate>,
    #[serde(skip)]
    by_cell: HashMap<GridPos, Vec<usize>>,
}

impl GateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gate with zeroed counters. Returns its id.
    pub fn register(&mut self, spec: GateSpec) -> GateId {
        let index = self.gates.len();
        let id = GateId(index as u32);
        self.gates.push(Gate {
            id,
            position: spec.position,
            in_direction: spec.in_direction,
            out_direction: spec.out_direction,
            hit_count: 0,
            recent_hit_count: 0,
            hit_limit: spec.hit_limit,
            recent_hit_limit: spec.recent_hit_limit,
        });
        self.by_cell.entry(spec.position).or_default().push(index);
        id
    }

    /// Resolve a token arriving at `position` while moving `incoming`.
    ///
    /// Every matching gate on the cell is hit, in registration order, and the
    /// last one decides the new direction.
    pub fn try_redirect(&mut self, position: GridPos, incoming: Direction) -> Option<Redirect> {
        let indices = self.by_cell.get(&position)?;
        let mut result: Option<Redirect> = None;
        for &index in indices {
            let gate = &mut self.gates[index];
            if !gate.accepts(incoming) {
                continue;
            }
            gate.hit();
            let redirect = result.get_or_insert_with(|| Redirect {
                direction: gate.out_direction,
                gates: Vec::new(),
            });
            redirect.direction = gate.out_direction;
            redirect.gates.push(gate.id);
        }
        result
    }

    /// Clear the per-tick counter on every gate.
    pub fn reset_recent(&mut self) {
        for gate in &mut self.gates {
            gate.recent_hit_count = 0;
        }
    }

    pub fn get(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id.0 as usize)
    }

    /// Gates in registration order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Gates registered on one cell, in registration order.
    pub fn gates_at(&self, position: GridPos) -> impl Iterator<Item = &Gate> + '_ {
        self.by_cell
            .get(&position)
            .into_iter()
            .flatten()
            .map(move |&index| &self.gates[index])
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Sum of lifetime hits across all gates.
    pub fn total_hits(&self) -> u64 {
        self.gates.iter().map(|g| u64::from(g.hit_count)).sum()
    }
}

impl PartialEq for GateRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.gates == other.gates
    }
}
