use std::collections::BTreeMap;

use gateflow_common::{Direction, GateId, GridPos, TokenId};
use gateflow_kernel::{Phase, SimEvent, World};
use serde::Serialize;

/// World inspector for renderers and developer tooling.
///
/// Provides read-only queries against the world state. Nothing here can
/// mutate the world.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let gates = world.gates();
        WorldSummary {
            tick: world.tick_count(),
            phase: world.phase(),
            tokens: world.tokens().len(),
            active_tokens: world.active_token_count(),
            gates: gates.len(),
            exhausted_gates: gates.gates().iter().filter(|g| g.is_exhausted()).count(),
            total_hits: gates.total_hits(),
        }
    }

    /// Capture everything a renderer needs for one frame.
    ///
    /// Colour slots cycle through a palette of `palette_len` entries in token
    /// order. Each gate lists the tokens it has redirected, taken from the
    /// world's event log, so call this before draining events.
    pub fn frame(world: &World, palette_len: usize) -> Frame {
        let palette_len = palette_len.max(1);
        let tokens = world
            .tokens()
            .iter()
            .enumerate()
            .map(|(index, t)| TokenView {
                id: t.id,
                position: t.position,
                direction: t.direction,
                active: t.active,
                trail: t.trail.clone(),
                color_slot: index % palette_len,
            })
            .collect();

        let mut passed: BTreeMap<GateId, Vec<TokenId>> = BTreeMap::new();
        for event in world.events() {
            if let SimEvent::Redirected { token, gates, .. } = event {
                for gate in gates {
                    passed.entry(*gate).or_default().push(*token);
                }
            }
        }

        let gates = world
            .gates()
            .gates()
            .iter()
            .map(|g| GateView {
                id: g.id,
                position: g.position,
                in_direction: g.in_direction,
                out_direction: g.out_direction,
                hit_count: g.hit_count,
                hit_limit: g.hit_limit,
                recent_hit_count: g.recent_hit_count,
                recent_hit_limit: g.recent_hit_limit,
                passed: passed.remove(&g.id).unwrap_or_default(),
            })
            .collect();

        Frame {
            tick: world.tick_count(),
            phase: world.phase(),
            tokens,
            gates,
        }
    }

    /// Tokens whose current cell is `position`.
    pub fn tokens_at(world: &World, position: GridPos) -> Vec<TokenId> {
        world
            .tokens()
            .iter()
            .filter(|t| t.position == position)
            .map(|t| t.id)
            .collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldSummary {
    pub tick: u64,
    pub phase: Phase,
    pub tokens: usize,
    pub active_tokens: usize,
    pub gates: usize,
    pub exhausted_gates: usize,
    pub total_hits: u64,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} phase={:?} tokens={} active={} gates={} exhausted={} hits={}",
            self.tick,
            self.phase,
            self.tokens,
            self.active_tokens,
            self.gates,
            self.exhausted_gates,
            self.total_hits
        )
    }
}

/// Read-only snapshot of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub phase: Phase,
    pub tokens: Vec<TokenView>,
    pub gates: Vec<GateView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenView {
    pub id: TokenId,
    pub position: GridPos,
    pub direction: Direction,
    pub active: bool,
    pub trail: Vec<GridPos>,
    pub color_slot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateView {
    pub id: GateId,
    pub position: GridPos,
    pub in_direction: Direction,
    pub out_direction: Direction,
    pub hit_count: u32,
    pub hit_limit: u32,
    /// Redirections so far in the current tick. Zero between ticks.
    pub recent_hit_count: u32,
    pub recent_hit_limit: u32,
    /// Tokens this gate has redirected, oldest first.
    pub passed: Vec<TokenId>,
}
