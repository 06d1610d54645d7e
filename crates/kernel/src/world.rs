use gateflow_common::{Direction, GateId, GridPos, TokenId};
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::ConfigResult;
use crate::gate::{GateRegistry, GateSpec};
use crate::generate::{blueprint, plan_cluster};
use crate::rng::{Lcg, Seed};
use crate::token::Token;

/// Lifecycle of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Tokens advance one cell per step.
    Running,
    /// No token moved on the last tick; trails retract one cell per step.
    Draining,
    /// Every trail is empty. Steps are no-ops.
    Finished,
}

/// An event record produced by every observable mutation to the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    /// A cluster of colocated tokens was released.
    ClusterSpawned {
        tick: u64,
        origin: GridPos,
        direction: Direction,
        tokens: Vec<TokenId>,
    },
    /// A token was turned by one or more gates on its cell.
    Redirected {
        tick: u64,
        token: TokenId,
        at: GridPos,
        from: Direction,
        to: Direction,
        gates: Vec<GateId>,
    },
    /// A token stepped off the grid.
    Exited { tick: u64, token: TokenId, at: GridPos },
    /// The world stopped moving and started retracting trails.
    DrainStarted { tick: u64 },
    /// One retraction step shortened this many trails.
    Retracted { tick: u64, trails: usize },
    /// All trails are empty.
    Finished { tick: u64 },
}

/// The authoritative simulation state.
///
/// Owned by the caller and advanced explicitly with [`World::step`] (or the
/// lower-level [`World::tick`] / [`World::retract`]). Tokens are kept in
/// insertion order and gates in registration order, which keeps multi-gate
/// tie-breaks reproducible.
#[derive(Debug, Clone, Serialize)]
pub struct World {
    config: SimConfig,
    seed: Option<Seed>,
    tokens: Vec<Token>,
    gates: GateRegistry,
    tick: u64,
    phase: Phase,
    next_token: u64,
    /// Append-only event log of all mutations.
    #[serde(skip)]
    event_log: Vec<SimEvent>,
}

impl World {
    /// An empty running world with no tokens or gates.
    pub fn empty(config: SimConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            seed: None,
            tokens: Vec::new(),
            gates: GateRegistry::new(),
            tick: 0,
            phase: Phase::Running,
            next_token: 0,
            event_log: Vec::new(),
        })
    }

    /// Generate a world from `config`, with every procedural choice drawn from
    /// one generator seeded by `seed`.
    pub fn generate(config: SimConfig, seed: impl Into<Seed>) -> ConfigResult<Self> {
        let seed = seed.into();
        let mut rng = Lcg::from_seed(seed.clone());
        let mut world = Self::generate_with(config, &mut rng)?;
        world.seed = Some(seed);
        Ok(world)
    }

    /// Generate from OS entropy. The result is not reproducible.
    pub fn generate_unseeded(config: SimConfig) -> ConfigResult<Self> {
        Self::generate_with(config, &mut Lcg::new(None))
    }

    fn generate_with(config: SimConfig, rng: &mut Lcg) -> ConfigResult<Self> {
        let mut world = Self::empty(config)?;
        let plan = blueprint(&world.config, rng);
        for cluster in &plan.clusters {
            world.spawn_cluster(cluster.origin, cluster.direction, cluster.size);
        }
        for spec in plan.gates {
            world.gates.register(spec);
        }
        tracing::info!(
            clusters = plan.clusters.len(),
            tokens = world.tokens.len(),
            gates = world.gates.len(),
            "world generated"
        );
        Ok(world)
    }

    /// Throw away all state and generate again. Used whenever the seed or
    /// any configuration field changes.
    pub fn regenerate(&mut self, config: SimConfig, seed: impl Into<Seed>) -> ConfigResult<()> {
        *self = Self::generate(config, seed)?;
        Ok(())
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Seed this world was generated from, if any.
    pub fn seed(&self) -> Option<&Seed> {
        self.seed.as_ref()
    }

    /// Current tick counter. Counts up while running, back down while draining.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Tokens in insertion order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn active_token_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.active).count()
    }

    pub fn gates(&self) -> &GateRegistry {
        &self.gates
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SimEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Add a single token. It is inactive from the start if `position` is
    /// already off the grid.
    pub fn spawn_token(&mut self, position: GridPos, direction: Direction) -> TokenId {
        let id = TokenId(self.next_token);
        self.next_token += 1;
        let active = self.config.grid.contains(position);
        self.tokens.push(Token::new(id, position, direction, active));
        id
    }

    /// Release `size` colocated tokens sharing one origin and heading.
    pub fn spawn_cluster(&mut self, origin: GridPos, direction: Direction, size: u32) -> Vec<TokenId> {
        let ids: Vec<TokenId> = (0..size).map(|_| self.spawn_token(origin, direction)).collect();
        tracing::debug!(tick = self.tick, ?origin, %direction, size, "cluster spawned");
        self.event_log.push(SimEvent::ClusterSpawned {
            tick: self.tick,
            origin,
            direction,
            tokens: ids.clone(),
        });
        ids
    }

    /// Register a hand-placed gate.
    pub fn add_gate(&mut self, spec: GateSpec) -> GateId {
        self.gates.register(spec)
    }

    /// Advance every on-grid token by one cell. Returns whether any moved.
    ///
    /// After movement, a generator seeded with the tick counter decides
    /// whether a new cluster spawns, then every gate's per-tick counter is
    /// cleared. The counter only increments while the world is running.
    ///
    /// Tick 0 seeds state 0, whose first float is `12345 / (2^31 - 1)`, so
    /// any spawn chance above about 5.7e-6 spawns a cluster on the first tick.
    pub fn tick(&mut self) -> bool {
        let _span = tracing::debug_span!("tick", tick = self.tick).entered();
        let grid = self.config.grid;
        let tick = self.tick;
        let mut moved = false;

        for token in &mut self.tokens {
            debug_assert_eq!(token.active, grid.contains(token.position));
            if !token.active {
                continue;
            }
            let from = token.direction;
            let at = token.advance();
            if let Some(redirect) = self.gates.try_redirect(at, from) {
                token.direction = redirect.direction;
                tracing::debug!(token = %token.id, ?at, %from, to = %redirect.direction, "redirected");
                self.event_log.push(SimEvent::Redirected {
                    tick,
                    token: token.id,
                    at,
                    from,
                    to: redirect.direction,
                    gates: redirect.gates,
                });
            }
            if !grid.contains(at) {
                token.active = false;
                self.event_log.push(SimEvent::Exited {
                    tick,
                    token: token.id,
                    at,
                });
            }
            moved = true;
        }

        let mut rng = Lcg::from_seed(tick);
        if rng.chance(self.config.chance_to_spawn) {
            let plan = plan_cluster(&mut rng, grid, self.config.cluster_size);
            self.spawn_cluster(plan.origin, plan.direction, plan.size);
        }

        self.gates.reset_recent();

        if self.phase == Phase::Running {
            self.tick += 1;
        }
        moved
    }

    /// Pop the newest cell off every non-empty trail and step the counter
    /// back. Returns whether any trail was shortened.
    pub fn retract(&mut self) -> bool {
        let trails = self
            .tokens
            .iter_mut()
            .filter_map(|t| t.retract())
            .count();
        if trails == 0 {
            return false;
        }
        self.tick = self.tick.saturating_sub(1);
        self.event_log.push(SimEvent::Retracted {
            tick: self.tick,
            trails,
        });
        true
    }

    /// Advance one step according to the current phase and return the phase
    /// after the step.
    pub fn step(&mut self) -> Phase {
        match self.phase {
            Phase::Running => {
                if !self.tick() {
                    self.phase = Phase::Draining;
                    tracing::info!(tick = self.tick, "no token moved, draining");
                    self.event_log.push(SimEvent::DrainStarted { tick: self.tick });
                }
            }
            Phase::Draining => {
                self.retract();
                if self.tokens.iter().all(|t| t.trail.is_empty()) {
                    self.phase = Phase::Finished;
                    tracing::info!(tick = self.tick, "all trails retracted");
                    self.event_log.push(SimEvent::Finished { tick: self.tick });
                }
            }
            Phase::Finished => {}
        }
        self.phase
    }

    /// Step until finished or until `max_steps` steps were taken. Returns the
    /// number of steps taken.
    pub fn run(&mut self, max_steps: u64) -> u64 {
        let mut steps = 0;
        while steps < max_steps && !self.is_finished() {
            self.step();
            steps += 1;
        }
        steps
    }

    /// Compute a deterministic hash of the world state for comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_pos = |h: &mut u64, p: GridPos| {
            mix(h, &p.x.to_le_bytes());
            mix(h, &p.y.to_le_bytes());
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &[self.phase as u8]);
        for token in &self.tokens {
            mix(&mut h, &token.id.0.to_le_bytes());
            mix_pos(&mut h, token.position);
            mix(&mut h, &token.direction.as_i8().to_le_bytes());
            mix(&mut h, &[token.active as u8]);
            mix(&mut h, &(token.trail.len() as u64).to_le_bytes());
            for &cell in &token.trail {
                mix_pos(&mut h, cell);
            }
        }
        for gate in self.gates.gates() {
            mix(&mut h, &gate.id.0.to_le_bytes());
            mix_pos(&mut h, gate.position);
            mix(&mut h, &gate.in_direction.as_i8().to_le_bytes());
            mix(&mut h, &gate.out_direction.as_i8().to_le_bytes());
            mix(&mut h, &gate.hit_count.to_le_bytes());
            mix(&mut h, &gate.recent_hit_count.to_le_bytes());
            mix(&mut h, &gate.hit_limit.to_le_bytes());
            mix(&mut h, &gate.recent_hit_limit.to_le_bytes());
        }
        h
    }
}
