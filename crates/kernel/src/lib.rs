//! Simulation kernel: seeded RNG, world generation, gate registry and the
//! tick engine for the gateflow token simulation.
//!
//! # Invariants
//! - Every procedural choice draws from an [`Lcg`]; a run is reproducible
//!   from its [`Seed`].
//! - Tokens iterate in insertion order and gates in registration order.
//! - A gate's `hit_count` never exceeds `hit_limit`, and its
//!   `recent_hit_count` never exceeds `recent_hit_limit` within a tick.

pub mod config;
pub mod error;
pub mod gate;
pub mod generate;
pub mod rng;
pub mod token;
pub mod world;

pub use config::{CountRange, GridSize, SimConfig};
pub use error::{ConfigError, ConfigResult};
pub use gate::{Gate, GateRegistry, GateSpec, Redirect};
pub use rng::{Lcg, Seed};
pub use token::Token;
pub use world::{Phase, SimEvent, World};
