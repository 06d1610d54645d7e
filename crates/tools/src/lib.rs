//! Developer tooling: world inspector and frame snapshots for external renderers.
//!
//! # Invariants
//! - Tools never mutate world truth; everything here takes `&World`.

mod inspector;

pub use inspector::{Frame, GateView, TokenView, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "gateflow-tools v0.1.0"
}
