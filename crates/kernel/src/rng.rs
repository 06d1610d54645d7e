//! Seeded linear-congruential generator.
//!
//! Uses the classic GCC constants (`m = 2^31`, `a = 1103515245`,
//! `c = 12345`). Every procedural choice in the simulation draws from an
//! [`Lcg`], so a run is fully reproducible from its [`Seed`]. The single
//! exception is [`Lcg::new`] with `None`, which pulls its initial state from
//! OS entropy.
//!
//! State is carried as an `f64` and every step is evaluated in double
//! precision. Once `a * state` passes 2^53 the product rounds, and that
//! rounding is part of the stream.

use serde::{Deserialize, Serialize};

/// Modulus of the generator.
pub const MODULUS: u64 = 1 << 31;
/// Multiplier of the generator.
pub const MULTIPLIER: u64 = 1_103_515_245;
/// Increment of the generator.
pub const INCREMENT: u64 = 12_345;
/// Seeds below 1 are multiplied by this before flooring.
pub const FRACTION_SCALE: f64 = 999_999_999.0;

/// A value a generator can be seeded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Seed {
    /// Normalize the seed into an initial generator state.
    ///
    /// Text is folded with [`fold_text`] first. Values below 1 are scaled by
    /// [`FRACTION_SCALE`], then floored. Non-negative results are used as is,
    /// however large; the first step brings them into `[0, MODULUS)`.
    /// Negative results are wrapped into `[0, MODULUS)` with `rem_euclid`.
    /// NaN and infinities map to 0.
    pub fn normalize(&self) -> f64 {
        match self {
            Seed::Int(value) => normalize_float(*value as f64),
            Seed::Float(value) => normalize_float(*value),
            Seed::Text(text) => normalize_float(fold_text(text)),
        }
    }
}

fn normalize_float(mut value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if value < 1.0 {
        value *= FRACTION_SCALE;
    }
    let value = value.floor();
    if value < 0.0 {
        // f64 remainder is exact, so this never rounds.
        return value.rem_euclid(MODULUS as f64);
    }
    value
}

/// Fold text into a number: for each UTF-16 code unit, multiply the running
/// total by 10 and add the code unit. Accumulates in `f64`, so long strings
/// lose precision exactly the way a double-precision accumulator does.
pub fn fold_text(text: &str) -> f64 {
    text.encode_utf16()
        .fold(0.0, |acc, unit| acc * 10.0 + f64::from(unit))
}

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        Seed::Int(value)
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => Seed::Int(v),
            Err(_) => Seed::Float(value as f64),
        }
    }
}

impl From<f64> for Seed {
    fn from(value: f64) -> Self {
        Seed::Float(value)
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Seed::Text(value.to_owned())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Seed::Text(value)
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seed::Int(v) => write!(f, "{v}"),
            Seed::Float(v) => write!(f, "{v}"),
            Seed::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Deterministic linear-congruential generator.
///
/// Not thread-safe by intent: a generator has exactly one owner and is
/// consumed sequentially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lcg {
    state: f64,
}

impl Lcg {
    /// Create a generator from an optional seed. `None` draws from OS entropy
    /// and is therefore not reproducible.
    pub fn new(seed: Option<Seed>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    pub fn from_seed(seed: impl Into<Seed>) -> Self {
        Self {
            state: seed.into().normalize(),
        }
    }

    pub fn from_entropy() -> Self {
        let raw: u64 = rand::random();
        Self {
            state: (raw % (MODULUS - 1)) as f64,
        }
    }

    /// Current internal state. Integral, and inside `[0, MODULUS)` after the
    /// first step.
    pub fn state(&self) -> f64 {
        self.state
    }

    /// Advance the state and return it. Always in `[0, MODULUS)`.
    ///
    /// `a * state` is rounded to the nearest double before `c` is added, and
    /// the sum is rounded again. The remainder of an integral double is exact,
    /// so the new state is itself an integer.
    pub fn next_int(&mut self) -> u64 {
        let product = MULTIPLIER as f64 * self.state;
        self.state = (product + INCREMENT as f64) % MODULUS as f64;
        self.state as u64
    }

    /// Next value in `[0, 1]`. Both ends are reachable.
    pub fn next_float(&mut self) -> f64 {
        self.next_int() as f64 / (MODULUS - 1) as f64
    }

    /// Bernoulli trial: true when the next float is strictly below `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_float() < p
    }

    /// `floor(f * scale)` for the next float `f`.
    pub fn scaled(&mut self, scale: f64) -> i64 {
        (self.next_float() * scale).floor() as i64
    }

    /// Pick an element uniformly by `floor(f * len)`.
    ///
    /// A draw of exactly 1.0 would index one past the end; it is folded onto
    /// the last element.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        debug_assert!(!items.is_empty(), "pick from empty slice");
        let index = self.scaled(items.len() as f64) as usize;
        items[index.min(items.len() - 1)]
    }

    /// The simulation's range draw: `floor(f * min) + (max - min) + 1`.
    ///
    /// This is not a uniform draw over `[min, max]`: it yields values in
    /// `[max - min + 1, max + 1]`.
    pub fn range_draw(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max, "range_draw with min > max");
        let base = self.scaled(f64::from(min)) as u32;
        base + (max - min) + 1
    }
}
