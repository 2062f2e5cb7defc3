//! `KinematicState`: per-axis position, velocity, and acceleration.
//!
//! A state is a plain value. Identity (one node per physical state) is a
//! planner-session concern; the kernel only supplies the rounding rule and the
//! quantized [`StateKey`] the planner deduplicates on.

use crate::vector;

/// Typed failure for state construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Position, velocity, and acceleration arrays differ in length.
    AxisCountMismatch {
        position: usize,
        velocity: usize,
        acceleration: usize,
    },
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AxisCountMismatch {
                position,
                velocity,
                acceleration,
            } => write!(
                f,
                "axis count mismatch: s has {position}, v has {velocity}, a has {acceleration}"
            ),
        }
    }
}

impl std::error::Error for StateError {}

/// Fixed decimal precision used to discretize the state space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precision {
    decimals: u32,
}

impl Precision {
    /// Two decimals: the planner's default grid.
    pub const DEFAULT: Self = Self { decimals: 2 };

    /// Finest grid whose tick counts stay well inside `i64` for coordinates
    /// up to about 10^9.
    pub const MAX_DECIMALS: u32 = 9;

    #[must_use]
    pub const fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    #[must_use]
    pub const fn decimals(self) -> u32 {
        self.decimals
    }

    /// Round a scalar onto the grid.
    #[must_use]
    pub fn round(self, x: f64) -> f64 {
        vector::round_to(x, self.decimals)
    }

    /// Integer grid ticks for `x` (`x * 10^decimals`, rounded).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn ticks(self, x: f64) -> i64 {
        let factor = 10f64.powi(i32::try_from(self.decimals).unwrap_or(i32::MAX));
        (x * factor).round() as i64
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Quantized `(s, v, a)` tuple: the session dedup key.
///
/// Layout is `s[0..D] ++ v[0..D] ++ a[0..D]` in grid ticks, so two states
/// share a key exactly when they round to the same grid point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(Box<[i64]>);

/// Motion state of a `D`-axis machine at one discrete instant.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicState {
    position: Vec<f64>,
    velocity: Vec<f64>,
    acceleration: Vec<f64>,
}

impl KinematicState {
    /// Construct a state from explicit axis arrays.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AxisCountMismatch`] unless all three arrays have
    /// the same length.
    pub fn new(
        position: Vec<f64>,
        velocity: Vec<f64>,
        acceleration: Vec<f64>,
    ) -> Result<Self, StateError> {
        if position.len() != velocity.len() || position.len() != acceleration.len() {
            return Err(StateError::AxisCountMismatch {
                position: position.len(),
                velocity: velocity.len(),
                acceleration: acceleration.len(),
            });
        }
        Ok(Self {
            position,
            velocity,
            acceleration,
        })
    }

    /// A state at `position` with zero velocity and acceleration.
    #[must_use]
    pub fn at_rest(position: Vec<f64>) -> Self {
        let zeros = vec![0.0; position.len()];
        Self {
            velocity: zeros.clone(),
            acceleration: zeros,
            position,
        }
    }

    /// A state at `position` moving with `velocity` and zero acceleration.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AxisCountMismatch`] if the arrays differ in length.
    pub fn moving(position: Vec<f64>, velocity: Vec<f64>) -> Result<Self, StateError> {
        let zeros = vec![0.0; position.len()];
        Self::new(position, velocity, zeros)
    }

    /// Number of axes.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.position.len()
    }

    #[must_use]
    pub fn position(&self) -> &[f64] {
        &self.position
    }

    #[must_use]
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    #[must_use]
    pub fn acceleration(&self) -> &[f64] {
        &self.acceleration
    }

    /// Zero acceleration on every axis while at least one axis is moving.
    #[must_use]
    pub fn is_cruising(&self) -> bool {
        self.acceleration.iter().all(|a| *a == 0.0) && self.velocity.iter().any(|v| *v != 0.0)
    }

    /// Zero velocity on every axis.
    #[must_use]
    pub fn is_stationary(&self) -> bool {
        self.velocity.iter().all(|v| *v == 0.0)
    }

    /// Advance one unit time step under semi-implicit Euler: the new
    /// acceleration is `acceleration`, then `v' = v + a'` and `s' = s + v'`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AxisCountMismatch`] if `acceleration` does not
    /// have one entry per axis.
    pub fn step(&self, acceleration: &[f64]) -> Result<Self, StateError> {
        if acceleration.len() != self.dimensions() {
            return Err(StateError::AxisCountMismatch {
                position: self.dimensions(),
                velocity: self.dimensions(),
                acceleration: acceleration.len(),
            });
        }
        let velocity = vector::add(&self.velocity, acceleration);
        let position = vector::add(&self.position, &velocity);
        Ok(Self {
            position,
            velocity,
            acceleration: acceleration.to_vec(),
        })
    }

    /// Copy of this state with every component rounded onto the grid.
    #[must_use]
    pub fn rounded(&self, precision: Precision) -> Self {
        let decimals = precision.decimals();
        Self {
            position: vector::round(&self.position, decimals),
            velocity: vector::round(&self.velocity, decimals),
            acceleration: vector::round(&self.acceleration, decimals),
        }
    }

    /// Quantized dedup key under `precision`.
    #[must_use]
    pub fn key(&self, precision: Precision) -> StateKey {
        StateKey(
            self.position
                .iter()
                .chain(&self.velocity)
                .chain(&self.acceleration)
                .map(|x| precision.ticks(*x))
                .collect(),
        )
    }
}
