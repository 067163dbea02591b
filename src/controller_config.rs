// src/controller_config.rs

use std::fmt;

use thiserror::Error;

use crate::constants::{
    COEFFICIENT_SUM_TOLERANCE, DEFAULT_BETA, DEFAULT_BLEND_A, DEFAULT_BLEND_B, DEFAULT_GAMMA,
    DEFAULT_KP, DEFAULT_SAMPLES_PER_SECOND, DEFAULT_TARGET_SPEED,
};

/// Rejected controller or blend configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControllerError {
    #[error("controller constant `{name}` must be finite (got {value})")]
    NonFinite { name: &'static str, value: f64 },
    #[error("sample rate must be positive (got {0} samples/s)")]
    NonPositiveSampleRate(f64),
    #[error("blend coefficients must sum to 1 (a = {a}, b = {b}, a + b = {sum})")]
    BlendSum { a: f64, b: f64, sum: f64 },
}

/// Gains and plant coefficients of the discrete proportional speed loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConstants {
    /// Proportional gain (Kp)
    pub kp: f64,
    /// Plant decay coefficient
    pub beta: f64,
    /// Plant input gain
    pub gamma: f64,
    /// Controller updates per second
    pub samples_per_second: f64,
    /// Target angular velocity w_d
    pub target_speed: f64,
}

impl Default for ControllerConstants {
    fn default() -> Self {
        Self {
            kp: DEFAULT_KP,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
            samples_per_second: DEFAULT_SAMPLES_PER_SECOND,
            target_speed: DEFAULT_TARGET_SPEED,
        }
    }
}

impl ControllerConstants {
    /// Build and validate a set of constants.
    pub fn new(
        kp: f64,
        beta: f64,
        gamma: f64,
        samples_per_second: f64,
        target_speed: f64,
    ) -> Result<Self, ControllerError> {
        let constants = Self {
            kp,
            beta,
            gamma,
            samples_per_second,
            target_speed,
        };
        constants.validate()?;
        Ok(constants)
    }

    pub fn validate(&self) -> Result<(), ControllerError> {
        let fields = [
            ("kp", self.kp),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("samples_per_second", self.samples_per_second),
            ("target_speed", self.target_speed),
        ];
        if let Some(&(name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ControllerError::NonFinite { name, value });
        }
        if self.samples_per_second <= 0.0 {
            return Err(ControllerError::NonPositiveSampleRate(
                self.samples_per_second,
            ));
        }
        Ok(())
    }

    /// Sample interval dT in seconds.
    pub fn delta_t(&self) -> f64 {
        1.0 / self.samples_per_second
    }

    /// Loop gain per sample: dT * gamma * Kp.
    pub fn loop_gain(&self) -> f64 {
        self.delta_t() * self.gamma * self.kp
    }
}

impl fmt::Display for ControllerConstants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Kp={}, beta={}, gamma={}, RPS={}",
            self.kp, self.beta, self.gamma, self.samples_per_second
        )
    }
}

/// Weights of the current (a) and previous (b) speed samples in the error term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendCoefficients {
    pub a: f64,
    pub b: f64,
}

impl Default for BlendCoefficients {
    fn default() -> Self {
        Self {
            a: DEFAULT_BLEND_A,
            b: DEFAULT_BLEND_B,
        }
    }
}

impl BlendCoefficients {
    /// Build a pair, rejecting it unless a + b = 1.
    pub fn new(a: f64, b: f64) -> Result<Self, ControllerError> {
        let sum = a + b;
        if !sum.is_finite() || (sum - 1.0).abs() > COEFFICIENT_SUM_TOLERANCE {
            return Err(ControllerError::BlendSum { a, b, sum });
        }
        Ok(Self { a, b })
    }

    /// Pair with b derived from a.
    pub fn from_a(a: f64) -> Self {
        Self { a, b: 1.0 - a }
    }
}

impl fmt::Display for BlendCoefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}
