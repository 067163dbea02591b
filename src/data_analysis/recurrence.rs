// src/data_analysis/recurrence.rs

use std::iter::FusedIterator;

use crate::controller_config::{BlendCoefficients, ControllerConstants};
use crate::types::TimeSeries;

/// Lazily iterates the closed-loop speed recurrence
///
/// `w[n+1] = w[n] + dT * (beta * w[n] + gamma * Kp * (w_d - (a * w[n] + b * w[n-1])))`
///
/// Yields the current value before each step, so the first item is `start`.
/// Finite and single-pass: once exhausted it stays exhausted.
#[derive(Debug, Clone)]
pub struct SpeedRecurrence {
    constants: ControllerConstants,
    coefficients: BlendCoefficients,
    current: f64,
    previous: f64,
    remaining: usize,
}

impl SpeedRecurrence {
    pub fn new(
        constants: ControllerConstants,
        coefficients: BlendCoefficients,
        start: f64,
        iterations: usize,
    ) -> Self {
        Self {
            constants,
            coefficients,
            current: start,
            previous: start,
            remaining: iterations,
        }
    }

    /// Controller output c[n] for the current carry state.
    fn control_effort(&self) -> f64 {
        let blended = self.coefficients.a * self.current + self.coefficients.b * self.previous;
        self.constants.kp * (self.constants.target_speed - blended)
    }

    fn next_speed(&self) -> f64 {
        let dt = self.constants.delta_t();
        self.current
            + dt * (self.constants.beta * self.current
                + self.constants.gamma * self.control_effort())
    }

    /// Repeat every produced value `factor` times.
    pub fn oversampled(self, factor: usize) -> Oversampled<Self> {
        Oversampled::new(self, factor)
    }
}

impl Iterator for SpeedRecurrence {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let value = self.current;
        let next = self.next_speed();
        self.previous = self.current;
        self.current = next;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SpeedRecurrence {}
impl FusedIterator for SpeedRecurrence {}

/// Repeats each item of the inner iterator a fixed number of times.
#[derive(Debug, Clone)]
pub struct Oversampled<I: Iterator> {
    inner: I,
    factor: usize,
    held: Option<I::Item>,
    repeats_left: usize,
}

impl<I: Iterator> Oversampled<I> {
    pub fn new(inner: I, factor: usize) -> Self {
        Self {
            inner,
            factor,
            held: None,
            repeats_left: 0,
        }
    }
}

impl<I> Iterator for Oversampled<I>
where
    I: Iterator,
    I::Item: Copy,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.factor == 0 {
            return None;
        }
        if self.repeats_left == 0 {
            self.held = self.inner.next();
            self.repeats_left = self.factor;
        }
        let value = self.held?;
        self.repeats_left -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.factor == 0 {
            return (0, Some(0));
        }
        let pending = if self.held.is_some() { self.repeats_left } else { 0 };
        let (lower, upper) = self.inner.size_hint();
        (
            lower.saturating_mul(self.factor).saturating_add(pending),
            upper.and_then(|u| u.checked_mul(self.factor)?.checked_add(pending)),
        )
    }
}

impl<I> FusedIterator for Oversampled<I>
where
    I: FusedIterator,
    I::Item: Copy,
{
}

/// Fixed point of the recurrence, if the loop has one.
///
/// With a proportional-only loop and a decaying plant this sits slightly below
/// the target speed.
pub fn steady_state(
    constants: &ControllerConstants,
    coefficients: &BlendCoefficients,
) -> Option<f64> {
    let dt = constants.delta_t();
    let gain = constants.loop_gain();
    // 1 - p + q with p = 1 + dT*beta - g*a and q = g*b
    let denominator = -dt * constants.beta + gain * (coefficients.a + coefficients.b);
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    Some(gain * constants.target_speed / denominator)
}

/// Time-stamped deviation `w - w_d` for the first `duration_s` seconds.
///
/// The sample count is `floor(duration_s / dT)`; each sample is held for
/// `oversample` sub-steps of `dT / oversample` seconds.
pub fn deviation_series(
    constants: &ControllerConstants,
    coefficients: &BlendCoefficients,
    start: f64,
    duration_s: f64,
    oversample: usize,
) -> TimeSeries {
    let dt = constants.delta_t();
    let num_points = if duration_s.is_finite() && duration_s > 0.0 {
        (duration_s / dt).floor() as usize
    } else {
        0
    };
    if oversample == 0 {
        return Vec::new();
    }
    let sub_step = dt / oversample as f64;
    SpeedRecurrence::new(*constants, *coefficients, start, num_points)
        .oversampled(oversample)
        .enumerate()
        .map(|(n, w)| (sub_step * n as f64, w - constants.target_speed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_recurrence(iterations: usize) -> SpeedRecurrence {
        SpeedRecurrence::new(
            ControllerConstants::default(),
            BlendCoefficients::default(),
            0.0,
            iterations,
        )
    }

    #[test]
    fn zero_iterations_is_empty() {
        assert_eq!(default_recurrence(0).count(), 0);
        assert_eq!(default_recurrence(0).oversampled(3).count(), 0);
    }

    #[test]
    fn first_value_is_start() {
        let mut it = SpeedRecurrence::new(
            ControllerConstants::default(),
            BlendCoefficients::default(),
            0.25,
            4,
        );
        assert_eq!(it.next(), Some(0.25));
    }

    #[test]
    fn second_value_matches_hand_computation() {
        let values: Vec<f64> = default_recurrence(2).collect();
        // From rest: w1 = dT * gamma * Kp * w_d
        let expected = (1.0 / 15.0) * 16.93 * 1.6;
        assert!((values[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn stays_exhausted() {
        let mut it = default_recurrence(2);
        assert!(it.next().is_some());
        assert!(it.next().is_some());
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn size_hint_is_exact() {
        let mut it = default_recurrence(5).oversampled(3);
        assert_eq!(it.size_hint(), (15, Some(15)));
        it.next();
        assert_eq!(it.size_hint(), (14, Some(14)));
        assert_eq!(it.count(), 14);
    }

    #[test]
    fn oversampling_repeats_each_value() {
        let plain: Vec<f64> = default_recurrence(6).collect();
        let repeated: Vec<f64> = default_recurrence(6).oversampled(3).collect();
        assert_eq!(repeated.len(), 18);
        for (i, chunk) in repeated.chunks(3).enumerate() {
            assert!(chunk.iter().all(|&v| v == plain[i]));
        }
    }

    #[test]
    fn zero_factor_yields_nothing() {
        assert_eq!(default_recurrence(10).oversampled(0).count(), 0);
    }

    #[test]
    fn steady_state_of_defaults() {
        let ss = steady_state(
            &ControllerConstants::default(),
            &BlendCoefficients::default(),
        )
        .unwrap();
        assert!((ss - 0.9756).abs() < 1e-3);
    }

    #[test]
    fn deviation_series_layout() {
        let series = deviation_series(
            &ControllerConstants::default(),
            &BlendCoefficients::default(),
            0.0,
            3.0,
            3,
        );
        let samples = (3.0 / ControllerConstants::default().delta_t()).floor() as usize;
        assert_eq!(series.len(), samples * 3);
        assert_eq!(series[0], (0.0, -1.0));
        assert_eq!(series[2].1, -1.0);
        assert!((series[3].0 - 1.0 / 15.0).abs() < 1e-12);
    }
}
