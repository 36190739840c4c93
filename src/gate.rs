//! Fixed-timestep gate decoupling discrete steps from the frame delta.

use crate::error::SimError;

/// Accumulates frame deltas and fires once the interval is exceeded
///
/// On firing the accumulator keeps the remainder (`acc % interval`) rather
/// than resetting, so long-run step rate tracks wall time.
#[derive(Debug, Clone)]
pub struct FixedStepGate {
    interval_s: f32,
    accumulator_s: f32,
    fired: u64,
}

impl FixedStepGate {
    pub fn new(interval_s: f32) -> Result<Self, SimError> {
        if !interval_s.is_finite() || interval_s <= 0.0 {
            return Err(SimError::InvalidInterval(interval_s));
        }
        Ok(Self {
            interval_s,
            accumulator_s: 0.0,
            fired: 0,
        })
    }

    /// Add one frame's elapsed time; negative or non-finite deltas are ignored
    pub fn accumulate(&mut self, dt_s: f32) {
        if dt_s.is_finite() && dt_s > 0.0 {
            self.accumulator_s += dt_s;
        }
    }

    /// Fire at most once, keeping the remainder
    pub fn fire(&mut self) -> bool {
        if self.accumulator_s > self.interval_s {
            self.accumulator_s %= self.interval_s;
            self.fired += 1;
            true
        } else {
            false
        }
    }

    pub fn interval_s(&self) -> f32 {
        self.interval_s
    }

    pub fn accumulator_s(&self) -> f32 {
        self.accumulator_s
    }

    /// Total firings so far
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_interval() {
        assert_eq!(
            FixedStepGate::new(0.0).unwrap_err(),
            SimError::InvalidInterval(0.0)
        );
        assert!(FixedStepGate::new(-1.0).is_err());
        assert!(FixedStepGate::new(f32::NAN).is_err());
    }

    #[test]
    fn test_two_firings_over_1_2_seconds() {
        let mut gate = FixedStepGate::new(0.5).unwrap();
        let mut firings = 0;

        for _ in 0..12 {
            gate.accumulate(0.1);
            if gate.fire() {
                firings += 1;
            }
        }

        assert_eq!(firings, 2);
        assert_eq!(gate.fired(), 2);
        assert!((gate.accumulator_s() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_remainder_retained() {
        let mut gate = FixedStepGate::new(0.5).unwrap();
        gate.accumulate(0.7);
        assert!(gate.fire());
        assert!((gate.accumulator_s() - 0.2).abs() < 1e-6);
        assert!(!gate.fire());
    }

    #[test]
    fn test_exact_interval_does_not_fire() {
        let mut gate = FixedStepGate::new(0.5).unwrap();
        gate.accumulate(0.5);
        assert!(!gate.fire());
    }

    #[test]
    fn test_long_stall_fires_once() {
        // Modulo collapses a long stall into a single step
        let mut gate = FixedStepGate::new(0.5).unwrap();
        gate.accumulate(2.3);
        assert!(gate.fire());
        assert!(!gate.fire());
        assert!((gate.accumulator_s() - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_ignores_bad_deltas() {
        let mut gate = FixedStepGate::new(0.5).unwrap();
        gate.accumulate(-1.0);
        gate.accumulate(f32::INFINITY);
        assert_eq!(gate.accumulator_s(), 0.0);
    }
}
