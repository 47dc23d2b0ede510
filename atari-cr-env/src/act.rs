//! Action of foveal environments.
use atari_cr_core::{
    space::{derive_seeds, BoxSpace, Discrete, Space},
    Act,
};
use serde::{Deserialize, Serialize};

/// A pair of a motor action and a sensory action.
///
/// `motor` indexes the minimal action set of the game. Pauseable environments
/// accept one more index, the pause action. `sensory` is `[row, col]`, either a
/// location or a displacement of the fovea depending on the
/// [`SensoryActionMode`](crate::SensoryActionMode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrAct {
    /// Motor action.
    pub motor: usize,

    /// Sensory action.
    pub sensory: [i32; 2],
}

impl CrAct {
    /// Constructs an action.
    pub fn new(motor: usize, sensory: [i32; 2]) -> Self {
        Self { motor, sensory }
    }
}

impl Act for CrAct {
    fn len(&self) -> usize {
        2
    }
}

/// Action space `{ motor: Discrete(n), sensory: Box(low, high, [2]) }`.
#[derive(Debug, Clone)]
pub struct CrActSpace {
    motor: Discrete,
    sensory: BoxSpace<i32>,
}

impl CrActSpace {
    /// Constructs the space with per-axis sensory bounds `[row, col]`.
    pub fn new(n_motor: usize, sensory_low: [i32; 2], sensory_high: [i32; 2]) -> Self {
        Self {
            motor: Discrete::new(n_motor),
            sensory: BoxSpace::new(sensory_low.to_vec(), sensory_high.to_vec(), &[2]),
        }
    }

    /// The motor part.
    pub fn motor(&self) -> &Discrete {
        &self.motor
    }

    /// The sensory part.
    pub fn sensory(&self) -> &BoxSpace<i32> {
        &self.sensory
    }
}

impl Space for CrActSpace {
    type Item = CrAct;

    fn sample(&mut self) -> CrAct {
        let s = self.sensory.sample();
        CrAct {
            motor: self.motor.sample(),
            sensory: [s[0], s[1]],
        }
    }

    fn seed(&mut self, seed: u64) {
        let seeds = derive_seeds(seed, 2);
        self.motor.seed(seeds[0]);
        self.sensory.seed(seeds[1]);
    }

    fn contains(&self, x: &CrAct) -> bool {
        self.motor.contains(&x.motor) && self.sensory.contains(&x.sensory.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_respect_per_axis_bounds() {
        let mut space = CrActSpace::new(3, [0, 0], [34, 10]);
        space.seed(42);
        let samples: Vec<_> = (0..300).map(|_| space.sample()).collect();
        assert!(samples.iter().all(|a| space.contains(a)));
        assert!(samples.iter().any(|a| a.sensory[0] > 10));
        assert!(!space.contains(&CrAct::new(3, [0, 0])));
        assert!(!space.contains(&CrAct::new(0, [0, 11])));
    }

    #[test]
    fn test_seeding_repeats_samples() {
        let mut a = CrActSpace::new(6, [-10, -10], [10, 10]);
        let mut b = CrActSpace::new(6, [-10, -10], [10, 10]);
        a.seed(5);
        b.seed(5);
        for _ in 0..50 {
            assert_eq!(a.sample(), b.sample());
        }
    }
}
