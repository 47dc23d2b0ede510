//! Utilities for training loops.

/// Seeds the global random generator used by agents for exploration.
///
/// Space samplers own their generators and are seeded separately.
pub fn seed_everything(seed: u64) {
    fastrand::seed(seed);
}

/// Linearly interpolates from `start` to `end` over `duration` steps, then stays at `end`.
///
/// Used for the exploration rate of epsilon-greedy policies.
pub fn linear_schedule(start: f32, end: f32, duration: f32, t: usize) -> f32 {
    if duration <= 0.0 {
        return end;
    }
    let slope = (end - start) / duration;
    let v = slope * t as f32 + start;
    if start >= end {
        v.max(end)
    } else {
        v.min(end)
    }
}

#[cfg(test)]
mod tests {
    use super::linear_schedule;

    #[test]
    fn test_linear_schedule() {
        assert_eq!(linear_schedule(1.0, 0.01, 100.0, 0), 1.0);
        assert!((linear_schedule(1.0, 0.01, 100.0, 50) - 0.505).abs() < 1e-6);
        assert!((linear_schedule(1.0, 0.01, 100.0, 100) - 0.01).abs() < 1e-6);
        assert_eq!(linear_schedule(1.0, 0.01, 100.0, 1000), 0.01);
        assert_eq!(linear_schedule(1.0, 0.01, 0.0, 0), 0.01);
    }
}
