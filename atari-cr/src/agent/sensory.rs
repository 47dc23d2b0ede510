//! Discretized sensory actions.

/// Discrete set of sensory actions, the cross product of row and column steps.
///
/// Along each axis, the steps start at 0 and are spaced by
/// `max(1, (obs - fov) / granularity)`, keeping at most `granularity` of them
/// below `obs - fov`. An axis where the fovea covers the whole frame has the
/// single step 0.
#[derive(Debug, Clone, PartialEq)]
pub struct SensoryActionSet {
    actions: Vec<[i32; 2]>,
}

impl SensoryActionSet {
    /// Constructs the set for frames of `obs_size` and a square fovea of `fov_size`.
    pub fn new(obs_size: (usize, usize), fov_size: usize, granularity: (usize, usize)) -> Self {
        let rows = Self::axis(obs_size.0, fov_size, granularity.0);
        let cols = Self::axis(obs_size.1, fov_size, granularity.1);
        let actions = rows
            .iter()
            .flat_map(|&r| cols.iter().map(move |&c| [r, c]))
            .collect();
        Self { actions }
    }

    fn axis(obs: usize, fov: usize, granularity: usize) -> Vec<i32> {
        let max_step = obs.saturating_sub(fov);
        let step = (max_step / granularity.max(1)).max(1);
        (0..max_step.max(1))
            .step_by(step)
            .take(granularity.max(1))
            .map(|x| x as i32)
            .collect()
    }

    /// The number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The `i`-th action, `[row, col]`.
    pub fn get(&self, i: usize) -> [i32; 2] {
        self.actions[i]
    }

    /// All actions.
    pub fn actions(&self) -> &[[i32; 2]] {
        &self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let set = SensoryActionSet::new((84, 84), 50, (4, 4));
        assert_eq!(set.len(), 16);
        assert_eq!(set.get(0), [0, 0]);
        assert_eq!(set.get(1), [0, 8]);
        assert_eq!(set.get(4), [8, 0]);
        assert_eq!(set.get(15), [24, 24]);
    }

    #[test]
    fn test_degenerate_axes_keep_origin() {
        let set = SensoryActionSet::new((84, 20), 20, (4, 4));
        assert_eq!(set.len(), 4);
        assert!(set.actions().iter().all(|a| a[1] == 0));

        let set = SensoryActionSet::new((10, 10), 8, (4, 3));
        assert_eq!(set.actions(), &[[0, 0], [0, 1], [1, 0], [1, 1]]);
    }
}
