//! Short-term memory of observations.
use atari_cr_env::CrObs;
use std::collections::VecDeque;

/// Holds the last `k` batches of observations of a vectorized environment.
///
/// The buffer starts with `k` zero observations.
#[derive(Debug, Clone)]
pub struct PvmBuffer {
    buffer: VecDeque<Vec<CrObs>>,
    k: usize,
}

impl PvmBuffer {
    /// Constructs a buffer of `k` batches of `n_envs` observations of shape `shape`.
    pub fn new(k: usize, n_envs: usize, shape: [usize; 3]) -> Self {
        let k = k.max(1);
        let zeros = CrObs::new(vec![0; shape.iter().product()], shape);
        Self {
            buffer: (0..k).map(|_| vec![zeros.clone(); n_envs]).collect(),
            k,
        }
    }

    /// Appends a batch, dropping the oldest one.
    pub fn append(&mut self, obs: Vec<CrObs>) {
        if self.buffer.len() == self.k {
            self.buffer.pop_front();
        }
        self.buffer.push_back(obs);
    }

    /// Element-wise maximum over the stored batches.
    pub fn stack_max(&self) -> Vec<CrObs> {
        let mut iter = self.buffer.iter();
        let mut max = match iter.next() {
            Some(first) => first.clone(),
            None => return vec![],
        };
        for batch in iter {
            for (m, o) in max.iter_mut().zip(batch.iter()) {
                m.frames
                    .iter_mut()
                    .zip(o.frames.iter())
                    .for_each(|(a, b)| *a = (*a).max(*b));
            }
        }
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(v: Vec<u8>) -> CrObs {
        CrObs::new(v, [1, 1, 3])
    }

    #[test]
    fn test_stack_max_keeps_last_k_batches() {
        let mut pvm = PvmBuffer::new(2, 1, [1, 1, 3]);
        assert_eq!(pvm.stack_max(), vec![obs(vec![0, 0, 0])]);

        pvm.append(vec![obs(vec![5, 0, 1])]);
        assert_eq!(pvm.stack_max(), vec![obs(vec![5, 0, 1])]);

        pvm.append(vec![obs(vec![1, 2, 0])]);
        assert_eq!(pvm.stack_max(), vec![obs(vec![5, 2, 1])]);

        pvm.append(vec![obs(vec![0, 0, 3])]);
        assert_eq!(pvm.stack_max(), vec![obs(vec![1, 2, 3])]);
    }
}
