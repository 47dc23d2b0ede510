//! Observation of foveal environments.
use atari_cr_core::Obs;

/// Stacked grayscale frames, `shape = [n_stack, rows, cols]`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CrObs {
    /// Pixel values.
    pub frames: Vec<u8>,

    /// Shape of `frames`.
    pub shape: [usize; 3],
}

impl CrObs {
    /// Constructs an observation. `frames.len()` must match `shape`.
    pub fn new(frames: Vec<u8>, shape: [usize; 3]) -> Self {
        debug_assert_eq!(frames.len(), shape.iter().product::<usize>());
        Self { frames, shape }
    }

    /// The `i`-th frame of the stack, the last one being the newest.
    pub fn frame(&self, i: usize) -> &[u8] {
        let n = self.shape[1] * self.shape[2];
        &self.frames[i * n..(i + 1) * n]
    }
}

impl Obs for CrObs {
    fn dummy() -> Self {
        Self {
            frames: vec![],
            shape: [0, 0, 0],
        }
    }

    fn len(&self) -> usize {
        self.frames.len()
    }
}
