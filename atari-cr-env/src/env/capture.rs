//! Episode records of foveal environments.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Frames and actions of an episode.
///
/// Frames are full-size grayscale frames before the fovea is applied, so the
/// fovea can be drawn on them when the record is replayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Size `(rows, cols)` of the frames.
    pub frame_size: (usize, usize),

    /// Size of the fovea.
    pub fov_size: (usize, usize),

    /// One frame per step, the frame at reset first.
    pub frames: Vec<Vec<u8>>,

    /// Location of the fovea at each frame.
    pub fov_locs: Vec<[i32; 2]>,

    /// Motor action of each step.
    pub motor_actions: Vec<usize>,

    /// Reward of each step.
    pub rewards: Vec<f32>,

    /// `true` for pause steps.
    pub pauses: Vec<bool>,
}

impl EpisodeRecord {
    pub(crate) fn new(frame_size: (usize, usize), fov_size: (usize, usize)) -> Self {
        Self {
            frame_size,
            fov_size,
            ..Default::default()
        }
    }

    /// The number of steps in the record.
    pub fn len(&self) -> usize {
        self.motor_actions.len()
    }

    /// Returns `true` if no step has been recorded.
    pub fn is_empty(&self) -> bool {
        self.motor_actions.is_empty()
    }

    pub(crate) fn push_frame(&mut self, frame: &[u8], fov_loc: [i32; 2]) {
        self.frames.push(frame.to_vec());
        self.fov_locs.push(fov_loc);
    }

    pub(crate) fn push_step(&mut self, motor: usize, reward: f32, is_pause: bool) {
        self.motor_actions.push(motor);
        self.rewards.push(reward);
        self.pauses.push(is_pause);
    }

    /// Saves the record with `bincode`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        bincode::serialize_into(file, self)?;
        Ok(())
    }

    /// Loads a record saved with [`EpisodeRecord::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(file)?)
    }
}

/// Capture of the current and the last finished episode.
#[derive(Debug)]
pub(crate) struct Capture {
    current: EpisodeRecord,
    last: Option<EpisodeRecord>,
}

impl Capture {
    pub fn new(frame_size: (usize, usize), fov_size: (usize, usize)) -> Self {
        Self {
            current: EpisodeRecord::new(frame_size, fov_size),
            last: None,
        }
    }

    /// Starts a new episode, keeping the previous one if it has any step.
    pub fn start(&mut self) {
        let fresh = EpisodeRecord::new(self.current.frame_size, self.current.fov_size);
        let prev = std::mem::replace(&mut self.current, fresh);
        if !prev.is_empty() {
            self.last = Some(prev);
        }
    }

    pub fn current_mut(&mut self) -> &mut EpisodeRecord {
        &mut self.current
    }

    /// The last finished episode, or the current one if none has finished.
    pub fn latest(&self) -> &EpisodeRecord {
        self.last.as_ref().unwrap_or(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_finished_episode_survives_reset() {
        let mut capture = Capture::new((4, 4), (2, 2));
        capture.start();
        capture.current_mut().push_frame(&[0; 16], [0, 0]);
        capture.current_mut().push_step(1, 1.0, false);
        capture.start();
        capture.current_mut().push_frame(&[0; 16], [1, 1]);
        assert_eq!(capture.latest().len(), 1);
        assert_eq!(capture.latest().motor_actions, vec![1]);
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new("episode_record")?;
        let path = dir.path().join("record.bin");
        let mut record = EpisodeRecord::new((4, 4), (2, 2));
        record.push_frame(&[3; 16], [0, 1]);
        record.push_step(2, -0.5, true);
        record.save(&path)?;
        assert_eq!(EpisodeRecord::load(&path)?, record);
        Ok(())
    }
}
