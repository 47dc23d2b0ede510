//! Configuration of computational rationality agents.
use crate::config::RunParameters;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of a DQN agent with computational rationality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrdqnConfig {
    /// Seed of the run, used in the names of record files.
    pub seed: i64,

    /// Size of the fovea.
    pub fov_size: usize,

    /// The number of discrete sensory actions along rows and columns.
    pub sensory_action_space_granularity: (usize, usize),

    pub learning_rate: f64,
    pub replay_buffer_size: usize,

    /// The number of stacked frames in an observation.
    pub channel_stack_size: usize,

    /// The number of recent observations combined for action selection.
    pub pvm_stack_size: usize,

    /// Start and end of the exploration rate.
    pub epsilon_interval: (f32, f32),

    /// Fraction of the total timesteps it takes the exploration rate to reach its end.
    pub exploration_fraction: f32,

    pub batch_size: usize,
    pub learning_start: usize,
    pub train_frequency: usize,
    pub target_network_frequency: usize,

    /// Timesteps between evaluations, `-1` for a single evaluation at the end.
    pub eval_frequency: i64,

    pub gamma: f64,

    /// The number of evaluation episodes.
    pub n_evals: usize,

    pub ignore_sugarl: bool,
    pub grokfast: bool,

    /// Directory of episode records.
    pub record_dir: String,
}

impl Default for CrdqnConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            fov_size: 50,
            sensory_action_space_granularity: (4, 4),
            learning_rate: 1e-4,
            replay_buffer_size: 100_000,
            channel_stack_size: 4,
            pvm_stack_size: 3,
            epsilon_interval: (1.0, 0.01),
            exploration_fraction: 0.1,
            batch_size: 32,
            learning_start: 80_000,
            train_frequency: 4,
            target_network_frequency: 1000,
            eval_frequency: -1,
            gamma: 0.99,
            n_evals: 10,
            ignore_sugarl: false,
            grokfast: false,
            record_dir: "recordings".to_string(),
        }
    }
}

impl From<&RunParameters> for CrdqnConfig {
    fn from(run: &RunParameters) -> Self {
        Self {
            seed: run.seed,
            fov_size: run.fov_size,
            sensory_action_space_granularity: (
                run.sensory_action_x_size,
                run.sensory_action_y_size,
            ),
            learning_rate: run.learning_rate,
            replay_buffer_size: run.buffer_size,
            channel_stack_size: run.frame_stack,
            pvm_stack_size: run.pvm_stack,
            epsilon_interval: (run.start_e, run.end_e),
            exploration_fraction: run.exploration_fraction,
            batch_size: run.batch_size,
            learning_start: run.learning_start,
            train_frequency: run.train_frequency,
            target_network_frequency: run.target_network_frequency,
            eval_frequency: run.eval_frequency,
            gamma: run.gamma,
            n_evals: run.eval_num,
            ignore_sugarl: run.ignore_sugarl,
            grokfast: run.grokfast,
            record_dir: run.record_dir.clone(),
        }
    }
}

impl CrdqnConfig {
    /// Sets the seed.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the timestep at which training starts.
    pub fn learning_start(mut self, v: usize) -> Self {
        self.learning_start = v;
        self
    }

    /// Sets the interval of evaluations.
    pub fn eval_frequency(mut self, v: i64) -> Self {
        self.eval_frequency = v;
        self
    }

    /// Sets the number of evaluation episodes.
    pub fn n_evals(mut self, v: usize) -> Self {
        self.n_evals = v;
        self
    }

    /// Sets the directory of episode records.
    pub fn record_dir(mut self, v: impl Into<String>) -> Self {
        self.record_dir = v.into();
        self
    }

    /// Constructs [`CrdqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CrdqnConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new("crdqn_config")?;
        let path = dir.path().join("agent.yaml");
        let config = CrdqnConfig::default()
            .seed(3)
            .learning_start(100)
            .record_dir("/tmp/records");
        config.save(&path)?;
        assert_eq!(CrdqnConfig::load(&path)?, config);
        Ok(())
    }
}
