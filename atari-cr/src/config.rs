//! Parameters of a run.
use crate::args::Args;
use anyhow::Result;
use atari_cr_core::error::CrError;
use atari_cr_env::{AtariEnvConfig, SensoryActionMode};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Size of observed frames.
pub const OBS_SIZE: (usize, usize) = (84, 84);

/// Parameters of a run, built once from the command line arguments.
///
/// The sensory action mode is resolved when the parameters are built, so an
/// invalid mode stops the run before any environment is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub exp_name: String,
    pub seed: i64,
    pub cuda: bool,
    pub capture_video: bool,

    /// Game id, lowercase.
    pub env: String,
    pub env_num: usize,
    pub frame_stack: usize,
    pub action_repeat: usize,
    pub clip_reward: bool,

    pub fov_size: usize,
    pub fov_init_loc: usize,
    pub sensory_action_mode: SensoryActionMode,
    pub sensory_action_space: i32,
    pub resize_to_full: bool,
    pub sensory_action_x_size: usize,
    pub sensory_action_y_size: usize,
    pub pvm_stack: usize,

    pub total_timesteps: usize,
    pub learning_rate: f64,
    pub buffer_size: usize,
    pub gamma: f64,
    pub target_network_frequency: usize,
    pub batch_size: usize,
    pub start_e: f32,
    pub end_e: f32,
    pub exploration_fraction: f32,
    pub learning_start: usize,
    pub train_frequency: usize,
    pub eval_frequency: i64,
    pub eval_num: usize,

    pub pause_cost: f32,
    pub successive_pause_limit: usize,
    pub ignore_sugarl: bool,
    pub no_action_pause_cost: f32,
    pub grokfast: bool,
    pub no_pause_env: bool,

    pub log_dir: String,
    pub record_dir: String,
}

impl TryFrom<Args> for RunParameters {
    type Error = CrError;

    fn try_from(args: Args) -> Result<Self, CrError> {
        let sensory_action_mode = SensoryActionMode::from_string(&args.sensory_action_mode)?;

        Ok(Self {
            exp_name: args.exp_name,
            seed: args.seed,
            cuda: args.cuda,
            capture_video: args.capture_video,
            env: args.env.to_lowercase(),
            env_num: args.env_num,
            frame_stack: args.frame_stack,
            action_repeat: args.action_repeat,
            clip_reward: args.clip_reward,
            fov_size: args.fov_size,
            fov_init_loc: args.fov_init_loc,
            sensory_action_mode,
            sensory_action_space: args.sensory_action_space,
            resize_to_full: args.resize_to_full,
            sensory_action_x_size: args.sensory_action_x_size,
            sensory_action_y_size: args.sensory_action_y_size,
            pvm_stack: args.pvm_stack,
            total_timesteps: args.total_timesteps,
            learning_rate: args.learning_rate,
            buffer_size: args.buffer_size,
            gamma: args.gamma,
            target_network_frequency: args.target_network_frequency,
            batch_size: args.batch_size,
            start_e: args.start_e,
            end_e: args.end_e,
            exploration_fraction: args.exploration_fraction,
            learning_start: args.learning_start,
            train_frequency: args.train_frequency,
            eval_frequency: args.eval_frequency,
            eval_num: args.eval_num,
            pause_cost: args.pause_cost,
            successive_pause_limit: args.successive_pause_limit,
            ignore_sugarl: args.ignore_sugarl,
            no_action_pause_cost: args.no_action_pause_cost,
            grokfast: args.grokfast,
            no_pause_env: args.no_pause_env,
            log_dir: args.log_dir,
            record_dir: args.record_dir,
        })
    }
}

impl RunParameters {
    /// Configuration of an environment with the given seed.
    ///
    /// The sensory action mode is left at its default, the factory decides how
    /// the resolved mode is passed.
    pub fn env_config(&self, seed: i64) -> AtariEnvConfig {
        let s = self.sensory_action_space;
        AtariEnvConfig::default()
            .game(self.env.as_str())
            .seed(seed)
            .obs_size(OBS_SIZE)
            .frame_stack(self.frame_stack)
            .action_repeat(self.action_repeat)
            .fov_size((self.fov_size, self.fov_size))
            .fov_init_loc((self.fov_init_loc, self.fov_init_loc))
            .sensory_action_space((-s, s))
            .resize_to_full(self.resize_to_full)
            .clip_reward(self.clip_reward)
            .mask_out(true)
    }

    /// Markdown table of the parameters.
    pub fn hyperparameter_table(&self) -> Result<String> {
        let value = serde_yaml::to_value(self)?;
        let rows = match value {
            serde_yaml::Value::Mapping(m) => m
                .iter()
                .map(|(k, v)| {
                    let k = serde_yaml::to_string(k).unwrap_or_default();
                    let v = serde_yaml::to_string(v).unwrap_or_default();
                    format!("|{}|{}|", strip_yaml(&k), strip_yaml(&v))
                })
                .collect::<Vec<_>>(),
            _ => vec![],
        };
        Ok(format!("|param|value|\n|-|-|\n{}", rows.join("\n")))
    }

    /// Constructs [`RunParameters`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RunParameters`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

// serde_yaml 0.8 prefixes documents with `---`.
fn strip_yaml(s: &str) -> &str {
    s.trim_start_matches("---").trim()
}

/// Values that take precedence over the run parameters for an environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvOverrides {
    pub training: Option<bool>,
    pub record: Option<bool>,
    pub clip_reward: Option<bool>,
    pub resize_to_full: Option<bool>,
    pub frame_stack: Option<usize>,
    pub action_repeat: Option<usize>,
}

impl EnvOverrides {
    /// Overrides for evaluation environments.
    pub fn eval(record: bool) -> Self {
        Self::default().training(false).record(record)
    }

    pub fn training(mut self, v: bool) -> Self {
        self.training = Some(v);
        self
    }

    pub fn record(mut self, v: bool) -> Self {
        self.record = Some(v);
        self
    }

    pub fn clip_reward(mut self, v: bool) -> Self {
        self.clip_reward = Some(v);
        self
    }

    pub fn resize_to_full(mut self, v: bool) -> Self {
        self.resize_to_full = Some(v);
        self
    }

    pub fn frame_stack(mut self, v: usize) -> Self {
        self.frame_stack = Some(v);
        self
    }

    pub fn action_repeat(mut self, v: usize) -> Self {
        self.action_repeat = Some(v);
        self
    }

    /// Applies the overrides to a configuration.
    pub fn apply(&self, mut config: AtariEnvConfig) -> AtariEnvConfig {
        if let Some(v) = self.training {
            config = config.training(v);
        }
        if let Some(v) = self.record {
            config = config.record(v);
        }
        if let Some(v) = self.clip_reward {
            config = config.clip_reward(v);
        }
        if let Some(v) = self.resize_to_full {
            config = config.resize_to_full(v);
        }
        if let Some(v) = self.frame_stack {
            config = config.frame_stack(v);
        }
        if let Some(v) = self.action_repeat {
            config = config.action_repeat(v);
        }
        config
    }
}
