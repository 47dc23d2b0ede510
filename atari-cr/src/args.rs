//! Command line arguments.
use clap::{ArgAction, Parser};

/// Parses a boolean flag value.
///
/// Accepts `y`, `yes`, `t`, `true`, `on`, `1` and `n`, `no`, `f`, `false`,
/// `off`, `0`, ignoring case.
pub fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        _ => Err(format!("invalid truth value {:?}", s)),
    }
}

/// Train a DQN agent with computational rationality in a foveal Atari environment
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// The name of this experiment
    #[arg(long, default_value = "atari_cr")]
    pub exp_name: String,

    /// Seed of the experiment
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub seed: i64,

    /// Run on a CUDA device
    #[arg(long, default_value_t = true, num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set, value_parser = parse_bool)]
    pub cuda: bool,

    /// Save records of evaluation episodes
    #[arg(long, default_value_t = false, num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set, value_parser = parse_bool)]
    pub capture_video: bool,

    /// The id of the game, like breakout
    #[arg(long, default_value = "breakout")]
    pub env: String,

    /// The number of training environments
    #[arg(long, default_value_t = 1)]
    pub env_num: usize,

    /// The number of stacked frames
    #[arg(long, default_value_t = 4)]
    pub frame_stack: usize,

    /// The number of frames a motor action is repeated for
    #[arg(long, default_value_t = 4)]
    pub action_repeat: usize,

    /// Replace rewards by their sign
    #[arg(long, default_value_t = false, num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set, value_parser = parse_bool)]
    pub clip_reward: bool,

    /// Size of the fovea in pixels
    #[arg(long, default_value_t = 50)]
    pub fov_size: usize,

    /// Initial location of the fovea, in both axes
    #[arg(long, default_value_t = 0)]
    pub fov_init_loc: usize,

    /// How sensory actions are interpreted, either absolute or relative
    #[arg(long, default_value = "absolute")]
    pub sensory_action_mode: String,

    /// Maximum displacement of the fovea in one relative sensory step
    #[arg(long, default_value_t = 10)]
    pub sensory_action_space: i32,

    /// Resize the foveal crop to the full observation
    #[arg(long, default_value_t = false)]
    pub resize_to_full: bool,

    /// The number of discrete sensory actions along rows
    #[arg(long, default_value_t = 4)]
    pub sensory_action_x_size: usize,

    /// The number of discrete sensory actions along columns
    #[arg(long, default_value_t = 4)]
    pub sensory_action_y_size: usize,

    /// The number of observations combined in the PVM buffer
    #[arg(long, default_value_t = 3)]
    pub pvm_stack: usize,

    /// Total timesteps of the experiment
    #[arg(long, default_value_t = 3000000)]
    pub total_timesteps: usize,

    /// Learning rate of the optimizer
    #[arg(long, default_value_t = 1e-4)]
    pub learning_rate: f64,

    /// Size of the replay buffer
    #[arg(long, default_value_t = 500000)]
    pub buffer_size: usize,

    /// Discount factor
    #[arg(long, default_value_t = 0.99)]
    pub gamma: f64,

    /// Timesteps between updates of the target network
    #[arg(long, default_value_t = 1000)]
    pub target_network_frequency: usize,

    /// Batch size of samples from the replay buffer
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Starting epsilon for exploration
    #[arg(long, default_value_t = 1.0)]
    pub start_e: f32,

    /// Ending epsilon for exploration
    #[arg(long, default_value_t = 0.01)]
    pub end_e: f32,

    /// Fraction of total timesteps it takes from start-e to end-e
    #[arg(long, default_value_t = 0.1)]
    pub exploration_fraction: f32,

    /// Timestep to start learning
    #[arg(long, default_value_t = 80000)]
    pub learning_start: usize,

    /// Timesteps between training iterations
    #[arg(long, default_value_t = 4)]
    pub train_frequency: usize,

    /// Timesteps between evaluations, -1 for an evaluation at the end
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub eval_frequency: i64,

    /// The number of evaluation episodes
    #[arg(long, default_value_t = 10)]
    pub eval_num: usize,

    /// Cost of a pause
    #[arg(long, default_value_t = 0.01)]
    pub pause_cost: f32,

    /// The number of successive pauses before a random motor action is played instead
    #[arg(long, default_value_t = 20)]
    pub successive_pause_limit: usize,

    /// Ignore the sugarl term of the loss
    #[arg(long, default_value_t = false)]
    pub ignore_sugarl: bool,

    /// Additional cost of a pause that does not move the fovea
    #[arg(long, default_value_t = 0.1)]
    pub no_action_pause_cost: f32,

    /// Filter gradients with grokfast
    #[arg(long, default_value_t = false)]
    pub grokfast: bool,

    /// Use foveal environments without the pause action
    #[arg(long, default_value_t = false)]
    pub no_pause_env: bool,

    /// Directory of tensorboard logs
    #[arg(long, default_value = "runs")]
    pub log_dir: String,

    /// Directory of episode records
    #[arg(long, default_value = "recordings")]
    pub record_dir: String,

    /// Print the configuration and exit
    #[arg(long, default_value_t = false)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        for s in ["y", "YES", "t", "True", "on", "1"] {
            assert_eq!(parse_bool(s), Ok(true));
        }
        for s in ["n", "No", "f", "FALSE", "off", "0"] {
            assert_eq!(parse_bool(s), Ok(false));
        }
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["atari_cr"]);
        assert_eq!(args.exp_name, "atari_cr");
        assert_eq!(args.seed, 1);
        assert!(args.cuda);
        assert!(!args.capture_video);
        assert_eq!(args.env, "breakout");
        assert_eq!(args.sensory_action_mode, "absolute");
        assert_eq!(args.total_timesteps, 3000000);
        assert_eq!(args.eval_frequency, -1);
        assert_eq!(args.successive_pause_limit, 20);
        assert!(!args.no_pause_env);
    }

    #[test]
    fn test_bool_flags_with_and_without_values() {
        let args = Args::parse_from([
            "atari_cr",
            "--cuda",
            "off",
            "--capture-video",
            "--clip-reward",
            "yes",
            "--no-pause-env",
            "--eval-frequency",
            "-1",
        ]);
        assert!(!args.cuda);
        assert!(args.capture_video);
        assert!(args.clip_reward);
        assert!(args.no_pause_env);

        assert!(Args::try_parse_from(["atari_cr", "--cuda", "maybe"]).is_err());
    }
}
