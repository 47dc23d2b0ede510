//! Computational rationality agents.
mod config;
mod pvm;
mod tabular;
mod sensory;
use anyhow::Result;
use atari_cr_core::record::Recorder;
use atari_cr_env::{AtariGame, CrEnv, SyncVecEnv};
pub use config::CrdqnConfig;
pub use pvm::PvmBuffer;
pub use tabular::TabularCrAgent;
pub use sensory::SensoryActionSet;

/// Makes the evaluation environment of the given episode index.
pub type EvalEnvFactory<G> = Box<dyn Fn(i64) -> Result<SyncVecEnv<CrEnv<G>>>>;

/// An agent interacting with foveal environments.
pub trait CrAgent {
    /// Acts and trains for `total_timesteps` steps, summed over environments.
    ///
    /// `env_name` and `exp_name` name the directory of episode records.
    fn learn(&mut self, total_timesteps: usize, env_name: &str, exp_name: &str) -> Result<()>;
}

/// Constructs the agent of a run.
pub fn create_agent<G, R>(
    env: SyncVecEnv<CrEnv<G>>,
    eval_env_factory: EvalEnvFactory<G>,
    sugarl_r_scale: f32,
    config: CrdqnConfig,
    recorder: R,
) -> Result<TabularCrAgent<G, R>>
where
    G: AtariGame,
    R: Recorder,
{
    TabularCrAgent::build(env, eval_env_factory, sugarl_r_scale, config, recorder)
}
