//! Training of computational rationality agents in foveal Atari environments.
//!
//! The crate assembles a run from command line [`Args`]:
//!
//! * [`RunParameters`] holds the parsed arguments, with the sensory action mode
//!   resolved once at startup.
//! * [`EnvFactory`] makes builders of foveal environments, seeded with
//!   `seed + offset`, for the training vector and for evaluation episodes.
//!   See [`build_environment`].
//! * [`agent`] defines the [`CrAgent`](agent::CrAgent) interface and the agent
//!   trained by [`train`].
//!
//! Records are written to tensorboard under `<log_dir>/<exp_name>`, episode
//! records of evaluations under `<record_dir>/<exp_name>/<env>`.
pub mod agent;
mod args;
mod config;
mod device;
mod factory;
mod sugarl;
pub mod util;
use agent::{create_agent, CrAgent, CrdqnConfig, EvalEnvFactory, TabularCrAgent};
use anyhow::Result;
pub use args::{parse_bool, Args};
use atari_cr_core::{record::Recorder, util::seed_everything};
use atari_cr_env::AtariGame;
use atari_cr_tensorboard::TensorboardRecorder;
use chrono::Local;
pub use config::{EnvOverrides, RunParameters, OBS_SIZE};
pub use device::select_device;
pub use factory::{build_environment, EnvFactory};
use log::info;
use std::{fs, path::Path};
pub use sugarl::sugarl_reward_scale;

/// Name of a run, like `breakout__atari_cr__1__20240102_150405`.
pub fn run_name(run: &RunParameters) -> String {
    format!(
        "{}__{}__{}__{}",
        run.env,
        run.exp_name,
        run.seed,
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Trains an agent, writing records to tensorboard.
pub fn train<G: AtariGame + 'static>(run: RunParameters) -> Result<()> {
    let log_dir = Path::new(&run.log_dir).join(&run.exp_name);
    fs::create_dir_all(&log_dir)?;
    let recorder = TensorboardRecorder::new(&log_dir);
    train_with_recorder::<G, _>(run, recorder)?;
    Ok(())
}

/// Trains an agent with the given recorder and returns it.
pub fn train_with_recorder<G, R>(run: RunParameters, mut recorder: R) -> Result<TabularCrAgent<G, R>>
where
    G: AtariGame + 'static,
    R: Recorder,
{
    info!("Run {}", run_name(&run));
    recorder.write_text("hyperparameters", &run.hyperparameter_table()?, 0);
    seed_everything(run.seed as u64);

    let device = select_device(run.cuda)?;
    info!("Device: {:?}", device);

    let sugarl_r_scale = sugarl_reward_scale(&run.env);
    let factory = EnvFactory::<G>::new(run.clone());
    let env = factory.make_train_env()?;
    let eval_env_factory: EvalEnvFactory<G> = {
        let factory = factory.clone();
        Box::new(move |seed_offset| factory.make_eval_env(seed_offset))
    };

    let config = CrdqnConfig::from(&run);
    let mut agent = create_agent(env, eval_env_factory, sugarl_r_scale, config, recorder)?;
    agent.learn(run.total_timesteps, &run.env, &run.exp_name)?;

    Ok(agent)
}
