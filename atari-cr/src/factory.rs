//! Construction of foveal environments for training and evaluation.
use crate::config::{EnvOverrides, RunParameters};
use anyhow::Result;
use atari_cr_env::{
    AtariGame, CrEnv, EnvBuilder, FovealEnv, ModeSetting, PauseableFovealEnv, SyncVecEnv,
};
use log::debug;
use std::{marker::PhantomData, sync::Arc};

/// Builds an environment with seed `run.seed + seed_offset`.
///
/// The effective seed is used for the environment configuration and for the
/// samplers of its action and observation spaces. Values in `overrides` take
/// precedence over the run parameters.
///
/// With `no_pause_env`, a bare [`FovealEnv`] is built and receives the mode as a
/// label. Otherwise the environment is wrapped with the pause action and
/// receives the resolved mode.
pub fn build_environment<G: AtariGame>(
    seed_offset: i64,
    run: &RunParameters,
    overrides: &EnvOverrides,
) -> Result<CrEnv<G>> {
    let seed = run.seed + seed_offset;
    let config = overrides.apply(run.env_config(seed));
    debug!("Building environment {} with seed {}", config.game, seed);

    let mut env: CrEnv<G> = match run.no_pause_env {
        true => {
            let config =
                config.sensory_action_mode(ModeSetting::Label(run.sensory_action_mode.to_string()));
            FovealEnv::build(&config)?.into()
        }
        false => {
            let config = config.sensory_action_mode(run.sensory_action_mode);
            let env = FovealEnv::build(&config)?;
            PauseableFovealEnv::new(
                env,
                &config,
                run.pause_cost,
                run.successive_pause_limit,
                run.no_action_pause_cost,
            )
            .into()
        }
    };
    env.seed_spaces(seed as u64);

    Ok(env)
}

/// Makes builders of environments sharing the parameters of a run.
pub struct EnvFactory<G> {
    run: Arc<RunParameters>,
    phantom: PhantomData<fn() -> G>,
}

impl<G> Clone for EnvFactory<G> {
    fn clone(&self) -> Self {
        Self {
            run: self.run.clone(),
            phantom: PhantomData,
        }
    }
}

impl<G: AtariGame + 'static> EnvFactory<G> {
    /// Constructs a factory.
    pub fn new(run: RunParameters) -> Self {
        Self {
            run: Arc::new(run),
            phantom: PhantomData,
        }
    }

    /// The parameters of the run.
    pub fn run(&self) -> &RunParameters {
        &self.run
    }

    /// Returns a deferred constructor of an environment. See [`build_environment`].
    pub fn make_env(&self, seed_offset: i64, overrides: EnvOverrides) -> EnvBuilder<CrEnv<G>> {
        let run = self.run.clone();
        Box::new(move || build_environment(seed_offset, &run, &overrides))
    }

    /// Training environments with seed offsets `0..env_num`.
    pub fn make_train_env(&self) -> Result<SyncVecEnv<CrEnv<G>>> {
        let builders = (0..self.run.env_num as i64)
            .map(|i| self.make_env(i, EnvOverrides::default()))
            .collect();
        SyncVecEnv::new(builders)
    }

    /// A single evaluation environment with seed offset `seed_offset`.
    ///
    /// Episodes are not ended by a lost life, and are captured if
    /// `capture_video` is set.
    pub fn make_eval_env(&self, seed_offset: i64) -> Result<SyncVecEnv<CrEnv<G>>> {
        let overrides = EnvOverrides::eval(self.run.capture_video);
        SyncVecEnv::new(vec![self.make_env(seed_offset, overrides)])
    }
}
