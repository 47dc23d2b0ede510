//! Foveal environments with or without the pause action.
use crate::{
    AtariEnvConfig, AtariGame, CrAct, CrActSpace, CrInfo, CrObs, FovealEnv, PauseableFovealEnv,
    SensoryActionMode,
};
use anyhow::Result;
use atari_cr_core::{record::Record, space::BoxSpace, Env, Step};
use std::path::Path;

/// A foveal environment, either bare or wrapped with the pause action.
pub enum CrEnv<G: AtariGame> {
    /// A bare foveal environment.
    Foveal(FovealEnv<G>),

    /// A foveal environment with the pause action.
    Pauseable(PauseableFovealEnv<G>),
}

impl<G: AtariGame> CrEnv<G> {
    fn foveal(&self) -> &FovealEnv<G> {
        match self {
            Self::Foveal(env) => env,
            Self::Pauseable(env) => env.inner(),
        }
    }

    fn foveal_mut(&mut self) -> &mut FovealEnv<G> {
        match self {
            Self::Foveal(env) => env,
            Self::Pauseable(env) => env.inner_mut(),
        }
    }

    /// The configuration of the underlying foveal environment.
    pub fn config(&self) -> &AtariEnvConfig {
        self.foveal().config()
    }

    /// The resolved sensory action mode.
    pub fn mode(&self) -> SensoryActionMode {
        self.foveal().mode()
    }

    /// Returns `true` if the pause action is available.
    pub fn is_pauseable(&self) -> bool {
        matches!(self, Self::Pauseable(_))
    }

    /// The number of motor actions, including the pause action if any.
    pub fn n_motor_actions(&self) -> usize {
        self.action_space().motor().n()
    }

    /// Shape of observations, `[frame_stack, rows, cols]`.
    pub fn obs_shape(&self) -> [usize; 3] {
        self.foveal().obs_shape()
    }

    /// The action space.
    pub fn action_space(&self) -> &CrActSpace {
        match self {
            Self::Foveal(env) => env.action_space(),
            Self::Pauseable(env) => env.action_space(),
        }
    }

    /// The action space, mutable for seeding and sampling.
    pub fn action_space_mut(&mut self) -> &mut CrActSpace {
        match self {
            Self::Foveal(env) => env.action_space_mut(),
            Self::Pauseable(env) => env.action_space_mut(),
        }
    }

    /// The observation space, mutable for seeding and sampling.
    pub fn observation_space_mut(&mut self) -> &mut BoxSpace<u8> {
        self.foveal_mut().observation_space_mut()
    }

    /// Seeds the samplers of the action space and the observation space.
    pub fn seed_spaces(&mut self, seed: u64) {
        match self {
            Self::Foveal(env) => env.seed_spaces(seed),
            Self::Pauseable(env) => env.seed_spaces(seed),
        }
    }

    /// Returns `true` if episodes are captured.
    pub fn is_recording(&self) -> bool {
        self.foveal().is_recording()
    }

    /// See [`FovealEnv::save_record_to_file`].
    pub fn save_record_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.foveal().save_record_to_file(path)
    }
}

impl<G: AtariGame> Env for CrEnv<G> {
    type Obs = CrObs;
    type Act = CrAct;
    type Info = CrInfo;

    fn step(&mut self, a: &CrAct) -> Result<(Step<Self>, Record)> {
        match self {
            Self::Foveal(env) => {
                let (step, record) = env.step(a)?;
                Ok((step.cast(), record))
            }
            Self::Pauseable(env) => {
                let (step, record) = env.step(a)?;
                Ok((step.cast(), record))
            }
        }
    }

    fn reset(&mut self) -> Result<CrObs> {
        match self {
            Self::Foveal(env) => env.reset(),
            Self::Pauseable(env) => env.reset(),
        }
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<CrObs> {
        match self {
            Self::Foveal(env) => env.reset_with_index(ix),
            Self::Pauseable(env) => env.reset_with_index(ix),
        }
    }

    fn close(&mut self) {
        match self {
            Self::Foveal(env) => env.close(),
            Self::Pauseable(env) => env.close(),
        }
    }
}

impl<G: AtariGame> From<FovealEnv<G>> for CrEnv<G> {
    fn from(env: FovealEnv<G>) -> Self {
        Self::Foveal(env)
    }
}

impl<G: AtariGame> From<PauseableFovealEnv<G>> for CrEnv<G> {
    fn from(env: PauseableFovealEnv<G>) -> Self {
        Self::Pauseable(env)
    }
}
