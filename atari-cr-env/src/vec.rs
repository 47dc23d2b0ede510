//! Environments stepped in lockstep.
use anyhow::{Context, Result};
use atari_cr_core::{error::CrError, record::Record, Env};
use log::{error, info};

/// A deferred constructor of an environment.
pub type EnvBuilder<E> = Box<dyn FnOnce() -> Result<E>>;

/// The result of a step of [`SyncVecEnv`], one entry per environment.
pub struct VecStep<E: Env> {
    /// Observations after the step. For finished episodes, the initial
    /// observation of the next episode.
    pub obs: Vec<E::Obs>,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Flags of terminated episodes.
    pub is_terminated: Vec<bool>,

    /// Flags of truncated episodes.
    pub is_truncated: Vec<bool>,

    /// Information of the steps.
    pub infos: Vec<E::Info>,

    /// The terminal observation of finished episodes.
    pub final_obs: Vec<Option<E::Obs>>,

    /// Records of the steps.
    pub records: Vec<Record>,
}

impl<E: Env> VecStep<E> {
    /// Returns `true` if the episode of the `i`-th environment has finished.
    pub fn is_done(&self, i: usize) -> bool {
        self.is_terminated[i] || self.is_truncated[i]
    }

    /// Indices of environments whose episode has finished.
    pub fn done_indices(&self) -> Vec<usize> {
        (0..self.reward.len()).filter(|&i| self.is_done(i)).collect()
    }
}

/// Environments stepped sequentially with a batch of actions.
///
/// An environment whose episode ends is reset in the same step.
pub struct SyncVecEnv<E: Env> {
    envs: Vec<E>,
}

impl<E: Env> SyncVecEnv<E> {
    /// Builds environments in the order of `builders`.
    ///
    /// Every builder is invoked. If any fails, the environments that were built
    /// are closed and the first error is returned with the index of its builder.
    pub fn new(builders: Vec<EnvBuilder<E>>) -> Result<Self> {
        let mut envs = Vec::with_capacity(builders.len());
        let mut first_err = None;

        for (i, builder) in builders.into_iter().enumerate() {
            match builder().with_context(|| format!("Failed to build environment {}", i)) {
                Ok(env) => envs.push(env),
                Err(e) => {
                    error!("{:#}", e);
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_err {
            envs.iter_mut().for_each(|env| env.close());
            return Err(e);
        }

        info!("Built {} environments", envs.len());
        Ok(Self { envs })
    }

    /// The number of environments.
    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    /// The environments.
    pub fn envs(&self) -> &[E] {
        &self.envs
    }

    /// The environments, mutable.
    pub fn envs_mut(&mut self) -> &mut [E] {
        &mut self.envs
    }

    /// Resets all environments.
    pub fn reset(&mut self) -> Result<Vec<E::Obs>> {
        self.envs.iter_mut().map(|env| env.reset()).collect()
    }

    /// Steps all environments, `acts[i]` in the `i`-th one.
    pub fn step(&mut self, acts: &[E::Act]) -> Result<VecStep<E>> {
        if acts.len() != self.envs.len() {
            return Err(CrError::InvalidAction(format!(
                "Expected {} actions, got {}",
                self.envs.len(),
                acts.len()
            ))
            .into());
        }

        let n = self.envs.len();
        let mut vec_step = VecStep {
            obs: Vec::with_capacity(n),
            reward: Vec::with_capacity(n),
            is_terminated: Vec::with_capacity(n),
            is_truncated: Vec::with_capacity(n),
            infos: Vec::with_capacity(n),
            final_obs: Vec::with_capacity(n),
            records: Vec::with_capacity(n),
        };

        for (env, act) in self.envs.iter_mut().zip(acts.iter()) {
            let (step, record) = env.step_with_reset(act)?;
            match step.init_obs {
                Some(init_obs) => {
                    vec_step.obs.push(init_obs);
                    vec_step.final_obs.push(Some(step.obs));
                }
                None => {
                    vec_step.obs.push(step.obs);
                    vec_step.final_obs.push(None);
                }
            }
            vec_step.reward.push(step.reward);
            vec_step.is_terminated.push(step.is_terminated);
            vec_step.is_truncated.push(step.is_truncated);
            vec_step.infos.push(step.info);
            vec_step.records.push(record);
        }

        Ok(vec_step)
    }

    /// Closes all environments.
    pub fn close(&mut self) {
        self.envs.iter_mut().for_each(|env| env.close());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{util::test::ToyGame, AtariEnvConfig, CrAct, CrEnv, FovealEnv};
    use anyhow::bail;

    fn builder(seed: i64) -> EnvBuilder<CrEnv<ToyGame>> {
        Box::new(move || -> Result<CrEnv<ToyGame>> {
            let config = AtariEnvConfig::default()
                .game("toy")
                .seed(seed)
                .obs_size((20, 20))
                .fov_size((8, 8));
            Ok(FovealEnv::<ToyGame>::build(&config)?.into())
        })
    }

    #[test]
    fn test_envs_follow_builder_order() -> Result<()> {
        let vec_env = SyncVecEnv::new((0..3).map(|i| builder(10 + i)).collect())?;
        assert_eq!(vec_env.num_envs(), 3);
        let seeds: Vec<_> = vec_env.envs().iter().map(|e| e.config().seed).collect();
        assert_eq!(seeds, vec![10, 11, 12]);
        Ok(())
    }

    #[test]
    fn test_failed_builder_is_reported_with_index() {
        let builders: Vec<EnvBuilder<CrEnv<ToyGame>>> = vec![
            builder(0),
            Box::new(|| -> Result<CrEnv<ToyGame>> { bail!("no ROM") }),
            builder(2),
        ];
        let err = SyncVecEnv::new(builders).err().unwrap();
        assert_eq!(format!("{}", err), "Failed to build environment 1");
        assert_eq!(format!("{}", err.root_cause()), "no ROM");
    }

    #[test]
    fn test_finished_envs_are_reset() -> Result<()> {
        let mut vec_env = SyncVecEnv::new(vec![builder(0), builder(1)])?;
        let obs = vec_env.reset()?;
        assert_eq!(obs.len(), 2);

        let acts = vec![CrAct::new(0, [0, 0]), CrAct::new(0, [0, 0])];
        let mut n_steps = 0;
        let vec_step = loop {
            n_steps += 1;
            let vec_step = vec_env.step(&acts)?;
            if !vec_step.done_indices().is_empty() {
                break vec_step;
            }
        };
        assert_eq!(vec_step.done_indices(), vec![0, 1]);
        for i in 0..2 {
            let final_info = vec_step.infos[i].final_info.as_ref().unwrap();
            assert_eq!(final_info.ep_len, n_steps);
            let final_obs = vec_step.final_obs[i].as_ref().unwrap();
            assert_ne!(final_obs, &vec_step.obs[i]);
        }

        assert!(vec_env.step(&acts[..1]).is_err());
        Ok(())
    }
}
