//! Foveal environments with a pause action.
use crate::{AtariEnvConfig, AtariGame, CrAct, CrActSpace, CrInfo, CrObs, FovealEnv};
use anyhow::Result;
use atari_cr_core::{
    error::CrError,
    record::Record,
    space::{derive_seeds, Space},
    Env, Step,
};
use log::{debug, info};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Wraps a [`FovealEnv`] with a pause action.
///
/// The pause action is the motor action with index `n`, where `n` is the
/// number of motor actions of the wrapped environment. A pause does not
/// advance the game: only the sensory action is applied and the frame stack is
/// refreshed with the current frame. Each pause costs `pause_cost`, and
/// `no_action_pause_cost` more if the fovea did not move.
///
/// After `successive_pause_limit` pauses in a row, a further pause is replaced
/// by a random motor action.
pub struct PauseableFovealEnv<G: AtariGame> {
    env: FovealEnv<G>,
    pause_cost: f32,
    successive_pause_limit: usize,
    no_action_pause_cost: f32,
    n_successive_pauses: usize,
    action_space: CrActSpace,
    rng: SmallRng,
}

impl<G: AtariGame> PauseableFovealEnv<G> {
    /// Wraps `env`. The generator of forced motor actions is seeded with `config.seed`.
    pub fn new(
        env: FovealEnv<G>,
        config: &AtariEnvConfig,
        pause_cost: f32,
        successive_pause_limit: usize,
        no_action_pause_cost: f32,
    ) -> Self {
        let sensory = env.action_space().sensory();
        let (low, high) = (sensory.low(), sensory.high());
        let action_space =
            CrActSpace::new(env.n_actions() + 1, [low[0], low[1]], [high[0], high[1]]);
        info!(
            "Pause action enabled: cost={}, limit={}, no-action cost={}",
            pause_cost, successive_pause_limit, no_action_pause_cost
        );

        Self {
            env,
            pause_cost,
            successive_pause_limit,
            no_action_pause_cost,
            n_successive_pauses: 0,
            action_space,
            rng: SmallRng::seed_from_u64(config.seed as u64),
        }
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &FovealEnv<G> {
        &self.env
    }

    /// The wrapped environment, mutable.
    pub fn inner_mut(&mut self) -> &mut FovealEnv<G> {
        &mut self.env
    }

    /// Index of the pause action.
    pub fn pause_action(&self) -> usize {
        self.env.n_actions()
    }

    /// The action space, including the pause action.
    pub fn action_space(&self) -> &CrActSpace {
        &self.action_space
    }

    /// The action space, mutable for seeding and sampling.
    pub fn action_space_mut(&mut self) -> &mut CrActSpace {
        &mut self.action_space
    }

    /// Seeds the samplers of the action space and the observation space.
    pub fn seed_spaces(&mut self, seed: u64) {
        let seeds = derive_seeds(seed, 2);
        self.action_space.seed(seeds[0]);
        self.env.seed_spaces(seeds[1]);
    }

    fn pause(&mut self, act: &CrAct) -> (Step<Self>, Record) {
        let moved = self.env.move_fovea(act.sensory);
        let cost = match moved {
            true => self.pause_cost,
            false => self.pause_cost + self.no_action_pause_cost,
        };
        self.env.refresh();
        self.env.record_pause(act.motor, cost);

        let reward = -cost;
        let info = self.env.info(true, false);
        let record = self.env.step_record(reward, true);
        let step = Step::new(self.env.observe(), act.clone(), reward, false, false, info);
        (step, record)
    }
}

impl<G: AtariGame> Env for PauseableFovealEnv<G> {
    type Obs = CrObs;
    type Act = CrAct;
    type Info = CrInfo;

    fn step(&mut self, act: &CrAct) -> Result<(Step<Self>, Record)> {
        let pause = self.pause_action();
        if act.motor > pause {
            return Err(CrError::InvalidAction(format!(
                "Motor action {} is out of range 0..={}",
                act.motor, pause
            ))
            .into());
        }

        let mut motor = act.motor;
        if motor == pause {
            self.n_successive_pauses += 1;
            if self.n_successive_pauses > self.successive_pause_limit {
                motor = self.rng.gen_range(0..pause);
                debug!(
                    "{} successive pauses, playing motor action {}",
                    self.n_successive_pauses, motor
                );
            } else {
                return Ok(self.pause(act));
            }
        }
        self.n_successive_pauses = 0;

        let (step, record) = self.env.step(&CrAct::new(motor, act.sensory))?;
        Ok((step.cast(), record))
    }

    fn reset(&mut self) -> Result<CrObs> {
        self.n_successive_pauses = 0;
        self.env.reset()
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<CrObs> {
        self.n_successive_pauses = 0;
        self.env.reset_with_index(ix)
    }

    fn close(&mut self) {
        self.env.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::{ToyGame, TOY_N_ACTIONS};

    fn env(limit: usize) -> Result<PauseableFovealEnv<ToyGame>> {
        let config = AtariEnvConfig::default()
            .game("toy")
            .seed(5)
            .obs_size((20, 20))
            .fov_size((8, 8));
        let env = FovealEnv::build(&config)?;
        Ok(PauseableFovealEnv::new(env, &config, 0.01, limit, 0.1))
    }

    #[test]
    fn test_pause_is_the_last_motor_action() -> Result<()> {
        let env = env(20)?;
        assert_eq!(env.pause_action(), TOY_N_ACTIONS);
        assert_eq!(env.action_space().motor().n(), TOY_N_ACTIONS + 1);
        assert_eq!(env.action_space().sensory().high(), &[12, 12]);
        Ok(())
    }

    #[test]
    fn test_pause_costs() -> Result<()> {
        let mut env = env(20)?;
        let obs = env.reset()?;
        let pause = env.pause_action();

        let (step, _) = env.step(&CrAct::new(pause, [4, 4]))?;
        assert!(step.info.is_pause);
        assert_eq!(step.reward, -0.01);
        assert_eq!(step.info.fov_loc, [4, 4]);
        assert_eq!(step.obs.frame(2), obs.frame(3));

        // The fovea stays, so the no-action cost is added
        let (step, record) = env.step(&CrAct::new(pause, [4, 4]))?;
        assert!((step.reward + 0.11).abs() < 1e-6);
        assert_eq!(record.get_scalar("is_pause")?, 1.0);
        Ok(())
    }

    #[test]
    fn test_successive_pause_limit_forces_motor_action() -> Result<()> {
        let mut env = env(2)?;
        env.reset()?;
        let pause = env.pause_action();
        let act = CrAct::new(pause, [0, 0]);

        assert!(env.step(&act)?.0.info.is_pause);
        assert!(env.step(&act)?.0.info.is_pause);
        assert!(!env.step(&act)?.0.info.is_pause);
        assert!(env.step(&act)?.0.info.is_pause);
        Ok(())
    }

    #[test]
    fn test_episode_stats() -> Result<()> {
        let mut env = env(100)?;
        env.reset()?;
        let pause = env.pause_action();
        env.step(&CrAct::new(pause, [1, 0]))?;
        env.step(&CrAct::new(pause, [2, 0]))?;

        let mut n = 0;
        let stats = loop {
            n += 1;
            let (step, _) = env.step(&CrAct::new(0, [0, 0]))?;
            if step.is_done() {
                break step.info.final_info.unwrap();
            }
        };
        assert_eq!(stats.n_pauses, 2);
        assert_eq!(stats.ep_len, n);
        assert!((stats.pause_cost - 0.02).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_motor_action_beyond_pause_is_rejected() -> Result<()> {
        let mut env = env(20)?;
        env.reset()?;
        let err = env
            .step(&CrAct::new(TOY_N_ACTIONS + 1, [0, 0]))
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<CrError>(),
            Some(CrError::InvalidAction(_))
        ));
        Ok(())
    }
}
