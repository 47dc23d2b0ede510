mod capture;
mod config;
mod fovea;
use crate::{AtariGame, CrAct, CrActSpace, CrInfo, CrObs, EpisodeStats, SensoryActionMode};
use anyhow::{bail, Result};
use atari_cr_core::{
    error::CrError,
    record::{Record, RecordValue},
    space::{derive_seeds, BoxSpace, Space},
    Env, Step,
};
pub use capture::EpisodeRecord;
use capture::Capture;
pub use config::{AtariEnvConfig, ModeSetting};
use fovea::{warp_and_grayscale, Fovea, FrameStack};
use log::{debug, info};
use std::path::Path;

fn sign(r: f32) -> f32 {
    if r > 0.0 {
        1.0
    } else if r < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// An Atari environment observed through a fovea.
///
/// Each step takes a motor action, played in the game, and a sensory action,
/// which moves the fovea. Preprocessing of frames follows
/// [`atari_wrapper.py`](https://github.com/openai/baselines/blob/master/baselines/common/atari_wrappers.py):
/// motor actions are repeated with max-pooling over the last two frames, frames
/// are converted to grayscale and resized, and in training a lost life ends
/// the episode. The fovea is then applied to the frame, see
/// [`AtariEnvConfig::mask_out`] and [`AtariEnvConfig::resize_to_full`].
pub struct FovealEnv<G: AtariGame> {
    config: AtariEnvConfig,

    mode: SensoryActionMode,

    game: G,

    fovea: Fovea,

    // Stacked observations with the fovea applied
    frames: FrameStack,

    // The newest preprocessed frame, before the fovea is applied
    last_frame: Vec<u8>,

    // Raw screens for max-pooling
    raw_buffer: [Vec<u8>; 2],

    // Lives in the game
    lives: usize,

    // If the game was over
    was_real_done: bool,

    action_space: CrActSpace,

    observation_space: BoxSpace<u8>,

    capture: Option<Capture>,

    stats: EpisodeStats,
}

impl<G: AtariGame> FovealEnv<G> {
    /// Builds the environment.
    ///
    /// Returns [`CrError::InvalidConfiguration`] if the sensory action mode cannot
    /// be resolved or the fovea does not fit in the observation.
    pub fn build(config: &AtariEnvConfig) -> Result<Self> {
        config.validate()?;
        let mode = config.sensory_action_mode.resolve()?;
        let game = G::load(config)?;

        let mut fovea = Fovea::new(
            config.obs_size,
            config.fov_size,
            mode,
            config.sensory_action_space,
            config.mask_out,
            config.resize_to_full,
        );
        let (r, c) = config.fov_init_loc;
        fovea.place([r as i32, c as i32]);

        let (low, high) = fovea.action_bounds();
        let action_space = CrActSpace::new(game.n_actions(), low, high);
        let (h, w) = fovea.observed_size();
        let observation_space = BoxSpace::uniform(0u8, 255, &[config.frame_stack, h, w]);
        let capture = match config.record {
            true => Some(Capture::new(config.obs_size, config.fov_size)),
            false => None,
        };

        info!(
            "Built foveal env: game={}, seed={}, mode={}, training={}",
            config.game, config.seed, mode, config.training
        );

        Ok(Self {
            config: config.clone(),
            mode,
            game,
            fovea,
            frames: FrameStack::new(config.frame_stack, h * w),
            last_frame: vec![0; config.obs_size.0 * config.obs_size.1],
            raw_buffer: [vec![], vec![]],
            lives: 0,
            was_real_done: true,
            action_space,
            observation_space,
            capture,
            stats: EpisodeStats::default(),
        })
    }

    /// The configuration the environment was built with.
    pub fn config(&self) -> &AtariEnvConfig {
        &self.config
    }

    /// The resolved sensory action mode.
    pub fn mode(&self) -> SensoryActionMode {
        self.mode
    }

    /// Current location of the fovea, `[row, col]`.
    pub fn fov_loc(&self) -> [i32; 2] {
        self.fovea.loc()
    }

    /// The number of motor actions.
    pub fn n_actions(&self) -> usize {
        self.action_space.motor().n()
    }

    /// Shape of observations, `[frame_stack, rows, cols]`.
    pub fn obs_shape(&self) -> [usize; 3] {
        let s = self.observation_space.shape();
        [s[0], s[1], s[2]]
    }

    /// The action space.
    pub fn action_space(&self) -> &CrActSpace {
        &self.action_space
    }

    /// The action space, mutable for seeding and sampling.
    pub fn action_space_mut(&mut self) -> &mut CrActSpace {
        &mut self.action_space
    }

    /// The observation space.
    pub fn observation_space(&self) -> &BoxSpace<u8> {
        &self.observation_space
    }

    /// The observation space, mutable for seeding and sampling.
    pub fn observation_space_mut(&mut self) -> &mut BoxSpace<u8> {
        &mut self.observation_space
    }

    /// Seeds the samplers of the action space and the observation space.
    pub fn seed_spaces(&mut self, seed: u64) {
        let seeds = derive_seeds(seed, 2);
        self.action_space.seed(seeds[0]);
        self.observation_space.seed(seeds[1]);
    }

    /// Returns `true` if episodes are captured.
    pub fn is_recording(&self) -> bool {
        self.capture.is_some()
    }

    /// Saves the last finished episode, or the current one if no episode has
    /// finished, with `bincode`.
    pub fn save_record_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        match &self.capture {
            Some(capture) => {
                capture.latest().save(path.as_ref())?;
                debug!("Saved episode record to {:?}", path.as_ref());
                Ok(())
            }
            None => bail!("Recording is disabled for {}", self.config.game),
        }
    }

    /// Moves the fovea. Returns `true` if it moved.
    pub(crate) fn move_fovea(&mut self, sensory: [i32; 2]) -> bool {
        self.fovea.apply(sensory)
    }

    /// Pushes the newest frame, seen through the fovea, into the frame stack.
    pub(crate) fn refresh(&mut self) {
        let obs = self.fovea.observe(&self.last_frame);
        self.frames.push(&obs);
        if let Some(capture) = self.capture.as_mut() {
            capture
                .current_mut()
                .push_frame(&self.last_frame, self.fovea.loc());
        }
    }

    /// Accounts for a pause charged `cost`.
    pub(crate) fn record_pause(&mut self, motor: usize, cost: f32) {
        self.stats.n_pauses += 1;
        self.stats.pause_cost += cost;
        if let Some(capture) = self.capture.as_mut() {
            capture.current_mut().push_step(motor, -cost, true);
        }
    }

    pub(crate) fn observe(&self) -> CrObs {
        CrObs::new(self.frames.to_vec(), self.obs_shape())
    }

    pub(crate) fn info(&self, is_pause: bool, is_done: bool) -> CrInfo {
        CrInfo {
            fov_loc: self.fovea.loc(),
            is_pause,
            final_info: match is_done {
                true => Some(self.stats.clone()),
                false => None,
            },
        }
    }

    pub(crate) fn step_record(&self, reward: f32, is_pause: bool) -> Record {
        let loc = self.fovea.loc();
        Record::from_slice(&[
            ("reward", RecordValue::Scalar(reward)),
            (
                "fov_loc",
                RecordValue::Array1(vec![loc[0] as f32, loc[1] as f32]),
            ),
            ("is_pause", RecordValue::Scalar(is_pause as i32 as f32)),
        ])
    }

    fn render(&self) -> Vec<u8> {
        let (w, h) = (self.game.width(), self.game.height());
        let mut buf = vec![0u8; w * h * 3];
        self.game.render_rgb24(&mut buf);
        buf
    }

    fn check_motor(&self, motor: usize) -> Result<(), CrError> {
        let n = self.n_actions();
        match motor < n {
            true => Ok(()),
            false => Err(CrError::InvalidAction(format!(
                "Motor action {} is out of range 0..{}",
                motor, n
            ))),
        }
    }

    fn episodic_life_step(&mut self, ix: usize) -> (Vec<u8>, f32, bool) {
        let reward = self.game.act(ix);
        let mut done = self.game.is_game_over();
        self.was_real_done = done;
        let lives = self.game.lives();

        if self.config.training && lives < self.lives && lives > 0 {
            done = true;
        }
        self.lives = lives;

        (self.render(), reward, done)
    }

    fn skip_and_max(&mut self, ix: usize) -> (Vec<u8>, f32, bool) {
        let mut total_reward = 0f32;
        let mut done = false;
        let mut n_frames = 0;

        for _ in 0..self.config.action_repeat {
            let (screen, reward, done_) = self.episodic_life_step(ix);
            total_reward += reward;
            done = done_;
            n_frames += 1;
            self.raw_buffer.swap(0, 1);
            self.raw_buffer[1] = screen;
            if done {
                break;
            }
        }

        let screen = if n_frames < 2 {
            self.raw_buffer[1].clone()
        } else {
            self.raw_buffer[0]
                .iter()
                .zip(self.raw_buffer[1].iter())
                .map(|(&a, &b)| a.max(b))
                .collect()
        };

        (screen, total_reward, done)
    }

    fn process(&self, screen: Vec<u8>) -> Result<Vec<u8>> {
        warp_and_grayscale(
            self.game.width(),
            self.game.height(),
            screen,
            self.config.obs_size,
        )
    }

    /// Plays a motor action and observes the result through the fovea.
    ///
    /// Returns the reward, clipped if configured, and the done flag.
    pub(crate) fn motor_step(&mut self, motor: usize) -> Result<(f32, bool)> {
        self.check_motor(motor)?;

        let (screen, reward, done) = self.skip_and_max(motor);
        self.last_frame = self.process(screen)?;
        self.refresh();

        self.stats.reward += reward;
        self.stats.ep_len += 1;
        let reward = match self.config.clip_reward {
            true => sign(reward),
            false => reward,
        };
        if let Some(capture) = self.capture.as_mut() {
            capture.current_mut().push_step(motor, reward, false);
        }

        Ok((reward, done))
    }
}

impl<G: AtariGame> Env for FovealEnv<G> {
    type Obs = CrObs;
    type Act = CrAct;
    type Info = CrInfo;

    fn step(&mut self, act: &CrAct) -> Result<(Step<Self>, Record)> {
        self.check_motor(act.motor)?;
        self.move_fovea(act.sensory);
        let (reward, done) = self.motor_step(act.motor)?;
        let info = self.info(false, done);
        let record = self.step_record(reward, false);
        let step = Step::new(self.observe(), act.clone(), reward, done, false, info);
        Ok((step, record))
    }

    fn reset(&mut self) -> Result<CrObs> {
        if self.was_real_done {
            self.game.reset();
        } else {
            // no-op step to advance from the lost-life state
            self.game.act(0);
        }
        self.was_real_done = self.game.is_game_over();
        self.lives = self.game.lives();

        let screen = self.render();
        self.raw_buffer = [screen.clone(), screen.clone()];
        self.last_frame = self.process(screen)?;

        let (r, c) = self.config.fov_init_loc;
        self.fovea.place([r as i32, c as i32]);
        self.frames.fill(&self.fovea.observe(&self.last_frame));
        self.stats = EpisodeStats::default();

        if let Some(capture) = self.capture.as_mut() {
            capture.start();
            capture
                .current_mut()
                .push_frame(&self.last_frame, self.fovea.loc());
        }
        debug!("Reset {} (lives={})", self.config.game, self.lives);

        Ok(self.observe())
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<CrObs> {
        self.game.seed(self.config.seed + ix as i64)?;
        self.was_real_done = true;
        self.reset()
    }

    fn close(&mut self) {
        self.capture = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::{ToyGame, TOY_N_ACTIONS};
    use atari_cr_core::Obs;
    use tempdir::TempDir;

    fn config() -> AtariEnvConfig {
        AtariEnvConfig::default()
            .game("toy")
            .seed(3)
            .obs_size((20, 20))
            .fov_size((8, 8))
    }

    #[test]
    fn test_spaces_follow_the_mode() -> Result<()> {
        let env = FovealEnv::<ToyGame>::build(&config())?;
        assert_eq!(env.mode(), SensoryActionMode::Absolute);
        assert_eq!(env.n_actions(), TOY_N_ACTIONS);
        assert_eq!(env.action_space().sensory().high(), &[12, 12]);
        assert_eq!(env.obs_shape(), [4, 20, 20]);

        let config = config()
            .sensory_action_mode(ModeSetting::Label("RELATIVE".to_string()))
            .sensory_action_space((-3, 3))
            .mask_out(false);
        let env = FovealEnv::<ToyGame>::build(&config)?;
        assert_eq!(env.mode(), SensoryActionMode::Relative);
        assert_eq!(env.action_space().sensory().low(), &[-3, -3]);
        assert_eq!(env.obs_shape(), [4, 8, 8]);
        Ok(())
    }

    #[test]
    fn test_invalid_label_fails_construction() {
        let config = config().sensory_action_mode(ModeSetting::Label("abs".to_string()));
        let err = FovealEnv::<ToyGame>::build(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<CrError>(),
            Some(CrError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_step_moves_fovea_and_stacks_frames() -> Result<()> {
        let mut env = FovealEnv::<ToyGame>::build(&config().fov_init_loc((2, 4)))?;
        let obs = env.reset()?;
        assert_eq!(obs.len(), 4 * 20 * 20);
        assert_eq!(env.fov_loc(), [2, 4]);
        assert_eq!(obs.frame(0), obs.frame(3));

        let (step, record) = env.step(&CrAct::new(1, [30, 5]))?;
        assert_eq!(step.info.fov_loc, [12, 5]);
        assert_eq!(record.get_array1("fov_loc")?, vec![12.0, 5.0]);
        assert_eq!(step.obs.frame(0), obs.frame(0));
        assert_ne!(step.obs.frame(3), obs.frame(3));
        Ok(())
    }

    #[test]
    fn test_out_of_range_motor_action() -> Result<()> {
        let mut env = FovealEnv::<ToyGame>::build(&config())?;
        env.reset()?;
        let err = env.step(&CrAct::new(TOY_N_ACTIONS, [0, 0])).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<CrError>(),
            Some(CrError::InvalidAction(_))
        ));
        Ok(())
    }

    #[test]
    fn test_lost_life_ends_episode_only_in_training() -> Result<()> {
        let run = |config: AtariEnvConfig| -> Result<usize> {
            let mut env = FovealEnv::<ToyGame>::build(&config)?;
            env.reset()?;
            let mut n = 0;
            loop {
                n += 1;
                let (step, _) = env.step(&CrAct::new(0, [0, 0]))?;
                if step.is_done() {
                    assert_eq!(step.info.final_info.unwrap().ep_len, n);
                    return Ok(n);
                }
            }
        };
        let train_len = run(config())?;
        let eval_len = run(config().eval())?;
        assert!(train_len < eval_len);
        Ok(())
    }

    #[test]
    fn test_record_is_saved() -> Result<()> {
        let dir = TempDir::new("foveal_env")?;
        let path = dir.path().join("record.bin");
        let mut env = FovealEnv::<ToyGame>::build(&config().record(true))?;
        env.reset()?;
        for _ in 0..5 {
            env.step(&CrAct::new(1, [1, 1]))?;
        }
        env.save_record_to_file(&path)?;
        let record = EpisodeRecord::load(&path)?;
        assert_eq!(record.len(), 5);
        assert_eq!(record.frames.len(), 6);
        assert_eq!(record.fov_locs[1], [1, 1]);

        env.close();
        assert!(!env.is_recording());
        assert!(env.save_record_to_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_seeded_spaces_repeat() -> Result<()> {
        let mut a = FovealEnv::<ToyGame>::build(&config())?;
        let mut b = FovealEnv::<ToyGame>::build(&config())?;
        a.seed_spaces(11);
        b.seed_spaces(11);
        for _ in 0..20 {
            assert_eq!(a.action_space_mut().sample(), b.action_space_mut().sample());
        }
        assert_eq!(
            a.observation_space_mut().sample(),
            b.observation_space_mut().sample()
        );
        Ok(())
    }
}
