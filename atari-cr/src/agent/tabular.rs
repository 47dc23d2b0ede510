//! An agent acting on tabular action values, without a neural network.
use super::{CrAgent, CrdqnConfig, EvalEnvFactory, PvmBuffer, SensoryActionSet};
use crate::util::{format_timestep, mean_std};
use anyhow::{Context, Result};
use atari_cr_core::{
    record::{Record, RecordValue, Recorder},
    util::linear_schedule,
};
use atari_cr_env::{AtariGame, CrAct, CrEnv, CrObs, SyncVecEnv};
use itertools::Itertools;
use log::info;
use std::{collections::VecDeque, fs, path::PathBuf, time::Instant};

/// A transition kept in the replay buffer.
#[derive(Debug, Clone)]
struct Transition {
    motor: usize,
    sensory: usize,
    reward: f32,

    /// Fraction of the fovea that looked at pixels absent from the short-term memory.
    observ_r: f32,
}

/// Action values of a discrete action set, with a target copy used for acting.
#[derive(Debug, Clone)]
struct ActionValues {
    online: Vec<f32>,
    target: Vec<f32>,
}

impl ActionValues {
    fn new(n: usize) -> Self {
        Self {
            online: vec![0.0; n],
            target: vec![0.0; n],
        }
    }

    // Ties go to the lowest index.
    fn best(&self) -> usize {
        self.target
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |(bi, bv), (i, &v)| match v > bv {
                true => (i, v),
                false => (bi, bv),
            })
            .0
    }

    fn update(&mut self, i: usize, target: f32, lr: f32) -> f32 {
        let td = target - self.online[i];
        self.online[i] += lr * td;
        td
    }

    fn sync(&mut self) {
        self.target.copy_from_slice(&self.online);
    }
}

/// Fraction of the pixels under the fovea at `loc` that are zero in `memory`.
///
/// Zero pixels of a masked observation have not been seen recently.
fn observ_r(memory: &CrObs, loc: [i32; 2], fov_size: usize, masked: bool) -> f32 {
    let [n, rows, cols] = memory.shape;
    let (r0, c0, h, w) = match masked {
        true => (
            (loc[0].max(0) as usize).min(rows),
            (loc[1].max(0) as usize).min(cols),
            fov_size,
            fov_size,
        ),
        false => (0, 0, rows, cols),
    };
    let (r1, c1) = ((r0 + h).min(rows), (c0 + w).min(cols));
    let total = n * (r1 - r0) * (c1 - c0);
    if total == 0 {
        return 0.0;
    }
    let unseen = (0..n)
        .map(|i| {
            let frame = memory.frame(i);
            (r0..r1)
                .map(|r| frame[r * cols + c0..r * cols + c1].iter().filter(|&&p| p == 0).count())
                .sum::<usize>()
        })
        .sum::<usize>();
    unseen as f32 / total as f32
}

/// Plays epsilon-greedy on action values of motor actions and of the
/// discretized sensory actions.
///
/// Rewards are shaped with the sugarl term: looking at regions already present
/// in the short-term memory is charged up to `sugarl_r_scale`.
pub struct TabularCrAgent<G: AtariGame, R: Recorder> {
    env: SyncVecEnv<CrEnv<G>>,
    eval_env_factory: EvalEnvFactory<G>,
    recorder: R,
    config: CrdqnConfig,
    sugarl_r_scale: f32,
    sensory_action_set: SensoryActionSet,
    masked: bool,
    n_envs: usize,
    motor_values: ActionValues,
    sensory_values: ActionValues,
    replay_buffer: VecDeque<Transition>,
    pvm_buffer: PvmBuffer,
    current_timestep: usize,
}

impl<G: AtariGame, R: Recorder> TabularCrAgent<G, R> {
    /// Constructs the agent. `env` must contain at least one environment.
    pub fn build(
        env: SyncVecEnv<CrEnv<G>>,
        eval_env_factory: EvalEnvFactory<G>,
        sugarl_r_scale: f32,
        config: CrdqnConfig,
        recorder: R,
    ) -> Result<Self> {
        let first = env.envs().first().context("No training environment")?;
        let obs_shape = first.obs_shape();
        let n_motor = first.n_motor_actions();
        let masked = first.config().mask_out;
        let obs_size = first.config().obs_size;
        let sensory_action_set = SensoryActionSet::new(
            obs_size,
            config.fov_size,
            config.sensory_action_space_granularity,
        );
        let n_envs = env.num_envs();
        info!(
            "Agent with {} motor actions and {} sensory actions on {} environments",
            n_motor,
            sensory_action_set.len(),
            n_envs
        );

        Ok(Self {
            env,
            eval_env_factory,
            recorder,
            sugarl_r_scale,
            motor_values: ActionValues::new(n_motor),
            sensory_values: ActionValues::new(sensory_action_set.len()),
            replay_buffer: VecDeque::with_capacity(config.replay_buffer_size.min(1 << 16)),
            pvm_buffer: PvmBuffer::new(config.pvm_stack_size, n_envs, obs_shape),
            sensory_action_set,
            masked,
            n_envs,
            current_timestep: 0,
            config,
        })
    }

    /// The recorder.
    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// Timesteps played so far, summed over the environments.
    pub fn current_timestep(&self) -> usize {
        self.current_timestep
    }

    /// The discretized sensory actions.
    pub fn sensory_action_set(&self) -> &SensoryActionSet {
        &self.sensory_action_set
    }

    /// Online action values of the motor actions.
    pub fn motor_action_values(&self) -> &[f32] {
        &self.motor_values.online
    }

    fn epsilon(&self, total_timesteps: usize) -> f32 {
        let (start, end) = self.config.epsilon_interval;
        let duration = self.config.exploration_fraction * total_timesteps as f32;
        linear_schedule(start, end, duration, self.current_timestep)
    }

    /// Returns action indices `(motor, sensory)` for each environment.
    fn choose_actions(&self, n: usize, epsilon: f32) -> Vec<(usize, usize)> {
        (0..n)
            .map(|_| match fastrand::f32() < epsilon {
                true => (
                    fastrand::usize(..self.motor_values.online.len()),
                    fastrand::usize(..self.sensory_action_set.len()),
                ),
                false => (self.motor_values.best(), self.sensory_values.best()),
            })
            .collect()
    }

    fn to_acts(&self, ixs: &[(usize, usize)]) -> Vec<CrAct> {
        ixs.iter()
            .map(|&(m, s)| CrAct::new(m, self.sensory_action_set.get(s)))
            .collect()
    }

    fn record(&self, values: &[(&str, f32)]) -> Record {
        let mut record = Record::from_step(self.recorder.step_key(), self.current_timestep);
        for (k, v) in values {
            record.insert(*k, RecordValue::Scalar(*v));
        }
        record
    }

    fn train(&mut self) {
        if self.current_timestep <= self.config.learning_start || self.replay_buffer.is_empty() {
            return;
        }

        let lr = self.config.learning_rate as f32;
        let n = (self.config.batch_size / self.n_envs).max(1);
        let mut td_sq = 0.0;
        let mut observ = 0.0;
        for _ in 0..n {
            let t = &self.replay_buffer[fastrand::usize(..self.replay_buffer.len())];
            let target = match self.config.ignore_sugarl {
                true => t.reward,
                false => t.reward - (1.0 - t.observ_r) * self.sugarl_r_scale,
            };
            let (motor, sensory, observ_r) = (t.motor, t.sensory, t.observ_r);
            let td = self.motor_values.update(motor, target, lr);
            self.sensory_values.update(sensory, target, lr);
            td_sq += td * td;
            observ += observ_r;
        }

        if self.current_timestep % 100 == 0 {
            let record = self.record(&[
                ("losses/td_loss", td_sq / n as f32),
                ("losses/observ_r", observ / n as f32),
            ]);
            self.recorder.write(record);
        }
    }

    fn push_transition(&mut self, t: Transition) {
        if self.replay_buffer.len() == self.config.replay_buffer_size.max(1) {
            self.replay_buffer.pop_front();
        }
        self.replay_buffer.push_back(t);
    }

    fn record_path(&self, env_name: &str, exp_name: &str, eval_ep: usize) -> Result<PathBuf> {
        let dir = PathBuf::from(&self.config.record_dir)
            .join(exp_name)
            .join(env_name);
        fs::create_dir_all(&dir)?;
        Ok(dir.join(format!(
            "{}_seed{}_step{:07}_eval{:02}_record.bin",
            env_name, self.config.seed, self.current_timestep, eval_ep
        )))
    }

    /// Plays `n_evals` greedy episodes, each in a new evaluation environment.
    ///
    /// Every 4th episode is saved if the evaluation environment records.
    pub fn evaluate(&mut self, env_name: &str, exp_name: &str) -> Result<()> {
        let mut returns = vec![];
        let mut n_pauses = vec![];

        for eval_ep in 0..self.config.n_evals {
            let mut eval_env = (self.eval_env_factory)(eval_ep as i64)?;
            let n = eval_env.num_envs();
            eval_env.reset()?;

            // Greedy actions do not depend on the observation.
            let stats = loop {
                let ixs = self.choose_actions(n, 0.0);
                let step = eval_env.step(&self.to_acts(&ixs))?;
                if step.is_done(0) {
                    break step.infos[0].final_info.clone().unwrap_or_default();
                }
            };
            returns.push(stats.reward);
            n_pauses.push(stats.n_pauses);

            let env = &eval_env.envs()[0];
            if env.is_recording() && eval_ep % 4 == 0 {
                let path = self.record_path(env_name, exp_name, eval_ep)?;
                env.save_record_to_file(&path)?;
                info!("Saved record to {:?}", path);
            }
            eval_env.close();
        }

        let (mean, std) = mean_std(&returns);
        let record = self.record(&[
            ("charts/eval_episodic_return", mean),
            ("charts/eval_episodic_return_std", std),
        ]);
        self.recorder.write(record);
        info!(
            "[N: {}][Eval R: {:.2}+/-{:.2}][R list: {}][Pauses: {}]",
            format_timestep(self.current_timestep),
            mean,
            std,
            returns.iter().map(|r| format!("{:.2}", r)).join(","),
            n_pauses.iter().join(",")
        );
        Ok(())
    }
}

impl<G: AtariGame, R: Recorder> CrAgent for TabularCrAgent<G, R> {
    fn learn(&mut self, total_timesteps: usize, env_name: &str, exp_name: &str) -> Result<()> {
        let start_time = Instant::now();
        let mut obs = self.env.reset()?;

        while self.current_timestep < total_timesteps {
            self.pvm_buffer.append(obs);
            let pvm_obs = self.pvm_buffer.stack_max();
            let epsilon = self.epsilon(total_timesteps);

            let ixs = self.choose_actions(self.n_envs, epsilon);
            let step = self.env.step(&self.to_acts(&ixs))?;

            for i in step.done_indices() {
                let stats = match &step.infos[i].final_info {
                    Some(stats) => stats,
                    None => continue,
                };
                info!(
                    "[T: {:.2}][N: {}] [R: {:.2}] [Pauses: {} x (-{:.2})]",
                    start_time.elapsed().as_secs_f32(),
                    format_timestep(self.current_timestep),
                    stats.reward,
                    stats.n_pauses,
                    stats.pause_cost
                );
                let record = self.record(&[
                    ("charts/episodic_return", stats.reward),
                    ("charts/episodic_length", stats.ep_len as f32),
                    ("charts/epsilon", epsilon),
                ]);
                self.recorder.write(record);
            }

            for (i, &(motor, sensory)) in ixs.iter().enumerate() {
                let observ_r = observ_r(
                    &pvm_obs[i],
                    step.infos[i].fov_loc,
                    self.config.fov_size,
                    self.masked,
                );
                self.push_transition(Transition {
                    motor,
                    sensory,
                    reward: step.reward[i],
                    observ_r,
                });
            }
            obs = step.obs;
            self.current_timestep += self.n_envs;

            if self.current_timestep >= self.config.batch_size {
                if self.current_timestep % self.config.train_frequency.max(1) == 0 {
                    self.train();
                }
                if (self.current_timestep / self.n_envs)
                    % self.config.target_network_frequency.max(1)
                    == 0
                {
                    self.motor_values.sync();
                    self.sensory_values.sync();
                }
                if self.current_timestep % 100 == 0 {
                    let sps = self.current_timestep as f32 / start_time.elapsed().as_secs_f32();
                    let record = self.record(&[("charts/SPS", sps.floor())]);
                    self.recorder.write(record);
                }
            }

            let eval_frequency = self.config.eval_frequency;
            if (eval_frequency > 0 && self.current_timestep % eval_frequency as usize == 0)
                || self.current_timestep >= total_timesteps
            {
                self.evaluate(env_name, exp_name)?;
            }
        }

        self.env.close();
        self.recorder.flush();
        Ok(())
    }
}
