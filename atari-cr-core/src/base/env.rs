//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// Construction is not part of the trait: environments are built by their own
/// constructors, possibly by wrapping other environments, so that a factory can
/// decide how to compose them.
pub trait Env {
    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Performs an environment step.
    ///
    /// Returns an error if the action is not in the action space of the environment.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performs an environment step and resets the environment if the episode ends.
    ///
    /// When the episode ends, the observation of the returned [`Step`] is the terminal
    /// observation and [`Step::init_obs`] holds the initial observation of the next episode.
    fn step_with_reset(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized,
    {
        let (mut step, record) = self.step(a)?;
        if step.is_done() {
            step.init_obs = Some(self.reset()?);
        }
        Ok((step, record))
    }

    /// Resets the environment with a given index.
    ///
    /// The index is used in an arbitrary way. Foveal environments use it as an offset
    /// of the random seed, which is useful when evaluating a trained agent on a fixed
    /// set of episodes.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs>;

    /// Releases resources held by the environment.
    fn close(&mut self) {}
}
