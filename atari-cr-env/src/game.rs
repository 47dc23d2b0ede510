//! Emulator backends.
use crate::AtariEnvConfig;
use anyhow::Result;

/// An Atari game emulator.
///
/// Actions are indices into the minimal action set of the game.
pub trait AtariGame: Sized {
    /// Loads the game named in the configuration and seeds it with `config.seed`.
    fn load(config: &AtariEnvConfig) -> Result<Self>;

    /// The number of actions in the minimal action set.
    fn n_actions(&self) -> usize;

    /// Advances the emulator by one frame with the `ix`-th action and returns the reward.
    fn act(&mut self, ix: usize) -> f32;

    /// Starts a new game.
    fn reset(&mut self);

    /// Returns `true` when the game is over.
    fn is_game_over(&self) -> bool;

    /// Remaining lives.
    fn lives(&self) -> usize;

    /// Width of the screen.
    fn width(&self) -> usize;

    /// Height of the screen.
    fn height(&self) -> usize;

    /// Writes the screen as RGB bytes, `width * height * 3` of them.
    fn render_rgb24(&self, buf: &mut [u8]);

    /// Reseeds the emulator. Takes effect at the next [`AtariGame::reset`].
    fn seed(&mut self, seed: i64) -> Result<()>;
}
