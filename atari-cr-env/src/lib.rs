//! Foveal Atari environments for computational rationality agents.
//!
//! An agent in a [`FovealEnv`] only sees the part of the screen under its fovea.
//! Every step takes a motor action, played in the game, and a sensory action,
//! which moves the fovea. The [`SensoryActionMode`] decides if a sensory action
//! is a location or a displacement. [`PauseableFovealEnv`] adds a pause action,
//! which moves the fovea without advancing the game, at a cost.
//!
//! Games are run by an [`AtariGame`] backend. The Arcade Learning Environment
//! backend, [`atari_env::AleGame`], is enabled with the `ale` feature and loads
//! ROM images from the directory given by environment variable `ATARI_ROM_DIR`.
//!
//! ```no_run
//! # #[cfg(feature = "ale")]
//! # fn main() -> anyhow::Result<()> {
//! use atari_cr_core::{space::Space, Env as _};
//! use atari_cr_env::{atari_env::AleGame, AtariEnvConfig, FovealEnv, SensoryActionMode};
//!
//! let config = AtariEnvConfig::default()
//!     .game("pong")
//!     .seed(42)
//!     .sensory_action_mode(SensoryActionMode::Relative);
//! let mut env = FovealEnv::<AleGame>::build(&config)?;
//! env.reset()?;
//! for _ in 0..100 {
//!     let act = env.action_space_mut().sample();
//!     let (step, _) = env.step(&act)?;
//!     if step.is_done() {
//!         env.reset()?;
//!     }
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "ale"))]
//! # fn main() {}
//! ```
mod act;
#[cfg(feature = "ale")]
pub mod atari_env;
mod cr_env;
mod env;
mod game;
mod info;
mod mode;
mod obs;
mod pause;
pub mod util;
mod vec;
pub use act::{CrAct, CrActSpace};
pub use cr_env::CrEnv;
pub use env::{AtariEnvConfig, EpisodeRecord, FovealEnv, ModeSetting};
pub use game::AtariGame;
pub use info::{CrInfo, EpisodeStats};
pub use mode::SensoryActionMode;
pub use obs::CrObs;
pub use pause::PauseableFovealEnv;
pub use vec::{EnvBuilder, SyncVecEnv, VecStep};
