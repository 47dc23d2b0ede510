//! Configuration of [`FovealEnv`](super::FovealEnv).
//!
//! If environment variable `ATARI_ROM_DIR` exists, it is used as the directory
//! from which ROM images of the Atari games are loaded.
use crate::SensoryActionMode;
use anyhow::Result;
use atari_cr_core::error::CrError;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// The sensory action mode as given to an environment configuration.
///
/// Foveal environments accept either a resolved mode or its textual label.
/// A label is parsed when the environment is built. The variant is kept in
/// saved configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ModeSetting {
    /// A mode resolved in advance.
    Resolved(SensoryActionMode),

    /// A mode label, parsed at construction.
    Label(String),
}

impl ModeSetting {
    /// Resolves the setting into a mode.
    pub fn resolve(&self) -> Result<SensoryActionMode, CrError> {
        match self {
            Self::Resolved(mode) => Ok(*mode),
            Self::Label(s) => SensoryActionMode::from_string(s),
        }
    }
}

impl From<SensoryActionMode> for ModeSetting {
    fn from(mode: SensoryActionMode) -> Self {
        Self::Resolved(mode)
    }
}

/// Configurations of [`FovealEnv`](super::FovealEnv).
///
/// Sizes and locations are `(rows, cols)` in the resized observation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtariEnvConfig {
    /// Directory of ROM images.
    pub rom_dir: String,

    /// Name of the game, like `breakout`.
    pub game: String,

    /// Random seed of the emulator.
    pub seed: i64,

    /// Size of the observed frames.
    pub obs_size: (usize, usize),

    /// The number of stacked frames in an observation.
    pub frame_stack: usize,

    /// The number of emulator frames a motor action is repeated for.
    pub action_repeat: usize,

    /// Size of the fovea.
    pub fov_size: (usize, usize),

    /// Location of the top-left corner of the fovea at reset.
    pub fov_init_loc: (usize, usize),

    /// How sensory actions are interpreted.
    pub sensory_action_mode: ModeSetting,

    /// Bounds of a relative sensory action in each axis.
    pub sensory_action_space: (i32, i32),

    /// Resizes the foveal crop to the full observation size.
    /// Ignored when `mask_out` is set.
    pub resize_to_full: bool,

    /// Replaces rewards by their sign.
    pub clip_reward: bool,

    /// Zeroes the frame outside of the fovea instead of cropping it.
    pub mask_out: bool,

    /// Training mode. A lost life ends an episode in training mode.
    pub training: bool,

    /// Captures the frames of episodes for [`FovealEnv::save_record_to_file`](super::FovealEnv::save_record_to_file).
    pub record: bool,
}

impl Default for AtariEnvConfig {
    fn default() -> Self {
        let rom_dir = env::var("ATARI_ROM_DIR").unwrap_or_default();

        Self {
            rom_dir,
            game: "".to_string(),
            seed: 0,
            obs_size: (84, 84),
            frame_stack: 4,
            action_repeat: 4,
            fov_size: (50, 50),
            fov_init_loc: (0, 0),
            sensory_action_mode: ModeSetting::Resolved(SensoryActionMode::Absolute),
            sensory_action_space: (-10, 10),
            resize_to_full: false,
            clip_reward: false,
            mask_out: true,
            training: true,
            record: false,
        }
    }
}

impl AtariEnvConfig {
    /// Sets the name of the game.
    pub fn game(mut self, game: impl Into<String>) -> Self {
        self.game = game.into();
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the size of observed frames.
    pub fn obs_size(mut self, obs_size: (usize, usize)) -> Self {
        self.obs_size = obs_size;
        self
    }

    /// Sets the number of stacked frames.
    pub fn frame_stack(mut self, frame_stack: usize) -> Self {
        self.frame_stack = frame_stack;
        self
    }

    /// Sets the number of repeats of a motor action.
    pub fn action_repeat(mut self, action_repeat: usize) -> Self {
        self.action_repeat = action_repeat;
        self
    }

    /// Sets the size of the fovea.
    pub fn fov_size(mut self, fov_size: (usize, usize)) -> Self {
        self.fov_size = fov_size;
        self
    }

    /// Sets the initial location of the fovea.
    pub fn fov_init_loc(mut self, fov_init_loc: (usize, usize)) -> Self {
        self.fov_init_loc = fov_init_loc;
        self
    }

    /// Sets the sensory action mode.
    pub fn sensory_action_mode(mut self, mode: impl Into<ModeSetting>) -> Self {
        self.sensory_action_mode = mode.into();
        self
    }

    /// Sets the bounds of relative sensory actions.
    pub fn sensory_action_space(mut self, bounds: (i32, i32)) -> Self {
        self.sensory_action_space = bounds;
        self
    }

    /// Sets the resize flag.
    pub fn resize_to_full(mut self, v: bool) -> Self {
        self.resize_to_full = v;
        self
    }

    /// Sets the reward clipping flag.
    pub fn clip_reward(mut self, v: bool) -> Self {
        self.clip_reward = v;
        self
    }

    /// Sets the masking flag.
    pub fn mask_out(mut self, v: bool) -> Self {
        self.mask_out = v;
        self
    }

    /// Sets the training flag.
    pub fn training(mut self, v: bool) -> Self {
        self.training = v;
        self
    }

    /// Sets the evaluation mode.
    pub fn eval(self) -> Self {
        self.training(false)
    }

    /// Sets the recording flag.
    pub fn record(mut self, v: bool) -> Self {
        self.record = v;
        self
    }

    /// Checks the geometry of the configuration.
    pub fn validate(&self) -> Result<(), CrError> {
        let (oh, ow) = self.obs_size;
        let (fh, fw) = self.fov_size;
        if oh == 0 || ow == 0 || fh == 0 || fw == 0 {
            return Err(CrError::InvalidConfiguration(format!(
                "Sizes must be positive: obs_size={:?}, fov_size={:?}",
                self.obs_size, self.fov_size
            )));
        }
        if fh > oh || fw > ow {
            return Err(CrError::InvalidConfiguration(format!(
                "Fovea {:?} does not fit in observation {:?}",
                self.fov_size, self.obs_size
            )));
        }
        if self.frame_stack == 0 || self.action_repeat == 0 {
            return Err(CrError::InvalidConfiguration(
                "frame_stack and action_repeat must be positive".to_string(),
            ));
        }
        let (low, high) = self.sensory_action_space;
        if low > high {
            return Err(CrError::InvalidConfiguration(format!(
                "Invalid sensory action space: ({}, {})",
                low, high
            )));
        }
        self.sensory_action_mode.resolve()?;
        Ok(())
    }

    /// Constructs [`AtariEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`AtariEnvConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_label_is_resolved_with_the_mode_parser() {
        let setting = ModeSetting::Label("Relative".to_string());
        assert_eq!(setting.resolve(), Ok(SensoryActionMode::Relative));

        let setting = ModeSetting::Label("sideways".to_string());
        assert!(matches!(
            setting.resolve(),
            Err(CrError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_fovea() {
        let config = AtariEnvConfig::default().fov_size((90, 20));
        assert!(matches!(
            config.validate(),
            Err(CrError::InvalidConfiguration(_))
        ));
        assert!(AtariEnvConfig::default().validate().is_ok());
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new("atari_env_config")?;
        let path = dir.path().join("env.yaml");
        let config = AtariEnvConfig::default()
            .game("pong")
            .seed(7)
            .sensory_action_mode(SensoryActionMode::Relative)
            .eval();
        config.save(&path)?;
        let loaded = AtariEnvConfig::load(&path)?;
        assert_eq!(loaded, config);

        let config = config.sensory_action_mode(ModeSetting::Label("relative".to_string()));
        config.save(&path)?;
        let loaded = AtariEnvConfig::load(&path)?;
        assert_eq!(
            loaded.sensory_action_mode,
            ModeSetting::Label("relative".to_string())
        );
        assert_eq!(loaded, config);
        Ok(())
    }
}
