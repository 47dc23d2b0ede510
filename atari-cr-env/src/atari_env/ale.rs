//! Safe wrapper of the Arcade Learning Environment interface.
use anyhow::{bail, Context, Result};
use c_str_macro::c_str;
use std::{ffi::CString, path::Path};

/// Settings of the emulator.
#[derive(Debug, Clone)]
pub struct AleConfig {
    /// Seed of the emulator. If 0, the time is used.
    pub random_seed: i32,

    /// Probability of repeating the previous action instead of the given one.
    pub repeat_action_probability: f32,

    /// Difficulty of the game.
    pub difficulty_setting: i32,
}

impl Default for AleConfig {
    fn default() -> Self {
        Self {
            random_seed: 0,
            repeat_action_probability: 0.25,
            difficulty_setting: 0,
        }
    }
}

/// An emulator with a loaded ROM.
pub struct Ale {
    inner: *mut atari_env_sys::ALEInterface,
    minimal_actions: Vec<i32>,
}

// The interface is owned by a single `Ale` and never shared.
unsafe impl Send for Ale {}

impl Drop for Ale {
    fn drop(&mut self) {
        unsafe {
            atari_env_sys::ALE_del(self.inner);
        }
    }
}

impl Ale {
    /// Loads a ROM.
    pub fn new(rom_path: &Path, config: &AleConfig) -> Result<Self> {
        if !rom_path.is_file() {
            bail!("ROM file not found: {:?}", rom_path);
        }
        let rom_path = rom_path
            .to_str()
            .with_context(|| format!("Invalid ROM path: {:?}", rom_path))?;
        let rom_path = CString::new(rom_path)?;

        let ale = unsafe { atari_env_sys::ALE_new() };
        unsafe {
            atari_env_sys::setInt(ale, c_str!("random_seed").as_ptr(), config.random_seed);
            atari_env_sys::setBool(ale, c_str!("display_screen").as_ptr(), false);
            atari_env_sys::setBool(ale, c_str!("sound").as_ptr(), false);
            atari_env_sys::setBool(ale, c_str!("color_averaging").as_ptr(), false);
            atari_env_sys::setInt(ale, c_str!("frame_skip").as_ptr(), 1);
            atari_env_sys::setFloat(
                ale,
                c_str!("repeat_action_probability").as_ptr(),
                config.repeat_action_probability,
            );
            atari_env_sys::loadROM(ale, rom_path.as_ptr());
            atari_env_sys::setDifficulty(ale, config.difficulty_setting);
            atari_env_sys::reset_game(ale);
        }

        let n = unsafe { atari_env_sys::getMinimalActionSize(ale) } as usize;
        let mut minimal_actions = vec![0i32; n];
        unsafe {
            atari_env_sys::getMinimalActionSet(ale, minimal_actions.as_mut_ptr());
        }

        Ok(Self {
            inner: ale,
            minimal_actions,
        })
    }

    /// Codes of the minimal action set.
    pub fn minimal_actions(&self) -> &[i32] {
        &self.minimal_actions
    }

    pub fn is_game_over(&self) -> bool {
        unsafe { atari_env_sys::game_over(self.inner) }
    }

    pub fn reset(&mut self) {
        unsafe {
            atari_env_sys::reset_game(self.inner);
        }
    }

    /// Plays an action code and returns the reward.
    pub fn take_action(&mut self, action: i32) -> i32 {
        unsafe { atari_env_sys::act(self.inner, action) }
    }

    pub fn lives(&self) -> u32 {
        unsafe { atari_env_sys::lives(self.inner) as u32 }
    }

    pub fn width(&self) -> u32 {
        unsafe { atari_env_sys::getScreenWidth(self.inner) as u32 }
    }

    pub fn height(&self) -> u32 {
        unsafe { atari_env_sys::getScreenHeight(self.inner) as u32 }
    }

    /// RGB bytes of the screen regardless of endianness.
    pub fn rgb24(&self, buf: &mut [u8]) {
        unsafe {
            atari_env_sys::getScreenRGB2(self.inner, buf.as_mut_ptr());
        }
    }
}
