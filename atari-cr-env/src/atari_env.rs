//! Arcade Learning Environment backend.
//!
//! ROM images are loaded from `{rom_dir}/{game}.bin`, where `rom_dir` defaults
//! to the environment variable `ATARI_ROM_DIR`. An easy way to get the ROMs is
//! [AutoROM](https://pypi.org/project/AutoROM/):
//!
//! ```bash
//! pip install autorom
//! mkdir $HOME/atari_rom
//! AutoROM --install-dir $HOME/atari_rom
//! export ATARI_ROM_DIR=$HOME/atari_rom
//! ```
pub mod ale;
use crate::{AtariEnvConfig, AtariGame};
use ale::{Ale, AleConfig};
use anyhow::Result;
use log::info;
use std::path::PathBuf;

/// An Atari game run by the Arcade Learning Environment.
pub struct AleGame {
    ale: Ale,
    rom_path: PathBuf,
    config: AleConfig,
}

impl AtariGame for AleGame {
    fn load(config: &AtariEnvConfig) -> Result<Self> {
        let rom_path = PathBuf::from(&config.rom_dir).join(format!("{}.bin", config.game));
        let ale_config = AleConfig {
            random_seed: config.seed as i32,
            ..AleConfig::default()
        };
        let ale = Ale::new(&rom_path, &ale_config)?;
        info!("Loaded ROM {:?}", rom_path);

        Ok(Self {
            ale,
            rom_path,
            config: ale_config,
        })
    }

    fn n_actions(&self) -> usize {
        self.ale.minimal_actions().len()
    }

    fn act(&mut self, ix: usize) -> f32 {
        let action = self.ale.minimal_actions()[ix];
        self.ale.take_action(action) as f32
    }

    fn reset(&mut self) {
        self.ale.reset()
    }

    fn is_game_over(&self) -> bool {
        self.ale.is_game_over()
    }

    fn lives(&self) -> usize {
        self.ale.lives() as usize
    }

    fn width(&self) -> usize {
        self.ale.width() as usize
    }

    fn height(&self) -> usize {
        self.ale.height() as usize
    }

    fn render_rgb24(&self, buf: &mut [u8]) {
        self.ale.rgb24(buf)
    }

    fn seed(&mut self, seed: i64) -> Result<()> {
        // The seed of the emulator is read when a ROM is loaded.
        self.config.random_seed = seed as i32;
        self.ale = Ale::new(&self.rom_path, &self.config)?;
        Ok(())
    }
}
