//! A deterministic game for tests, so that no ROM is needed.
use crate::{AtariEnvConfig, AtariGame};
use anyhow::{bail, Result};

/// The number of actions of [`ToyGame`].
pub const TOY_N_ACTIONS: usize = 4;

/// Lives of [`ToyGame`] at the start of a game.
pub const TOY_LIVES: usize = 3;

/// Frames until [`ToyGame`] takes a life.
pub const TOY_FRAMES_PER_LIFE: usize = 60;

const WIDTH: usize = 32;
const HEIGHT: usize = 24;

/// A game with a scrolling screen.
///
/// A life is lost every [`TOY_FRAMES_PER_LIFE`] frames. Action 1 scores a point
/// every 8 frames, action 2 loses one every 8 frames. The screen and the
/// frames scoring points depend on the seed.
#[derive(Debug, Clone)]
pub struct ToyGame {
    seed: i64,
    frame: usize,
    lives: usize,
}

impl ToyGame {
    /// The number of frames played in the current game.
    pub fn frame(&self) -> usize {
        self.frame
    }

    fn phase(&self) -> usize {
        self.seed.rem_euclid(8) as usize
    }
}

impl AtariGame for ToyGame {
    fn load(config: &AtariEnvConfig) -> Result<Self> {
        if config.game.is_empty() {
            bail!("Game name is empty");
        }
        Ok(Self {
            seed: config.seed,
            frame: 0,
            lives: TOY_LIVES,
        })
    }

    fn n_actions(&self) -> usize {
        TOY_N_ACTIONS
    }

    fn act(&mut self, ix: usize) -> f32 {
        if self.is_game_over() {
            return 0.0;
        }
        self.frame += 1;
        if self.frame % TOY_FRAMES_PER_LIFE == 0 {
            self.lives -= 1;
        }
        match ((self.frame + self.phase()) % 8 == 0, ix) {
            (true, 1) => 1.0,
            (true, 2) => -1.0,
            _ => 0.0,
        }
    }

    fn reset(&mut self) {
        self.frame = 0;
        self.lives = TOY_LIVES;
    }

    fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    fn lives(&self) -> usize {
        self.lives
    }

    fn width(&self) -> usize {
        WIDTH
    }

    fn height(&self) -> usize {
        HEIGHT
    }

    fn render_rgb24(&self, buf: &mut [u8]) {
        let offset = self.frame * 3 + self.phase() * 11;
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let v = (50 + (x * 7 + y * 5 + offset) % 200) as u8;
                let ix = (y * WIDTH + x) * 3;
                buf[ix..ix + 3].copy_from_slice(&[v, v / 2, 255 - v]);
            }
        }
    }

    fn seed(&mut self, seed: i64) -> Result<()> {
        self.seed = seed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_is_over_after_all_lives() -> Result<()> {
        let mut game = ToyGame::load(&AtariEnvConfig::default().game("toy"))?;
        let mut total = 0.0;
        while !game.is_game_over() {
            total += game.act(1);
        }
        assert_eq!(game.frame(), TOY_LIVES * TOY_FRAMES_PER_LIFE);
        assert!(total > 0.0);
        game.reset();
        assert_eq!(game.lives(), TOY_LIVES);
        Ok(())
    }
}
