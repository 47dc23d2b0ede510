use anyhow::Result;
use atari_cr_core::{space::Space, Env as _};
use atari_cr_env::{
    atari_env::AleGame, AtariEnvConfig, FovealEnv, PauseableFovealEnv, SensoryActionMode,
};
use log::info;

fn env_config() -> AtariEnvConfig {
    AtariEnvConfig::default()
        .game("pong")
        .seed(42)
        .sensory_action_mode(SensoryActionMode::Relative)
        .eval()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = env_config();
    let env = FovealEnv::<AleGame>::build(&config)?;
    let mut env = PauseableFovealEnv::new(env, &config, 0.01, 20, 0.1);
    env.seed_spaces(42);

    for ix in 0..5 {
        env.reset_with_index(ix)?;
        loop {
            let act = env.action_space_mut().sample();
            let (step, _) = env.step(&act)?;
            if let Some(stats) = step.info.final_info {
                info!(
                    "[Episode {}] [R: {:.2}] [Len: {}] [Pauses: {} x ({})]",
                    ix, stats.reward, stats.ep_len, stats.n_pauses, -stats.pause_cost
                );
                break;
            }
        }
    }

    Ok(())
}
