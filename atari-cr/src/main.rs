use anyhow::Result;
use atari_cr::{agent::CrdqnConfig, train, Args, RunParameters};
use atari_cr_env::atari_env::AleGame;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let show_config = args.show_config;
    let run = RunParameters::try_from(args)?;

    if show_config {
        println!("{}", serde_yaml::to_string(&run)?);
        println!("{}", serde_yaml::to_string(&CrdqnConfig::from(&run))?);
        return Ok(());
    }

    train::<AleGame>(run)
}
