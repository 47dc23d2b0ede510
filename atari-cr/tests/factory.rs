use anyhow::Result;
use atari_cr::{build_environment, Args, EnvFactory, EnvOverrides, RunParameters};
use atari_cr_core::{error::CrError, space::Space};
use atari_cr_env::{util::test::ToyGame, CrEnv, ModeSetting, SensoryActionMode};
use clap::Parser;

fn run_parameters(extra: &[&str]) -> Result<RunParameters> {
    let _ = env_logger::builder().is_test(true).try_init();
    let args = Args::parse_from(["atari_cr", "--cuda", "false"].iter().chain(extra.iter()));
    Ok(RunParameters::try_from(args)?)
}

#[test]
fn test_identical_seeds_give_identical_samplers() -> Result<()> {
    let run = run_parameters(&["--seed", "7"])?;
    let mut a = build_environment::<ToyGame>(2, &run, &EnvOverrides::default())?;
    let mut b = build_environment::<ToyGame>(2, &run, &EnvOverrides::default())?;

    for _ in 0..20 {
        assert_eq!(a.action_space_mut().sample(), b.action_space_mut().sample());
    }
    for _ in 0..3 {
        assert_eq!(
            a.observation_space_mut().sample(),
            b.observation_space_mut().sample()
        );
    }
    Ok(())
}

#[test]
fn test_train_envs_are_seeded_in_order() -> Result<()> {
    let run = run_parameters(&["--seed", "1", "--env-num", "3", "--sensory-action-mode", "absolute"])?;
    let factory = EnvFactory::<ToyGame>::new(run);
    let vec_env = factory.make_train_env()?;

    let seeds: Vec<_> = vec_env.envs().iter().map(|env| env.config().seed).collect();
    assert_eq!(seeds, vec![1, 2, 3]);
    for env in vec_env.envs() {
        assert_eq!(env.mode(), SensoryActionMode::Absolute);
        assert!(env.is_pauseable());
        assert!(env.config().training);
        assert!(!env.is_recording());
    }
    Ok(())
}

#[test]
fn test_train_envs_sample_differently() -> Result<()> {
    let run = run_parameters(&["--env-num", "2"])?;
    let mut vec_env = EnvFactory::<ToyGame>::new(run).make_train_env()?;
    let envs = vec_env.envs_mut();
    let a: Vec<_> = (0..20).map(|_| envs[0].action_space_mut().sample()).collect();
    let b: Vec<_> = (0..20).map(|_| envs[1].action_space_mut().sample()).collect();
    assert_ne!(a, b);
    Ok(())
}

#[test]
fn test_eval_env_overrides_take_precedence() -> Result<()> {
    let run = run_parameters(&["--seed", "10", "--capture-video", "--frame-stack", "2"])?;
    let factory = EnvFactory::<ToyGame>::new(run);
    let vec_env = factory.make_eval_env(3)?;
    assert_eq!(vec_env.num_envs(), 1);

    let env = &vec_env.envs()[0];
    assert_eq!(env.config().seed, 13);
    assert!(!env.config().training);
    assert!(env.config().record);
    assert!(env.is_recording());
    assert_eq!(env.config().frame_stack, 2);

    let run = run_parameters(&["--frame-stack", "2"])?;
    let overrides = EnvOverrides::default().frame_stack(3).action_repeat(2);
    let env = build_environment::<ToyGame>(0, &run, &overrides)?;
    assert_eq!(env.config().frame_stack, 3);
    assert_eq!(env.config().action_repeat, 2);
    assert_eq!(env.obs_shape()[0], 3);
    Ok(())
}

#[test]
fn test_mode_is_injected_in_both_branches() -> Result<()> {
    let run = run_parameters(&["--sensory-action-mode", "RELATIVE"])?;
    let env = build_environment::<ToyGame>(0, &run, &EnvOverrides::default())?;
    assert!(matches!(env, CrEnv::Pauseable(_)));
    assert_eq!(
        env.config().sensory_action_mode,
        ModeSetting::Resolved(SensoryActionMode::Relative)
    );
    assert_eq!(env.mode(), SensoryActionMode::Relative);
    assert_eq!(env.n_motor_actions(), 5);

    let run = run_parameters(&["--sensory-action-mode", "Relative", "--no-pause-env"])?;
    let env = build_environment::<ToyGame>(0, &run, &EnvOverrides::default())?;
    assert!(matches!(env, CrEnv::Foveal(_)));
    assert_eq!(
        env.config().sensory_action_mode,
        ModeSetting::Label("relative".to_string())
    );
    assert_eq!(env.mode(), SensoryActionMode::Relative);
    assert_eq!(env.n_motor_actions(), 4);
    Ok(())
}

#[test]
fn test_invalid_mode_stops_before_construction() {
    for mode in ["", "ABS", "1", "relatives", " absolute"] {
        let args = Args::parse_from(["atari_cr", "--sensory-action-mode", mode]);
        let err = RunParameters::try_from(args).unwrap_err();
        assert!(matches!(err, CrError::InvalidConfiguration(_)));
    }
}

#[test]
fn test_construction_errors_propagate() -> Result<()> {
    let run = run_parameters(&["--fov-size", "90"])?;
    let err = EnvFactory::<ToyGame>::new(run).make_train_env().err().unwrap();
    assert_eq!(format!("{}", err), "Failed to build environment 0");
    assert!(matches!(
        err.root_cause().downcast_ref::<CrError>(),
        Some(CrError::InvalidConfiguration(_))
    ));
    Ok(())
}
