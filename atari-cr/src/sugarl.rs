//! Per-game scale of the observational reward.

const BASE_SCALE: f32 = 4.0;

/// Scale of the sugarl term for `game`, an id like `ms_pacman`.
///
/// Games with larger typical returns get larger scales. Unknown games use 1/200.
pub fn sugarl_reward_scale(game: &str) -> f32 {
    let scale = match game {
        "alien" | "assault" | "asterix" | "battle_zone" | "seaquest" | "qbert"
        | "private_eye" | "road_runner" => 1. / 100.,
        "kangaroo" | "krull" | "chopper_command" | "demon_attack" => 1. / 200.,
        "up_n_down" | "frostbite" | "ms_pacman" | "amidar" | "gopher" | "boxing" => 1. / 50.,
        "hero" | "jamesbond" | "kung_fu_master" => 1. / 25.,
        "crazy_climber" => 1. / 20.,
        "freeway" => 1. / 1600.,
        "pong" => 1. / 800.,
        "bank_heist" => 1. / 250.,
        "breakout" => 1. / 35.,
        _ => 1. / 200.,
    };
    scale * BASE_SCALE
}

#[cfg(test)]
mod tests {
    use super::sugarl_reward_scale;

    #[test]
    fn test_sugarl_reward_scale() {
        assert!((sugarl_reward_scale("breakout") - 4. / 35.).abs() < 1e-6);
        assert!((sugarl_reward_scale("pong") - 0.005).abs() < 1e-6);
        assert!((sugarl_reward_scale("ms_pacman") - 0.08).abs() < 1e-6);
        assert!((sugarl_reward_scale("unknown_game") - 0.02).abs() < 1e-6);
        assert_eq!(
            sugarl_reward_scale("kangaroo"),
            sugarl_reward_scale("unknown_game")
        );
    }
}
