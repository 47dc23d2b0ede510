use atari_cr_core::Info;
use serde::{Deserialize, Serialize};

/// Statistics of a finished episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// Sum of game rewards, pause costs excluded.
    pub reward: f32,

    /// The number of steps with a motor action.
    pub ep_len: usize,

    /// The number of pauses.
    pub n_pauses: usize,

    /// Sum of the costs charged for pauses.
    pub pause_cost: f32,
}

/// Information of a step of a foveal environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrInfo {
    /// Location of the fovea after the step, `[row, col]`.
    pub fov_loc: [i32; 2],

    /// `true` if the step was a pause.
    pub is_pause: bool,

    /// Statistics of the episode, set on its last step.
    pub final_info: Option<EpisodeStats>,
}

impl Info for CrInfo {}
