// Tunable timings, thresholds and the flashlight profile.

use std::time::Duration;

use bevy::prelude::*;

/// Every constant the story runs on. Insert a different value before `App::run` to retune.
#[derive(Resource, Debug, Clone)]
pub struct StoryConfig {
    pub timings: Timings,
    pub pursuit: PursuitConfig,
    pub flashlight: Flashlight,
    /// Length of the sleeping footage.
    pub footage_length: Duration,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            pursuit: PursuitConfig::default(),
            flashlight: Flashlight::default(),
            footage_length: Duration::from_secs(8),
        }
    }
}

/// Delays between story steps. Chained delays count from the previous step.
#[derive(Debug, Clone)]
pub struct Timings {
    pub phone_pulse: Duration,
    pub intro_exit: Duration,
    pub revelation: Duration,
    pub token_exit: Duration,
    pub proximity_start: Duration,
    pub jump_pulse: Duration,
    pub ambient_start: Duration,
    /// Half period of the background drift.
    pub ambient_cycle: Duration,
    pub caption_fade: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            phone_pulse: Duration::from_millis(150),
            intro_exit: Duration::from_millis(800),
            revelation: Duration::from_millis(500),
            token_exit: Duration::from_millis(500),
            proximity_start: Duration::from_millis(2000),
            jump_pulse: Duration::from_millis(500),
            ambient_start: Duration::from_millis(3000),
            ambient_cycle: Duration::from_secs(10),
            caption_fade: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PursuitConfig {
    /// The creature appears once the sample count exceeds this.
    pub reveal_after: u64,
    /// Pointer-to-centre distance below which the creature is lit.
    pub illumination_radius: f32,
    /// Per-axis share of the pointer's offset from the viewport centre the creature follows.
    pub follow_damping: Vec2,
    /// Minimum spacing between admitted samples. `None` admits every sample.
    pub throttle: Option<Duration>,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            reveal_after: 15,
            illumination_radius: 120.0,
            follow_damping: Vec2::splat(0.02),
            throttle: None,
        }
    }
}

/// One ring of the flashlight: darkness reached at `radius` logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamStop {
    pub radius: f32,
    pub darkness: f32,
}

/// Radial darkness profile centred on the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Flashlight {
    pub stops: Vec<BeamStop>,
}

impl Default for Flashlight {
    fn default() -> Self {
        let stop = |radius, darkness| BeamStop { radius, darkness };
        Self {
            stops: vec![
                stop(60.0, 0.0),
                stop(100.0, 0.3),
                stop(150.0, 0.8),
                stop(200.0, 0.95),
                stop(300.0, 1.0),
            ],
        }
    }
}
