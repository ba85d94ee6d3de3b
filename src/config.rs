//! Simulation Configuration
//!
//! Every tunable of the simulation in one serde-friendly tree. Sections
//! fall back to their defaults when omitted, so a config file only needs
//! the values it changes.

use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::game::actor::ActorConfig;
use crate::game::environment::EnvironmentElement;

/// Default simulation rate (Hz).
pub const DEFAULT_TICK_RATE: u32 = 128;

/// Environment variable naming a JSON config file.
pub const ENV_CONFIG_PATH: &str = "PLATFORMER_CONFIG";

/// Environment variable overriding the tick rate (Hz).
pub const ENV_TICK_RATE: &str = "PLATFORMER_TICK_RATE";

/// Environment variable capping catch-up ticks per frame.
pub const ENV_MAX_CATCHUP_TICKS: &str = "PLATFORMER_MAX_CATCHUP_TICKS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How drag factors relate to the tick length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DragScaling {
    /// `vx *= factor` once per tick. Damping depends on the tick rate.
    #[default]
    PerTick,

    /// `vx *= factor^(dt / reference_tick)`. Damping per second is the
    /// same at any tick rate; at `dt == reference_tick` it matches `PerTick`.
    Timestep {
        /// Tick length the factors were tuned for (seconds)
        reference_tick: f32,
    },
}

impl DragScaling {
    /// Retention multiplier for one tick of length `dt`.
    #[inline]
    pub fn retention(self, factor: f32, dt: f32) -> f32 {
        match self {
            DragScaling::PerTick => factor,
            DragScaling::Timestep { reference_tick } => factor.powf(dt / reference_tick),
        }
    }
}

/// Physics constants used by every tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration while airborne (units/s²)
    pub gravity: f32,
    /// Slack on the perpendicular overlap test of collision resolution
    pub collision_allowance: f32,
    /// Horizontal velocity retention while grounded
    pub ground_drag: f32,
    /// Horizontal velocity retention while airborne
    pub air_drag: f32,
    /// Relation between drag and tick length
    pub drag_scaling: DragScaling,
    /// Boost charge gained per second while grounded
    pub boost_recharge_rate: f32,
    /// Boost charge spent per second while boosting
    pub boost_drain_rate: f32,
    /// Seconds per run-cycle frame
    pub animation_frame_interval: f32,
    /// Frames in the run cycle
    pub animation_frame_count: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1500.0,
            collision_allowance: 5.0,
            ground_drag: 0.90,
            air_drag: 0.96,
            drag_scaling: DragScaling::PerTick,
            boost_recharge_rate: 20.0,
            boost_drain_rate: 100.0,
            animation_frame_interval: 1.0 / 30.0,
            animation_frame_count: 4,
        }
    }
}

/// Fixed-step scheduler settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Simulation tick length (seconds)
    pub fixed_tick: f32,
    /// Catch-up cap per frame; `None` runs every pending tick
    pub max_ticks_per_frame: Option<u32>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fixed_tick: 1.0 / DEFAULT_TICK_RATE as f32,
            max_ticks_per_frame: None,
        }
    }
}

/// Complete simulation configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Physics constants
    pub physics: PhysicsConfig,
    /// Scheduler settings
    pub scheduler: SchedulerConfig,
    /// Default actor snapshot
    pub actor: ActorConfig,
    /// Level override; `None` uses the built-in layout
    pub layout: Option<Vec<EnvironmentElement>>,
}

impl SimConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Build from the process environment.
    ///
    /// Starts from `PLATFORMER_CONFIG` if set (defaults otherwise), then
    /// applies `PLATFORMER_TICK_RATE` and `PLATFORMER_MAX_CATCHUP_TICKS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SimConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_PATH) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(rate) = lookup(ENV_TICK_RATE) {
            let rate: u32 = rate
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{ENV_TICK_RATE}={rate} is not a rate")))?;
            if rate == 0 {
                return Err(ConfigError::Invalid(format!("{ENV_TICK_RATE} must be positive")));
            }
            config.scheduler.fixed_tick = 1.0 / rate as f32;
        }

        if let Some(cap) = lookup(ENV_MAX_CATCHUP_TICKS) {
            let cap: u32 = cap
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{ENV_MAX_CATCHUP_TICKS}={cap} is not a count")))?;
            config.scheduler.max_ticks_per_frame = (cap > 0).then_some(cap);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        let tick = self.scheduler.fixed_tick;
        if !tick.is_finite() || tick <= 0.0 {
            return invalid("scheduler.fixed_tick must be a positive number of seconds");
        }
        if self.scheduler.max_ticks_per_frame == Some(0) {
            return invalid("scheduler.max_ticks_per_frame must be at least 1");
        }

        let p = &self.physics;
        let finite = [
            ("physics.gravity", p.gravity),
            ("physics.collision_allowance", p.collision_allowance),
            ("physics.boost_recharge_rate", p.boost_recharge_rate),
            ("physics.boost_drain_rate", p.boost_drain_rate),
            ("actor.acceleration", self.actor.acceleration),
            ("actor.jump_strength", self.actor.jump_strength),
            ("actor.boost_strength", self.actor.boost_strength),
            ("actor.max_boost", self.actor.max_boost),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be a finite number")));
        }

        for (name, drag) in [("physics.ground_drag", p.ground_drag), ("physics.air_drag", p.air_drag)] {
            if !(0.0..=1.0).contains(&drag) {
                return Err(ConfigError::Invalid(format!("{name} must be within 0..=1")));
            }
        }
        if let DragScaling::Timestep { reference_tick } = p.drag_scaling {
            if !reference_tick.is_finite() || reference_tick <= 0.0 {
                return invalid("physics.drag_scaling.reference_tick must be positive");
            }
        }
        if p.collision_allowance < 0.0 {
            return invalid("physics.collision_allowance must not be negative");
        }
        if p.boost_recharge_rate < 0.0 || p.boost_drain_rate < 0.0 {
            return invalid("physics boost rates must not be negative");
        }
        if p.animation_frame_count == 0 {
            return invalid("physics.animation_frame_count must be at least 1");
        }
        if !p.animation_frame_interval.is_finite() || p.animation_frame_interval <= 0.0 {
            return invalid("physics.animation_frame_interval must be positive");
        }

        let a = &self.actor;
        let rect_finite = [a.rect.x, a.rect.y, a.rect.width, a.rect.height]
            .iter()
            .all(|v| v.is_finite());
        if !rect_finite || a.rect.is_empty() {
            return invalid("actor.rect must be finite with a positive size");
        }
        if a.max_boost < 0.0 {
            return invalid("actor.max_boost must not be negative");
        }
        if !(0.0..=a.max_boost).contains(&a.initial_boost) {
            return invalid("actor.initial_boost must be within 0..=max_boost");
        }

        if let Some(layout) = &self.layout {
            if layout.iter().any(|e| e.rect.width < 0.0 || e.rect.height < 0.0) {
                return invalid("layout rectangles must not have negative size");
            }
        }

        Ok(())
    }
}
