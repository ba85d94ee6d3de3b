//! Actor State
//!
//! The single controllable body. Every field is readable from anywhere,
//! but only the physics step (`game::tick`, `game::collision`) and the
//! session reset write to it.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::rect::Rectangle;
use crate::core::vec2::Vec2;
use crate::game::collision::Contacts;

/// Horizontal facing of the actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Facing {
    /// Facing -X
    Left = 0,
    /// Facing +X
    #[default]
    Right = 1,
}

/// Run-cycle animation cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Current frame index
    pub frame: u32,
    /// Time accumulated towards the next frame (seconds)
    pub timer: f32,
}

impl Animation {
    /// Advance by `dt` while moving. Wraps at `frame_count`.
    pub(crate) fn advance(&mut self, dt: f32, frame_interval: f32, frame_count: u32) {
        self.timer += dt;
        if self.timer >= frame_interval {
            self.timer -= frame_interval;
            self.frame = (self.frame + 1) % frame_count.max(1);
        }
    }

    /// Back to the idle pose.
    pub(crate) fn rest(&mut self) {
        self.frame = 0;
        self.timer = 0.0;
    }
}

/// Tunables that define a fresh actor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Spawn rectangle
    pub rect: Rectangle,
    /// Horizontal acceleration from input (units/s²)
    pub acceleration: f32,
    /// Upward speed applied on jump (units/s)
    pub jump_strength: f32,
    /// Boost meter capacity
    pub max_boost: f32,
    /// Boost meter at spawn
    pub initial_boost: f32,
    /// Horizontal velocity multiplier applied each boosting tick
    pub boost_strength: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            rect: Rectangle::new(50.0, 50.0, 50.0, 50.0),
            acceleration: 3000.0,
            jump_strength: 600.0,
            max_boost: 100.0,
            initial_boost: 0.0,
            boost_strength: 1.03,
        }
    }
}

/// The controllable body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub(crate) rect: Rectangle,
    pub(crate) velocity: Vec2,
    pub(crate) acceleration: f32,
    pub(crate) jump_strength: f32,
    pub(crate) max_boost: f32,
    pub(crate) boost_charge: f32,
    pub(crate) boost_strength: f32,
    pub(crate) facing: Facing,
    pub(crate) is_moving: bool,
    pub(crate) contacts: Contacts,
    pub(crate) boosting: bool,
    pub(crate) animation: Animation,
}

impl Actor {
    /// Create an actor at rest from its config.
    pub fn new(config: &ActorConfig) -> Self {
        Self {
            rect: config.rect,
            velocity: Vec2::ZERO,
            acceleration: config.acceleration,
            jump_strength: config.jump_strength,
            max_boost: config.max_boost,
            boost_charge: config.initial_boost.clamp(0.0, config.max_boost.max(0.0)),
            boost_strength: config.boost_strength,
            facing: Facing::default(),
            is_moving: false,
            contacts: Contacts::default(),
            boosting: false,
            animation: Animation::default(),
        }
    }

    /// Current rectangle.
    #[inline]
    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    /// Current velocity (units/s).
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Input acceleration.
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Jump impulse.
    #[inline]
    pub fn jump_strength(&self) -> f32 {
        self.jump_strength
    }

    /// Boost meter capacity.
    #[inline]
    pub fn max_boost(&self) -> f32 {
        self.max_boost
    }

    /// Boost meter level, always within `0..=max_boost`.
    #[inline]
    pub fn boost_charge(&self) -> f32 {
        self.boost_charge
    }

    /// Boost velocity multiplier.
    #[inline]
    pub fn boost_strength(&self) -> f32 {
        self.boost_strength
    }

    /// Facing direction.
    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether directional input moved the actor last tick.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Whether the actor stood on a solid surface last tick.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.contacts.grounded
    }

    /// Contacts resolved last tick.
    #[inline]
    pub fn contacts(&self) -> Contacts {
        self.contacts
    }

    /// Whether boost was applied last tick.
    #[inline]
    pub fn is_boosting(&self) -> bool {
        self.boosting
    }

    /// Animation cursor.
    #[inline]
    pub fn animation(&self) -> Animation {
        self.animation
    }

    /// Hash this actor's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_rect(&self.rect);
        hasher.update_vec2(self.velocity);
        hasher.update_f32(self.boost_charge);
        hasher.update_u8(self.facing as u8);
        hasher.update_bool(self.is_moving);
        hasher.update_bool(self.contacts.grounded);
        hasher.update_bool(self.contacts.ceiling);
        hasher.update_bool(self.contacts.blocked_left);
        hasher.update_bool(self.contacts.blocked_right);
        hasher.update_bool(self.boosting);
        hasher.update_u32(self.animation.frame);
        hasher.update_f32(self.animation.timer);
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new(&ActorConfig::default())
    }
}
