//! Simulation Events
//!
//! Transitions observed while stepping, for the presentation layer
//! (sounds, particles, HUD flashes) and for logs. Events never feed back
//! into the simulation.

use serde::{Serialize, Deserialize};

/// Which side of the actor touched a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    /// Wall on the actor's left
    Left,
    /// Wall on the actor's right
    Right,
}

/// Event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimEventKind {
    /// Actor touched ground after being airborne
    Landed,

    /// Jump impulse applied
    Jumped,

    /// Actor made new contact with a wall
    HitWall {
        /// Side the wall is on
        side: WallSide,
    },

    /// Boost applied after a tick without boost
    BoostStarted,

    /// Boost meter hit zero while boosting
    BoostDepleted,

    /// Actor overlapped a goal for the first time since reset
    GoalReached,

    /// Session restored to its default configuration
    Reset,

    /// Scheduler discarded catch-up ticks
    TicksDropped {
        /// Whole ticks discarded
        count: u32,
    },

    /// Debug overlay toggled
    DebugToggled {
        /// New overlay state
        enabled: bool,
    },
}

/// An event with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// Session tick when the event occurred
    pub tick: u64,

    /// Event data
    pub kind: SimEventKind,
}

impl SimEvent {
    /// Create a new event.
    pub fn new(tick: u64, kind: SimEventKind) -> Self {
        Self { tick, kind }
    }

    /// Create landed event.
    pub fn landed(tick: u64) -> Self {
        Self::new(tick, SimEventKind::Landed)
    }

    /// Create jumped event.
    pub fn jumped(tick: u64) -> Self {
        Self::new(tick, SimEventKind::Jumped)
    }

    /// Create wall hit event.
    pub fn hit_wall(tick: u64, side: WallSide) -> Self {
        Self::new(tick, SimEventKind::HitWall { side })
    }

    /// Create goal reached event.
    pub fn goal_reached(tick: u64) -> Self {
        Self::new(tick, SimEventKind::GoalReached)
    }

    /// True for events the presentation layer should always surface.
    pub fn is_significant(&self) -> bool {
        matches!(
            self.kind,
            SimEventKind::GoalReached | SimEventKind::Reset | SimEventKind::TicksDropped { .. }
        )
    }
}
