//! Physics Step
//!
//! One fixed tick of actor simulation. The order of the stages is fixed
//! and later stages depend on the positions and velocities earlier ones
//! clamped:
//!
//! ```text
//! goal check → solid resolution (x then y, per element) → drag
//!   → boost recharge → gravity → input (speed cap) → integration → animation
//! ```
//!
//! The step is infallible and runs in time linear in the element count.

#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::config::PhysicsConfig;
use crate::game::actor::{Actor, Facing};
use crate::game::collision::{Contacts, check_goal_overlap, resolve_solids};
use crate::game::environment::Environment;
use crate::game::events::{SimEvent, SimEventKind, WallSide};
use crate::game::input::InputSnapshot;
use crate::game::session::SimulationSignals;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Contacts resolved this tick
    pub contacts: Contacts,
    /// Events generated this tick
    pub events: Vec<SimEvent>,
}

/// Run one physics tick.
///
/// # Arguments
///
/// * `actor` - The actor (will be mutated)
/// * `env` - Level geometry, read only
/// * `input` - Keys held during this tick
/// * `dt` - Tick length in seconds (constant when driven by the scheduler)
/// * `config` - Physics constants
/// * `signals` - Session flags; `goal_reached` may be set
/// * `tick_index` - Session tick number, stamped on events
pub fn tick(
    actor: &mut Actor,
    env: &Environment,
    input: &InputSnapshot,
    dt: f32,
    config: &PhysicsConfig,
    signals: &mut SimulationSignals,
    tick_index: u64,
) -> TickReport {
    let mut report = TickReport::default();
    let previous = actor.contacts;
    let was_boosting = actor.boosting;

    // 1. Goal check, before any correction
    if check_goal_overlap(&actor.rect, env) && !signals.goal_reached {
        signals.goal_reached = true;
        report.events.push(SimEvent::goal_reached(tick_index));
    }

    // 2. Solid resolution
    let contacts = resolve_solids(actor, env, config.collision_allowance);
    actor.contacts = contacts;
    report.contacts = contacts;

    if contacts.grounded && !previous.grounded {
        report.events.push(SimEvent::landed(tick_index));
    }
    if contacts.blocked_right && !previous.blocked_right {
        report.events.push(SimEvent::hit_wall(tick_index, WallSide::Right));
    }
    if contacts.blocked_left && !previous.blocked_left {
        report.events.push(SimEvent::hit_wall(tick_index, WallSide::Left));
    }

    let grounded = contacts.grounded;

    // 3. Drag
    let drag = if grounded { config.ground_drag } else { config.air_drag };
    actor.velocity.x *= config.drag_scaling.retention(drag, dt);

    // 4. Boost recharge
    if grounded {
        actor.boost_charge = (actor.boost_charge + config.boost_recharge_rate * dt).min(actor.max_boost);
    }

    // 5. Gravity
    if !grounded {
        actor.velocity.y += config.gravity * dt;
    }

    // 6. Input
    apply_input(actor, input, contacts, dt, config);

    if input.jump() && grounded {
        report.events.push(SimEvent::jumped(tick_index));
    }
    if actor.boosting && !was_boosting {
        report.events.push(SimEvent::new(tick_index, SimEventKind::BoostStarted));
    }
    if actor.boosting && actor.boost_charge == 0.0 {
        report.events.push(SimEvent::new(tick_index, SimEventKind::BoostDepleted));
    }

    // 7. Integration with the post-resolution velocity
    actor.rect = actor.rect.translated(actor.velocity.scale(dt));

    // 8. Animation
    if actor.is_moving {
        actor
            .animation
            .advance(dt, config.animation_frame_interval, config.animation_frame_count);
    } else {
        actor.animation.rest();
    }

    debug_assert!(
        (0.0..=actor.max_boost).contains(&actor.boost_charge),
        "boost charge {} outside 0..={}",
        actor.boost_charge,
        actor.max_boost
    );

    #[cfg(feature = "debug-tracing")]
    trace!(
        tick = tick_index,
        x = actor.rect.x,
        y = actor.rect.y,
        vx = actor.velocity.x,
        vy = actor.velocity.y,
        grounded,
        boost = actor.boost_charge,
        "tick"
    );

    report
}

/// Movement, jump and boost response.
fn apply_input(
    actor: &mut Actor,
    input: &InputSnapshot,
    contacts: Contacts,
    dt: f32,
    config: &PhysicsConfig,
) {
    let grounded = contacts.grounded;
    actor.is_moving = false;

    if input.right() && !contacts.blocked_right {
        actor.velocity.x += actor.acceleration * dt;
        actor.facing = Facing::Right;
        actor.is_moving = true;
    }
    if input.left() && !contacts.blocked_left {
        actor.velocity.x -= actor.acceleration * dt;
        actor.facing = Facing::Left;
        actor.is_moving = true;
    }

    // Impulse, not scaled by dt
    if input.jump() && grounded {
        actor.velocity.y = -actor.jump_strength;
    }

    actor.boosting = false;
    if input.boost() && !grounded && input.any_direction() && actor.boost_charge > 0.0 {
        actor.boost_charge = (actor.boost_charge - config.boost_drain_rate * dt).max(0.0);
        actor.velocity.x *= actor.boost_strength;
        actor.boosting = true;
    }

    // Horizontal travel per tick stays inside the collision band, so a
    // wall is never crossed by more than the allowance.
    if config.collision_allowance > 0.0 && dt > 0.0 {
        let max_speed = config.collision_allowance / dt;
        actor.velocity.x = actor.velocity.x.clamp(-max_speed, max_speed);
    }
}
