//! Collision Detection and Resolution
//!
//! Goal overlap checks and axis-separated resolution of the actor against
//! solid elements.
//!
//! Resolution is sequential: elements are visited in environment order,
//! and for each one the horizontal pass runs before the vertical pass.
//! Each correction is applied immediately, so later elements see the
//! corrected rectangle and the last applied correction wins. There is no
//! sorting by penetration depth.

use serde::{Serialize, Deserialize};

use crate::core::rect::Rectangle;
use crate::core::vec2::Vec2;
use crate::game::actor::Actor;
use crate::game::environment::Environment;

/// Contacts found while resolving one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contacts {
    /// Standing on a solid top face
    pub grounded: bool,
    /// Pressed against a solid bottom face
    pub ceiling: bool,
    /// A wall is on the actor's left
    pub blocked_left: bool,
    /// A wall is on the actor's right
    pub blocked_right: bool,
}

impl Contacts {
    /// True if any wall was touched.
    #[inline]
    pub fn touching_wall(&self) -> bool {
        self.blocked_left || self.blocked_right
    }
}

/// Check whether the actor overlaps any goal element.
///
/// Never modifies anything; goal elements do not block movement.
pub fn check_goal_overlap(actor_rect: &Rectangle, env: &Environment) -> bool {
    env.goals().any(|goal| actor_rect.intersects(&goal.rect))
}

/// Resolve the actor against every solid element, in order.
pub fn resolve_solids(actor: &mut Actor, env: &Environment, allowance: f32) -> Contacts {
    let mut contacts = Contacts::default();

    for element in env.solids() {
        resolve_against(
            &mut actor.rect,
            &mut actor.velocity,
            &element.rect,
            allowance,
            &mut contacts,
        );
    }

    contacts
}

/// Resolve one actor rectangle against one solid rectangle.
///
/// `allowance` shrinks the perpendicular overlap test on both sides, so
/// an actor resting on a floor is not pushed sideways by it and an actor
/// sliding down a wall does not land on its top corner.
pub fn resolve_against(
    rect: &mut Rectangle,
    velocity: &mut Vec2,
    solid: &Rectangle,
    allowance: f32,
    contacts: &mut Contacts,
) {
    // Horizontal pass
    let overlaps_vertically =
        rect.top() < solid.bottom() - allowance && rect.bottom() > solid.top() + allowance;

    if overlaps_vertically {
        if rect.left() < solid.left() && rect.right() >= solid.left() {
            // Entered through the element's left face
            rect.x = solid.left() - rect.width;
            velocity.x = 0.0;
            contacts.blocked_right = true;
        } else if rect.right() > solid.right() && rect.left() <= solid.right() {
            // Entered through the element's right face
            rect.x = solid.right();
            velocity.x = 0.0;
            contacts.blocked_left = true;
        }
    }

    // Vertical pass, against the x just corrected above
    let overlaps_horizontally =
        rect.left() < solid.right() - allowance && rect.right() > solid.left() + allowance;

    if overlaps_horizontally {
        if rect.top() < solid.top() && rect.bottom() >= solid.top() {
            // Landed on the top face
            rect.y = solid.top() - rect.height;
            velocity.y = 0.0;
            contacts.grounded = true;
        } else if rect.bottom() > solid.bottom() && rect.top() <= solid.bottom() {
            // Bumped the bottom face
            rect.y = solid.bottom();
            velocity.y = 0.0;
            contacts.ceiling = true;
        }
    }
}
