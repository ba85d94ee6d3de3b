//! Environment Model
//!
//! Static level geometry: an ordered list of rectangles, each tagged with
//! semantic flags. The physics step only reads it; the session replaces it
//! wholesale on reset.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::rect::Rectangle;

// =============================================================================
// FLAGS
// =============================================================================

/// Bit index of the solid flag.
pub const FLAG_BIT_SOLID: u8 = 0;

/// Bit index of the goal flag.
pub const FLAG_BIT_GOAL: u8 = 1;

/// Test a single bit of a flag byte.
///
/// Bits outside `0..8` are never set.
#[inline]
pub fn has_flag(flags: u8, bit_index: u8) -> bool {
    bit_index < 8 && flags & (1 << bit_index) != 0
}

/// Semantic flags of an environment element (packed bits):
/// - Bit 0: solid, participates in collision resolution
/// - Bit 1: goal, triggers the win signal on overlap, never blocks
/// - Bit 2-7: Reserved
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementFlags(pub u8);

impl ElementFlags {
    /// No behavior at all.
    pub const INERT: Self = Self(0);

    /// Blocks movement.
    pub const SOLID: Self = Self(1 << FLAG_BIT_SOLID);

    /// Win trigger.
    pub const GOAL: Self = Self(1 << FLAG_BIT_GOAL);

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Combine two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if the solid bit is set.
    #[inline]
    pub fn is_solid(self) -> bool {
        has_flag(self.0, FLAG_BIT_SOLID)
    }

    /// Check if the goal bit is set.
    #[inline]
    pub fn is_goal(self) -> bool {
        has_flag(self.0, FLAG_BIT_GOAL)
    }

    /// Check if no known bit is set.
    #[inline]
    pub fn is_inert(self) -> bool {
        !self.is_solid() && !self.is_goal()
    }
}

// =============================================================================
// COLORS
// =============================================================================

/// Opaque render tag (packed `0xRRGGBBAA`). The simulation never reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTag(pub u32);

impl ColorTag {
    /// Fully transparent, used for padding.
    pub const NONE: Self = Self(0x0000_0000);
    /// Level geometry.
    pub const GRAY: Self = Self(0x8282_82FF);
    /// Goal zone.
    pub const GOLD: Self = Self(0xFFCB_00FF);
    /// Actor.
    pub const RED: Self = Self(0xE629_37FF);
}

// =============================================================================
// ELEMENTS
// =============================================================================

/// A static rectangle of the level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentElement {
    /// Occupied area
    pub rect: Rectangle,
    /// Render tag
    #[serde(default)]
    pub color: ColorTag,
    /// Semantic flags
    pub flags: ElementFlags,
}

impl EnvironmentElement {
    /// Zero-flag element that matches no behavior.
    pub const INERT: Self = Self {
        rect: Rectangle::ZERO,
        color: ColorTag::NONE,
        flags: ElementFlags::INERT,
    };

    /// Create a solid block.
    pub const fn solid(rect: Rectangle, color: ColorTag) -> Self {
        Self { rect, color, flags: ElementFlags::SOLID }
    }

    /// Create a goal zone.
    pub const fn goal(rect: Rectangle, color: ColorTag) -> Self {
        Self { rect, color, flags: ElementFlags::GOAL }
    }
}

/// The layout used when no override is configured.
///
/// A floor spanning the 1280-wide view, a floating ledge, a low wall the
/// actor can jump, and a goal zone past the wall.
pub const DEFAULT_LAYOUT: [EnvironmentElement; 4] = [
    EnvironmentElement::solid(Rectangle::new(0.0, 600.0, 1280.0, 120.0), ColorTag::GRAY),
    EnvironmentElement::solid(Rectangle::new(400.0, 470.0, 200.0, 20.0), ColorTag::GRAY),
    EnvironmentElement::solid(Rectangle::new(853.0, 500.0, 100.0, 100.0), ColorTag::GRAY),
    EnvironmentElement::goal(Rectangle::new(1180.0, 520.0, 40.0, 80.0), ColorTag::GOLD),
];

/// Layout export errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout does not fit in the requested buffer.
    #[error("layout has {needed} elements but capacity is {capacity}")]
    CapacityExceeded {
        /// Elements in the layout
        needed: usize,
        /// Requested buffer size
        capacity: usize,
    },
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Ordered collection of level elements.
///
/// Order matters: collision resolution walks elements front to back and
/// the last correction applied wins.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    elements: Vec<EnvironmentElement>,
    layout: Vec<EnvironmentElement>,
}

impl Environment {
    /// Build an environment whose default layout is `layout`.
    pub fn new(layout: Vec<EnvironmentElement>) -> Self {
        Self {
            elements: layout.clone(),
            layout,
        }
    }

    /// Restore the default layout.
    pub fn reset_to_default(&mut self) {
        self.elements.clear();
        self.elements.extend_from_slice(&self.layout);
    }

    /// Current elements in resolution order.
    #[inline]
    pub fn elements(&self) -> &[EnvironmentElement] {
        &self.elements
    }

    /// Default layout this environment resets to.
    #[inline]
    pub fn layout(&self) -> &[EnvironmentElement] {
        &self.layout
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when there are no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Solid elements in resolution order.
    pub fn solids(&self) -> impl Iterator<Item = &EnvironmentElement> {
        self.elements.iter().filter(|e| e.flags.is_solid())
    }

    /// Goal elements in order.
    pub fn goals(&self) -> impl Iterator<Item = &EnvironmentElement> {
        self.elements.iter().filter(|e| e.flags.is_goal())
    }

    /// Export into a fixed-capacity buffer.
    ///
    /// The default layout fills the first slots and the rest are inert
    /// zero elements, for consumers that want a fixed-size array.
    pub fn padded(&self, capacity: usize) -> Result<Vec<EnvironmentElement>, LayoutError> {
        reset_to_default(&self.layout, capacity)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(DEFAULT_LAYOUT.to_vec())
    }
}

/// Copy `layout` into a buffer of `capacity` slots and zero-fill the rest.
pub fn reset_to_default(
    layout: &[EnvironmentElement],
    capacity: usize,
) -> Result<Vec<EnvironmentElement>, LayoutError> {
    if layout.len() > capacity {
        return Err(LayoutError::CapacityExceeded {
            needed: layout.len(),
            capacity,
        });
    }

    let mut buffer = Vec::with_capacity(capacity);
    buffer.extend_from_slice(layout);
    buffer.resize(capacity, EnvironmentElement::INERT);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_flag() {
        assert!(has_flag(0b01, FLAG_BIT_SOLID));
        assert!(!has_flag(0b01, FLAG_BIT_GOAL));
        assert!(has_flag(0b10, FLAG_BIT_GOAL));
        assert!(has_flag(0b11, FLAG_BIT_SOLID));
        assert!(!has_flag(0xFF, 8));
        assert!(!has_flag(0, 0));
    }

    #[test]
    fn test_element_flags() {
        assert!(ElementFlags::SOLID.is_solid());
        assert!(!ElementFlags::SOLID.is_goal());
        assert!(ElementFlags::GOAL.is_goal());
        assert!(ElementFlags::INERT.is_inert());

        let both = ElementFlags::SOLID.union(ElementFlags::GOAL);
        assert_eq!(both.bits(), 0b11);
        assert!(both.is_solid() && both.is_goal());

        // Unknown bits alone are still inert
        assert!(ElementFlags(0b1000_0000).is_inert());
    }

    #[test]
    fn test_default_layout() {
        let env = Environment::default();
        assert_eq!(env.len(), DEFAULT_LAYOUT.len());
        assert_eq!(env.solids().count(), 3);
        assert_eq!(env.goals().count(), 1);
    }

    #[test]
    fn test_reset_to_default_pads_with_inert() {
        let buffer = reset_to_default(&DEFAULT_LAYOUT, 255).unwrap();
        assert_eq!(buffer.len(), 255);
        assert_eq!(&buffer[..DEFAULT_LAYOUT.len()], &DEFAULT_LAYOUT[..]);
        assert!(buffer[DEFAULT_LAYOUT.len()..]
            .iter()
            .all(|e| *e == EnvironmentElement::INERT && e.flags.is_inert()));
    }

    #[test]
    fn test_reset_to_default_exact_capacity() {
        let buffer = reset_to_default(&DEFAULT_LAYOUT, DEFAULT_LAYOUT.len()).unwrap();
        assert_eq!(buffer, DEFAULT_LAYOUT.to_vec());
    }

    #[test]
    fn test_reset_to_default_capacity_exceeded() {
        let err = reset_to_default(&DEFAULT_LAYOUT, 2).unwrap_err();
        assert_eq!(err, LayoutError::CapacityExceeded { needed: 4, capacity: 2 });
    }

    #[test]
    fn test_environment_reset_restores_layout() {
        let mut env = Environment::default();
        env.elements.push(EnvironmentElement::solid(
            Rectangle::new(0.0, 0.0, 10.0, 10.0),
            ColorTag::GRAY,
        ));
        env.elements.swap(0, 1);
        assert_ne!(env.elements(), env.layout());

        env.reset_to_default();
        assert_eq!(env.elements(), env.layout());
    }

    #[test]
    fn test_padded_export() {
        let env = Environment::default();
        let padded = env.padded(8).unwrap();
        assert_eq!(padded.len(), 8);
        assert_eq!(padded[3], DEFAULT_LAYOUT[3]);
        assert_eq!(padded[7], EnvironmentElement::INERT);
    }

    #[test]
    fn test_flags_json_roundtrip_is_plain_byte() {
        let json = serde_json::to_string(&ElementFlags::GOAL).unwrap();
        assert_eq!(json, "2");
    }
}
