//! Core primitives.
//!
//! Pure value types shared by every simulation module. Nothing in here
//! holds state between calls.

pub mod rect;
pub mod vec2;
pub mod hash;

// Re-export core types
pub use rect::{Rectangle, PixelRect, intersects};
pub use vec2::Vec2;
pub use hash::{StateHash, StateHasher, compute_state_hash};
