//! # Platformer Core
//!
//! Movement, collision and boost simulation for a single-screen 2D
//! platformer, stepped at a fixed rate regardless of display rate.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PLATFORMER CORE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Value types                              │
//! │  ├── rect.rs      - Axis-aligned rectangles, overlap test    │
//! │  ├── vec2.rs      - 2D float vector                          │
//! │  └── hash.rs      - State hashing for run comparison         │
//! │                                                              │
//! │  game/            - Simulation                               │
//! │  ├── actor.rs     - Actor state and tunables                 │
//! │  ├── environment.rs - Level elements and default layout      │
//! │  ├── input.rs     - Input snapshots and recording            │
//! │  ├── collision.rs - Goal overlap, solid resolution           │
//! │  ├── tick.rs      - One physics step                         │
//! │  ├── scheduler.rs - Fixed-step accumulator                   │
//! │  ├── session.rs   - Reset control and render snapshots       │
//! │  └── host.rs      - Outer frame loop                         │
//! │                                                              │
//! │  config.rs        - Tunables, JSON and env loading           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Coordinates
//!
//! World units are pixels, `+x` is right and `+y` is down, so gravity is
//! positive. Everything is `f32`; rectangles are truncated to integers
//! only when handed to a renderer.
//!
//! ## Determinism
//!
//! Every tick uses the same `dt`. The same input per tick produces the
//! same state hash whether the ticks were driven by 30 fps frames, 240
//! fps frames, or a direct replay.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod config;
pub mod game;

// Re-export commonly used types
pub use core::rect::{Rectangle, PixelRect};
pub use core::vec2::Vec2;
pub use config::{SimConfig, PhysicsConfig, SchedulerConfig, DEFAULT_TICK_RATE};
pub use game::input::InputSnapshot;
pub use game::session::Session;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
