//! Game Logic Module
//!
//! All simulation code. Given the same inputs and the same tick length,
//! every run produces the same trajectory.
//!
//! ## Module Structure
//!
//! - `actor`: The controllable body and its tunables
//! - `environment`: Level elements, flags, default layout
//! - `input`: Held-key snapshots, recording and replay
//! - `collision`: Goal overlap and solid resolution
//! - `tick`: One physics step
//! - `scheduler`: Fixed-step accumulator
//! - `session`: Run state, reset control, render snapshots
//! - `host`: Outer frame loop
//! - `events`: Transitions for presentation and logs

pub mod actor;
pub mod environment;
pub mod input;
pub mod collision;
pub mod tick;
pub mod scheduler;
pub mod session;
pub mod host;
pub mod events;

// Re-export key types
pub use actor::{Actor, ActorConfig, Facing};
pub use environment::{Environment, EnvironmentElement, ElementFlags, ColorTag, DEFAULT_LAYOUT};
pub use input::{InputSnapshot, InputRecording};
pub use collision::Contacts;
pub use tick::{tick, TickReport};
pub use scheduler::FixedStepScheduler;
pub use session::{Session, SimulationSignals, RenderSnapshot, replay};
pub use host::{Host, run};
pub use events::{SimEvent, SimEventKind};
