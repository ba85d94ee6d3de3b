//! Session and Reset Control
//!
//! Owns everything one run of the simulation needs: the actor, the
//! environment, the session signals, the scheduler and an optional input
//! recording. A host drives it one display frame at a time through
//! [`Session::frame`] and draws what [`Session::snapshot`] returns.

use serde::{Serialize, Deserialize};
use tracing::{info, warn, debug};

use crate::config::SimConfig;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::core::rect::{PixelRect, Rectangle};
use crate::game::actor::{Actor, Facing};
use crate::game::environment::{ColorTag, Environment};
use crate::game::events::{SimEvent, SimEventKind};
use crate::game::input::{InputRecording, InputSnapshot};
use crate::game::scheduler::FixedStepScheduler;
use crate::game::tick::{TickReport, tick};

/// Session-wide flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSignals {
    /// Set when the actor first overlaps a goal; cleared only by reset
    pub goal_reached: bool,
    /// A reset will run before the next frame's ticks
    pub reset_requested: bool,
    /// Presentation-only overlay toggle; survives reset
    pub debug_overlay: bool,
}

/// Outcome of one display frame.
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Ticks simulated this frame
    pub ticks_run: u32,
    /// Ticks discarded by the catch-up cap
    pub ticks_dropped: u32,
    /// Events in the order they happened
    pub events: Vec<SimEvent>,
    /// Grounded state after the last tick
    pub grounded: bool,
}

/// One element as the renderer needs it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RenderElement {
    /// World rectangle
    pub rect: Rectangle,
    /// Truncated pixel rectangle
    pub pixels: PixelRect,
    /// Display color
    pub color: ColorTag,
}

/// Everything a frame needs to draw, read after the frame's ticks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderSnapshot {
    /// Actor rectangle in world units
    pub actor_rect: Rectangle,
    /// Actor rectangle truncated to pixels
    pub actor_pixels: PixelRect,
    /// Sprite facing
    pub facing: Facing,
    /// Run-cycle frame
    pub animation_frame: u32,
    /// Boost meter level
    pub boost_charge: f32,
    /// Boost meter capacity
    pub max_boost: f32,
    /// Goal flag, for the success text
    pub goal_reached: bool,
    /// Grounded flag
    pub grounded: bool,
    /// Debug overlay flag
    pub debug_overlay: bool,
    /// Fraction of a tick pending in the scheduler
    pub alpha: f32,
    /// Level elements in order
    pub elements: Vec<RenderElement>,
}

/// A running simulation.
pub struct Session {
    config: SimConfig,
    actor: Actor,
    environment: Environment,
    signals: SimulationSignals,
    scheduler: FixedStepScheduler,
    tick: u64,
    previous_input: InputSnapshot,
    recording: Option<InputRecording>,
}

impl Session {
    /// Build a session in its default state.
    pub fn new(config: SimConfig) -> Self {
        let environment = config
            .layout
            .clone()
            .map(Environment::new)
            .unwrap_or_default();
        info!(
            "Session started: {} elements, tick {:.5}s",
            environment.len(),
            config.scheduler.fixed_tick
        );

        Self {
            actor: Actor::new(&config.actor),
            environment,
            signals: SimulationSignals::default(),
            scheduler: FixedStepScheduler::new(config.scheduler),
            tick: 0,
            previous_input: InputSnapshot::new(),
            recording: None,
            config,
        }
    }

    /// Restore the default actor and environment.
    ///
    /// Clears the goal flag, any pending reset, pending scheduler time and
    /// the tick counter. The debug overlay toggle is kept. An active
    /// recording restarts, since replays begin from the default state.
    pub fn reset(&mut self) -> SimEvent {
        self.actor = Actor::new(&self.config.actor);
        self.environment.reset_to_default();
        self.signals.goal_reached = false;
        self.signals.reset_requested = false;
        self.scheduler.reset();
        self.tick = 0;

        if self.recording.is_some() {
            self.recording = Some(InputRecording::new());
        }

        info!("Session reset");
        SimEvent::new(0, SimEventKind::Reset)
    }

    /// Ask for a reset before the next frame's ticks.
    pub fn request_reset(&mut self) {
        self.signals.reset_requested = true;
    }

    /// Advance by one display frame.
    ///
    /// Reset and debug-toggle requests are read from `input` first, a
    /// pending reset runs next, then every due tick runs with the frame's
    /// movement keys.
    pub fn frame(&mut self, input: InputSnapshot, frame_delta: f32) -> FrameReport {
        let mut report = FrameReport::default();

        let pressed = input.pressed_since(&self.previous_input);
        self.previous_input = input;

        if input.reset() {
            self.signals.reset_requested = true;
        }
        if pressed.toggle_debug() {
            self.signals.debug_overlay = !self.signals.debug_overlay;
            report.events.push(SimEvent::new(
                self.tick,
                SimEventKind::DebugToggled { enabled: self.signals.debug_overlay },
            ));
        }
        if self.signals.reset_requested {
            report.events.push(self.reset());
        }

        let movement = input.movement_only();
        let Session {
            config,
            actor,
            environment,
            signals,
            scheduler,
            tick: tick_count,
            recording,
            ..
        } = self;
        let goal_before = signals.goal_reached;

        let advance = scheduler.advance(frame_delta, |dt| {
            let result = tick(actor, environment, &movement, dt, &config.physics, signals, *tick_count);
            if let Some(recording) = recording.as_mut() {
                recording.push(movement);
            }
            *tick_count += 1;
            report.events.extend(result.events);
        });

        for event in report.events.iter().filter(|e| e.kind == SimEventKind::Landed) {
            debug!("Landed at tick {}", event.tick);
        }
        if !goal_before && self.signals.goal_reached {
            info!("Goal reached at tick {}", self.tick);
        }
        if advance.ticks_dropped > 0 {
            warn!(
                "Frame of {:.3}s exceeded the catch-up cap, dropped {} ticks",
                frame_delta, advance.ticks_dropped
            );
            report.events.push(SimEvent::new(
                self.tick,
                SimEventKind::TicksDropped { count: advance.ticks_dropped },
            ));
        }
        debug!("Frame ran {} ticks, {:.5}s pending", advance.ticks_run, advance.accumulator);

        report.ticks_run = advance.ticks_run;
        report.ticks_dropped = advance.ticks_dropped;
        report.grounded = self.actor.is_grounded();
        report
    }

    /// Run exactly one tick at the configured tick length, bypassing the
    /// scheduler.
    pub fn step(&mut self, input: InputSnapshot) -> TickReport {
        let movement = input.movement_only();
        let result = tick(
            &mut self.actor,
            &self.environment,
            &movement,
            self.config.scheduler.fixed_tick,
            &self.config.physics,
            &mut self.signals,
            self.tick,
        );
        if let Some(recording) = self.recording.as_mut() {
            recording.push(movement);
        }
        self.tick += 1;
        result
    }

    /// Current render state.
    pub fn snapshot(&self) -> RenderSnapshot {
        let rect = self.actor.rect();
        RenderSnapshot {
            actor_rect: rect,
            actor_pixels: rect.to_pixels(),
            facing: self.actor.facing(),
            animation_frame: self.actor.animation().frame,
            boost_charge: self.actor.boost_charge(),
            max_boost: self.actor.max_boost(),
            goal_reached: self.signals.goal_reached,
            grounded: self.actor.is_grounded(),
            debug_overlay: self.signals.debug_overlay,
            alpha: self.scheduler.alpha(),
            elements: self
                .environment
                .elements()
                .iter()
                .map(|e| RenderElement {
                    rect: e.rect,
                    pixels: e.rect.to_pixels(),
                    color: e.color,
                })
                .collect(),
        }
    }

    /// Hash of the simulated state, for comparing runs.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            self.actor.hash_into(hasher);
            hasher.update_bool(self.signals.goal_reached);
        })
    }

    /// Start logging every tick's input. Replays assume the recording
    /// starts from the default state, so call this on a new or just-reset
    /// session.
    pub fn start_recording(&mut self) {
        self.recording = Some(InputRecording::new());
    }

    /// Stop recording and hand back what was captured.
    pub fn take_recording(&mut self) -> Option<InputRecording> {
        self.recording.take()
    }

    /// The actor.
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The environment.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Session flags.
    pub fn signals(&self) -> &SimulationSignals {
        &self.signals
    }

    /// Ticks since the last reset.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Configuration in use.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

/// Re-run a recording from the default state, one tick per entry.
pub fn replay(config: &SimConfig, recording: &InputRecording) -> Session {
    let mut session = Session::new(config.clone());
    for (_, input) in recording.replay_iter() {
        session.step(input);
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::environment::EnvironmentElement;

    const FRAME: f32 = 1.0 / 60.0;

    fn floor_config(floor_y: f32) -> SimConfig {
        SimConfig {
            actor: crate::game::actor::ActorConfig {
                rect: Rectangle::new(0.0, 0.0, 30.0, 50.0),
                ..Default::default()
            },
            layout: Some(vec![EnvironmentElement::solid(
                Rectangle::new(0.0, floor_y, 1000.0, 100.0),
                ColorTag::GRAY,
            )]),
            ..SimConfig::default()
        }
    }

    fn run_frames(session: &mut Session, input: InputSnapshot, frames: u32) -> Vec<SimEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            events.extend(session.frame(input, FRAME).events);
        }
        events
    }

    #[test]
    fn test_new_session_default_state() {
        let session = Session::new(SimConfig::default());
        assert_eq!(session.actor(), &Actor::default());
        assert_eq!(session.environment(), &Environment::default());
        assert_eq!(session.signals(), &SimulationSignals::default());
        assert_eq!(session.tick_count(), 0);
    }

    #[test]
    fn test_falls_and_rests_on_floor() {
        let mut session = Session::new(floor_config(500.0));
        let events = run_frames(&mut session, InputSnapshot::new(), 120);

        let rect = session.actor().rect();
        assert_eq!(rect.bottom(), 500.0);
        assert_eq!(session.actor().velocity().y, 0.0);
        assert!(session.actor().is_grounded());
        assert!(events.iter().any(|e| e.kind == SimEventKind::Landed));
    }

    #[test]
    fn test_settles_from_low_spawn() {
        let mut config = floor_config(600.0);
        config.actor.rect = Rectangle::new(100.0, 530.0, 50.0, 50.0);
        let mut session = Session::new(config);

        let report = session.frame(InputSnapshot::new(), 0.5);
        assert_eq!(report.ticks_run, 64);
        assert!(report.grounded);
        assert_eq!(session.actor().rect().y, 550.0);
        assert_eq!(session.actor().velocity().y, 0.0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let config = SimConfig::default();
        let mut session = Session::new(config.clone());
        run_frames(&mut session, InputSnapshot::new().with_right().with_jump(), 30);
        assert_ne!(session.actor(), &Actor::new(&config.actor));

        let event = session.reset();
        assert_eq!(event.kind, SimEventKind::Reset);
        let first_actor = session.actor().clone();
        let first_hash = session.compute_hash();

        session.reset();
        assert_eq!(session.actor(), &first_actor);
        assert_eq!(session.compute_hash(), first_hash);
        assert_eq!(session.actor(), &Actor::new(&config.actor));
        assert_eq!(session.environment().elements(), session.environment().layout());
        assert_eq!(session.tick_count(), 0);
        assert_eq!(session.scheduler.accumulator(), 0.0);
    }

    #[test]
    fn test_reset_through_input() {
        let mut session = Session::new(SimConfig::default());
        run_frames(&mut session, InputSnapshot::new().with_right(), 20);
        assert!(session.tick_count() > 0);

        let report = session.frame(InputSnapshot::new().with_reset(), 0.0);
        assert_eq!(report.ticks_run, 0);
        assert_eq!(report.events[0].kind, SimEventKind::Reset);
        assert_eq!(session.actor(), &Actor::default());
        assert!(!session.signals().reset_requested);
    }

    #[test]
    fn test_request_reset_runs_before_ticks() {
        let mut session = Session::new(SimConfig::default());
        run_frames(&mut session, InputSnapshot::new().with_right(), 20);
        session.request_reset();
        assert!(session.signals().reset_requested);

        let report = session.frame(InputSnapshot::new(), FRAME);
        assert_eq!(report.events[0].kind, SimEventKind::Reset);
        assert_eq!(session.tick_count(), report.ticks_run as u64);
    }

    #[test]
    fn test_debug_toggle_on_press_edge() {
        let mut session = Session::new(SimConfig::default());
        let toggle = InputSnapshot::new().with_toggle_debug();

        run_frames(&mut session, toggle, 5);
        assert!(session.signals().debug_overlay);

        run_frames(&mut session, InputSnapshot::new(), 1);
        let events = run_frames(&mut session, toggle, 1);
        assert!(!session.signals().debug_overlay);
        assert!(events
            .iter()
            .any(|e| e.kind == SimEventKind::DebugToggled { enabled: false }));
    }

    #[test]
    fn test_debug_overlay_survives_reset() {
        let mut session = Session::new(SimConfig::default());
        session.frame(InputSnapshot::new().with_toggle_debug(), FRAME);
        session.reset();
        assert!(session.signals().debug_overlay);
    }

    #[test]
    fn test_goal_does_not_block() {
        let mut config = SimConfig::default();
        // Spawn above the default goal zone
        config.actor.rect = Rectangle::new(1185.0, 440.0, 30.0, 50.0);
        let mut session = Session::new(config);

        let events = run_frames(&mut session, InputSnapshot::new(), 90);
        assert!(session.signals().goal_reached);
        assert!(session.snapshot().goal_reached);
        // Fell through the goal onto the floor
        assert_eq!(session.actor().rect().bottom(), 600.0);
        let goals = events.iter().filter(|e| e.kind == SimEventKind::GoalReached).count();
        assert_eq!(goals, 1);

        session.reset();
        assert!(!session.signals().goal_reached);
    }

    #[test]
    fn test_snapshot_contents() {
        let session = Session::new(SimConfig::default());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.actor_rect, Rectangle::new(50.0, 50.0, 50.0, 50.0));
        assert_eq!(snapshot.actor_pixels, PixelRect { x: 50, y: 50, width: 50, height: 50 });
        assert_eq!(snapshot.elements.len(), 4);
        assert_eq!(snapshot.elements[0].pixels.y, 600);
        assert_eq!(snapshot.max_boost, 100.0);
        assert!(!snapshot.goal_reached);
    }

    #[test]
    fn test_catch_up_cap_reports_drop() {
        let mut config = SimConfig::default();
        config.scheduler.max_ticks_per_frame = Some(8);
        let mut session = Session::new(config);

        let report = session.frame(InputSnapshot::new(), 0.25);
        assert_eq!(report.ticks_run, 8);
        assert_eq!(report.ticks_dropped, 24);
        assert!(report
            .events
            .iter()
            .any(|e| e.kind == SimEventKind::TicksDropped { count: 24 }));
        assert_eq!(session.tick_count(), 8);
    }

    #[test]
    fn test_frame_rate_does_not_change_outcome() {
        let input = InputSnapshot::new().with_right();

        let mut fast = Session::new(SimConfig::default());
        for _ in 0..128 {
            fast.frame(input, 1.0 / 128.0);
        }

        let mut slow = Session::new(SimConfig::default());
        for _ in 0..4 {
            slow.frame(input, 0.25);
        }

        assert_eq!(fast.tick_count(), 128);
        assert_eq!(slow.tick_count(), 128);
        assert_eq!(fast.compute_hash(), slow.compute_hash());
    }

    #[test]
    fn test_split_frames_match_single_frame() {
        let input = InputSnapshot::new().with_right();

        let mut split = Session::new(SimConfig::default());
        for _ in 0..3 {
            split.frame(input, 0.01);
        }

        let mut single = Session::new(SimConfig::default());
        single.frame(input, 0.03);

        assert_eq!(split.tick_count(), 3);
        assert_eq!(single.tick_count(), 3);
        assert_eq!(split.actor(), single.actor());
        assert_eq!(split.compute_hash(), single.compute_hash());
    }

    #[test]
    fn test_replay_matches_live_run() {
        let config = SimConfig::default();
        let mut live = Session::new(config.clone());
        live.start_recording();

        let script = [
            (InputSnapshot::new(), 30),
            (InputSnapshot::new().with_right(), 40),
            (InputSnapshot::new().with_right().with_jump(), 5),
            (InputSnapshot::new().with_right().with_boost(), 20),
            (InputSnapshot::new().with_left(), 25),
        ];
        for (input, frames) in script {
            for i in 0..frames {
                // Uneven frame lengths
                let delta = if i % 3 == 0 { 0.021 } else { 0.014 };
                live.frame(input, delta);
            }
        }

        let recording = live.take_recording().unwrap();
        assert_eq!(recording.tick_count, live.tick_count());

        let replayed = replay(&config, &recording);
        assert_eq!(replayed.tick_count(), live.tick_count());
        assert_eq!(replayed.actor(), live.actor());
        assert_eq!(replayed.compute_hash(), live.compute_hash());
    }
}
