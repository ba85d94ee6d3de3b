//! Host Loop
//!
//! The outer frame loop. Windowing, input devices and drawing live behind
//! the [`Host`] trait; this module only sequences them around
//! [`Session::frame`].

use std::collections::VecDeque;

use tracing::info;

use crate::game::input::InputSnapshot;
use crate::game::session::{RenderSnapshot, Session};

/// Platform services needed by [`run`].
pub trait Host {
    /// True once the window or process wants to stop.
    fn should_close(&self) -> bool;

    /// Keys held right now.
    fn poll_input(&mut self) -> InputSnapshot;

    /// Seconds since the previous call.
    fn frame_delta(&mut self) -> f32;

    /// Draw a finished frame.
    fn present(&mut self, snapshot: &RenderSnapshot);
}

/// Totals for one [`run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames presented
    pub frames: u64,
    /// Ticks simulated
    pub ticks: u64,
}

/// Drive `session` until the host asks to close.
///
/// Each frame: poll input, read the delta, simulate, present. A close
/// request is seen at the top of the next iteration, so the frame in
/// progress always finishes.
pub fn run(session: &mut Session, host: &mut impl Host) -> RunSummary {
    let mut summary = RunSummary::default();

    while !host.should_close() {
        let input = host.poll_input();
        let delta = host.frame_delta();
        let report = session.frame(input, delta);

        for event in report.events.iter().filter(|e| e.is_significant()) {
            info!("Tick {}: {:?}", event.tick, event.kind);
        }

        host.present(&session.snapshot());
        summary.frames += 1;
        summary.ticks += u64::from(report.ticks_run);
    }

    summary
}

/// A headless host that plays back a fixed list of frames.
///
/// Each entry is held keys plus frame delta. Closes when the list runs
/// out. Presented snapshots are handed to an optional observer.
pub struct ScriptedHost<F = fn(u64, &RenderSnapshot)>
where
    F: FnMut(u64, &RenderSnapshot),
{
    frames: VecDeque<(InputSnapshot, f32)>,
    current_delta: f32,
    presented: u64,
    observer: Option<F>,
}

impl ScriptedHost {
    /// Host that plays `frames` without observing output.
    pub fn new(frames: impl IntoIterator<Item = (InputSnapshot, f32)>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            current_delta: 0.0,
            presented: 0,
            observer: None,
        }
    }
}

impl<F> ScriptedHost<F>
where
    F: FnMut(u64, &RenderSnapshot),
{
    /// Host that calls `observer(frame_index, snapshot)` on every present.
    pub fn with_observer(frames: impl IntoIterator<Item = (InputSnapshot, f32)>, observer: F) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            current_delta: 0.0,
            presented: 0,
            observer: Some(observer),
        }
    }

    /// Frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl<F> Host for ScriptedHost<F>
where
    F: FnMut(u64, &RenderSnapshot),
{
    fn should_close(&self) -> bool {
        self.frames.is_empty()
    }

    fn poll_input(&mut self) -> InputSnapshot {
        match self.frames.pop_front() {
            Some((input, delta)) => {
                self.current_delta = delta;
                input
            }
            None => {
                self.current_delta = 0.0;
                InputSnapshot::new()
            }
        }
    }

    fn frame_delta(&mut self) -> f32 {
        self.current_delta
    }

    fn present(&mut self, snapshot: &RenderSnapshot) {
        if let Some(observer) = self.observer.as_mut() {
            observer(self.presented, snapshot);
        }
        self.presented += 1;
    }
}
