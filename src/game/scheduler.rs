//! Fixed-Step Scheduler
//!
//! Decouples simulation rate from display rate. Real frame time is added
//! to an accumulator and whole fixed ticks are drained from it; the
//! sub-tick remainder carries over to the next frame. Every tick sees the
//! same `dt`, so the same input sequence produces the same trajectory at
//! any frame rate.

use crate::config::SchedulerConfig;

/// Outcome of one scheduler advance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Advance {
    /// Accumulator left for the next frame, in `[0, fixed_tick)`
    pub accumulator: f32,
    /// Ticks executed
    pub ticks_run: u32,
    /// Whole ticks discarded by the catch-up cap
    pub ticks_dropped: u32,
}

/// Add `frame_delta` to `accumulator` and run `step(fixed_tick)` once per
/// whole tick.
///
/// Non-finite or negative deltas count as zero. With `max_ticks` set, at
/// most that many ticks run; whole ticks still pending afterwards are
/// dropped and only the sub-tick remainder is kept.
pub fn advance<F>(
    accumulator: f32,
    frame_delta: f32,
    fixed_tick: f32,
    max_ticks: Option<u32>,
    mut step: F,
) -> Advance
where
    F: FnMut(f32),
{
    let delta = if frame_delta.is_finite() && frame_delta > 0.0 { frame_delta } else { 0.0 };
    let accumulator = accumulator + delta;

    // Count whole ticks up front. Repeated `-= fixed_tick` stops changing
    // an f32 accumulator once it is large enough.
    let remainder = accumulator % fixed_tick;
    let whole = ((accumulator - remainder) / fixed_tick).round();
    let due = if whole >= u32::MAX as f32 { u32::MAX } else { whole as u32 };

    let ticks_run = max_ticks.map_or(due, |cap| due.min(cap));
    for _ in 0..ticks_run {
        step(fixed_tick);
    }
    let ticks_dropped = due - ticks_run;
    let accumulator = remainder;

    Advance {
        accumulator,
        ticks_run,
        ticks_dropped,
    }
}

/// Accumulator plus settings.
#[derive(Clone, Debug, Default)]
pub struct FixedStepScheduler {
    accumulator: f32,
    config: SchedulerConfig,
}

impl FixedStepScheduler {
    /// Create with an empty accumulator.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            accumulator: 0.0,
            config,
        }
    }

    /// Feed one frame's elapsed time and run the due ticks.
    pub fn advance<F>(&mut self, frame_delta: f32, step: F) -> Advance
    where
        F: FnMut(f32),
    {
        let result = advance(
            self.accumulator,
            frame_delta,
            self.config.fixed_tick,
            self.config.max_ticks_per_frame,
            step,
        );
        self.accumulator = result.accumulator;
        result
    }

    /// Fraction of a tick waiting in the accumulator, for interpolating
    /// between the last two simulated states.
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.config.fixed_tick
    }

    /// Pending time (seconds).
    #[inline]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Settings in use.
    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Discard pending time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f32 = 1.0 / 128.0;

    #[test]
    fn test_runs_whole_ticks_only() {
        let mut dts = Vec::new();
        let result = advance(0.0, TICK * 2.5, TICK, None, |dt| dts.push(dt));
        assert_eq!(result.ticks_run, 2);
        assert_eq!(dts, vec![TICK, TICK]);
        assert!((result.accumulator - TICK * 0.5).abs() < 1e-7);
        assert_eq!(result.ticks_dropped, 0);
    }

    #[test]
    fn test_short_frame_runs_nothing() {
        let result = advance(0.0, TICK * 0.4, TICK, None, |_| panic!("no tick expected"));
        assert_eq!(result.ticks_run, 0);
        assert!((result.accumulator - TICK * 0.4).abs() < 1e-7);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut scheduler = FixedStepScheduler::new(SchedulerConfig::default());
        let mut count = 0;
        scheduler.advance(TICK * 0.6, |_| count += 1);
        assert_eq!(count, 0);
        scheduler.advance(TICK * 0.6, |_| count += 1);
        assert_eq!(count, 1);
        assert!((scheduler.alpha() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_frame_split_does_not_change_tick_count() {
        let mut split = 0;
        let mut acc = 0.0;
        for _ in 0..3 {
            acc = advance(acc, 0.01, TICK, None, |_| split += 1).accumulator;
        }

        let mut whole = 0;
        let single = advance(0.0, 0.03, TICK, None, |_| whole += 1);

        assert_eq!(split, 3);
        assert_eq!(whole, 3);
        assert!((acc - single.accumulator).abs() < 1e-6);
    }

    #[test]
    fn test_unbounded_catch_up() {
        let result = advance(0.0, 1.0, TICK, None, |_| {});
        assert_eq!(result.ticks_run, 128);
        assert_eq!(result.ticks_dropped, 0);
    }

    #[test]
    fn test_cap_drops_backlog() {
        let result = advance(0.0, TICK * 10.5, TICK, Some(4), |_| {});
        assert_eq!(result.ticks_run, 4);
        assert_eq!(result.ticks_dropped, 6);
        assert!(result.accumulator < TICK);
        assert!((result.accumulator - TICK * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cap_not_hit() {
        let result = advance(0.0, TICK * 3.0, TICK, Some(4), |_| {});
        assert_eq!(result.ticks_run, 3);
        assert_eq!(result.ticks_dropped, 0);
    }

    #[test]
    fn test_huge_delta_terminates() {
        // Past ~131072 s, subtracting one tick no longer changes the sum
        let mut count = 0u64;
        let result = advance(0.0, 200_000.0, TICK, None, |_| count += 1);
        assert_eq!(count, 25_600_000);
        assert_eq!(result.ticks_run, 25_600_000);
        assert_eq!(result.ticks_dropped, 0);
        assert!(result.accumulator < TICK);
    }

    #[test]
    fn test_huge_delta_with_cap() {
        let mut count = 0u32;
        let result = advance(0.0, 200_000.0, TICK, Some(8), |_| count += 1);
        assert_eq!(count, 8);
        assert_eq!(result.ticks_dropped, 25_600_000 - 8);
        assert!(result.accumulator < TICK);
    }

    #[test]
    fn test_bad_deltas_ignored() {
        for delta in [-1.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let result = advance(TICK * 0.5, delta, TICK, None, |_| {});
            assert_eq!(result.ticks_run, 0);
            assert_eq!(result.accumulator, TICK * 0.5);
        }
    }

    #[test]
    fn test_reset_clears_accumulator() {
        let mut scheduler = FixedStepScheduler::new(SchedulerConfig::default());
        scheduler.advance(TICK * 0.9, |_| {});
        assert!(scheduler.accumulator() > 0.0);
        scheduler.reset();
        assert_eq!(scheduler.accumulator(), 0.0);
        assert_eq!(scheduler.alpha(), 0.0);
    }
}
