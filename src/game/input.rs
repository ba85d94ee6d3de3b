//! Input Snapshots and Recording
//!
//! The input collaborator hands the core one `InputSnapshot` per render
//! frame. Every fixed tick run during that frame sees the same snapshot.
//! Recordings store the snapshot of every tick, delta-compressed, so a
//! run can be replayed tick-for-tick.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};

// =============================================================================
// INPUT SNAPSHOT
// =============================================================================

/// Held-key state for one frame (packed bits):
/// - Bit 0: move left
/// - Bit 1: move right
/// - Bit 2: jump
/// - Bit 3: boost
/// - Bit 4: reset
/// - Bit 5: toggle debug overlay
/// - Bit 6-7: Reserved
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSnapshot {
    flags: u8,
}

impl InputSnapshot {
    /// Move left flag bit
    pub const FLAG_LEFT: u8 = 0x01;
    /// Move right flag bit
    pub const FLAG_RIGHT: u8 = 0x02;
    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x04;
    /// Boost flag bit
    pub const FLAG_BOOST: u8 = 0x08;
    /// Reset flag bit
    pub const FLAG_RESET: u8 = 0x10;
    /// Debug toggle flag bit
    pub const FLAG_TOGGLE_DEBUG: u8 = 0x20;

    /// Nothing held.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Build from raw flag bits.
    pub const fn from_bits(flags: u8) -> Self {
        Self { flags }
    }

    /// Raw flag bits.
    #[inline]
    pub const fn bits(&self) -> u8 {
        self.flags
    }

    /// Builder: set move left.
    pub const fn with_left(self) -> Self {
        Self { flags: self.flags | Self::FLAG_LEFT }
    }

    /// Builder: set move right.
    pub const fn with_right(self) -> Self {
        Self { flags: self.flags | Self::FLAG_RIGHT }
    }

    /// Builder: set jump.
    pub const fn with_jump(self) -> Self {
        Self { flags: self.flags | Self::FLAG_JUMP }
    }

    /// Builder: set boost.
    pub const fn with_boost(self) -> Self {
        Self { flags: self.flags | Self::FLAG_BOOST }
    }

    /// Builder: set reset.
    pub const fn with_reset(self) -> Self {
        Self { flags: self.flags | Self::FLAG_RESET }
    }

    /// Builder: set debug toggle.
    pub const fn with_toggle_debug(self) -> Self {
        Self { flags: self.flags | Self::FLAG_TOGGLE_DEBUG }
    }

    #[inline]
    fn held(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    /// Move left held.
    #[inline]
    pub fn left(&self) -> bool {
        self.held(Self::FLAG_LEFT)
    }

    /// Move right held.
    #[inline]
    pub fn right(&self) -> bool {
        self.held(Self::FLAG_RIGHT)
    }

    /// Jump held.
    #[inline]
    pub fn jump(&self) -> bool {
        self.held(Self::FLAG_JUMP)
    }

    /// Boost held.
    #[inline]
    pub fn boost(&self) -> bool {
        self.held(Self::FLAG_BOOST)
    }

    /// Reset held.
    #[inline]
    pub fn reset(&self) -> bool {
        self.held(Self::FLAG_RESET)
    }

    /// Debug toggle held.
    #[inline]
    pub fn toggle_debug(&self) -> bool {
        self.held(Self::FLAG_TOGGLE_DEBUG)
    }

    /// Either direction held.
    #[inline]
    pub fn any_direction(&self) -> bool {
        self.left() || self.right()
    }

    /// Only the bits the physics step reads.
    ///
    /// Reset and debug are frame-level requests handled by the session.
    #[inline]
    pub fn movement_only(&self) -> Self {
        Self {
            flags: self.flags
                & (Self::FLAG_LEFT | Self::FLAG_RIGHT | Self::FLAG_JUMP | Self::FLAG_BOOST),
        }
    }

    /// Flags that went from released to held since `previous`.
    #[inline]
    pub fn pressed_since(&self, previous: &InputSnapshot) -> InputSnapshot {
        Self {
            flags: self.flags & !previous.flags,
        }
    }
}

// =============================================================================
// RECORDING
// =============================================================================

/// A change of input at a given tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u64,
    /// The new input state
    pub input: InputSnapshot,
}

/// Per-tick input log, stored only where the input changed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRecording {
    /// Number of ticks covered (ticks `0..tick_count`)
    pub tick_count: u64,

    deltas: Vec<InputDelta>,

    #[serde(skip)]
    last_input: InputSnapshot,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self {
            tick_count: 0,
            deltas: Vec::with_capacity(256),
            last_input: InputSnapshot::new(),
        }
    }

    /// Append the input used for the next tick.
    ///
    /// Only stores a delta if the input changed.
    pub fn push(&mut self, input: InputSnapshot) {
        let tick = self.tick_count;
        if input != self.last_input {
            self.deltas.push(InputDelta { tick, input });
            self.last_input = input;
        }
        self.tick_count += 1;
    }

    /// Input in effect at `tick`.
    ///
    /// Uses binary search over the deltas.
    pub fn input_at(&self, tick: u64) -> InputSnapshot {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);
        if idx == 0 {
            InputSnapshot::new()
        } else {
            self.deltas[idx - 1].input
        }
    }

    /// All deltas.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Number of delta entries.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Hash of the recorded inputs.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_recording();
        hasher.update_u64(self.tick_count);
        for delta in &self.deltas {
            hasher.update_u64(delta.tick);
            hasher.update_u8(delta.input.bits());
        }
        hasher.finalize()
    }

    /// Iterate `(tick, input)` for every recorded tick.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            current_tick: 0,
            delta_idx: 0,
            current_input: InputSnapshot::new(),
        }
    }
}

/// Iterator for replaying inputs tick-by-tick.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    current_tick: u64,
    delta_idx: usize,
    current_input: InputSnapshot,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u64, InputSnapshot);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick >= self.recording.tick_count {
            return None;
        }

        while let Some(delta) = self.recording.deltas.get(self.delta_idx) {
            if delta.tick > self.current_tick {
                break;
            }
            self.current_input = delta.input;
            self.delta_idx += 1;
        }

        let item = (self.current_tick, self.current_input);
        self.current_tick += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.recording.tick_count.saturating_sub(self.current_tick) as usize;
        (remaining, Some(remaining))
    }
}
