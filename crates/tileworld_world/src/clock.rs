//! # World Clock
//!
//! Day/night cycle of the overworld. Four phases of five minutes each at
//! 60 ticks per second; the clock wraps back to dawn at midnight.
//!
//! Ambient brightness is a function of the clock value alone: it rises one
//! step per minute through dawn, holds during the day, falls one step per
//! minute through the evening and bottoms out at night. The cave has no
//! cycle and uses [`CAVE_BRIGHTNESS`].

use tileworld_procedural::{DEFAULT_BRIGHTNESS, LOWEST_BRIGHTNESS};

/// Simulation ticks per second.
pub const TICKS_PER_SECOND: u32 = 60;

/// Ticks per in-game minute.
pub const MINUTE: u32 = TICKS_PER_SECOND * 60;

/// Length of one phase.
pub const PHASE_LENGTH: u32 = MINUTE * 5;

/// Start of dawn.
pub const DAWN: u32 = 0;
/// Start of day.
pub const DAY: u32 = DAWN + PHASE_LENGTH;
/// Start of evening.
pub const EVENING: u32 = DAY + PHASE_LENGTH;
/// Start of night.
pub const NIGHT: u32 = EVENING + PHASE_LENGTH;
/// End of night; the clock wraps to [`DAWN`].
pub const MIDNIGHT: u32 = NIGHT + PHASE_LENGTH;

/// Brightness change per minute of dawn or evening.
pub const BRIGHTNESS_STEP: u8 = (DEFAULT_BRIGHTNESS - LOWEST_BRIGHTNESS) / 5;

/// Fixed ambient brightness underground.
pub const CAVE_BRIGHTNESS: u8 = LOWEST_BRIGHTNESS - 12;

/// Phase of the day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayPhase {
    /// Getting brighter.
    Dawn,
    /// Full brightness.
    Day,
    /// Getting darker.
    Evening,
    /// Lowest brightness.
    Night,
}

/// Overworld clock, persisted in the player record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldClock {
    time: u32,
}

impl Default for WorldClock {
    fn default() -> Self {
        Self { time: DAY }
    }
}

impl WorldClock {
    /// Clock at `time`, wrapped into one cycle.
    #[must_use]
    pub const fn new(time: u32) -> Self {
        Self {
            time: time % MIDNIGHT,
        }
    }

    /// Current clock value in ticks since dawn.
    #[inline]
    #[must_use]
    pub const fn time(&self) -> u32 {
        self.time
    }

    /// Advances one tick, wrapping at midnight.
    pub fn advance(&mut self) {
        self.time += 1;
        if self.time >= MIDNIGHT {
            self.time = DAWN;
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> DayPhase {
        match self.time {
            t if t < DAY => DayPhase::Dawn,
            t if t < EVENING => DayPhase::Day,
            t if t < NIGHT => DayPhase::Evening,
            _ => DayPhase::Night,
        }
    }

    /// Ambient overworld brightness.
    #[must_use]
    pub fn brightness(&self) -> u8 {
        let steps = |since: u32| {
            u8::try_from(since / MINUTE)
                .unwrap_or(u8::MAX)
                .saturating_mul(BRIGHTNESS_STEP)
        };
        match self.phase() {
            DayPhase::Dawn => LOWEST_BRIGHTNESS
                .saturating_add(steps(self.time - DAWN))
                .min(DEFAULT_BRIGHTNESS),
            DayPhase::Day => DEFAULT_BRIGHTNESS,
            DayPhase::Evening => DEFAULT_BRIGHTNESS
                .saturating_sub(steps(self.time - EVENING))
                .max(LOWEST_BRIGHTNESS),
            DayPhase::Night => LOWEST_BRIGHTNESS,
        }
    }
}
