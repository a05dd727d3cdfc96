//! Sequence timing.
//!
//! All values are lower bounds: the controlling requirement is that the
//! codec has settled, and these are the shortest waits observed to be safe.
//! [`Timing::enforce_minimums`] raises anything configured below them.

/// Wait durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Reset line held low.
    pub reset_low_ms: u32,
    /// Reset line held high before the first bus write.
    pub reset_high_ms: u32,
    /// Analog settle after configuration, before any playback.
    pub settle_ms: u32,
    /// Extra quiet time right before the first beep.
    pub pre_beep_ms: u32,
    /// Wait after muting, before anything is reconfigured.
    pub mute_settle_ms: u32,
    /// Pause between profiles under the same clock source.
    pub inter_profile_ms: u32,
    /// Pause after a clock source finishes its table.
    pub inter_source_ms: u32,
    /// Pause before a full pass restarts.
    pub full_cycle_ms: u32,
}

impl Timing {
    /// Shortest safe value for every field.
    pub const MINIMUM: Self = Self {
        reset_low_ms: 50,
        reset_high_ms: 50,
        settle_ms: 350,
        pre_beep_ms: 100,
        mute_settle_ms: 100,
        inter_profile_ms: 700,
        inter_source_ms: 800,
        full_cycle_ms: 3_000,
    };

    /// Raise every field below [`Timing::MINIMUM`] to its minimum.
    #[must_use]
    pub fn enforce_minimums(self) -> Self {
        let min = Self::MINIMUM;
        Self {
            reset_low_ms: self.reset_low_ms.max(min.reset_low_ms),
            reset_high_ms: self.reset_high_ms.max(min.reset_high_ms),
            settle_ms: self.settle_ms.max(min.settle_ms),
            pre_beep_ms: self.pre_beep_ms.max(min.pre_beep_ms),
            mute_settle_ms: self.mute_settle_ms.max(min.mute_settle_ms),
            inter_profile_ms: self.inter_profile_ms.max(min.inter_profile_ms),
            inter_source_ms: self.inter_source_ms.max(min.inter_source_ms),
            full_cycle_ms: self.full_cycle_ms.max(min.full_cycle_ms),
        }
    }

    /// Total reset pulse (low + high).
    pub fn reset_pulse_ms(&self) -> u32 {
        self.reset_low_ms.saturating_add(self.reset_high_ms)
    }
}

impl Default for Timing {
    /// Minimums, with a 100 ms low pulse.
    fn default() -> Self {
        Self {
            reset_low_ms: 100,
            ..Self::MINIMUM
        }
    }
}
