//! Codec clock sources and the master-clock generator contract.
//!
//! The codec's PLL can lock to one of two references:
//!
//! ```text
//! MasterClockPwm:   PWM timer ──(MCLK pin, 50 % duty)──► PLL_CLKIN
//! BitClockDerived:  I2S BCLK  ─────────────────────────► PLL_CLKIN
//! ```
//!
//! Only the first needs a generator; at most one may drive the MCLK pin.

/// Reference clock the codec PLL locks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// A PWM square wave at `frequency_hz` on the codec's MCLK input.
    MasterClockPwm {
        /// Generator output frequency in Hz.
        frequency_hz: u32,
    },
    /// No MCLK; the PLL runs from the I2S bit clock.
    BitClockDerived,
}

impl ClockSource {
    /// MCLK frequency the codec should plan for, or `None` when the PLL
    /// input is BCLK.
    #[must_use]
    pub const fn mclk_hz(self) -> Option<u32> {
        match self {
            Self::MasterClockPwm { frequency_hz } => Some(frequency_hz),
            Self::BitClockDerived => None,
        }
    }

    /// Whether this source needs a running [`MclkGenerator`].
    #[must_use]
    pub const fn needs_generator(self) -> bool {
        matches!(self, Self::MasterClockPwm { .. })
    }

    /// Short label for log lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MasterClockPwm { .. } => "MCLK (PWM)",
            Self::BitClockDerived => "BCLK-derived",
        }
    }
}

/// PWM duty cycle as a 16-bit fraction of the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct DutyCycle(u16);

impl DutyCycle {
    /// 50 % duty (0x8000 / 0x10000), the square wave MCLK requires.
    pub const HALF: Self = Self(1 << 15);

    /// Duty from a raw 16-bit fraction (`0x8000` = 50 %).
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw 16-bit fraction.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Compare value for a timer whose period is `top` counts.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // (top * raw) >> 16 <= top
    pub fn compare_for(self, top: u32) -> u32 {
        (u64::from(top).saturating_mul(u64::from(self.0)) >> 16) as u32
    }
}

/// Master-clock generator driving the codec MCLK pin.
///
/// Synchronous on purpose: a running generator is released from `Drop`,
/// where nothing can be awaited.
pub trait MclkGenerator {
    /// Error type for this generator.
    type Error: core::fmt::Debug;

    /// Start a square wave at `frequency_hz` with the given duty cycle.
    ///
    /// Callers guarantee the generator is stopped when this is invoked.
    fn start(&mut self, frequency_hz: u32, duty: DutyCycle) -> Result<(), Self::Error>;

    /// Stop the output and release the timer and pin.
    ///
    /// Stopping an idle generator is a no-op.
    fn stop(&mut self) -> Result<(), Self::Error>;
}
