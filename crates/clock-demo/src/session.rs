//! One live configuration of the codec.

use codec_hal::{ClockSource, SampleRate};

/// A configured codec.
///
/// Only [`DacConfigurator::configure`](crate::DacConfigurator::configure)
/// creates one, and [`ResetSequencer::reset`](crate::ResetSequencer::reset)
/// consumes the previous one. Rate and clock source cannot change for the
/// session's lifetime; a new rate or source means a new reset and a new
/// session.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CodecSession {
    sample_rate: SampleRate,
    clock_source: ClockSource,
    muted: bool,
    powered: bool,
    settled: bool,
}

impl CodecSession {
    /// Freshly configured: powered, unmuted, not yet settled.
    pub(crate) fn configured(sample_rate: SampleRate, clock_source: ClockSource) -> Self {
        Self {
            sample_rate,
            clock_source,
            muted: false,
            powered: true,
            settled: false,
        }
    }

    /// Sample rate programmed into the codec.
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Clock source the codec PLL locks to.
    pub fn clock_source(&self) -> ClockSource {
        self.clock_source
    }

    /// Whether the DAC has been muted since configuration.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether the DAC channels are powered.
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Whether the post-configuration settle delay has elapsed.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub(crate) fn mark_settled(&mut self) {
        self.settled = true;
    }

    pub(crate) fn mark_muted(&mut self) {
        self.muted = true;
    }
}
