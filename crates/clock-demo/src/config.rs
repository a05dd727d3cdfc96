//! Demo configuration and constants
//!
//! Everything here is compile-time: the profile table, the clock sources
//! to cycle through and the output levels. Table order is playback order.

use codec_hal::{BitDepth, ClockSource, GainDb, OutputRoute, WaveformRef};

use crate::error::SequenceError;
use crate::timing::Timing;

/// The application name
pub const APP_NAME: &str = "TLV320 Clock Demo";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// PWM master clock fed to the codec MCLK pin.
pub const MCLK_PWM_HZ: u32 = 5_000_000;

/// Word length of every waveform asset.
pub const BIT_DEPTH: BitDepth = BitDepth::Bits16;

/// BCLK cycles per stereo frame on the I2S bus.
///
/// The transport clocks two 32-bit slots whatever [`BIT_DEPTH`] is, so the
/// codec PLL sees 64 x fs when locking to BCLK. A transport using 16-bit
/// slots would need 32 here.
pub const BCLK_PER_FRAME: u32 = 64;

// ── Profiles ─────────────────────────────────────────────────────────────────

/// One row of the demo table: a rate, the beep recorded at that rate, and
/// how many times to play it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleRateProfile {
    sample_rate_hz: u32,
    waveform: WaveformRef,
    beep_count: u8,
    inter_beep_delay_ms: u32,
}

impl SampleRateProfile {
    /// Build a profile. A zero `beep_count` fails const evaluation.
    #[must_use]
    pub const fn new(
        sample_rate_hz: u32,
        waveform: WaveformRef,
        beep_count: u8,
        inter_beep_delay_ms: u32,
    ) -> Self {
        assert!(beep_count > 0, "beep_count must be positive");
        Self {
            sample_rate_hz,
            waveform,
            beep_count,
            inter_beep_delay_ms,
        }
    }

    /// Requested rate in Hz. Not necessarily supported by the codec.
    pub const fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Beep asset for this rate.
    pub const fn waveform(&self) -> WaveformRef {
        self.waveform
    }

    /// Number of beeps, at least one.
    pub const fn beep_count(&self) -> u8 {
        self.beep_count
    }

    /// Silence after each beep.
    pub const fn inter_beep_delay_ms(&self) -> u32 {
        self.inter_beep_delay_ms
    }
}

/// 650 Hz beeps, one asset per rate.
pub static PROFILES: [SampleRateProfile; 5] = [
    SampleRateProfile::new(8_000, WaveformRef::new("sinewave_8kHz.wav"), 2, 350),
    SampleRateProfile::new(11_025, WaveformRef::new("sinewave_11kHz.wav"), 2, 300),
    SampleRateProfile::new(22_050, WaveformRef::new("sinewave_22kHz.wav"), 3, 250),
    SampleRateProfile::new(44_100, WaveformRef::new("sinewave_44kHz.wav"), 3, 210),
    SampleRateProfile::new(48_000, WaveformRef::new("sinewave_48kHz.wav"), 3, 190),
];

/// Clock sources in the order they are cycled.
pub static CLOCK_SOURCES: [ClockSource; 2] = [
    ClockSource::MasterClockPwm {
        frequency_hz: MCLK_PWM_HZ,
    },
    ClockSource::BitClockDerived,
];

// ── Volume ───────────────────────────────────────────────────────────────────

/// Output routing and gain staging.
///
/// Digital gain stays at or below `digital_gain_ceiling` so the DAC
/// interpolation filter cannot clip near-full-scale samples; loudness is
/// added in the analog stage instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolumeProfile {
    /// Enabled output path(s).
    pub route: OutputRoute,
    /// Requested DAC digital gain.
    pub digital_gain: GainDb,
    /// Highest digital gain ever written.
    pub digital_gain_ceiling: GainDb,
    /// Headphone analog gain.
    pub headphone_gain: GainDb,
    /// Speaker analog gain, written only when the speaker is routed.
    pub speaker_gain: GainDb,
}

impl VolumeProfile {
    /// Headphone only, −6 dB digital under a −3 dB ceiling, −6 dB analog.
    pub const DEFAULT: Self = Self {
        route: OutputRoute::Headphone,
        digital_gain: GainDb::db(-6),
        digital_gain_ceiling: GainDb::db(-3),
        headphone_gain: GainDb::db(-6),
        speaker_gain: GainDb::db(-12),
    };

    /// Digital gain actually written, and whether it had to be clamped.
    pub fn effective_digital_gain(&self) -> (GainDb, bool) {
        if self.digital_gain > self.digital_gain_ceiling {
            (self.digital_gain_ceiling, true)
        } else {
            (self.digital_gain, false)
        }
    }
}

impl Default for VolumeProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── DemoConfig ───────────────────────────────────────────────────────────────

/// Everything the orchestrator needs besides hardware.
#[derive(Debug, Clone, Copy)]
pub struct DemoConfig<'a> {
    /// Profiles in playback order.
    pub profiles: &'a [SampleRateProfile],
    /// Clock sources in cycle order; each runs the whole profile table.
    pub clock_sources: &'a [ClockSource],
    /// Routing and gains.
    pub volume: VolumeProfile,
    /// Wait durations.
    pub timing: Timing,
}

impl DemoConfig<'static> {
    /// The built-in tables with default volume and timing.
    pub fn builtin() -> Self {
        Self {
            profiles: &PROFILES,
            clock_sources: &CLOCK_SOURCES,
            volume: VolumeProfile::DEFAULT,
            timing: Timing::default(),
        }
    }
}

impl Default for DemoConfig<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DemoConfig<'_> {
    /// Reject configurations the loop cannot make progress on.
    pub fn validate(&self) -> Result<(), SequenceError> {
        if self.profiles.is_empty() || self.clock_sources.is_empty() {
            return Err(SequenceError::EmptyTable);
        }
        Ok(())
    }

    /// Sessions in one full pass (profiles × clock sources).
    pub fn sessions_per_pass(&self) -> usize {
        self.profiles.len().saturating_mul(self.clock_sources.len())
    }
}
