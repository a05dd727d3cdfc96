//! Codec control interface
//!
//! The sequencing core talks to the DAC only through [`CodecDriver`]. A
//! concrete driver owns its bus handle; every method maps to one or more
//! register writes and reports bus failures through `Self::Error`.

use crate::audio_types::{BitDepth, GainDb, SampleRate};

/// Analog output path(s) enabled after configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputRoute {
    /// Headphone / line-out driver only.
    Headphone,
    /// Class-D speaker amplifier only.
    Speaker,
    /// Both paths.
    Both,
}

impl OutputRoute {
    /// Whether the headphone driver is enabled on this route.
    #[must_use]
    pub const fn headphone(self) -> bool {
        matches!(self, Self::Headphone | Self::Both)
    }

    /// Whether the speaker amplifier is enabled on this route.
    #[must_use]
    pub const fn speaker(self) -> bool {
        matches!(self, Self::Speaker | Self::Both)
    }

    /// Short label for log lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Headphone => "headphone",
            Self::Speaker => "speaker",
            Self::Both => "headphone+speaker",
        }
    }
}

/// Per-channel DAC mute state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelMute {
    /// Left channel muted.
    pub left: bool,
    /// Right channel muted.
    pub right: bool,
}

impl ChannelMute {
    /// Both channels muted.
    pub const BOTH: Self = Self {
        left: true,
        right: true,
    };

    /// Both channels playing.
    pub const NONE: Self = Self {
        left: false,
        right: false,
    };

    /// Whether every channel is muted.
    #[must_use]
    pub const fn all(self) -> bool {
        self.left && self.right
    }
}

/// Audio DAC/codec control.
///
/// Divider and PLL arithmetic belongs to the implementation: callers hand
/// over an already-resolved sample rate and MCLK frequency.
pub trait CodecDriver {
    /// Error type for this codec (normally the bus error).
    type Error: core::fmt::Debug;

    /// Soft-reset the codec and leave it at minimum volume, muted.
    async fn attach(&mut self) -> Result<(), Self::Error>;

    /// Power the speaker amplifier on or off.
    async fn set_speaker_output(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Power the headphone drivers on or off.
    async fn set_headphone_output(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Digital (DAC) volume for both channels.
    async fn set_dac_volume(&mut self, gain: GainDb) -> Result<(), Self::Error>;

    /// Analog headphone volume for both channels.
    async fn set_headphone_volume(&mut self, gain: GainDb) -> Result<(), Self::Error>;

    /// Analog speaker volume.
    async fn set_speaker_volume(&mut self, gain: GainDb) -> Result<(), Self::Error>;

    /// Program the PLL, dividers and interface for `sample_rate`.
    ///
    /// `mclk_hz` is `Some` when a master clock drives the PLL and `None`
    /// when the PLL must derive its input from the I2S bit clock.
    async fn configure_clocks(
        &mut self,
        sample_rate: SampleRate,
        bit_depth: BitDepth,
        mclk_hz: Option<u32>,
    ) -> Result<(), Self::Error>;

    /// Mute or unmute the DAC channels.
    async fn set_mute(&mut self, mute: ChannelMute) -> Result<(), Self::Error>;

    /// Whether `configure_clocks` would find a valid plan for these inputs.
    ///
    /// Pure: performs no bus traffic.
    fn supports_clocks(&self, sample_rate: SampleRate, bit_depth: BitDepth, mclk_hz: Option<u32>)
        -> bool;
}
