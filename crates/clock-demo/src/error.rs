//! Sequencing error type.
//!
//! Every variant is fatal: the demo halts on the first failure, muted
//! where the bus still allows it. Nothing is retried.

/// Failure that halts the demo sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// No divider/PLL plan exists for this rate and clock source.
    UnsupportedProfile {
        /// Requested rate in Hz.
        sample_rate_hz: u32,
    },
    /// The codec bus reported a transaction error.
    BusCommunication,
    /// The codec reset line could not be driven.
    ResetLine,
    /// The master-clock generator failed to start or stop.
    ClockGenerator,
    /// The I2S transport failed mid-playback.
    Transport,
    /// A waveform asset could not be loaded.
    WaveformUnavailable,
    /// The profile table or clock-source list is empty.
    EmptyTable,
}

impl core::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedProfile { sample_rate_hz } => {
                write!(f, "No clock plan for {sample_rate_hz} Hz")
            }
            Self::BusCommunication => write!(f, "Codec bus communication error"),
            Self::ResetLine => write!(f, "Codec reset line unavailable"),
            Self::ClockGenerator => write!(f, "Master clock generator error"),
            Self::Transport => write!(f, "Audio transport error"),
            Self::WaveformUnavailable => write!(f, "Waveform asset unavailable"),
            Self::EmptyTable => write!(f, "Profile table or clock source list is empty"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequenceError {}
