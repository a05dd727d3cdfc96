//! Waveform assets and the I2S playback path.

/// Name of a decodable audio asset, e.g. `"sinewave_8kHz.wav"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaveformRef(&'static str);

impl WaveformRef {
    /// Reference an asset by name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Asset name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

/// Loads named assets into replayable waveforms.
///
/// Loading is idempotent: the same name may be loaded again for every
/// profile that uses it.
pub trait WaveformLoader {
    /// Handle produced by the loader.
    type Waveform;
    /// Error type for this loader.
    type Error: core::fmt::Debug;

    /// Load `waveform`.
    async fn load(&mut self, waveform: WaveformRef) -> Result<Self::Waveform, Self::Error>;
}

/// I2S output path.
pub trait AudioTransport {
    /// Waveform handle this transport can play.
    type Waveform;
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Play `waveform` once, returning only after the last frame is out.
    async fn play(&mut self, waveform: &Self::Waveform) -> Result<(), Self::Error>;
}
