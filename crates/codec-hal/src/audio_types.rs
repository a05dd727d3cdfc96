//! Audio domain newtypes for compile-time safety.
//!
//! - `SampleRate`: the closed set of rates the demo exercises
//! - `BitDepth`: I2S word length handed to the codec
//! - `GainDb`: signed gain in 0.5 dB steps, the codec's native resolution

// ── Error types ──────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: i32,
    /// The inclusive minimum allowed value.
    pub min: i32,
    /// The inclusive maximum allowed value.
    pub max: i32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "value {} outside {}..={}",
            self.value, self.min, self.max
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfRangeError {}

/// A sample rate with no entry in [`SampleRate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnsupportedSampleRate {
    /// The rejected rate in Hz.
    pub hz: u32,
}

impl core::fmt::Display for UnsupportedSampleRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unsupported sample rate {} Hz", self.hz)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnsupportedSampleRate {}

// ── SampleRate ───────────────────────────────────────────────────────────────

/// Sample rates the demo cycles through.
///
/// The set is closed: anything else is rejected by [`SampleRate::from_hz`]
/// before a codec is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleRate {
    /// 8 kHz (telephony).
    Hz8000,
    /// 11.025 kHz (quarter CD rate).
    Hz11025,
    /// 22.05 kHz (half CD rate).
    Hz22050,
    /// 44.1 kHz (CD).
    Hz44100,
    /// 48 kHz (DAT / video).
    Hz48000,
}

impl SampleRate {
    /// Every supported rate, ascending.
    pub const ALL: [Self; 5] = [
        Self::Hz8000,
        Self::Hz11025,
        Self::Hz22050,
        Self::Hz44100,
        Self::Hz48000,
    ];

    /// Rate in Hz.
    #[must_use]
    pub const fn hz(self) -> u32 {
        match self {
            Self::Hz8000 => 8_000,
            Self::Hz11025 => 11_025,
            Self::Hz22050 => 22_050,
            Self::Hz44100 => 44_100,
            Self::Hz48000 => 48_000,
        }
    }

    /// Resolve a raw rate in Hz.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedSampleRate`] for any rate not in [`SampleRate::ALL`].
    pub fn from_hz(hz: u32) -> Result<Self, UnsupportedSampleRate> {
        Self::ALL
            .into_iter()
            .find(|rate| rate.hz() == hz)
            .ok_or(UnsupportedSampleRate { hz })
    }

    /// Short label for log lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hz8000 => "8 kHz",
            Self::Hz11025 => "11.025 kHz",
            Self::Hz22050 => "22.05 kHz",
            Self::Hz44100 => "44.1 kHz",
            Self::Hz48000 => "48 kHz",
        }
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = UnsupportedSampleRate;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        Self::from_hz(hz)
    }
}

// ── BitDepth ─────────────────────────────────────────────────────────────────

/// I2S audio word length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitDepth {
    /// 16-bit samples.
    Bits16,
    /// 20-bit samples.
    Bits20,
    /// 24-bit samples.
    Bits24,
    /// 32-bit samples.
    Bits32,
}

impl BitDepth {
    /// Word length in bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits16 => 16,
            Self::Bits20 => 20,
            Self::Bits24 => 24,
            Self::Bits32 => 32,
        }
    }
}

// ── GainDb ───────────────────────────────────────────────────────────────────

/// Signed gain in half-decibel steps.
///
/// Range: −127.5 dB to +24 dB. Individual codec stages accept a narrower
/// window and clamp on write; this type only bounds what can be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct GainDb(i16);

impl GainDb {
    /// Lowest expressible gain: −127.5 dB.
    pub const MIN_HALF_DB: i16 = -255;

    /// Highest expressible gain: +24 dB.
    pub const MAX_HALF_DB: i16 = 48;

    /// Unity gain.
    pub const ZERO: Self = Self(0);

    /// Gain of `db` whole decibels, clamped into range.
    #[must_use]
    #[allow(clippy::cast_lossless)] // i16::from is not const
    pub const fn db(db: i8) -> Self {
        Self::clamped((db as i16).saturating_mul(2))
    }

    /// Gain of `half_db` half-decibel steps, clamped into range.
    #[must_use]
    pub const fn clamped(half_db: i16) -> Self {
        if half_db < Self::MIN_HALF_DB {
            Self(Self::MIN_HALF_DB)
        } else if half_db > Self::MAX_HALF_DB {
            Self(Self::MAX_HALF_DB)
        } else {
            Self(half_db)
        }
    }

    /// Gain of `half_db` half-decibel steps.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] (in half-dB units) when outside
    /// −255..=48.
    pub fn try_from_half_db(half_db: i16) -> Result<Self, OutOfRangeError> {
        if (Self::MIN_HALF_DB..=Self::MAX_HALF_DB).contains(&half_db) {
            Ok(Self(half_db))
        } else {
            Err(OutOfRangeError {
                value: i32::from(half_db),
                min: i32::from(Self::MIN_HALF_DB),
                max: i32::from(Self::MAX_HALF_DB),
            })
        }
    }

    /// Gain in half-decibel steps.
    #[must_use]
    pub const fn half_db(self) -> i16 {
        self.0
    }
}

impl core::fmt::Display for GainDb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let steps = self.0.unsigned_abs();
        let tenths = if steps & 1 == 1 { 5 } else { 0 };
        write!(f, "{sign}{}.{tenths} dB", steps >> 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_display_has_half_db_resolution() {
        assert_eq!(GainDb::db(-6).to_string(), "-6.0 dB");
        assert_eq!(GainDb::clamped(-13).to_string(), "-6.5 dB");
        assert_eq!(GainDb::clamped(1).to_string(), "0.5 dB");
        assert_eq!(GainDb::ZERO.to_string(), "0.0 dB");
    }

    #[test]
    fn whole_db_constructor_clamps() {
        assert_eq!(GainDb::db(-128).half_db(), GainDb::MIN_HALF_DB);
        assert_eq!(GainDb::db(100).half_db(), GainDb::MAX_HALF_DB);
    }

    #[test]
    fn sample_rate_names_are_distinct() {
        for (i, a) in SampleRate::ALL.iter().enumerate() {
            for b in SampleRate::ALL.iter().skip(i + 1) {
                assert_ne!(a.name(), b.name());
            }
        }
    }
}
