//! Codec sequencing: reset, clock source, configuration, playback
//!
//! One module per stage, leaves first:
//!
//! - `clock_source`: MCLK generator ownership (`ClockSourceManager`)
//! - `reset`: hard reset pulse (`ResetSequencer`)
//! - `configurator`: ordered codec writes (`DacConfigurator`)
//! - `playback`: settle, beep, mute (`PlaybackSequencer`)
//! - `dac/`: TLV320DAC3100 register driver
//! - `clock_math`: TLV320DAC3100 PLL / divider search
//!
//! # Dependency Injection
//!
//! Each stage is generic over the `codec-hal` traits. Concrete types are
//! injected at the call site:
//!
//! ```rust,ignore
//! // Hardware:
//! DacConfigurator::new(Tlv320dac3100::new(i2c, delay), BIT_DEPTH);
//! // Tests:
//! DacConfigurator::new(MockCodec::new(&log), BIT_DEPTH);
//! ```

pub mod clock_math;
pub mod clock_source;
pub mod configurator;
pub mod dac;
pub mod playback;
pub mod reset;
