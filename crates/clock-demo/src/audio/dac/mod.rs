//! DAC driver implementations
//!
//! - `tlv320dac3100` : TI TLV320DAC3100 over I²C (any `embedded-hal-async` bus)
//!
//! Host tests use `codec_hal::mocks::MockCodec` instead.

pub mod tlv320dac3100;
