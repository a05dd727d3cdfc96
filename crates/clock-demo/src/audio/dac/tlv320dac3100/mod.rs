//! TLV320DAC3100 DAC driver module (Texas Instruments)
//!
//! Register map plus an async driver implementing `codec_hal::CodecDriver`.

pub mod registers;

mod driver;

pub use driver::{Tlv320Error, Tlv320dac3100};
