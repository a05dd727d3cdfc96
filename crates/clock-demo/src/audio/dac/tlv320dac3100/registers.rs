//! TLV320DAC3100 register map
//!
//! Source: Texas Instruments TLV320DAC3100 datasheet (SLAS671).
//!
//! # Key I²C Constraints
//!
//! ## Paged register file
//! Every page shares register 0x00 as the page-select register. A write to
//! any other address lands on whichever page was selected last. The soft
//! reset returns the device to page 0.
//!
//! ## Soft reset timing
//! After writing `SOFT_RESET` the device needs 1 ms before the next access.
//!
//! ## Power-on output state
//! The DAC powers up muted with both analog drivers off, but the DAC digital
//! volume resets to 0 dB. The driver writes minimum gains immediately after
//! the soft reset, before any path is routed.
//!
//! ## PLL power-up order
//! P, R, J and D must be written before the PLL power bit is set, and the
//! PLL needs up to 10 ms to lock before NDAC/MDAC are powered.

/// 7-bit I²C address (fixed).
pub const I2C_ADDR: u8 = 0x18;

/// Page-select register, present on every page.
pub const REG_PAGE_SELECT: u8 = 0x00;

/// Page holding the clock tree, serial interface and DAC digital blocks.
pub const PAGE_CONTROL: u8 = 0;
/// Page holding the analog output stage.
pub const PAGE_OUTPUT: u8 = 1;

// ---------------------------------------------------------------------------
// Page 0 register addresses
// ---------------------------------------------------------------------------

/// Software reset: write 1, self-clearing.
pub const REG_SOFT_RESET: u8 = 0x01;
/// Clock-gen muxing: PLL_CLKIN source (bits 3:2) and CODEC_CLKIN (bits 1:0).
pub const REG_CLOCK_MUX: u8 = 0x04;
/// PLL power (bit 7), P (bits 6:4, 8 encoded as 0), R (bits 3:0, 16 as 0).
pub const REG_PLL_P_R: u8 = 0x05;
/// PLL J multiplier (4..=63).
pub const REG_PLL_J: u8 = 0x06;
/// PLL D multiplier, bits 13:8.
pub const REG_PLL_D_MSB: u8 = 0x07;
/// PLL D multiplier, bits 7:0.
pub const REG_PLL_D_LSB: u8 = 0x08;
/// NDAC power (bit 7) and divider (bits 6:0, 128 encoded as 0).
pub const REG_NDAC: u8 = 0x0B;
/// MDAC power (bit 7) and divider (bits 6:0, 128 encoded as 0).
pub const REG_MDAC: u8 = 0x0C;
/// DOSR bits 9:8.
pub const REG_DOSR_MSB: u8 = 0x0D;
/// DOSR bits 7:0 (1024 encoded as 0).
pub const REG_DOSR_LSB: u8 = 0x0E;
/// Codec interface control 1: format (7:6), word length (5:4), clock direction.
pub const REG_INTERFACE_CTRL_1: u8 = 0x1B;
/// DAC data-path setup: channel power and routing.
pub const REG_DAC_DATAPATH: u8 = 0x3F;
/// DAC volume control: left mute (bit 3), right mute (bit 2).
pub const REG_DAC_VOLUME_CTRL: u8 = 0x40;
/// Left DAC digital volume, signed half-dB steps.
pub const REG_DAC_LEFT_VOLUME: u8 = 0x41;
/// Right DAC digital volume, signed half-dB steps.
pub const REG_DAC_RIGHT_VOLUME: u8 = 0x42;

// ---------------------------------------------------------------------------
// Page 1 register addresses
// ---------------------------------------------------------------------------

/// Headphone drivers: HPL power (bit 7), HPR power (bit 6).
pub const REG_HP_DRIVERS: u8 = 0x1F;
/// Class-D speaker amplifier power (bit 7).
pub const REG_SPK_AMP: u8 = 0x20;
/// DAC_L / DAC_R output mixer routing.
pub const REG_OUTPUT_ROUTING: u8 = 0x23;
/// Analog volume to HPL: route enable (bit 7), attenuation (bits 6:0).
pub const REG_HPL_ANALOG_VOLUME: u8 = 0x24;
/// Analog volume to HPR: same encoding as HPL.
pub const REG_HPR_ANALOG_VOLUME: u8 = 0x25;
/// Analog volume to the class-D speaker: same encoding as HPL.
pub const REG_SPK_ANALOG_VOLUME: u8 = 0x26;
/// HPL driver gain and unmute (bit 2).
pub const REG_HPL_DRIVER: u8 = 0x28;
/// HPR driver gain and unmute (bit 2).
pub const REG_HPR_DRIVER: u8 = 0x29;
/// Class-D driver gain (bits 4:3) and unmute (bit 2).
pub const REG_SPK_DRIVER: u8 = 0x2A;

// ---------------------------------------------------------------------------
// Register field values
// ---------------------------------------------------------------------------

/// Soft reset trigger.
pub const SOFT_RESET: u8 = 0x01;
/// Clock mux: PLL_CLKIN = MCLK, CODEC_CLKIN = PLL_CLK.
pub const CLOCK_MUX_MCLK_PLL: u8 = 0b0000_0011;
/// Clock mux: PLL_CLKIN = BCLK, CODEC_CLKIN = PLL_CLK.
pub const CLOCK_MUX_BCLK_PLL: u8 = 0b0000_0111;
/// Power bit shared by the PLL, NDAC and MDAC registers.
pub const POWER_UP: u8 = 0b1000_0000;
/// I²S format, codec is clock slave (BCLK and WCLK are inputs).
pub const INTERFACE_I2S_SLAVE: u8 = 0b0000_0000;
/// Both DAC channels powered, left data to left DAC, right to right.
pub const DATAPATH_STEREO_ON: u8 = 0b1101_0100;
/// Left mute bit of `REG_DAC_VOLUME_CTRL`.
pub const MUTE_LEFT: u8 = 0b0000_1000;
/// Right mute bit of `REG_DAC_VOLUME_CTRL`.
pub const MUTE_RIGHT: u8 = 0b0000_0100;
/// Lowest DAC digital volume (-63.5 dB).
pub const DAC_VOLUME_MIN_HALF_DB: i16 = -127;
/// Highest DAC digital volume (+24 dB).
pub const DAC_VOLUME_MAX_HALF_DB: i16 = 48;
/// Route bit of the analog volume registers.
pub const ANALOG_VOLUME_ROUTED: u8 = 0b1000_0000;
/// Largest analog attenuation step (about -78 dB).
pub const ANALOG_VOLUME_MAX_ATTENUATION: u8 = 0x7F;
/// Headphone drivers on, common mode 1.35 V.
pub const HP_DRIVERS_ON: u8 = 0b1100_0100;
/// Headphone drivers off, common mode kept.
pub const HP_DRIVERS_OFF: u8 = 0b0000_0100;
/// Class-D amplifier on.
pub const SPK_AMP_ON: u8 = 0b1000_0110;
/// Class-D amplifier off.
pub const SPK_AMP_OFF: u8 = 0b0000_0110;
/// DAC_L to left mixer, DAC_R to right mixer.
pub const OUTPUT_ROUTING_DAC_TO_MIXER: u8 = 0b0100_0100;
/// Headphone driver 0 dB, unmuted.
pub const HP_DRIVER_UNMUTED: u8 = 0b0000_0110;
/// Headphone driver muted.
pub const HP_DRIVER_MUTED: u8 = 0b0000_0010;
/// Class-D driver 6 dB, unmuted.
pub const SPK_DRIVER_UNMUTED: u8 = 0b0000_0100;
/// Class-D driver muted.
pub const SPK_DRIVER_MUTED: u8 = 0b0000_0000;

/// Soft reset to first access.
pub const SOFT_RESET_WAIT_MS: u32 = 1;
/// PLL power-up to lock.
pub const PLL_LOCK_WAIT_MS: u32 = 10;

// ---------------------------------------------------------------------------
// Field encoders
// ---------------------------------------------------------------------------

/// `REG_PLL_P_R` value with the PLL powered.
pub const fn pll_p_r(p: u8, r: u8) -> u8 {
    POWER_UP | ((p & 0x07) << 4) | (r & 0x0F)
}

/// `REG_NDAC` / `REG_MDAC` value with the divider powered.
pub const fn divider(n: u8) -> u8 {
    POWER_UP | (n & 0x7F)
}

/// `(REG_DOSR_MSB, REG_DOSR_LSB)` values.
pub const fn dosr(value: u16) -> (u8, u8) {
    let [msb, lsb] = value.to_be_bytes();
    (msb & 0x03, lsb)
}

/// `REG_INTERFACE_CTRL_1` word-length field (bits 5:4).
pub const fn word_length(bits: u8) -> u8 {
    let code = match bits {
        20 => 0b01,
        24 => 0b10,
        32 => 0b11,
        _ => 0b00,
    };
    code << 4
}

/// `REG_DAC_VOLUME_CTRL` value.
pub const fn mute(left: bool, right: bool) -> u8 {
    let l = if left { MUTE_LEFT } else { 0 };
    let r = if right { MUTE_RIGHT } else { 0 };
    l | r
}

/// DAC digital volume register value from half-dB steps.
///
/// Two's complement, clamped to -63.5 ..= +24 dB.
pub fn dac_volume(half_db: i16) -> u8 {
    let clamped = half_db.clamp(DAC_VOLUME_MIN_HALF_DB, DAC_VOLUME_MAX_HALF_DB);
    let value = i8::try_from(clamped).unwrap_or(i8::MIN);
    u8::from_be_bytes(value.to_be_bytes())
}

/// Routed analog volume register value from half-dB steps.
///
/// The analog stage only attenuates; positive gains map to 0 dB.
pub fn analog_volume(half_db: i16) -> u8 {
    let attenuation = half_db.saturating_neg().clamp(0, i16::from(ANALOG_VOLUME_MAX_ATTENUATION));
    ANALOG_VOLUME_ROUTED | u8::try_from(attenuation).unwrap_or(ANALOG_VOLUME_MAX_ATTENUATION)
}
