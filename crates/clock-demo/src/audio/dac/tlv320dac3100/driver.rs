//! TLV320DAC3100 I²C driver
//!
//! Uses `embedded_hal_async::i2c::I2c`, so it works over any async HAL, and
//! an async `DelayNs` for the soft-reset and PLL-lock waits. The I²S stream
//! itself never passes through this driver.
//!
//! The currently selected register page is cached; a page-select write is
//! only issued when the next register lives on another page.

use codec_hal::{BitDepth, ChannelMute, CodecDriver, GainDb, SampleRate};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use super::registers::*;
use crate::audio::clock_math::{self, ClockPlan, PllClockIn};
use crate::config::BCLK_PER_FRAME;

/// Driver error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tlv320Error<E> {
    /// Bus transaction failed.
    I2c(E),
    /// No PLL/divider set reaches this rate from the given reference.
    NoClockPlan {
        /// Requested sample rate.
        sample_rate_hz: u32,
    },
}

impl<E: embedded_hal::i2c::Error> core::fmt::Display for Tlv320Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "I2C error: {}", e.kind()),
            Self::NoClockPlan { sample_rate_hz } => {
                write!(f, "No PLL configuration for {sample_rate_hz} Hz")
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: embedded_hal::i2c::Error> std::error::Error for Tlv320Error<E> {}

/// TLV320DAC3100 codec driver.
pub struct Tlv320dac3100<I, D> {
    i2c: I,
    delay: D,
    page: Option<u8>,
    bclk_per_frame: u32,
}

impl<I: I2c, D: DelayNs> Tlv320dac3100<I, D> {
    /// Create a driver. No bus traffic until [`CodecDriver::attach`].
    ///
    /// Assumes [`BCLK_PER_FRAME`] bit clocks per frame when the PLL locks
    /// to BCLK.
    pub fn new(i2c: I, delay: D) -> Self {
        Self {
            i2c,
            delay,
            page: None,
            bclk_per_frame: BCLK_PER_FRAME,
        }
    }

    /// Bit clocks per frame supplied by the I2S transport (64 for two
    /// 32-bit slots, 32 for two 16-bit slots).
    #[must_use]
    pub fn with_bclk_per_frame(mut self, bclk_per_frame: u32) -> Self {
        self.bclk_per_frame = bclk_per_frame;
        self
    }

    /// Release the bus and delay.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    /// Clock plan `configure_clocks` would program.
    pub fn clock_plan(&self, sample_rate: SampleRate, mclk_hz: Option<u32>) -> Option<ClockPlan> {
        let fs = sample_rate.hz();
        let (input, input_hz) = match mclk_hz {
            Some(hz) => (PllClockIn::Mclk, hz),
            None => (PllClockIn::Bclk, clock_math::bclk_hz(fs, self.bclk_per_frame)?),
        };
        clock_math::plan(fs, input, input_hz)
    }

    async fn select_page(&mut self, page: u8) -> Result<(), Tlv320Error<I::Error>> {
        if self.page == Some(page) {
            return Ok(());
        }
        self.page = None;
        self.i2c
            .write(I2C_ADDR, &[REG_PAGE_SELECT, page])
            .await
            .map_err(Tlv320Error::I2c)?;
        self.page = Some(page);
        Ok(())
    }

    async fn write_reg(&mut self, page: u8, reg: u8, value: u8) -> Result<(), Tlv320Error<I::Error>> {
        self.select_page(page).await?;
        trace!("tlv320: page {} reg {} <- {}", page, reg, value);
        self.i2c
            .write(I2C_ADDR, &[reg, value])
            .await
            .map_err(Tlv320Error::I2c)
    }

    async fn write_analog_volume(&mut self, regs: &[u8], gain: GainDb) -> Result<(), Tlv320Error<I::Error>> {
        let value = analog_volume(gain.half_db());
        for &reg in regs {
            self.write_reg(PAGE_OUTPUT, reg, value).await?;
        }
        Ok(())
    }
}

impl<I: I2c, D: DelayNs> CodecDriver for Tlv320dac3100<I, D> {
    type Error = Tlv320Error<I::Error>;

    async fn attach(&mut self) -> Result<(), Self::Error> {
        debug!("tlv320: soft reset");
        self.page = None;
        self.write_reg(PAGE_CONTROL, REG_SOFT_RESET, SOFT_RESET).await?;
        self.page = Some(PAGE_CONTROL);
        self.delay.delay_ms(SOFT_RESET_WAIT_MS).await;

        // Power-on DAC volume is 0 dB: pull everything down before routing.
        self.write_reg(PAGE_CONTROL, REG_DAC_VOLUME_CTRL, mute(true, true))
            .await?;
        let floor = dac_volume(DAC_VOLUME_MIN_HALF_DB);
        self.write_reg(PAGE_CONTROL, REG_DAC_LEFT_VOLUME, floor).await?;
        self.write_reg(PAGE_CONTROL, REG_DAC_RIGHT_VOLUME, floor).await?;
        for reg in [REG_HPL_ANALOG_VOLUME, REG_HPR_ANALOG_VOLUME, REG_SPK_ANALOG_VOLUME] {
            self.write_reg(PAGE_OUTPUT, reg, ANALOG_VOLUME_MAX_ATTENUATION)
                .await?;
        }
        Ok(())
    }

    async fn set_speaker_output(&mut self, enabled: bool) -> Result<(), Self::Error> {
        let (amp, driver) = if enabled {
            (SPK_AMP_ON, SPK_DRIVER_UNMUTED)
        } else {
            (SPK_AMP_OFF, SPK_DRIVER_MUTED)
        };
        if enabled {
            self.write_reg(PAGE_OUTPUT, REG_OUTPUT_ROUTING, OUTPUT_ROUTING_DAC_TO_MIXER)
                .await?;
        }
        self.write_reg(PAGE_OUTPUT, REG_SPK_AMP, amp).await?;
        self.write_reg(PAGE_OUTPUT, REG_SPK_DRIVER, driver).await
    }

    async fn set_headphone_output(&mut self, enabled: bool) -> Result<(), Self::Error> {
        let (drivers, gain) = if enabled {
            (HP_DRIVERS_ON, HP_DRIVER_UNMUTED)
        } else {
            (HP_DRIVERS_OFF, HP_DRIVER_MUTED)
        };
        if enabled {
            self.write_reg(PAGE_OUTPUT, REG_OUTPUT_ROUTING, OUTPUT_ROUTING_DAC_TO_MIXER)
                .await?;
        }
        self.write_reg(PAGE_OUTPUT, REG_HP_DRIVERS, drivers).await?;
        self.write_reg(PAGE_OUTPUT, REG_HPL_DRIVER, gain).await?;
        self.write_reg(PAGE_OUTPUT, REG_HPR_DRIVER, gain).await
    }

    async fn set_dac_volume(&mut self, gain: GainDb) -> Result<(), Self::Error> {
        let value = dac_volume(gain.half_db());
        self.write_reg(PAGE_CONTROL, REG_DAC_LEFT_VOLUME, value).await?;
        self.write_reg(PAGE_CONTROL, REG_DAC_RIGHT_VOLUME, value).await
    }

    async fn set_headphone_volume(&mut self, gain: GainDb) -> Result<(), Self::Error> {
        self.write_analog_volume(&[REG_HPL_ANALOG_VOLUME, REG_HPR_ANALOG_VOLUME], gain)
            .await
    }

    async fn set_speaker_volume(&mut self, gain: GainDb) -> Result<(), Self::Error> {
        self.write_analog_volume(&[REG_SPK_ANALOG_VOLUME], gain).await
    }

    async fn configure_clocks(
        &mut self,
        sample_rate: SampleRate,
        bit_depth: BitDepth,
        mclk_hz: Option<u32>,
    ) -> Result<(), Self::Error> {
        let plan = self.clock_plan(sample_rate, mclk_hz).ok_or(Tlv320Error::NoClockPlan {
            sample_rate_hz: sample_rate.hz(),
        })?;
        debug!(
            "tlv320: P={} R={} J={} NDAC={} MDAC={} DOSR={} ({} ppm)",
            plan.p,
            plan.r,
            plan.j,
            plan.ndac,
            plan.mdac,
            plan.dosr,
            plan.error_ppm()
        );

        let mux = match plan.pll_clkin {
            PllClockIn::Mclk => CLOCK_MUX_MCLK_PLL,
            PllClockIn::Bclk => CLOCK_MUX_BCLK_PLL,
        };
        let [d_msb, d_lsb] = plan.d.to_be_bytes();
        let (dosr_msb, dosr_lsb) = dosr(plan.dosr);

        self.write_reg(PAGE_CONTROL, REG_CLOCK_MUX, mux).await?;
        self.write_reg(PAGE_CONTROL, REG_PLL_J, plan.j).await?;
        self.write_reg(PAGE_CONTROL, REG_PLL_D_MSB, d_msb & 0x3F).await?;
        self.write_reg(PAGE_CONTROL, REG_PLL_D_LSB, d_lsb).await?;
        self.write_reg(PAGE_CONTROL, REG_PLL_P_R, pll_p_r(plan.p, plan.r))
            .await?;
        self.delay.delay_ms(PLL_LOCK_WAIT_MS).await;

        self.write_reg(PAGE_CONTROL, REG_NDAC, divider(plan.ndac)).await?;
        self.write_reg(PAGE_CONTROL, REG_MDAC, divider(plan.mdac)).await?;
        self.write_reg(PAGE_CONTROL, REG_DOSR_MSB, dosr_msb).await?;
        self.write_reg(PAGE_CONTROL, REG_DOSR_LSB, dosr_lsb).await?;
        self.write_reg(
            PAGE_CONTROL,
            REG_INTERFACE_CTRL_1,
            INTERFACE_I2S_SLAVE | word_length(bit_depth.bits()),
        )
        .await?;
        self.write_reg(PAGE_CONTROL, REG_DAC_DATAPATH, DATAPATH_STEREO_ON)
            .await
    }

    async fn set_mute(&mut self, channels: ChannelMute) -> Result<(), Self::Error> {
        self.write_reg(
            PAGE_CONTROL,
            REG_DAC_VOLUME_CTRL,
            mute(channels.left, channels.right),
        )
        .await
    }

    fn supports_clocks(&self, sample_rate: SampleRate, _bit_depth: BitDepth, mclk_hz: Option<u32>) -> bool {
        self.clock_plan(sample_rate, mclk_hz).is_some()
    }
}
