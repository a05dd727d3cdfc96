//! Desktop stand-ins for the demo hardware.
//!
//! The real [`Tlv320dac3100`] driver runs on top of [`LoggingI2c`], so every
//! register write of a session shows up at `trace` level. Delays come from
//! embassy-time's std driver and each beep takes its real duration, which
//! makes a full pass last as long as it does on the board.
//!
//! ```text
//! RUST_LOG=clock_demo=trace cargo run -p clock-demo --example emulated_demo --features emulator -- 1
//! ```

use core::convert::Infallible;

use codec_hal::{AudioTransport, DutyCycle, MclkGenerator, WaveformLoader, WaveformRef};
use embassy_time::Delay;
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal_async::i2c::{ErrorType as I2cErrorType, I2c, Operation};
use tracing_subscriber::EnvFilter;

use crate::orchestrator::DemoHardware;
use crate::Tlv320dac3100;

/// Length of every emulated beep.
pub const BEEP_MS: u32 = 250;

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (e.g. from a test harness) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Hardware set used by the emulator.
pub type EmulatedHardware = DemoHardware<
    EmulatedMclk,
    EmulatedResetLine,
    Tlv320dac3100<LoggingI2c, Delay>,
    EmulatedTransport,
    EmulatedLoader,
    Delay,
>;

/// Build the emulated hardware set.
pub fn hardware() -> EmulatedHardware {
    DemoHardware {
        mclk: EmulatedMclk::default(),
        reset_line: EmulatedResetLine::default(),
        codec: Tlv320dac3100::new(LoggingI2c::default(), Delay),
        transport: EmulatedTransport,
        loader: EmulatedLoader { beep_ms: BEEP_MS },
        delay: Delay,
    }
}

// ── I2C ──────────────────────────────────────────────────────────────────────

/// I2C bus that accepts everything and logs register writes.
#[derive(Debug, Default)]
pub struct LoggingI2c {
    writes: u32,
}

impl LoggingI2c {
    /// Write transactions seen so far.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl I2cErrorType for LoggingI2c {
    type Error = Infallible;
}

impl I2c for LoggingI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    self.writes = self.writes.saturating_add(1);
                    if let [reg, value] = **bytes {
                        trace!("i2c {}: reg {} <- {}", address, reg, value);
                    }
                }
                // The codec is write-only here; reads return zeros.
                Operation::Read(buffer) => buffer.fill(0),
            }
        }
        Ok(())
    }
}

// ── Pins and clocks ──────────────────────────────────────────────────────────

/// Reset line that only logs edges.
#[derive(Debug)]
pub struct EmulatedResetLine {
    high: bool,
}

impl Default for EmulatedResetLine {
    fn default() -> Self {
        Self { high: true }
    }
}

impl EmulatedResetLine {
    /// Current level.
    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl PinErrorType for EmulatedResetLine {
    type Error = Infallible;
}

impl OutputPin for EmulatedResetLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        debug!("reset line low");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        debug!("reset line high");
        Ok(())
    }
}

/// PWM clock generator that only logs.
#[derive(Debug, Default)]
pub struct EmulatedMclk {
    running_hz: Option<u32>,
}

impl MclkGenerator for EmulatedMclk {
    type Error = Infallible;

    fn start(&mut self, frequency_hz: u32, duty: DutyCycle) -> Result<(), Self::Error> {
        self.running_hz = Some(frequency_hz);
        info!("mclk: {} Hz, duty {}/65536", frequency_hz, duty.raw());
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        if self.running_hz.take().is_some() {
            info!("mclk: stopped");
        }
        Ok(())
    }
}

// ── Audio ────────────────────────────────────────────────────────────────────

/// A loaded waveform: just its name and how long it plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatedWaveform {
    /// Asset name.
    pub name: &'static str,
    /// Playback duration.
    pub duration_ms: u32,
}

/// Loader that resolves every asset to a fixed-length beep.
#[derive(Debug, Clone, Copy)]
pub struct EmulatedLoader {
    /// Duration given to every waveform.
    pub beep_ms: u32,
}

impl WaveformLoader for EmulatedLoader {
    type Waveform = EmulatedWaveform;
    type Error = Infallible;

    async fn load(&mut self, waveform: WaveformRef) -> Result<Self::Waveform, Self::Error> {
        Ok(EmulatedWaveform {
            name: waveform.name(),
            duration_ms: self.beep_ms,
        })
    }
}

/// Transport that sleeps for the waveform duration.
#[derive(Debug, Clone, Copy)]
pub struct EmulatedTransport;

impl AudioTransport for EmulatedTransport {
    type Waveform = EmulatedWaveform;
    type Error = Infallible;

    async fn play(&mut self, waveform: &Self::Waveform) -> Result<(), Self::Error> {
        info!("play: {} ({} ms)", waveform.name, waveform.duration_ms);
        tokio::time::sleep(tokio::time::Duration::from_millis(u64::from(
            waveform.duration_ms,
        )))
        .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec_hal::{ChannelMute, CodecDriver};

    #[tokio::test]
    async fn codec_driver_runs_over_logging_bus() {
        let mut codec = Tlv320dac3100::new(LoggingI2c::default(), Delay);
        codec.attach().await.unwrap();
        codec.set_mute(ChannelMute::NONE).await.unwrap();
        let (i2c, _) = codec.release();
        assert!(i2c.writes() > 2);
    }

    #[tokio::test]
    async fn transport_takes_the_waveform_duration() {
        let mut loader = EmulatedLoader { beep_ms: 40 };
        let beep = loader.load(WaveformRef::new("beep.wav")).await.unwrap();
        let started = tokio::time::Instant::now();
        EmulatedTransport.play(&beep).await.unwrap();
        assert!(started.elapsed() >= tokio::time::Duration::from_millis(40));
    }

    #[test]
    fn mclk_stop_is_idempotent() {
        let mut mclk = EmulatedMclk::default();
        mclk.start(5_000_000, DutyCycle::HALF).unwrap();
        mclk.stop().unwrap();
        mclk.stop().unwrap();
        assert_eq!(mclk.running_hz, None);
    }
}
