//! Codec hard reset.
//!
//! ```text
//! RESET ‾‾‾‾‾|____ ≥ low ____|‾‾‾‾ ≥ high ‾‾‾‾ (first bus write)
//! ```
//!
//! The line is borrowed for the pulse only. Any previous [`CodecSession`]
//! is consumed: after the pulse the codec is back in power-on reset.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::error::SequenceError;
use crate::session::CodecSession;
use crate::timing::Timing;

/// Drives the codec reset pulse.
#[derive(Debug, Clone, Copy)]
pub struct ResetSequencer {
    low_ms: u32,
    high_ms: u32,
}

impl ResetSequencer {
    /// Pulse widths from `timing`, raised to the minimums if shorter.
    pub fn new(timing: &Timing) -> Self {
        Self {
            low_ms: timing.reset_low_ms.max(Timing::MINIMUM.reset_low_ms),
            high_ms: timing.reset_high_ms.max(Timing::MINIMUM.reset_high_ms),
        }
    }

    /// Pulse the reset line low then high.
    ///
    /// # Panics
    ///
    /// If `previous` is still unmuted: resetting a playing codec pops.
    pub async fn reset<P, D>(
        &self,
        line: &mut P,
        delay: &mut D,
        previous: Option<CodecSession>,
    ) -> Result<(), SequenceError>
    where
        P: OutputPin,
        D: DelayNs,
    {
        if let Some(session) = previous {
            assert!(
                session.is_muted(),
                "codec reset while unmuted at {}",
                session.sample_rate().name()
            );
        }

        debug!("reset: low for {} ms", self.low_ms);
        line.set_low().map_err(|_| {
            error!("reset: cannot drive line low");
            SequenceError::ResetLine
        })?;
        delay.delay_ms(self.low_ms).await;

        line.set_high().map_err(|_| {
            error!("reset: cannot drive line high");
            SequenceError::ResetLine
        })?;
        delay.delay_ms(self.high_ms).await;
        Ok(())
    }
}
