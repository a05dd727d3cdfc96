//! Beep playback for one session.
//!
//! ```text
//! [settle if needed] ─► pre-beep ─► (play ─► inter-beep) × N ─► mute ─► mute-settle
//! ```
//!
//! The session always leaves here muted, so the next reset or clock switch
//! happens on a silent codec.

use codec_hal::{AudioTransport, ChannelMute, CodecDriver};
use embedded_hal_async::delay::DelayNs;

use crate::config::SampleRateProfile;
use crate::error::SequenceError;
use crate::session::CodecSession;
use crate::timing::Timing;

/// Paces playback and tears the session down to muted.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackSequencer {
    settle_ms: u32,
    pre_beep_ms: u32,
    mute_settle_ms: u32,
}

impl PlaybackSequencer {
    /// Waits from `timing`, raised to the minimums if shorter.
    pub fn new(timing: &Timing) -> Self {
        let min = Timing::MINIMUM;
        Self {
            settle_ms: timing.settle_ms.max(min.settle_ms),
            pre_beep_ms: timing.pre_beep_ms.max(min.pre_beep_ms),
            mute_settle_ms: timing.mute_settle_ms.max(min.mute_settle_ms),
        }
    }

    /// Wait out the post-configuration settle delay, once per session.
    pub async fn settle<D: DelayNs>(&self, delay: &mut D, session: &mut CodecSession) {
        if session.is_settled() {
            return;
        }
        debug!("playback: settling {} ms", self.settle_ms);
        delay.delay_ms(self.settle_ms).await;
        session.mark_settled();
    }

    /// Play `waveform` `profile.beep_count()` times, then mute.
    ///
    /// Returns the number of beeps played.
    ///
    /// # Panics
    ///
    /// If `session` is already muted: it has been torn down.
    pub async fn play<C, T, D>(
        &self,
        codec: &mut C,
        transport: &mut T,
        delay: &mut D,
        session: &mut CodecSession,
        profile: &SampleRateProfile,
        waveform: &T::Waveform,
    ) -> Result<u32, SequenceError>
    where
        C: CodecDriver,
        T: AudioTransport,
        D: DelayNs,
    {
        assert!(!session.is_muted(), "playback on a muted session");

        self.settle(delay, session).await;
        delay.delay_ms(self.pre_beep_ms).await;

        let beeps = profile.beep_count();
        for beep in 1..=beeps {
            trace!("playback: beep {} of {}", beep, beeps);
            transport.play(waveform).await.map_err(|_| {
                error!("playback: transport failed on beep {}", beep);
                SequenceError::Transport
            })?;
            delay.delay_ms(profile.inter_beep_delay_ms()).await;
        }

        codec.set_mute(ChannelMute::BOTH).await.map_err(|_| {
            error!("playback: mute write failed");
            SequenceError::BusCommunication
        })?;
        session.mark_muted();
        delay.delay_ms(self.mute_settle_ms).await;
        Ok(u32::from(beeps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec_hal::mocks::{
        CodecCall, Event, EventLog, MockCodec, MockDelay, MockTransport, MockWaveform,
    };
    use codec_hal::{ClockSource, SampleRate, WaveformRef};

    const BEEP: MockWaveform = MockWaveform {
        name: "sinewave_8kHz.wav",
    };

    fn profile(beeps: u8) -> SampleRateProfile {
        SampleRateProfile::new(8_000, WaveformRef::new(BEEP.name), beeps, 350)
    }

    fn session() -> CodecSession {
        CodecSession::configured(
            SampleRate::Hz8000,
            ClockSource::MasterClockPwm {
                frequency_hz: 5_000_000,
            },
        )
    }

    #[tokio::test]
    async fn two_beeps_then_mute() {
        let log = EventLog::new();
        let mut codec = MockCodec::new(&log);
        let mut transport = MockTransport::new(&log);
        let mut delay = MockDelay::new(&log);
        let mut s = session();

        let beeps = PlaybackSequencer::new(&Timing::default())
            .play(&mut codec, &mut transport, &mut delay, &mut s, &profile(2), &BEEP)
            .await
            .unwrap();

        assert_eq!(beeps, 2);
        assert_eq!(
            log.events(),
            vec![
                Event::Delay { ms: 350 },
                Event::Delay { ms: 100 },
                Event::Play { name: BEEP.name },
                Event::Delay { ms: 350 },
                Event::Play { name: BEEP.name },
                Event::Delay { ms: 350 },
                Event::Mute(ChannelMute::BOTH),
                Event::Delay { ms: 100 },
            ]
        );
        assert!(s.is_muted());
        assert!(s.is_settled());
    }

    #[tokio::test]
    async fn settled_session_skips_settle_delay() {
        let log = EventLog::new();
        let mut delay = MockDelay::new(&log);
        let mut s = session();
        let seq = PlaybackSequencer::new(&Timing::default());

        seq.settle(&mut delay, &mut s).await;
        seq.settle(&mut delay, &mut s).await;
        assert_eq!(log.events(), vec![Event::Delay { ms: 350 }]);
    }

    #[tokio::test]
    async fn transport_failure_leaves_session_unmuted() {
        let log = EventLog::new();
        let mut codec = MockCodec::new(&log);
        let mut transport = MockTransport::new(&log);
        transport.fail_on_play = Some(2);
        let mut delay = MockDelay::new(&log);
        let mut s = session();

        let result = PlaybackSequencer::new(&Timing::default())
            .play(&mut codec, &mut transport, &mut delay, &mut s, &profile(3), &BEEP)
            .await;

        assert_eq!(result, Err(SequenceError::Transport));
        assert!(!s.is_muted(), "caller decides how to halt");
        assert_eq!(log.count(|e| matches!(e, Event::Play { .. })), 1);
    }

    #[tokio::test]
    async fn failed_mute_is_bus_error() {
        let log = EventLog::new();
        let mut codec = MockCodec::new(&log);
        codec.fail_on = Some(CodecCall::Mute);
        let mut transport = MockTransport::new(&log);
        let mut delay = MockDelay::new(&log);
        let mut s = session();

        let result = PlaybackSequencer::new(&Timing::default())
            .play(&mut codec, &mut transport, &mut delay, &mut s, &profile(1), &BEEP)
            .await;
        assert_eq!(result, Err(SequenceError::BusCommunication));
        assert!(!s.is_muted());
    }

    #[tokio::test]
    #[should_panic(expected = "playback on a muted session")]
    async fn muted_session_panics() {
        let log = EventLog::new();
        let mut codec = MockCodec::new(&log);
        let mut transport = MockTransport::new(&log);
        let mut delay = MockDelay::new(&log);
        let mut s = session();
        s.mark_muted();

        let _ = PlaybackSequencer::new(&Timing::default())
            .play(&mut codec, &mut transport, &mut delay, &mut s, &profile(1), &BEEP)
            .await;
    }
}
