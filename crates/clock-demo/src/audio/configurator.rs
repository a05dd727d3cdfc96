//! Ordered codec configuration.
//!
//! Write order, each step committed before the next:
//!
//! ```text
//! attach ─► routing ─► gains (digital ≤ ceiling, then analog) ─► clocks ─► unmute
//! ```
//!
//! Routing before gain avoids switching a path at non-zero gain; clocks
//! last because the PLL plan depends on the already-chosen source. Settling
//! is the caller's job.

use codec_hal::{BitDepth, ChannelMute, ClockSource, CodecDriver, SampleRate};

use crate::config::VolumeProfile;
use crate::error::SequenceError;
use crate::session::CodecSession;

/// Owns the codec handle and programs it one session at a time.
pub struct DacConfigurator<C> {
    codec: C,
    bit_depth: BitDepth,
}

impl<C: CodecDriver> DacConfigurator<C> {
    /// Take ownership of `codec`; every session uses `bit_depth`.
    pub fn new(codec: C, bit_depth: BitDepth) -> Self {
        Self { codec, bit_depth }
    }

    /// Borrow the codec, e.g. to mute it.
    pub fn codec_mut(&mut self) -> &mut C {
        &mut self.codec
    }

    /// Give the codec back.
    pub fn into_inner(self) -> C {
        self.codec
    }

    /// Program the codec for `sample_rate_hz` under `clock_source`.
    ///
    /// An unsupported rate, or one the codec has no clock plan for, fails
    /// with [`SequenceError::UnsupportedProfile`] before any bus traffic.
    pub async fn configure(
        &mut self,
        sample_rate_hz: u32,
        clock_source: ClockSource,
        volume: &VolumeProfile,
    ) -> Result<CodecSession, SequenceError> {
        let unsupported = SequenceError::UnsupportedProfile { sample_rate_hz };
        let sample_rate = SampleRate::from_hz(sample_rate_hz).map_err(|_| {
            error!("configure: {} Hz is not a supported rate", sample_rate_hz);
            unsupported
        })?;
        let mclk_hz = clock_source.mclk_hz();
        if !self
            .codec
            .supports_clocks(sample_rate, self.bit_depth, mclk_hz)
        {
            error!(
                "configure: no clock plan for {} from {}",
                sample_rate.name(),
                clock_source.name()
            );
            return Err(unsupported);
        }

        self.codec.attach().await.map_err(|_| bus_error("attach"))?;

        self.codec
            .set_speaker_output(volume.route.speaker())
            .await
            .map_err(|_| bus_error("speaker routing"))?;
        self.codec
            .set_headphone_output(volume.route.headphone())
            .await
            .map_err(|_| bus_error("headphone routing"))?;
        debug!("configure: route {}", volume.route.name());

        let (digital, clamped) = volume.effective_digital_gain();
        if clamped {
            warn!(
                "configure: digital gain {} above ceiling, using {}",
                volume.digital_gain,
                digital
            );
        }
        self.codec
            .set_dac_volume(digital)
            .await
            .map_err(|_| bus_error("DAC volume"))?;
        if volume.route.headphone() {
            self.codec
                .set_headphone_volume(volume.headphone_gain)
                .await
                .map_err(|_| bus_error("headphone volume"))?;
        }
        if volume.route.speaker() {
            self.codec
                .set_speaker_volume(volume.speaker_gain)
                .await
                .map_err(|_| bus_error("speaker volume"))?;
        }

        self.codec
            .configure_clocks(sample_rate, self.bit_depth, mclk_hz)
            .await
            .map_err(|_| bus_error("clocks"))?;
        self.codec
            .set_mute(ChannelMute::NONE)
            .await
            .map_err(|_| bus_error("unmute"))?;

        info!(
            "configure: {} from {} ready",
            sample_rate.name(),
            clock_source.name()
        );
        Ok(CodecSession::configured(sample_rate, clock_source))
    }
}

fn bus_error(step: &'static str) -> SequenceError {
    error!("configure: bus error during {}", step);
    SequenceError::BusCommunication
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec_hal::mocks::{CodecCall, Event, EventLog, MockCodec};
    use codec_hal::{GainDb, OutputRoute};

    const PWM: ClockSource = ClockSource::MasterClockPwm {
        frequency_hz: 5_000_000,
    };

    #[tokio::test]
    async fn writes_in_routing_gain_clock_order() {
        let log = EventLog::new();
        let mut dac = DacConfigurator::new(MockCodec::new(&log), BitDepth::Bits16);

        let session = dac
            .configure(8_000, PWM, &VolumeProfile::DEFAULT)
            .await
            .unwrap();

        assert_eq!(
            log.events(),
            vec![
                Event::CodecAttach,
                Event::SpeakerOutput { enabled: false },
                Event::HeadphoneOutput { enabled: true },
                Event::DacVolume(GainDb::db(-6)),
                Event::HeadphoneVolume(GainDb::db(-6)),
                Event::Clocks {
                    sample_rate: SampleRate::Hz8000,
                    bit_depth: BitDepth::Bits16,
                    mclk_hz: Some(5_000_000)
                },
                Event::Mute(ChannelMute::NONE),
            ]
        );
        assert_eq!(session.sample_rate(), SampleRate::Hz8000);
        assert_eq!(session.clock_source(), PWM);
        assert!(session.is_powered());
        assert!(!session.is_muted());
        assert!(!session.is_settled());
    }

    #[tokio::test]
    async fn unsupported_rate_writes_nothing() {
        let log = EventLog::new();
        let mut dac = DacConfigurator::new(MockCodec::new(&log), BitDepth::Bits16);

        let result = dac
            .configure(96_000, PWM, &VolumeProfile::DEFAULT)
            .await;

        assert_eq!(
            result,
            Err(SequenceError::UnsupportedProfile {
                sample_rate_hz: 96_000
            })
        );
        assert!(log.is_empty(), "no bus writes for an unsupported rate");
    }

    #[tokio::test]
    async fn rate_without_clock_plan_writes_nothing() {
        let log = EventLog::new();
        let mut codec = MockCodec::new(&log);
        codec.unsupported = Some(SampleRate::Hz11025);
        let mut dac = DacConfigurator::new(codec, BitDepth::Bits16);

        let result = dac
            .configure(11_025, ClockSource::BitClockDerived, &VolumeProfile::DEFAULT)
            .await;
        assert_eq!(
            result,
            Err(SequenceError::UnsupportedProfile {
                sample_rate_hz: 11_025
            })
        );
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn digital_gain_is_clamped_to_ceiling() {
        let log = EventLog::new();
        let mut dac = DacConfigurator::new(MockCodec::new(&log), BitDepth::Bits16);
        let loud = VolumeProfile {
            digital_gain: GainDb::db(6),
            digital_gain_ceiling: GainDb::db(-2),
            ..VolumeProfile::DEFAULT
        };

        dac.configure(48_000, PWM, &loud).await.unwrap();
        assert_eq!(log.count(|e| *e == Event::DacVolume(GainDb::db(-2))), 1);
    }

    #[tokio::test]
    async fn speaker_route_writes_speaker_gain_only() {
        let log = EventLog::new();
        let mut dac = DacConfigurator::new(MockCodec::new(&log), BitDepth::Bits16);
        let speaker = VolumeProfile {
            route: OutputRoute::Speaker,
            ..VolumeProfile::DEFAULT
        };

        dac.configure(22_050, ClockSource::BitClockDerived, &speaker)
            .await
            .unwrap();
        assert_eq!(log.count(|e| matches!(e, Event::SpeakerVolume(_))), 1);
        assert_eq!(log.count(|e| matches!(e, Event::HeadphoneVolume(_))), 0);
        assert_eq!(
            log.position(|e| *e == Event::SpeakerOutput { enabled: true }),
            Some(1)
        );
    }

    #[tokio::test]
    async fn bus_failure_stops_before_clocks() {
        let log = EventLog::new();
        let mut codec = MockCodec::new(&log);
        codec.fail_on = Some(CodecCall::Volume);
        let mut dac = DacConfigurator::new(codec, BitDepth::Bits16);

        let result = dac.configure(44_100, PWM, &VolumeProfile::DEFAULT).await;
        assert_eq!(result, Err(SequenceError::BusCommunication));
        assert_eq!(log.count(|e| matches!(e, Event::Clocks { .. })), 0);
        assert_eq!(log.count(|e| matches!(e, Event::Mute(_))), 0);
    }
}
