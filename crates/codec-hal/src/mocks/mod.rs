//! Recording mocks for host tests and the emulator
//!
//! Every mock appends to one shared [`EventLog`], so a test can assert on
//! the exact interleaving of reset pulses, delays, clock changes, codec
//! writes and playback across all collaborators.

#![cfg(any(test, feature = "std"))]

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::*;

// ── Event log ────────────────────────────────────────────────────────────────

/// One observable side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Reset line driven low.
    ResetLow,
    /// Reset line driven high.
    ResetHigh,
    /// Millisecond delay.
    Delay {
        /// Requested duration.
        ms: u32,
    },
    /// Microsecond delay.
    DelayUs {
        /// Requested duration.
        us: u32,
    },
    /// Nanosecond delay.
    DelayNs {
        /// Requested duration.
        ns: u32,
    },
    /// MCLK generator started.
    MclkStart {
        /// Output frequency.
        frequency_hz: u32,
        /// Duty cycle.
        duty: DutyCycle,
    },
    /// MCLK generator stopped.
    MclkStop,
    /// Codec soft reset + baseline.
    CodecAttach,
    /// Speaker amplifier power.
    SpeakerOutput {
        /// Requested state.
        enabled: bool,
    },
    /// Headphone driver power.
    HeadphoneOutput {
        /// Requested state.
        enabled: bool,
    },
    /// Digital volume write.
    DacVolume(GainDb),
    /// Headphone analog volume write.
    HeadphoneVolume(GainDb),
    /// Speaker analog volume write.
    SpeakerVolume(GainDb),
    /// Clock / PLL programming.
    Clocks {
        /// Target rate.
        sample_rate: SampleRate,
        /// Word length.
        bit_depth: BitDepth,
        /// MCLK frequency, `None` for BCLK-derived.
        mclk_hz: Option<u32>,
    },
    /// DAC mute state write.
    Mute(ChannelMute),
    /// Waveform asset loaded.
    Load {
        /// Asset name.
        name: &'static str,
    },
    /// Waveform played to completion.
    Play {
        /// Asset name.
        name: &'static str,
    },
}

impl Event {
    /// Whether this event is a write to the codec.
    pub fn is_codec_write(&self) -> bool {
        matches!(
            self,
            Self::CodecAttach
                | Self::SpeakerOutput { .. }
                | Self::HeadphoneOutput { .. }
                | Self::DacVolume(_)
                | Self::HeadphoneVolume(_)
                | Self::SpeakerVolume(_)
                | Self::Clocks { .. }
                | Self::Mute(_)
        )
    }
}

/// Shared, append-only trace of [`Event`]s.
///
/// Cloning yields another handle to the same trace.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    /// Snapshot of all events so far.
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Number of events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| pred(e)).count()
    }

    /// Index of the first event matching `pred`.
    pub fn position(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(pred)
    }

    /// Sum of all millisecond delays.
    pub fn total_delay_ms(&self) -> u64 {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Delay { ms } => Some(u64::from(*ms)),
                _ => None,
            })
            .sum()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Error returned by every mock when a failure is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockFault;

impl digital::Error for MockFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

// ── Reset line ───────────────────────────────────────────────────────────────

/// Mock codec reset line.
pub struct MockResetLine {
    log: EventLog,
    high: bool,
    /// When set, every level change fails.
    pub fail: bool,
}

impl MockResetLine {
    /// Create a line that records into `log`. Starts high (codec running).
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            high: true,
            fail: false,
        }
    }

    /// Current level.
    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl digital::ErrorType for MockResetLine {
    type Error = MockFault;
}

impl OutputPin for MockResetLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockFault);
        }
        self.high = false;
        self.log.push(Event::ResetLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockFault);
        }
        self.high = true;
        self.log.push(Event::ResetHigh);
        Ok(())
    }
}

// ── Delay ────────────────────────────────────────────────────────────────────

/// Delay that records the requested duration and returns immediately.
pub struct MockDelay {
    log: EventLog,
}

impl MockDelay {
    /// Create a delay that records into `log`.
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayNs { ns });
    }

    async fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayUs { us });
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::Delay { ms });
    }
}

// ── MCLK generator ───────────────────────────────────────────────────────────

/// Mock PWM master-clock generator.
///
/// Starting it while already running is a test failure: there is one MCLK
/// pin and one timer behind it.
pub struct MockMclk {
    log: EventLog,
    running: Option<u32>,
    /// When set, `start` fails.
    pub fail_start: bool,
    /// When set, `stop` fails and the output keeps running.
    pub fail_stop: bool,
}

impl MockMclk {
    /// Create a stopped generator that records into `log`.
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            running: None,
            fail_start: false,
            fail_stop: false,
        }
    }

    /// Frequency currently generated, if running.
    pub fn running_hz(&self) -> Option<u32> {
        self.running
    }
}

impl MclkGenerator for MockMclk {
    type Error = MockFault;

    fn start(&mut self, frequency_hz: u32, duty: DutyCycle) -> Result<(), Self::Error> {
        assert!(
            self.running.is_none(),
            "MCLK started at {frequency_hz} Hz while already running"
        );
        if self.fail_start {
            return Err(MockFault);
        }
        self.running = Some(frequency_hz);
        self.log.push(Event::MclkStart { frequency_hz, duty });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        if self.fail_stop {
            return Err(MockFault);
        }
        if self.running.take().is_some() {
            self.log.push(Event::MclkStop);
        }
        Ok(())
    }
}

// ── Codec ────────────────────────────────────────────────────────────────────

/// Codec operation a [`MockCodec`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecCall {
    /// `attach`
    Attach,
    /// `set_speaker_output` / `set_headphone_output`
    Routing,
    /// Any volume write.
    Volume,
    /// `configure_clocks`
    Clocks,
    /// `set_mute`
    Mute,
}

/// Mock codec recording every control write.
pub struct MockCodec {
    log: EventLog,
    mute: ChannelMute,
    /// Operation that fails with [`MockFault`] instead of recording.
    pub fail_on: Option<CodecCall>,
    /// Rate `supports_clocks` rejects.
    pub unsupported: Option<SampleRate>,
}

impl MockCodec {
    /// Create a codec that records into `log`. Starts muted.
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            mute: ChannelMute::BOTH,
            fail_on: None,
            unsupported: None,
        }
    }

    /// Last mute state written.
    pub fn mute(&self) -> ChannelMute {
        self.mute
    }

    fn record(&self, call: CodecCall, event: Event) -> Result<(), MockFault> {
        if self.fail_on == Some(call) {
            return Err(MockFault);
        }
        self.log.push(event);
        Ok(())
    }
}

impl CodecDriver for MockCodec {
    type Error = MockFault;

    async fn attach(&mut self) -> Result<(), Self::Error> {
        self.record(CodecCall::Attach, Event::CodecAttach)?;
        self.mute = ChannelMute::BOTH;
        Ok(())
    }

    async fn set_speaker_output(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.record(CodecCall::Routing, Event::SpeakerOutput { enabled })
    }

    async fn set_headphone_output(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.record(CodecCall::Routing, Event::HeadphoneOutput { enabled })
    }

    async fn set_dac_volume(&mut self, gain: GainDb) -> Result<(), Self::Error> {
        self.record(CodecCall::Volume, Event::DacVolume(gain))
    }

    async fn set_headphone_volume(&mut self, gain: GainDb) -> Result<(), Self::Error> {
        self.record(CodecCall::Volume, Event::HeadphoneVolume(gain))
    }

    async fn set_speaker_volume(&mut self, gain: GainDb) -> Result<(), Self::Error> {
        self.record(CodecCall::Volume, Event::SpeakerVolume(gain))
    }

    async fn configure_clocks(
        &mut self,
        sample_rate: SampleRate,
        bit_depth: BitDepth,
        mclk_hz: Option<u32>,
    ) -> Result<(), Self::Error> {
        self.record(
            CodecCall::Clocks,
            Event::Clocks {
                sample_rate,
                bit_depth,
                mclk_hz,
            },
        )
    }

    async fn set_mute(&mut self, mute: ChannelMute) -> Result<(), Self::Error> {
        self.record(CodecCall::Mute, Event::Mute(mute))?;
        self.mute = mute;
        Ok(())
    }

    fn supports_clocks(
        &self,
        sample_rate: SampleRate,
        _bit_depth: BitDepth,
        mclk_hz: Option<u32>,
    ) -> bool {
        self.unsupported != Some(sample_rate) && mclk_hz != Some(0)
    }
}

// ── Waveforms ────────────────────────────────────────────────────────────────

/// Waveform handle produced by [`MockLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockWaveform {
    /// Asset name.
    pub name: &'static str,
}

/// Mock asset loader.
pub struct MockLoader {
    log: EventLog,
    /// Asset name that fails to load.
    pub missing: Option<&'static str>,
}

impl MockLoader {
    /// Create a loader that records into `log`.
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            missing: None,
        }
    }
}

impl WaveformLoader for MockLoader {
    type Waveform = MockWaveform;
    type Error = MockFault;

    async fn load(&mut self, waveform: WaveformRef) -> Result<Self::Waveform, Self::Error> {
        let name = waveform.name();
        if self.missing == Some(name) {
            return Err(MockFault);
        }
        self.log.push(Event::Load { name });
        Ok(MockWaveform { name })
    }
}

/// Mock I2S transport; playback completes instantly.
pub struct MockTransport {
    log: EventLog,
    plays: usize,
    /// 1-based play call that fails.
    pub fail_on_play: Option<usize>,
}

impl MockTransport {
    /// Create a transport that records into `log`.
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            plays: 0,
            fail_on_play: None,
        }
    }

    /// Play calls attempted so far, including failed ones.
    pub fn plays(&self) -> usize {
        self.plays
    }
}

impl AudioTransport for MockTransport {
    type Waveform = MockWaveform;
    type Error = MockFault;

    async fn play(&mut self, waveform: &Self::Waveform) -> Result<(), Self::Error> {
        self.plays = self.plays.saturating_add(1);
        if self.fail_on_play == Some(self.plays) {
            return Err(MockFault);
        }
        self.log.push(Event::Play {
            name: waveform.name,
        });
        Ok(())
    }
}
