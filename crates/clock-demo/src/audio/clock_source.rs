//! Master-clock ownership.
//!
//! [`ClockSourceManager::activate`] hands out an [`ActiveClock`] guard that
//! mutably borrows the manager, so a second activation cannot even be
//! written while one is live:
//!
//! ```compile_fail
//! use clock_demo::ClockSourceManager;
//! use codec_hal::mocks::{EventLog, MockMclk};
//! use codec_hal::ClockSource;
//!
//! let log = EventLog::new();
//! let mut clocks = ClockSourceManager::new(MockMclk::new(&log));
//! let pwm = ClockSource::MasterClockPwm { frequency_hz: 5_000_000 };
//! let first = clocks.activate(pwm, None).unwrap();
//! let second = clocks.activate(pwm, None).unwrap(); // second &mut borrow
//! drop(first);
//! ```
//!
//! The generator stops when the guard is deactivated or dropped, on every
//! exit path including `?` returns.

use codec_hal::{ClockSource, DutyCycle, MclkGenerator};

use crate::error::SequenceError;
use crate::session::CodecSession;

/// Owns the MCLK generator and tracks whether it is running.
pub struct ClockSourceManager<G> {
    generator: G,
    running_hz: Option<u32>,
}

impl<G: MclkGenerator> ClockSourceManager<G> {
    /// Take ownership of a stopped generator.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            running_hz: None,
        }
    }

    /// MCLK frequency currently generated, if any.
    pub fn running_hz(&self) -> Option<u32> {
        self.running_hz
    }

    /// Bring `source` up.
    ///
    /// `MasterClockPwm` starts a 50 % square wave; `BitClockDerived` makes
    /// sure the generator is stopped.
    ///
    /// # Panics
    ///
    /// If `current` is an unmuted session, or if a generator is somehow
    /// still running (a leaked guard).
    pub fn activate(
        &mut self,
        source: ClockSource,
        current: Option<&CodecSession>,
    ) -> Result<ActiveClock<'_, G>, SequenceError> {
        if let Some(session) = current {
            assert!(
                session.is_muted(),
                "clock source switched while codec unmuted"
            );
        }
        assert!(
            self.running_hz.is_none(),
            "master clock already running"
        );

        match source {
            ClockSource::MasterClockPwm { frequency_hz } => {
                self.generator
                    .start(frequency_hz, DutyCycle::HALF)
                    .map_err(|_| {
                        error!("clock: MCLK start at {} Hz failed", frequency_hz);
                        SequenceError::ClockGenerator
                    })?;
                self.running_hz = Some(frequency_hz);
                info!("clock: MCLK {} Hz started", frequency_hz);
            }
            ClockSource::BitClockDerived => {
                self.generator.stop().map_err(|_| {
                    error!("clock: MCLK stop failed");
                    SequenceError::ClockGenerator
                })?;
                info!("clock: PLL input is BCLK, MCLK off");
            }
        }

        Ok(ActiveClock {
            manager: self,
            source,
            released: false,
        })
    }

    /// Give the generator back.
    pub fn into_inner(self) -> G {
        self.generator
    }

    /// Stop a running generator. The manager only forgets the frequency
    /// once the stop succeeded.
    fn release(&mut self) -> Result<(), SequenceError> {
        if let Some(hz) = self.running_hz {
            self.generator.stop().map_err(|_| {
                error!("clock: MCLK {} Hz stop failed", hz);
                SequenceError::ClockGenerator
            })?;
            self.running_hz = None;
            info!("clock: MCLK {} Hz stopped", hz);
        }
        Ok(())
    }
}

/// A live clock source. Releases the generator on drop.
pub struct ActiveClock<'a, G: MclkGenerator> {
    manager: &'a mut ClockSourceManager<G>,
    source: ClockSource,
    released: bool,
}

impl<G: MclkGenerator> ActiveClock<'_, G> {
    /// Source this guard keeps alive.
    pub fn source(&self) -> ClockSource {
        self.source
    }

    /// Stop the generator, reporting a failed stop.
    pub fn deactivate(mut self) -> Result<(), SequenceError> {
        self.released = true;
        self.manager.release()
    }
}

impl<G: MclkGenerator> Drop for ActiveClock<'_, G> {
    fn drop(&mut self) {
        if !self.released && self.manager.release().is_err() {
            error!("clock: generator left running after drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec_hal::mocks::{Event, EventLog, MockMclk};
    use codec_hal::SampleRate;

    const PWM: ClockSource = ClockSource::MasterClockPwm {
        frequency_hz: 5_000_000,
    };

    fn muted_session() -> CodecSession {
        let mut s = CodecSession::configured(SampleRate::Hz48000, PWM);
        s.mark_muted();
        s
    }

    #[test]
    fn pwm_source_starts_half_duty_and_deactivate_stops() {
        let log = EventLog::new();
        let mut clocks = ClockSourceManager::new(MockMclk::new(&log));

        let active = clocks.activate(PWM, None).unwrap();
        assert_eq!(active.source(), PWM);
        active.deactivate().unwrap();

        assert_eq!(
            log.events(),
            vec![
                Event::MclkStart {
                    frequency_hz: 5_000_000,
                    duty: DutyCycle::HALF
                },
                Event::MclkStop
            ]
        );
        assert_eq!(clocks.running_hz(), None);
    }

    #[test]
    fn dropping_guard_stops_generator() {
        let log = EventLog::new();
        let mut clocks = ClockSourceManager::new(MockMclk::new(&log));
        {
            let _active = clocks.activate(PWM, Some(&muted_session())).unwrap();
        }
        assert_eq!(log.count(|e| *e == Event::MclkStop), 1);
        assert_eq!(clocks.into_inner().running_hz(), None);
    }

    #[test]
    fn bclk_source_leaves_generator_off() {
        let log = EventLog::new();
        let mut clocks = ClockSourceManager::new(MockMclk::new(&log));
        let active = clocks
            .activate(ClockSource::BitClockDerived, None)
            .unwrap();
        active.deactivate().unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn switching_sources_stops_before_restart() {
        let log = EventLog::new();
        let mut clocks = ClockSourceManager::new(MockMclk::new(&log));
        clocks.activate(PWM, None).unwrap().deactivate().unwrap();
        clocks.activate(PWM, None).unwrap().deactivate().unwrap();

        let kinds: Vec<bool> = log
            .events()
            .iter()
            .map(|e| matches!(e, Event::MclkStart { .. }))
            .collect();
        assert_eq!(kinds, vec![true, false, true, false]);
    }

    #[test]
    fn failed_start_reports_and_leaves_nothing_running() {
        let log = EventLog::new();
        let mut mclk = MockMclk::new(&log);
        mclk.fail_start = true;
        let mut clocks = ClockSourceManager::new(mclk);

        assert!(matches!(
            clocks.activate(PWM, None),
            Err(SequenceError::ClockGenerator)
        ));
        assert_eq!(clocks.running_hz(), None);
        assert!(log.is_empty());
    }

    #[test]
    fn failed_stop_keeps_generator_marked_running() {
        let log = EventLog::new();
        let mut clocks = ClockSourceManager::new(MockMclk::new(&log));
        let mut active = clocks.activate(PWM, None).unwrap();
        active.manager.generator.fail_stop = true;

        assert_eq!(active.deactivate(), Err(SequenceError::ClockGenerator));
        assert_eq!(clocks.running_hz(), Some(5_000_000));
        assert_eq!(log.count(|e| *e == Event::MclkStop), 0);
    }

    #[test]
    fn failed_stop_on_drop_keeps_generator_marked_running() {
        let log = EventLog::new();
        let mut clocks = ClockSourceManager::new(MockMclk::new(&log));
        {
            let mut active = clocks.activate(PWM, None).unwrap();
            active.manager.generator.fail_stop = true;
        }
        assert_eq!(clocks.running_hz(), Some(5_000_000));

        // A later successful stop clears it.
        clocks.generator.fail_stop = false;
        clocks.release().unwrap();
        assert_eq!(clocks.running_hz(), None);
        assert_eq!(log.count(|e| *e == Event::MclkStop), 1);
    }

    #[test]
    #[should_panic(expected = "master clock already running")]
    fn restart_after_failed_stop_is_a_resource_conflict() {
        let log = EventLog::new();
        let mut clocks = ClockSourceManager::new(MockMclk::new(&log));
        let mut active = clocks.activate(PWM, None).unwrap();
        active.manager.generator.fail_stop = true;
        let _ = active.deactivate();

        let _ = clocks.activate(PWM, None);
    }

    #[test]
    #[should_panic(expected = "while codec unmuted")]
    fn switching_while_unmuted_panics() {
        let log = EventLog::new();
        let mut clocks = ClockSourceManager::new(MockMclk::new(&log));
        let live = CodecSession::configured(SampleRate::Hz48000, PWM);
        let _ = clocks.activate(ClockSource::BitClockDerived, Some(&live));
    }
}
