//! Demo state machine
//!
//! ```text
//!            ┌────────────────────────── next profile ─────────────────────────┐
//!            ▼                                                                 │
//! Idle ─► Resetting ─► Configuring ─► Settling ─► Playing ─► Muting ───────────┤
//!                                                                              │
//!   table exhausted ─► deactivate clock, next source ─► inter-source pause ────┤
//!   sources exhausted ─► full-cycle pause ─► next pass ────────────────────────┘
//! ```
//!
//! The orchestrator owns every collaborator. The clock manager sits outside
//! the per-profile runner so the [`ActiveClock`](crate::ActiveClock) guard
//! can borrow it for a whole source while the runner mutates the rest.
//!
//! # Halt policy
//!
//! Any error stops the run. Before returning it the orchestrator mutes the
//! codec once (best effort) unless the session is already known muted or
//! no codec write happened; the clock guard then stops the generator on
//! drop.

use codec_hal::{AudioTransport, ChannelMute, ClockSource, CodecDriver, MclkGenerator, WaveformLoader};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::audio::clock_source::ClockSourceManager;
use crate::audio::configurator::DacConfigurator;
use crate::audio::playback::PlaybackSequencer;
use crate::audio::reset::ResetSequencer;
use crate::config::{DemoConfig, SampleRateProfile, VolumeProfile, BIT_DEPTH};
use crate::error::SequenceError;
use crate::session::CodecSession;
use crate::timing::Timing;

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DemoState {
    /// Between profiles.
    Idle,
    /// Reset pulse in progress.
    Resetting,
    /// Codec writes in progress.
    Configuring,
    /// Waiting for the analog stage.
    Settling,
    /// Beeps in progress.
    Playing,
    /// Muted, waiting out the mute settle.
    Muting,
}

impl DemoState {
    /// Short label for log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Resetting => "resetting",
            Self::Configuring => "configuring",
            Self::Settling => "settling",
            Self::Playing => "playing",
            Self::Muting => "muting",
        }
    }
}

/// How many full passes to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Iterations {
    /// Until an error or power-off.
    Forever,
    /// Exactly `n` passes over every clock source and profile.
    Cycles(u32),
}

impl Iterations {
    /// Whether another pass may start after `completed` passes.
    pub const fn allows(self, completed: u32) -> bool {
        match self {
            Self::Forever => true,
            Self::Cycles(n) => completed < n,
        }
    }
}

/// Counters for a bounded run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunSummary {
    /// Completed passes.
    pub cycles: u32,
    /// Completed sessions (reset through mute).
    pub sessions: u32,
    /// Beeps played.
    pub beeps: u32,
}

/// Every peripheral the demo drives.
pub struct DemoHardware<G, R, C, T, L, D> {
    /// MCLK generator (PWM).
    pub mclk: G,
    /// Codec hard-reset line.
    pub reset_line: R,
    /// Codec control driver.
    pub codec: C,
    /// I2S transport.
    pub transport: T,
    /// Waveform loader.
    pub loader: L,
    /// Async delay source.
    pub delay: D,
}

/// Everything a single profile touches.
struct SessionRunner<R, C, T, L, D> {
    dac: DacConfigurator<C>,
    reset: ResetSequencer,
    playback: PlaybackSequencer,
    reset_line: R,
    transport: T,
    loader: L,
    delay: D,
    volume: VolumeProfile,
    state: DemoState,
    session: Option<CodecSession>,
}

fn transition(state: &mut DemoState, next: DemoState) {
    debug!("state: {} -> {}", state.name(), next.name());
    *state = next;
}

impl<R, C, T, L, D> SessionRunner<R, C, T, L, D>
where
    R: OutputPin,
    C: CodecDriver,
    T: AudioTransport,
    L: WaveformLoader<Waveform = T::Waveform>,
    D: DelayNs,
{
    /// Reset, configure, settle, play and mute one profile.
    async fn run_profile(
        &mut self,
        source: ClockSource,
        profile: &SampleRateProfile,
    ) -> Result<u32, SequenceError> {
        transition(&mut self.state, DemoState::Idle);
        info!(
            "profile: {} Hz x{} from {}",
            profile.sample_rate_hz(),
            profile.beep_count(),
            source.name()
        );
        let waveform = self.loader.load(profile.waveform()).await.map_err(|_| {
            error!("profile: cannot load {}", profile.waveform().name());
            SequenceError::WaveformUnavailable
        })?;

        transition(&mut self.state, DemoState::Resetting);
        self.reset
            .reset(&mut self.reset_line, &mut self.delay, self.session.take())
            .await?;

        transition(&mut self.state, DemoState::Configuring);
        let configured = self
            .dac
            .configure(profile.sample_rate_hz(), source, &self.volume)
            .await?;
        let session = self.session.insert(configured);

        transition(&mut self.state, DemoState::Settling);
        self.playback.settle(&mut self.delay, session).await;

        transition(&mut self.state, DemoState::Playing);
        let beeps = self
            .playback
            .play(
                self.dac.codec_mut(),
                &mut self.transport,
                &mut self.delay,
                session,
                profile,
                &waveform,
            )
            .await?;

        transition(&mut self.state, DemoState::Muting);
        Ok(beeps)
    }

    /// Best-effort mute before the error leaves the orchestrator.
    async fn halt(&mut self, cause: SequenceError) {
        error!("halted while {}: {}", self.state.name(), cause);
        let known_muted = self.session.as_ref().is_some_and(CodecSession::is_muted);
        let untouched = matches!(cause, SequenceError::UnsupportedProfile { .. });
        if known_muted || untouched {
            return;
        }
        match self.dac.codec_mut().set_mute(ChannelMute::BOTH).await {
            Ok(()) => {
                if let Some(session) = self.session.as_mut() {
                    session.mark_muted();
                }
                warn!("halt: codec muted");
            }
            Err(_) => error!("halt: mute write failed, output state unknown"),
        }
    }

    async fn pause(&mut self, ms: u32, what: &'static str) {
        debug!("pause: {} ({} ms)", what, ms);
        self.delay.delay_ms(ms).await;
    }
}

/// Runs the profile table under every clock source, pass after pass.
pub struct DemoOrchestrator<'a, G, R, C, T, L, D> {
    config: DemoConfig<'a>,
    clock: ClockSourceManager<G>,
    runner: SessionRunner<R, C, T, L, D>,
}

impl<'a, G, R, C, T, L, D> DemoOrchestrator<'a, G, R, C, T, L, D>
where
    G: MclkGenerator,
    R: OutputPin,
    C: CodecDriver,
    T: AudioTransport,
    L: WaveformLoader<Waveform = T::Waveform>,
    D: DelayNs,
{
    /// Take ownership of the hardware. Timing below the minimums is raised.
    pub fn new(config: DemoConfig<'a>, hardware: DemoHardware<G, R, C, T, L, D>) -> Self {
        let timing = config.timing.enforce_minimums();
        Self {
            config: DemoConfig { timing, ..config },
            clock: ClockSourceManager::new(hardware.mclk),
            runner: SessionRunner {
                dac: DacConfigurator::new(hardware.codec, BIT_DEPTH),
                reset: ResetSequencer::new(&timing),
                playback: PlaybackSequencer::new(&timing),
                reset_line: hardware.reset_line,
                transport: hardware.transport,
                loader: hardware.loader,
                delay: hardware.delay,
                volume: config.volume,
                state: DemoState::Idle,
                session: None,
            },
        }
    }

    /// Current state.
    pub fn state(&self) -> DemoState {
        self.runner.state
    }

    /// The live codec session, if any.
    pub fn session(&self) -> Option<&CodecSession> {
        self.runner.session.as_ref()
    }

    /// Timing in effect (after minimums).
    pub fn timing(&self) -> &Timing {
        &self.config.timing
    }

    /// Run `iterations` passes.
    ///
    /// With [`Iterations::Forever`] this only returns on error.
    pub async fn run(&mut self, iterations: Iterations) -> Result<RunSummary, SequenceError> {
        if let Err(err) = self.config.validate() {
            error!("run: empty profile or clock-source table");
            return Err(err);
        }

        let mut summary = RunSummary::default();
        while iterations.allows(summary.cycles) {
            if summary.cycles > 0 {
                self.runner
                    .pause(self.config.timing.full_cycle_ms, "full cycle")
                    .await;
            }
            self.run_pass(&mut summary).await?;
            summary.cycles = summary.cycles.saturating_add(1);
            info!(
                "pass {} done: {} sessions, {} beeps",
                summary.cycles,
                summary.sessions,
                summary.beeps
            );
        }
        Ok(summary)
    }

    async fn run_pass(&mut self, summary: &mut RunSummary) -> Result<(), SequenceError> {
        for (index, &source) in self.config.clock_sources.iter().enumerate() {
            if index > 0 {
                self.runner
                    .pause(self.config.timing.inter_source_ms, "clock source change")
                    .await;
            }
            let active = self
                .clock
                .activate(source, self.runner.session.as_ref())?;

            for (position, profile) in self.config.profiles.iter().enumerate() {
                if position > 0 {
                    self.runner
                        .pause(self.config.timing.inter_profile_ms, "next profile")
                        .await;
                }
                match self.runner.run_profile(source, profile).await {
                    Ok(beeps) => {
                        summary.sessions = summary.sessions.saturating_add(1);
                        summary.beeps = summary.beeps.saturating_add(beeps);
                    }
                    Err(cause) => {
                        self.runner.halt(cause).await;
                        return Err(cause);
                    }
                }
            }

            active.deactivate()?;
        }
        Ok(())
    }

    /// Stop driving the hardware and hand it back.
    pub fn into_hardware(self) -> DemoHardware<G, R, C, T, L, D> {
        let runner = self.runner;
        DemoHardware {
            mclk: self.clock.into_inner(),
            reset_line: runner.reset_line,
            codec: runner.dac.into_inner(),
            transport: runner.transport,
            loader: runner.loader,
            delay: runner.delay,
        }
    }
}
