//! Capability contracts for the codec clock demo.
//!
//! This crate defines the traits every external collaborator of the
//! sequencing core must satisfy, plus the small domain types those traits
//! speak in. Nothing here touches a register or a peripheral.
//!
//! # Architecture Layers
//!
//! ```text
//! Sequencing core (clock-demo crate)
//!         ↓
//! Codec HAL (this crate - trait abstractions)
//!         ↓
//! Board support (I2C / I2S / PWM / GPIO drivers)
//! ```
//!
//! # Contracts
//!
//! - [`CodecDriver`] - codec control: routing, gains, clocks, mute
//! - [`MclkGenerator`] - square-wave master clock on the codec MCLK pin
//! - [`AudioTransport`] - blocking waveform playback over I2S
//! - [`WaveformLoader`] - named asset → replayable waveform
//!
//! The reset line and delays use `embedded-hal` 1.0 directly:
//! [`embedded_hal::digital::OutputPin`] and
//! [`embedded_hal_async::delay::DelayNs`].
//!
//! # Features
//!
//! - `std`: recording mocks in [`mocks`] (always on for unit tests)
//! - `defmt`: `defmt::Format` derives on all public types

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this HAL crate:
#![allow(clippy::doc_markdown)] // register names and part numbers in doc comments
#![allow(clippy::must_use_candidate)] // accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // single-threaded executor, Send bounds not needed

pub mod audio_types;
pub mod clock;
pub mod codec;
pub mod mocks;
pub mod transport;

pub use audio_types::{BitDepth, GainDb, OutOfRangeError, SampleRate, UnsupportedSampleRate};
pub use clock::{ClockSource, DutyCycle, MclkGenerator};
pub use codec::{ChannelMute, CodecDriver, OutputRoute};
pub use transport::{AudioTransport, WaveformLoader, WaveformRef};
