//! TLV320DAC3100 clock-source demo
//!
//! Resets a TLV320DAC3100 codec, programs it for each sample rate in a
//! static table under each clock source, lets the analog stage settle, plays
//! a short beep a few times and mutes again. Listening to the result makes
//! clock-plan errors audible.
//!
//! # Architecture
//!
//! ```text
//! DemoOrchestrator (orchestrator)
//!         ↓
//! ClockSourceManager → ResetSequencer → DacConfigurator → PlaybackSequencer
//!         ↓
//! Codec HAL traits (codec-hal crate)
//!         ↓
//! TLV320DAC3100 driver / board drivers / mocks
//! ```
//!
//! # Features
//!
//! - `defmt` - log through defmt (embedded builds)
//! - `tracing` - log through tracing (desktop builds)
//! - `std` - standard library and codec-hal mocks
//! - `emulator` - desktop emulator (`cargo run --example emulated_demo --features emulator`)

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_arguments)] // sequencer steps take every collaborator they drive
#![allow(async_fn_in_trait)]

// Must come first: the log macros are textually scoped.
#[macro_use]
mod fmt;

pub mod audio;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod session;
pub mod timing;

#[cfg(feature = "emulator")]
pub mod emulator;

pub use audio::clock_source::{ActiveClock, ClockSourceManager};
pub use audio::configurator::DacConfigurator;
pub use audio::dac::tlv320dac3100::Tlv320dac3100;
pub use audio::playback::PlaybackSequencer;
pub use audio::reset::ResetSequencer;
pub use config::{DemoConfig, SampleRateProfile, VolumeProfile};
pub use error::SequenceError;
pub use orchestrator::{DemoHardware, DemoOrchestrator, DemoState, Iterations, RunSummary};
pub use session::CodecSession;
pub use timing::Timing;
