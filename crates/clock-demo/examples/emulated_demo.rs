//! TLV320 Clock Demo on the desktop
//!
//! Drives the real TLV320DAC3100 driver and orchestrator against emulated
//! peripherals. Runs forever unless a pass count is given.
//!
//! Run with: cargo run -p clock-demo --example emulated_demo --features emulator [-- PASSES]

use clock_demo::config::{APP_NAME, APP_VERSION};
use clock_demo::emulator;
use clock_demo::{DemoConfig, DemoOrchestrator, Iterations};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    emulator::init_tracing();

    let iterations = match std::env::args().nth(1) {
        Some(passes) => Iterations::Cycles(passes.parse()?),
        None => Iterations::Forever,
    };

    let config = DemoConfig::builtin();
    println!("{APP_NAME} v{APP_VERSION} - Emulator");
    println!(
        "{} profiles x {} clock sources per pass\n",
        config.profiles.len(),
        config.clock_sources.len()
    );

    let mut demo = DemoOrchestrator::new(config, emulator::hardware());
    let summary = demo.run(iterations).await?;

    println!(
        "✓ {} passes, {} sessions, {} beeps",
        summary.cycles, summary.sessions, summary.beeps
    );
    Ok(())
}
