//! Scan a simulated ADC+DAC+PIO HAT and print what was found.
//!
//! ```text
//! RUST_LOG=debug cargo run -p hat-board --example scan --features std,tracing
//! ```
#![allow(clippy::print_stdout, clippy::use_debug)]

use core::cell::RefCell;

use embassy_time::Duration;
use hat_board::BusEnumerator;
use hat_drivers::adc::AdcConfig;
use hat_drivers::dac::DacConfig;
use hat_drivers::ioe::IoExpander;
use hat_platform::mocks::{NoopDelay, RegisterFile, SimBus};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Register files stand in for the chips: every one answers a probe.
    let mut sim = SimBus::new();
    for address in [0x12, 0x40, 0x50, 0x51, 0x52, 0x53, 0x60, 0x70] {
        sim.attach(address, RegisterFile::new());
    }
    let bus = RefCell::new(sim);

    let mut board = BusEnumerator::new(&bus, NoopDelay).scan();
    println!("{} devices discovered", board.discovered.len());
    for device in &board.discovered {
        println!("  {} @ {} ({})", device.kind.role(), device.address, device.kind.part());
    }

    if let Some(dac) = board.dacs.first_mut() {
        let result = dac
            .configure(DacConfig::default())
            .and_then(|()| dac.set_voltage(0, 1.25));
        println!("DAC ch0 -> 1.25 V: {}", if result.is_ok() { "ok" } else { "failed" });
    }
    if let Some(ioe) = board.ioes.first_mut() {
        let _ = ioe.configure_direction(0xF0);
        let _ = ioe.set_bit(0);
        println!("PIO output latch: {:?}", ioe.output_port());
    }
    if let Some(adc) = board.adcs.first_mut() {
        // A register file never raises DRDY: this shows the timeout path.
        let _ = adc.configure(AdcConfig::default());
        match adc.read_voltage(Duration::from_millis(10)) {
            Ok(volts) => println!("ADC: {volts} V"),
            Err(err) => println!("ADC: {err}"),
        }
    }
}
