//! VK-HAT ADC+DAC+PIO board support
//!
//! Finds the chips fitted to the HAT and hands back ready drivers sharing
//! one bus:
//!
//! ```no_run
//! use core::cell::RefCell;
//! use hat_board::BusEnumerator;
//! # fn run<I: embedded_hal::i2c::I2c, D: embedded_hal::delay::DelayNs + Clone>(i2c: I, delay: D) {
//! let bus = RefCell::new(i2c);
//! let board = BusEnumerator::new(&bus, delay).scan();
//! for adc in &board.adcs {
//!     let _ = adc;
//! }
//! # }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod enumerator;

pub use enumerator::{
    AddressRun, Board, BusEnumerator, DeviceKind, DiscoveredDevice, SharedBus, PMIC_ADDRESS,
};
