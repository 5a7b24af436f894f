//! Bus and register abstraction layer for the VK-HAT drivers
//!
//! This crate provides the pieces every chip driver is built from,
//! enabling development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Board discovery (hat-board)
//!         ↓
//! Chip drivers (hat-drivers: ADC, DAC, I/O expander, pressure sensor)
//!         ↓
//! Platform (this crate - SmBus, RegisterDevice, errors)
//!         ↓
//! embedded-hal I2C implementation (Linux i2cdev, MCU HAL, SimBus)
//! ```
//!
//! # Features
//!
//! - `std`: Enable standard library support and the [`mocks`] simulator
//! - `defmt`: Enable defmt logging and `defmt::Format` derives
//! - `tracing`: Enable tracing logging (host builds)
//!
//! # Example
//!
//! ```no_run
//! use hat_platform::{DeviceAddress, SmBus};
//!
//! fn probe<B: SmBus>(bus: &mut B) -> bool {
//!     let Ok(addr) = DeviceAddress::new(0x40) else { return false };
//!     bus.read_byte(addr.get()).is_ok()
//! }
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
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // callers decide whether to use accessor results
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod address;
pub mod bus;
pub mod config;
pub mod error;
pub mod log;
pub mod mocks;
pub mod register;

pub use address::{DeviceAddress, InvalidAddress};
pub use bus::{SmBus, GENERAL_CALL_ADDR, MAX_ADDR};
pub use error::{Error, Result};
pub use register::{BusError, RegisterDevice, RegisterEntry, RegisterMap};
