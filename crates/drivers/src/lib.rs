//! Chip drivers for the VK-HAT ADC+DAC+PIO expansion board
//!
//! Each driver owns a bus handle implementing [`hat_platform::SmBus`]. To put
//! several chips on one bus, hand each driver an
//! `embedded_hal_bus::i2c::RefCellDevice` over the same `RefCell<I2C>`.
//!
//! | Module       | Chip                  | Addresses              |
//! |--------------|-----------------------|------------------------|
//! | [`adc`]      | ADS122C04             | 0x40, 0x41, 0x44, 0x45 |
//! | [`dac`]      | MCP47CVB24            | 0x60-0x63              |
//! | [`ioe`]      | PCA9538A / PCAL9538A  | 0x70-0x73              |
//! | [`pressure`] | SDP611                | 0x40                   |
//!
//! # Features
//!
//! - `std`: host builds (enables `hat-platform/std`)
//! - `defmt`: defmt logging and `defmt::Format` derives
//! - `tracing`: tracing logging

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
#![warn(clippy::print_stdout)]
#![allow(clippy::doc_markdown)] // chip names and register names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::wildcard_imports)] // `use super::registers::*` in each driver

pub mod adc;
pub mod dac;
pub mod ioe;
pub mod pressure;

pub use adc::{decode_conversion, Ads122c04, AdcConfig};
pub use dac::{DacConfig, Mcp47cvb24};
pub use ioe::{IoExpander, Pca9538a, Pcal9538a};
pub use pressure::{PressureUnit, Sdp611};
