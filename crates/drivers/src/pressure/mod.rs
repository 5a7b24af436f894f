//! Pressure sensor drivers
//!
//! - `sdp611`: Sensirion SDP611 differential pressure sensor
//! - `crc`: CRC-8 shared by Sensirion sensors

pub mod crc;
pub mod sdp611;

pub use crc::{check_crc8, crc8};
pub use sdp611::{PressureUnit, Sdp611, UnknownUnit, SDP611_ADDRESS};
