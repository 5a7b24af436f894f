//! Board configuration and timing constants
//!
//! Central values used across the driver crates. Drivers reference these
//! rather than hardcoding timings.

use embassy_time::Duration;

/// Board name used in discovery logs.
pub const BOARD_NAME: &str = "VK-HAT ADC+DAC+PIO";

/// Default DRDY timeout for one ADC conversion.
pub const DEFAULT_CONVERSION_TIMEOUT: Duration = Duration::from_millis(500);

/// Input multiplexer settling time after an ADC channel switch.
pub const MUX_SETTLE_TIME_MS: u32 = 60;

/// Pause between two DRDY polls, keeps the poll loop off the bus.
pub const DRDY_POLL_INTERVAL_US: u32 = 100;

/// Default analog supply voltage of the board (volts).
pub const DEFAULT_SUPPLY_VOLTAGE: f32 = 5.0;

/// Round `value` to 3 decimal places (millivolt / milli-unit resolution).
#[must_use]
pub fn round3(value: f32) -> f32 {
    micromath::F32(value * 1000.0).round().0 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round3_rounds_to_millis() {
        assert!((round3(1.2346) - 1.235).abs() < 1e-6);
        assert!((round3(-1.2346) + 1.235).abs() < 1e-6);
        assert!((round3(2.0004) - 2.0).abs() < 1e-6);
        assert!((round3(0.1) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn default_timeout_is_half_a_second() {
        assert_eq!(DEFAULT_CONVERSION_TIMEOUT.as_millis(), 500);
    }
}
