//! ADS122C04 driver
//!
//! Conversion state machine:
//!
//! ```text
//! Unconfigured --configure/initialize--> Idle
//! Idle --trigger_and_read--> Converting --DRDY--> DataReady --RDATA--> Idle
//!                                      \--timeout--> Idle (caller retries)
//! ```
//!
//! The DRDY poll is the only bounded wait in the workspace: a busy loop
//! measured against [`embassy_time::Instant`] with a short [`DelayNs`] pause
//! between polls.

use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;
use hat_platform::config::{
    round3, DEFAULT_SUPPLY_VOLTAGE, DRDY_POLL_INTERVAL_US, MUX_SETTLE_TIME_MS,
};
use hat_platform::{log_debug, log_warn, DeviceAddress, Error, RegisterDevice, RegisterMap, SmBus};

use super::registers::*;
use super::decode_conversion;

/// The four configuration bytes of the ADS122C04.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcConfig {
    /// CFG0: MUX[3:0], GAIN[2:0], PGA_BYPASS.
    pub cfg0: u8,
    /// CFG1: DR[2:0], MODE, CM, VREF[1:0], TS.
    pub cfg1: u8,
    /// CFG2: DCNT, CRC[1:0], BCS, IDAC[2:0] (DRDY is read-only).
    pub cfg2: u8,
    /// CFG3: I1MUX[2:0], I2MUX[2:0].
    pub cfg3: u8,
}

impl AdcConfig {
    /// Build from raw bytes.
    pub const fn new(cfg0: u8, cfg1: u8, cfg2: u8, cfg3: u8) -> Self {
        Self {
            cfg0,
            cfg1,
            cfg2,
            cfg3,
        }
    }

    /// Continuous-conversion mode (CM = 1).
    pub const fn is_continuous(&self) -> bool {
        self.cfg1 & CFG1_CONTINUOUS != 0
    }

    /// Internal 2.048 V reference selected (VREF[1:0] = 00).
    pub const fn uses_internal_reference(&self) -> bool {
        self.cfg1 & CFG1_VREF_MASK == 0
    }

    /// Bytes in register order.
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.cfg0, self.cfg1, self.cfg2, self.cfg3]
    }
}

impl Default for AdcConfig {
    /// AINp = AIN0, AINn = AVSS, PGA bypassed, single-shot, AVDD reference.
    fn default() -> Self {
        Self::new(0x81, 0x04, 0x00, 0x00)
    }
}

/// Configuration as last written, with the reference captured at that time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppliedAdcConfig {
    /// Bytes written by `configure`.
    pub config: AdcConfig,
    /// Reference voltage derived from `config.cfg1`.
    pub reference_voltage: f32,
}

/// ADS122C04 24-bit ADC.
pub struct Ads122c04<B, D> {
    bus: B,
    delay: D,
    address: DeviceAddress,
    supply_voltage: f32,
    applied: Option<AppliedAdcConfig>,
}

impl<B: SmBus, D: DelayNs> Ads122c04<B, D> {
    /// Create a driver for the chip at `address`.
    ///
    /// The chip is not touched; call [`initialize`](Self::initialize) or
    /// [`configure`](Self::configure) before converting.
    pub fn new(bus: B, address: u8, delay: D) -> Result<Self, hat_platform::InvalidAddress> {
        Ok(Self {
            bus,
            delay,
            address: DeviceAddress::new(address)?,
            supply_voltage: DEFAULT_SUPPLY_VOLTAGE,
            applied: None,
        })
    }

    /// Release the bus and delay.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// Analog supply voltage used when CFG1 selects a non-internal reference.
    ///
    /// Takes effect at the next `configure`.
    pub fn set_supply_voltage(&mut self, volts: f32) {
        self.supply_voltage = volts;
    }

    /// Configuration applied by the last `configure`, if any.
    pub fn configuration(&self) -> Option<&AppliedAdcConfig> {
        self.applied.as_ref()
    }

    /// Reference voltage captured at `configure` time.
    pub fn reference_voltage(&self) -> Option<f32> {
        self.applied.map(|a| a.reference_voltage)
    }

    fn command(&mut self, command: u8) -> Result<(), Error<B::Error>> {
        self.bus
            .write_byte(self.address.get(), command)
            .map_err(Error::bus)
    }

    /// Issue START/SYNC.
    pub fn start(&mut self) -> Result<(), Error<B::Error>> {
        self.command(CMD_START)
    }

    /// Issue RESET. Registers return to their power-on defaults.
    pub fn reset(&mut self) -> Result<(), Error<B::Error>> {
        self.command(CMD_RESET)
    }

    /// Issue POWERDOWN.
    pub fn power_down(&mut self) -> Result<(), Error<B::Error>> {
        self.command(CMD_POWERDOWN)
    }

    /// Write CFG0..CFG3 in order and capture the reference voltage.
    pub fn configure(&mut self, config: AdcConfig) -> Result<(), Error<B::Error>> {
        for (reg, value) in (REG_CFG0..).zip(config.to_bytes()) {
            self.write_register(reg, value).map_err(Error::bus)?;
        }
        let reference_voltage = if config.uses_internal_reference() {
            INTERNAL_REFERENCE_V
        } else {
            self.supply_voltage
        };
        self.applied = Some(AppliedAdcConfig {
            config,
            reference_voltage,
        });
        log_debug!(
            "ADS122C04 {:#x}: configured, continuous={}",
            self.address.get(),
            config.is_continuous()
        );
        Ok(())
    }

    /// Power-on bring-up: RESET, configure, then START in continuous mode.
    pub fn initialize(&mut self, config: AdcConfig) -> Result<(), Error<B::Error>> {
        self.reset()?;
        self.configure(config)?;
        if config.is_continuous() {
            self.start()?;
        }
        Ok(())
    }

    /// Currently selected input channel (CFG0 bits 5:4).
    pub fn channel(&mut self) -> Result<u8, Error<B::Error>> {
        let cfg0 = self.read_register(REG_CFG0).map_err(Error::bus)?;
        Ok((cfg0 & CFG0_CHANNEL_MASK) >> CFG0_CHANNEL_SHIFT)
    }

    /// Select input channel `channel` (masked to 2 bits), preserving the
    /// other six CFG0 bits.
    pub fn set_channel(&mut self, channel: u8) -> Result<(), Error<B::Error>> {
        let cfg0 = self.read_register(REG_CFG0).map_err(Error::bus)?;
        let field = CFG0_CHANNEL_MASK & (channel << CFG0_CHANNEL_SHIFT);
        let cfg0 = (cfg0 & !CFG0_CHANNEL_MASK) | field;
        self.write_register(REG_CFG0, cfg0).map_err(Error::bus)?;
        if let Some(applied) = self.applied.as_mut() {
            applied.config.cfg0 = cfg0;
        }
        Ok(())
    }

    /// Run one conversion and return the signed 24-bit result.
    ///
    /// In single-shot mode a START is issued first. DRDY is then polled
    /// until set or until more than `timeout` has elapsed.
    ///
    /// # Errors
    ///
    /// [`Error::NotConfigured`] before `configure`, [`Error::ConversionTimeout`]
    /// if DRDY stays low. The driver is idle again after a timeout.
    pub fn trigger_and_read(&mut self, timeout: Duration) -> Result<i32, Error<B::Error>> {
        let applied = self.applied.ok_or(Error::NotConfigured)?;
        if !applied.config.is_continuous() {
            self.start()?;
        }

        let started = Instant::now();
        loop {
            let cfg2 = self.read_register(REG_CFG2).map_err(Error::bus)?;
            if cfg2 & CFG2_DRDY != 0 {
                break;
            }
            if started.elapsed() > timeout {
                log_warn!(
                    "ADS122C04 {:#x}: DRDY timeout after {} ms",
                    self.address.get(),
                    timeout.as_millis()
                );
                return Err(Error::ConversionTimeout {
                    timeout_ms: timeout.as_millis(),
                });
            }
            self.delay.delay_us(DRDY_POLL_INTERVAL_US);
        }

        self.read_data()
    }

    /// Read the last conversion result with RDATA.
    pub fn read_data(&mut self) -> Result<i32, Error<B::Error>> {
        let mut raw = [0u8; 3];
        self.bus
            .read_block(self.address.get(), CMD_RDATA, &mut raw)
            .map_err(Error::bus)?;
        Ok(decode_conversion(raw))
    }

    fn scale(&self, code: i32) -> Result<f32, Error<B::Error>> {
        let vref = self.reference_voltage().ok_or(Error::NotConfigured)?;
        // LSB = (2 · VREF / Gain) / 2^24
        #[allow(clippy::cast_precision_loss)]
        let volts = code as f32 * (2.0 * vref / CODE_SPAN);
        Ok(round3(volts))
    }

    /// One conversion scaled to volts, rounded to 3 decimals.
    pub fn read_voltage(&mut self, timeout: Duration) -> Result<f32, Error<B::Error>> {
        let code = self.trigger_and_read(timeout)?;
        self.scale(code)
    }

    /// Switch to `channel`, wait for the input mux to settle, then convert.
    ///
    /// Fails with [`Error::NotConfigured`] before touching the mux.
    pub fn read_channel_raw(
        &mut self,
        channel: u8,
        timeout: Duration,
    ) -> Result<i32, Error<B::Error>> {
        if self.applied.is_none() {
            return Err(Error::NotConfigured);
        }
        self.set_channel(channel)?;
        self.delay.delay_ms(MUX_SETTLE_TIME_MS);
        self.trigger_and_read(timeout)
    }

    /// [`read_channel_raw`](Self::read_channel_raw) scaled to volts.
    pub fn read_channel_voltage(
        &mut self,
        channel: u8,
        timeout: Duration,
    ) -> Result<f32, Error<B::Error>> {
        let code = self.read_channel_raw(channel, timeout)?;
        self.scale(code)
    }
}

impl<B: SmBus, D: DelayNs> RegisterDevice for Ads122c04<B, D> {
    type Bus = B;
    type Word = u8;

    fn address(&self) -> DeviceAddress {
        self.address
    }

    fn register_map(&self) -> &RegisterMap {
        &ADS122C04_MAP
    }

    fn read_register(&mut self, offset: u8) -> Result<u8, B::Error> {
        self.bus.read_byte_data(self.address.get(), rreg(offset))
    }

    fn write_register(&mut self, offset: u8, value: u8) -> Result<(), B::Error> {
        self.bus.write_byte_data(self.address.get(), wreg(offset), value)
    }
}
