//! SDP611 differential pressure sensor driver
//!
//! Every read returns `[MSB, LSB, CRC]`. When CRC checking is enabled a
//! corrupted frame reads as zero rather than as an error, so a caller that
//! needs to tell "no pressure" from "bad frame" should compare against a
//! second sample.
//!
//! The first measurement after a [`soft_reset`](Sdp611::soft_reset) is not
//! valid; the driver does not discard it.

use core::fmt;
use core::str::FromStr;

use hat_platform::config::round3;
use hat_platform::{
    log_debug, log_warn, DeviceAddress, Error, InvalidAddress, RegisterDevice, RegisterEntry,
    RegisterMap, SmBus,
};
use thiserror_no_std::Error as ThisError;

use super::crc::check_crc8;

/// Fixed bus address of the SDP6x0 family.
pub const SDP611_ADDRESS: u8 = 0x40;

/// Trigger a differential pressure measurement (hold master).
pub const CMD_TRIGGER_MEASUREMENT: u8 = 0xF1;
/// Write the advanced user register.
pub const CMD_WRITE_ADVANCED_USER: u8 = 0xE4;
/// Read the advanced user register.
pub const CMD_READ_ADVANCED_USER: u8 = 0xE5;
/// Soft reset.
pub const CMD_SOFT_RESET: u8 = 0xFE;

/// Lowest and highest selectable resolution (bits).
pub const RESOLUTION_RANGE: core::ops::RangeInclusive<u8> = 9..=16;

/// Advanced user register bits that stay fixed when the resolution is
/// written (high byte; resolution lives in bits 3:1).
const ADVANCED_USER_HIGH: u8 = 0x71;
/// Advanced user register low byte.
const ADVANCED_USER_LOW: u8 = 0x82;

/// Register map.
pub const SDP611_MAP: RegisterMap = RegisterMap::new(&[
    RegisterEntry::new("WAU", CMD_WRITE_ADVANCED_USER),
    RegisterEntry::new("RAU", CMD_READ_ADVANCED_USER),
]);

/// Unit for differential pressure readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressureUnit {
    /// Pascal.
    Pa,
    /// Millibar.
    Mbar,
    /// Pound-force per square inch.
    Psi,
    /// Inch of water column.
    InH2O,
}

impl PressureUnit {
    /// Sensor counts per unit (datasheet scale factor, SDP610-125Pa).
    pub const fn scale_factor(self) -> f32 {
        match self {
            Self::Pa => 60.0,
            Self::Mbar => 6_000.0,
            Self::Psi => 413_686.0,
            Self::InH2O => 14_945.0,
        }
    }

    /// Unit symbol as accepted by [`FromStr`].
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Pa => "Pa",
            Self::Mbar => "mbar",
            Self::Psi => "psi",
            Self::InH2O => "inH2O",
        }
    }
}

impl fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unit string not recognised by [`PressureUnit::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("unknown pressure unit")]
pub struct UnknownUnit;

impl FromStr for PressureUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pa" => Ok(Self::Pa),
            "mbar" => Ok(Self::Mbar),
            "psi" => Ok(Self::Psi),
            "inH2O" => Ok(Self::InH2O),
            _ => Err(UnknownUnit),
        }
    }
}

/// SDP611 differential pressure sensor.
pub struct Sdp611<B> {
    bus: B,
    address: DeviceAddress,
    crc_check: bool,
}

impl<B: SmBus> Sdp611<B> {
    /// Create a driver for the sensor at `address` (normally
    /// [`SDP611_ADDRESS`]). With `crc_check` off every frame is accepted.
    pub fn new(bus: B, address: u8, crc_check: bool) -> Result<Self, InvalidAddress> {
        Ok(Self {
            bus,
            address: DeviceAddress::new(address)?,
            crc_check,
        })
    }

    /// Release the bus.
    pub fn release(self) -> B {
        self.bus
    }

    /// Whether frames are CRC-checked.
    pub fn crc_check(&self) -> bool {
        self.crc_check
    }

    /// Frame validation; always true with CRC checking disabled.
    pub fn check_crc8(&self, frame: [u8; 3]) -> bool {
        !self.crc_check || check_crc8(frame)
    }

    /// Read a `[MSB, LSB, CRC]` frame; `None` when validation fails.
    fn read_frame(&mut self, command: u8) -> Result<Option<[u8; 2]>, B::Error> {
        let mut frame = [0u8; 3];
        self.bus
            .read_block(self.address.get(), command, &mut frame)?;
        let [msb, lsb, _] = frame;
        if self.check_crc8(frame) {
            Ok(Some([msb, lsb]))
        } else {
            log_warn!(
                "SDP611 {:#x}: CRC mismatch on command {:#x}",
                self.address.get(),
                command
            );
            Ok(None)
        }
    }

    /// Issue a soft reset.
    pub fn soft_reset(&mut self) -> Result<(), Error<B::Error>> {
        self.bus
            .write_byte(self.address.get(), CMD_SOFT_RESET)
            .map_err(Error::bus)
    }

    /// One signed measurement in sensor counts; 0 if the frame fails CRC.
    pub fn read_raw(&mut self) -> Result<i16, Error<B::Error>> {
        let word = self
            .read_frame(CMD_TRIGGER_MEASUREMENT)
            .map_err(Error::bus)?;
        Ok(word.map_or(0, i16::from_be_bytes))
    }

    /// Measurement resolution in bits (9-16); 0 if the frame fails CRC.
    pub fn resolution(&mut self) -> Result<u8, Error<B::Error>> {
        let word = self
            .read_frame(CMD_READ_ADVANCED_USER)
            .map_err(Error::bus)?;
        Ok(word.map_or(0, |[msb, _]| {
            RESOLUTION_RANGE.start().saturating_add((msb & 0x0F) >> 1)
        }))
    }

    /// Set the measurement resolution. Values outside 9-16 are ignored.
    pub fn set_resolution(&mut self, bits: u8) -> Result<(), Error<B::Error>> {
        if !RESOLUTION_RANGE.contains(&bits) {
            return Ok(());
        }
        let field = bits.saturating_sub(*RESOLUTION_RANGE.start()) << 1;
        log_debug!("SDP611 {:#x}: resolution {} bits", self.address.get(), bits);
        self.bus
            .write_block(
                self.address.get(),
                CMD_WRITE_ADVANCED_USER,
                &[ADVANCED_USER_HIGH | field, ADVANCED_USER_LOW],
            )
            .map_err(Error::bus)
    }

    /// Differential pressure in `unit`, rounded to 3 decimals.
    pub fn differential_pressure_in(&mut self, unit: PressureUnit) -> Result<f32, Error<B::Error>> {
        let raw = self.read_raw()?;
        Ok(round3(f32::from(raw) / unit.scale_factor()))
    }

    /// Differential pressure in the unit named by `unit` (`"Pa"`, `"mbar"`,
    /// `"psi"`, `"inH2O"`). An unknown unit reads as 0 without a measurement.
    pub fn differential_pressure(&mut self, unit: &str) -> Result<f32, Error<B::Error>> {
        match unit.parse::<PressureUnit>() {
            Ok(unit) => self.differential_pressure_in(unit),
            Err(UnknownUnit) => Ok(0.0),
        }
    }
}

impl<B: SmBus> RegisterDevice for Sdp611<B> {
    type Bus = B;
    type Word = u16;

    fn address(&self) -> DeviceAddress {
        self.address
    }

    fn register_map(&self) -> &RegisterMap {
        &SDP611_MAP
    }

    /// CRC-checked read; a failed frame reads as 0.
    fn read_register(&mut self, offset: u8) -> Result<u16, B::Error> {
        Ok(self.read_frame(offset)?.map_or(0, u16::from_be_bytes))
    }

    fn write_register(&mut self, offset: u8, value: u16) -> Result<(), B::Error> {
        self.bus
            .write_block(self.address.get(), offset, &value.to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = SDP611_ADDRESS;

    #[test]
    fn unit_strings_parse() {
        assert_eq!("Pa".parse::<PressureUnit>(), Ok(PressureUnit::Pa));
        assert_eq!("mbar".parse::<PressureUnit>(), Ok(PressureUnit::Mbar));
        assert_eq!("psi".parse::<PressureUnit>(), Ok(PressureUnit::Psi));
        assert_eq!("inH2O".parse::<PressureUnit>(), Ok(PressureUnit::InH2O));
        assert_eq!("kPa".parse::<PressureUnit>(), Err(UnknownUnit));
        assert_eq!(PressureUnit::InH2O.to_string(), "inH2O");
    }

    #[test]
    fn raw_read_sign_extends() {
        // -500 = 0xFE0C, CRC 0x08
        let expectations = [I2cTransaction::write_read(ADDR, vec![0xF1], vec![0xFE, 0x0C, 0x08])];
        let mut sensor = Sdp611::new(I2cMock::new(&expectations), ADDR, true).unwrap();
        assert_eq!(sensor.read_raw().unwrap(), -500);
        sensor.release().done();
    }

    #[test]
    fn crc_failure_reads_as_zero() {
        let expectations = [I2cTransaction::write_read(ADDR, vec![0xF1], vec![0x02, 0x58, 0x00])];
        let mut sensor = Sdp611::new(I2cMock::new(&expectations), ADDR, true).unwrap();
        assert_eq!(sensor.read_raw().unwrap(), 0);
        sensor.release().done();
    }

    #[test]
    fn disabled_crc_accepts_any_frame() {
        let expectations = [I2cTransaction::write_read(ADDR, vec![0xF1], vec![0x02, 0x58, 0x00])];
        let mut sensor = Sdp611::new(I2cMock::new(&expectations), ADDR, false).unwrap();
        assert!(sensor.check_crc8([0, 0, 0xAA]));
        assert_eq!(sensor.read_raw().unwrap(), 600);
        sensor.release().done();
    }

    #[test]
    fn resolution_decodes_msb_bits_3_to_1() {
        // 0x7782: bits 3:1 of 0x77 are 011, so 9 + 3 = 12.
        let expectations = [I2cTransaction::write_read(ADDR, vec![0xE5], vec![0x77, 0x82, 0x8D])];
        let mut sensor = Sdp611::new(I2cMock::new(&expectations), ADDR, true).unwrap();
        assert_eq!(sensor.resolution().unwrap(), 12);
        sensor.release().done();
    }

    #[test]
    fn set_resolution_encodes_and_ignores_out_of_range() {
        let expectations = [
            I2cTransaction::transaction_start(ADDR),
            I2cTransaction::write(ADDR, vec![0xE4]),
            I2cTransaction::write(ADDR, vec![0x77, 0x82]),
            I2cTransaction::transaction_end(ADDR),
            I2cTransaction::transaction_start(ADDR),
            I2cTransaction::write(ADDR, vec![0xE4]),
            I2cTransaction::write(ADDR, vec![0x7F, 0x82]),
            I2cTransaction::transaction_end(ADDR),
        ];
        let mut sensor = Sdp611::new(I2cMock::new(&expectations), ADDR, true).unwrap();
        sensor.set_resolution(8).unwrap();
        sensor.set_resolution(12).unwrap();
        sensor.set_resolution(16).unwrap();
        sensor.set_resolution(17).unwrap();
        sensor.release().done();
    }

    #[test]
    fn pressure_is_scaled_and_rounded() {
        let expectations = [
            I2cTransaction::write_read(ADDR, vec![0xF1], vec![0x02, 0x58, 0x1E]),
            I2cTransaction::write_read(ADDR, vec![0xF1], vec![0x02, 0x58, 0x1E]),
        ];
        let mut sensor = Sdp611::new(I2cMock::new(&expectations), ADDR, true).unwrap();
        let mbar = sensor.differential_pressure("mbar").unwrap();
        assert!((mbar - 0.1).abs() < 1e-6);
        let pa = sensor.differential_pressure_in(PressureUnit::Pa).unwrap();
        assert!((pa - 10.0).abs() < 1e-6);
        // Unknown unit: no bus traffic, reads as zero.
        assert_eq!(sensor.differential_pressure("bar").unwrap(), 0.0);
        sensor.release().done();
    }

    #[test]
    fn soft_reset_sends_fe() {
        let expectations = [I2cTransaction::write(ADDR, vec![0xFE])];
        let mut sensor = Sdp611::new(I2cMock::new(&expectations), ADDR, true).unwrap();
        sensor.soft_reset().unwrap();
        sensor.release().done();
    }
}
