//! SMBus-style bus handle
//!
//! The drivers in this workspace talk to their chips through the handful of
//! SMBus primitives below. Any [`embedded_hal::i2c::I2c`] implementation is
//! an [`SmBus`] via the blanket impl, so a Linux `i2cdev`, an MCU HAL or the
//! host simulator in [`crate::mocks`] can all be handed to a driver.
//!
//! Sharing one physical bus between several drivers is done by the caller,
//! typically with `embedded_hal_bus::i2c::RefCellDevice`.

use embedded_hal::i2c::{I2c, Operation};

/// General-call address used by broadcast commands.
pub const GENERAL_CALL_ADDR: u8 = 0x00;

/// Largest 7-bit address.
pub const MAX_ADDR: u8 = 0x7F;

/// SMBus primitives consumed by the register devices.
pub trait SmBus {
    /// Error type
    type Error: core::fmt::Debug;

    /// Receive a single byte with no command phase (also the existence probe).
    fn read_byte(&mut self, address: u8) -> Result<u8, Self::Error>;

    /// Send a single byte with no command phase.
    fn write_byte(&mut self, address: u8, value: u8) -> Result<(), Self::Error>;

    /// Write `command`, then read `buffer.len()` bytes after a repeated start.
    fn read_block(&mut self, address: u8, command: u8, buffer: &mut [u8])
        -> Result<(), Self::Error>;

    /// Write `command` followed by `data` in one transfer.
    fn write_block(&mut self, address: u8, command: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// SMBus "read byte data".
    fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8];
        self.read_block(address, command, &mut buf)?;
        let [value] = buf;
        Ok(value)
    }

    /// SMBus "write byte data".
    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<(), Self::Error> {
        self.write_block(address, command, &[value])
    }
}

impl<I: I2c> SmBus for I {
    type Error = I::Error;

    fn read_byte(&mut self, address: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8];
        self.read(address, &mut buf)?;
        let [value] = buf;
        Ok(value)
    }

    fn write_byte(&mut self, address: u8, value: u8) -> Result<(), Self::Error> {
        self.write(address, &[value])
    }

    fn read_block(
        &mut self,
        address: u8,
        command: u8,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.write_read(address, &[command], buffer)
    }

    fn write_block(&mut self, address: u8, command: u8, data: &[u8]) -> Result<(), Self::Error> {
        // Adjacent writes are sent back to back without a repeated start.
        self.transaction(address, &mut [Operation::Write(&[command]), Operation::Write(data)])
    }

    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<(), Self::Error> {
        self.write(address, &[command, value])
    }
}
