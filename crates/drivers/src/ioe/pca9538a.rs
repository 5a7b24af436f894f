//! PCA9538A 8-bit I/O expander
//!
//! Four byte-wide registers addressed by their raw register number. All port
//! behaviour comes from [`IoExpander`](super::IoExpander).

use hat_platform::{DeviceAddress, InvalidAddress, RegisterDevice, RegisterMap, SmBus};

use super::registers::PCA9538A_MAP;
use super::IoExpander;

/// PCA9538A I/O expander.
pub struct Pca9538a<B> {
    bus: B,
    address: DeviceAddress,
}

impl<B: SmBus> Pca9538a<B> {
    /// Create a driver for the chip at `address`.
    pub fn new(bus: B, address: u8) -> Result<Self, InvalidAddress> {
        Ok(Self {
            bus,
            address: DeviceAddress::new(address)?,
        })
    }

    /// Release the bus.
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: SmBus> RegisterDevice for Pca9538a<B> {
    type Bus = B;
    type Word = u8;

    fn address(&self) -> DeviceAddress {
        self.address
    }

    fn register_map(&self) -> &RegisterMap {
        &PCA9538A_MAP
    }

    fn read_register(&mut self, offset: u8) -> Result<u8, B::Error> {
        self.bus.read_byte_data(self.address.get(), offset)
    }

    fn write_register(&mut self, offset: u8, value: u8) -> Result<(), B::Error> {
        self.bus.write_byte_data(self.address.get(), offset, value)
    }
}

impl<B: SmBus> IoExpander for Pca9538a<B> {}
