//! Simulated I2C bus for testing
//!
//! [`SimBus`] implements [`embedded_hal::i2c::I2c`], so drivers under test go
//! through the real [`SmBus`](crate::SmBus) framing. Each populated address
//! hosts a [`SimDevice`]; unpopulated addresses NACK. Every transfer is
//! recorded for assertions.

#![cfg(any(test, feature = "std"))]

use std::boxed::Box;
use std::collections::BTreeMap;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

/// Behaviour of one simulated chip.
pub trait SimDevice {
    /// Bytes written in one transfer (adjacent write operations merged).
    fn write(&mut self, bytes: &[u8]);

    /// Fill `buffer` for a read transfer.
    fn read(&mut self, buffer: &mut [u8]);
}

/// One recorded bus transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// Bytes written to `address`.
    Write {
        /// Target address
        address: u8,
        /// Payload
        bytes: Vec<u8>,
    },
    /// `len` bytes read from `address`.
    Read {
        /// Target address
        address: u8,
        /// Number of bytes
        len: usize,
    },
    /// Transfer to an unpopulated address.
    Nack {
        /// Target address
        address: u8,
    },
}

/// Simulated bus hosting [`SimDevice`]s.
#[derive(Default)]
pub struct SimBus {
    devices: BTreeMap<u8, Box<dyn SimDevice>>,
    events: Vec<BusEvent>,
}

impl SimBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `device` at `address`, replacing any existing one.
    pub fn attach(&mut self, address: u8, device: impl SimDevice + 'static) -> &mut Self {
        self.devices.insert(address, Box::new(device));
        self
    }

    /// Builder form of [`SimBus::attach`].
    #[must_use]
    pub fn with(mut self, address: u8, device: impl SimDevice + 'static) -> Self {
        self.attach(address, device);
        self
    }

    /// Remove the device at `address`.
    pub fn detach(&mut self, address: u8) {
        self.devices.remove(&address);
    }

    /// Recorded transfers.
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Payloads written to `address`, in order.
    pub fn writes_to(&self, address: u8) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BusEvent::Write { address: a, bytes } if *a == address => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded transfers.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl ErrorType for SimBus {
    type Error = ErrorKind;
}

impl I2c for SimBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let Some(device) = self.devices.get_mut(&address) else {
            self.events.push(BusEvent::Nack { address });
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        };

        let mut pending: Vec<u8> = Vec::new();
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => pending.extend_from_slice(bytes),
                Operation::Read(buffer) => {
                    if !pending.is_empty() {
                        device.write(&pending);
                        self.events.push(BusEvent::Write {
                            address,
                            bytes: core::mem::take(&mut pending),
                        });
                    }
                    device.read(buffer);
                    self.events.push(BusEvent::Read {
                        address,
                        len: buffer.len(),
                    });
                }
            }
        }
        if !pending.is_empty() {
            device.write(&pending);
            self.events.push(BusEvent::Write {
                address,
                bytes: pending,
            });
        }
        Ok(())
    }
}

/// Plain byte-register chip: `[reg, data..]` writes, pointer-based reads.
///
/// Models the PCA9538A-style command protocol and serves as a generic
/// "something answers here" device for bus scans.
#[derive(Debug, Clone)]
pub struct RegisterFile {
    regs: [u8; 256],
    pointer: u8,
}

impl RegisterFile {
    /// All registers zero.
    pub fn new() -> Self {
        Self {
            regs: [0; 256],
            pointer: 0,
        }
    }

    /// Preset register values.
    #[must_use]
    pub fn with_registers(mut self, values: &[(u8, u8)]) -> Self {
        for &(reg, value) in values {
            self.set(reg, value);
        }
        self
    }

    /// Current value of `reg`.
    pub fn get(&self, reg: u8) -> u8 {
        self.regs.get(usize::from(reg)).copied().unwrap_or(0)
    }

    /// Overwrite `reg`.
    pub fn set(&mut self, reg: u8, value: u8) {
        if let Some(slot) = self.regs.get_mut(usize::from(reg)) {
            *slot = value;
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDevice for RegisterFile {
    fn write(&mut self, bytes: &[u8]) {
        if let Some((&reg, data)) = bytes.split_first() {
            self.pointer = reg;
            let mut target = reg;
            for &b in data {
                self.set(target, b);
                target = target.wrapping_add(1);
            }
        }
    }

    fn read(&mut self, buffer: &mut [u8]) {
        let mut source = self.pointer;
        for b in buffer.iter_mut() {
            *b = self.get(source);
            source = source.wrapping_add(1);
        }
    }
}

/// Device handle shared between the test and the bus.
///
/// Lets a test keep inspecting a device after attaching it.
pub struct Shared<D>(pub std::rc::Rc<core::cell::RefCell<D>>);

impl<D> Shared<D> {
    /// Wrap `device`.
    pub fn new(device: D) -> Self {
        Self(std::rc::Rc::new(core::cell::RefCell::new(device)))
    }

    /// Borrow the device.
    pub fn borrow(&self) -> core::cell::Ref<'_, D> {
        self.0.borrow()
    }

    /// Mutably borrow the device.
    pub fn borrow_mut(&self) -> core::cell::RefMut<'_, D> {
        self.0.borrow_mut()
    }
}

impl<D> Clone for Shared<D> {
    fn clone(&self) -> Self {
        Self(std::rc::Rc::clone(&self.0))
    }
}

impl<D: SimDevice> SimDevice for Shared<D> {
    fn write(&mut self, bytes: &[u8]) {
        self.0.borrow_mut().write(bytes);
    }

    fn read(&mut self, buffer: &mut [u8]) {
        self.0.borrow_mut().read(buffer);
    }
}

/// Delay that returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Delay that records the total requested time without sleeping.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    total_ns: std::rc::Rc<core::cell::Cell<u64>>,
}

impl RecordingDelay {
    /// Total delay requested so far, in nanoseconds.
    pub fn total_ns(&self) -> u64 {
        self.total_ns.get()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get().saturating_add(u64::from(ns)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SmBus;

    #[test]
    fn unpopulated_address_nacks() {
        let mut bus = SimBus::new();
        assert_eq!(
            bus.read_byte(0x33),
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        );
        assert_eq!(bus.events(), &[BusEvent::Nack { address: 0x33 }]);
    }

    #[test]
    fn register_file_round_trips_byte_data() {
        let mut bus = SimBus::new().with(0x70, RegisterFile::new());
        bus.write_byte_data(0x70, 0x01, 0x5A).unwrap();
        assert_eq!(bus.read_byte_data(0x70, 0x01).unwrap(), 0x5A);
    }

    #[test]
    fn block_write_is_merged_into_one_transfer() {
        let file = Shared::new(RegisterFile::new());
        let mut bus = SimBus::new().with(0x60, file.clone());
        bus.write_block(0x60, 0x10, &[0xAA, 0xBB]).unwrap();
        assert_eq!(bus.writes_to(0x60), vec![vec![0x10, 0xAA, 0xBB]]);
        assert_eq!(file.borrow().get(0x11), 0xBB);
    }

    #[test]
    fn recording_delay_sums_requests() {
        let mut delay = RecordingDelay::default();
        let probe = delay.clone();
        delay.delay_ms(60);
        delay.delay_us(100);
        assert_eq!(probe.total_ns(), 60_100_000);
    }
}
