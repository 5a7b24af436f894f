//! PCAL9538A I/O expander with Agile I/O
//!
//! Wraps a [`Pca9538a`] and adds pull resistors, output drive configuration,
//! input latching and interrupt masking. The register map is the base map
//! plus the extension registers at 40h-4Fh.

use hat_platform::{
    log_debug, DeviceAddress, Error, InvalidAddress, RegisterDevice, RegisterMap, SmBus,
};

use super::pca9538a::Pca9538a;
use super::registers::*;
use super::{pin_mask, IoExpander};

/// Output drive strength of one pin (2 bits in DRV0/DRV1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DriveStrength {
    /// 0.25x drive.
    Quarter = 0b00,
    /// 0.5x drive.
    Half = 0b01,
    /// 0.75x drive.
    ThreeQuarters = 0b10,
    /// 1x drive (power-on default).
    Full = 0b11,
}

/// PCAL9538A I/O expander.
pub struct Pcal9538a<B> {
    base: Pca9538a<B>,
}

impl<B: SmBus> Pcal9538a<B> {
    /// Create a driver for the chip at `address`.
    pub fn new(bus: B, address: u8) -> Result<Self, InvalidAddress> {
        Ok(Self {
            base: Pca9538a::new(bus, address)?,
        })
    }

    /// Release the bus.
    pub fn release(self) -> B {
        self.base.release()
    }

    fn update(
        &mut self,
        offset: u8,
        f: impl FnOnce(u8) -> u8,
    ) -> Result<(), Error<B::Error>> {
        let current = self.read_register(offset).map_err(Error::bus)?;
        self.write_register(offset, f(current)).map_err(Error::bus)
    }

    /// Enable pull-ups on every pin whose mask bit is 1.
    ///
    /// Select is written before enable so the pin never glitches through a
    /// pull-down.
    pub fn set_pullup(&mut self, mask: u8) -> Result<(), Error<B::Error>> {
        log_debug!("IOE {:#x}: pull-up {:#x}", self.address().get(), mask);
        self.update(REG_PULL_SELECT, |sel| sel | mask)?;
        self.update(REG_PULL_ENABLE, |en| en | mask)
    }

    /// Enable pull-downs on every pin whose mask bit is 1.
    pub fn set_pulldown(&mut self, mask: u8) -> Result<(), Error<B::Error>> {
        log_debug!("IOE {:#x}: pull-down {:#x}", self.address().get(), mask);
        self.update(REG_PULL_SELECT, |sel| sel & !mask)?;
        self.update(REG_PULL_ENABLE, |en| en | mask)
    }

    /// Disconnect the pull resistor of every pin whose mask bit is 1.
    pub fn disable_pull(&mut self, mask: u8) -> Result<(), Error<B::Error>> {
        self.update(REG_PULL_ENABLE, |en| en & !mask)
    }

    /// Switch the whole output port to open-drain.
    pub fn set_open_drain_outputs(&mut self) -> Result<(), Error<B::Error>> {
        self.write_register(REG_OUTPUT_CONFIG, OUTPUT_OPEN_DRAIN)
            .map_err(Error::bus)
    }

    /// Switch the whole output port to push-pull.
    pub fn set_push_pull_outputs(&mut self) -> Result<(), Error<B::Error>> {
        self.write_register(REG_OUTPUT_CONFIG, OUTPUT_PUSH_PULL)
            .map_err(Error::bus)
    }

    /// Set the drive strength of output `pin`; ignored for pins above 7.
    pub fn set_drive_strength(
        &mut self,
        pin: u8,
        strength: DriveStrength,
    ) -> Result<(), Error<B::Error>> {
        if pin_mask(pin).is_none() {
            return Ok(());
        }
        let (offset, slot) = if pin < 4 {
            (REG_DRIVE0, pin)
        } else {
            (REG_DRIVE1, pin.saturating_sub(4))
        };
        let shift = u32::from(slot).saturating_mul(2);
        let field = 0b11u8.checked_shl(shift).unwrap_or(0);
        let value = (strength as u8).checked_shl(shift).unwrap_or(0);
        self.update(offset, |drv| (drv & !field) | value)
    }

    /// Latch input changes of every pin whose mask bit is 1 until the input
    /// port is read.
    pub fn set_input_latch(&mut self, mask: u8) -> Result<(), Error<B::Error>> {
        self.write_register(REG_INPUT_LATCH, mask)
            .map_err(Error::bus)
    }

    /// Mask the interrupt of every pin whose mask bit is 1.
    pub fn set_interrupt_mask(&mut self, mask: u8) -> Result<(), Error<B::Error>> {
        self.write_register(REG_IRQ_MASK, mask).map_err(Error::bus)
    }

    /// Pins that raised the interrupt.
    pub fn interrupt_status(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(REG_IRQ_STATUS).map_err(Error::bus)
    }
}

impl<B: SmBus> RegisterDevice for Pcal9538a<B> {
    type Bus = B;
    type Word = u8;

    fn address(&self) -> DeviceAddress {
        self.base.address()
    }

    fn register_map(&self) -> &RegisterMap {
        &PCAL9538A_MAP
    }

    fn read_register(&mut self, offset: u8) -> Result<u8, B::Error> {
        self.base.read_register(offset)
    }

    fn write_register(&mut self, offset: u8, value: u8) -> Result<(), B::Error> {
        self.base.write_register(offset, value)
    }
}

impl<B: SmBus> IoExpander for Pcal9538a<B> {}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x71;

    #[test]
    fn pullup_sets_select_then_enable() {
        let expectations = [
            I2cTransaction::write_read(ADDR, vec![0x44], vec![0x00]),
            I2cTransaction::write(ADDR, vec![0x44, 0x0C]),
            I2cTransaction::write_read(ADDR, vec![0x43], vec![0x01]),
            I2cTransaction::write(ADDR, vec![0x43, 0x0D]),
        ];
        let mut ioe = Pcal9538a::new(I2cMock::new(&expectations), ADDR).unwrap();
        ioe.set_pullup(0x0C).unwrap();
        ioe.release().done();
    }

    #[test]
    fn pulldown_clears_select_and_sets_enable() {
        let expectations = [
            I2cTransaction::write_read(ADDR, vec![0x44], vec![0xFF]),
            I2cTransaction::write(ADDR, vec![0x44, 0xF3]),
            I2cTransaction::write_read(ADDR, vec![0x43], vec![0x00]),
            I2cTransaction::write(ADDR, vec![0x43, 0x0C]),
        ];
        let mut ioe = Pcal9538a::new(I2cMock::new(&expectations), ADDR).unwrap();
        ioe.set_pulldown(0x0C).unwrap();
        ioe.release().done();
    }

    #[test]
    fn output_mode_writes_cfgout() {
        let expectations = [
            I2cTransaction::write(ADDR, vec![0x4F, 0x01]),
            I2cTransaction::write(ADDR, vec![0x4F, 0x00]),
        ];
        let mut ioe = Pcal9538a::new(I2cMock::new(&expectations), ADDR).unwrap();
        ioe.set_open_drain_outputs().unwrap();
        ioe.set_push_pull_outputs().unwrap();
        ioe.release().done();
    }

    #[test]
    fn drive_strength_updates_one_field() {
        let expectations = [
            // Pin 5 lives in DRV1 bits 3:2.
            I2cTransaction::write_read(ADDR, vec![0x41], vec![0xFF]),
            I2cTransaction::write(ADDR, vec![0x41, 0xF7]),
            // Pin 0 lives in DRV0 bits 1:0.
            I2cTransaction::write_read(ADDR, vec![0x40], vec![0xFF]),
            I2cTransaction::write(ADDR, vec![0x40, 0xFC]),
        ];
        let mut ioe = Pcal9538a::new(I2cMock::new(&expectations), ADDR).unwrap();
        ioe.set_drive_strength(5, DriveStrength::Half).unwrap();
        ioe.set_drive_strength(0, DriveStrength::Quarter).unwrap();
        ioe.set_drive_strength(8, DriveStrength::Full).unwrap();
        ioe.release().done();
    }

    #[test]
    fn base_port_operations_still_work() {
        let expectations = [
            I2cTransaction::write(ADDR, vec![0x03, 0x0F]),
            I2cTransaction::write_read(ADDR, vec![0x46], vec![0x04]),
        ];
        let mut ioe = Pcal9538a::new(I2cMock::new(&expectations), ADDR).unwrap();
        ioe.configure_direction(0x0F).unwrap();
        assert_eq!(ioe.interrupt_status().unwrap(), 0x04);
        assert!(ioe.register_map().contains("IN"));
        assert!(ioe.register_map().contains("IRQSTS"));
        ioe.release().done();
    }
}
