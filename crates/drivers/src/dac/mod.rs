//! DAC (Digital-to-Analogue Converter) drivers
//!
//! - `mcp47cvb24`: Microchip MCP47CVB24 quad 12-bit DAC

pub mod mcp47cvb24;
pub mod registers;

pub use mcp47cvb24::{
    broadcast_reset, broadcast_wakeup, ChannelReference, DacConfig, Mcp47cvb24, ReferenceSource,
};
pub use registers::MCP47CVB24_ADDRESSES;

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use hat_platform::Error;

    const ADDR: u8 = 0x60;

    fn block_write(addr: u8, command: u8, data: [u8; 2]) -> [I2cTransaction; 4] {
        [
            I2cTransaction::transaction_start(addr),
            I2cTransaction::write(addr, vec![command]),
            I2cTransaction::write(addr, data.to_vec()),
            I2cTransaction::transaction_end(addr),
        ]
    }

    #[test]
    fn reference_source_decodes_two_bits_per_channel() {
        // ch0=00, ch1=01, ch2=10, ch3=11
        let vref = 0b11_10_01_00;
        assert_eq!(ReferenceSource::decode(vref, 0), ReferenceSource::Supply);
        assert_eq!(ReferenceSource::decode(vref, 1), ReferenceSource::BandGap);
        assert_eq!(ReferenceSource::decode(vref, 2), ReferenceSource::ExternalUnbuffered);
        assert_eq!(ReferenceSource::decode(vref, 3), ReferenceSource::ExternalBuffered);
        assert!(!ReferenceSource::Supply.is_external());
        assert!(ReferenceSource::ExternalBuffered.is_external());
    }

    #[test]
    fn configure_writes_control_registers_in_order() {
        let mut expectations = Vec::new();
        expectations.extend(block_write(ADDR, 0x40, [0x00, 0x01]));
        expectations.extend(block_write(ADDR, 0x48, [0x00, 0x00]));
        expectations.extend(block_write(ADDR, 0x50, [0x00, 0x00]));
        let mut dac = Mcp47cvb24::new(I2cMock::new(&expectations), ADDR).unwrap();
        dac.configure(DacConfig {
            reference_select: 0x0001,
            ..DacConfig::default()
        })
        .unwrap();
        dac.release().done();
    }

    #[test]
    fn raw_read_is_big_endian_word() {
        let expectations = [I2cTransaction::write_read(ADDR, vec![0x0E], vec![0x07, 0xFF])];
        let mut dac = Mcp47cvb24::new(I2cMock::new(&expectations), ADDR).unwrap();
        assert_eq!(dac.raw(1).unwrap(), 0x07FF);
        dac.release().done();
    }

    #[test]
    fn set_raw_saturates_at_both_ends() {
        let mut expectations = Vec::new();
        expectations.extend(block_write(ADDR, 0x00, [0x00, 0x00]));
        expectations.extend(block_write(ADDR, 0x00, [0x0F, 0xFF]));
        let mut dac = Mcp47cvb24::new(I2cMock::new(&expectations), ADDR).unwrap();
        dac.set_raw(0, -5).unwrap();
        dac.set_raw(0, 5000).unwrap();
        dac.release().done();
    }

    #[test]
    fn channel_index_is_masked() {
        let expectations = block_write(ADDR, 0x08, [0x00, 0x10]);
        let mut dac = Mcp47cvb24::new(I2cMock::new(&expectations), ADDR).unwrap();
        // Channel 5 wraps to channel 1.
        dac.set_raw(5, 0x10).unwrap();
        dac.release().done();
    }

    #[test]
    fn voltage_ops_need_a_configuration() {
        let no_traffic: [I2cTransaction; 0] = [];
        let mut dac = Mcp47cvb24::new(I2cMock::new(&no_traffic), ADDR).unwrap();
        assert!(matches!(dac.set_voltage(0, 1.0), Err(Error::NotConfigured)));
        assert!(matches!(dac.voltage(0), Err(Error::NotConfigured)));
        // Ignored, not an error.
        dac.set_channel_reference(0, 2.5);
        assert!(dac.references().is_none());
        dac.release().done();
    }

    #[test]
    fn broadcast_commands_use_general_call_address() {
        let expectations = [
            I2cTransaction::write(0x00, vec![0x06]),
            I2cTransaction::write(0x00, vec![0x0A]),
        ];
        let mut bus = I2cMock::new(&expectations);
        broadcast_reset(&mut bus).unwrap();
        broadcast_wakeup(&mut bus).unwrap();
        bus.done();
    }
}
