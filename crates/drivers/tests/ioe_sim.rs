//! PCA9538A / PCAL9538A port behaviour against a simulated register file.
// Test file: unwrap lints are intentional.
#![allow(clippy::unwrap_used)]

use hat_drivers::ioe::{DriveStrength, IoExpander, Pca9538a, Pcal9538a};
use hat_platform::mocks::{BusEvent, RegisterFile, Shared, SimBus, SimDevice};
use hat_platform::RegisterDevice;

const ADDR: u8 = 0x72;

fn pca_with(file: RegisterFile) -> (Shared<RegisterFile>, Pca9538a<SimBus>) {
    let file = Shared::new(file);
    let bus = SimBus::new().with(ADDR, file.clone());
    (file, Pca9538a::new(bus, ADDR).unwrap())
}

fn pcal_with(file: RegisterFile) -> (Shared<RegisterFile>, Pcal9538a<SimBus>) {
    let file = Shared::new(file);
    let bus = SimBus::new().with(ADDR, file.clone());
    (file, Pcal9538a::new(bus, ADDR).unwrap())
}

#[test]
fn set_bit_changes_only_that_bit() {
    let (file, mut ioe) = pca_with(RegisterFile::new().with_registers(&[(0x01, 0b1010_0001)]));
    ioe.set_bit(3).unwrap();
    assert_eq!(file.borrow().get(0x01), 0b1010_1001);
    ioe.clear_bit(7).unwrap();
    assert_eq!(file.borrow().get(0x01), 0b0010_1001);
}

/// Expander whose pins are all outputs: the input port reads back the latch.
struct OutputLoopback(RegisterFile);

impl SimDevice for OutputLoopback {
    fn write(&mut self, bytes: &[u8]) {
        self.0.write(bytes);
        let latch = self.0.get(0x01);
        self.0.set(0x00, latch);
    }

    fn read(&mut self, buffer: &mut [u8]) {
        self.0.read(buffer);
    }
}

#[test]
fn set_bit_reads_back_through_input_port() {
    let file = RegisterFile::new().with_registers(&[(0x00, 0b1010_0001), (0x01, 0b1010_0001)]);
    let bus = SimBus::new().with(ADDR, OutputLoopback(file));
    let mut ioe = Pca9538a::new(bus, ADDR).unwrap();

    let before = ioe.port().unwrap();
    ioe.set_bit(3).unwrap();
    assert_eq!(ioe.bit(3).unwrap(), 1);
    let after = ioe.port().unwrap();
    assert_eq!(before ^ after, 0b0000_1000);
    assert_eq!(after, 0b1010_1001);

    ioe.set_bit(9).unwrap();
    assert_eq!(ioe.port().unwrap(), after);
}

#[test]
fn out_of_range_bit_is_a_silent_no_op() {
    let (file, mut ioe) = pca_with(RegisterFile::new().with_registers(&[(0x01, 0x5A)]));
    ioe.set_bit(9).unwrap();
    ioe.clear_bit(8).unwrap();
    assert_eq!(ioe.bit(12).unwrap(), 0);
    assert_eq!(file.borrow().get(0x01), 0x5A);
    let bus = ioe.release();
    assert!(bus.events().is_empty());
}

#[test]
fn bit_reflects_input_port() {
    let (_file, mut ioe) = pca_with(RegisterFile::new().with_registers(&[(0x00, 0b0100_0000)]));
    assert_eq!(ioe.bit(6).unwrap(), 1);
    assert_eq!(ioe.bit(5).unwrap(), 0);
    assert_eq!(ioe.port().unwrap(), 0b0100_0000);
}

#[test]
fn direction_round_trips() {
    let (file, mut ioe) = pca_with(RegisterFile::new());
    ioe.configure_direction(0xF0).unwrap();
    assert_eq!(file.borrow().get(0x03), 0xF0);
    assert_eq!(ioe.direction().unwrap(), 0xF0);
    ioe.set_polarity_inversion(0x01).unwrap();
    assert_eq!(ioe.polarity_inversion().unwrap(), 0x01);
}

#[test]
fn pullup_then_pulldown_share_enable() {
    let (file, mut ioe) = pcal_with(RegisterFile::new());
    ioe.set_pullup(0x03).unwrap();
    assert_eq!(file.borrow().get(0x44), 0x03);
    assert_eq!(file.borrow().get(0x43), 0x03);

    ioe.set_pulldown(0x01).unwrap();
    assert_eq!(file.borrow().get(0x44), 0x02);
    assert_eq!(file.borrow().get(0x43), 0x03);

    ioe.disable_pull(0x02).unwrap();
    assert_eq!(file.borrow().get(0x43), 0x01);
}

#[test]
fn output_configuration_and_drive() {
    let (file, mut ioe) =
        pcal_with(RegisterFile::new().with_registers(&[(0x40, 0xFF), (0x41, 0xFF)]));
    ioe.set_open_drain_outputs().unwrap();
    assert_eq!(file.borrow().get(0x4F), 0x01);
    ioe.set_push_pull_outputs().unwrap();
    assert_eq!(file.borrow().get(0x4F), 0x00);

    ioe.set_drive_strength(7, DriveStrength::Quarter).unwrap();
    assert_eq!(file.borrow().get(0x41), 0x3F);
    assert_eq!(file.borrow().get(0x40), 0xFF);
}

#[test]
fn interrupts_and_latch() {
    let (file, mut ioe) = pcal_with(RegisterFile::new().with_registers(&[(0x46, 0x10)]));
    ioe.set_interrupt_mask(0xEF).unwrap();
    ioe.set_input_latch(0x10).unwrap();
    assert_eq!(file.borrow().get(0x45), 0xEF);
    assert_eq!(file.borrow().get(0x42), 0x10);
    assert_eq!(ioe.interrupt_status().unwrap(), 0x10);
}

#[test]
fn extended_variant_keeps_base_behaviour() {
    let (file, mut ioe) = pcal_with(RegisterFile::new());
    ioe.set_port(0x81).unwrap();
    ioe.set_bit(1).unwrap();
    assert_eq!(file.borrow().get(0x01), 0x83);

    let map = ioe.register_map();
    for name in ["IN", "OUT", "INVIN", "CFGIO", "PULLUDEN", "CFGOUT"] {
        assert!(map.contains(name), "{name} missing");
    }
    assert_eq!(ioe.read_named("OUT").unwrap(), Some(0x83));
    assert_eq!(ioe.read_named("NOPE").unwrap(), None);
}

#[test]
fn writes_use_raw_register_numbers() {
    let (_file, mut ioe) = pca_with(RegisterFile::new());
    ioe.set_port(0x0F).unwrap();
    let bus = ioe.release();
    assert_eq!(
        bus.events(),
        &[BusEvent::Write {
            address: ADDR,
            bytes: vec![0x01, 0x0F]
        }]
    );
}
