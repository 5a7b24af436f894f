//! Bus enumeration for the ADC+DAC+PIO HAT
//!
//! Probes every 7-bit address in ascending order with a one-byte read and
//! classifies each responder by address:
//!
//! | Address     | Classified as                          |
//! |-------------|----------------------------------------|
//! | 0x40-0x45   | ADS122C04 ADC (A0/A1 strapped values)   |
//! | 0x60-0x63   | MCP47CVB24 DAC                         |
//! | 0x70-0x73   | PCAL9538A I/O expander                 |
//! | 0x12        | RAA215300 PMIC (reported only)         |
//! | 0x50-0x57   | 24LC02B EEPROM, one report per run     |
//! | anything else | unknown chip (reported only)         |
//!
//! The EEPROM answers on several consecutive addresses (one per 256-byte
//! block), so those addresses are gathered into a single memory-block
//! report, emitted at the first silent address past the block window or at
//! the end of the scan.

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_hal_bus::i2c::RefCellDevice;
use hat_drivers::adc::{Ads122c04, ADS122C04_ADDRESSES};
use hat_drivers::dac::{Mcp47cvb24, MCP47CVB24_ADDRESSES};
use hat_drivers::ioe::{Pcal9538a, PCA9538A_ADDRESSES};
use hat_platform::config::BOARD_NAME;
use hat_platform::{log_info, log_warn, DeviceAddress, SmBus, MAX_ADDR};

/// Address of the RAA215300 PMIC.
pub const PMIC_ADDRESS: u8 = 0x12;

/// First address of the EEPROM block window.
pub const MEMORY_BLOCK_FIRST: u8 = 0x50;
/// Last address of the EEPROM block window.
pub const MEMORY_BLOCK_LAST: u8 = 0x57;

/// Maximum number of addresses in one memory-block run.
pub const MEMORY_BLOCK_CAPACITY: usize = 8;

/// One family slot: four strap-selectable addresses.
pub const FAMILY_CAPACITY: usize = 4;

/// Every 7-bit address.
pub const DISCOVERY_CAPACITY: usize = 128;

/// Addresses of one memory-block discovery, ascending.
pub type AddressRun = heapless::Vec<u8, MEMORY_BLOCK_CAPACITY>;

/// Bus handle each discovered driver is given.
pub type SharedBus<'a, I2C> = RefCellDevice<'a, I2C>;

/// Classification of a responding address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceKind {
    /// ADS122C04 ADC.
    Adc,
    /// MCP47CVB24 DAC.
    Dac,
    /// PCA9538A / PCAL9538A I/O expander.
    IoExpander,
    /// RAA215300 PMIC.
    Pmic,
    /// 24LC02B EEPROM block run.
    MemoryBlock,
    /// Anything else that answered.
    Unknown,
}

impl DeviceKind {
    /// Classify `address`. Memory-block addresses classify as
    /// [`DeviceKind::MemoryBlock`] even though they are reported per run.
    pub fn classify(address: u8) -> Self {
        if ADS122C04_ADDRESSES.contains(&address) {
            Self::Adc
        } else if MCP47CVB24_ADDRESSES.contains(&address) {
            Self::Dac
        } else if PCA9538A_ADDRESSES.contains(&address) {
            Self::IoExpander
        } else if (MEMORY_BLOCK_FIRST..=MEMORY_BLOCK_LAST).contains(&address) {
            Self::MemoryBlock
        } else if address == PMIC_ADDRESS {
            Self::Pmic
        } else {
            Self::Unknown
        }
    }

    /// Short role name used in discovery logs.
    pub const fn role(self) -> &'static str {
        match self {
            Self::Adc => "ADC",
            Self::Dac => "DAC",
            Self::IoExpander => "PIO",
            Self::Pmic => "PMIC",
            Self::MemoryBlock => "EEPROM",
            Self::Unknown => "chip",
        }
    }

    /// Part number used in discovery logs.
    pub const fn part(self) -> &'static str {
        match self {
            Self::Adc => "ADS122C04",
            Self::Dac => "MCP47CVB24",
            Self::IoExpander => "PCA9538A/PCAL9538A",
            Self::Pmic => "RAA215300",
            Self::MemoryBlock => "24LC02B",
            Self::Unknown => "Unknown",
        }
    }
}

/// One entry of the discovery report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Responding address; the first address of the run for memory blocks.
    pub address: DeviceAddress,
    /// Classification.
    pub kind: DeviceKind,
    /// Every address of the run for memory blocks, empty otherwise.
    pub block: AddressRun,
}

/// Result of a scan: drivers for the chips the board drives plus the full
/// discovery report.
pub struct Board<'a, I2C, D> {
    /// ADCs, ascending address.
    pub adcs: heapless::Vec<Ads122c04<SharedBus<'a, I2C>, D>, FAMILY_CAPACITY>,
    /// DACs, ascending address.
    pub dacs: heapless::Vec<Mcp47cvb24<SharedBus<'a, I2C>>, FAMILY_CAPACITY>,
    /// I/O expanders, ascending address.
    pub ioes: heapless::Vec<Pcal9538a<SharedBus<'a, I2C>>, FAMILY_CAPACITY>,
    /// Everything that answered, in discovery order.
    pub discovered: heapless::Vec<DiscoveredDevice, DISCOVERY_CAPACITY>,
}

impl<I2C, D> Board<'_, I2C, D> {
    fn empty() -> Self {
        Self {
            adcs: heapless::Vec::new(),
            dacs: heapless::Vec::new(),
            ioes: heapless::Vec::new(),
            discovered: heapless::Vec::new(),
        }
    }

    /// Discoveries of `kind`.
    pub fn discovered_of(&self, kind: DeviceKind) -> impl Iterator<Item = &DiscoveredDevice> {
        self.discovered.iter().filter(move |d| d.kind == kind)
    }
}

/// Scans a shared bus and builds a [`Board`].
pub struct BusEnumerator<'a, I2C, D> {
    bus: &'a RefCell<I2C>,
    delay: D,
}

impl<'a, I2C, D> BusEnumerator<'a, I2C, D>
where
    I2C: I2c,
    D: DelayNs + Clone,
{
    /// Enumerator over `bus`. Each discovered ADC gets a clone of `delay`.
    pub fn new(bus: &'a RefCell<I2C>, delay: D) -> Self {
        Self { bus, delay }
    }

    fn probe(&self, address: u8) -> bool {
        RefCellDevice::new(self.bus).read_byte(address).is_ok()
    }

    /// Probe addresses 0-127 and classify every responder.
    ///
    /// Probe failures are the expected answer for empty addresses and are
    /// never reported as errors.
    pub fn scan(&self) -> Board<'a, I2C, D> {
        log_info!("Searching {} chips on the HAT board", BOARD_NAME);
        let mut board = Board::empty();
        let mut pending = AddressRun::new();

        for raw in 0..=MAX_ADDR {
            let Ok(address) = DeviceAddress::new(raw) else {
                continue;
            };
            if !self.probe(raw) {
                if !pending.is_empty() && raw > MEMORY_BLOCK_LAST {
                    flush_memory_block(&mut board, &mut pending);
                }
                continue;
            }

            let kind = DeviceKind::classify(raw);
            if kind == DeviceKind::MemoryBlock {
                // The window is eight addresses wide; the run cannot overflow.
                let _ = pending.push(raw);
                continue;
            }

            self.attach(&mut board, kind, raw);
            log_info!("  Found: {} @ {:#x} ({})", kind.role(), raw, kind.part());
            record(
                &mut board,
                DiscoveredDevice {
                    address,
                    kind,
                    block: AddressRun::new(),
                },
            );
        }

        if !pending.is_empty() {
            flush_memory_block(&mut board, &mut pending);
        }
        board
    }

    fn attach(&self, board: &mut Board<'a, I2C, D>, kind: DeviceKind, raw: u8) {
        let bus = RefCellDevice::new(self.bus);
        let attached = match kind {
            DeviceKind::Adc => Ads122c04::new(bus, raw, self.delay.clone())
                .is_ok_and(|adc| board.adcs.push(adc).is_ok()),
            DeviceKind::Dac => {
                Mcp47cvb24::new(bus, raw).is_ok_and(|dac| board.dacs.push(dac).is_ok())
            }
            DeviceKind::IoExpander => {
                Pcal9538a::new(bus, raw).is_ok_and(|ioe| board.ioes.push(ioe).is_ok())
            }
            DeviceKind::Pmic | DeviceKind::MemoryBlock | DeviceKind::Unknown => true,
        };
        if !attached {
            log_warn!("no driver slot left for {} @ {:#x}", kind.role(), raw);
        }
    }
}

fn record<I2C, D>(board: &mut Board<'_, I2C, D>, device: DiscoveredDevice) {
    if board.discovered.push(device).is_err() {
        log_warn!("discovery report full");
    }
}

fn flush_memory_block<I2C, D>(board: &mut Board<'_, I2C, D>, pending: &mut AddressRun) {
    let run = core::mem::take(pending);
    let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
        return;
    };
    let Ok(address) = DeviceAddress::new(first) else {
        return;
    };
    log_info!(
        "  Found: {} @ {:#x}-{:#x}, {} blocks ({})",
        DeviceKind::MemoryBlock.role(),
        first,
        last,
        run.len(),
        DeviceKind::MemoryBlock.part()
    );
    record(
        board,
        DiscoveredDevice {
            address,
            kind: DeviceKind::MemoryBlock,
            block: run,
        },
    );
}
