//! MCP47CVB24 quad 12-bit DAC driver
//!
//! Each channel has its own reference: the supply, the internal band-gap, or
//! the external VREF pin (buffered or not). The VREF pin voltage is not known
//! to the chip, so those channels start with an unknown reference that the
//! caller supplies with [`Mcp47cvb24::set_channel_reference`].
//!
//! Channel indices are masked to 2 bits and codes saturate at the 12-bit
//! limits; neither is reported as an error.

use hat_platform::config::{round3, DEFAULT_SUPPLY_VOLTAGE};
use hat_platform::{log_debug, DeviceAddress, Error, RegisterDevice, RegisterMap, SmBus};

use super::registers::*;

/// Reference source of one channel (VREF register, 2 bits per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReferenceSource {
    /// `00`: VDD, unbuffered.
    Supply,
    /// `01`: internal band-gap, buffered.
    BandGap,
    /// `10`: VREF pin, unbuffered.
    ExternalUnbuffered,
    /// `11`: VREF pin, buffered.
    ExternalBuffered,
}

impl ReferenceSource {
    /// Decode the 2-bit field of `channel` from a VREF register value.
    pub const fn decode(vref_register: u16, channel: u8) -> Self {
        match (vref_register >> ((channel & CHANNEL_MASK) * 2)) & 0x3 {
            0b00 => Self::Supply,
            0b01 => Self::BandGap,
            0b10 => Self::ExternalUnbuffered,
            _ => Self::ExternalBuffered,
        }
    }

    /// Whether the voltage comes from the VREF pin.
    pub const fn is_external(self) -> bool {
        matches!(self, Self::ExternalUnbuffered | Self::ExternalBuffered)
    }
}

/// One entry of the per-channel reference table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelReference {
    /// Where the reference comes from.
    pub source: ReferenceSource,
    /// Reference voltage; `None` for an external reference not yet supplied.
    pub voltage: Option<f32>,
}

impl ChannelReference {
    fn from_source(source: ReferenceSource, supply_voltage: f32) -> Self {
        let voltage = match source {
            ReferenceSource::Supply => Some(supply_voltage),
            ReferenceSource::BandGap => Some(BAND_GAP_V),
            ReferenceSource::ExternalUnbuffered | ReferenceSource::ExternalBuffered => None,
        };
        Self { source, voltage }
    }

    /// Whether [`Mcp47cvb24::set_channel_reference`] may change this entry.
    pub const fn is_overridable(&self) -> bool {
        self.source.is_external()
    }
}

/// Control register values written by `configure`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DacConfig {
    /// VDD of the chip, used for `Supply` channels (volts).
    pub supply_voltage: f32,
    /// VREF register: reference select, 2 bits per channel.
    pub reference_select: u16,
    /// Power-down register: 2 bits per channel.
    pub power_down: u16,
    /// Gain and status register (gain bits 11:8).
    pub gain: u16,
}

impl Default for DacConfig {
    /// 5 V supply, every channel referenced to VDD, powered, gain 1x.
    fn default() -> Self {
        Self {
            supply_voltage: DEFAULT_SUPPLY_VOLTAGE,
            reference_select: 0x0000,
            power_down: 0x0000,
            gain: 0x0000,
        }
    }
}

/// MCP47CVB24 quad DAC.
pub struct Mcp47cvb24<B> {
    bus: B,
    address: DeviceAddress,
    applied: Option<DacConfig>,
    references: Option<[ChannelReference; CHANNEL_COUNT]>,
}

/// Send the general-call RESET to every MCP47CVB24 on the bus.
pub fn broadcast_reset<B: SmBus>(bus: &mut B) -> Result<(), Error<B::Error>> {
    bus.write_byte(hat_platform::GENERAL_CALL_ADDR, GENERAL_CALL_RESET)
        .map_err(Error::bus)
}

/// Send the general-call WAKE-UP to every MCP47CVB24 on the bus.
pub fn broadcast_wakeup<B: SmBus>(bus: &mut B) -> Result<(), Error<B::Error>> {
    bus.write_byte(hat_platform::GENERAL_CALL_ADDR, GENERAL_CALL_WAKEUP)
        .map_err(Error::bus)
}

impl<B: SmBus> Mcp47cvb24<B> {
    /// Create a driver for the chip at `address`.
    pub fn new(bus: B, address: u8) -> Result<Self, hat_platform::InvalidAddress> {
        Ok(Self {
            bus,
            address: DeviceAddress::new(address)?,
            applied: None,
            references: None,
        })
    }

    /// Release the bus.
    pub fn release(self) -> B {
        self.bus
    }

    /// Control register values applied by the last `configure`.
    pub fn configuration(&self) -> Option<&DacConfig> {
        self.applied.as_ref()
    }

    /// Reference table built by the last `configure`.
    pub fn references(&self) -> Option<&[ChannelReference; CHANNEL_COUNT]> {
        self.references.as_ref()
    }

    /// Write VREF, power-down and gain registers and rebuild the reference table.
    pub fn configure(&mut self, config: DacConfig) -> Result<(), Error<B::Error>> {
        self.write_register(REG_VREF, config.reference_select)
            .map_err(Error::bus)?;
        self.write_register(REG_POWER_DOWN, config.power_down)
            .map_err(Error::bus)?;
        self.write_register(REG_GAIN_STATUS, config.gain)
            .map_err(Error::bus)?;

        let mut table =
            [ChannelReference::from_source(ReferenceSource::Supply, 0.0); CHANNEL_COUNT];
        for (channel, entry) in (0u8..).zip(table.iter_mut()) {
            let source = ReferenceSource::decode(config.reference_select, channel);
            *entry = ChannelReference::from_source(source, config.supply_voltage);
        }
        self.references = Some(table);
        self.applied = Some(config);
        log_debug!(
            "MCP47CVB24 {:#x}: configured, vref select {:#x}",
            self.address.get(),
            config.reference_select
        );
        Ok(())
    }

    /// Power-on bring-up. Same as [`configure`](Self::configure).
    pub fn initialize(&mut self, config: DacConfig) -> Result<(), Error<B::Error>> {
        self.configure(config)
    }

    /// Supply the reference voltage of a channel wired to the VREF pin.
    ///
    /// Channels on the supply or band-gap reference keep their fixed value;
    /// the call is silently ignored for them, as it is before `configure`.
    pub fn set_channel_reference(&mut self, channel: u8, volts: f32) {
        if let Some(entry) = self
            .references
            .as_mut()
            .and_then(|t| t.get_mut(usize::from(channel & CHANNEL_MASK)))
        {
            if entry.is_overridable() {
                entry.voltage = Some(volts);
            }
        }
    }

    /// Reference voltage of `channel`.
    ///
    /// # Errors
    ///
    /// [`Error::NotConfigured`] before `configure`, [`Error::ReferenceUnknown`]
    /// for an external reference that was never supplied.
    pub fn channel_reference(&self, channel: u8) -> Result<f32, Error<B::Error>> {
        let channel = channel & CHANNEL_MASK;
        let table = self.references.as_ref().ok_or(Error::NotConfigured)?;
        table
            .get(usize::from(channel))
            .and_then(|entry| entry.voltage)
            .ok_or(Error::ReferenceUnknown { channel })
    }

    /// Current wiper code of `channel`.
    pub fn raw(&mut self, channel: u8) -> Result<u16, Error<B::Error>> {
        self.read_register(wiper_register(channel))
            .map_err(Error::bus)
    }

    /// Write a wiper code, saturating to `0..=4095`.
    pub fn set_raw(&mut self, channel: u8, value: i32) -> Result<(), Error<B::Error>> {
        let code = u16::try_from(value.clamp(0, i32::from(MAX_CODE))).unwrap_or(MAX_CODE);
        self.write_register(wiper_register(channel), code)
            .map_err(Error::bus)
    }

    /// Output voltage of `channel`, rounded to 3 decimals.
    pub fn voltage(&mut self, channel: u8) -> Result<f32, Error<B::Error>> {
        let lsb = self.channel_reference(channel)? / CODE_SPAN;
        let code = self.raw(channel)?;
        Ok(round3(f32::from(code) * lsb))
    }

    /// Drive `channel` to `volts`, clamped to `0..=Vref`.
    ///
    /// The code is rounded to the nearest LSB; full scale saturates at 4095.
    pub fn set_voltage(&mut self, channel: u8, volts: f32) -> Result<(), Error<B::Error>> {
        let vref = self.channel_reference(channel)?;
        let lsb = vref / CODE_SPAN;
        let clamped = volts.max(0.0).min(vref);
        #[allow(clippy::cast_possible_truncation)]
        let code = micromath::F32(clamped / lsb).round().0 as i32;
        self.set_raw(channel, code)
    }
}

impl<B: SmBus> RegisterDevice for Mcp47cvb24<B> {
    type Bus = B;
    type Word = u16;

    fn address(&self) -> DeviceAddress {
        self.address
    }

    fn register_map(&self) -> &RegisterMap {
        &MCP47CVB24_MAP
    }

    fn read_register(&mut self, offset: u8) -> Result<u16, B::Error> {
        let mut data = [0u8; 2];
        self.bus
            .read_block(self.address.get(), read_command(offset), &mut data)?;
        Ok(u16::from_be_bytes(data))
    }

    fn write_register(&mut self, offset: u8, value: u16) -> Result<(), B::Error> {
        self.bus
            .write_block(self.address.get(), write_command(offset), &value.to_be_bytes())
    }
}
