//! Register-addressed device contract
//!
//! Every chip on the board is a [`RegisterDevice`]: a validated address, a
//! fixed [`RegisterMap`] and a pair of register accessors whose command
//! encoding depends on the chip family.

use crate::address::DeviceAddress;
use crate::bus::SmBus;

/// One named register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterEntry {
    /// Datasheet name, e.g. `"CFG0"`.
    pub name: &'static str,
    /// Register offset.
    pub offset: u8,
}

impl RegisterEntry {
    /// Create an entry.
    pub const fn new(name: &'static str, offset: u8) -> Self {
        Self { name, offset }
    }
}

/// Immutable name → offset table for a device family.
///
/// A map is a base table plus an optional extension table. Extending never
/// removes or shadows a base entry: lookups search the base first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMap {
    base: &'static [RegisterEntry],
    extension: &'static [RegisterEntry],
}

impl RegisterMap {
    /// Map with only base entries.
    pub const fn new(base: &'static [RegisterEntry]) -> Self {
        Self {
            base,
            extension: &[],
        }
    }

    /// Add `extension` entries on top of this map's base entries.
    ///
    /// Any extension already present on `self` is replaced; chip families in
    /// this workspace only ever extend once.
    pub const fn extend(self, extension: &'static [RegisterEntry]) -> Self {
        Self {
            base: self.base,
            extension,
        }
    }

    /// Offset of the register called `name`.
    pub fn offset(&self, name: &str) -> Option<u8> {
        self.iter().find(|e| e.name == name).map(|e| e.offset)
    }

    /// Whether `name` is mapped.
    pub fn contains(&self, name: &str) -> bool {
        self.offset(name).is_some()
    }

    /// All entries, base first.
    pub fn iter(&self) -> impl Iterator<Item = &'static RegisterEntry> {
        self.base.iter().chain(self.extension.iter())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.base.len().saturating_add(self.extension.len())
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bus error type of a [`RegisterDevice`].
pub type BusError<D> = <<D as RegisterDevice>::Bus as SmBus>::Error;

/// Addressable register read/write over a shared bus handle.
pub trait RegisterDevice {
    /// Bus handle the device is driven through.
    type Bus: SmBus;
    /// Register width: `u8` for byte registers, `u16` for word registers.
    type Word: Copy;

    /// The device's validated address.
    fn address(&self) -> DeviceAddress;

    /// The device family's register map.
    fn register_map(&self) -> &RegisterMap;

    /// Read the register at `offset`.
    fn read_register(&mut self, offset: u8)
        -> Result<Self::Word, <Self::Bus as SmBus>::Error>;

    /// Write `value` to the register at `offset`.
    fn write_register(
        &mut self,
        offset: u8,
        value: Self::Word,
    ) -> Result<(), <Self::Bus as SmBus>::Error>;

    /// Read a register by datasheet name; `None` when the name is not mapped.
    fn read_named(
        &mut self,
        name: &str,
    ) -> Result<Option<Self::Word>, <Self::Bus as SmBus>::Error> {
        match self.register_map().offset(name) {
            Some(offset) => self.read_register(offset).map(Some),
            None => Ok(None),
        }
    }
}
