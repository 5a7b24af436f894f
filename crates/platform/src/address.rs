//! Validated 7-bit device address.

use thiserror_no_std::Error;

use crate::bus::MAX_ADDR;

/// Error returned when an address is outside the 7-bit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("device address must be in the range 0 - 127, not {value}")]
pub struct InvalidAddress {
    /// The rejected value.
    pub value: i32,
}

/// A 7-bit I2C device address.
///
/// Wraps a `u8` with the invariant `value <= 127`. Constructed once, at
/// driver construction, so register operations never re-check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    /// Lowest valid address.
    pub const MIN: u8 = 0;
    /// Highest valid address.
    pub const MAX: u8 = MAX_ADDR;

    /// Create a `DeviceAddress`, returning an error if `value > 127`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAddress`] if `value > 127`.
    pub const fn new(value: u8) -> Result<Self, InvalidAddress> {
        if value > Self::MAX {
            Err(InvalidAddress {
                value: value as i32,
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Return the raw 7-bit address.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DeviceAddress {
    type Error = InvalidAddress;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<u16> for DeviceAddress {
    type Error = InvalidAddress;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| InvalidAddress {
                value: i32::from(value),
            })
            .and_then(Self::new)
    }
}

impl TryFrom<i32> for DeviceAddress {
    type Error = InvalidAddress;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| InvalidAddress { value })
            .and_then(Self::new)
    }
}

impl From<DeviceAddress> for u8 {
    fn from(addr: DeviceAddress) -> Self {
        addr.0
    }
}

impl core::fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#04X}", self.0)
    }
}
