//! Error taxonomy shared by every driver.
//!
//! Only construction errors and the ADC conversion timeout are hard failures
//! of the drivers themselves. Bus errors are passed through untouched.
//! Several paths degrade silently instead of failing (CRC mismatch reads as
//! zero, out-of-range bit indices are ignored, DAC codes saturate); those are
//! documented at each call site and are not represented here.

use thiserror_no_std::Error;

pub use crate::address::InvalidAddress;

/// Driver error, generic over the bus error `E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Bad constructor argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidAddress),

    /// The ADC did not raise DRDY within the caller's timeout.
    #[error("DRDY signal not received within {timeout_ms} ms")]
    ConversionTimeout {
        /// The timeout that expired, in milliseconds.
        timeout_ms: u64,
    },

    /// An operation needed the applied configuration before `configure` ran.
    #[error("device has not been configured")]
    NotConfigured,

    /// A DAC channel uses an external reference whose value was never set.
    #[error("reference voltage of channel {channel} is unknown")]
    ReferenceUnknown {
        /// Channel index (0-3).
        channel: u8,
    },

    /// The underlying bus transaction failed.
    #[error("bus error: {0:?}")]
    Bus(E),
}

impl<E> Error<E> {
    /// Wrap a bus error. Used as `.map_err(Error::bus)`.
    pub fn bus(err: E) -> Self {
        Self::Bus(err)
    }

    /// Whether this is a timeout the caller may retry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ConversionTimeout { .. })
    }
}

/// Result alias used by the driver crates.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn timeout_message_carries_the_timeout() {
        let err: Error<()> = Error::ConversionTimeout { timeout_ms: 500 };
        assert_eq!(err.to_string(), "DRDY signal not received within 500 ms");
        assert!(err.is_timeout());
    }

    #[test]
    fn invalid_address_converts_into_invalid_argument() {
        let err: Error<()> = InvalidAddress { value: 200 }.into();
        assert_eq!(err, Error::InvalidArgument(InvalidAddress { value: 200 }));
        assert!(!err.is_timeout());
    }
}
