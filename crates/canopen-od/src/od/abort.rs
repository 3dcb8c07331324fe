// crates/canopen-od/src/od/abort.rs
//! SDO abort codes returned by Object Dictionary accesses.
//!
//! The numeric values cross the wire unchanged inside SDO abort transfers
//! (CiA 301, Table 22), so they must never be renumbered.

use core::fmt;

/// Abort code reported by a failed Object Dictionary access.
///
/// Success is expressed as `Ok(())` by the callers; every variant here is a
/// failure. Codes that a device-specific range check invents are carried
/// verbatim in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdoAbortCode {
    /// Out of memory (0x0504_0005). Also used when a read destination is
    /// smaller than the stored value.
    OutOfMemory,
    /// Unsupported access to an object (0x0601_0000).
    UnsupportedAccess,
    /// Attempt to read a write only object (0x0601_0001).
    ReadNotAllowed,
    /// Attempt to write a read only object (0x0601_0002).
    WriteNotAllowed,
    /// Object does not exist in the object dictionary (0x0602_0000).
    NoSuchObject,
    /// Object cannot be mapped to the PDO (0x0604_0041).
    NotMappable,
    /// Data type does not match, length of service parameter does not match (0x0607_0010).
    LengthDataInvalid,
    /// Sub-index does not exist (0x0609_0011).
    NoSuchSubindex,
    /// Invalid value for parameter (0x0609_0030).
    ValueRangeExceeded,
    /// Value of parameter written too high (0x0609_0031).
    ValueTooHigh,
    /// Value of parameter written too low (0x0609_0032).
    ValueTooLow,
    /// General error (0x0800_0000).
    GeneralError,
    /// Any other abort code, propagated unchanged.
    Other(u32),
}

impl SdoAbortCode {
    /// Returns the 32-bit abort code as transmitted on the wire.
    pub const fn code(self) -> u32 {
        match self {
            Self::OutOfMemory => 0x0504_0005,
            Self::UnsupportedAccess => 0x0601_0000,
            Self::ReadNotAllowed => 0x0601_0001,
            Self::WriteNotAllowed => 0x0601_0002,
            Self::NoSuchObject => 0x0602_0000,
            Self::NotMappable => 0x0604_0041,
            Self::LengthDataInvalid => 0x0607_0010,
            Self::NoSuchSubindex => 0x0609_0011,
            Self::ValueRangeExceeded => 0x0609_0030,
            Self::ValueTooHigh => 0x0609_0031,
            Self::ValueTooLow => 0x0609_0032,
            Self::GeneralError => 0x0800_0000,
            Self::Other(code) => code,
        }
    }

    /// Maps a raw abort code back to its variant.
    ///
    /// Returns `None` for 0, which is the "successful" value and never an
    /// abort.
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => return None,
            0x0504_0005 => Self::OutOfMemory,
            0x0601_0000 => Self::UnsupportedAccess,
            0x0601_0001 => Self::ReadNotAllowed,
            0x0601_0002 => Self::WriteNotAllowed,
            0x0602_0000 => Self::NoSuchObject,
            0x0604_0041 => Self::NotMappable,
            0x0607_0010 => Self::LengthDataInvalid,
            0x0609_0011 => Self::NoSuchSubindex,
            0x0609_0030 => Self::ValueRangeExceeded,
            0x0609_0031 => Self::ValueTooHigh,
            0x0609_0032 => Self::ValueTooLow,
            0x0800_0000 => Self::GeneralError,
            other => Self::Other(other),
        })
    }

    /// Converts a raw status as returned by generated range-check code
    /// (0 = successful) into a `Result`.
    pub fn check(code: u32) -> Result<(), Self> {
        match Self::from_code(code) {
            None => Ok(()),
            Some(abort) => Err(abort),
        }
    }
}

impl From<SdoAbortCode> for u32 {
    fn from(abort: SdoAbortCode) -> Self {
        abort.code()
    }
}

impl fmt::Display for SdoAbortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "Out of memory"),
            Self::UnsupportedAccess => write!(f, "Unsupported access to an object"),
            Self::ReadNotAllowed => write!(f, "Attempt to read a write only object"),
            Self::WriteNotAllowed => write!(f, "Attempt to write a read only object"),
            Self::NoSuchObject => write!(f, "Object does not exist in the object dictionary"),
            Self::NotMappable => write!(f, "Object cannot be mapped to the PDO"),
            Self::LengthDataInvalid => write!(f, "Length of service parameter does not match"),
            Self::NoSuchSubindex => write!(f, "Sub-index does not exist"),
            Self::ValueRangeExceeded => write!(f, "Invalid value for parameter"),
            Self::ValueTooHigh => write!(f, "Value of parameter written too high"),
            Self::ValueTooLow => write!(f, "Value of parameter written too low"),
            Self::GeneralError => write!(f, "General error"),
            Self::Other(code) => write!(f, "SDO abort code {code:#010x}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SdoAbortCode {}
