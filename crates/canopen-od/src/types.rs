use core::convert::TryFrom;
use core::fmt;

/// Object Dictionary data type tags (CiA 301, Table 44).
///
/// The discriminants are the standard data type indices, so a tag can be
/// stored in and recovered from a single byte of generated dictionary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DataType {
    Boolean = 0x01,
    Integer8 = 0x02,
    Integer16 = 0x03,
    Integer32 = 0x04,
    Unsigned8 = 0x05,
    Unsigned16 = 0x06,
    Unsigned32 = 0x07,
    Real32 = 0x08,
    VisibleString = 0x09,
    OctetString = 0x0A,
    UnicodeString = 0x0B,
    TimeOfDay = 0x0C,
    TimeDifference = 0x0D,
    Domain = 0x0F,
    Integer24 = 0x10,
    Real64 = 0x11,
    Integer40 = 0x12,
    Integer48 = 0x13,
    Integer56 = 0x14,
    Integer64 = 0x15,
    Unsigned24 = 0x16,
    Unsigned40 = 0x18,
    Unsigned48 = 0x19,
    Unsigned56 = 0x1A,
    Unsigned64 = 0x1B,
}

impl DataType {
    /// Returns `true` if values of this type change representation between
    /// host and wire byte order.
    ///
    /// Booleans, the string-like types, the time types and domains are
    /// transferred verbatim (the 0x09..=0x0F block of the type table).
    pub fn is_swappable(self) -> bool {
        let code = self as u8;
        code > DataType::Boolean as u8
            && !(DataType::VisibleString as u8..=DataType::Domain as u8).contains(&code)
    }

    /// Returns the fixed encoded width in bytes, or `None` for the
    /// variable-length types whose width comes from the descriptor.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            DataType::Boolean | DataType::Integer8 | DataType::Unsigned8 => Some(1),
            DataType::Integer16 | DataType::Unsigned16 => Some(2),
            DataType::Integer24 | DataType::Unsigned24 => Some(3),
            DataType::Integer32 | DataType::Unsigned32 | DataType::Real32 => Some(4),
            DataType::Integer40 | DataType::Unsigned40 => Some(5),
            DataType::Integer48
            | DataType::Unsigned48
            | DataType::TimeOfDay
            | DataType::TimeDifference => Some(6),
            DataType::Integer56 | DataType::Unsigned56 => Some(7),
            DataType::Integer64 | DataType::Unsigned64 | DataType::Real64 => Some(8),
            DataType::VisibleString
            | DataType::OctetString
            | DataType::UnicodeString
            | DataType::Domain => None,
        }
    }
}

/// Error type for an unknown data type tag.
#[derive(Debug, PartialEq, Eq)]
pub struct InvalidDataTypeError(pub u8);

impl fmt::Display for InvalidDataTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid DataType value: {:#04x}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidDataTypeError {}

impl TryFrom<u8> for DataType {
    type Error = InvalidDataTypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x01 => DataType::Boolean,
            0x02 => DataType::Integer8,
            0x03 => DataType::Integer16,
            0x04 => DataType::Integer32,
            0x05 => DataType::Unsigned8,
            0x06 => DataType::Unsigned16,
            0x07 => DataType::Unsigned32,
            0x08 => DataType::Real32,
            0x09 => DataType::VisibleString,
            0x0A => DataType::OctetString,
            0x0B => DataType::UnicodeString,
            0x0C => DataType::TimeOfDay,
            0x0D => DataType::TimeDifference,
            0x0F => DataType::Domain,
            0x10 => DataType::Integer24,
            0x11 => DataType::Real64,
            0x12 => DataType::Integer40,
            0x13 => DataType::Integer48,
            0x14 => DataType::Integer56,
            0x15 => DataType::Integer64,
            0x16 => DataType::Unsigned24,
            0x18 => DataType::Unsigned40,
            0x19 => DataType::Unsigned48,
            0x1A => DataType::Unsigned56,
            0x1B => DataType::Unsigned64,
            _ => return Err(InvalidDataTypeError(value)),
        })
    }
}

impl From<DataType> for u8 {
    fn from(data_type: DataType) -> Self {
        data_type as u8
    }
}

/// Byte order of multi-byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the host running the stack.
    #[cfg(target_endian = "little")]
    pub const NATIVE: ByteOrder = ByteOrder::Little;
    /// Byte order of the host running the stack.
    #[cfg(target_endian = "big")]
    pub const NATIVE: ByteOrder = ByteOrder::Big;

    /// Returns the opposite byte order.
    pub fn reversed(self) -> ByteOrder {
        match self {
            ByteOrder::Little => ByteOrder::Big,
            ByteOrder::Big => ByteOrder::Little,
        }
    }
}
