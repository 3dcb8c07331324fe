use core::convert::TryInto;

/// Represents a TIME_OF_DAY value.
/// (CiA 301, Section 7.1.6.5)
///
/// Milliseconds after midnight (28 bits, 4 reserved) followed by the number
/// of days since January 1, 1984.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeOfDay {
    pub ms: u32,
    pub days: u16,
}

/// Represents a TIME_DIFFERENCE value. Same layout as `TimeOfDay`.
/// (CiA 301, Section 7.1.6.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeDifference {
    pub ms: u32,
    pub days: u16,
}

/// Mask of the 28 significant millisecond bits.
const MS_MASK: u32 = 0x0FFF_FFFF;

/// Both time types are stored exactly as transmitted (little-endian).
pub(crate) fn time_to_bytes(ms: u32, days: u16) -> [u8; 6] {
    let mut buf = [0u8; 6];
    buf[0..4].copy_from_slice(&(ms & MS_MASK).to_le_bytes());
    buf[4..6].copy_from_slice(&days.to_le_bytes());
    buf
}

pub(crate) fn time_from_bytes(data: &[u8]) -> Option<(u32, u16)> {
    let ms = u32::from_le_bytes(data.get(0..4)?.try_into().ok()?) & MS_MASK;
    let days = u16::from_le_bytes(data.get(4..6)?.try_into().ok()?);
    Some((ms, days))
}
