// crates/canopen-od/src/od/entry.rs
use crate::types::DataType;
use alloc::borrow::Cow;
use core::ops::{BitOr, Range};

/// Access rights of a sub-index as a type-safe bitmask.
/// (Reference: CiA 301, Section 7.4.5)
///
/// `READ_WRITE` is the empty mask; `WRITE_ONLY` and `READ_ONLY` restrict the
/// direction and `TO_BE_SAVED` asks for persistence after every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessType(pub u8);

impl AccessType {
    pub const READ_WRITE: Self = Self(0x00);
    pub const WRITE_ONLY: Self = Self(0x01);
    pub const READ_ONLY: Self = Self(0x02);
    pub const TO_BE_SAVED: Self = Self(0x04);

    /// Checks if all of the specified flags are set.
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_read_only(&self) -> bool {
        self.contains(Self::READ_ONLY)
    }

    pub fn is_write_only(&self) -> bool {
        self.contains(Self::WRITE_ONLY)
    }

    pub fn is_stored(&self) -> bool {
        self.contains(Self::TO_BE_SAVED)
    }
}

impl BitOr for AccessType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Describes one addressable value of the Object Dictionary.
///
/// The value itself lives in the storage arena owned by the surrounding
/// device; the descriptor only records where (`offset`) and how many bytes
/// (`size`). For `VisibleString` the size is the maximum capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subindex {
    pub data_type: DataType,
    pub access: AccessType,
    pub size: usize,
    pub offset: usize,
}

impl Subindex {
    pub const fn new(data_type: DataType, access: AccessType, size: usize, offset: usize) -> Self {
        Self {
            data_type,
            access,
            size,
            offset,
        }
    }

    /// The byte range of the storage arena this descriptor refers to, or
    /// `None` if `offset + size` overflows.
    pub fn region(&self) -> Option<Range<usize>> {
        let end = self.offset.checked_add(self.size)?;
        Some(self.offset..end)
    }
}

/// All sub-indices of one Object Dictionary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTable {
    pub index: u16,
    pub subindices: Cow<'static, [Subindex]>,
    /// Whether the index has callback slots. Indices without slots cannot
    /// have write notifications registered.
    pub notify: bool,
}

impl IndexTable {
    /// Builds a table from generated (static) descriptor data.
    pub const fn from_static(index: u16, subindices: &'static [Subindex], notify: bool) -> Self {
        Self {
            index,
            subindices: Cow::Borrowed(subindices),
            notify,
        }
    }

    /// Number of sub-indices, fixed at construction.
    pub fn sub_count(&self) -> usize {
        self.subindices.len()
    }

    pub fn get(&self, sub_index: u8) -> Option<&Subindex> {
        self.subindices.get(sub_index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_access_bitmask() {
        let access = AccessType::READ_ONLY | AccessType::TO_BE_SAVED;
        assert!(access.is_read_only());
        assert!(access.is_stored());
        assert!(!access.is_write_only());

        // Read-write is the empty mask: it restricts nothing.
        assert!(!AccessType::READ_WRITE.is_read_only());
        assert!(!AccessType::READ_WRITE.is_write_only());
    }

    #[test]
    fn test_table_bounds() {
        static SUBS: [Subindex; 2] = [
            Subindex::new(DataType::Unsigned8, AccessType::READ_ONLY, 1, 0),
            Subindex::new(DataType::Unsigned32, AccessType::READ_WRITE, 4, 1),
        ];
        let table = IndexTable::from_static(0x2000, &SUBS, false);
        assert_eq!(table.sub_count(), 2);
        assert_eq!(table.get(1).and_then(|s| s.region()), Some(1..5));
        let huge = Subindex::new(DataType::Unsigned32, AccessType::READ_WRITE, 4, usize::MAX - 1);
        assert_eq!(huge.region(), None);
        assert!(table.get(2).is_none());

        let owned = IndexTable {
            index: 0x2001,
            subindices: Cow::Owned(vec![SUBS[0]]),
            notify: true,
        };
        assert_eq!(owned.sub_count(), 1);
    }
}
