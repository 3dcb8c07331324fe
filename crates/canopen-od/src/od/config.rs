// crates/canopen-od/src/od/config.rs
//! Runtime configuration of the access layer.

use crate::types::ByteOrder;

/// Settings shared by every access made through one `ObjectDictionary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessConfig {
    /// Byte order of multi-byte values on the bus. CANopen transmits
    /// little-endian (CiA 301, Section 7.1.2). On a little-endian host the
    /// default makes wire and native accesses identical.
    pub wire_order: ByteOrder,
}

impl AccessConfig {
    /// Whether wire-order accesses must reverse the bytes of swappable types.
    pub fn swaps_bytes(&self) -> bool {
        self.wire_order != ByteOrder::NATIVE
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            wire_order: ByteOrder::Little,
        }
    }
}
