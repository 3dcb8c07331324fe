// crates/canopen-od/src/od/access.rs
//! Read and write paths of the Object Dictionary.
//!
//! All four public entry points share one read path and one write path and
//! differ only in whether multi-byte values are converted to wire order.
//! Sizes are passed in/out: on input the caller's capacity (read) or data
//! length (write, 0 = "nominal size"); on output the number of bytes
//! produced, or the entry's true size when the access failed on a size
//! mismatch so the caller can retry.

use super::{ObjectDictionary, SdoAbortCode, Subindex};
use crate::log::{ObjectContext, my_debug, my_error, my_trace};
use crate::types::DataType;
use core::ops::Range;

/// Widest value that is ever byte-swapped (64-bit types).
const MAX_SWAP_SIZE: usize = 8;

impl<'a> ObjectDictionary<'a> {
    /// Reads an entry converting it to wire byte order.
    ///
    /// Bytes are only reversed when `AccessConfig::wire_order` differs from
    /// the host order; with the default (little-endian) wire order on a
    /// little-endian host this is the same as `read_native`.
    ///
    /// Returns the data type of the entry; `size` receives the number of
    /// bytes copied into `dest`.
    pub fn read_wire(
        &self,
        index: u16,
        sub_index: u8,
        dest: &mut [u8],
        size: &mut usize,
        check_access: bool,
    ) -> Result<DataType, SdoAbortCode> {
        self.read_entry(index, sub_index, dest, size, check_access, true)
    }

    /// Reads an entry in host byte order.
    pub fn read_native(
        &self,
        index: u16,
        sub_index: u8,
        dest: &mut [u8],
        size: &mut usize,
        check_access: bool,
    ) -> Result<DataType, SdoAbortCode> {
        self.read_entry(index, sub_index, dest, size, check_access, false)
    }

    /// Writes an entry from a wire-order source buffer.
    ///
    /// As for `read_wire`, swappable types are reversed only when
    /// `AccessConfig::wire_order` differs from the host order.
    pub fn write_wire(
        &mut self,
        index: u16,
        sub_index: u8,
        source: &[u8],
        size: &mut usize,
        check_access: bool,
    ) -> Result<(), SdoAbortCode> {
        self.write_entry(index, sub_index, source, size, check_access, true)
    }

    /// Writes an entry from a host-order source buffer.
    pub fn write_native(
        &mut self,
        index: u16,
        sub_index: u8,
        source: &[u8],
        size: &mut usize,
        check_access: bool,
    ) -> Result<(), SdoAbortCode> {
        self.write_entry(index, sub_index, source, size, check_access, false)
    }

    /// The shared read path.
    ///
    /// A `VisibleString` is read up to its terminating zero, bounded by the
    /// requested size (when non-zero) and by its capacity; `size` then holds
    /// the discovered string length. Any other type needs a requested size
    /// and a destination of at least its nominal size, else `OutOfMemory` is
    /// returned with the nominal size in `size`; a request of 0 therefore
    /// only learns the size.
    pub fn read_entry(
        &self,
        index: u16,
        sub_index: u8,
        dest: &mut [u8],
        size: &mut usize,
        check_access: bool,
        endianize: bool,
    ) -> Result<DataType, SdoAbortCode> {
        let ctx = ObjectContext::new(index, sub_index);
        let table = self.scan_index(index)?;
        let entry = self.subindex_of(table, sub_index, *size)?;

        if check_access && entry.access.is_write_only() {
            return Err(self.report(
                index,
                sub_index,
                entry.size,
                *size,
                SdoAbortCode::ReadNotAllowed,
            ));
        }

        let region = self.storage_region(index, sub_index, entry, *size)?;
        let stored = &self.memory[region];

        if entry.data_type == DataType::VisibleString {
            let limit = if *size != 0 {
                (*size).min(entry.size)
            } else {
                entry.size
            };
            let length = stored[..limit]
                .iter()
                .position(|&byte| byte == 0)
                .unwrap_or(limit);
            if dest.len() < length {
                let given = *size;
                *size = entry.size;
                return Err(self.report(
                    index,
                    sub_index,
                    entry.size,
                    given,
                    SdoAbortCode::OutOfMemory,
                ));
            }
            dest[..length].copy_from_slice(&stored[..length]);
            *size = length;
        } else {
            let capacity = (*size).min(dest.len());
            if capacity < entry.size {
                // Too large for the caller's buffer: report the real size.
                let given = *size;
                *size = entry.size;
                return Err(self.report(
                    index,
                    sub_index,
                    entry.size,
                    given,
                    SdoAbortCode::OutOfMemory,
                ));
            }
            let target = &mut dest[..entry.size];
            target.copy_from_slice(stored);
            if endianize && self.swaps(entry.data_type) {
                target.reverse();
            }
            *size = entry.size;
        }

        my_trace!(ctx, "Read {} bytes of {:?}", *size, entry.data_type);
        Ok(entry.data_type)
    }

    /// The shared write path.
    ///
    /// Order of effects: size reconciliation, wire-to-host conversion, range
    /// check, copy into storage, callback, persistence. A failing range
    /// check leaves storage untouched. A failing callback is reported even
    /// though the value has already been stored; the write is not rolled
    /// back.
    pub fn write_entry(
        &mut self,
        index: u16,
        sub_index: u8,
        source: &[u8],
        size: &mut usize,
        check_access: bool,
        endianize: bool,
    ) -> Result<(), SdoAbortCode> {
        let ctx = ObjectContext::new(index, sub_index);
        let table = self.scan_index(index)?;
        let entry = self.subindex_of(table, sub_index, *size)?;

        if check_access && entry.access.is_read_only() {
            return Err(self.report(
                index,
                sub_index,
                entry.size,
                *size,
                SdoAbortCode::WriteNotAllowed,
            ));
        }

        let given = *size;
        // A shorter visible string is always accepted.
        let accepted = given == 0
            || given == entry.size
            || (entry.data_type == DataType::VisibleString && given < entry.size);
        let length = if given == 0 { entry.size } else { given };
        if !accepted || source.len() < length {
            *size = entry.size;
            return Err(self.report(
                index,
                sub_index,
                entry.size,
                given,
                SdoAbortCode::LengthDataInvalid,
            ));
        }
        let source = &source[..length];

        let mut scratch = [0u8; MAX_SWAP_SIZE];
        let data: &[u8] = if endianize && self.swaps(entry.data_type) {
            let Some(swapped) = scratch.get_mut(..length) else {
                my_error!(
                    ctx,
                    "Swappable {:?} declares {} bytes, more than {}",
                    entry.data_type,
                    length,
                    MAX_SWAP_SIZE
                );
                return Err(self.report(
                    index,
                    sub_index,
                    entry.size,
                    given,
                    SdoAbortCode::GeneralError,
                ));
            };
            swapped.copy_from_slice(source);
            swapped.reverse();
            swapped
        } else {
            source
        };

        self.dictionary
            .value_range_test(entry.data_type, data)
            .map_err(|code| self.report(index, sub_index, entry.size, given, code))?;

        let region = self.storage_region(index, sub_index, entry, given)?;
        let stored = &mut self.memory[region];
        stored[..length].copy_from_slice(data);
        if entry.data_type == DataType::VisibleString && length < entry.size {
            stored[length] = 0;
        }
        *size = entry.size;
        my_trace!(ctx, "Wrote {} bytes of {:?}", length, entry.data_type);

        if let Some(callback) = self.callbacks.get(index, sub_index) {
            callback(&mut *self, table, sub_index)
                .map_err(|code| self.report(index, sub_index, entry.size, given, code))?;
        }

        if entry.access.is_stored() {
            my_debug!(ctx, "Requesting persistence");
            if let Some(store) = self.store.as_mut() {
                store.store_subindex(index, sub_index);
            }
        }
        Ok(())
    }

    /// Whether wire-order accesses to `data_type` swap bytes.
    fn swaps(&self, data_type: DataType) -> bool {
        data_type.is_swappable() && self.config.swaps_bytes()
    }

    /// Bounds-checks the storage region of `entry` against the arena.
    fn storage_region(
        &self,
        index: u16,
        sub_index: u8,
        entry: &Subindex,
        given_size: usize,
    ) -> Result<Range<usize>, SdoAbortCode> {
        match entry.region() {
            Some(region) if region.end <= self.memory.len() => Ok(region),
            _ => {
                my_error!(
                    ObjectContext::new(index, sub_index),
                    "Storage region at {} (+{} bytes) lies outside the {}-byte arena",
                    entry.offset,
                    entry.size,
                    self.memory.len()
                );
                Err(self.report(
                    index,
                    sub_index,
                    entry.size,
                    given_size,
                    SdoAbortCode::GeneralError,
                ))
            }
        }
    }
}
