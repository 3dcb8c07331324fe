// crates/canopen-od/src/od/value.rs
// Typed view over the raw bytes the access paths move around.

use super::{ObjectDictionary, SdoAbortCode};
use crate::common::{TimeDifference, TimeOfDay, time_from_bytes, time_to_bytes};
use crate::types::DataType;
use alloc::{string::String, vec, vec::Vec};
use core::convert::TryInto;

/// Represents any value that can be stored in an Object Dictionary entry.
///
/// The 24/40/48/56-bit integer types are carried in the 64-bit variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectValue {
    Boolean(bool),
    Integer8(i8),
    Integer16(i16),
    Integer32(i32),
    Integer64(i64),
    Unsigned8(u8),
    Unsigned16(u16),
    Unsigned32(u32),
    Unsigned64(u64),
    Real32(f32),
    Real64(f64),
    VisibleString(String),
    OctetString(Vec<u8>),
    UnicodeString(Vec<u16>),
    Domain(Vec<u8>),
    TimeOfDay(TimeOfDay),
    TimeDifference(TimeDifference),
}

impl ObjectValue {
    /// Decodes bytes as produced by a native-order read of an entry of
    /// type `data_type`.
    ///
    /// Types that are never byte-swapped (strings, time, domain) are stored
    /// in their little-endian wire layout and decoded as such.
    pub fn decode(data_type: DataType, data: &[u8]) -> Result<ObjectValue, SdoAbortCode> {
        // Helper macro to handle fixed-size deserialization
        macro_rules! decode_fixed {
            ($variant:path, $type:ty) => {{
                let bytes: [u8; core::mem::size_of::<$type>()] = data
                    .try_into()
                    .map_err(|_| SdoAbortCode::LengthDataInvalid)?;
                Ok($variant(<$type>::from_ne_bytes(bytes)))
            }};
        }

        if let Some(width) = data_type.fixed_size() {
            if data.len() != width {
                return Err(SdoAbortCode::LengthDataInvalid);
            }
        }

        match data_type {
            DataType::Boolean => Ok(ObjectValue::Boolean(data[0] != 0)),
            DataType::Integer8 => decode_fixed!(ObjectValue::Integer8, i8),
            DataType::Integer16 => decode_fixed!(ObjectValue::Integer16, i16),
            DataType::Integer32 => decode_fixed!(ObjectValue::Integer32, i32),
            DataType::Integer64 => decode_fixed!(ObjectValue::Integer64, i64),
            DataType::Unsigned8 => decode_fixed!(ObjectValue::Unsigned8, u8),
            DataType::Unsigned16 => decode_fixed!(ObjectValue::Unsigned16, u16),
            DataType::Unsigned32 => decode_fixed!(ObjectValue::Unsigned32, u32),
            DataType::Unsigned64 => decode_fixed!(ObjectValue::Unsigned64, u64),
            DataType::Real32 => decode_fixed!(ObjectValue::Real32, f32),
            DataType::Real64 => decode_fixed!(ObjectValue::Real64, f64),
            DataType::Integer24
            | DataType::Integer40
            | DataType::Integer48
            | DataType::Integer56 => {
                let shift = 64 - 8 * data.len() as u32;
                // Sign-extend from the top bit of the narrow value.
                let value = ((uint_from_native(data) << shift) as i64) >> shift;
                Ok(ObjectValue::Integer64(value))
            }
            DataType::Unsigned24
            | DataType::Unsigned40
            | DataType::Unsigned48
            | DataType::Unsigned56 => Ok(ObjectValue::Unsigned64(uint_from_native(data))),
            DataType::VisibleString => Ok(ObjectValue::VisibleString(
                String::from_utf8(data.to_vec()).map_err(|_| SdoAbortCode::LengthDataInvalid)?,
            )),
            DataType::OctetString => Ok(ObjectValue::OctetString(data.to_vec())),
            DataType::Domain => Ok(ObjectValue::Domain(data.to_vec())),
            DataType::UnicodeString => {
                if data.len() % 2 != 0 {
                    return Err(SdoAbortCode::LengthDataInvalid);
                }
                Ok(ObjectValue::UnicodeString(
                    data.chunks_exact(2)
                        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                        .collect(),
                ))
            }
            DataType::TimeOfDay => {
                let (ms, days) = time_from_bytes(data).ok_or(SdoAbortCode::LengthDataInvalid)?;
                Ok(ObjectValue::TimeOfDay(TimeOfDay { ms, days }))
            }
            DataType::TimeDifference => {
                let (ms, days) = time_from_bytes(data).ok_or(SdoAbortCode::LengthDataInvalid)?;
                Ok(ObjectValue::TimeDifference(TimeDifference { ms, days }))
            }
        }
    }

    /// Encodes the value for a native-order write to an entry of type
    /// `data_type`.
    ///
    /// Fails with `LengthDataInvalid` if the variant does not fit the type,
    /// and with `ValueTooLow`/`ValueTooHigh` if a 64-bit carrier holds a
    /// value outside a narrower integer type.
    pub fn encode(&self, data_type: DataType) -> Result<Vec<u8>, SdoAbortCode> {
        let width = data_type.fixed_size().unwrap_or(0);
        Ok(match (self, data_type) {
            (ObjectValue::Boolean(v), DataType::Boolean) => vec![*v as u8],
            (ObjectValue::Integer8(v), DataType::Integer8) => v.to_ne_bytes().to_vec(),
            (ObjectValue::Integer16(v), DataType::Integer16) => v.to_ne_bytes().to_vec(),
            (ObjectValue::Integer32(v), DataType::Integer32) => v.to_ne_bytes().to_vec(),
            (ObjectValue::Integer64(v), DataType::Integer64) => v.to_ne_bytes().to_vec(),
            (ObjectValue::Unsigned8(v), DataType::Unsigned8) => v.to_ne_bytes().to_vec(),
            (ObjectValue::Unsigned16(v), DataType::Unsigned16) => v.to_ne_bytes().to_vec(),
            (ObjectValue::Unsigned32(v), DataType::Unsigned32) => v.to_ne_bytes().to_vec(),
            (ObjectValue::Unsigned64(v), DataType::Unsigned64) => v.to_ne_bytes().to_vec(),
            (ObjectValue::Real32(v), DataType::Real32) => v.to_ne_bytes().to_vec(),
            (ObjectValue::Real64(v), DataType::Real64) => v.to_ne_bytes().to_vec(),
            (
                ObjectValue::Integer64(v),
                DataType::Integer24 | DataType::Integer40 | DataType::Integer48 | DataType::Integer56,
            ) => {
                let bits = 8 * width as u32;
                let min = -(1i64 << (bits - 1));
                let max = (1i64 << (bits - 1)) - 1;
                if *v < min {
                    return Err(SdoAbortCode::ValueTooLow);
                }
                if *v > max {
                    return Err(SdoAbortCode::ValueTooHigh);
                }
                uint_to_native(*v as u64, width)
            }
            (
                ObjectValue::Unsigned64(v),
                DataType::Unsigned24
                | DataType::Unsigned40
                | DataType::Unsigned48
                | DataType::Unsigned56,
            ) => {
                if *v >> (8 * width) != 0 {
                    return Err(SdoAbortCode::ValueTooHigh);
                }
                uint_to_native(*v, width)
            }
            // An empty string is written as a lone terminator.
            (ObjectValue::VisibleString(s), DataType::VisibleString) if s.is_empty() => vec![0],
            (ObjectValue::VisibleString(s), DataType::VisibleString) => s.as_bytes().to_vec(),
            (ObjectValue::OctetString(v), DataType::OctetString) => v.clone(),
            (ObjectValue::Domain(v), DataType::Domain) => v.clone(),
            (ObjectValue::UnicodeString(v), DataType::UnicodeString) => {
                v.iter().flat_map(|c| c.to_le_bytes()).collect()
            }
            (ObjectValue::TimeOfDay(t), DataType::TimeOfDay) => time_to_bytes(t.ms, t.days).to_vec(),
            (ObjectValue::TimeDifference(t), DataType::TimeDifference) => {
                time_to_bytes(t.ms, t.days).to_vec()
            }
            _ => return Err(SdoAbortCode::LengthDataInvalid),
        })
    }
}

/// Reads a narrow unsigned integer stored in host byte order.
fn uint_from_native(data: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    if cfg!(target_endian = "little") {
        buf[..data.len()].copy_from_slice(data);
    } else {
        buf[8 - data.len()..].copy_from_slice(data);
    }
    u64::from_ne_bytes(buf)
}

fn uint_to_native(value: u64, width: usize) -> Vec<u8> {
    let bytes = value.to_ne_bytes();
    if cfg!(target_endian = "little") {
        bytes[..width].to_vec()
    } else {
        bytes[8 - width..].to_vec()
    }
}

// Generates checked, typed accessors over the native access paths.
macro_rules! typed_accessors {
    ($($read:ident, $write:ident, $type:ty, $data_type:path;)+) => {
        $(
            pub fn $read(&self, index: u16, sub_index: u8) -> Result<$type, SdoAbortCode> {
                self.expect_type(index, sub_index, $data_type)?;
                let mut buf = [0u8; core::mem::size_of::<$type>()];
                let mut size = buf.len();
                self.read_native(index, sub_index, &mut buf, &mut size, true)?;
                Ok(<$type>::from_ne_bytes(buf))
            }

            pub fn $write(
                &mut self,
                index: u16,
                sub_index: u8,
                value: $type,
            ) -> Result<(), SdoAbortCode> {
                self.expect_type(index, sub_index, $data_type)?;
                let bytes = value.to_ne_bytes();
                let mut size = bytes.len();
                self.write_native(index, sub_index, &bytes, &mut size, true)
            }
        )+
    };
}

impl<'a> ObjectDictionary<'a> {
    // --- Start of Type-Safe Accessors ---
    typed_accessors! {
        read_u8, write_u8, u8, DataType::Unsigned8;
        read_u16, write_u16, u16, DataType::Unsigned16;
        read_u32, write_u32, u32, DataType::Unsigned32;
        read_u64, write_u64, u64, DataType::Unsigned64;
        read_i8, write_i8, i8, DataType::Integer8;
        read_i16, write_i16, i16, DataType::Integer16;
        read_i32, write_i32, i32, DataType::Integer32;
        read_i64, write_i64, i64, DataType::Integer64;
    }
    // --- End of Type-Safe Accessors ---

    /// Reads an entry (with access check) and decodes it.
    pub fn read_value(&self, index: u16, sub_index: u8) -> Result<ObjectValue, SdoAbortCode> {
        let entry = self.find_entry(index, sub_index)?;
        let mut buf = vec![0u8; entry.size];
        let mut size = entry.size;
        let data_type = self.read_native(index, sub_index, &mut buf, &mut size, true)?;
        ObjectValue::decode(data_type, &buf[..size])
            .map_err(|code| self.report(index, sub_index, entry.size, size, code))
    }

    /// Encodes `value` for the entry's type and writes it (with access
    /// check). Callbacks and persistence run as for any other write.
    pub fn write_value(
        &mut self,
        index: u16,
        sub_index: u8,
        value: &ObjectValue,
    ) -> Result<(), SdoAbortCode> {
        let entry = self.find_entry(index, sub_index)?;
        let bytes = value
            .encode(entry.data_type)
            .map_err(|code| self.report(index, sub_index, entry.size, 0, code))?;
        let mut size = bytes.len();
        self.write_native(index, sub_index, &bytes, &mut size, true)
    }

    fn expect_type(&self, index: u16, sub_index: u8, expected: DataType) -> Result<(), SdoAbortCode> {
        let entry = self.find_entry(index, sub_index)?;
        if entry.data_type != expected {
            return Err(self.report(
                index,
                sub_index,
                entry.size,
                expected.fixed_size().unwrap_or(0),
                SdoAbortCode::LengthDataInvalid,
            ));
        }
        Ok(())
    }
}
