// crates/canopen-od/tests/device/mod.rs
//! A small simulated device: descriptor tables, a storage arena and
//! recording hooks shared by the integration tests.
#![allow(dead_code)]

use canopen_od::{AccessType, DataType, Dictionary, IndexTable, SdoAbortCode, Subindex, SubindexStore};

use std::cell::RefCell;
use std::rc::Rc;

/// Size of the storage arena backing every index below.
pub const ARENA_SIZE: usize = 88;

/// Largest UNSIGNED32 the device accepts.
pub const U32_LIMIT: u32 = 0x00FF_FFFF;
/// Smallest INTEGER16 the device accepts.
pub const I16_LIMIT: i16 = -1000;

// 0x1000 Device type
pub const DEVICE_TYPE: u16 = 0x1000;
static DEVICE_TYPE_SUBS: [Subindex; 1] = [Subindex::new(
    DataType::Unsigned32,
    AccessType::READ_ONLY,
    4,
    0,
)];

// 0x1008 Manufacturer device name
pub const DEVICE_NAME: u16 = 0x1008;
pub const DEVICE_NAME_OFFSET: usize = 4;
static DEVICE_NAME_SUBS: [Subindex; 1] = [Subindex::new(
    DataType::VisibleString,
    AccessType::READ_ONLY,
    10,
    DEVICE_NAME_OFFSET,
)];

// 0x2000 Application settings, with write notifications
pub const SETTINGS: u16 = 0x2000;
pub const SETTINGS_SAVED_U16: u8 = 1;
pub const SETTINGS_U32: u8 = 2;
pub const SETTINGS_NAME: u8 = 3;
pub const SETTINGS_WRITE_ONLY: u8 = 4;
pub const SETTINGS_NAME_OFFSET: usize = 22;
static SETTINGS_SUBS: [Subindex; 5] = [
    Subindex::new(DataType::Unsigned8, AccessType::READ_ONLY, 1, 14),
    Subindex::new(
        DataType::Unsigned16,
        AccessType(AccessType::READ_WRITE.0 | AccessType::TO_BE_SAVED.0),
        2,
        16,
    ),
    Subindex::new(DataType::Unsigned32, AccessType::READ_WRITE, 4, 18),
    Subindex::new(DataType::VisibleString, AccessType::READ_WRITE, 10, SETTINGS_NAME_OFFSET),
    Subindex::new(DataType::Unsigned32, AccessType::WRITE_ONLY, 4, 32),
];

// 0x2001 One entry per data type category, no notifications
pub const TYPES: u16 = 0x2001;
pub const TYPES_BOOLEAN: u8 = 1;
pub const TYPES_I16: u8 = 2;
pub const TYPES_REAL32: u8 = 3;
pub const TYPES_OCTETS: u8 = 4;
pub const TYPES_TIME: u8 = 5;
pub const TYPES_U64: u8 = 6;
pub const TYPES_I24: u8 = 7;
pub const TYPES_UNICODE: u8 = 8;
pub const TYPES_DOMAIN: u8 = 9;
pub const TYPES_U8: u8 = 10;
pub const TYPES_REAL64: u8 = 11;
static TYPES_SUBS: [Subindex; 12] = [
    Subindex::new(DataType::Unsigned8, AccessType::READ_ONLY, 1, 36),
    Subindex::new(DataType::Boolean, AccessType::READ_WRITE, 1, 37),
    Subindex::new(DataType::Integer16, AccessType::READ_WRITE, 2, 38),
    Subindex::new(DataType::Real32, AccessType::READ_WRITE, 4, 40),
    Subindex::new(DataType::OctetString, AccessType::READ_WRITE, 4, 44),
    Subindex::new(DataType::TimeOfDay, AccessType::READ_WRITE, 6, 48),
    Subindex::new(DataType::Unsigned64, AccessType::READ_WRITE, 8, 54),
    Subindex::new(DataType::Integer24, AccessType::READ_WRITE, 3, 62),
    Subindex::new(DataType::UnicodeString, AccessType::READ_WRITE, 4, 65),
    Subindex::new(DataType::Domain, AccessType::READ_WRITE, 4, 69),
    Subindex::new(DataType::Unsigned8, AccessType::READ_WRITE, 1, 73),
    Subindex::new(DataType::Real64, AccessType::READ_WRITE, 8, 74),
];

static TABLES: [IndexTable; 4] = [
    IndexTable::from_static(DEVICE_TYPE, &DEVICE_TYPE_SUBS, false),
    IndexTable::from_static(DEVICE_NAME, &DEVICE_NAME_SUBS, false),
    IndexTable::from_static(SETTINGS, &SETTINGS_SUBS, true),
    IndexTable::from_static(TYPES, &TYPES_SUBS, false),
];

/// Returns a fresh arena with the constant entries filled in.
pub fn arena() -> [u8; ARENA_SIZE] {
    let mut memory = [0u8; ARENA_SIZE];
    memory[0..4].copy_from_slice(&0x0002_0191u32.to_ne_bytes());
    memory[DEVICE_NAME_OFFSET..DEVICE_NAME_OFFSET + 5].copy_from_slice(b"demo\0");
    memory[14] = 4;
    memory[36] = 11;
    memory
}

/// The device dictionary. Every range check it performs is recorded.
#[derive(Default)]
pub struct TestDevice {
    pub range_checks: RefCell<Vec<(DataType, Vec<u8>)>>,
}

impl TestDevice {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Dictionary for TestDevice {
    fn scan_index(&self, index: u16) -> Result<&IndexTable, SdoAbortCode> {
        TABLES
            .iter()
            .find(|table| table.index == index)
            .ok_or(SdoAbortCode::NoSuchObject)
    }

    fn value_range_test(&self, data_type: DataType, data: &[u8]) -> Result<(), SdoAbortCode> {
        self.range_checks
            .borrow_mut()
            .push((data_type, data.to_vec()));
        match data_type {
            DataType::Unsigned32 => {
                let bytes: [u8; 4] = data.try_into().map_err(|_| SdoAbortCode::GeneralError)?;
                let value = u32::from_ne_bytes(bytes);
                if value > U32_LIMIT {
                    return Err(SdoAbortCode::ValueTooHigh);
                }
            }
            DataType::Integer16 => {
                let bytes: [u8; 2] = data.try_into().map_err(|_| SdoAbortCode::GeneralError)?;
                let value = i16::from_ne_bytes(bytes);
                if value < I16_LIMIT {
                    return Err(SdoAbortCode::ValueTooLow);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Shared, ordered log of what happened during a write.
pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Persistence backend that only records which entries it was asked to save.
pub struct RecordingStore {
    pub events: EventLog,
}

impl SubindexStore for RecordingStore {
    fn store_subindex(&mut self, index: u16, sub_index: u8) {
        self.events
            .borrow_mut()
            .push(format!("store {:04X}/{}", index, sub_index));
    }
}
