#![cfg_attr(not(feature = "std"), no_std)]

// 'alloc' is used for the callback registry and the owned value types
extern crate alloc;

// --- Foundation Modules ---
pub mod types;
pub mod hal;
pub mod common;
pub mod log;

// --- Object Dictionary ---
pub mod od;

// --- Top-level Exports ---
pub use types::{ByteOrder, DataType};
pub use hal::{Dictionary, SubindexStore};
pub use common::{TimeDifference, TimeOfDay};
pub use od::{
    AccessConfig, AccessFailure, AccessObserver, AccessType, IndexTable, LoggingObserver,
    NoOpObserver, ObjectDictionary, ObjectValue, SdoAbortCode, Subindex,
};
