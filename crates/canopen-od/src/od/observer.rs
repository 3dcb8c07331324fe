// crates/canopen-od/src/od/observer.rs
use super::SdoAbortCode;
use crate::log::{ObjectContext, my_warn};

/// Describes one failed Object Dictionary access.
///
/// `declared_size` and `given_size` are 0 when they are not known at the
/// point of failure (e.g. the index could not be resolved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessFailure {
    pub index: u16,
    pub sub_index: u8,
    pub declared_size: usize,
    pub given_size: usize,
    pub code: SdoAbortCode,
}

/// A trait that defines how failed accesses are reported.
///
/// Observers are purely diagnostic: they cannot change the outcome of the
/// access that triggered them.
pub trait AccessObserver {
    fn access_failed(&self, failure: &AccessFailure);
}

/// A `no_std` compatible observer that does nothing.
pub struct NoOpObserver;
impl AccessObserver for NoOpObserver {
    fn access_failed(&self, _failure: &AccessFailure) {}
}

/// An observer that logs all failures using the `log` facade.
pub struct LoggingObserver;
impl AccessObserver for LoggingObserver {
    fn access_failed(&self, failure: &AccessFailure) {
        let ctx = ObjectContext::new(failure.index, failure.sub_index);
        match failure.code {
            SdoAbortCode::NoSuchObject => my_warn!(ctx, "Index not found"),
            SdoAbortCode::NoSuchSubindex => my_warn!(ctx, "SubIndex not found"),
            SdoAbortCode::WriteNotAllowed => {
                my_warn!(ctx, "Write not allowed, data is read only")
            }
            SdoAbortCode::ReadNotAllowed => {
                my_warn!(ctx, "Read not allowed, data is write only")
            }
            SdoAbortCode::LengthDataInvalid | SdoAbortCode::OutOfMemory => my_warn!(
                ctx,
                "Conflict size data. Should be {} bytes, but {} bytes were given",
                failure.declared_size,
                failure.given_size
            ),
            SdoAbortCode::NotMappable => my_warn!(ctx, "Not mappable data in a PDO"),
            SdoAbortCode::ValueTooLow => my_warn!(
                ctx,
                "Value range error: value too low. SDO abort: {:#010x}",
                failure.code.code()
            ),
            SdoAbortCode::ValueTooHigh => my_warn!(
                ctx,
                "Value range error: value too high. SDO abort: {:#010x}",
                failure.code.code()
            ),
            other => my_warn!(ctx, "Access failed: {} ({:#010x})", other, other.code()),
        }
    }
}
