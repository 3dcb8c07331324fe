use crate::od::{IndexTable, SdoAbortCode};
use crate::types::DataType;

/// The device-specific Object Dictionary, as seen by the access layer.
///
/// A concrete device (usually generated from an EDS/XDD description)
/// implements this trait to supply its descriptor tables and its value
/// checks. The access layer never caches what `scan_index` returns, so the
/// lookup must be deterministic and free of side effects.
pub trait Dictionary {
    /// Looks up the descriptor table of `index`.
    ///
    /// Returns the abort code to report when the index is absent, normally
    /// `SdoAbortCode::NoSuchObject`. It is propagated unchanged.
    fn scan_index(&self, index: u16) -> Result<&IndexTable, SdoAbortCode>;

    /// Checks a value about to be written, in native byte order.
    ///
    /// Any error aborts the write before storage is touched and is reported
    /// verbatim to the caller. The default accepts every value.
    fn value_range_test(&self, _data_type: DataType, _data: &[u8]) -> Result<(), SdoAbortCode> {
        Ok(())
    }
}

/// A trait for abstracting the non-volatile storage of OD parameters.
///
/// Invoked after every successful write to a sub-index flagged
/// `AccessType::TO_BE_SAVED`. The call is fire-and-forget: the access layer
/// does not wait for, or report, the outcome of the persistence.
pub trait SubindexStore {
    /// Persists the current value of `index`/`sub_index`.
    fn store_subindex(&mut self, index: u16, sub_index: u8);
}

