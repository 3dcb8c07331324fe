// crates/canopen-od/src/od/mod.rs

mod abort;
mod access;
mod callbacks;
mod config;
mod entry;
mod observer;
mod value;

pub use abort::SdoAbortCode;
pub use callbacks::{CallbackRegistry, OdCallback};
pub use config::AccessConfig;
pub use entry::{AccessType, IndexTable, Subindex};
pub use observer::{AccessFailure, AccessObserver, LoggingObserver, NoOpObserver};
pub use value::ObjectValue;

use crate::hal::{Dictionary, SubindexStore};
use crate::log::{ObjectContext, my_debug};
use core::fmt;

/// The device context every Object Dictionary access goes through.
///
/// It borrows the device's descriptor tables and value storage, owns the
/// registry of write notifications, and holds the optional persistence
/// backend and diagnostic observer. The context performs no locking: it must
/// be used from one execution context at a time, and values that an
/// interrupt handler also updates must be serialized by the application.
pub struct ObjectDictionary<'a> {
    dictionary: &'a dyn Dictionary,
    memory: &'a mut [u8],
    store: Option<&'a mut dyn SubindexStore>,
    observer: &'a dyn AccessObserver,
    callbacks: CallbackRegistry,
    config: AccessConfig,
}

impl<'a> fmt::Debug for ObjectDictionary<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDictionary")
            .field("memory_len", &self.memory.len())
            .field(
                "store",
                &if self.store.is_some() {
                    "Some(<Storage Backend>)"
                } else {
                    "None"
                },
            )
            .field("callbacks", &self.callbacks)
            .field("config", &self.config)
            .finish()
    }
}

/// The result of resolving an index: its descriptor table and, if the index
/// supports write notifications, the callbacks registered so far.
pub struct ResolvedIndex<'a, 'r> {
    pub table: &'a IndexTable,
    slots: Option<&'r [Option<OdCallback>]>,
}

impl<'a, 'r> ResolvedIndex<'a, 'r> {
    /// Whether the index has callback slots at all.
    pub fn has_callback_slots(&self) -> bool {
        self.table.notify
    }

    /// The callback registered for `sub_index`, if any.
    pub fn callback(&self, sub_index: u8) -> Option<&'r OdCallback> {
        self.slots
            .and_then(|slots| slots.get(sub_index as usize))
            .and_then(Option::as_ref)
    }
}

impl<'a> ObjectDictionary<'a> {
    /// Creates a context over a device dictionary and its storage arena.
    ///
    /// Defaults: CANopen (little-endian) wire order, no persistence backend,
    /// no diagnostic observer.
    pub fn new(dictionary: &'a dyn Dictionary, memory: &'a mut [u8]) -> Self {
        Self {
            dictionary,
            memory,
            store: None,
            observer: &NoOpObserver,
            callbacks: CallbackRegistry::new(),
            config: AccessConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AccessConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches the backend invoked for sub-indices flagged `TO_BE_SAVED`.
    pub fn with_store(mut self, store: &'a mut dyn SubindexStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Attaches a diagnostic observer notified of every failed access.
    pub fn with_observer(mut self, observer: &'a dyn AccessObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Read-only view of the whole storage arena.
    pub fn memory(&self) -> &[u8] {
        &*self.memory
    }

    /// Looks up the descriptor table of `index` in the device dictionary.
    ///
    /// No caching is done; callers that need the same index repeatedly
    /// within one operation should keep the returned table.
    pub fn scan_index(&self, index: u16) -> Result<&'a IndexTable, SdoAbortCode> {
        let dictionary: &'a dyn Dictionary = self.dictionary;
        dictionary.scan_index(index).map_err(|code| {
            self.report(index, 0, 0, 0, code);
            code
        })
    }

    /// Resolves `index` into its descriptor table and callback slots.
    pub fn resolve(&self, index: u16) -> Result<ResolvedIndex<'a, '_>, SdoAbortCode> {
        let table = self.scan_index(index)?;
        let slots = if table.notify {
            self.callbacks.slots(index)
        } else {
            None
        };
        Ok(ResolvedIndex { table, slots })
    }

    /// Returns the descriptor of `index`/`sub_index`.
    ///
    /// Upper layers use this to learn the type and size of an entry before
    /// setting up a transfer.
    pub fn find_entry(&self, index: u16, sub_index: u8) -> Result<&'a Subindex, SdoAbortCode> {
        let table = self.scan_index(index)?;
        self.subindex_of(table, sub_index, 0)
    }

    /// Bound-checks `sub_index` against `table`.
    fn subindex_of(
        &self,
        table: &'a IndexTable,
        sub_index: u8,
        given_size: usize,
    ) -> Result<&'a Subindex, SdoAbortCode> {
        table.get(sub_index).ok_or_else(|| {
            self.report(
                table.index,
                sub_index,
                0,
                given_size,
                SdoAbortCode::NoSuchSubindex,
            )
        })
    }

    /// Emits the diagnostics of a failed access and hands back its code.
    fn report(
        &self,
        index: u16,
        sub_index: u8,
        declared_size: usize,
        given_size: usize,
        code: SdoAbortCode,
    ) -> SdoAbortCode {
        my_debug!(
            ObjectContext::new(index, sub_index),
            "Access failed with {:#010x} (declared {} bytes, given {} bytes)",
            code.code(),
            declared_size,
            given_size
        );
        self.observer.access_failed(&AccessFailure {
            index,
            sub_index,
            declared_size,
            given_size,
            code,
        });
        code
    }
}
