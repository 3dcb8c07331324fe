// crates/canopen-od/src/od/callbacks.rs
use super::{IndexTable, ObjectDictionary, SdoAbortCode};
use crate::log::{ObjectContext, my_trace};
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

/// Notification invoked after a successful write to one sub-index.
///
/// It receives the dictionary (so it may read or write other entries), the
/// table of the written index and the written sub-index. An error is
/// returned to the writer; the written value stays in storage.
pub type OdCallback =
    Rc<dyn Fn(&mut ObjectDictionary<'_>, &IndexTable, u8) -> Result<(), SdoAbortCode>>;

/// Per-index callback slots.
///
/// Slots for an index are allocated on its first registration, one per
/// sub-index of its table.
#[derive(Default)]
pub struct CallbackRegistry {
    slots: BTreeMap<u16, Vec<Option<OdCallback>>>,
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|(index, slots)| {
                (index, slots.iter().filter(|slot| slot.is_some()).count())
            }))
            .finish()
    }
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// The callback slots of `index`, if any were allocated.
    pub fn slots(&self, index: u16) -> Option<&[Option<OdCallback>]> {
        self.slots.get(&index).map(Vec::as_slice)
    }

    /// Returns a shared handle to the callback of `index`/`sub_index`.
    pub fn get(&self, index: u16, sub_index: u8) -> Option<OdCallback> {
        self.slots
            .get(&index)
            .and_then(|slots| slots.get(sub_index as usize))
            .and_then(Option::clone)
    }

    /// Stores `callback` in the slot of `table`/`sub_index`, replacing any
    /// previous one. The caller has already bound-checked `sub_index`.
    fn set(&mut self, table: &IndexTable, sub_index: u8, callback: OdCallback) {
        let slots = self
            .slots
            .entry(table.index)
            .or_insert_with(|| (0..table.sub_count()).map(|_| None).collect());
        if let Some(slot) = slots.get_mut(sub_index as usize) {
            *slot = Some(callback);
        }
    }
}

impl<'a> ObjectDictionary<'a> {
    /// Associates `callback` with `index`/`sub_index`.
    ///
    /// Registering again for the same entry replaces the previous callback.
    /// There is no unregister; register a callback returning `Ok(())` to
    /// silence an entry.
    ///
    /// Fails with the resolution error for unknown entries, and with
    /// `UnsupportedAccess` if the index has no callback slots.
    pub fn register_callback<F>(
        &mut self,
        index: u16,
        sub_index: u8,
        callback: F,
    ) -> Result<(), SdoAbortCode>
    where
        F: Fn(&mut ObjectDictionary<'_>, &IndexTable, u8) -> Result<(), SdoAbortCode> + 'static,
    {
        let table = self.scan_index(index)?;
        self.subindex_of(table, sub_index, 0)?;
        if !table.notify {
            return Err(self.report(index, sub_index, 0, 0, SdoAbortCode::UnsupportedAccess));
        }
        my_trace!(ObjectContext::new(index, sub_index), "Registering write callback");
        self.callbacks.set(table, sub_index, Rc::new(callback));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::Dictionary;
    use crate::od::{AccessType, Subindex};
    use crate::types::DataType;
    use core::cell::Cell;

    static SUBS: [Subindex; 3] = [
        Subindex::new(DataType::Unsigned8, AccessType::READ_ONLY, 1, 0),
        Subindex::new(DataType::Unsigned8, AccessType::READ_WRITE, 1, 1),
        Subindex::new(DataType::Unsigned8, AccessType::READ_WRITE, 1, 2),
    ];
    static NOTIFY: IndexTable = IndexTable::from_static(0x2100, &SUBS, true);
    static SILENT: IndexTable = IndexTable::from_static(0x2101, &SUBS, false);

    struct Dict;
    impl Dictionary for Dict {
        fn scan_index(&self, index: u16) -> Result<&IndexTable, SdoAbortCode> {
            match index {
                0x2100 => Ok(&NOTIFY),
                0x2101 => Ok(&SILENT),
                _ => Err(SdoAbortCode::NoSuchObject),
            }
        }
    }

    #[test]
    fn test_register_allocates_one_slot_per_sub_index() {
        let mut memory = [0u8; 3];
        let mut od = ObjectDictionary::new(&Dict, &mut memory);
        od.register_callback(0x2100, 2, |_, _, _| Ok(())).unwrap();

        let resolved = od.resolve(0x2100).unwrap();
        assert!(resolved.callback(2).is_some());
        assert!(resolved.callback(1).is_none());
        assert_eq!(od.callbacks.slots(0x2100).map(|s| s.len()), Some(3));
    }

    #[test]
    fn test_register_replaces_previous_callback() {
        let mut memory = [0u8; 3];
        let mut od = ObjectDictionary::new(&Dict, &mut memory);
        od.register_callback(0x2100, 1, |_, _, _| Err(SdoAbortCode::GeneralError))
            .unwrap();
        od.register_callback(0x2100, 1, |_, _, _| Err(SdoAbortCode::ValueTooLow))
            .unwrap();

        let callback = od.callbacks.get(0x2100, 1).unwrap();
        assert_eq!(callback(&mut od, &NOTIFY, 1), Err(SdoAbortCode::ValueTooLow));
    }

    #[test]
    fn test_register_errors() {
        let mut memory = [0u8; 3];
        let mut od = ObjectDictionary::new(&Dict, &mut memory);
        fn noop(_: &mut ObjectDictionary<'_>, _: &IndexTable, _: u8) -> Result<(), SdoAbortCode> {
            Ok(())
        }

        assert_eq!(
            od.register_callback(0x3000, 0, noop),
            Err(SdoAbortCode::NoSuchObject)
        );
        assert_eq!(
            od.register_callback(0x2100, 3, noop),
            Err(SdoAbortCode::NoSuchSubindex)
        );
        assert_eq!(
            od.register_callback(0x2101, 1, noop),
            Err(SdoAbortCode::UnsupportedAccess)
        );
        assert!(od.callbacks.slots(0x2101).is_none());
    }

    #[test]
    fn test_registered_callback_keeps_captured_state() {
        let mut memory = [0u8; 3];
        let mut od = ObjectDictionary::new(&Dict, &mut memory);
        let hits = Rc::new(Cell::new(0u32));
        let counter = hits.clone();
        od.register_callback(0x2100, 1, move |_, _, _| {
            counter.set(counter.get() + 1);
            Ok(())
        })
        .unwrap();

        let callback = od.callbacks.get(0x2100, 1).unwrap();
        callback(&mut od, &NOTIFY, 1).unwrap();
        callback(&mut od, &NOTIFY, 1).unwrap();
        assert_eq!(hits.get(), 2);
    }
}
