//! Per-slot state of the table.

/// An owned key/value pair. The key never changes once inserted; the value
/// is replaced when the same key is inserted again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: Box<[u8]>,
}

impl Entry {
    pub(crate) fn new(key: &[u8], value: &[u8]) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Swap in a new value; the previous buffer is dropped here.
    pub(crate) fn replace_value(&mut self, value: &[u8]) {
        self.value = value.into();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum Slot {
    #[default]
    Empty,
    Occupied(Entry),
    /// Previously occupied. Still part of every probe chain that passed
    /// through it until a rebuild drops it.
    Tombstone,
}

impl Slot {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<&Entry> {
        match self {
            Slot::Occupied(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn holds(&self, key: &[u8]) -> bool {
        matches!(self, Slot::Occupied(e) if &*e.key == key)
    }

    /// Replace an occupied slot with a tombstone, handing back its entry.
    pub(crate) fn bury(&mut self) -> Option<Entry> {
        match std::mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(e) => Some(e),
            other => {
                *self = other;
                None
            }
        }
    }

    /// Take the entry out, leaving `Empty`. Used when rebuilding.
    pub(crate) fn take(&mut self) -> Option<Entry> {
        match std::mem::take(self) {
            Slot::Occupied(e) => Some(e),
            _ => None,
        }
    }
}
