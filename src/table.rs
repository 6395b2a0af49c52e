//! HashTable: open addressing over a prime-sized slot array.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash::ProbeSeq;
use crate::prime::next_prime;
use crate::slot::{Entry, Slot};
use core::fmt;
use log::{debug, error, trace, warn};

/// Where an insert lands for a given key.
enum Placement {
    /// The key is already stored at this index.
    Existing(usize),
    /// Write a new entry here. `reuses_tombstone` tells whether the slot is
    /// already counted in `used`.
    Vacant {
        index: usize,
        reuses_tombstone: bool,
    },
    /// Neither the key nor a free slot within `capacity` probes.
    Exhausted,
}

/// Snapshot of a table's occupancy counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStats {
    pub capacity: usize,
    /// Occupied slots.
    pub live: usize,
    /// Occupied plus tombstone slots.
    pub used: usize,
    pub tombstones: usize,
    /// `used / capacity`.
    pub load_factor: f64,
}

/// A byte-keyed hash table using double hashing over a prime capacity.
///
/// Keys and values are copied into storage owned by the table. Replacing a
/// value or deleting a key releases the old storage immediately. The table
/// does no internal synchronization; share it across threads behind a lock.
#[derive(Clone)]
pub struct HashTable {
    slots: Vec<Slot>,
    live: usize,
    used: usize,
    base_capacity: usize,
    config: TableConfig,
}

impl HashTable {
    /// Empty table with the default policy and a capacity of 53.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Empty table with `config`. Panics if the config is invalid or the slot
    /// array cannot be allocated; see [`try_with_config`](Self::try_with_config).
    pub fn with_config(config: TableConfig) -> Self {
        match Self::try_with_config(config) {
            Ok(t) => t,
            Err(e) => panic!("HashTable::with_config: {}", e),
        }
    }

    pub fn try_with_config(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let base_capacity = config.initial_capacity();
        let slots = alloc_slots(base_capacity)?;
        trace!("created hash table with capacity {}", base_capacity);
        Ok(Self {
            slots,
            live: 0,
            used: 0,
            base_capacity,
            config,
        })
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The capacity the table started with; shrinking never goes below it.
    pub fn base_capacity(&self) -> usize {
        self.base_capacity
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn stats(&self) -> TableStats {
        let capacity = self.capacity();
        TableStats {
            capacity,
            live: self.live,
            used: self.used,
            tombstones: self.used - self.live,
            load_factor: self.used as f64 / capacity as f64,
        }
    }

    /// Insert or replace. Panics if a required grow cannot allocate; see
    /// [`try_insert`](Self::try_insert).
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        if let Err(e) = self.try_insert(key, value) {
            panic!("HashTable::insert: {}", e);
        }
    }

    /// Insert `key` with `value`, replacing the value if the key is present.
    ///
    /// Grows first when `used / capacity` has reached the grow threshold, or
    /// when one more entry would fill the last `Empty` slot, so the entry is
    /// placed against the new capacity. If that allocation
    /// fails, the table is unchanged and the error is returned.
    pub fn try_insert<K, V>(&mut self, key: K, value: V) -> Result<(), TableError>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let (key, value) = (key.as_ref(), value.as_ref());
        if self.needs_grow() {
            let target = next_prime(self.capacity().saturating_mul(2));
            self.rebuild(target)?;
        }

        match self.place(key) {
            Placement::Existing(index) => {
                if let Slot::Occupied(entry) = &mut self.slots[index] {
                    entry.replace_value(value);
                }
            }
            Placement::Vacant {
                index,
                reuses_tombstone,
            } => {
                self.slots[index] = Slot::Occupied(Entry::new(key, value));
                self.live += 1;
                if !reuses_tombstone {
                    self.used += 1;
                }
            }
            Placement::Exhausted => probe_exhausted(key.len(), self.capacity()),
        }
        Ok(())
    }

    pub fn lookup<K: AsRef<[u8]>>(&self, key: K) -> Option<&[u8]> {
        self.find(key.as_ref())
            .and_then(|i| self.slots[i].entry())
            .map(|e| &*e.value)
    }

    pub fn contains_key<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.find(key.as_ref()).is_some()
    }

    /// Remove `key`. Returns `false` if it was not present.
    ///
    /// The slot becomes a tombstone so other keys probing through it stay
    /// reachable. May shrink the table afterwards (see [`TableConfig`]).
    pub fn delete<K: AsRef<[u8]>>(&mut self, key: K) -> bool {
        let Some(index) = self.find(key.as_ref()) else {
            return false;
        };
        drop(self.slots[index].bury());
        self.live -= 1;
        self.maybe_shrink();
        true
    }

    /// Release every entry and the slot array.
    pub fn destroy(self) {
        trace!(
            "destroying hash table: capacity {}, {} entries",
            self.capacity(),
            self.live
        );
        drop(self);
    }

    /// Drop all entries and return to the base capacity.
    pub fn clear(&mut self) {
        self.slots.truncate(self.base_capacity);
        self.slots.shrink_to_fit();
        self.slots.fill(Slot::Empty);
        self.live = 0;
        self.used = 0;
    }

    /// Entries in slot order. The order carries no meaning and changes on resize.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            it: self.slots.iter(),
            remaining: self.live,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.iter().map(|(_, v)| v)
    }

    fn load_factor(&self) -> f64 {
        self.used as f64 / self.capacity() as f64
    }

    /// At least one slot must stay `Empty` after the next insert; unsuccessful
    /// probes stop there.
    fn needs_grow(&self) -> bool {
        self.load_factor() >= self.config.grow_at || self.used + 2 > self.capacity()
    }

    /// Index of the occupied slot holding `key`. Tombstones are probed
    /// through; the first `Empty` ends the search.
    fn find(&self, key: &[u8]) -> Option<usize> {
        for index in ProbeSeq::new(key, self.capacity()) {
            match &self.slots[index] {
                Slot::Empty => return None,
                slot if slot.holds(key) => return Some(index),
                _ => {}
            }
        }
        None
    }

    /// Probe until the key or an `Empty` slot shows up. A new entry goes into
    /// the first tombstone passed on the way, else into that `Empty` slot.
    /// Stopping at the first tombstone could shadow a copy of the key further
    /// down the chain.
    fn place(&self, key: &[u8]) -> Placement {
        let mut first_tombstone = None;
        for index in ProbeSeq::new(key, self.capacity()) {
            match &self.slots[index] {
                Slot::Empty => {
                    return match first_tombstone {
                        Some(index) => Placement::Vacant {
                            index,
                            reuses_tombstone: true,
                        },
                        None => Placement::Vacant {
                            index,
                            reuses_tombstone: false,
                        },
                    }
                }
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(index);
                }
                slot if slot.holds(key) => return Placement::Existing(index),
                Slot::Occupied(_) => {}
            }
        }
        match first_tombstone {
            Some(index) => Placement::Vacant {
                index,
                reuses_tombstone: true,
            },
            None => Placement::Exhausted,
        }
    }

    fn maybe_shrink(&mut self) {
        if !self.config.shrink || self.capacity() <= self.base_capacity {
            return;
        }
        let live_factor = self.live as f64 / self.capacity() as f64;
        if live_factor >= self.config.shrink_below {
            return;
        }
        let target = next_prime((self.capacity() / 2).max(self.base_capacity));
        if target >= self.capacity() {
            return;
        }
        // The shrunk table must not already sit at the grow threshold.
        let target_factor = self.live as f64 / target as f64;
        if target_factor >= self.config.grow_at || self.live + 1 >= target {
            return;
        }
        if let Err(e) = self.rebuild(target) {
            warn!(
                "shrink from {} to {} skipped: {}",
                self.capacity(),
                target,
                e
            );
        }
    }

    /// Move every live entry into a fresh array of `new_capacity` slots and
    /// drop the tombstones.
    ///
    /// Runs in two phases. Both arrays are allocated and every entry's new
    /// index is planned from references first; entries only move once the
    /// plan is complete. An allocation failure or a failed plan leaves the
    /// table untouched.
    fn rebuild(&mut self, new_capacity: usize) -> Result<(), TableError> {
        let mut plan: Vec<Option<usize>> = Vec::new();
        plan.try_reserve_exact(new_capacity)?;
        plan.resize(new_capacity, None);
        let mut fresh = alloc_slots(new_capacity)?;

        for (old, slot) in self.slots.iter().enumerate() {
            if let Some(entry) = slot.entry() {
                let new = ProbeSeq::new(&entry.key, new_capacity).find(|&i| plan[i].is_none());
                match new {
                    Some(new) => plan[new] = Some(old),
                    None => probe_exhausted(entry.key.len(), new_capacity),
                }
            }
        }

        for (new, old) in plan.into_iter().enumerate() {
            if let Some(entry) = old.and_then(|old| self.slots[old].take()) {
                fresh[new] = Slot::Occupied(entry);
            }
        }

        let old_capacity = self.capacity();
        let reclaimed = self.used - self.live;
        self.slots = fresh;
        self.used = self.live;
        debug!(
            "resized hash table {} -> {} ({} live, {} tombstones reclaimed)",
            old_capacity, new_capacity, self.live, reclaimed
        );
        Ok(())
    }

    /// Check every structural invariant. Test-only; walks the whole table.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        assert!(crate::prime::is_prime(self.capacity()));
        assert!(self.capacity() >= self.base_capacity);
        assert!(self.live <= self.used && self.used < self.capacity());

        let occupied = self.slots.iter().filter(|s| s.entry().is_some()).count();
        let tombstones = self.slots.iter().filter(|s| **s == Slot::Tombstone).count();
        assert_eq!(occupied, self.live, "live count");
        assert_eq!(occupied + tombstones, self.used, "used count");

        let mut keys = HashSet::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(entry) = slot.entry() {
                assert!(keys.insert(entry.key.clone()), "duplicate key");
                assert_eq!(self.find(&entry.key), Some(index), "unreachable key");
            }
        }
    }
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Extend<(K, V)> for HashTable
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = HashTable::new();
        table.extend(iter);
        table
    }
}

impl<'a> IntoIterator for &'a HashTable {
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(key, value)` pairs of a [`HashTable`].
pub struct Iter<'a> {
    it: core::slice::Iter<'a, Slot>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], &'a [u8]);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.it.by_ref().find_map(Slot::entry)?;
        self.remaining -= 1;
        Some((&*entry.key, &*entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

fn alloc_slots(capacity: usize) -> Result<Vec<Slot>, TableError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, Slot::default);
    Ok(slots)
}

/// The grow trigger keeps at least one slot `Empty`, a shrink never targets
/// a capacity the live entries would overfill, and a prime capacity makes
/// every probe sequence visit all slots, so this is unreachable unless the
/// table's counters are corrupt.
#[cold]
fn probe_exhausted(key_len: usize, capacity: usize) -> ! {
    error!(
        "probe sequence exhausted: key of {} bytes, capacity {}",
        key_len, capacity
    );
    panic!(
        "hash table invariant violated: no free slot within {} probes",
        capacity
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::probe;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Keys whose first probe lands on the same slot as `anchor`.
    fn colliding_keys(anchor: &[u8], capacity: usize, n: usize) -> Vec<Vec<u8>> {
        let home = probe(anchor, capacity, 0);
        (0u32..)
            .map(|i| format!("c{}", i).into_bytes())
            .filter(|k| k.as_slice() != anchor && probe(k, capacity, 0) == home)
            .take(n)
            .collect()
    }

    /// Invariant: the worked example from the public contract.
    #[test]
    fn apple_banana_cherry() {
        init();
        let mut t = HashTable::new();
        t.insert("apple", "1");
        t.insert("banana", "2");
        t.insert("apple", "9");
        assert_eq!(t.lookup("apple"), Some(&b"9"[..]));
        assert_eq!(t.lookup("banana"), Some(&b"2"[..]));
        assert_eq!(t.lookup("cherry"), None);
        assert!(t.delete("banana"));
        assert_eq!(t.lookup("banana"), None);
        assert!(!t.delete("banana"));
        t.assert_invariants();
    }

    /// Invariant: a fresh table is empty at the minimum prime capacity.
    #[test]
    fn create_uses_base_capacity() {
        let t = HashTable::new();
        assert_eq!(t.capacity(), 53);
        assert_eq!(t.base_capacity(), 53);
        assert!(t.is_empty());
        assert_eq!(t.stats().used, 0);
    }

    /// Invariant: overwriting leaves one live entry and does not touch counters.
    #[test]
    fn overwrite_keeps_counts() {
        let mut t = HashTable::new();
        t.insert("k", "v1");
        let before = t.stats();
        t.insert("k", "v2");
        assert_eq!(t.stats(), before);
        assert_eq!(t.len(), 1);
        assert_eq!(t.lookup("k"), Some(&b"v2"[..]));

        // Identical repeat is a no-op.
        t.insert("k", "v2");
        assert_eq!(t.stats(), before);
    }

    /// Invariant: delete keeps the slot as a tombstone; `used` is unchanged.
    #[test]
    fn delete_leaves_tombstone() {
        let mut t = HashTable::new();
        t.insert("a", "1");
        t.insert("b", "2");
        assert!(t.delete("a"));
        let s = t.stats();
        assert_eq!((s.live, s.used, s.tombstones), (1, 2, 1));
        t.assert_invariants();
    }

    /// Invariant: deleting a key in the middle of a collision chain keeps the
    /// keys behind it reachable.
    #[test]
    fn tombstone_keeps_chain_reachable() {
        let mut t = HashTable::new();
        let keys = colliding_keys(b"anchor", t.capacity(), 3);
        for (i, k) in keys.iter().enumerate() {
            t.insert(k, [i as u8]);
        }
        assert!(t.delete(&keys[0]));
        assert_eq!(t.lookup(&keys[1]), Some(&[1u8][..]));
        assert_eq!(t.lookup(&keys[2]), Some(&[2u8][..]));
        assert_eq!(t.lookup(&keys[0]), None);
        t.assert_invariants();
    }

    /// Invariant: a colliding key reuses the tombstone without reviving the
    /// deleted key, and reuse does not bump `used`.
    #[test]
    fn tombstone_reuse_does_not_revive() {
        let mut t = HashTable::new();
        let keys = colliding_keys(b"anchor", t.capacity(), 2);
        let (a, b) = (&keys[0], &keys[1]);
        t.insert(a, "A");
        assert!(t.delete(a));
        let used = t.stats().used;

        t.insert(b, "B");
        assert_eq!(t.stats().used, used);
        assert_eq!(t.stats().tombstones, 0);
        assert_eq!(t.lookup(b), Some(&b"B"[..]));
        assert_eq!(t.lookup(a), None);
        t.assert_invariants();
    }

    /// Invariant: re-inserting a key that sits behind a tombstone replaces it
    /// in place instead of creating a second copy in the tombstone.
    #[test]
    fn reinsert_behind_tombstone_does_not_duplicate() {
        let mut t = HashTable::new();
        let keys = colliding_keys(b"anchor", t.capacity(), 2);
        let (a, b) = (&keys[0], &keys[1]);
        t.insert(a, "A");
        t.insert(b, "B1");
        assert!(t.delete(a));

        t.insert(b, "B2");
        assert_eq!(t.len(), 1);
        assert_eq!(t.lookup(b), Some(&b"B2"[..]));
        assert!(t.delete(b));
        assert_eq!(t.lookup(b), None);
        t.assert_invariants();
    }

    /// Invariant: the grow trigger fires once `used / capacity >= 0.7`, before
    /// the new entry is placed.
    #[test]
    fn grows_at_threshold() {
        init();
        let mut t = HashTable::new();
        for i in 0..38 {
            t.insert(format!("key{}", i), "v");
        }
        assert_eq!(t.capacity(), 53);
        t.insert("key38", "v");
        assert_eq!(t.capacity(), 107);
        assert_eq!(t.len(), 39);
        for i in 0..39 {
            assert!(t.contains_key(format!("key{}", i)));
        }
        t.assert_invariants();
    }

    /// Invariant: tombstones count toward the grow trigger and a rebuild
    /// reclaims them.
    #[test]
    fn rebuild_reclaims_tombstones() {
        let mut t = HashTable::with_config(TableConfig::new().with_shrink(false));
        for i in 0..38 {
            t.insert(format!("key{}", i), "v");
        }
        for i in 0..30 {
            assert!(t.delete(format!("key{}", i)));
        }
        assert_eq!(t.stats().tombstones, 30);
        t.insert("fresh", "v");
        let s = t.stats();
        assert_eq!(s.capacity, 107);
        assert_eq!(s.tombstones, 0);
        assert_eq!(s.used, s.live);
        assert_eq!(s.live, 9);
        t.assert_invariants();
    }

    /// Invariant: shrinking kicks in below the low-water mark and stops at
    /// the base capacity.
    #[test]
    fn shrinks_after_deletes() {
        init();
        let mut t = HashTable::new();
        for i in 0..39 {
            t.insert(format!("key{}", i), "v");
        }
        assert_eq!(t.capacity(), 107);
        for i in 0..28 {
            t.delete(format!("key{}", i));
        }
        assert_eq!(t.capacity(), 107);
        t.delete("key28");
        assert_eq!(t.capacity(), 53);
        assert_eq!(t.stats().tombstones, 0);
        for i in 29..39 {
            assert_eq!(t.lookup(format!("key{}", i)), Some(&b"v"[..]));
        }
        for i in 29..39 {
            t.delete(format!("key{}", i));
        }
        assert_eq!(t.capacity(), 53);
        assert!(t.is_empty());
        t.assert_invariants();
    }

    /// Invariant: with thresholds at the edge of what `validate` accepts,
    /// deleting everything one key at a time never overfills a shrunk table.
    #[test]
    fn near_limit_thresholds_shrink_safely() {
        init();
        let config = TableConfig::new().with_grow_at(0.9).with_shrink_below(0.449);
        let mut t = HashTable::with_config(config);
        for i in 0..90 {
            t.insert(format!("key{}", i), format!("v{}", i));
        }
        assert_eq!(t.capacity(), 107);
        for i in 0..90 {
            assert!(t.delete(format!("key{}", i)));
            t.assert_invariants();
            for j in (i + 1)..90 {
                assert_eq!(
                    t.lookup(format!("key{}", j)),
                    Some(format!("v{}", j).as_bytes())
                );
            }
        }
        assert_eq!(t.capacity(), 53);
    }

    /// Invariant: a shrink is skipped while the live entries would put the
    /// smaller table at or past the grow threshold, even if the low-water
    /// mark is set above half of it.
    #[test]
    fn shrink_skips_targets_the_entries_would_overfill() {
        let config = TableConfig::new().with_grow_at(0.9).with_shrink_below(0.4);
        let mut t = HashTable::with_config(config);
        t.config.shrink_below = 0.8;
        for i in 0..90 {
            t.insert(format!("key{}", i), "v");
        }
        assert_eq!(t.capacity(), 107);
        for i in 0..42 {
            assert!(t.delete(format!("key{}", i)));
            assert_eq!(t.capacity(), 107, "shrunk with {} live", t.len());
        }
        // 47 live: 47 / 53 is under the grow threshold.
        assert!(t.delete("key42"));
        assert_eq!(t.capacity(), 53);
        for i in 43..90 {
            assert_eq!(t.lookup(format!("key{}", i)), Some(&b"v"[..]));
        }
        t.assert_invariants();
    }

    /// Invariant: inserts grow before the last `Empty` slot is taken, even
    /// when `grow_at` alone would allow filling it.
    #[test]
    fn high_grow_at_keeps_an_empty_slot() {
        let config = TableConfig::new().with_grow_at(0.99).with_shrink_below(0.01);
        let mut t = HashTable::with_config(config);
        for i in 0..52 {
            t.insert(format!("key{}", i), "v");
            t.assert_invariants();
        }
        assert_eq!(t.capacity(), 53);
        assert_eq!(t.stats().used, 52);
        t.insert("key52", "v");
        assert_eq!(t.capacity(), 107);
        t.assert_invariants();
        for i in 100..200 {
            assert_eq!(t.lookup(format!("miss{}", i)), None);
        }
    }

    /// Invariant: a rebuild that cannot place every entry aborts before any
    /// entry leaves the old array.
    #[test]
    fn aborted_rebuild_leaves_table_untouched() {
        let mut t = HashTable::new();
        for i in 0..30 {
            t.insert(format!("key{}", i), format!("v{}", i));
        }
        assert!(t.delete("key0"));
        let before = t.stats();

        let r = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = t.rebuild(23);
        }));
        assert!(r.is_err());

        assert_eq!(t.stats(), before);
        for i in 1..30 {
            assert_eq!(
                t.lookup(format!("key{}", i)),
                Some(format!("v{}", i).as_bytes())
            );
        }
        t.assert_invariants();
    }

    /// Invariant: a rebuild whose allocation fails reports the error and
    /// leaves the table as it was.
    #[test]
    fn failed_rebuild_allocation_leaves_table_untouched() {
        let mut t = HashTable::new();
        for i in 0..20 {
            t.insert(format!("key{}", i), "v");
        }
        let before = t.stats();
        let r = t.rebuild(usize::MAX / 2);
        assert!(matches!(r, Err(TableError::AllocationFailure(_))));
        assert_eq!(t.stats(), before);
        for i in 0..20 {
            assert!(t.contains_key(format!("key{}", i)));
        }
        t.assert_invariants();
    }

    #[test]
    fn shrink_can_be_disabled() {
        let mut t = HashTable::with_config(TableConfig::new().with_shrink(false));
        for i in 0..39 {
            t.insert(format!("key{}", i), "v");
        }
        for i in 0..39 {
            t.delete(format!("key{}", i));
        }
        assert_eq!(t.capacity(), 107);
        t.assert_invariants();
    }

    /// Invariant: a larger base capacity is respected as the shrink floor.
    #[test]
    fn custom_base_capacity() {
        let mut t = HashTable::with_config(TableConfig::new().with_base_capacity(200));
        assert_eq!(t.capacity(), 211);
        t.insert("a", "1");
        t.delete("a");
        assert_eq!(t.capacity(), 211);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let r = HashTable::try_with_config(TableConfig::new().with_grow_at(1.5));
        assert!(matches!(r, Err(TableError::InvalidConfig(_))));
    }

    /// Invariant: keys are compared byte-exactly, including empty and binary keys.
    #[test]
    fn binary_and_empty_keys() {
        let mut t = HashTable::new();
        t.insert(b"", b"empty");
        t.insert([0u8, 0], b"zeros");
        t.insert([0u8], b"zero");
        t.insert([0xffu8; 300], b"long");
        assert_eq!(t.lookup(b""), Some(&b"empty"[..]));
        assert_eq!(t.lookup([0u8, 0]), Some(&b"zeros"[..]));
        assert_eq!(t.lookup([0u8]), Some(&b"zero"[..]));
        assert_eq!(t.lookup([0xffu8; 300]), Some(&b"long"[..]));
        assert_eq!(t.lookup([0u8, 0, 0]), None);
        t.assert_invariants();
    }

    #[test]
    fn clear_returns_to_base() {
        let mut t = HashTable::new();
        for i in 0..200 {
            t.insert(format!("key{}", i), "v");
        }
        assert!(t.capacity() > 53);
        t.clear();
        assert_eq!(t.capacity(), 53);
        assert!(t.is_empty());
        assert_eq!(t.lookup("key1"), None);
        t.insert("again", "v");
        assert_eq!(t.lookup("again"), Some(&b"v"[..]));
        t.assert_invariants();
    }

    #[test]
    fn iter_yields_each_live_entry_once() {
        let mut t: HashTable = (0..100).map(|i| (format!("k{}", i), format!("v{}", i))).collect();
        for i in 0..50 {
            t.delete(format!("k{}", i));
        }
        let mut seen: Vec<(Vec<u8>, Vec<u8>)> =
            t.iter().map(|(k, v)| (k.to_vec(), v.to_vec())).collect();
        seen.sort();
        let mut expected: Vec<(Vec<u8>, Vec<u8>)> = (50..100)
            .map(|i| (format!("k{}", i).into_bytes(), format!("v{}", i).into_bytes()))
            .collect();
        expected.sort();
        assert_eq!(seen, expected);
        assert_eq!(t.iter().len(), 50);
        assert_eq!(t.keys().count(), 50);
        assert_eq!(t.values().count(), 50);
    }

    #[test]
    fn debug_lists_entries() {
        let mut t = HashTable::new();
        t.insert([1u8], [2u8]);
        assert_eq!(format!("{:?}", t), "{[1]: [2]}");
    }

    #[test]
    fn probe_exhaustion_panics() {
        let r = std::panic::catch_unwind(|| {
            probe_exhausted(3, 53);
        });
        assert!(r.is_err());
    }

    #[test]
    fn destroy_consumes_table() {
        let mut t = HashTable::new();
        t.insert("k", vec![7u8; 1024]);
        t.destroy();
    }
}
