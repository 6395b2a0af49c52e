//! prime-table: a byte-keyed hash table using open addressing with double
//! hashing over prime capacities.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: amortized O(1) insert, lookup and delete for opaque byte-string
//!   keys and values, with a small, checkable collision-resolution engine.
//! - Layers:
//!   - `hash`: the polynomial hash pair and the bounded probe sequence.
//!   - `prime`: prime generation for capacities.
//!   - `slot`: per-slot state (`Empty`, `Occupied`, `Tombstone`) and the
//!     owned `Entry`.
//!   - `table`: `HashTable`, which owns the slot array, the live/used
//!     counters and the grow/shrink protocol driven by `TableConfig`.
//!
//! Probing
//! - Slot `i` of the probe sequence for a key is
//!   `(hash_a + i * (hash_b + 1)) mod capacity`. `hash_b` is reduced modulo
//!   `capacity - 1`, so the step is never 0 or a multiple of the capacity;
//!   with a prime capacity the first `capacity` probes visit every slot.
//! - Every probe loop is bounded by `capacity` iterations.
//!
//! Deletion
//! - Deleting turns the slot into a tombstone. Lookups probe through
//!   tombstones; inserts reuse the first tombstone on the key's path once
//!   they know the key is not further along.
//! - Tombstones are reclaimed only by a rebuild (grow or shrink).
//!
//! Resizing
//! - Insert grows first when `used / capacity >= grow_at` (default 0.7) or
//!   when the insert would take the last `Empty` slot, to
//!   `next_prime(2 * capacity)`.
//! - Delete shrinks when `live / capacity < shrink_below` (default 0.1), to
//!   `next_prime(capacity / 2)` but never below the base capacity, and only
//!   if the live entries stay under `grow_at` in the smaller table.
//! - A rebuild allocates the new slot array and plans every entry's new
//!   index before any entry moves, so a failed allocation or plan leaves
//!   the table as it was.
//!
//! Errors
//! - A missing key is a normal result (`None` / `false`), not an error.
//! - `TableError::AllocationFailure` is returned from the `try_*` methods;
//!   the plain methods panic on it, like `Vec`.
//! - Probe exhaustion cannot happen while the counters are correct and is
//!   treated as an internal invariant violation (panic).
//!
//! Notes and non-goals
//! - No internal synchronization: wrap a table in a lock or use one table
//!   per thread.
//! - No ordering guarantees; iteration follows slot order.
//! - No persistence or serialization.

mod config;
mod error;
mod hash;
mod prime;
mod slot;
mod table;
mod table_proptest;

// Public surface
pub use config::{TableConfig, MIN_CAPACITY};
pub use error::TableError;
pub use hash::{hash, probe, ProbeSeq, PRIME_1, PRIME_2};
pub use prime::{is_prime, next_prime};
pub use table::{HashTable, Iter, TableStats};
