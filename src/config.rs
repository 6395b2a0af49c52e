//! Sizing and resize policy.

use crate::error::TableError;
use crate::prime::next_prime;

/// Smallest capacity a table is ever created with or shrunk to.
pub const MIN_CAPACITY: usize = 53;

/// Resize policy of a [`HashTable`](crate::HashTable).
///
/// - `base_capacity`: starting capacity and shrink floor. Rounded up to a
///   prime no smaller than [`MIN_CAPACITY`].
/// - `grow_at`: insert grows the table first when `used / capacity` reaches this.
/// - `shrink_below`: delete shrinks the table when `live / capacity` falls below this.
/// - `shrink`: whether deletes may shrink the table at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub base_capacity: usize,
    pub grow_at: f64,
    pub shrink_below: f64,
    pub shrink: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            base_capacity: MIN_CAPACITY,
            grow_at: 0.7,
            shrink_below: 0.1,
            shrink: true,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_capacity(mut self, base_capacity: usize) -> Self {
        self.base_capacity = base_capacity;
        self
    }

    pub fn with_grow_at(mut self, grow_at: f64) -> Self {
        self.grow_at = grow_at;
        self
    }

    pub fn with_shrink_below(mut self, shrink_below: f64) -> Self {
        self.shrink_below = shrink_below;
        self
    }

    pub fn with_shrink(mut self, shrink: bool) -> Self {
        self.shrink = shrink;
        self
    }

    /// Check the thresholds: `0 < grow_at < 1` and `0 < 2 * shrink_below < grow_at`.
    ///
    /// A shrink roughly halves the capacity, so a table shrunk just below
    /// `shrink_below` lands near `2 * shrink_below`, which has to stay under
    /// the grow threshold. Independently of `grow_at`, inserts always grow
    /// before the last `Empty` slot would be filled.
    pub fn validate(&self) -> Result<(), TableError> {
        if !(self.grow_at > 0.0 && self.grow_at < 1.0) {
            return Err(TableError::InvalidConfig("grow_at must be in (0, 1)"));
        }
        if !(self.shrink_below > 0.0 && self.shrink_below * 2.0 < self.grow_at) {
            return Err(TableError::InvalidConfig(
                "shrink_below must be in (0, grow_at / 2)",
            ));
        }
        Ok(())
    }

    /// The prime capacity a fresh table starts with.
    pub fn initial_capacity(&self) -> usize {
        next_prime(self.base_capacity.max(MIN_CAPACITY))
    }
}
