//! Generic insertion-ordered storage with a predictable growth policy.
//!
//! [`GrowableStore`] backs both the test registry and the per-run diagnostic log. It starts with no
//! allocation, reserves room for [`DEFAULT_INITIAL_CAPACITY`] elements on the first append, and
//! multiplies its capacity by [`DEFAULT_GROWTH_FACTOR`] whenever it runs full.
//!
//! ## Notes
//!
//! - Capacity is tracked by the store itself, so [`GrowableStore::capacity`] reports the policy's
//!   sequence (`0, 10, 20, 40, ...`) regardless of what the allocator hands back.
//! - [`GrowableStore::clear`] and [`GrowableStore::drain`] keep the backing storage, so per-test
//!   resets never reallocate. [`GrowableStore::release`] is the only way storage is freed early.
//! - Growth is fallible: allocation failure is reported as [`StoreError`] instead of aborting.

use std::collections::TryReserveError;

use thiserror::Error;

/// Capacity reserved by the first append into an empty store.
pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

/// Multiplier applied to the capacity each time a full store grows.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Errors raised while growing a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("memory allocation failed while growing a store to {requested} elements")]
    AllocationFailed {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("store capacity overflowed while growing past {current} elements")]
    CapacityOverflow { current: usize },

    #[error("invalid growth policy: {0}")]
    InvalidPolicy(&'static str),
}

/// How a [`GrowableStore`] picks its next capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    initial_capacity: usize,
    growth_factor: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl GrowthPolicy {
    /// Build a policy.
    ///
    /// ## Errors
    /// - `initial_capacity` must be at least 1.
    /// - `growth_factor` must be at least 2, otherwise appends would stop being amortized O(1).
    pub fn new(initial_capacity: usize, growth_factor: usize) -> Result<Self, StoreError> {
        if initial_capacity == 0 {
            return Err(StoreError::InvalidPolicy("initial capacity must be at least 1"));
        }
        if growth_factor < 2 {
            return Err(StoreError::InvalidPolicy("growth factor must be at least 2"));
        }
        Ok(Self {
            initial_capacity,
            growth_factor,
        })
    }

    pub const fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    pub const fn growth_factor(&self) -> usize {
        self.growth_factor
    }

    /// Capacity to grow to from `current`, or `None` on arithmetic overflow.
    pub fn next_capacity(&self, current: usize) -> Option<usize> {
        if current == 0 {
            Some(self.initial_capacity)
        } else {
            current.checked_mul(self.growth_factor)
        }
    }
}

/// Insertion-ordered sequence with amortized O(1) fallible append.
#[derive(Debug)]
pub struct GrowableStore<T> {
    items: Vec<T>,
    reserved: usize,
    policy: GrowthPolicy,
}

impl<T> Default for GrowableStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GrowableStore<T> {
    /// Create an empty store with the default policy. Does not allocate.
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    /// Create an empty store with a custom policy. Does not allocate.
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            items: Vec::new(),
            reserved: 0,
            policy,
        }
    }

    /// Append one element, growing the store first if it is full.
    ///
    /// ## Errors
    /// Returns [`StoreError`] when growth fails; the store is left unchanged and `value` is dropped.
    pub fn append(&mut self, value: T) -> Result<(), StoreError> {
        if self.items.len() >= self.reserved {
            self.grow()?;
        }
        self.items.push(value);
        Ok(())
    }

    fn grow(&mut self) -> Result<(), StoreError> {
        let requested = self
            .policy
            .next_capacity(self.reserved)
            .ok_or(StoreError::CapacityOverflow { current: self.reserved })?;
        let additional = requested - self.items.len();
        self.items
            .try_reserve_exact(additional)
            .map_err(|source| StoreError::AllocationFailed { requested, source })?;
        self.reserved = requested;
        Ok(())
    }

    /// Reset the length to zero. Backing storage is kept for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Remove every element in insertion order. Backing storage is kept for reuse.
    pub fn drain(&mut self) -> std::vec::Drain<'_, T> {
        self.items.drain(..)
    }

    /// Drop every element and free the backing storage.
    pub fn release(&mut self) {
        self.items = Vec::new();
        self.reserved = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of elements the store can hold before it grows again.
    pub fn capacity(&self) -> usize {
        self.reserved
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a GrowableStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
