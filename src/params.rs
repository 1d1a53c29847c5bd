use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{ItemId, Range};

/// A callback fired synchronously whenever the mounted window changes.
///
/// It receives the new [`Range`] by value, within the same call stack as the
/// operation that caused the change, never deferred.
pub type OnRangeChanged = Arc<dyn Fn(Range) + Send + Sync>;

/// Configuration for [`crate::Engine`].
///
/// `K` is the stable item identity type. It defaults to [`ItemId`] (`u64`);
/// any hashable (or, without `std`, ordered) type works, so adapters can key
/// measurements by whatever survives data-source mutations.
pub struct EngineParams<K = ItemId> {
    /// Ordered stable identities of every item in the data source.
    pub unique_ids: Vec<K>,
    /// Number of items kept mounted at once.
    pub keeps: usize,
    /// Items per visual row. Cumulative linear size is divided by this so
    /// grid-like wrapping maps onto row offsets. Values below 1 behave as 1.
    pub data_per_row: usize,
    /// Default per-item size used until real measurements arrive.
    pub estimate_size: f64,
    /// Scroll buffer in index units. Scrolling within the buffer does not
    /// recompute the window, trading a little over-rendering for fewer
    /// recomputes.
    pub buffer: usize,
    /// Fixed pixel size contributed by a leading decoration (header slot).
    pub slot_header_size: f64,
    /// Fixed pixel size contributed by a trailing decoration (footer slot).
    pub slot_footer_size: f64,
}

impl<K> EngineParams<K> {
    /// Creates params with the defaults the original component ships:
    /// estimate of 50 pixels, one item per row, and a buffer of a third of
    /// `keeps`.
    pub fn new(unique_ids: Vec<K>, keeps: usize) -> Self {
        Self {
            unique_ids,
            keeps,
            data_per_row: 1,
            estimate_size: 50.0,
            buffer: keeps / 3,
            slot_header_size: 0.0,
            slot_footer_size: 0.0,
        }
    }

    pub fn with_data_per_row(mut self, data_per_row: usize) -> Self {
        self.data_per_row = data_per_row;
        self
    }

    pub fn with_estimate_size(mut self, estimate_size: f64) -> Self {
        self.estimate_size = estimate_size;
        self
    }

    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_slot_sizes(mut self, header: f64, footer: f64) -> Self {
        self.slot_header_size = header;
        self.slot_footer_size = footer;
        self
    }

    /// Total number of items in the data source.
    pub fn total(&self) -> usize {
        self.unique_ids.len()
    }

    /// Index of the last real item (0 when the list is empty).
    pub(crate) fn last_index(&self) -> usize {
        self.unique_ids.len().saturating_sub(1)
    }
}

impl<K: Clone> Clone for EngineParams<K> {
    fn clone(&self) -> Self {
        Self {
            unique_ids: self.unique_ids.clone(),
            keeps: self.keeps,
            data_per_row: self.data_per_row,
            estimate_size: self.estimate_size,
            buffer: self.buffer,
            slot_header_size: self.slot_header_size,
            slot_footer_size: self.slot_footer_size,
        }
    }
}

impl<K> core::fmt::Debug for EngineParams<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EngineParams")
            .field("total", &self.unique_ids.len())
            .field("keeps", &self.keeps)
            .field("data_per_row", &self.data_per_row)
            .field("estimate_size", &self.estimate_size)
            .field("buffer", &self.buffer)
            .field("slot_header_size", &self.slot_header_size)
            .field("slot_footer_size", &self.slot_footer_size)
            .finish()
    }
}

/// A single in-place configuration update.
///
/// The original engine took stringly-typed `(key, value)` pairs and silently
/// ignored unknown keys; a typed enum makes unknown keys unrepresentable.
///
/// Updating a parameter never recomputes the window by itself. Callers follow
/// up with [`crate::Engine::handle_data_sources_change`] (or
/// [`crate::Engine::handle_slot_size_change`]) when a recompute is due, the
/// same way the original component sequences the two calls.
#[derive(Clone, Debug)]
pub enum ParamUpdate<K = ItemId> {
    /// Replaces the identity list and garbage-collects ledger entries whose
    /// identity no longer appears.
    UniqueIds(Vec<K>),
    Keeps(usize),
    DataPerRow(usize),
    EstimateSize(f64),
    Buffer(usize),
    SlotHeaderSize(f64),
    SlotFooterSize(f64),
}
