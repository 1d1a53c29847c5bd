use alloc::sync::Arc;
use core::cell::Cell;
use core::cmp;

use crate::key::LedgerKey;
use crate::ledger::SizeLedger;
use crate::{Direction, EngineParams, ItemId, OnRangeChanged, ParamUpdate, Range};

/// Index distance the window start is nudged along the last travel direction
/// when the data source mutates under it.
const LEADING_BUFFER: usize = 2;

/// The windowing/estimation engine.
///
/// One instance owns the size ledger, the scroll state and the authoritative
/// window; adapters drive it by feeding measured sizes and scroll offsets and
/// receive recomputed [`Range`] snapshots through the callback passed to
/// [`Engine::new`].
///
/// Every operation is synchronous and runs to completion before returning; the
/// callback fires within the same call stack. `&mut self` on every mutating
/// operation makes interleaved calls unrepresentable; callers juggling
/// multiple event sources (resize observation plus scroll events, say) must
/// deliver them as sequential calls.
///
/// Offsets and sizes are non-negative reals in the caller's pixel space. The
/// engine never validates offset plausibility: rejecting negative or
/// over-scrolled offsets (elastic-scroll artifacts) is a caller precondition.
pub struct Engine<K = ItemId> {
    params: EngineParams<K>,
    on_range: OnRangeChanged,
    ledger: SizeLedger<K>,
    // Highest index whose exact offset has ever been computed. Interior
    // mutability keeps offset queries `&self`.
    last_calc_index: Cell<usize>,
    offset: f64,
    direction: Option<Direction>,
    range: Range,
}

impl<K: LedgerKey> Engine<K> {
    /// Creates an engine and seeds the initial window `[0, keeps - 1]`.
    ///
    /// Seeding always starts at index 0, even when the adapter intends to jump
    /// elsewhere right away: the first page has to be mounted once so real
    /// sizes exist before any estimate-driven jump. The callback fires once
    /// with the seed range.
    pub fn new(params: EngineParams<K>, on_range: impl Fn(Range) + Send + Sync + 'static) -> Self {
        wdebug!(
            total = params.total(),
            keeps = params.keeps,
            buffer = params.buffer,
            "Engine::new"
        );
        let mut engine = Self {
            params,
            on_range: Arc::new(on_range),
            ledger: SizeLedger::new(),
            last_calc_index: Cell::new(0),
            offset: 0.0,
            direction: None,
            range: Range::default(),
        };
        engine.seed_range();
        engine
    }

    pub fn params(&self) -> &EngineParams<K> {
        &self.params
    }

    /// The current window snapshot. Safe to retain; it never observes later
    /// engine mutations.
    pub fn get_range(&self) -> Range {
        self.range
    }

    /// The last scroll offset this engine was told about.
    pub fn scroll_offset(&self) -> f64 {
        self.offset
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Whether the last scroll moved toward the start of the list.
    pub fn is_front(&self) -> bool {
        self.direction == Some(Direction::Front)
    }

    /// Whether the last scroll moved toward the end of the list (an unchanged
    /// offset counts as `Behind`).
    pub fn is_behind(&self) -> bool {
        self.direction == Some(Direction::Behind)
    }

    /// Last recorded size for `id`, or `None` while it is still unmeasured.
    /// Absence is the expected pre-measurement state, not an error.
    pub fn size_of(&self, id: &K) -> Option<f64> {
        self.ledger.size_of(id)
    }

    /// Number of identities with a recorded size.
    pub fn recorded_count(&self) -> usize {
        self.ledger.len()
    }

    /// The size currently substituted for unmeasured items.
    pub fn estimated_size(&self) -> f64 {
        self.ledger.estimated_size(self.params.estimate_size)
    }

    /// Absolute offset of `index`, including the header decoration. This is
    /// what an adapter scrolls to when jumping directly to an index.
    pub fn get_offset(&self, index: usize) -> f64 {
        let in_list = if index < 1 {
            0.0
        } else {
            self.offset_of_index(index)
        };
        in_list + self.params.slot_header_size
    }

    /// Records the measured size for `id`, re-classifying the list and
    /// updating the first-window average as needed.
    ///
    /// Called by the adapter whenever an item is first mounted or its size
    /// changes, including reused/recycled mounts. Recording alone never
    /// recomputes the window; the next scroll or forced recompute picks the
    /// new sizes up.
    pub fn record(&mut self, id: K, size: f64) {
        wtrace!(size, recorded = self.ledger.len(), "record");
        let first_window_len = cmp::min(self.params.keeps, self.params.total());
        self.ledger.record(id, size, first_window_len);
    }

    /// Applies one configuration update in place.
    ///
    /// Replacing the identity list garbage-collects stale ledger entries. No
    /// update recomputes the window by itself; follow with
    /// [`Engine::handle_data_sources_change`] or
    /// [`Engine::handle_slot_size_change`] when one is due.
    pub fn update_param(&mut self, update: ParamUpdate<K>) {
        match update {
            ParamUpdate::UniqueIds(ids) => {
                self.ledger.retain_ids(&ids);
                self.params.unique_ids = ids;
            }
            ParamUpdate::Keeps(keeps) => self.params.keeps = keeps,
            ParamUpdate::DataPerRow(data_per_row) => self.params.data_per_row = data_per_row,
            ParamUpdate::EstimateSize(estimate_size) => self.params.estimate_size = estimate_size,
            ParamUpdate::Buffer(buffer) => self.params.buffer = buffer,
            ParamUpdate::SlotHeaderSize(size) => self.params.slot_header_size = size,
            ParamUpdate::SlotFooterSize(size) => self.params.slot_footer_size = size,
        }
    }

    /// Classifies the scroll direction, stores the offset, and recomputes the
    /// window when the new position leaves the buffered region.
    pub fn handle_scroll(&mut self, offset: f64) {
        let direction = if offset < self.offset {
            Direction::Front
        } else {
            Direction::Behind
        };
        wtrace!(offset, ?direction, "handle_scroll");
        self.offset = offset;
        self.direction = Some(direction);

        match direction {
            Direction::Front => self.handle_front(),
            Direction::Behind => self.handle_behind(),
        }
    }

    /// Forced recompute for data-source mutations (items inserted/removed).
    ///
    /// The window start is nudged by a small leading buffer along the last
    /// travel direction, then the range is rebuilt unconditionally, since the old
    /// boundaries may be invalid in ways the normal correction does not catch.
    pub fn handle_data_sources_change(&mut self) {
        let mut start = self.range.start;
        match self.direction {
            Some(Direction::Front) => start = start.saturating_sub(LEADING_BUFFER),
            Some(Direction::Behind) => start = start.saturating_add(LEADING_BUFFER),
            None => {}
        }
        start = cmp::min(start, self.params.last_index());

        let end = self.end_for_start(start);
        self.update_range(start, end);
    }

    /// Forced recompute for decoration (header/footer slot) size changes.
    pub fn handle_slot_size_change(&mut self) {
        self.handle_data_sources_change();
    }

    /// Returns all state to what construction produced: empty ledger, zero
    /// offset, unset direction, and a freshly seeded (and emitted) window.
    pub fn reset(&mut self) {
        wdebug!("reset");
        self.ledger = SizeLedger::new();
        self.last_calc_index.set(0);
        self.offset = 0.0;
        self.direction = None;
        self.range = Range::default();
        self.seed_range();
    }

    /// Consumes the engine, discarding all state. Dropping it does the same;
    /// this exists for adapters that want an explicit teardown point.
    pub fn destroy(self) {}

    /// Cumulative pixel distance from the first item to the start of `index`,
    /// in row units (the linear sum is divided by `data_per_row`).
    ///
    /// Unknown sizes substitute the current estimate, so the result converges
    /// as measurements arrive. Offsets are computed on demand over a virtual
    /// sequence and never pre-materialized, since any size can change after
    /// measurement.
    pub fn offset_of_index(&self, index: usize) -> f64 {
        if index == 0 {
            return 0.0;
        }

        let estimate = self.estimated_size();
        let mut offset = 0.0;
        for i in 0..index {
            let size = self
                .params
                .unique_ids
                .get(i)
                .and_then(|id| self.ledger.size_of(id));
            offset += size.unwrap_or(estimate);
        }

        let last_calc = cmp::max(self.last_calc_index.get(), index - 1);
        self.last_calc_index
            .set(cmp::min(last_calc, self.params.last_index()));

        offset / self.data_per_row()
    }

    /// Inverse of [`Engine::offset_of_index`]: the greatest index whose offset
    /// is at or before `offset` (0 for non-positive offsets).
    ///
    /// Uniform lists resolve in O(1) by division; otherwise this binary
    /// searches the monotonically non-decreasing virtual offset sequence.
    pub fn index_of_offset(&self, offset: f64) -> usize {
        if offset <= 0.0 {
            return 0;
        }

        if let Some(fixed) = self.ledger.fixed_size() {
            if fixed > 0.0 {
                // Truncating cast is floor for non-negative values and
                // saturates at usize::MAX.
                return (offset / fixed * self.data_per_row()) as usize;
            }
        }

        let mut low = 0usize;
        let mut high = self.params.total();
        while low <= high {
            let middle = low + (high - low) / 2;
            let middle_offset = self.offset_of_index(middle);
            if middle_offset == offset {
                return middle;
            } else if middle_offset < offset {
                low = middle + 1;
            } else {
                // `middle >= 1` here: offset_of_index(0) == 0 < offset.
                high = middle - 1;
            }
        }

        low.saturating_sub(1)
    }

    /// Corrects a candidate window and applies it when the start moved.
    ///
    /// If everything fits in `keeps` the whole list is the window; a candidate
    /// span that falls short of `keeps` near the tail keeps `end` fixed and
    /// pulls `start` back to a full span.
    pub fn check_range(&mut self, start: usize, end: usize) {
        let keeps = self.params.keeps;
        let total = self.params.total();

        let (start, end) = if total <= keeps {
            (0, self.params.last_index())
        } else if end.saturating_sub(start) < keeps.saturating_sub(1) {
            (end.saturating_add(1).saturating_sub(keeps), end)
        } else {
            (start, end)
        };

        if self.range.start != start {
            self.update_range(start, end);
        }
    }

    fn handle_front(&mut self) {
        let overs = self.scroll_overs();
        // The window already covers the scroll position with margin.
        if overs > self.range.start {
            return;
        }

        let start = overs.saturating_sub(self.params.buffer);
        self.check_range(start, self.end_for_start(start));
    }

    fn handle_behind(&mut self) {
        let overs = self.scroll_overs();
        // Still within the buffered region; skip the recompute.
        if overs < self.range.start + self.params.buffer {
            return;
        }

        self.check_range(overs, self.end_for_start(overs));
    }

    /// How many indices the current offset has scrolled past, net of the
    /// header decoration.
    fn scroll_overs(&self) -> usize {
        self.index_of_offset(self.offset - self.params.slot_header_size)
    }

    fn end_for_start(&self, start: usize) -> usize {
        cmp::min(
            start.saturating_add(self.params.keeps.saturating_sub(1)),
            self.params.last_index(),
        )
    }

    fn seed_range(&mut self) {
        let end = self.end_for_start(0);
        self.update_range(0, end);
    }

    fn update_range(&mut self, start: usize, end: usize) {
        if self.params.unique_ids.is_empty() || self.params.keeps == 0 {
            // Degenerate configuration: report the render-nothing window.
            self.range = Range::default();
            (self.on_range)(self.range);
            return;
        }

        self.range.start = start;
        self.range.end = end;
        self.range.pad_front = self.pad_front();
        self.range.pad_behind = self.pad_behind();
        wtrace!(
            start,
            end,
            pad_front = self.range.pad_front,
            pad_behind = self.range.pad_behind,
            "update_range"
        );
        (self.on_range)(self.range);
    }

    fn pad_front(&self) -> f64 {
        if let Some(fixed) = self.ledger.fixed_size() {
            return fixed * self.range.start as f64 / self.data_per_row();
        }
        self.offset_of_index(self.range.start)
    }

    fn pad_behind(&self) -> f64 {
        let end = self.range.end;
        let last_index = self.params.last_index();
        let remaining = last_index.saturating_sub(end) as f64;

        if let Some(fixed) = self.ledger.fixed_size() {
            return remaining * fixed / self.data_per_row();
        }

        // Once offsets are known all the way to the end, the padding is exact.
        if self.last_calc_index.get() == last_index {
            return self.offset_of_index(last_index) - self.offset_of_index(end);
        }

        remaining * self.estimated_size() / self.data_per_row()
    }

    fn data_per_row(&self) -> f64 {
        cmp::max(self.params.data_per_row, 1) as f64
    }
}

impl<K: LedgerKey> core::fmt::Debug for Engine<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("params", &self.params)
            .field("offset", &self.offset)
            .field("direction", &self.direction)
            .field("range", &self.range)
            .field("last_calc_index", &self.last_calc_index.get())
            .field("recorded", &self.ledger.len())
            .finish()
    }
}
