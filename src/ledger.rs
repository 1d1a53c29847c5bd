use crate::key::{LedgerKey, SizeMap};

/// How offsets can be computed from the sizes observed so far.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum CalcMode {
    /// No size recorded yet.
    Uninit,
    /// Every size recorded so far equals this value; O(1) offset arithmetic
    /// applies. Leaving this mode is permanent.
    Uniform(f64),
    /// At least one size differed from the first; offsets need summation or
    /// binary search over estimates.
    Variable,
}

/// Running average of the sizes observed while the ledger is still within the
/// first window.
///
/// The original engine tracked this with deletable fields; the tagged state
/// makes "is it still accumulating" a checked branch instead of a presence
/// check. Once frozen the value never changes, even if the same identities are
/// re-measured later.
#[derive(Clone, Copy, Debug, PartialEq)]
enum FirstWindowAverage {
    Accumulating { sum: f64, count: usize },
    Frozen(f64),
}

/// Last known rendered size per item identity, plus the uniform/variable
/// classification and the first-window average used for estimation.
pub(crate) struct SizeLedger<K> {
    sizes: SizeMap<K>,
    mode: CalcMode,
    first_window: FirstWindowAverage,
}

impl<K: LedgerKey> SizeLedger<K> {
    pub(crate) fn new() -> Self {
        Self {
            sizes: SizeMap::new(),
            mode: CalcMode::Uninit,
            first_window: FirstWindowAverage::Accumulating { sum: 0.0, count: 0 },
        }
    }

    /// Stores (or overwrites) the measured size for `id`.
    ///
    /// `first_window_len` is `min(keeps, total_items)`: once that many
    /// identities have been recorded the running average freezes for good.
    pub(crate) fn record(&mut self, id: K, size: f64, first_window_len: usize) {
        let prev = self.sizes.insert(id, size);

        match self.mode {
            CalcMode::Uninit => {
                // Assume a uniform list until a differing size proves otherwise.
                self.mode = CalcMode::Uniform(size);
                return;
            }
            CalcMode::Uniform(fixed) => {
                if fixed == size {
                    return;
                }
                self.mode = CalcMode::Variable;
                // Uniform-phase entries never touched the accumulator; fold
                // the whole map in once so they count toward the average.
                if let FirstWindowAverage::Accumulating { .. } = self.first_window {
                    self.rebuild_accumulator();
                    self.maybe_freeze(first_window_len);
                }
                return;
            }
            CalcMode::Variable => {}
        }

        if let FirstWindowAverage::Accumulating { sum, count } = &mut self.first_window {
            match prev {
                // Re-measuring an identity replaces its contribution.
                Some(old) => *sum += size - old,
                None => {
                    *sum += size;
                    *count += 1;
                }
            }
            self.maybe_freeze(first_window_len);
        }
    }

    pub(crate) fn size_of(&self, id: &K) -> Option<f64> {
        self.sizes.get(id).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.sizes.len()
    }

    pub(crate) fn mode(&self) -> CalcMode {
        self.mode
    }

    /// The fixed item size, when the list is still classified as uniform.
    pub(crate) fn fixed_size(&self) -> Option<f64> {
        match self.mode {
            CalcMode::Uniform(fixed) => Some(fixed),
            _ => None,
        }
    }

    /// The size substituted for items that have not been measured yet.
    ///
    /// Uniform lists use the fixed size. Variable lists use the first-window
    /// average once anything has been accumulated; until then (and for a
    /// useless all-zero average) the caller-configured default applies.
    pub(crate) fn estimated_size(&self, default: f64) -> f64 {
        match self.mode {
            CalcMode::Uniform(fixed) => fixed,
            CalcMode::Uninit | CalcMode::Variable => {
                let average = match self.first_window {
                    FirstWindowAverage::Frozen(average) => average,
                    FirstWindowAverage::Accumulating { sum, count } if count > 0 => {
                        round_to_pixel(sum / count as f64)
                    }
                    FirstWindowAverage::Accumulating { .. } => 0.0,
                };
                if average > 0.0 { average } else { default }
            }
        }
    }

    /// Drops entries whose identity no longer appears in `ids`.
    ///
    /// Called when the data source is replaced or filtered, so stale
    /// measurements cannot leak into offset estimation.
    pub(crate) fn retain_ids(&mut self, ids: &[K]) {
        self.sizes.retain(|id, _| ids.contains(id));
        // A still-accumulating average must only cover surviving entries.
        if let FirstWindowAverage::Accumulating { .. } = self.first_window {
            self.rebuild_accumulator();
        }
    }

    fn rebuild_accumulator(&mut self) {
        self.first_window = FirstWindowAverage::Accumulating {
            sum: self.sizes.values().sum(),
            count: self.sizes.len(),
        };
    }

    fn maybe_freeze(&mut self, first_window_len: usize) {
        if let FirstWindowAverage::Accumulating { sum, count } = self.first_window {
            if count > 0 && count >= first_window_len {
                self.first_window = FirstWindowAverage::Frozen(round_to_pixel(sum / count as f64));
            }
        }
    }
}

/// Round-half-up to whole pixels. Sizes are non-negative, so a truncating
/// cast doubles as `floor` without pulling in std float intrinsics.
fn round_to_pixel(value: f64) -> f64 {
    (value + 0.5) as u64 as f64
}
