/// Scroll travel direction along the list axis.
///
/// `Front` is toward the start of the list (scroll up/left), `Behind` toward
/// the end (scroll down/right). An unchanged offset classifies as `Behind` by
/// convention; there is no "stationary" state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Front,
    Behind,
}

/// A snapshot of the mounted window: inclusive index bounds plus the pixel
/// paddings that stand in for the unmounted items before and after it.
///
/// Snapshots are plain values; retaining one never observes later engine
/// mutations.
///
/// When the identity list is empty (or `keeps` is zero) the engine reports the
/// degenerate window `{start: 0, end: 0, pad_front: 0.0, pad_behind: 0.0}`;
/// callers render the intersection of `start..=end` with their data, which is
/// nothing in that case.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub start: usize,
    pub end: usize,
    pub pad_front: f64,
    pub pad_behind: f64,
}

pub type ItemId = u64;
