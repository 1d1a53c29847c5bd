//! A headless windowing and size-estimation engine for very long scrollable lists.
//!
//! Instead of mounting every item of a huge list, a UI keeps a small contiguous
//! window mounted and pads the scrollable surface before and after it so the
//! scrollbar behaves as if everything were present. The hard part is range
//! computation: item sizes are unknown until each item has actually been
//! rendered once, sizes trickle in asynchronously, the scroll offset changes
//! every frame, and the data source itself mutates.
//!
//! This crate is that computation and nothing else. It is UI-agnostic; an
//! adapter layer is expected to provide:
//! - per-item measured sizes, keyed by stable item identity
//! - the current scroll offset
//! - notifications when the identity set or decoration sizes change
//!
//! In return the engine emits `{start, end, pad_front, pad_behind}` snapshots
//! through a synchronous callback whenever the window changes.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod engine;
mod key;
mod ledger;
mod params;
mod types;


pub use engine::Engine;
pub use params::{EngineParams, OnRangeChanged, ParamUpdate};
pub use types::{Direction, ItemId, Range};

#[doc(hidden)]
pub use key::LedgerKey;
