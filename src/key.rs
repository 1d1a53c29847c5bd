#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type SizeMap<K> = HashMap<K, f64>;
#[cfg(not(feature = "std"))]
pub(crate) type SizeMap<K> = BTreeMap<K, f64>;

#[cfg(feature = "std")]
#[doc(hidden)]
pub trait LedgerKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq> LedgerKey for K {}

#[cfg(not(feature = "std"))]
#[doc(hidden)]
pub trait LedgerKey: Ord {}
#[cfg(not(feature = "std"))]
impl<K: Ord> LedgerKey for K {}
