#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A hash map implementation using hopscotch hashing.
///
/// This module provides a `HopscotchMap` that wraps the `HopscotchTable`
/// and provides a standard key-value map interface with configurable
/// hashers.
pub mod map;

/// A hash set implementation using hopscotch hashing.
///
/// This module provides a `HopscotchSet` that wraps the `HopscotchTable`
/// and provides a standard set interface with configurable hashers.
pub mod set;

pub mod table;

pub use map::Entry;
pub use map::HopscotchMap;
pub use set::HopscotchSet;
pub use table::HopscotchTable;
