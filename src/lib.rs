#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A HashMap implementation on top of the linear-probing table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a key-value map interface for keys implementing `HashKey`.
pub mod hash_map;

/// The linear-probing engine shared by the map and the set.
pub mod hash_table;

/// A hash set implementation on top of the linear-probing table.
///
/// This module provides a `HashSet` with an order-independent aggregate hash
/// and set algebra. Sets are themselves usable as keys.
pub mod hash_set;

/// User-defined key hashing and equality.
pub mod key;

pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
#[cfg(feature = "stats")]
pub use hash_table::DebugStats;
pub use hash_table::HashTable;
pub use key::Bytes;
pub use key::HashKey;
pub use key::KeyHasher;
pub use key::hash_bytes;
pub use key::hash_u64;
