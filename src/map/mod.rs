//! Mutable ordered map.
//!
//! This module provides [`OrderedMap`], an ordered key/value map backed by
//! an AVL tree whose nodes live in an arena.
//!
//! - O(log N) point lookup, insert-or-update and removal
//! - O(log N + k) inclusive range queries (O(log N + k log k) for the
//!   mutable form)
//! - O(1) `len` and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use sparse_raster::map::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.upsert(20, "twenty");
//! map.upsert(10, "ten");
//! map.upsert(30, "thirty");
//!
//! // Range queries are inclusive on both ends
//! let range = map.get_range(&10, &20);
//! assert_eq!(range, vec![(&10, &"ten"), (&20, &"twenty")]);
//!
//! // Inverted ranges are empty rather than an error
//! assert!(map.get_range(&30, &10).is_empty());
//! ```

mod error;
mod iter;
mod node;
mod ordered_map;

pub use error::InvariantViolation;
pub use iter::OrderedMapIterator;
pub use ordered_map::OrderedMap;
