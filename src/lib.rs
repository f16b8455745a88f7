//! # sparse-raster
//!
//! A sparse, unbounded two-dimensional pixel store built from a
//! self-balancing ordered map.
//!
//! ## Overview
//!
//! - **Ordered Map**: [`map::OrderedMap`], a mutable AVL tree map with
//!   inclusive range queries and borrow-checked live references
//! - **Sparse Grid**: [`grid::SparseGrid`], a two-level composition of
//!   ordered maps (x to column, y to color) that allocates nothing for
//!   empty space
//!
//! ## Feature Flags
//!
//! - `map`: the ordered map
//! - `grid`: the sparse grid (implies `map`)
//!
//! Both are enabled by default.
//!
//! ## Logging
//!
//! Column lifecycle and layer clears are reported through [`tracing`] at
//! `trace` and `debug` level. Install a subscriber to see them.
//!
//! ## Example
//!
//! ```rust
//! use sparse_raster::prelude::*;
//!
//! let mut layer = SparseGrid::new();
//! layer.upsert(Point::new(10, 10), Color::RED);
//! layer.upsert(Point::new(20, 20), Color::GREEN);
//!
//! let visible: Vec<Pixel> = layer
//!     .get_box(BoundingBox::new(0, 0, 16, 16))
//!     .into_iter()
//!     .map(Pixel::from)
//!     .collect();
//! assert_eq!(visible, vec![Pixel::new(Point::new(10, 10), Color::RED)]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use sparse_raster::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "map")]
    pub use crate::map::*;

    #[cfg(feature = "grid")]
    pub use crate::grid::*;
}

#[cfg(feature = "map")]
pub mod map;

#[cfg(feature = "grid")]
pub mod grid;
