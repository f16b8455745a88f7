//! Sparse pixel layers.
//!
//! This module provides [`SparseGrid`], a coordinate-to-color index over an
//! unbounded plane that stores only occupied cells, together with its value
//! types:
//!
//! - [`Point`]: integer cell coordinate
//! - [`Color`]: RGBA payload
//! - [`BoundingBox`]: inclusive rectangular region
//! - [`Pixel`] / [`PixelRef`]: owned and borrowed views of a stored cell
//!
//! # Examples
//!
//! ```rust
//! use sparse_raster::grid::{Color, Point, SparseGrid};
//!
//! let mut layer = SparseGrid::new();
//! layer.upsert(Point::new(-1_000_000, 42), Color::RED);
//! layer.upsert(Point::new(1_000_000, 42), Color::BLUE);
//!
//! // Only the two occupied columns are allocated
//! assert_eq!(layer.len(), 2);
//! assert_eq!(layer.column_count(), 2);
//!
//! // Emptying a column releases it
//! layer.remove(Point::new(-1_000_000, 42));
//! assert_eq!(layer.column_count(), 1);
//! ```

mod color;
mod geometry;
mod sparse_grid;

pub use color::{Color, ColorParseError};
pub use geometry::{BoundingBox, Pixel, PixelRef, Point};
pub use sparse_grid::{Column, LayerOptions, SparseGrid};
