//! Two-level sparse pixel layer.
//!
//! # Overview
//!
//! A [`SparseGrid`] is an [`OrderedMap`] from x-coordinate to a [`Column`],
//! and each column is an [`OrderedMap`] from y-coordinate to [`Color`].
//! Empty space costs nothing:
//!
//! - a column is created by the first write at its x-coordinate
//! - a column is dropped by the removal that empties it
//!
//! so every column present in the outer map holds at least one cell, and
//! [`SparseGrid::len`] always equals the sum of the column sizes.
//!
//! A region read is a range query on the outer map followed by a range
//! query on every column it returns. Results come column by column, in
//! ascending x and then ascending y.

use std::fmt;

use super::color::Color;
use super::geometry::{BoundingBox, Point, PixelRef};
use crate::map::{InvariantViolation, OrderedMap};

/// All occupied cells of one x-coordinate, keyed by y.
pub type Column = OrderedMap<i32, Color>;

/// Construction options for a [`SparseGrid`].
///
/// # Examples
///
/// ```rust
/// use sparse_raster::grid::{LayerOptions, SparseGrid};
///
/// let layer = SparseGrid::with_options(LayerOptions {
///     name: "Sketch".to_string(),
///     ..LayerOptions::default()
/// });
/// assert_eq!(layer.name(), "Sketch");
/// assert!(layer.is_visible());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerOptions {
    /// Display name of the layer.
    pub name: String,
    /// Whether the layer is shown.
    pub visible: bool,
}

impl LayerOptions {
    /// Name given to layers created without options.
    pub const DEFAULT_NAME: &'static str = "New Layer";
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            visible: true,
        }
    }
}

/// A sparse, unbounded layer of colored pixels.
///
/// Cells are addressed by [`Point`]. Reads hand out references that borrow
/// the layer, so a stale reference can never be observed after a write.
///
/// # Time Complexity
///
/// With `C` occupied columns and at most `R` cells per column:
///
/// | Operation        | Complexity                    |
/// |------------------|-------------------------------|
/// | `get`/`contains` | O(log C + log R)              |
/// | `upsert`         | O(log C + log R)              |
/// | `remove`         | O(log C + log R)              |
/// | `get_region`     | O(log C + c log R + k)        |
/// | `len`            | O(1)                          |
///
/// where `c` is the number of columns inside the region and `k` the number
/// of pixels returned.
///
/// # Examples
///
/// ```rust
/// use sparse_raster::grid::{Color, Point, SparseGrid};
///
/// let mut layer = SparseGrid::new();
/// layer.upsert(Point::new(10, 10), Color::RED);
/// layer.upsert(Point::new(20, 20), Color::GREEN);
///
/// let region = layer.get_region(0, 15, 0, 15);
/// assert_eq!(region.len(), 1);
/// assert_eq!(region[0].location, Point::new(10, 10));
/// assert_eq!(*region[0].value, Color::RED);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseGrid {
    columns: OrderedMap<i32, Column>,
    length: usize,
    name: String,
    visible: bool,
}

impl SparseGrid {
    /// Creates an empty, visible layer named [`LayerOptions::DEFAULT_NAME`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(LayerOptions::default())
    }

    /// Creates an empty layer from `options`.
    #[must_use]
    pub fn with_options(options: LayerOptions) -> Self {
        Self {
            columns: OrderedMap::new(),
            length: 0,
            name: options.name,
            visible: options.visible,
        }
    }

    /// Returns the number of stored pixels.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if no pixel is stored.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the number of occupied columns.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the layer's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the layer.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns `true` if the layer is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the layer.
    pub const fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Returns `true` if a pixel is stored at `location`.
    #[must_use]
    pub fn contains(&self, location: Point) -> bool {
        self.columns
            .get(&location.x)
            .is_some_and(|column| column.contains(&location.y))
    }

    /// Returns the pixel stored at `location`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::grid::{Color, Point, SparseGrid};
    ///
    /// let mut layer = SparseGrid::new();
    /// layer.upsert(Point::new(0, 0), Color::RED);
    /// layer.upsert(Point::new(1, 1), Color::GREEN);
    ///
    /// assert_eq!(layer.len(), 2);
    /// assert_eq!(layer.get(Point::new(0, 0)).map(|pixel| *pixel.value), Some(Color::RED));
    /// assert!(layer.get(Point::new(2, 2)).is_none());
    /// ```
    #[must_use]
    pub fn get(&self, location: Point) -> Option<PixelRef<'_>> {
        let value = self.columns.get(&location.x)?.get(&location.y)?;
        Some(PixelRef { location, value })
    }

    /// Returns a live mutable reference to the color stored at `location`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::grid::{Color, Point, SparseGrid};
    ///
    /// let mut layer = SparseGrid::new();
    /// layer.upsert(Point::new(10, 10), Color::RED);
    /// if let Some(value) = layer.get_mut(Point::new(10, 10)) {
    ///     *value = Color::GREEN;
    /// }
    /// assert_eq!(layer.get(Point::new(10, 10)).map(|pixel| *pixel.value), Some(Color::GREEN));
    /// ```
    pub fn get_mut(&mut self, location: Point) -> Option<&mut Color> {
        self.columns.get_mut(&location.x)?.get_mut(&location.y)
    }

    /// Returns every pixel with `x1 <= x <= x2` and `y1 <= y <= y2`, column
    /// by column. An inverted range on either axis yields no pixels.
    #[must_use]
    pub fn get_region(&self, x1: i32, x2: i32, y1: i32, y2: i32) -> Vec<PixelRef<'_>> {
        if x1 > x2 || y1 > y2 {
            return Vec::new();
        }

        let mut pixels = Vec::new();
        for (x, column) in self.columns.get_range(&x1, &x2) {
            pixels.extend(
                column
                    .get_range(&y1, &y2)
                    .into_iter()
                    .map(|(y, value)| PixelRef {
                        location: Point::new(*x, *y),
                        value,
                    }),
            );
        }
        pixels
    }

    /// Like [`get_region`](Self::get_region), but yields mutable references
    /// into the stored colors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::grid::{Color, Point, SparseGrid};
    ///
    /// let mut layer = SparseGrid::new();
    /// for x in 0..4 {
    ///     layer.upsert(Point::new(x, x), Color::BLACK);
    /// }
    /// for (_, value) in layer.get_region_mut(1, 2, 0, 10) {
    ///     *value = Color::WHITE;
    /// }
    /// assert_eq!(layer.get(Point::new(0, 0)).map(|pixel| *pixel.value), Some(Color::BLACK));
    /// assert_eq!(layer.get(Point::new(2, 2)).map(|pixel| *pixel.value), Some(Color::WHITE));
    /// ```
    pub fn get_region_mut(
        &mut self,
        x1: i32,
        x2: i32,
        y1: i32,
        y2: i32,
    ) -> Vec<(Point, &mut Color)> {
        if x1 > x2 || y1 > y2 {
            return Vec::new();
        }

        let mut pixels = Vec::new();
        for (x, column) in self.columns.get_range_mut(&x1, &x2) {
            let x = *x;
            pixels.extend(
                column
                    .get_range_mut(&y1, &y2)
                    .into_iter()
                    .map(|(y, value)| (Point::new(x, *y), value)),
            );
        }
        pixels
    }

    /// Returns every pixel inside `area`. An empty box yields no pixels.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::grid::{BoundingBox, Color, Point, SparseGrid};
    ///
    /// let mut layer = SparseGrid::new();
    /// layer.upsert(Point::new(1, 1), Color::RED);
    /// layer.upsert(Point::new(9, 9), Color::GREEN);
    /// layer.upsert(Point::new(15, 15), Color::BLUE);
    ///
    /// assert_eq!(layer.get_box(BoundingBox::new(0, 0, 10, 10)).len(), 2);
    /// ```
    #[must_use]
    pub fn get_box(&self, area: BoundingBox) -> Vec<PixelRef<'_>> {
        if area.is_empty() {
            return Vec::new();
        }
        self.get_region(area.left(), area.right(), area.top(), area.bottom())
    }

    /// Iterates over every stored pixel, in ascending x and then ascending y.
    pub fn pixels(&self) -> impl Iterator<Item = PixelRef<'_>> {
        self.columns.iter().flat_map(|(x, column)| {
            column.iter().map(move |(y, value)| PixelRef {
                location: Point::new(*x, *y),
                value,
            })
        })
    }

    /// Removes every pixel and column.
    pub fn clear(&mut self) {
        tracing::debug!(layer = %self.name, cells = self.length, "clearing layer");
        self.columns.clear();
        self.length = 0;
    }

    /// Overwrites the pixel at `location` and returns its previous color.
    /// Does nothing when no pixel is stored there.
    pub fn update(&mut self, location: Point, value: Color) -> Option<Color> {
        self.columns
            .get_mut(&location.x)?
            .update(&location.y, value)
    }

    /// Stores `value` at `location` and returns the color it replaced, if
    /// any. Only a write to an empty cell changes [`len`](Self::len).
    pub fn upsert(&mut self, location: Point, value: Color) -> Option<Color> {
        if let Some(column) = self.columns.get_mut(&location.x) {
            let previous = column.upsert(location.y, value);
            if previous.is_none() {
                self.length += 1;
            }
            return previous;
        }

        let mut column = Column::new();
        column.upsert(location.y, value);
        self.columns.upsert(location.x, column);
        self.length += 1;
        tracing::trace!(layer = %self.name, x = location.x, "column created");
        None
    }

    /// Removes the pixel at `location` and returns its color. A column left
    /// without cells is dropped from the layer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::grid::{Color, Point, SparseGrid};
    ///
    /// let mut layer = SparseGrid::new();
    /// layer.upsert(Point::new(5, 5), Color::RED);
    /// assert_eq!(layer.remove(Point::new(5, 5)), Some(Color::RED));
    /// assert_eq!(layer.len(), 0);
    /// assert_eq!(layer.column_count(), 0);
    /// ```
    pub fn remove(&mut self, location: Point) -> Option<Color> {
        let column = self.columns.get_mut(&location.x)?;
        let removed = column.remove(&location.y)?;
        let emptied = column.is_empty();
        self.length -= 1;

        if emptied {
            self.columns.remove(&location.x);
            tracing::trace!(layer = %self.name, x = location.x, "column dropped");
        }
        Some(removed)
    }

    /// Renders the layer header, the shape of the column tree and the shape
    /// of every column tree, for debugging.
    pub fn render_structure(&self) -> String {
        StructureDump(self).to_string()
    }

    /// Verifies both tree levels, that no column is empty, and that the
    /// recorded pixel count matches the columns.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.columns.check_invariants()?;

        let mut cells = 0;
        for (x, column) in &self.columns {
            if column.is_empty() {
                return Err(InvariantViolation::EmptyColumn { x: *x });
            }
            column.check_invariants()?;
            cells += column.len();
        }

        if cells != self.length {
            return Err(InvariantViolation::LengthMismatch {
                expected: self.length,
                actual: cells,
            });
        }
        Ok(())
    }
}

/// Debug dump of a layer and both levels of its tree structure.
struct StructureDump<'a>(&'a SparseGrid);

impl fmt::Display for StructureDump<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layer = self.0;
        writeln!(formatter, "Layer: {}", layer.name)?;
        writeln!(formatter, "Pixel Count: {}", layer.length)?;
        writeln!(formatter, "Visible: {}", layer.visible)?;
        writeln!(formatter)?;
        writeln!(formatter, "====================================")?;
        writeln!(formatter)?;
        writeln!(formatter, "Pixel Data [Columns]:")?;
        writeln!(
            formatter,
            "{}",
            layer.columns.render_structure(|x| format!("x={x}"))
        )?;
        writeln!(formatter, "Pixel Data [Per Column]:")?;
        for (x, column) in &layer.columns {
            writeln!(formatter, "Column x={x} [size={}]:", column.len())?;
            writeln!(
                formatter,
                "{}",
                column.render_structure(|y| format!("y={y}"))
            )?;
        }
        Ok(())
    }
}

impl Default for SparseGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<(Point, Color)> for SparseGrid {
    fn extend<I: IntoIterator<Item = (Point, Color)>>(&mut self, iter: I) {
        for (location, value) in iter {
            self.upsert(location, value);
        }
    }
}

impl FromIterator<(Point, Color)> for SparseGrid {
    fn from_iter<I: IntoIterator<Item = (Point, Color)>>(iter: I) -> Self {
        let mut grid = Self::new();
        grid.extend(iter);
        grid
    }
}

static_assertions::assert_impl_all!(SparseGrid: Send, Sync, Clone);
