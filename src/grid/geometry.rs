//! Coordinates, rectangles and pixel views.

use super::color::Color;

/// An integer coordinate on the unbounded canvas plane.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct Point {
    /// Horizontal coordinate, selects the column.
    pub x: i32,
    /// Vertical coordinate, selects the cell within a column.
    pub y: i32,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned rectangle of whole cells with inclusive edges.
///
/// A box built from `left`, `top`, `width` and `height` covers columns
/// `left..=left + width - 1` and rows `top..=top + height - 1`. A box with
/// a non-positive width or height is empty.
///
/// # Examples
///
/// ```rust
/// use sparse_raster::grid::{BoundingBox, Point};
///
/// let area = BoundingBox::new(0, 0, 10, 10);
/// assert_eq!(area.right(), 9);
/// assert_eq!(area.bottom(), 9);
/// assert!(area.contains(Point::new(9, 0)));
/// assert!(!area.contains(Point::new(10, 0)));
///
/// assert!(BoundingBox::new(5, 5, 0, 3).is_empty());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BoundingBox {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl BoundingBox {
    /// A box containing no cells.
    pub const EMPTY: Self = Self {
        left: 0,
        top: 0,
        right: -1,
        bottom: -1,
    };

    /// A box covering the whole plane.
    pub const EVERYTHING: Self = Self {
        left: i32::MIN,
        top: i32::MIN,
        right: i32::MAX,
        bottom: i32::MAX,
    };

    /// Creates a box from its top-left cell and its size in cells.
    ///
    /// Edges that would fall outside the `i32` range are clamped to it.
    #[must_use]
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        if width <= 0 || height <= 0 {
            return Self::EMPTY;
        }
        Self {
            left,
            top,
            right: far_edge(left, width),
            bottom: far_edge(top, height),
        }
    }

    /// Creates a box spanning two inclusive corners. The box is empty when
    /// `bottom_right` lies left of or above `top_left`.
    #[must_use]
    pub const fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self {
            left: top_left.x,
            top: top_left.y,
            right: bottom_right.x,
            bottom: bottom_right.y,
        }
    }

    /// Leftmost covered column.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.left
    }

    /// Topmost covered row.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.top
    }

    /// Rightmost covered column.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.right
    }

    /// Bottommost covered row.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Number of covered columns.
    #[must_use]
    pub fn width(&self) -> u64 {
        span(self.left, self.right)
    }

    /// Number of covered rows.
    #[must_use]
    pub fn height(&self) -> u64 {
        span(self.top, self.bottom)
    }

    /// Returns `true` if the box covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// Returns `true` if `point` lies inside the box.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        self.left <= point.x && point.x <= self.right && self.top <= point.y && point.y <= self.bottom
    }
}

fn far_edge(start: i32, extent: i32) -> i32 {
    let edge = i64::from(start) + i64::from(extent) - 1;
    i32::try_from(edge).unwrap_or(i32::MAX)
}

fn span(low: i32, high: i32) -> u64 {
    u64::try_from(i64::from(high) - i64::from(low) + 1).unwrap_or(0)
}

/// An owned copy of a stored cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pixel {
    /// Cell coordinate.
    pub location: Point,
    /// Stored color.
    pub value: Color,
}

impl Pixel {
    /// Creates a pixel.
    #[must_use]
    pub const fn new(location: Point, value: Color) -> Self {
        Self { location, value }
    }
}

/// A borrowed view of a stored cell.
///
/// The view borrows the grid it came from, so the grid cannot be mutated
/// while the view is alive.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PixelRef<'a> {
    /// Cell coordinate.
    pub location: Point,
    /// Reference into the grid's storage.
    pub value: &'a Color,
}

impl PixelRef<'_> {
    /// Copies the cell out of the grid.
    #[must_use]
    pub const fn to_pixel(&self) -> Pixel {
        Pixel::new(self.location, *self.value)
    }
}

impl From<PixelRef<'_>> for Pixel {
    fn from(pixel: PixelRef<'_>) -> Self {
        pixel.to_pixel()
    }
}
