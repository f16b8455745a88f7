#![cfg(feature = "grid")]
//! Property-based tests for SparseGrid.
//!
//! A `BTreeMap<(x, y), Color>` serves as the model; after every operation
//! the grid must agree with it and hold no empty column.

use proptest::prelude::*;
use sparse_raster::grid::{BoundingBox, Color, Point, SparseGrid};
use std::collections::BTreeMap;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

#[derive(Clone, Debug)]
enum Operation {
    Upsert(Point, Color),
    Update(Point, Color),
    Remove(Point),
    Clear,
}

/// Coordinates from a small window so that columns fill up and empty out.
fn location() -> impl Strategy<Value = Point> {
    (-8i32..8, -8i32..8).prop_map(|(x, y)| Point::new(x, y))
}

fn color() -> impl Strategy<Value = Color> {
    any::<[u8; 4]>().prop_map(|[red, green, blue, alpha]| Color::rgba(red, green, blue, alpha))
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        6 => (location(), color()).prop_map(|(location, value)| Operation::Upsert(location, value)),
        2 => (location(), color()).prop_map(|(location, value)| Operation::Update(location, value)),
        5 => location().prop_map(Operation::Remove),
        1 => Just(Operation::Clear),
    ]
}

fn arbitrary_grid(max_size: usize) -> impl Strategy<Value = SparseGrid> {
    prop::collection::vec((location(), color()), 0..max_size)
        .prop_map(|cells| cells.into_iter().collect::<SparseGrid>())
}

type Model = BTreeMap<(i32, i32), Color>;

fn apply(grid: &mut SparseGrid, model: &mut Model, operation: &Operation) {
    match *operation {
        Operation::Upsert(location, value) => {
            assert_eq!(
                grid.upsert(location, value),
                model.insert((location.x, location.y), value)
            );
        }
        Operation::Update(location, value) => {
            let expected = model
                .get_mut(&(location.x, location.y))
                .map(|slot| std::mem::replace(slot, value));
            assert_eq!(grid.update(location, value), expected);
        }
        Operation::Remove(location) => {
            assert_eq!(
                grid.remove(location),
                model.remove(&(location.x, location.y))
            );
        }
        Operation::Clear => {
            grid.clear();
            model.clear();
        }
    }
}

// =============================================================================
// Model Laws
// =============================================================================

proptest! {
    /// Law: after any operation sequence the grid holds exactly the model's
    /// cells, its size matches, and no column is empty.
    #[test]
    fn prop_operations_match_model(
        operations in prop::collection::vec(operation(), 0..200)
    ) {
        let mut grid = SparseGrid::new();
        let mut model = Model::new();

        for operation in &operations {
            apply(&mut grid, &mut model, operation);
            prop_assert_eq!(grid.check_invariants(), Ok(()));
            prop_assert_eq!(grid.len(), model.len());
        }

        let cells: Vec<((i32, i32), Color)> = grid
            .pixels()
            .map(|pixel| ((pixel.location.x, pixel.location.y), *pixel.value))
            .collect();
        let expected: Vec<((i32, i32), Color)> = model.into_iter().collect();
        prop_assert_eq!(cells, expected);
    }

    /// Law: the number of columns equals the number of distinct x values.
    #[test]
    fn prop_column_count_matches_distinct_x(grid in arbitrary_grid(64)) {
        let mut xs: Vec<i32> = grid.pixels().map(|pixel| pixel.location.x).collect();
        xs.dedup();
        prop_assert_eq!(grid.column_count(), xs.len());
    }
}

// =============================================================================
// Region Laws
// =============================================================================

proptest! {
    /// Law: a region read returns exactly the stored pixels inside the box.
    #[test]
    fn prop_region_matches_filter(
        grid in arbitrary_grid(64),
        x1 in -10i32..10,
        x2 in -10i32..10,
        y1 in -10i32..10,
        y2 in -10i32..10
    ) {
        let region: Vec<Point> = grid
            .get_region(x1, x2, y1, y2)
            .into_iter()
            .map(|pixel| pixel.location)
            .collect();
        let expected: Vec<Point> = grid
            .pixels()
            .map(|pixel| pixel.location)
            .filter(|location| {
                x1 <= location.x && location.x <= x2 && y1 <= location.y && location.y <= y2
            })
            .collect();
        prop_assert_eq!(region, expected);
    }

    /// Law: a box read equals the region read of its edges.
    #[test]
    fn prop_box_matches_region(
        grid in arbitrary_grid(64),
        left in -10i32..10,
        top in -10i32..10,
        width in -2i32..12,
        height in -2i32..12
    ) {
        let area = BoundingBox::new(left, top, width, height);
        let boxed = grid.get_box(area);
        if area.is_empty() {
            prop_assert!(boxed.is_empty());
        } else {
            prop_assert_eq!(
                boxed,
                grid.get_region(area.left(), area.right(), area.top(), area.bottom())
            );
        }
    }

    /// Law: contains holds exactly when get returns a pixel.
    #[test]
    fn prop_contains_iff_get(grid in arbitrary_grid(64), probe in location()) {
        prop_assert_eq!(grid.contains(probe), grid.get(probe).is_some());
    }
}

// =============================================================================
// Copy Laws
// =============================================================================

proptest! {
    /// Law: a copy is unaffected by later writes to its source.
    #[test]
    fn prop_copy_is_independent(
        grid in arbitrary_grid(64),
        operations in prop::collection::vec(operation(), 1..50)
    ) {
        let mut source = grid;
        let copy = source.clone();
        let snapshot: Vec<(Point, Color)> = copy
            .pixels()
            .map(|pixel| (pixel.location, *pixel.value))
            .collect();

        for operation in &operations {
            match *operation {
                Operation::Upsert(location, value) => { source.upsert(location, value); }
                Operation::Update(location, value) => { source.update(location, value); }
                Operation::Remove(location) => { source.remove(location); }
                Operation::Clear => source.clear(),
            }
        }

        let after: Vec<(Point, Color)> = copy
            .pixels()
            .map(|pixel| (pixel.location, *pixel.value))
            .collect();
        prop_assert_eq!(after, snapshot);
        prop_assert_eq!(copy.check_invariants(), Ok(()));
    }
}
