//! Touch surface geometry and the numpad overlay.
//!
//! The surface is split into a 4×5 grid of half-open key cells. The toggle
//! hotspot is a closed rectangle over the top-right 20% × 25% corner and
//! overlaps the two upper `backspace` cells.
//!
//! Cell and hotspot edges are rounded so that testing an integer coordinate
//! against them gives the same answer as testing it against the exact
//! fractional edge.

use std::ops::{Range, RangeInclusive};

use crate::error::GeometryError;
use crate::key::KeySymbol;

/// Grid dimensions
pub const ROWS: usize = 4;
pub const COLS: usize = 5;

/// Hotspot size as a fraction of the surface: numerator / denominator
const HOTSPOT_WIDTH: (i64, i64) = (1, 5);
const HOTSPOT_HEIGHT: (i64, i64) = (1, 4);

/// Cell symbols, row 0 at the top edge of the pad
const GRID: [[KeySymbol; COLS]; ROWS] = {
    use KeySymbol::*;
    [
        [Seven, Eight, Nine, Slash, Backspace],
        [Four, Five, Six, Asterisk, Backspace],
        [One, Two, Three, Minus, Percent],
        [Zero, Dot, Enter, Plus, Equal],
    ]
};

/// Coordinate range reported by the touch device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceGeometry {
    x_min: i32,
    x_max: i32,
    y_min: i32,
    y_max: i32,
}

impl DeviceGeometry {
    /// Validate and build a geometry. Both axes must have `max > min`.
    pub fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Result<Self, GeometryError> {
        if x_max <= x_min {
            return Err(GeometryError::Degenerate {
                axis: "x",
                min: x_min,
                max: x_max,
            });
        }
        if y_max <= y_min {
            return Err(GeometryError::Degenerate {
                axis: "y",
                min: y_min,
                max: y_max,
            });
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    pub fn x_min(&self) -> i32 {
        self.x_min
    }

    pub fn x_max(&self) -> i32 {
        self.x_max
    }

    pub fn y_min(&self) -> i32 {
        self.y_min
    }

    pub fn y_max(&self) -> i32 {
        self.y_max
    }

    pub fn width(&self) -> i64 {
        self.x_max as i64 - self.x_min as i64
    }

    pub fn height(&self) -> i64 {
        self.y_max as i64 - self.y_min as i64
    }
}

/// A key cell: `[x.start, x.end) × [y.start, y.end)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRect {
    pub x: Range<i32>,
    pub y: Range<i32>,
    pub symbol: KeySymbol,
}

impl KeyRect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x.contains(&x) && self.y.contains(&y)
    }
}

/// The toggle corner: closed on all sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotspotRect {
    pub x: RangeInclusive<i32>,
    pub y: RangeInclusive<i32>,
}

impl HotspotRect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x.contains(&x) && self.y.contains(&y)
    }
}

/// Key cells plus hotspot for one device
#[derive(Debug, Clone)]
pub struct Layout {
    geometry: DeviceGeometry,
    keys: Vec<KeyRect>,
    hotspot: HotspotRect,
}

impl Layout {
    /// Build the overlay for `geometry`
    pub fn new(geometry: DeviceGeometry) -> Self {
        let width = geometry.width();
        let height = geometry.height();

        let col_edge = |i: usize| offset(geometry.x_min, ceil_div(i as i64 * width, COLS as i64));
        let row_edge =
            |i: usize| offset(geometry.y_min, ceil_div(i as i64 * height, ROWS as i64));

        let mut keys = Vec::with_capacity(ROWS * COLS);
        for (row, symbols) in GRID.iter().enumerate() {
            for (col, &symbol) in symbols.iter().enumerate() {
                keys.push(KeyRect {
                    x: col_edge(col)..col_edge(col + 1),
                    y: row_edge(row)..row_edge(row + 1),
                    symbol,
                });
            }
        }

        let (wn, wd) = HOTSPOT_WIDTH;
        let (hn, hd) = HOTSPOT_HEIGHT;
        // Left edge at 80% of the width, rounded up; bottom edge at 25%, rounded down
        let hot_x_start = offset(geometry.x_min, ceil_div((wd - wn) * width, wd));
        let hot_y_end = offset(geometry.y_min, hn * height / hd);
        let hotspot = HotspotRect {
            x: hot_x_start..=geometry.x_max,
            y: geometry.y_min..=hot_y_end,
        };

        Self {
            geometry,
            keys,
            hotspot,
        }
    }

    pub fn geometry(&self) -> &DeviceGeometry {
        &self.geometry
    }

    /// Key cells in row-major order, top row first
    pub fn keys(&self) -> &[KeyRect] {
        &self.keys
    }

    pub fn hotspot(&self) -> &HotspotRect {
        &self.hotspot
    }

    /// Symbol of the first cell containing `(x, y)`
    pub fn hit_test(&self, x: i32, y: i32) -> Option<KeySymbol> {
        self.keys
            .iter()
            .find(|rect| rect.contains(x, y))
            .map(|rect| rect.symbol)
    }

    pub fn in_hotspot(&self, x: i32, y: i32) -> bool {
        self.hotspot.contains(x, y)
    }
}

fn ceil_div(n: i64, d: i64) -> i64 {
    (n + d - 1) / d
}

/// `base + delta`, where delta never exceeds the axis extent
fn offset(base: i32, delta: i64) -> i32 {
    (base as i64 + delta) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn layout(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Layout {
        Layout::new(DeviceGeometry::new(x_min, x_max, y_min, y_max).unwrap())
    }

    #[test]
    fn test_rejects_degenerate_geometry() {
        assert!(DeviceGeometry::new(0, 0, 0, 10).is_err());
        assert!(DeviceGeometry::new(0, 10, 5, 4).is_err());
        assert_eq!(
            DeviceGeometry::new(10, 3, 0, 1),
            Err(GeometryError::Degenerate {
                axis: "x",
                min: 10,
                max: 3
            })
        );
    }

    #[test]
    fn test_cell_count_and_symbols() {
        let l = layout(0, 1000, 0, 600);
        assert_eq!(l.keys().len(), ROWS * COLS);
        let distinct: HashSet<_> = l.keys().iter().map(|k| k.symbol).collect();
        assert_eq!(distinct.len(), KeySymbol::ALL.len());
        let backspaces = l
            .keys()
            .iter()
            .filter(|k| k.symbol == KeySymbol::Backspace)
            .count();
        assert_eq!(backspaces, 2);
    }

    #[test]
    fn test_cells_tile_surface() {
        for (x_min, x_max, y_min, y_max) in [(0, 1000, 0, 600), (-37, 1283, 5, 911), (0, 7, 0, 3)] {
            let l = layout(x_min, x_max, y_min, y_max);
            for x in (x_min..x_max).step_by(((x_max - x_min) / 97).max(1) as usize) {
                for y in (y_min..y_max).step_by(((y_max - y_min) / 53).max(1) as usize) {
                    let hits = l.keys().iter().filter(|k| k.contains(x, y)).count();
                    assert_eq!(hits, 1, "({x}, {y}) covered {hits} times");
                }
            }
            // Max edges are outside the half-open grid
            assert_eq!(l.hit_test(x_max, y_min), None);
            assert_eq!(l.hit_test(x_min, y_max), None);
        }
    }

    #[test]
    fn test_last_row_and_column_reach_max() {
        let l = layout(3, 1004, -10, 591);
        let last = l.keys().last().unwrap();
        assert_eq!(last.x.end, 1004);
        assert_eq!(last.y.end, 591);
        assert_eq!(last.symbol, KeySymbol::Equal);
    }

    #[test]
    fn test_cell_centers() {
        let l = layout(0, 1000, 0, 600);
        assert_eq!(l.hit_test(100, 75), Some(KeySymbol::Seven));
        assert_eq!(l.hit_test(300, 225), Some(KeySymbol::Five));
        assert_eq!(l.hit_test(500, 225), Some(KeySymbol::Six));
        assert_eq!(l.hit_test(900, 375), Some(KeySymbol::Percent));
        assert_eq!(l.hit_test(100, 500), Some(KeySymbol::Zero));
        assert_eq!(l.hit_test(500, 525), Some(KeySymbol::Enter));
    }

    #[test]
    fn test_boundary_goes_to_next_cell() {
        let l = layout(0, 1000, 0, 600);
        // col_width = 200
        assert_eq!(l.hit_test(199, 50), Some(KeySymbol::Seven));
        assert_eq!(l.hit_test(200, 50), Some(KeySymbol::Eight));
        assert_eq!(l.hit_test(999, 500), Some(KeySymbol::Equal));
        // row_height = 150
        assert_eq!(l.hit_test(0, 150), Some(KeySymbol::Four));
    }

    #[test]
    fn test_fractional_edges_round_like_exact_division() {
        // width 1001: exact column edge at 200.2, so 200 is still column 0
        let l = layout(0, 1001, 0, 600);
        assert_eq!(l.hit_test(200, 50), Some(KeySymbol::Seven));
        assert_eq!(l.hit_test(201, 50), Some(KeySymbol::Eight));
        // exact hotspot edge at 800.8
        assert!(!l.in_hotspot(800, 0));
        assert!(l.in_hotspot(801, 0));
    }

    #[test]
    fn test_hotspot_bounds() {
        let l = layout(0, 1000, 0, 600);
        assert_eq!(l.hotspot().x, 800..=1000);
        assert_eq!(l.hotspot().y, 0..=150);
        assert!(l.in_hotspot(950, 50));
        assert!(l.in_hotspot(1000, 150));
        assert!(!l.in_hotspot(799, 50));
        assert!(!l.in_hotspot(950, 151));
    }

    #[test]
    fn test_hotspot_with_offset_origin() {
        let l = layout(100, 1100, 200, 800);
        assert_eq!(l.hotspot().x, 900..=1100);
        assert_eq!(l.hotspot().y, 200..=350);
    }

    #[test]
    fn test_hotspot_overlaps_backspace_column() {
        let l = layout(0, 1000, 0, 600);
        let hot = l.hotspot();
        for rect in l.keys() {
            let overlaps = rect.x.start <= *hot.x.end()
                && rect.x.end > *hot.x.start()
                && rect.y.start <= *hot.y.end()
                && rect.y.end > *hot.y.start();
            if overlaps {
                assert_eq!(rect.symbol, KeySymbol::Backspace);
            }
        }
        assert_eq!(l.hit_test(950, 50), Some(KeySymbol::Backspace));
    }
}
