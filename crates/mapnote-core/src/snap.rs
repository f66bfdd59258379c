//! Snap functionality for aligning tool input to the grid.

use kurbo::Point;

/// Snap a single coordinate to the nearest multiple of `grid_size`.
///
/// A non-positive or non-finite grid size leaves the value untouched.
pub fn snap(value: f64, grid_size: f64) -> f64 {
    if !(grid_size.is_finite() && grid_size > 0.0) || !value.is_finite() {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap(point.x, grid_size), snap(point.y, grid_size))
}

/// Snap a point only when snapping is enabled.
pub fn snap_point(point: Point, enabled: bool, grid_size: f64) -> Point {
    if enabled {
        snap_to_grid(point, grid_size)
    } else {
        point
    }
}

/// Lock the end of a segment to the dominant axis from `start`.
///
/// Used by the line tool when shift is held.
pub fn constrain_axis(start: Point, end: Point) -> Point {
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    if dx >= dy {
        Point::new(end.x, start.y)
    } else {
        Point::new(start.x, end.y)
    }
}

/// Move `end` so the box spanned with `start` is a square.
///
/// The side is the larger of the two extents and the drag direction is kept.
pub fn constrain_square(start: Point, end: Point) -> Point {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let side = dx.abs().max(dy.abs());
    let sign = |d: f64| if d < 0.0 { -1.0 } else { 1.0 };
    Point::new(start.x + side * sign(dx), start.y + side * sign(dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_snap_to_grid() {
        let p = snap_to_grid(Point::new(12.0, 47.0), 20.0);
        assert_eq!(p, Point::new(20.0, 40.0));
    }

    #[test]
    fn test_snap_negative() {
        assert_eq!(snap(-12.0, 20.0), -20.0);
        assert_eq!(snap(-9.0, 20.0), 0.0);
    }

    #[test]
    fn test_invalid_grid_is_identity() {
        assert_eq!(snap(13.0, 0.0), 13.0);
        assert_eq!(snap(13.0, -5.0), 13.0);
        assert_eq!(snap(13.0, f64::NAN), 13.0);
    }

    #[test]
    fn test_snap_point_disabled() {
        let p = Point::new(3.0, 7.0);
        assert_eq!(snap_point(p, false, 20.0), p);
    }

    #[test]
    fn test_constrain_axis() {
        let start = Point::new(0.0, 0.0);
        assert_eq!(constrain_axis(start, Point::new(50.0, 10.0)), Point::new(50.0, 0.0));
        assert_eq!(constrain_axis(start, Point::new(5.0, -30.0)), Point::new(0.0, -30.0));
    }

    #[test]
    fn test_constrain_square_keeps_direction() {
        let start = Point::new(10.0, 10.0);
        let end = constrain_square(start, Point::new(-20.0, 15.0));
        assert_eq!(end, Point::new(-20.0, 40.0));
    }

    proptest! {
        #[test]
        fn snap_is_idempotent(v in -1.0e6f64..1.0e6, grid in prop_oneof![Just(10.0f64), Just(20.0), Just(40.0), 0.5f64..100.0]) {
            let once = snap(v, grid);
            prop_assert_eq!(snap(once, grid), once);
        }
    }
}
