//! Point-in-polygon testing for lasso selection.
//!
//! Horizontal ray casting with the even-odd rule, so freehand loops traced in
//! either direction (or crossing themselves) select the same vertices.

use crate::model::Point;

/// Number of polygon edges crossed by the ray from `p` towards +x.
pub fn crossing_number(p: Point, polygon: &[Point]) -> u32 {
    if polygon.len() < 3 {
        return 0;
    }

    let mut crossings = 0u32;
    let n = polygon.len();

    for i in 0..n {
        let p1 = polygon[i];
        let p2 = polygon[(i + 1) % n];

        let y_crosses = (p1.y <= p.y && p2.y > p.y) || (p2.y <= p.y && p1.y > p.y);
        if y_crosses {
            let t = (p.y - p1.y) / (p2.y - p1.y);
            let x_intersect = p1.x + t * (p2.x - p1.x);
            if p.x < x_intersect {
                crossings += 1;
            }
        }
    }

    crossings
}

/// Even-odd containment. Polygons with fewer than three points contain nothing.
#[inline]
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    crossing_number(p, polygon) % 2 == 1
}
