// Exact segment-segment crossing test used for clash detection.
// No tolerances: parallel means a zero determinant, and the acceptance
// window is the inclusive bounding range of both segments.

use crate::model::{Point, Segment};

/// True if `val` lies between `b1` and `b2` inclusive, in either order.
#[inline]
pub fn in_between(val: f64, b1: f64, b2: f64) -> bool {
    (b1 >= val && val >= b2) || (b1 <= val && val <= b2)
}

/// Intersection of the infinite lines through `s` and `t`, or `None` when
/// they are parallel (including collinear).
pub fn line_collide(s: Segment, t: Segment) -> Option<Point> {
    let (px, py) = (s.a.x, s.a.y);
    let (rx, ry) = (s.b.x - s.a.x, s.b.y - s.a.y);
    let (qx, qy) = (t.a.x, t.a.y);
    let (sx, sy) = (t.b.x - t.a.x, t.b.y - t.a.y);

    let dem = sx * ry - rx * sy;
    if dem == 0.0 {
        return None;
    }
    // parameter along t; operand order fixed so results are reproducible
    let u = (px * ry + qy * rx - py * rx - qx * ry) / dem;
    Some(Point::new(qx + u * sx, qy + u * sy))
}

/// Crossing point of two segments, if any.
///
/// Segments that share an endpoint never cross, even if they overlap
/// geometrically, so edges meeting at a vertex are never reported.
pub fn segments_intersect(s: Segment, t: Segment) -> Option<Point> {
    if s.a == t.a || s.a == t.b || s.b == t.a || s.b == t.b {
        return None;
    }
    let p = line_collide(s, t)?;
    if in_between(p.x, s.a.x, s.b.x)
        && in_between(p.x, t.a.x, t.b.x)
        && in_between(p.y, s.a.y, s.b.y)
        && in_between(p.y, t.a.y, t.b.y)
    {
        Some(p)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Segment {
        Segment::new(Point::new(ax, ay), Point::new(bx, by))
    }

    #[test]
    fn proper_cross() {
        let p = segments_intersect(seg(0.0, 0.0, 10.0, 10.0), seg(10.0, 0.0, 0.0, 10.0));
        assert_eq!(p, Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn disjoint_segments_on_crossing_lines() {
        // lines meet at (5,5) but the second segment stops short
        let p = segments_intersect(seg(0.0, 0.0, 10.0, 10.0), seg(10.0, 0.0, 6.0, 4.0));
        assert_eq!(p, None);
    }

    #[test]
    fn shared_endpoint_never_crosses() {
        let p = segments_intersect(seg(0.0, 0.0, 10.0, 0.0), seg(10.0, 0.0, 0.0, 0.0));
        assert_eq!(p, None);
        let q = segments_intersect(seg(0.0, 0.0, 10.0, 10.0), seg(0.0, 0.0, 10.0, 0.0));
        assert_eq!(q, None);
    }

    #[test]
    fn parallel_and_collinear_are_none() {
        assert_eq!(line_collide(seg(0.0, 0.0, 10.0, 0.0), seg(0.0, 1.0, 10.0, 1.0)), None);
        // collinear and overlapping still counts as parallel
        let p = segments_intersect(seg(0.0, 0.0, 10.0, 0.0), seg(2.0, 0.0, 8.0, 0.0));
        assert_eq!(p, None);
    }

    #[test]
    fn touching_interior_is_inclusive() {
        // T-junction: the second segment ends on the first
        let p = segments_intersect(seg(0.0, 0.0, 10.0, 0.0), seg(5.0, 0.0, 5.0, 10.0));
        assert_eq!(p, Some(Point::new(5.0, 0.0)));
    }

    #[test]
    fn in_between_either_order() {
        assert!(in_between(1.0, 0.0, 2.0));
        assert!(in_between(1.0, 2.0, 0.0));
        assert!(in_between(2.0, 2.0, 0.0));
        assert!(!in_between(2.5, 2.0, 0.0));
    }

    #[test]
    fn axis_aligned_cross() {
        let p = segments_intersect(seg(0.0, 5.0, 10.0, 5.0), seg(3.0, 0.0, 3.0, 10.0));
        assert_eq!(p, Some(Point::new(3.0, 5.0)));
    }
}
