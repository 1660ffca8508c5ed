use crate::model::{Point, Size};

/// Limit a drag `delta` so the box `[top_left, bottom_right]` stays inside
/// `[0, width] x [0, height]`. Without a playfield the delta is unchanged.
pub fn clamp_delta(delta: Point, top_left: Point, bottom_right: Point, field: Option<Size>) -> Point {
    match field {
        None => delta,
        Some(f) => Point::new(
            delta.x.max(-top_left.x).min(f.width - bottom_right.x),
            delta.y.max(-top_left.y).min(f.height - bottom_right.y),
        ),
    }
}

/// Axis-aligned bounds of `points`, or `None` when empty.
pub fn bounding_box(points: impl IntoIterator<Item = Point>) -> Option<(Point, Point)> {
    let mut it = points.into_iter();
    let first = it.next()?;
    let (mut lo, mut hi) = (first, first);
    for p in it {
        lo.x = lo.x.min(p.x);
        lo.y = lo.y.min(p.y);
        hi.x = hi.x.max(p.x);
        hi.y = hi.y.max(p.y);
    }
    Some((lo, hi))
}
