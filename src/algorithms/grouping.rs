//! Lasso selection and rigid vertex groups.
//!
//! A [`Lasso`] collects freehand points; as soon as its newest segment
//! crosses an earlier one the enclosed loop is reported as a polygon. The
//! level then groups the vertices inside it that are not grouped yet, and
//! the group moves as one rigid unit through the normal clash path.

use crate::algorithms::winding::point_in_polygon;
use crate::geometry::bounds::{bounding_box, clamp_delta};
use crate::geometry::intersect::segments_intersect;
use crate::geometry::limits;
use crate::model::{GroupId, LevelState, MoveOutcome, Point, Segment, VertexGroup, VertexId};
use crate::{Level, LevelError};
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct Lasso {
    points: Vec<Point>,
}

impl Lasso {
    pub fn new() -> Self {
        Lasso::default()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Append a point; returns the closed polygon once the loop closes.
    pub fn push(&mut self, p: Point) -> Result<Option<Vec<Point>>, LevelError> {
        if !p.is_finite() {
            return Err(LevelError::NonFinite { param: "point" });
        }
        if self.points.len() >= limits::MAX_LASSO_POINTS {
            return Err(LevelError::LimitExceeded {
                what: "lasso points",
                max: limits::MAX_LASSO_POINTS,
                got: self.points.len() + 1,
            });
        }
        self.points.push(p);
        Ok(self.closed_polygon())
    }

    /// If the last segment crosses an earlier one, the loop it cuts off:
    /// the crossing point followed by the points after the crossed segment,
    /// without the last point.
    pub fn closed_polygon(&self) -> Option<Vec<Point>> {
        let pts = &self.points;
        let n = pts.len();
        if n < 4 {
            return None;
        }
        let last = Segment::new(pts[n - 2], pts[n - 1]);
        for i in 0..n - 2 {
            let seg = Segment::new(pts[i], pts[i + 1]);
            if let Some(hit) = segments_intersect(seg, last) {
                let mut polygon = Vec::with_capacity(n - i - 1);
                polygon.push(hit);
                polygon.extend_from_slice(&pts[i + 1..n - 1]);
                return Some(polygon);
            }
        }
        None
    }
}

impl Level {
    /// Vertices whose position lies inside `polygon`, in id order.
    pub fn enclosed_vertices(&self, polygon: &[Point]) -> Vec<VertexId> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| point_in_polygon(v.pos, polygon))
            .map(|(i, _)| i as VertexId)
            .collect()
    }

    /// Group the ungrouped vertices enclosed by `polygon`. Returns `None`
    /// when nothing new is enclosed.
    pub fn group_vertices(&mut self, polygon: &[Point]) -> Result<Option<GroupId>, LevelError> {
        if self.state == LevelState::Stopped {
            return Err(LevelError::NotRunning);
        }
        if polygon.iter().any(|p| !p.is_finite()) {
            return Err(LevelError::NonFinite { param: "polygon" });
        }
        let members: Vec<VertexId> = self
            .enclosed_vertices(polygon)
            .into_iter()
            .filter(|&v| self.vertices[v as usize].group.is_none())
            .collect();
        let Some((lo, hi)) = bounding_box(members.iter().map(|&v| self.vertices[v as usize].pos))
        else {
            return Ok(None);
        };
        let r = Point::new(self.options.vertex_radius, self.options.vertex_radius);
        let gid = self.groups.len() as GroupId;
        for &v in &members {
            self.vertices[v as usize].group = Some(gid);
            self.changes.vertices.insert(v);
        }
        debug!(group = gid, members = members.len(), "vertices grouped");
        self.groups.push(Some(VertexGroup {
            polygon: polygon.to_vec(),
            members,
            top_left: lo - r,
            bottom_right: hi + r,
        }));
        self.changes.groups.insert(gid);
        self.bump();
        Ok(Some(gid))
    }

    pub fn group(&self, id: GroupId) -> Option<&VertexGroup> {
        self.groups.get(id as usize).and_then(|g| g.as_ref())
    }

    pub fn group_ids(&self) -> Vec<GroupId> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_some())
            .map(|(i, _)| i as GroupId)
            .collect()
    }

    /// Translate every member by one (clamped) delta, then settle clashes
    /// for all of them together.
    pub fn move_group(&mut self, id: GroupId, delta: Point) -> Result<MoveOutcome, LevelError> {
        if !delta.is_finite() {
            return Err(LevelError::NonFinite { param: "delta" });
        }
        let field = self.options.playfield;
        let group = self
            .group(id)
            .ok_or(LevelError::InvalidId { kind: "group", id })?;
        let delta = clamp_delta(delta, group.top_left, group.bottom_right, field);
        let members = group.members.clone();
        for &v in &members {
            let pos = self.vertices[v as usize].pos + delta;
            if !limits::in_coord_bounds(pos.x) {
                return Err(LevelError::OutOfRange { param: "x", got: pos.x });
            }
            if !limits::in_coord_bounds(pos.y) {
                return Err(LevelError::OutOfRange { param: "y", got: pos.y });
            }
        }
        if let Some(group) = self.groups.get_mut(id as usize).and_then(|g| g.as_mut()) {
            for p in group.polygon.iter_mut() {
                *p = *p + delta;
            }
            group.top_left = group.top_left + delta;
            group.bottom_right = group.bottom_right + delta;
        }
        for &v in &members {
            self.vertices[v as usize].pos = self.vertices[v as usize].pos + delta;
            self.mark_vertex_moved(v);
        }
        self.changes.groups.insert(id);
        self.settle_vertices(&members)
    }

    /// Dissolve group `id`; its members become individually draggable again.
    pub fn ungroup(&mut self, id: GroupId) -> bool {
        let Some(group) = self.groups.get_mut(id as usize).and_then(|g| g.take()) else {
            return false;
        };
        for v in group.members {
            if let Some(vx) = self.vertices.get_mut(v as usize) {
                vx.group = None;
                self.changes.vertices.insert(v);
            }
        }
        self.changes.groups.insert(id);
        self.bump();
        debug!(group = id, "group dissolved");
        true
    }
}
