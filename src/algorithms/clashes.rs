//! Incremental clash maintenance.
//!
//! Every edge keeps a map from the edges it crosses to the shared clash id;
//! the level owns the clash records themselves. When a vertex moves, each
//! incident edge is rechecked against every other edge and the clash set is
//! diffed in place: new crossings create a clash, persisting ones are
//! repositioned (same id), vanished ones are destroyed on both sides.

use crate::geometry::intersect::segments_intersect;
use crate::model::{Clash, ClashId, EdgeId, MoveOutcome, Point, ScoreKind, VertexId};
use crate::{Level, LevelError};
use std::collections::BTreeSet;
use tracing::trace;

/// Clashes created and destroyed by one recheck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecheckReport {
    pub added: u32,
    pub removed: u32,
}

impl Level {
    /// Crossing between edges `a` and `b` under current positions. Edges
    /// that share a vertex never cross.
    ///
    /// Always evaluated lower id first, so the answer (and the rounding of
    /// the point) depends only on the pair, not on which edge asked.
    pub fn intersection_between(&self, a: EdgeId, b: EdgeId) -> Option<Point> {
        if a == b {
            return None;
        }
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        let ea = self.edges.get(a as usize)?;
        let eb = self.edges.get(b as usize)?;
        if ea.shares_vertex(eb) {
            return None;
        }
        segments_intersect(self.segment(a)?, self.segment(b)?)
    }

    /// Bring every clash involving `eid` in line with current geometry.
    /// Idempotent when nothing moved in between.
    pub fn recheck_collisions(&mut self, eid: EdgeId) -> Result<RecheckReport, LevelError> {
        if self.edges.get(eid as usize).is_none() {
            return Err(LevelError::InvalidId { kind: "edge", id: eid });
        }
        let mut report = RecheckReport::default();
        for other in 0..self.edges.len() as EdgeId {
            if other == eid {
                continue;
            }
            let hit = self.intersection_between(eid, other);
            let existing = self.edges[eid as usize].clash_with(other);
            match (existing, hit) {
                (None, Some(pos)) => {
                    self.create_clash(eid, other, pos)?;
                    report.added += 1;
                }
                (Some(cid), Some(pos)) => self.reposition_clash(cid, pos)?,
                (Some(cid), None) => {
                    self.destroy_clash(cid)?;
                    report.removed += 1;
                }
                (None, None) => {}
            }
        }
        Ok(report)
    }

    /// Recheck every edge incident to `moved` (each once), then evaluate the
    /// scoring rule if the clash count moved towards a win.
    pub(crate) fn settle_vertices(&mut self, moved: &[VertexId]) -> Result<MoveOutcome, LevelError> {
        let mut edges = BTreeSet::new();
        for &vid in moved {
            let v = self
                .vertices
                .get(vid as usize)
                .ok_or(LevelError::InvalidId { kind: "vertex", id: vid })?;
            edges.extend(v.edges.iter().copied());
        }
        let mut outcome = MoveOutcome::default();
        for eid in edges {
            let r = self.recheck_collisions(eid)?;
            outcome.clashes_added += r.added;
            outcome.clashes_removed += r.removed;
        }
        // Removing a clash is the only way an AtMost rule becomes true; an
        // Equal rule can also be reached from below.
        let check = outcome.clashes_removed > 0
            || (outcome.clashes_added > 0 && self.rule.kind == ScoreKind::Equal);
        if check {
            outcome.won = self.check_win_condition();
        }
        Ok(outcome)
    }

    fn create_clash(&mut self, a: EdgeId, b: EdgeId, pos: Point) -> Result<ClashId, LevelError> {
        if a == b {
            return Err(LevelError::InternalInconsistency(format!(
                "clash of edge {} with itself",
                a
            )));
        }
        if self.edges[a as usize].shares_vertex(&self.edges[b as usize]) {
            return Err(LevelError::InternalInconsistency(format!(
                "clash between adjacent edges {} and {}",
                a, b
            )));
        }
        if self.edges[a as usize].clashes.contains_key(&b)
            || self.edges[b as usize].clashes.contains_key(&a)
        {
            return Err(LevelError::InternalInconsistency(format!(
                "edges {} and {} already clash",
                a, b
            )));
        }
        let cid = self.next_clash_id;
        if self.clashes.contains_key(&cid) {
            return Err(LevelError::InternalInconsistency(format!(
                "clash id {} is still live",
                cid
            )));
        }
        self.next_clash_id = self.next_clash_id.wrapping_add(1);
        self.clashes.insert(
            cid,
            Clash {
                edges: (a.min(b), a.max(b)),
                pos,
            },
        );
        self.edges[a as usize].clashes.insert(b, cid);
        self.edges[b as usize].clashes.insert(a, cid);
        self.clash_count += 1;
        self.changes.clashes_added.insert(cid);
        self.refresh_edge_state(a);
        self.refresh_edge_state(b);
        self.bump();
        trace!(clash = cid, a, b, x = pos.x, y = pos.y, "clash created");
        Ok(cid)
    }

    fn reposition_clash(&mut self, cid: ClashId, pos: Point) -> Result<(), LevelError> {
        let clash = self.clashes.get_mut(&cid).ok_or_else(|| {
            LevelError::InternalInconsistency(format!("clash {} is not live", cid))
        })?;
        if clash.pos != pos {
            clash.pos = pos;
            if !self.changes.clashes_added.contains(&cid) {
                self.changes.clashes_moved.insert(cid);
            }
        }
        Ok(())
    }

    fn destroy_clash(&mut self, cid: ClashId) -> Result<(), LevelError> {
        let clash = self.clashes.remove(&cid).ok_or_else(|| {
            LevelError::InternalInconsistency(format!("clash {} is not live", cid))
        })?;
        let (a, b) = clash.edges;
        let ra = self.edges.get_mut(a as usize).and_then(|e| e.clashes.remove(&b));
        let rb = self.edges.get_mut(b as usize).and_then(|e| e.clashes.remove(&a));
        if ra != Some(cid) || rb != Some(cid) {
            return Err(LevelError::InternalInconsistency(format!(
                "clash {} not registered symmetrically on edges {} and {}",
                cid, a, b
            )));
        }
        self.clash_count = self.clash_count.checked_sub(1).ok_or_else(|| {
            LevelError::InternalInconsistency("clash count underflow".to_string())
        })?;
        if !self.changes.clashes_added.remove(&cid) {
            self.changes.clashes_removed.insert(cid);
        }
        self.changes.clashes_moved.remove(&cid);
        self.refresh_edge_state(a);
        self.refresh_edge_state(b);
        self.bump();
        trace!(clash = cid, a, b, "clash destroyed");
        Ok(())
    }

    /// Destroy every clash on edge `eid`, each symmetrically.
    pub(crate) fn destroy_edge_clashes(&mut self, eid: EdgeId) -> Result<(), LevelError> {
        let live: Vec<ClashId> = match self.edges.get(eid as usize) {
            Some(e) => e.clashes.values().copied().collect(),
            None => return Err(LevelError::InvalidId { kind: "edge", id: eid }),
        };
        for cid in live {
            self.destroy_clash(cid)?;
        }
        Ok(())
    }

    pub(crate) fn refresh_edge_state(&mut self, eid: EdgeId) {
        let Some(e) = self.edges.get_mut(eid as usize) else {
            return;
        };
        let clashed = !e.clashes.is_empty();
        if clashed == e.clashed {
            return;
        }
        e.clashed = clashed;
        let (a, b) = (e.a, e.b);
        self.changes.edges.insert(eid);
        self.refresh_vertex_state(a);
        self.refresh_vertex_state(b);
    }

    pub(crate) fn refresh_vertex_state(&mut self, vid: VertexId) {
        let clashed = match self.vertices.get(vid as usize) {
            Some(v) => v
                .edges
                .iter()
                .any(|&eid| self.edges.get(eid as usize).map_or(false, |e| e.clashed)),
            None => return,
        };
        let v = &mut self.vertices[vid as usize];
        if v.clashed != clashed {
            v.clashed = clashed;
            self.changes.vertices.insert(vid);
        }
    }
}
