pub mod error;
pub mod events;
pub mod json;
pub mod model;
pub mod geometry {
    pub mod bounds;
    pub mod intersect;
    pub mod limits;
}
pub mod algorithms {
    pub mod clashes;
    pub mod grouping;
    pub mod scoring;
    pub mod winding;
}

pub use error::LevelError;
pub use events::{Event, Response};
pub use json::{LevelData, LevelPack};
pub use model::{
    Clash, ClashId, Edge, EdgeId, GroupId, LevelOptions, LevelState, LevelStatus, MoveOutcome,
    Point, ScoreKind, ScoringRule, Segment, Size, Vertex, VertexGroup, VertexId,
};

use geometry::limits;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{error, info};

/// Everything that changed since the last `take_changes`, for a renderer to
/// redraw incrementally.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Changes {
    pub since_ver: u64,
    pub vertices: HashSet<VertexId>, // moved or clash state flipped
    pub edges: HashSet<EdgeId>,      // endpoint moved or clash state flipped
    pub clashes_added: HashSet<ClashId>,
    pub clashes_moved: HashSet<ClashId>,
    pub clashes_removed: HashSet<ClashId>,
    pub groups: HashSet<GroupId>,
    pub full: bool, // level started or stopped
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        !self.full
            && self.vertices.is_empty()
            && self.edges.is_empty()
            && self.clashes_added.is_empty()
            && self.clashes_moved.is_empty()
            && self.clashes_removed.is_empty()
            && self.groups.is_empty()
    }
}

pub struct VertexArrays {
    pub ids: Vec<u32>,
    pub positions: Vec<f64>,
    pub clashed: Vec<u8>,
    pub grouped: Vec<u8>,
}

pub struct EdgeArrays {
    pub ids: Vec<u32>,
    pub endpoints: Vec<u32>,
    pub clashed: Vec<u8>,
}

pub struct ClashArrays {
    pub ids: Vec<u32>,
    pub edges: Vec<u32>,
    pub positions: Vec<f64>,
}

type WinHandler = Box<dyn FnMut(&LevelStatus)>;

/// One puzzle instance: the vertex/edge arena, the live clashes between
/// edges, and the scoring rule that decides when the puzzle is solved.
pub struct Level {
    pub(crate) vertices: Vec<Vertex>, // id is index
    pub(crate) edges: Vec<Edge>,      // id is index
    pub(crate) clashes: BTreeMap<ClashId, Clash>,
    pub(crate) next_clash_id: ClashId,
    pub(crate) clash_count: u32,
    pub(crate) groups: Vec<Option<VertexGroup>>, // id is index
    pub(crate) name: String,
    pub(crate) rule: ScoringRule,
    pub(crate) state: LevelState,
    pub(crate) options: LevelOptions,
    pub(crate) version: u64,
    pub(crate) changes: Changes,
    pub(crate) on_win: Option<WinHandler>,
}

impl Default for Level {
    fn default() -> Self {
        Level::new()
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("rule", &self.rule)
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edges.len())
            .field("clash_count", &self.clash_count)
            .finish()
    }
}

impl Level {
    pub fn new() -> Self {
        Level::with_options(LevelOptions::default())
    }

    pub fn with_options(options: LevelOptions) -> Self {
        Level {
            vertices: Vec::new(),
            edges: Vec::new(),
            clashes: BTreeMap::new(),
            next_clash_id: 0,
            clash_count: 0,
            groups: Vec::new(),
            name: String::new(),
            rule: ScoringRule::default(),
            state: LevelState::Stopped,
            options,
            version: 1,
            changes: Changes {
                since_ver: 1,
                ..Default::default()
            },
            on_win: None,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn options(&self) -> LevelOptions {
        self.options
    }

    pub fn set_options(&mut self, options: LevelOptions) -> Result<(), LevelError> {
        if !limits::in_radius_bounds(options.vertex_radius) {
            return Err(LevelError::OutOfRange {
                param: "vertex_radius",
                got: options.vertex_radius,
            });
        }
        if let Some(field) = options.playfield {
            for (param, v) in [("width", field.width), ("height", field.height)] {
                if !v.is_finite() {
                    return Err(LevelError::NonFinite { param });
                }
                if !(v > 0.0 && v <= limits::COORD_MAX) {
                    return Err(LevelError::OutOfRange { param, got: v });
                }
            }
        }
        self.options = options;
        Ok(())
    }

    /// Called exactly once each time the scoring rule is met while running.
    pub fn set_win_handler(&mut self, handler: impl FnMut(&LevelStatus) + 'static) {
        self.on_win = Some(Box::new(handler));
    }

    pub fn clear_win_handler(&mut self) {
        self.on_win = None;
    }

    pub fn take_changes(&mut self) -> Changes {
        let since = self.version;
        std::mem::replace(
            &mut self.changes,
            Changes {
                since_ver: since,
                ..Default::default()
            },
        )
    }

    // Lifecycle

    /// Build the level from `data` and detect the initial clashes. A level
    /// that is already started is stopped first.
    pub fn start(&mut self, data: &LevelData) -> Result<(), LevelError> {
        data.validate()?;
        if self.state != LevelState::Stopped {
            self.stop();
        }
        if let Err(e) = self.populate(data) {
            self.stop();
            return Err(e);
        }
        self.state = LevelState::Running;
        self.changes.full = true;
        self.bump();
        info!(
            name = %self.name,
            vertices = self.vertices.len(),
            edges = self.edges.len(),
            clashes = self.clash_count,
            rule = %self.rule,
            "level started"
        );
        Ok(())
    }

    fn populate(&mut self, data: &LevelData) -> Result<(), LevelError> {
        self.name = data.name.clone();
        self.rule = data.scoring;
        self.next_clash_id = 0;
        self.vertices = data
            .vertices
            .iter()
            .map(|&(x, y)| Vertex::new(Point::new(x, y)))
            .collect();
        for &(a, b) in &data.edges {
            self.add_edge(a, b)?;
        }
        for eid in 0..self.edges.len() as EdgeId {
            self.recheck_collisions(eid)?;
        }
        for vid in 0..self.vertices.len() as VertexId {
            self.refresh_vertex_state(vid);
        }
        Ok(())
    }

    fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId, LevelError> {
        if a == b {
            return Err(LevelError::InvalidEdge { a, b });
        }
        for v in [a, b] {
            if self.vertices.get(v as usize).is_none() {
                return Err(LevelError::InvalidId { kind: "vertex", id: v });
            }
        }
        let id = self.edges.len() as EdgeId;
        self.edges.push(Edge::new(a, b));
        self.vertices[a as usize].edges.push(id);
        self.vertices[b as usize].edges.push(id);
        Ok(id)
    }

    /// Tear the level down: clashes first, then edges, groups and vertices.
    /// Safe to call in any state.
    pub fn stop(&mut self) {
        let was = self.state;
        self.state = LevelState::Stopped;
        for eid in 0..self.edges.len() as EdgeId {
            if let Err(e) = self.destroy_edge_clashes(eid) {
                error!(edge = eid, error = %e, "clash teardown failed");
            }
        }
        if self.clash_count != 0 || !self.clashes.is_empty() {
            error!(
                count = self.clash_count,
                live = self.clashes.len(),
                "clashes left after teardown"
            );
            self.clashes.clear();
            self.clash_count = 0;
        }
        self.edges.clear();
        self.groups.clear();
        self.vertices.clear();
        self.changes.full = true;
        self.bump();
        if was != LevelState::Stopped {
            info!(name = %self.name, "level stopped");
        }
    }

    /// Leave Running without tearing down; win checks become no-ops.
    pub fn pause(&mut self) {
        if self.state == LevelState::Running {
            self.state = LevelState::Paused;
        }
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LevelState::Running
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scoring_rule(&self) -> ScoringRule {
        self.rule
    }

    pub fn status(&self) -> LevelStatus {
        LevelStatus {
            name: self.name.clone(),
            clashes: self.clash_count,
            rule: self.rule,
            state: self.state,
        }
    }

    // Vertices

    /// Place vertex `id` at `pos` and settle every clash on its edges.
    pub fn move_vertex(&mut self, id: VertexId, pos: Point) -> Result<MoveOutcome, LevelError> {
        if !pos.x.is_finite() {
            return Err(LevelError::NonFinite { param: "x" });
        }
        if !pos.y.is_finite() {
            return Err(LevelError::NonFinite { param: "y" });
        }
        if !limits::in_coord_bounds(pos.x) {
            return Err(LevelError::OutOfRange { param: "x", got: pos.x });
        }
        if !limits::in_coord_bounds(pos.y) {
            return Err(LevelError::OutOfRange { param: "y", got: pos.y });
        }
        let v = self
            .vertices
            .get_mut(id as usize)
            .ok_or(LevelError::InvalidId { kind: "vertex", id })?;
        if v.group.is_some() {
            return Err(LevelError::VertexGrouped(id));
        }
        v.pos = pos;
        self.mark_vertex_moved(id);
        self.settle_vertices(&[id])
    }

    /// Move vertex `id` by `delta`, clamped so the vertex stays inside the
    /// playfield when one is configured.
    pub fn drag_vertex(&mut self, id: VertexId, delta: Point) -> Result<MoveOutcome, LevelError> {
        if !delta.is_finite() {
            return Err(LevelError::NonFinite { param: "delta" });
        }
        let pos = self
            .vertex(id)
            .ok_or(LevelError::InvalidId { kind: "vertex", id })?
            .pos;
        let r = Point::new(self.options.vertex_radius, self.options.vertex_radius);
        let delta = geometry::bounds::clamp_delta(delta, pos - r, pos + r, self.options.playfield);
        self.move_vertex(id, pos + delta)
    }

    pub(crate) fn mark_vertex_moved(&mut self, id: VertexId) {
        self.changes.vertices.insert(id);
        if let Some(v) = self.vertices.get(id as usize) {
            self.changes.edges.extend(v.edges.iter().copied());
        }
        self.bump();
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id as usize)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    // Edges

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id as usize)
    }

    pub fn edge_count(&self) -> u32 {
        self.edges.len() as u32
    }

    /// Current segment of edge `id` from its vertices' live positions.
    pub fn segment(&self, id: EdgeId) -> Option<Segment> {
        let e = self.edges.get(id as usize)?;
        let a = self.vertices.get(e.a as usize)?;
        let b = self.vertices.get(e.b as usize)?;
        Some(Segment::new(a.pos, b.pos))
    }

    // Clashes

    pub fn clash(&self, id: ClashId) -> Option<&Clash> {
        self.clashes.get(&id)
    }

    /// Number of live clashes, each counted once.
    pub fn clash_count(&self) -> u32 {
        self.clash_count
    }

    pub fn clash_ids(&self) -> Vec<ClashId> {
        self.clashes.keys().copied().collect()
    }

    pub fn clash_between(&self, a: EdgeId, b: EdgeId) -> Option<&Clash> {
        let cid = self.edges.get(a as usize)?.clash_with(b)?;
        self.clashes.get(&cid)
    }

    // Render arrays

    pub fn get_vertex_arrays(&self) -> VertexArrays {
        let mut ids = Vec::with_capacity(self.vertices.len());
        let mut positions = Vec::with_capacity(self.vertices.len() * 2);
        let mut clashed = Vec::with_capacity(self.vertices.len());
        let mut grouped = Vec::with_capacity(self.vertices.len());
        for (i, v) in self.vertices.iter().enumerate() {
            ids.push(i as u32);
            positions.push(v.pos.x);
            positions.push(v.pos.y);
            clashed.push(v.clashed as u8);
            grouped.push(v.group.is_some() as u8);
        }
        VertexArrays {
            ids,
            positions,
            clashed,
            grouped,
        }
    }

    pub fn get_edge_arrays(&self) -> EdgeArrays {
        let mut ids = Vec::with_capacity(self.edges.len());
        let mut endpoints = Vec::with_capacity(self.edges.len() * 2);
        let mut clashed = Vec::with_capacity(self.edges.len());
        for (i, e) in self.edges.iter().enumerate() {
            ids.push(i as u32);
            endpoints.push(e.a);
            endpoints.push(e.b);
            clashed.push(e.clashed as u8);
        }
        EdgeArrays {
            ids,
            endpoints,
            clashed,
        }
    }

    pub fn get_clash_arrays(&self) -> ClashArrays {
        let mut ids = Vec::with_capacity(self.clashes.len());
        let mut edges = Vec::with_capacity(self.clashes.len() * 2);
        let mut positions = Vec::with_capacity(self.clashes.len() * 2);
        for (id, c) in &self.clashes {
            ids.push(*id);
            edges.push(c.edges.0);
            edges.push(c.edges.1);
            positions.push(c.pos.x);
            positions.push(c.pos.y);
        }
        ClashArrays {
            ids,
            edges,
            positions,
        }
    }
}
