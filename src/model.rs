use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Sub};

pub type VertexId = u32;
pub type EdgeId = u32;
pub type ClashId = u32;
pub type GroupId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

/// A straight segment between two points, endpoints in edge order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub const fn new(a: Point, b: Point) -> Self {
        Segment { a, b }
    }
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub pos: Point,
    pub(crate) edges: Vec<EdgeId>, // insertion order = edge creation order
    pub(crate) clashed: bool,
    pub(crate) group: Option<GroupId>,
}

impl Vertex {
    pub(crate) fn new(pos: Point) -> Self {
        Vertex {
            pos,
            edges: Vec::new(),
            clashed: false,
            group: None,
        }
    }
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }
    pub fn is_clashed(&self) -> bool {
        self.clashed
    }
    /// Group currently holding this vertex. Grouped vertices are not
    /// individually draggable.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub a: VertexId,
    pub b: VertexId,
    // other edge -> clash shared with it; at most one per pair
    pub(crate) clashes: BTreeMap<EdgeId, ClashId>,
    pub(crate) clashed: bool,
}

impl Edge {
    pub(crate) fn new(a: VertexId, b: VertexId) -> Self {
        Edge {
            a,
            b,
            clashes: BTreeMap::new(),
            clashed: false,
        }
    }
    pub fn is_clashed(&self) -> bool {
        self.clashed
    }
    pub fn clash_with(&self, other: EdgeId) -> Option<ClashId> {
        self.clashes.get(&other).copied()
    }
    /// Other edges this edge currently crosses, ascending.
    pub fn clashing_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.clashes.keys().copied()
    }
    pub fn shares_vertex(&self, other: &Edge) -> bool {
        self.a == other.a || self.a == other.b || self.b == other.a || self.b == other.b
    }
}

/// A live crossing between two non-adjacent edges. Owned by the level; the
/// edges only hold its id.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clash {
    pub edges: (EdgeId, EdgeId),
    pub pos: Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    #[serde(alias = "=")]
    Equal,
    #[serde(alias = "*", alias = "<=")]
    AtMost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoringRule {
    pub kind: ScoreKind,
    pub threshold: u32,
}

impl ScoringRule {
    pub const fn equal(threshold: u32) -> Self {
        ScoringRule {
            kind: ScoreKind::Equal,
            threshold,
        }
    }
    pub const fn at_most(threshold: u32) -> Self {
        ScoringRule {
            kind: ScoreKind::AtMost,
            threshold,
        }
    }
    pub fn is_satisfied(&self, clashes: u32) -> bool {
        match self.kind {
            ScoreKind::Equal => clashes == self.threshold,
            ScoreKind::AtMost => clashes <= self.threshold,
        }
    }
}

impl Default for ScoringRule {
    fn default() -> Self {
        ScoringRule::at_most(0)
    }
}

impl fmt::Display for ScoringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ScoreKind::Equal => write!(f, "= {}", self.threshold),
            ScoreKind::AtMost => write!(f, "<= {}", self.threshold),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelState {
    Stopped,
    Running,
    /// Left Running (after a win or an explicit pause) but not torn down yet.
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Per-level settings supplied by whoever hosts the engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelOptions {
    /// Drags are clamped so vertices stay inside `[0, width] x [0, height]`.
    pub playfield: Option<Size>,
    /// Half the on-screen vertex extent; pads drag and group bounds.
    pub vertex_radius: f64,
}

impl Default for LevelOptions {
    fn default() -> Self {
        LevelOptions {
            playfield: None,
            vertex_radius: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct VertexGroup {
    pub polygon: Vec<Point>,
    pub members: Vec<VertexId>,
    pub top_left: Point,
    pub bottom_right: Point,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub clashes_added: u32,
    pub clashes_removed: u32,
    /// The scoring rule was met by this move and the win handler ran.
    pub won: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelStatus {
    pub name: String,
    pub clashes: u32,
    pub rule: ScoringRule,
    pub state: LevelState,
}

impl fmt::Display for LevelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clashes left: {}, goal: {}", self.clashes, self.rule)
    }
}
