#![allow(dead_code)]

use planarity::{EdgeId, Level, LevelData, ScoringRule};

pub const A: u32 = 0;
pub const B: u32 = 1;
pub const C: u32 = 2;
pub const D: u32 = 3;

// edge ids of `square_with_diagonals`
pub const AB: EdgeId = 0;
pub const BC: EdgeId = 1;
pub const CD: EdgeId = 2;
pub const DA: EdgeId = 3;
pub const AC: EdgeId = 4;
pub const BD: EdgeId = 5;

/// Square A(0,0) B(10,0) C(10,10) D(0,10), outer cycle plus both diagonals.
pub fn square_with_diagonals(rule: ScoringRule) -> LevelData {
    LevelData::new(
        "square",
        vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        vec![(A, B), (B, C), (C, D), (D, A), (A, C), (B, D)],
        rule,
    )
}

pub fn started(data: &LevelData) -> Level {
    let mut level = Level::new();
    level.start(data).expect("start");
    level
}

/// Symmetry, count integrity, derived flags, and agreement with a
/// from-scratch pairwise recomputation.
pub fn assert_consistent(level: &Level) {
    let ids = level.clash_ids();
    assert_eq!(level.clash_count() as usize, ids.len(), "count vs live clashes");
    for &cid in &ids {
        let c = level.clash(cid).expect("live clash");
        let (a, b) = c.edges;
        assert_ne!(a, b);
        assert_eq!(level.edge(a).unwrap().clash_with(b), Some(cid));
        assert_eq!(level.edge(b).unwrap().clash_with(a), Some(cid));
        assert!(!level.edge(a).unwrap().shares_vertex(level.edge(b).unwrap()));
    }
    let n = level.edge_count();
    for i in 0..n {
        let e = level.edge(i).unwrap();
        assert_eq!(e.is_clashed(), e.clashing_edges().next().is_some(), "edge {} flag", i);
        for j in e.clashing_edges() {
            assert_eq!(level.edge(j).unwrap().clash_with(i), e.clash_with(j));
        }
        for j in (i + 1)..n {
            let expect = level.intersection_between(i, j);
            let got = level.clash_between(i, j).map(|c| c.pos);
            assert_eq!(got, expect, "pair {}-{}", i, j);
        }
    }
    for v in 0..level.vertex_count() {
        let vx = level.vertex(v).unwrap();
        let any = vx.edges().iter().any(|&e| level.edge(e).unwrap().is_clashed());
        assert_eq!(vx.is_clashed(), any, "vertex {} flag", v);
    }
}
