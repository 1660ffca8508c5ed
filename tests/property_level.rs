mod common;

use common::assert_consistent;
use planarity::{Level, LevelData, Point, ScoringRule};
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Move { idx: u8, x: i8, y: i8 },
    Drag { idx: u8, dx: i8, dy: i8 },
    Group { x: i8, y: i8, half: u8 },
    MoveGroup { idx: u8, dx: i8, dy: i8 },
    Ungroup { idx: u8 },
    Recheck { idx: u8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<u8>(), -8i8..=8, -8i8..=8).prop_map(|(idx, x, y)| Op::Move { idx, x, y }),
        2 => (any::<u8>(), -4i8..=4, -4i8..=4).prop_map(|(idx, dx, dy)| Op::Drag { idx, dx, dy }),
        1 => (-8i8..=8, -8i8..=8, 1u8..=6).prop_map(|(x, y, half)| Op::Group { x, y, half }),
        1 => (any::<u8>(), -4i8..=4, -4i8..=4).prop_map(|(idx, dx, dy)| Op::MoveGroup { idx, dx, dy }),
        1 => any::<u8>().prop_map(|idx| Op::Ungroup { idx }),
        1 => any::<u8>().prop_map(|idx| Op::Recheck { idx }),
    ]
}

// small integer grid so collinear, touching and coincident cases come up often
fn level_strategy() -> impl Strategy<Value = LevelData> {
    prop::collection::vec((-8i8..=8, -8i8..=8), 3..10).prop_flat_map(|verts| {
        let n = verts.len() as u32;
        let edges = prop::collection::vec((0..n, 0..n), 0..20);
        (Just(verts), edges).prop_map(|(verts, edges)| {
            LevelData::new(
                "prop",
                verts.into_iter().map(|(x, y)| (x as f64, y as f64)).collect(),
                edges.into_iter().filter(|(a, b)| a != b).collect(),
                ScoringRule::at_most(0),
            )
        })
    })
}

fn apply_op(level: &mut Level, op: Op) {
    let n = level.vertex_count();
    match op {
        Op::Move { idx, x, y } => {
            let _ = level.move_vertex(idx as u32 % n, Point::new(x as f64, y as f64));
        }
        Op::Drag { idx, dx, dy } => {
            let _ = level.drag_vertex(idx as u32 % n, Point::new(dx as f64, dy as f64));
        }
        Op::Group { x, y, half } => {
            let (x, y, h) = (x as f64, y as f64, half as f64 - 0.5);
            let square = [
                Point::new(x - h, y - h),
                Point::new(x + h, y - h),
                Point::new(x + h, y + h),
                Point::new(x - h, y + h),
            ];
            let _ = level.group_vertices(&square);
        }
        Op::MoveGroup { idx, dx, dy } => {
            let ids = level.group_ids();
            if let Some(&gid) = ids.get(idx as usize % ids.len().max(1)) {
                let _ = level.move_group(gid, Point::new(dx as f64, dy as f64));
            }
        }
        Op::Ungroup { idx } => {
            let ids = level.group_ids();
            if let Some(&gid) = ids.get(idx as usize % ids.len().max(1)) {
                level.ungroup(gid);
            }
        }
        Op::Recheck { idx } => {
            let e = level.edge_count();
            if e > 0 {
                let r = level.recheck_collisions(idx as u32 % e).unwrap();
                assert_eq!((r.added, r.removed), (0, 0), "recheck changed a settled level");
            }
        }
    }
}

// clash pairs with their points, independent of clash ids
fn clash_map(level: &Level) -> BTreeMap<(u32, u32), (u64, u64)> {
    level
        .clash_ids()
        .into_iter()
        .filter_map(|cid| level.clash(cid))
        .map(|c| (c.edges, (c.pos.x.to_bits(), c.pos.y.to_bits())))
        .collect()
}

fn snapshot(level: &Level, template: &LevelData) -> LevelData {
    let arrays = level.get_vertex_arrays();
    let vertices = arrays.positions.chunks(2).map(|p| (p[0], p[1])).collect();
    LevelData::new("snapshot", vertices, template.edges.clone(), template.scoring)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 2_000, .. ProptestConfig::default() })]
    #[test]
    fn incremental_clashes_match_fresh_start(
        data in level_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..25),
    ) {
        let mut level = Level::new();
        level.start(&data).unwrap();
        assert_consistent(&level);
        for op in ops {
            apply_op(&mut level, op);
            assert_consistent(&level);
        }

        // a fresh level built from the final positions agrees on every pair
        let mut fresh = Level::new();
        fresh.start(&snapshot(&level, &data)).unwrap();
        prop_assert_eq!(fresh.clash_count(), level.clash_count());
        prop_assert_eq!(clash_map(&fresh), clash_map(&level));

        level.stop();
        prop_assert_eq!(level.clash_count(), 0);
        prop_assert!(level.clash_ids().is_empty());
    }
}
