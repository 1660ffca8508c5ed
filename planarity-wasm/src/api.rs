use crate::error;
use crate::interop::{arr_f64, arr_u32, arr_u8, new_obj, set_kv, warn};
use crate::Level;
use js_sys::{Float64Array, Function};
use planarity::{Changes, LevelData, LevelOptions, LevelState, MoveOutcome, Point};
use serde::Serialize;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Route the engine's tracing events to the browser console. Safe to call
/// more than once.
#[wasm_bindgen]
pub fn init_logging() {
    if tracing_wasm::try_set_as_global_default().is_ok() {
        tracing::info!("planarity logging initialized");
    }
}

#[derive(Serialize)]
struct MoveView {
    clashes_added: u32,
    clashes_removed: u32,
    won: bool,
    clash_count: u32,
}

#[derive(Serialize)]
struct LassoView {
    closed: bool,
    group: Option<u32>,
}

fn to_js<T: Serialize>(v: &T) -> JsValue {
    serde_wasm_bindgen::to_value(v).unwrap_or(JsValue::NULL)
}

fn sorted(set: &std::collections::HashSet<u32>) -> Vec<u32> {
    let mut v: Vec<u32> = set.iter().copied().collect();
    v.sort_unstable();
    v
}

impl Level {
    fn move_view(&self, out: MoveOutcome) -> JsValue {
        to_js(&MoveView {
            clashes_added: out.clashes_added,
            clashes_removed: out.clashes_removed,
            won: out.won,
            clash_count: self.inner.clash_count(),
        })
    }

    fn parse_level(v: JsValue) -> Result<LevelData, JsValue> {
        let val = serde_wasm_bindgen::from_value::<serde_json::Value>(v).map_err(error::json_parse)?;
        LevelData::from_json_value_strict(val).map_err(|e| error::level_error(&e))
    }
}

#[wasm_bindgen]
impl Level {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Level {
        crate::Level::rs_new()
    }
    pub fn version(&self) -> u64 {
        self.rs_version()
    }

    // Lifecycle
    pub fn start(&mut self, v: JsValue) -> bool {
        self.lasso.clear();
        match Self::parse_level(v) {
            Ok(data) => match self.inner.start(&data) {
                Ok(()) => true,
                Err(e) => {
                    warn("start", &e.to_string());
                    false
                }
            },
            Err(_) => {
                warn("start", "malformed level");
                false
            }
        }
    }
    pub fn start_res(&mut self, v: JsValue) -> JsValue {
        let data = match Self::parse_level(v) {
            Ok(d) => d,
            Err(e) => return e,
        };
        self.lasso.clear();
        match self.inner.start(&data) {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.clash_count() as f64)),
            Err(e) => error::level_error(&e),
        }
    }
    pub fn start_json_res(&mut self, s: &str) -> JsValue {
        let data = match LevelData::from_json_str(s) {
            Ok(d) => d,
            Err(e) => return error::level_error(&e),
        };
        self.lasso.clear();
        match self.inner.start(&data) {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.clash_count() as f64)),
            Err(e) => error::level_error(&e),
        }
    }
    pub fn stop(&mut self) {
        self.lasso.clear();
        self.inner.stop();
    }
    pub fn pause(&mut self) {
        self.inner.pause();
    }
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }
    pub fn state(&self) -> String {
        let s = match self.inner.state() {
            LevelState::Stopped => "stopped",
            LevelState::Running => "running",
            LevelState::Paused => "paused",
        };
        s.to_string()
    }
    pub fn name(&self) -> String {
        self.inner.name().to_string()
    }
    pub fn status(&self) -> JsValue {
        to_js(&self.inner.status())
    }
    pub fn status_text(&self) -> String {
        self.inner.status().to_string()
    }
    pub fn set_options_res(&mut self, v: JsValue) -> JsValue {
        let opts = match serde_wasm_bindgen::from_value::<LevelOptions>(v) {
            Ok(o) => o,
            Err(e) => return error::json_parse(e),
        };
        match self.inner.set_options(opts) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::level_error(&e),
        }
    }

    /// `f(status)` runs once per win, with the level's status object.
    ///
    /// The handler runs while the move that won is still in progress, so it
    /// must not call back into this Level directly; defer `stop`/`start`
    /// (e.g. with `setTimeout`). Anything it throws is reported as a warning.
    pub fn set_on_win(&mut self, f: Function) {
        self.inner.set_win_handler(move |status| {
            if let Err(e) = f.call1(&JsValue::NULL, &to_js(status)) {
                warn("on_win", &format!("{:?}", e));
            }
        });
    }
    pub fn clear_on_win(&mut self) {
        self.inner.clear_win_handler();
    }

    // Counts
    pub fn vertex_count(&self) -> u32 {
        self.inner.vertex_count()
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.edge_count()
    }
    pub fn clash_count(&self) -> u32 {
        self.inner.clash_count()
    }

    // Vertices
    pub fn get_vertex(&self, id: u32) -> JsValue {
        match self.inner.vertex(id) {
            Some(v) => to_js(&[v.pos.x, v.pos.y]),
            None => JsValue::NULL,
        }
    }
    pub fn move_vertex(&mut self, id: u32, x: f64, y: f64) -> bool {
        match self.inner.move_vertex(id, Point::new(x, y)) {
            Ok(_) => true,
            Err(e) => {
                warn("move_vertex", &e.to_string());
                false
            }
        }
    }
    pub fn move_vertex_res(&mut self, id: u32, x: f64, y: f64) -> JsValue {
        match self.inner.move_vertex(id, Point::new(x, y)) {
            Ok(out) => error::ok(self.move_view(out)),
            Err(e) => error::level_error(&e),
        }
    }
    pub fn drag_vertex(&mut self, id: u32, dx: f64, dy: f64) -> bool {
        match self.inner.drag_vertex(id, Point::new(dx, dy)) {
            Ok(_) => true,
            Err(e) => {
                warn("drag_vertex", &e.to_string());
                false
            }
        }
    }
    pub fn drag_vertex_res(&mut self, id: u32, dx: f64, dy: f64) -> JsValue {
        match self.inner.drag_vertex(id, Point::new(dx, dy)) {
            Ok(out) => error::ok(self.move_view(out)),
            Err(e) => error::level_error(&e),
        }
    }

    // Lasso and groups
    /// Feed one pointer sample of a freehand loop. When the stroke crosses
    /// itself and the loop encloses ungrouped vertices, they are grouped and
    /// the stroke starts over; an empty loop keeps the stroke going.
    pub fn lasso_push_res(&mut self, x: f64, y: f64) -> JsValue {
        let polygon = match self.lasso.push(Point::new(x, y)) {
            Ok(Some(p)) => p,
            Ok(None) => return error::ok(to_js(&LassoView { closed: false, group: None })),
            Err(e) => return error::level_error(&e),
        };
        match self.inner.group_vertices(&polygon) {
            Ok(group) => {
                if group.is_some() {
                    self.lasso.clear();
                }
                error::ok(to_js(&LassoView { closed: true, group }))
            }
            Err(e) => error::level_error(&e),
        }
    }
    pub fn lasso_clear(&mut self) {
        self.lasso.clear();
    }
    pub fn lasso_points(&self) -> Float64Array {
        let flat: Vec<f64> = self.lasso.points().iter().flat_map(|p| [p.x, p.y]).collect();
        arr_f64(&flat)
    }
    /// Group the vertices inside a closed polygon given as `[x0, y0, x1, y1, ...]`.
    pub fn group_polygon_res(&mut self, points: &Float64Array) -> JsValue {
        let flat = points.to_vec();
        if flat.len() % 2 != 0 {
            return error::err("invalid_polygon", "point array must have even length", None);
        }
        let polygon: Vec<Point> = flat.chunks(2).map(|c| Point::new(c[0], c[1])).collect();
        match self.inner.group_vertices(&polygon) {
            Ok(Some(g)) => error::ok(JsValue::from_f64(g as f64)),
            Ok(None) => error::ok(JsValue::NULL),
            Err(e) => error::level_error(&e),
        }
    }
    pub fn move_group(&mut self, id: u32, dx: f64, dy: f64) -> bool {
        match self.inner.move_group(id, Point::new(dx, dy)) {
            Ok(_) => true,
            Err(e) => {
                warn("move_group", &e.to_string());
                false
            }
        }
    }
    pub fn move_group_res(&mut self, id: u32, dx: f64, dy: f64) -> JsValue {
        match self.inner.move_group(id, Point::new(dx, dy)) {
            Ok(out) => error::ok(self.move_view(out)),
            Err(e) => error::level_error(&e),
        }
    }
    pub fn ungroup(&mut self, id: u32) -> bool {
        self.inner.ungroup(id)
    }

    // Typed arrays getters
    pub fn get_vertex_data(&self) -> JsValue {
        let va = self.inner.get_vertex_arrays();
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&va.ids).into());
        set_kv(&obj, "positions", &arr_f64(&va.positions).into());
        set_kv(&obj, "clashed", &arr_u8(&va.clashed).into());
        set_kv(&obj, "grouped", &arr_u8(&va.grouped).into());
        obj.into()
    }
    pub fn get_edge_data(&self) -> JsValue {
        let ea = self.inner.get_edge_arrays();
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ea.ids).into());
        set_kv(&obj, "endpoints", &arr_u32(&ea.endpoints).into());
        set_kv(&obj, "clashed", &arr_u8(&ea.clashed).into());
        obj.into()
    }
    pub fn get_clash_data(&self) -> JsValue {
        let ca = self.inner.get_clash_arrays();
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ca.ids).into());
        set_kv(&obj, "edges", &arr_u32(&ca.edges).into());
        set_kv(&obj, "positions", &arr_f64(&ca.positions).into());
        obj.into()
    }
    pub fn get_group_data(&self) -> JsValue {
        let mut ids = Vec::new();
        let mut offsets = vec![0u32];
        let mut members = Vec::new();
        for gid in self.inner.group_ids() {
            if let Some(g) = self.inner.group(gid) {
                ids.push(gid);
                members.extend_from_slice(&g.members);
                offsets.push(members.len() as u32);
            }
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "member_offsets", &arr_u32(&offsets).into());
        set_kv(&obj, "members", &arr_u32(&members).into());
        obj.into()
    }

    /// Ids touched since the previous call; `full` means redraw everything.
    pub fn take_changes(&mut self) -> JsValue {
        let ch: Changes = self.inner.take_changes();
        let obj = new_obj();
        set_kv(&obj, "since", &JsValue::from_f64(ch.since_ver as f64));
        set_kv(&obj, "full", &JsValue::from_bool(ch.full));
        set_kv(&obj, "vertices", &arr_u32(&sorted(&ch.vertices)).into());
        set_kv(&obj, "edges", &arr_u32(&sorted(&ch.edges)).into());
        set_kv(&obj, "clashes_added", &arr_u32(&sorted(&ch.clashes_added)).into());
        set_kv(&obj, "clashes_moved", &arr_u32(&sorted(&ch.clashes_moved)).into());
        set_kv(&obj, "clashes_removed", &arr_u32(&sorted(&ch.clashes_removed)).into());
        set_kv(&obj, "groups", &arr_u32(&sorted(&ch.groups)).into());
        obj.into()
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::new()
    }
}
