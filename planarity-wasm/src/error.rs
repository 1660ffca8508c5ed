use crate::interop::{new_obj, set_kv};
use planarity::LevelError;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

/// `{ ok: false, error: { code, message, data? } }` for a core error; `data`
/// carries the offending parameter or id where there is one.
pub fn level_error(e: &LevelError) -> JsValue {
    let d = new_obj();
    let has_data = match e {
        LevelError::InvalidEdge { a, b } => {
            set_kv(&d, "a", &JsValue::from_f64(*a as f64));
            set_kv(&d, "b", &JsValue::from_f64(*b as f64));
            true
        }
        LevelError::InvalidId { kind, id } => {
            set_kv(&d, "kind", &JsValue::from_str(kind));
            set_kv(&d, "id", &JsValue::from_f64(*id as f64));
            true
        }
        LevelError::NonFinite { param } => {
            set_kv(&d, "param", &JsValue::from_str(param));
            true
        }
        LevelError::OutOfRange { param, got } => {
            set_kv(&d, "param", &JsValue::from_str(param));
            set_kv(&d, "got", &JsValue::from_f64(*got));
            true
        }
        LevelError::LimitExceeded { what, max, got } => {
            set_kv(&d, "what", &JsValue::from_str(what));
            set_kv(&d, "max", &JsValue::from_f64(*max as f64));
            set_kv(&d, "got", &JsValue::from_f64(*got as f64));
            true
        }
        LevelError::VertexGrouped(id) => {
            set_kv(&d, "vertex", &JsValue::from_f64(*id as f64));
            true
        }
        LevelError::InternalInconsistency(_) | LevelError::NotRunning | LevelError::Json(_) => false,
    };
    err(e.code(), e.to_string(), has_data.then(|| d.into()))
}

#[inline]
pub fn json_parse(e: impl std::fmt::Display) -> JsValue {
    err("json_parse", e.to_string(), None)
}
