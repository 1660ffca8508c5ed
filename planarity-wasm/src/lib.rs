use planarity::algorithms::grouping::Lasso;
use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct Level {
    pub(crate) inner: planarity::Level,
    pub(crate) lasso: Lasso,
}

impl Level {
    pub fn rs_new() -> Level {
        Level { inner: planarity::Level::new(), lasso: Lasso::new() }
    }
    pub fn rs_version(&self) -> u64 { self.inner.version() }
}
