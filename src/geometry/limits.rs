// Centralized ingestion limits to harden against untrusted level data and input

// Level size caps
pub const MAX_VERTICES: usize = 4_096;
pub const MAX_EDGES: usize = 16_384;
pub const MAX_LEVELS: usize = 10_000;
pub const MAX_NAME_LEN: usize = 256;

// Freehand lasso
pub const MAX_LASSO_POINTS: usize = 65_536;

// Numeric bounds
pub const COORD_MIN: f64 = -10_000_000.0;
pub const COORD_MAX: f64 = 10_000_000.0;
pub const RADIUS_MAX: f64 = 10_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool {
    x.is_finite() && (COORD_MIN..=COORD_MAX).contains(&x)
}

#[inline]
pub fn in_radius_bounds(r: f64) -> bool {
    r.is_finite() && (0.0..=RADIUS_MAX).contains(&r)
}
