use crate::geometry::bounds::bounding_box;
use crate::geometry::limits;
use crate::model::{Point, ScoringRule, VertexId};
use crate::LevelError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One authored level: vertex coordinates, edges as vertex-index pairs and
/// the scoring rule.
///
/// ```json
/// { "name": "first steps",
///   "vertices": [[0, 0], [10, 0], [5, 10]],
///   "edges": [[0, 1], [1, 2], [2, 0]],
///   "scoring": { "kind": "at_most", "threshold": 0 } }
/// ```
///
/// `kind` also accepts the short forms `"="` and `"*"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: String,
    pub vertices: Vec<(f64, f64)>,
    pub edges: Vec<(VertexId, VertexId)>,
    #[serde(default)]
    pub scoring: ScoringRule,
}

impl LevelData {
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<(f64, f64)>,
        edges: Vec<(VertexId, VertexId)>,
        scoring: ScoringRule,
    ) -> Self {
        LevelData {
            name: name.into(),
            vertices,
            edges,
            scoring,
        }
    }

    /// Check caps, coordinates and edge endpoints without building anything.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.name.len() > limits::MAX_NAME_LEN {
            return Err(LevelError::LimitExceeded {
                what: "name bytes",
                max: limits::MAX_NAME_LEN,
                got: self.name.len(),
            });
        }
        if self.vertices.len() > limits::MAX_VERTICES {
            return Err(LevelError::LimitExceeded {
                what: "vertices",
                max: limits::MAX_VERTICES,
                got: self.vertices.len(),
            });
        }
        if self.edges.len() > limits::MAX_EDGES {
            return Err(LevelError::LimitExceeded {
                what: "edges",
                max: limits::MAX_EDGES,
                got: self.edges.len(),
            });
        }
        for &(x, y) in &self.vertices {
            if !x.is_finite() || !y.is_finite() {
                return Err(LevelError::NonFinite { param: "vertices" });
            }
            if !limits::in_coord_bounds(x) {
                return Err(LevelError::OutOfRange { param: "vertices", got: x });
            }
            if !limits::in_coord_bounds(y) {
                return Err(LevelError::OutOfRange { param: "vertices", got: y });
            }
        }
        let n = self.vertices.len();
        for &(a, b) in &self.edges {
            if a == b {
                return Err(LevelError::InvalidEdge { a, b });
            }
            for v in [a, b] {
                if v as usize >= n {
                    return Err(LevelError::InvalidId { kind: "vertex", id: v });
                }
            }
        }
        Ok(())
    }

    pub fn from_json_value_strict(v: Value) -> Result<LevelData, LevelError> {
        let data: LevelData = serde_json::from_value(v)?;
        data.validate()?;
        Ok(data)
    }

    pub fn from_json_str(s: &str) -> Result<LevelData, LevelError> {
        Self::from_json_value_strict(serde_json::from_str(s)?)
    }

    pub fn to_json_value(&self) -> Value {
        // plain data with finite floats; serialization cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Axis-aligned bounds of the authored vertices.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        bounding_box(self.vertices.iter().map(|&p| Point::from(p)))
    }

    /// Copy of this level translated so its bounds sit centred in a
    /// `width` x `height` playfield.
    pub fn centered_in(&self, width: f64, height: f64) -> LevelData {
        let mut out = self.clone();
        if let Some((lo, hi)) = self.bounds() {
            let dx = (width - (hi.x - lo.x)) / 2.0 - lo.x;
            let dy = (height - (hi.y - lo.y)) / 2.0 - lo.y;
            for v in out.vertices.iter_mut() {
                v.0 += dx;
                v.1 += dy;
            }
        }
        out
    }
}

/// An ordered campaign of levels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelPack {
    pub levels: Vec<LevelData>,
}

impl LevelPack {
    /// Accepts either `{"levels": [...]}` or a bare array of levels.
    pub fn from_json_value_strict(v: Value) -> Result<LevelPack, LevelError> {
        let levels: Vec<LevelData> = match v {
            Value::Array(_) => serde_json::from_value(v)?,
            Value::Object(mut obj) => match obj.remove("levels") {
                Some(levels) => serde_json::from_value(levels)?,
                None => return Err(LevelError::Json("missing 'levels'".to_string())),
            },
            _ => return Err(LevelError::Json("expected an object or array".to_string())),
        };
        if levels.len() > limits::MAX_LEVELS {
            return Err(LevelError::LimitExceeded {
                what: "levels",
                max: limits::MAX_LEVELS,
                got: levels.len(),
            });
        }
        for level in &levels {
            level.validate()?;
        }
        Ok(LevelPack { levels })
    }

    pub fn from_json_str(s: &str) -> Result<LevelPack, LevelError> {
        Self::from_json_value_strict(serde_json::from_str(s)?)
    }

    pub fn to_json_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at `index`, wrapping past the end so a finished campaign
    /// starts over.
    pub fn get(&self, index: usize) -> Option<&LevelData> {
        if self.levels.is_empty() {
            return None;
        }
        self.levels.get(index % self.levels.len())
    }

    pub fn names(&self) -> Vec<&str> {
        self.levels.iter().map(|l| l.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScoreKind;
    use serde_json::json;

    #[test]
    fn short_scoring_symbols() {
        let v = json!({"name": "t", "vertices": [[0, 0], [1, 0]], "edges": [[0, 1]],
                       "scoring": {"kind": "*", "threshold": 3}});
        let d = LevelData::from_json_value_strict(v).unwrap();
        assert_eq!(d.scoring.kind, ScoreKind::AtMost);
        assert_eq!(d.scoring.threshold, 3);
        let v = json!({"vertices": [], "edges": [], "scoring": {"kind": "=", "threshold": 2}});
        let d = LevelData::from_json_value_strict(v).unwrap();
        assert_eq!(d.scoring, ScoringRule::equal(2));
    }

    #[test]
    fn missing_scoring_defaults_to_untangled() {
        let d = LevelData::from_json_str(r#"{"vertices": [[0,0]], "edges": []}"#).unwrap();
        assert_eq!(d.scoring, ScoringRule::at_most(0));
    }

    #[test]
    fn self_edge_rejected() {
        let v = json!({"vertices": [[0, 0], [1, 0]], "edges": [[1, 1]]});
        let err = LevelData::from_json_value_strict(v).unwrap_err();
        assert_eq!(err, LevelError::InvalidEdge { a: 1, b: 1 });
    }

    #[test]
    fn edge_index_out_of_range() {
        let v = json!({"vertices": [[0, 0], [1, 0]], "edges": [[0, 2]]});
        let err = LevelData::from_json_value_strict(v).unwrap_err();
        assert_eq!(err.code(), "invalid_id");
    }

    #[test]
    fn centering() {
        let d = LevelData::new("c", vec![(0.0, 0.0), (10.0, 20.0)], vec![(0, 1)], ScoringRule::default());
        let c = d.centered_in(100.0, 100.0);
        assert_eq!(c.vertices, vec![(45.0, 40.0), (55.0, 60.0)]);
    }

    #[test]
    fn pack_wraps() {
        let v = json!({"levels": [
            {"name": "a", "vertices": [], "edges": []},
            {"name": "b", "vertices": [], "edges": []}
        ]});
        let pack = LevelPack::from_json_value_strict(v).unwrap();
        assert_eq!(pack.names(), vec!["a", "b"]);
        assert_eq!(pack.get(2).map(|l| l.name.as_str()), Some("a"));
        assert!(LevelPack::default().get(0).is_none());
    }

    #[test]
    fn round_trip_json() {
        let d = LevelData::new("r", vec![(1.5, -2.0)], vec![], ScoringRule::equal(4));
        let back = LevelData::from_json_value_strict(d.to_json_value()).unwrap();
        assert_eq!(back, d);
    }
}
