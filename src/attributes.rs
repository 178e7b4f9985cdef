use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Attribute key carrying a task's estimate in the data store documents.
pub const STORY_POINTS_KEY: &str = "StoryPoints";
/// Attribute key carrying an employee's seniority in the data store documents.
pub const SENIORITY_KEY: &str = "Seniority";

/// Duration used for tasks whose estimate is missing or unusable.
pub const DEFAULT_DURATION: i64 = 1;
/// Layer used for employees whose seniority is missing or unrecognised.
pub const DEFAULT_SENIORITY_LAYER: usize = 3;
/// Number of seniority layers before empty ones are dropped.
pub const SENIORITY_LAYER_COUNT: usize = 5;

pub type EdgeAttributes = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Seniority {
    Director,
    ViceDirector,
    Lead,
    Senior,
    MidLevel,
    Junior,
    Other(String),
}

impl Seniority {
    pub fn as_str(&self) -> &str {
        match self {
            Seniority::Director => "Director",
            Seniority::ViceDirector => "Vice-Director",
            Seniority::Lead => "Lead",
            Seniority::Senior => "Senior",
            Seniority::MidLevel => "Mid-Level",
            Seniority::Junior => "Junior",
            Seniority::Other(label) => label,
        }
    }

    /// Hierarchy layer, leadership first.
    pub fn layer(&self) -> usize {
        match self {
            Seniority::Director | Seniority::ViceDirector => 0,
            Seniority::Lead => 1,
            Seniority::Senior => 2,
            Seniority::MidLevel => 3,
            Seniority::Junior => 4,
            Seniority::Other(_) => DEFAULT_SENIORITY_LAYER,
        }
    }
}

impl From<&str> for Seniority {
    fn from(value: &str) -> Self {
        match value.trim() {
            "Director" => Seniority::Director,
            "Vice-Director" => Seniority::ViceDirector,
            "Lead" => Seniority::Lead,
            "Senior" => Seniority::Senior,
            "Mid-Level" => Seniority::MidLevel,
            "Junior" => Seniority::Junior,
            other => Seniority::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Seniority {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Seniority {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Seniority::from(raw.as_str()))
    }
}

/// Typed view over a node's document.
///
/// The engines interpret `story_points` and `seniority`; every other field is
/// carried in `extra` so the rendering layer still sees it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct NodeAttributes {
    #[serde(rename = "StoryPoints", default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<i64>,
    #[serde(rename = "Seniority", default, skip_serializing_if = "Option::is_none")]
    pub seniority: Option<Seniority>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_story_points(mut self, points: i64) -> Self {
        self.story_points = (points >= 0).then_some(points);
        self
    }

    pub fn with_seniority(mut self, seniority: impl Into<Seniority>) -> Self {
        self.seniority = Some(seniority.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Lift the known keys out of a raw document.
    ///
    /// Malformed estimates are dropped rather than rejected; the scheduling
    /// engine falls back to [`DEFAULT_DURATION`] for them.
    pub fn from_document(mut document: Map<String, Value>) -> Self {
        let story_points = match document.remove(STORY_POINTS_KEY) {
            Some(raw) => {
                let parsed = parse_story_points(&raw);
                if parsed.is_none() {
                    debug!(value = %raw, "ignoring unusable story points");
                }
                parsed
            }
            None => None,
        };

        let seniority = match document.remove(SENIORITY_KEY) {
            Some(Value::String(label)) => Some(Seniority::from(label.as_str())),
            Some(other) => {
                debug!(value = %other, "ignoring non-string seniority");
                None
            }
            None => None,
        };

        Self {
            story_points,
            seniority,
            extra: document,
        }
    }

    pub fn duration(&self) -> i64 {
        self.story_points.unwrap_or(DEFAULT_DURATION)
    }

    pub fn seniority_layer(&self) -> usize {
        self.seniority
            .as_ref()
            .map(Seniority::layer)
            .unwrap_or(DEFAULT_SENIORITY_LAYER)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

impl From<Map<String, Value>> for NodeAttributes {
    fn from(document: Map<String, Value>) -> Self {
        Self::from_document(document)
    }
}

// Floats that convert to `i64` without saturating.
const I64_FLOAT_MIN: f64 = -9_223_372_036_854_775_808.0;
const I64_FLOAT_END: f64 = 9_223_372_036_854_775_808.0;

fn parse_story_points(raw: &Value) -> Option<i64> {
    let points = match raw {
        Value::Number(number) => match number.as_i64() {
            Some(int) => Some(int),
            None => number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && (I64_FLOAT_MIN..I64_FLOAT_END).contains(f))
                .map(|f| f as i64),
        },
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    points.filter(|p| *p >= 0)
}
