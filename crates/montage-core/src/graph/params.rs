//! Per-kind node parameter records.

use super::node::NodeKind;
use crate::{EncodedAudio, GraphError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter key holding source audio on Input/Record nodes.
pub const FILE_KEY: &str = "file";

/// Value passed to [`Graph::update_node_parameter`](super::Graph::update_node_parameter).
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Audio(EncodedAudio),
}

impl ParamValue {
    /// Numeric view; numeric strings are accepted the way form inputs deliver them.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_seconds(s),
            Self::Audio(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Audio(_) => "audio",
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<EncodedAudio> for ParamValue {
    fn from(audio: EncodedAudio) -> Self {
        Self::Audio(audio)
    }
}

/// Effect applied by an Effect node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectName {
    #[default]
    None,
    FadeIn,
    FadeOut,
    Echo,
    Reverb,
}

impl EffectName {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "fadeIn" => Some(Self::FadeIn),
            "fadeOut" => Some(Self::FadeOut),
            "echo" => Some(Self::Echo),
            "reverb" => Some(Self::Reverb),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FadeIn => "fadeIn",
            Self::FadeOut => "fadeOut",
            Self::Echo => "echo",
            Self::Reverb => "reverb",
        }
    }
}

/// Configuration of a node, one variant per kind. Holds data only.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeParams {
    Input { label: String },
    Record,
    Trim { start: String, duration: String },
    Effect { effect: EffectName, fade_duration: f64 },
    Merge,
    Output { label: String },
}

impl NodeParams {
    /// Default parameters for a freshly added node.
    pub fn defaults(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Input => Self::Input {
                label: "Input File".into(),
            },
            NodeKind::Record => Self::Record,
            NodeKind::Trim => Self::Trim {
                start: "00:00:00".into(),
                duration: "10".into(),
            },
            NodeKind::Effect => Self::Effect {
                effect: EffectName::None,
                fade_duration: 1.0,
            },
            NodeKind::Merge => Self::Merge,
            NodeKind::Output => Self::Output {
                label: "Output File".into(),
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Input { .. } => NodeKind::Input,
            Self::Record => NodeKind::Record,
            Self::Trim { .. } => NodeKind::Trim,
            Self::Effect { .. } => NodeKind::Effect,
            Self::Merge => NodeKind::Merge,
            Self::Output { .. } => NodeKind::Output,
        }
    }

    /// Whether `key` names a parameter of this kind (including `file` on sources).
    pub fn has_key(&self, key: &str) -> bool {
        let keys: &[&str] = match self {
            Self::Input { .. } => &["label", FILE_KEY],
            Self::Record => &[FILE_KEY],
            Self::Trim { .. } => &["start", "duration"],
            Self::Effect { .. } => &["effect", "fadeDuration"],
            Self::Merge => &[],
            Self::Output { .. } => &["label"],
        };
        keys.contains(&key)
    }

    /// Apply a scalar parameter. `file` is handled by the graph, not here.
    pub(crate) fn set(&mut self, key: &str, value: &ParamValue) -> Result<(), GraphError> {
        match (self, key) {
            (Self::Input { label }, "label") | (Self::Output { label }, "label") => {
                *label = expect_text(key, value)?;
            }
            (Self::Trim { start, .. }, "start") => {
                *start = expect_text(key, value)?;
            }
            (Self::Trim { duration, .. }, "duration") => {
                *duration = match value {
                    ParamValue::Number(n) => n.to_string(),
                    ParamValue::Text(s) => s.clone(),
                    ParamValue::Audio(_) => return Err(type_mismatch(key, "number or text", value)),
                };
            }
            (Self::Effect { effect, .. }, "effect") => {
                let name = expect_text(key, value)?;
                *effect = EffectName::parse(&name).ok_or_else(|| GraphError::InvalidParameter {
                    key: key.to_string(),
                    reason: format!("unknown effect '{}'", name),
                })?;
            }
            (Self::Effect { fade_duration, .. }, "fadeDuration") => {
                let seconds = value
                    .as_f64()
                    .filter(|s| s.is_finite() && *s >= 0.0)
                    .ok_or_else(|| GraphError::InvalidParameter {
                        key: key.to_string(),
                        reason: "expected a non-negative number of seconds".into(),
                    })?;
                *fade_duration = seconds;
            }
            (params, _) => {
                return Err(GraphError::InvalidParameter {
                    key: key.to_string(),
                    reason: format!("not settable on {:?} nodes", params.kind()),
                })
            }
        }
        Ok(())
    }

    /// Scalar parameters as JSON, for graph descriptions.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        match self {
            Self::Input { label } | Self::Output { label } => {
                map.insert("label".into(), Value::String(label.clone()));
            }
            Self::Trim { start, duration } => {
                map.insert("start".into(), Value::String(start.clone()));
                map.insert("duration".into(), Value::String(duration.clone()));
            }
            Self::Effect {
                effect,
                fade_duration,
            } => {
                map.insert("effect".into(), Value::String(effect.as_str().into()));
                map.insert("fadeDuration".into(), Value::from(*fade_duration));
            }
            Self::Record | Self::Merge => {}
        }
        map
    }
}

/// Parse a seconds field the way a numeric form input is read.
///
/// Surrounding whitespace is ignored and an empty string reads as zero.
pub fn parse_seconds(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert a JSON descriptor value to a parameter value.
pub(crate) fn value_from_json(key: &str, value: &Value) -> Result<ParamValue, GraphError> {
    match value {
        Value::Number(n) => n.as_f64().map(ParamValue::Number).ok_or_else(|| {
            GraphError::InvalidParameter {
                key: key.to_string(),
                reason: "number out of range".into(),
            }
        }),
        Value::String(s) => Ok(ParamValue::Text(s.clone())),
        other => Err(GraphError::InvalidParameter {
            key: key.to_string(),
            reason: format!("unsupported JSON value {}", other),
        }),
    }
}

fn expect_text(key: &str, value: &ParamValue) -> Result<String, GraphError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| type_mismatch(key, "text", value))
}

fn type_mismatch(key: &str, expected: &str, value: &ParamValue) -> GraphError {
    GraphError::InvalidParameter {
        key: key.to_string(),
        reason: format!("expected {}, got {}", expected, value.type_name()),
    }
}
