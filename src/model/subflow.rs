use super::edge::Edge;
use super::node::{Node, Size};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Config key holding a loop's nested subflow.
pub const SUBFLOW_KEY: &str = "subflow";

pub const DEFAULT_SUBFLOW_WIDTH: f64 = 320.0;
pub const DEFAULT_SUBFLOW_HEIGHT: f64 = 154.0;

/// Typed view of a loop node's `config.subflow`.
///
/// `nodes` and `edges` are a denormalized copy of the loop's children, kept for
/// export only. Unknown keys survive a read/write cycle through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subflow {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Subflow {
    fn default() -> Self {
        Self {
            width: DEFAULT_SUBFLOW_WIDTH,
            height: DEFAULT_SUBFLOW_HEIGHT,
            nodes: Vec::new(),
            edges: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Subflow {
    /// Reads `config.subflow`, falling back to defaults field by field so a
    /// malformed mirror never hides the container size.
    pub fn from_config(config: &Map<String, Value>) -> Self {
        let Some(Value::Object(raw)) = config.get(SUBFLOW_KEY) else {
            return Self::default();
        };

        let width = raw
            .get("width")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_SUBFLOW_WIDTH);
        let height = raw
            .get("height")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_SUBFLOW_HEIGHT);
        let nodes = raw
            .get("nodes")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        let edges = raw
            .get("edges")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        let extra = raw
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "width" | "height" | "nodes" | "edges"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            width,
            height,
            nodes,
            edges,
            extra,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Stores this subflow back under `config.subflow`, replacing what was there.
    pub fn write_into(&self, config: &mut Map<String, Value>) -> Result<(), serde_json::Error> {
        config.insert(SUBFLOW_KEY.to_string(), serde_json::to_value(self)?);
        Ok(())
    }
}
