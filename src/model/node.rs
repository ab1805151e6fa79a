use super::subflow::Subflow;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// The fixed set of node kinds the canvas understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Start,
    End,
    Http,
    Sql,
    Redis,
    Script,
    Switch,
    Loop,
    SetVariable,
}

impl NodeType {
    pub const ALL: [NodeType; 9] = [
        NodeType::Start,
        NodeType::End,
        NodeType::Http,
        NodeType::Sql,
        NodeType::Redis,
        NodeType::Script,
        NodeType::Switch,
        NodeType::Loop,
        NodeType::SetVariable,
    ];

    /// The wire name, as it appears in exported documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Start => "START",
            NodeType::End => "END",
            NodeType::Http => "HTTP",
            NodeType::Sql => "SQL",
            NodeType::Redis => "REDIS",
            NodeType::Script => "SCRIPT",
            NodeType::Switch => "SWITCH",
            NodeType::Loop => "LOOP",
            NodeType::SetVariable => "SET_VARIABLE",
        }
    }

    /// Label given to freshly created nodes.
    pub fn default_label(&self) -> &'static str {
        match self {
            NodeType::Start => "Start",
            NodeType::End => "End",
            NodeType::Http => "HTTP",
            NodeType::Sql => "SQL",
            NodeType::Redis => "Redis",
            NodeType::Script => "Script",
            NodeType::Switch => "Switch",
            NodeType::Loop => "Loop",
            NodeType::SetVariable => "Variable",
        }
    }

    /// Only loops own an interior region that other nodes can live in.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeType::Loop)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown node type '{}'", s))
    }
}

/// A point, either on the root canvas or inside a loop's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Componentwise maximum.
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Replaces any non-finite component with the one from `fallback`.
    pub fn or_finite(self, fallback: Size) -> Size {
        let pick = |value: f64, other: f64| if value.is_finite() { value } else { other };
        Size::new(pick(self.width, fallback.width), pick(self.height, fallback.height))
    }
}

/// One unit of the workflow graph.
///
/// `position` is relative to the containing scope: the root canvas when
/// `parent_id` is `None`, otherwise the parent loop's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType, position: Position) -> Self {
        Self {
            id: id.into(),
            node_type,
            position,
            parent_id: None,
            size: None,
            label: None,
            config: Map::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_config(mut self, config: Map<String, Value>) -> Self {
        self.config = config;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Number of entries in `config.cases`; zero when absent or malformed.
    pub fn case_count(&self) -> usize {
        self.config
            .get("cases")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Typed view over `config.subflow`, with defaults filled in.
    pub fn subflow(&self) -> Subflow {
        Subflow::from_config(&self.config)
    }
}
