use crate::model::NodeType;
use ahash::AHashMap;
use serde_json::{Map, Value, json};

/// Supplies per-type default configuration and documentation paths.
///
/// The form renderer that edits node configs sits behind this seam; the
/// editor only needs a fresh default config per type and a doc path.
pub trait ConfigProvider: Send + Sync {
    /// A fresh, unaliased default config for `node_type`, or `None` when the
    /// provider has no template for it.
    fn default_config(&self, node_type: NodeType) -> Option<Map<String, Value>>;

    /// Location of the markdown documentation for `node_type`.
    fn doc_path(&self, node_type: NodeType) -> String {
        format!("docs/{}_node.md", node_type.as_str().to_ascii_lowercase())
    }
}

/// Table of default configs keyed by node type.
///
/// Every lookup returns a deep copy, so no two nodes ever share config state.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: AHashMap<NodeType, Map<String, Value>>,
}

impl TemplateRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock templates for all nine node types.
    pub fn builtin() -> Self {
        NodeType::ALL
            .into_iter()
            .fold(Self::empty(), |registry, t| registry.with_template(t, builtin_template(t)))
    }

    /// Registers or replaces the template for `node_type`. Non-object values are
    /// stored as an empty config.
    pub fn with_template(mut self, node_type: NodeType, template: Value) -> Self {
        let config = match template {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.templates.insert(node_type, config);
        self
    }

    pub fn without_template(mut self, node_type: NodeType) -> Self {
        self.templates.remove(&node_type);
        self
    }

    pub fn has_template(&self, node_type: NodeType) -> bool {
        self.templates.contains_key(&node_type)
    }
}

impl ConfigProvider for TemplateRegistry {
    fn default_config(&self, node_type: NodeType) -> Option<Map<String, Value>> {
        self.templates.get(&node_type).cloned()
    }
}

fn builtin_template(node_type: NodeType) -> Value {
    match node_type {
        NodeType::Start | NodeType::End => json!({}),
        NodeType::Http => json!({
            "url": "",
            "method": "GET",
            "headers": {},
            "body": "",
            "timeout": 30000
        }),
        NodeType::Sql => json!({
            "dataSourceCode": "",
            "operation": "QUERY",
            "sql": "",
            "params": []
        }),
        NodeType::Redis => json!({
            "dataSourceCode": "",
            "operation": "GET",
            "key": "",
            "expire": 3600
        }),
        NodeType::Script => json!({
            "language": "javascript",
            "code": "// Write the script here\nfunction process(input) {\n  return input;\n}"
        }),
        NodeType::Switch => json!({
            "expression": "#{payload}",
            "cases": [],
            "default": ""
        }),
        NodeType::Loop => json!({
            "mode": "WHILE",
            "condition": "#{index < 10}",
            "initialization": "#{index = 0}",
            "maxIterations": 1000,
            "subflow": {
                "width": 320,
                "height": 154,
                "nodes": [],
                "edges": []
            }
        }),
        NodeType::SetVariable => json!({ "variables": {} }),
    }
}
