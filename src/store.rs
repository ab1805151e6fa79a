use crate::model::{Edge, Node, NodeType, Position};
use ahash::{AHashMap, AHashSet};

/// The canonical in-memory graph: a flat, ordered sequence of nodes and edges.
///
/// Containment is expressed only through `Node::parent_id`; the loop mirrors
/// stored in node configs are derived from this store, never the other way round.
/// Reads are public, writes go through [`crate::editor::GraphEditor`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphStore {
    /// Builds a store from raw parts without checking any invariant.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn nodes_by_id(&self) -> AHashMap<&str, &Node> {
        self.nodes.iter().map(|n| (n.id.as_str(), n)).collect()
    }

    /// Direct children of `parent_id`, in store order.
    pub fn children_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_deref() == Some(parent_id))
    }

    /// Ids of every node nested under `ancestor_id`, at any depth.
    pub fn descendants_of(&self, ancestor_id: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut frontier = vec![ancestor_id];
        while let Some(current) = frontier.pop() {
            for child in self.children_of(current) {
                if seen.insert(child.id.as_str()) {
                    found.push(child.id.clone());
                    frontier.push(child.id.as_str());
                }
            }
        }
        found
    }

    /// Walks the parent chain from `id` upwards, excluding `id` itself.
    pub fn ancestors_of(&self, id: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut cursor = self.node(id).and_then(|n| n.parent_id.clone());
        while let Some(current) = cursor {
            if current == id || chain.contains(&current) || chain.len() > self.nodes.len() {
                break;
            }
            cursor = self.node(&current).and_then(|n| n.parent_id.clone());
            chain.push(current);
        }
        chain
    }

    /// Nesting depth: zero for root nodes.
    pub fn depth(&self, id: &str) -> usize {
        self.ancestors_of(id).len()
    }

    /// Position on the root canvas, summing offsets up the parent chain.
    pub fn absolute_position(&self, id: &str) -> Option<Position> {
        let node = self.node(id)?;
        let offset = self
            .ancestors_of(id)
            .iter()
            .filter_map(|ancestor| self.node(ancestor))
            .fold(Position::default(), |acc, n| acc + n.position);
        Some(node.position + offset)
    }

    pub fn root_count(&self, node_type: NodeType) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.is_root() && n.node_type == node_type)
            .count()
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Drops every node whose id is in `ids`, returning how many went.
    pub(crate) fn remove_nodes(&mut self, ids: &AHashSet<String>) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| !ids.contains(&n.id));
        before - self.nodes.len()
    }

    /// Removes edges matching `predicate` and returns them.
    pub(crate) fn take_edges(&mut self, predicate: impl Fn(&Edge) -> bool) -> Vec<Edge> {
        let (taken, kept): (Vec<Edge>, Vec<Edge>) =
            std::mem::take(&mut self.edges).into_iter().partition(|e| predicate(e));
        self.edges = kept;
        taken
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}
