use std::collections::BTreeSet;

/// At most one selected node plus any number of selected edges. The two are
/// independent; a click on the empty canvas clears both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub node: Option<String>,
    pub edges: BTreeSet<String>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.node = None;
        self.edges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_none() && self.edges.is_empty()
    }
}
