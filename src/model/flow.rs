use super::category::NodeCategory;
use super::definition::{CommentNote, Connection, FlowDescription, Node};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The complete parsed model of one message flow document.
///
/// Nodes are partitioned by category; every node sits in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageFlow {
    pub buckets: BTreeMap<NodeCategory, Vec<Node>>,
    pub connections: Vec<Connection>,
    pub comments: Vec<CommentNote>,
    pub description: FlowDescription,
}

impl MessageFlow {
    /// Appends a node to the bucket of its own category.
    pub(crate) fn insert_node(&mut self, node: Node) {
        self.buckets.entry(node.category).or_default().push(node);
    }

    /// Nodes of one category. Empty when the flow has none.
    pub fn nodes(&self, category: NodeCategory) -> &[Node] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn all_nodes(&self) -> impl Iterator<Item = &Node> {
        self.buckets.values().flatten()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.all_nodes().find(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn connections_from<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .iter()
            .filter(move |c| c.source_node_id == node_id)
    }

    pub fn connections_to<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .iter()
            .filter(move |c| c.target_node_id == node_id)
    }

    /// Number of nodes per non-empty category, in category order.
    pub fn category_counts(&self) -> Vec<(NodeCategory, usize)> {
        self.buckets
            .iter()
            .filter(|(_, nodes)| !nodes.is_empty())
            .map(|(category, nodes)| (*category, nodes.len()))
            .collect()
    }

    /// Renders the model as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for MessageFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self
            .category_counts()
            .into_iter()
            .map(|(category, count)| format!("{}: {}", category, count))
            .join(", ");
        write!(
            f,
            "{} nodes [{}], {} connections, {} comments",
            self.node_count(),
            counts,
            self.connections.len(),
            self.comments.len()
        )
    }
}
