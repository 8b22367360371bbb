//! Structural graph elements. Styling is left to the renderer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Class,
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    Mapped,
    #[default]
    Unmapped,
}

impl Coverage {
    pub fn from_mapped(mapped: bool) -> Self {
        if mapped {
            Coverage::Mapped
        } else {
            Coverage::Unmapped
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Synthesized for a class that is referenced but not listed.
    pub stub: bool,
    pub coverage: Coverage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub coverage: Coverage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphElement {
    Edge(GraphEdge),
    Node(GraphNode),
}

impl GraphElement {
    pub fn id(&self) -> &str {
        match self {
            GraphElement::Node(node) => &node.id,
            GraphElement::Edge(edge) => &edge.id,
        }
    }

    pub fn as_node(&self) -> Option<&GraphNode> {
        match self {
            GraphElement::Node(node) => Some(node),
            GraphElement::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&GraphEdge> {
        match self {
            GraphElement::Edge(edge) => Some(edge),
            GraphElement::Node(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_and_edge_json_shapes() {
        let node = GraphElement::Node(GraphNode {
            id: "http://ex.org/A".to_string(),
            label: "A".to_string(),
            kind: ElementKind::Class,
            stub: true,
            coverage: Coverage::Unmapped,
        });
        let json = serde_json::to_value(&node).expect("node");
        assert_eq!(json["type"], "class");
        assert_eq!(json["stub"], true);
        assert_eq!(json["coverage"], "unmapped");

        let edge = GraphElement::Edge(GraphEdge {
            id: "http://ex.org/p-edge".to_string(),
            source: "http://ex.org/A".to_string(),
            target: "http://ex.org/B".to_string(),
            label: "p".to_string(),
            kind: ElementKind::Property,
            coverage: Coverage::Mapped,
        });
        let json = serde_json::to_value(&edge).expect("edge");
        assert_eq!(json["type"], "property");
        assert_eq!(json["coverage"], "mapped");

        let back: GraphElement = serde_json::from_value(json).expect("roundtrip");
        assert!(back.as_edge().is_some());
    }
}
