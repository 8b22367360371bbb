//! Ontology classes/properties → bounded node/edge list.
//!
//! Output is deterministic and order-stable: class nodes in input order, then
//! for each property any stub nodes it introduces followed by its edge.

use std::collections::HashSet;
use std::sync::OnceLock;

use mapscope_model::display_label;
use regex::Regex;

use crate::config::GraphConfig;
use crate::element::{Coverage, ElementKind, GraphEdge, GraphElement, GraphNode};
use crate::ontology::{OntologyClass, OntologyProperty};

fn datatype_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"xsd\b|XMLSchema").unwrap())
}

/// Whether a range IRI names a datatype rather than a class.
pub fn is_datatype_range(range: &str) -> bool {
    datatype_re().is_match(range)
}

pub fn build_graph_elements(
    classes: &[OntologyClass],
    properties: &[OntologyProperty],
    config: &GraphConfig,
) -> Vec<GraphElement> {
    let classes = &classes[..classes.len().min(config.max_classes)];
    let properties = &properties[..properties.len().min(config.max_properties)];

    let mut builder = GraphBuilder::new(config);
    for class in classes {
        builder.add_class(class);
    }
    for property in properties {
        builder.add_property(property);
    }
    builder.elements
}

struct GraphBuilder<'a> {
    config: &'a GraphConfig,
    elements: Vec<GraphElement>,
    node_ids: HashSet<String>,
    edge_ids: HashSet<String>,
}

impl<'a> GraphBuilder<'a> {
    fn new(config: &'a GraphConfig) -> Self {
        Self {
            config,
            elements: Vec::new(),
            node_ids: HashSet::new(),
            edge_ids: HashSet::new(),
        }
    }

    fn skip(&self, uri: &str, reason: &str) {
        if self.config.debug {
            tracing::debug!(property = %uri, reason, "property skipped");
        }
    }

    fn push_node(&mut self, id: &str, label: String, stub: bool) {
        if !self.node_ids.insert(id.to_string()) {
            return;
        }
        self.elements.push(GraphElement::Node(GraphNode {
            id: id.to_string(),
            label,
            kind: ElementKind::Class,
            stub,
            coverage: Coverage::from_mapped(self.config.mapped_class_uris.contains(id)),
        }));
    }

    fn add_class(&mut self, class: &OntologyClass) {
        let label = display_label(
            class.label.as_deref(),
            class.pref_label.as_deref(),
            class.comment.as_deref(),
            &class.uri,
        );
        self.push_node(&class.uri, label, false);
    }

    fn ensure_stub(&mut self, uri: &str) {
        if !self.node_ids.contains(uri) {
            self.push_node(uri, display_label(None, None, None, uri), true);
        }
    }

    fn add_property(&mut self, property: &OntologyProperty) {
        let endpoint = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let (Some(domain), Some(range)) = (endpoint(&property.domain), endpoint(&property.range))
        else {
            self.skip(&property.uri, "missing domain or range");
            return;
        };

        let data_property = match property.is_object_property {
            Some(is_object) => !is_object,
            None => is_datatype_range(&range),
        };
        if data_property && !self.config.allow_data_properties {
            self.skip(&property.uri, "datatype range");
            return;
        }

        if self.config.include_stubs {
            self.ensure_stub(&domain);
            self.ensure_stub(&range);
        }

        if domain == range {
            self.skip(&property.uri, "self loop");
            return;
        }
        if !self.node_ids.contains(&domain) || !self.node_ids.contains(&range) {
            self.skip(&property.uri, "endpoint not in graph");
            return;
        }

        let id = format!("{}-edge", property.uri);
        if !self.edge_ids.insert(id.clone()) {
            return;
        }
        let label = display_label(
            property.label.as_deref(),
            property.pref_label.as_deref(),
            property.comment.as_deref(),
            &property.uri,
        );
        self.elements.push(GraphElement::Edge(GraphEdge {
            id,
            source: domain,
            target: range,
            label,
            kind: ElementKind::Property,
            coverage: Coverage::from_mapped(
                self.config.mapped_property_uris.contains(&property.uri),
            ),
        }));
    }
}
