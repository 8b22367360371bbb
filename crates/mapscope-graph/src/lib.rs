//! mapscope ontology graph
//!
//! Builds the bounded class/property graph shown next to a mapping for
//! review context. Nodes carry structural tags only (`stub`, `coverage`);
//! how those look is up to the renderer.

pub mod builder;
pub mod config;
pub mod coverage;
pub mod element;
pub mod ontology;

pub use builder::{build_graph_elements, is_datatype_range};
pub use config::GraphConfig;
pub use coverage::{coverage_from_mapping, MappedUris};
pub use element::{Coverage, ElementKind, GraphEdge, GraphElement, GraphNode};
pub use ontology::{OntologyClass, OntologyPayload, OntologyProperty};
