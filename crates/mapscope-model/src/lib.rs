//! mapscope normalized mapping model
//!
//! Every mapping front-end (RML, YARRRML, inline v1/v2 configs) is reduced to
//! the same small entity/relationship shape defined here:
//!
//! - [`NormalizedMapping`]: the format tag plus its top-level [`Source`]s
//! - [`Source`]: one parent entity, its data properties and nested relationships
//! - [`ObjectPropertyMapping`]: a relationship to a nested entity with a resolved join column
//!
//! The helpers in [`iri`] and [`join`] are shared by the parsers and the
//! ontology graph builder so labels and foreign-key columns are derived the
//! same way everywhere.

pub mod iri;
pub mod join;
pub mod model;

pub use iri::{display_label, local_name};
pub use join::{
    class_local_name, first_brace_placeholder, first_paren_placeholder, infer_join_column,
};
pub use model::{
    MappingFormat, NormalizedMapping, ObjectPropertyMapping, PropertyMapping, PropertyMap, Source,
    UNKNOWN,
};
