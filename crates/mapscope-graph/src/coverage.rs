//! Mapped-URI sets derived from a normalized mapping.

use std::collections::BTreeSet;

use mapscope_model::{NormalizedMapping, UNKNOWN};

use crate::config::GraphConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedUris {
    pub classes: BTreeSet<String>,
    pub properties: BTreeSet<String>,
}

/// Entity and target classes, plus every data and object property predicate.
pub fn coverage_from_mapping(mapping: &NormalizedMapping) -> MappedUris {
    let mut mapped = MappedUris::default();
    let mut add_class = |class: &str| {
        if !class.is_empty() && class != UNKNOWN {
            mapped.classes.insert(class.to_string());
        }
    };

    for source in &mapping.sources {
        add_class(&source.entity_class);
        for rel in &source.object_properties {
            add_class(&rel.target_class);
        }
    }

    let predicates = mapping.sources.iter().flat_map(|source| {
        source
            .properties
            .values()
            .map(|p| p.predicate.as_str())
            .chain(source.object_properties.iter().flat_map(|rel| {
                std::iter::once(rel.predicate.as_str())
                    .chain(rel.properties.values().map(|p| p.predicate.as_str()))
            }))
    });
    mapped.properties = predicates
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    mapped
}

impl GraphConfig {
    pub fn with_coverage(mut self, mapped: MappedUris) -> Self {
        self.mapped_class_uris = mapped.classes;
        self.mapped_property_uris = mapped.properties;
        self
    }
}
