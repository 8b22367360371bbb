//! Normalized entity/relationship model.
//!
//! All values are derived: parsers build them from scratch on every input and
//! nothing here is mutated after a parse returns.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder used whenever a class, join column, or similar field cannot be
/// recovered from the input.
pub const UNKNOWN: &str = "Unknown";

/// Column name → property mapping, in declaration order.
pub type PropertyMap = IndexMap<String, PropertyMapping>;

/// Which front-end produced a [`NormalizedMapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingFormat {
    #[serde(rename = "rml")]
    Rml,
    #[serde(rename = "yarrrml")]
    Yarrrml,
    #[serde(rename = "v1")]
    V1,
    #[serde(rename = "v2-inline")]
    V2Inline,
}

impl MappingFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rml => "rml",
            Self::Yarrrml => "yarrrml",
            Self::V1 => "v1",
            Self::V2Inline => "v2-inline",
        }
    }
}

impl std::fmt::Display for MappingFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMapping {
    pub predicate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    pub column: String,
}

impl PropertyMapping {
    pub fn new(predicate: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            datatype: None,
            column: column.into(),
        }
    }

    pub fn with_datatype(mut self, datatype: Option<String>) -> Self {
        self.datatype = datatype;
        self
    }
}

/// A relationship from a parent entity to a nested entity.
///
/// `join_column` is never empty: every front-end resolves it through its own
/// precedence and falls back to a deterministic placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPropertyMapping {
    pub predicate: String,
    pub target_class: String,
    pub target_iri_template: String,
    pub join_column: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub name: String,
    pub entity_class: String,
    pub iri_template: String,
    /// Data file / table the rows come from, when the mapping names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default)]
    pub properties: PropertyMap,
    #[serde(default)]
    pub object_properties: Vec<ObjectPropertyMapping>,
}

impl Source {
    /// A source with the class defaulted to [`UNKNOWN`] and no template.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_class: UNKNOWN.to_string(),
            iri_template: String::new(),
            source_file: None,
            properties: PropertyMap::new(),
            object_properties: Vec::new(),
        }
    }

    /// Insert a data property keyed by its column.
    ///
    /// A later mapping for the same column replaces the earlier one but keeps
    /// its original position, so keys stay unique and ordered.
    pub fn insert_property(&mut self, mapping: PropertyMapping) {
        self.properties.insert(mapping.column.clone(), mapping);
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
            + self
                .object_properties
                .iter()
                .map(|op| op.properties.len())
                .sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMapping {
    pub format: MappingFormat,
    pub sources: Vec<Source>,
}

impl NormalizedMapping {
    pub fn empty(format: MappingFormat) -> Self {
        Self {
            format,
            sources: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn source(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_field_names() {
        let mut source = Source::new("LoanMap");
        source.entity_class = "ex:Loan".to_string();
        source.insert_property(PropertyMapping::new("ex:hasAmount", "LoanAmount"));
        source.object_properties.push(ObjectPropertyMapping {
            predicate: "ex:hasBorrower".to_string(),
            target_class: "ex:Borrower".to_string(),
            target_iri_template: "ex:borrower/{BorrowerID}".to_string(),
            join_column: "BorrowerID".to_string(),
            properties: PropertyMap::new(),
        });
        let mapping = NormalizedMapping {
            format: MappingFormat::V2Inline,
            sources: vec![source],
        };

        let json = serde_json::to_value(&mapping).expect("serialize");
        assert_eq!(json["format"], "v2-inline");
        assert_eq!(json["sources"][0]["entityClass"], "ex:Loan");
        assert_eq!(json["sources"][0]["iriTemplate"], "");
        assert!(json["sources"][0].get("sourceFile").is_none());
        assert_eq!(
            json["sources"][0]["objectProperties"][0]["joinColumn"],
            "BorrowerID"
        );
        assert!(json["sources"][0]["properties"]["LoanAmount"]
            .get("datatype")
            .is_none());
    }

    #[test]
    fn insert_property_keeps_keys_unique_and_in_first_position() {
        let mut source = Source::new("s");
        source.insert_property(PropertyMapping::new("ex:a", "A"));
        source.insert_property(PropertyMapping::new("ex:b", "B"));
        source.insert_property(PropertyMapping::new("ex:a2", "A"));

        let keys: Vec<&str> = source.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(source.properties["A"].predicate, "ex:a2");
    }

    #[test]
    fn new_source_defaults_class_to_unknown() {
        let source = Source::new("x");
        assert_eq!(source.entity_class, UNKNOWN);
        assert!(source.iri_template.is_empty());
    }
}
