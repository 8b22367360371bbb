//! Ontology metadata as delivered by the ontology-analysis service.
//!
//! Field names are accepted in camelCase and in the service's snake_case.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyClass {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, alias = "pref_label", skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl OntologyClass {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyProperty {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, alias = "pref_label", skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// A class IRI or a datatype IRI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Explicit object/data property hint; `None` leaves it to the range.
    #[serde(default, alias = "is_object_property", skip_serializing_if = "Option::is_none")]
    pub is_object_property: Option<bool>,
}

impl OntologyProperty {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    pub fn between(mut self, domain: impl Into<String>, range: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self.range = Some(range.into());
        self
    }
}

/// `{ classes: [...], properties: [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyPayload {
    #[serde(default)]
    pub classes: Vec<OntologyClass>,
    #[serde(default)]
    pub properties: Vec<OntologyProperty>,
}

impl OntologyPayload {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
