use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Graph builder settings. Every field has a default, so partial settings
/// files are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphConfig {
    pub max_classes: usize,
    pub max_properties: usize,
    pub include_stubs: bool,
    /// Keep properties whose range is a datatype.
    pub allow_data_properties: bool,
    /// Log skipped properties at DEBUG level.
    pub debug: bool,
    pub mapped_class_uris: BTreeSet<String>,
    pub mapped_property_uris: BTreeSet<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_classes: 200,
            max_properties: 400,
            include_stubs: true,
            allow_data_properties: false,
            debug: false,
            mapped_class_uris: BTreeSet::new(),
            mapped_property_uris: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_keep_defaults() {
        let config: GraphConfig =
            serde_json::from_str(r#"{"maxClasses": 10, "includeStubs": false}"#).expect("config");
        assert_eq!(config.max_classes, 10);
        assert!(!config.include_stubs);
        assert_eq!(config.max_properties, 400);
        assert!(!config.allow_data_properties);
        assert!(config.mapped_class_uris.is_empty());
    }
}
