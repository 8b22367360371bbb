//! Format detection: an ordered rule list, first match wins.

use std::fmt;

use serde::Serialize;
use serde_yaml::Value;

use crate::vocab::R2RML;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectedFormat {
    /// YARRRML with a `prefixes:` / `mappings:` header line.
    Yarrrml,
    Rml,
    /// YAML whose top level has a `mappings` key further down.
    YarrrmlHeaderless,
    V2Inline,
    V1Inline,
    Unrecognized,
}

impl DetectedFormat {
    pub fn is_recognized(self) -> bool {
        self != DetectedFormat::Unrecognized
    }
}

impl fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DetectedFormat::Yarrrml => "yarrrml",
            DetectedFormat::Rml => "rml",
            DetectedFormat::YarrrmlHeaderless => "yarrrml (headerless)",
            DetectedFormat::V2Inline => "v2-inline",
            DetectedFormat::V1Inline => "v1",
            DetectedFormat::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

struct Rule {
    format: DetectedFormat,
    matches: fn(&str, &Candidate) -> bool,
}

/// Parsed-once YAML view shared by the YAML-based rules.
struct Candidate<'a> {
    text: &'a str,
    yaml: std::cell::OnceCell<Option<Value>>,
}

impl<'a> Candidate<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            yaml: std::cell::OnceCell::new(),
        }
    }

    fn yaml_has(&self, key: &str) -> bool {
        self.yaml
            .get_or_init(|| serde_yaml::from_str::<Value>(self.text).ok())
            .as_ref()
            .is_some_and(|doc| doc.get(key).is_some())
    }
}

const RULES: &[Rule] = &[
    Rule {
        format: DetectedFormat::Yarrrml,
        matches: |text, _| {
            let trimmed = text.trim_start();
            trimmed.starts_with("prefixes:") || trimmed.starts_with("mappings:")
        },
    },
    Rule {
        format: DetectedFormat::Rml,
        matches: |text, _| {
            text.contains("rr:TriplesMap")
                || text.contains("@prefix rr:")
                || text.contains(R2RML::TRIPLES_MAP)
        },
    },
    Rule {
        format: DetectedFormat::YarrrmlHeaderless,
        matches: |_, doc| doc.yaml_has("mappings"),
    },
    Rule {
        format: DetectedFormat::V2Inline,
        matches: |_, doc| doc.yaml_has("mapping"),
    },
    Rule {
        format: DetectedFormat::V1Inline,
        matches: |_, doc| doc.yaml_has("sheets"),
    },
];

pub fn detect_format(text: &str) -> DetectedFormat {
    let doc = Candidate::new(text);
    RULES
        .iter()
        .find(|rule| (rule.matches)(text, &doc))
        .map(|rule| rule.format)
        .unwrap_or(DetectedFormat::Unrecognized)
}
