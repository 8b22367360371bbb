//! YARRRML rules → normalized sources.
//!
//! Every declared mapping stays a top-level source, including mappings that
//! are also referenced as relationship targets.

use std::collections::HashMap;

use mapscope_model::{
    first_paren_placeholder, MappingFormat, NormalizedMapping, ObjectPropertyMapping,
    PropertyMap, PropertyMapping, Source, UNKNOWN,
};
use serde_yaml::Value;

use crate::error::{IngestError, Result};
use crate::options::{DebugLog, ParseOptions};
use crate::vocab::RDF_TYPE;
use crate::yaml::{field, one_or_many, parse_document, scalar, str_field};

pub fn parse_yarrrml(text: &str, options: &ParseOptions) -> Result<NormalizedMapping> {
    normalize_yarrrml(&parse_document(text)?, options)
}

pub fn normalize_yarrrml(doc: &Value, options: &ParseOptions) -> Result<NormalizedMapping> {
    let log = options.log("yarrrml");
    let mappings = match doc.get("mappings") {
        None | Some(Value::Null) => return Ok(NormalizedMapping::empty(MappingFormat::Yarrrml)),
        Some(Value::Mapping(m)) => m,
        Some(_) => return Err(IngestError::shape("yarrrml", "`mappings` must be a mapping")),
    };

    let rules: Vec<MappingRules> = mappings
        .iter()
        .filter_map(|(name, body)| {
            let name = scalar(name)?;
            Some(MappingRules::read(name, body, log))
        })
        .collect();
    log.debug(format_args!("{} mappings", rules.len()));

    let by_name: HashMap<&str, &MappingRules> =
        rules.iter().map(|r| (r.name.as_str(), r)).collect();

    let sources = rules.iter().map(|r| r.to_source(&by_name, log)).collect();
    Ok(NormalizedMapping {
        format: MappingFormat::Yarrrml,
        sources,
    })
}

/// A reference from one mapping to another.
#[derive(Debug, Clone)]
struct Link {
    predicate: String,
    target: String,
    join_column: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct MappingRules {
    name: String,
    class: Option<String>,
    template: String,
    source_file: Option<String>,
    data: PropertyMap,
    links: Vec<Link>,
}

impl MappingRules {
    fn read(name: String, body: &Value, log: DebugLog) -> Self {
        let mut rules = MappingRules {
            name,
            ..Default::default()
        };

        if let Some(subject) = field(body, &["subject", "subjects", "s"]) {
            rules.read_subject(subject);
        }
        rules.source_file = field(body, &["sources", "source"]).and_then(first_source);

        if let Some(po) = field(body, &["predicateobjects", "po"]) {
            for rule in one_or_many(po) {
                rules.read_rule(rule, log);
            }
        }
        rules
    }

    fn read_subject(&mut self, subject: &Value) {
        let Some(first) = one_or_many(subject).into_iter().next() else {
            return;
        };
        if let Some(text) = scalar(first) {
            if text.contains("$(") {
                self.template = text;
            } else {
                self.class = Some(text);
            }
            return;
        }
        self.class = str_field(first, &["class", "a"]);
        self.template = str_field(first, &["value", "template"]).unwrap_or_default();
    }

    fn read_rule(&mut self, rule: &Value, log: DebugLog) {
        let (predicates, objects, rule_datatype) = match rule {
            Value::Sequence(items) => (
                items.first(),
                items.get(1),
                items.get(2).and_then(scalar),
            ),
            Value::Mapping(_) => (
                field(rule, &["predicates", "predicate", "p"]),
                field(rule, &["objects", "object", "o"]),
                None,
            ),
            _ => {
                log.debug(format_args!("{}: unreadable predicate-object rule", self.name));
                return;
            }
        };
        let predicates: Vec<String> = predicates
            .map(one_or_many)
            .unwrap_or_default()
            .into_iter()
            .filter_map(scalar)
            .collect();
        let objects: Vec<&Value> = objects.map(one_or_many).unwrap_or_default();

        for predicate in &predicates {
            for object in &objects {
                self.read_object(predicate, object, rule_datatype.as_deref());
            }
        }
    }

    fn read_object(&mut self, predicate: &str, object: &Value, rule_datatype: Option<&str>) {
        if is_type_predicate(predicate) {
            if self.class.is_none() {
                self.class = scalar(object).or_else(|| str_field(object, &["value"]));
            }
            return;
        }

        if let Some(text) = scalar(object) {
            self.insert_data(predicate, &text, rule_datatype.map(str::to_string));
            return;
        }

        if let Some(target) = str_field(object, &["mapping"]) {
            self.links.push(Link {
                predicate: predicate.to_string(),
                target,
                join_column: field(object, &["condition", "conditions"]).and_then(condition_column),
            });
            return;
        }

        if let Some(value) = str_field(object, &["reference", "value"]) {
            let datatype = str_field(object, &["datatype"]).or(rule_datatype.map(str::to_string));
            self.insert_data(predicate, &value, datatype);
        }
    }

    fn insert_data(&mut self, predicate: &str, raw: &str, datatype: Option<String>) {
        let column = unwrap_reference(raw);
        if column.is_empty() {
            return;
        }
        self.data.insert(
            column.to_string(),
            PropertyMapping::new(predicate, column).with_datatype(datatype),
        );
    }

    fn to_source(&self, by_name: &HashMap<&str, &MappingRules>, log: DebugLog) -> Source {
        let mut source = Source::new(self.name.clone());
        if let Some(class) = &self.class {
            source.entity_class = class.clone();
        }
        source.iri_template = self.template.clone();
        source.source_file = self.source_file.clone();
        source.properties = self.data.clone();

        for link in &self.links {
            let Some(target) = by_name.get(link.target.as_str()) else {
                log.debug(format_args!(
                    "{} -> {}: target mapping not found, relationship omitted",
                    self.name, link.target
                ));
                continue;
            };
            source.object_properties.push(ObjectPropertyMapping {
                predicate: link.predicate.clone(),
                target_class: target.class.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                target_iri_template: target.template.clone(),
                join_column: link
                    .join_column
                    .clone()
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                properties: target.data.clone(),
            });
        }
        source
    }
}

fn is_type_predicate(predicate: &str) -> bool {
    matches!(predicate, "a" | "rdf:type") || predicate == RDF_TYPE
}

/// `$(Column)` → `Column`; anything else is taken as the column name itself.
fn unwrap_reference(raw: &str) -> &str {
    raw.strip_prefix("$(")
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(raw)
        .trim()
}

/// First declared source, minus any `~format` suffix.
fn first_source(sources: &Value) -> Option<String> {
    let first = one_or_many(sources).into_iter().next()?;
    let raw = match first {
        Value::Sequence(items) => items.first().and_then(scalar),
        Value::Mapping(_) => str_field(first, &["access", "file", "path"]),
        other => scalar(other),
    }?;
    let file = raw.split('~').next().unwrap_or(&raw).trim();
    (!file.is_empty()).then(|| file.to_string())
}

/// Join column of a relationship condition: an explicit `column`, else the
/// first `$(...)` in the first function parameter.
fn condition_column(condition: &Value) -> Option<String> {
    let first = one_or_many(condition).into_iter().next()?;
    if let Some(column) = str_field(first, &["column"]).filter(|c| !c.is_empty()) {
        return Some(column);
    }

    let params = field(first, &["parameters", "pms"])?;
    let first_param = one_or_many(params).into_iter().next()?;
    let values: Vec<String> = match first_param {
        Value::Mapping(_) => str_field(first_param, &["value", "v"]).into_iter().collect(),
        other => one_or_many(other).into_iter().filter_map(scalar).collect(),
    };
    values
        .iter()
        .find_map(|v| first_paren_placeholder(v))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> NormalizedMapping {
        parse_yarrrml(text, &ParseOptions::default()).expect("valid yarrrml")
    }

    const LOANS: &str = r#"
prefixes:
  ex: http://example.com/
mappings:
  loan:
    sources:
      - [loans.csv~csv]
    s: ex:loan/$(LoanID)
    po:
      - [a, ex:Loan]
      - [ex:hasAmount, $(LoanAmount), xsd:decimal]
      - p: ex:hasBorrower
        o:
          mapping: borrower
          condition:
            column: BorrowerID
  borrower:
    subject:
      class: ex:Borrower
      value: ex:borrower/$(BorrowerID)
    predicateobjects:
      - predicates: ex:hasName
        objects: BorrowerName
"#;

    #[test]
    fn relationships_carry_target_properties_and_join_column() {
        let mapping = parse(LOANS);
        assert_eq!(mapping.format, MappingFormat::Yarrrml);
        assert_eq!(mapping.sources.len(), 2);

        let loan = &mapping.sources[0];
        assert_eq!(loan.name, "loan");
        assert_eq!(loan.entity_class, "ex:Loan");
        assert_eq!(loan.iri_template, "ex:loan/$(LoanID)");
        assert_eq!(loan.source_file.as_deref(), Some("loans.csv"));
        assert_eq!(
            loan.properties["LoanAmount"].datatype.as_deref(),
            Some("xsd:decimal")
        );

        let rel = &loan.object_properties[0];
        assert_eq!(rel.predicate, "ex:hasBorrower");
        assert_eq!(rel.join_column, "BorrowerID");
        assert_eq!(rel.target_class, "ex:Borrower");
        assert_eq!(rel.properties["BorrowerName"].predicate, "ex:hasName");
    }

    #[test]
    fn referenced_mappings_stay_top_level() {
        let mapping = parse(LOANS);
        assert!(mapping.source("borrower").is_some());
    }

    #[test]
    fn bare_string_subject_is_a_class() {
        let mapping = parse("mappings:\n  m:\n    subject: ex:Thing\n");
        assert_eq!(mapping.sources[0].entity_class, "ex:Thing");
        assert_eq!(mapping.sources[0].iri_template, "");
    }

    #[test]
    fn predicates_and_objects_expand_as_a_cross_product() {
        let mapping = parse(
            "mappings:\n  m:\n    po:\n      - p: [ex:a, ex:b]\n        o: [X, $(Y)]\n",
        );
        let source = &mapping.sources[0];
        // Keyed by column, so the later predicate wins per column.
        assert_eq!(source.properties.len(), 2);
        assert_eq!(source.properties["X"].predicate, "ex:b");
        assert_eq!(source.properties["Y"].predicate, "ex:b");
    }

    #[test]
    fn reference_objects_with_datatype() {
        let mapping = parse(
            "mappings:\n  m:\n    po:\n      - p: ex:age\n        o: { reference: Age, datatype: xsd:int }\n",
        );
        assert_eq!(
            mapping.sources[0].properties["Age"].datatype.as_deref(),
            Some("xsd:int")
        );
    }

    #[test]
    fn function_condition_yields_join_column() {
        let mapping = parse(
            r#"
mappings:
  a:
    po:
      - p: ex:rel
        o:
          - mapping: b
            condition:
              function: equal
              parameters:
                - [str1, $(B_FK)]
                - [str2, $(ID)]
  b:
    s: ex:b/$(ID)
"#,
        );
        assert_eq!(mapping.sources[0].object_properties[0].join_column, "B_FK");
    }

    #[test]
    fn subjects_alias_and_condition_sequences() {
        let mapping = parse(
            r#"
mappings:
  a:
    subjects: ex:a/$(AID)
    po:
      - p: ex:rel
        o:
          mapping: b
          condition:
            - column: FIRST_FK
            - column: SECOND_FK
  b:
    subjects:
      - ex:b/$(BID)
"#,
        );
        let a = mapping.source("a").expect("a");
        assert_eq!(a.iri_template, "ex:a/$(AID)");
        assert_eq!(a.object_properties[0].join_column, "FIRST_FK");
        assert_eq!(a.object_properties[0].target_iri_template, "ex:b/$(BID)");
    }

    #[test]
    fn missing_condition_and_dangling_targets() {
        let mapping = parse(
            "mappings:\n  a:\n    po:\n      - p: ex:r\n        o: { mapping: b }\n      - p: ex:x\n        o: { mapping: nowhere }\n  b: {}\n",
        );
        let rels = &mapping.sources[0].object_properties;
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].join_column, UNKNOWN);
        assert_eq!(mapping.sources[1].entity_class, UNKNOWN);
    }

    #[test]
    fn empty_and_invalid_documents() {
        assert!(parse("prefixes:\n  ex: http://ex.org/\n").is_empty());
        assert!(parse_yarrrml("mappings: [1, 2]", &ParseOptions::default()).is_err());
        assert!(parse_yarrrml("mappings: {a: [", &ParseOptions::default()).is_err());
    }
}
