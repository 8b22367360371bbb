//! Inline mapping configs (v2 `mapping.sources[]`, v1 `sheets[]`).
//!
//! Both variants are field remappings of already-parsed YAML. Property values
//! may be a bare predicate string or an object carrying the predicate under
//! `predicate`, `property` or `as`, plus an optional `datatype`.

use mapscope_model::{
    class_local_name, infer_join_column, MappingFormat, NormalizedMapping,
    ObjectPropertyMapping, PropertyMap, PropertyMapping, Source, UNKNOWN,
};
use serde_yaml::Value;

use crate::error::{IngestError, Result};
use crate::options::ParseOptions;
use crate::yaml::{field, one_or_many, scalar, str_field};

const PREDICATE_KEYS: &[&str] = &["predicate", "property", "as"];

/// What a parsed config document asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigKind {
    /// `mapping.file` points at a mapping document stored elsewhere.
    External { file: String },
    V2,
    V1,
}

pub fn classify_config(doc: &Value) -> ConfigKind {
    match field(doc, &["mapping"]) {
        Some(mapping) => match str_field(mapping, &["file"]) {
            Some(file) if field(mapping, &["sources"]).is_none() => ConfigKind::External { file },
            _ => ConfigKind::V2,
        },
        None => ConfigKind::V1,
    }
}

/// Normalize an inline config. External wrappers must be fetched first.
pub fn normalize_inline(doc: &Value, options: &ParseOptions) -> Result<NormalizedMapping> {
    match classify_config(doc) {
        ConfigKind::V2 => normalize_v2(doc, options),
        ConfigKind::V1 => normalize_v1(doc, options),
        ConfigKind::External { file } => Err(IngestError::shape(
            "inline config",
            format!("mapping is stored in external file {file}"),
        )),
    }
}

pub fn normalize_v2(doc: &Value, options: &ParseOptions) -> Result<NormalizedMapping> {
    let log = options.log("inline-v2");
    let mapping = field(doc, &["mapping"])
        .ok_or_else(|| IngestError::shape("v2 config", "missing `mapping`"))?;
    let entries = sequence(mapping, "sources", "v2 config")?;

    let mut sources = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        let entity = field(entry, &["entity"]);
        let mut source = Source::new(source_name(entry, entity, idx));
        if let Some(class) = entity.and_then(|e| str_field(e, &["class"])) {
            source.entity_class = class;
        }
        source.iri_template = entity
            .and_then(|e| str_field(e, &["iri_template"]))
            .unwrap_or_default();
        source.source_file = str_field(entry, &["file", "source"]);
        source.properties = property_map(field(entry, &["properties"]));
        source.object_properties = field(entry, &["relationships"])
            .map(one_or_many)
            .unwrap_or_default()
            .into_iter()
            .map(relationship)
            .collect();
        sources.push(source);
    }
    log.debug(format_args!("{} sources", sources.len()));

    Ok(NormalizedMapping {
        format: MappingFormat::V2Inline,
        sources,
    })
}

pub fn normalize_v1(doc: &Value, options: &ParseOptions) -> Result<NormalizedMapping> {
    let log = options.log("inline-v1");
    let sheets = sequence(doc, "sheets", "v1 config")?;

    let mut sources = Vec::with_capacity(sheets.len());
    for (idx, sheet) in sheets.into_iter().enumerate() {
        let row = field(sheet, &["row_resource"]);
        let mut source = Source::new(source_name(sheet, row, idx));
        if let Some(class) = row.and_then(|r| str_field(r, &["class"])) {
            source.entity_class = class;
        }
        source.iri_template = row
            .and_then(|r| str_field(r, &["iri_template"]))
            .unwrap_or_default();
        source.source_file = str_field(sheet, &["source", "file"]);
        source.properties = property_map(field(sheet, &["columns"]));
        source.object_properties = match field(sheet, &["objects"]) {
            Some(Value::Mapping(objects)) => objects.values().map(relationship).collect(),
            Some(other) => one_or_many(other).into_iter().map(relationship).collect(),
            None => Vec::new(),
        };
        sources.push(source);
    }
    log.debug(format_args!("{} sheets", sources.len()));

    Ok(NormalizedMapping {
        format: MappingFormat::V1,
        sources,
    })
}

fn sequence<'a>(parent: &'a Value, key: &str, context: &str) -> Result<Vec<&'a Value>> {
    match field(parent, &[key]) {
        None => Ok(Vec::new()),
        Some(Value::Sequence(items)) => Ok(items.iter().collect()),
        Some(_) => Err(IngestError::shape(context, format!("`{key}` must be a list"))),
    }
}

fn source_name(entry: &Value, entity: Option<&Value>, idx: usize) -> String {
    str_field(entry, &["name"])
        .or_else(|| {
            entity
                .and_then(|e| str_field(e, &["class"]))
                .map(|c| class_local_name(&c).to_string())
        })
        .unwrap_or_else(|| format!("source_{}", idx + 1))
}

fn relationship(rel: &Value) -> ObjectPropertyMapping {
    let target_class = str_field(rel, &["class", "target_class"]).unwrap_or_else(|| UNKNOWN.to_string());
    let template = str_field(rel, &["iri_template"]).unwrap_or_default();
    // Without a template, the inferencer falls through to `<ClassLocalName>ID`.
    let join_column = infer_join_column(&template, &target_class);

    ObjectPropertyMapping {
        predicate: str_field(rel, PREDICATE_KEYS).unwrap_or_default(),
        target_class,
        target_iri_template: template,
        join_column,
        properties: property_map(field(rel, &["properties", "columns"])),
    }
}

/// Properties given either as `column → value` or as a list of entries that
/// name their `column`.
fn property_map(value: Option<&Value>) -> PropertyMap {
    let mut properties = PropertyMap::new();
    match value {
        Some(Value::Mapping(entries)) => {
            for (column, spec) in entries {
                if let Some(column) = scalar(column) {
                    insert_property(&mut properties, &column, spec);
                }
            }
        }
        Some(Value::Sequence(entries)) => {
            for spec in entries {
                if let Some(column) = str_field(spec, &["column"]) {
                    insert_property(&mut properties, &column, spec);
                }
            }
        }
        _ => {}
    }
    properties
}

fn insert_property(properties: &mut PropertyMap, column: &str, spec: &Value) {
    if column.is_empty() {
        return;
    }
    let (predicate, datatype) = match scalar(spec) {
        Some(predicate) => (predicate, None),
        None => (
            str_field(spec, PREDICATE_KEYS).unwrap_or_default(),
            str_field(spec, &["datatype"]),
        ),
    };
    properties.insert(
        column.to_string(),
        PropertyMapping::new(predicate, column).with_datatype(datatype),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::parse_document;

    const V2: &str = r#"
mapping:
  sources:
    - name: loans
      file: data/loans.csv
      entity:
        class: ex:Loan
        iri_template: "{base_iri}loan/{LoanID}"
      properties:
        LoanAmount: ex:hasAmount
        Rate: { predicate: ex:rate, datatype: xsd:decimal }
      relationships:
        - class: ex:Borrower
          predicate: ex:hasBorrower
          iri_template: "{base_iri}borrower/{BorrowerID}"
          properties:
            BorrowerName: { as: ex:hasName }
        - class: http://example.com/onto#Property
          predicate: ex:securedBy
          properties:
            - column: Address
              property: ex:address
"#;

    const V1: &str = r#"
sheets:
  - name: loans
    source: loans.csv
    row_resource:
      class: ex:Loan
      iri_template: "{base_iri}loan/{LoanID}"
    columns:
      LoanAmount: { as: ex:hasAmount, datatype: xsd:decimal }
    objects:
      borrower:
        predicate: ex:hasBorrower
        class: ex:Borrower
        iri_template: "$(base_iri)/borrower/$(BorrowerID)"
        properties:
          - column: BorrowerName
            as: ex:hasName
"#;

    fn doc(text: &str) -> Value {
        parse_document(text).expect("yaml")
    }

    #[test]
    fn v2_sources_and_relationships() {
        let mapping = normalize_inline(&doc(V2), &ParseOptions::default()).expect("v2");
        assert_eq!(mapping.format, MappingFormat::V2Inline);

        let loans = &mapping.sources[0];
        assert_eq!(loans.name, "loans");
        assert_eq!(loans.entity_class, "ex:Loan");
        assert_eq!(loans.source_file.as_deref(), Some("data/loans.csv"));
        assert_eq!(loans.properties["LoanAmount"].predicate, "ex:hasAmount");
        assert_eq!(loans.properties["Rate"].datatype.as_deref(), Some("xsd:decimal"));

        let borrower = &loans.object_properties[0];
        assert_eq!(borrower.join_column, "BorrowerID");
        assert_eq!(borrower.properties["BorrowerName"].predicate, "ex:hasName");

        let property = &loans.object_properties[1];
        assert_eq!(property.join_column, "PropertyID");
        assert_eq!(property.properties["Address"].predicate, "ex:address");
    }

    #[test]
    fn v1_sheets_use_the_same_shape() {
        let mapping = normalize_inline(&doc(V1), &ParseOptions::default()).expect("v1");
        assert_eq!(mapping.format, MappingFormat::V1);

        let loans = &mapping.sources[0];
        assert_eq!(loans.source_file.as_deref(), Some("loans.csv"));
        assert_eq!(loans.properties["LoanAmount"].predicate, "ex:hasAmount");

        let borrower = &loans.object_properties[0];
        assert_eq!(borrower.target_class, "ex:Borrower");
        assert_eq!(borrower.join_column, "BorrowerID");
        assert_eq!(borrower.properties["BorrowerName"].predicate, "ex:hasName");
    }

    #[test]
    fn v1_objects_may_be_a_list() {
        let config = r#"
sheets:
  - name: loans
    row_resource:
      class: ex:Loan
    objects:
      - predicate: ex:hasBorrower
        class: ex:Borrower
        iri_template: "{base_iri}borrower/{BorrowerID}"
        properties:
          BorrowerName: ex:hasName
      - as: ex:securedBy
        class: ex:Collateral
"#;
        let mapping = normalize_inline(&doc(config), &ParseOptions::default()).expect("v1");
        let rels = &mapping.sources[0].object_properties;
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].join_column, "BorrowerID");
        assert_eq!(rels[0].properties["BorrowerName"].predicate, "ex:hasName");
        assert_eq!(rels[1].predicate, "ex:securedBy");
        assert_eq!(rels[1].join_column, "CollateralID");
    }

    #[test]
    fn classification() {
        assert_eq!(
            classify_config(&doc("mapping:\n  file: mappings/loans.rml.ttl\n")),
            ConfigKind::External {
                file: "mappings/loans.rml.ttl".to_string()
            }
        );
        assert_eq!(classify_config(&doc(V2)), ConfigKind::V2);
        assert_eq!(classify_config(&doc(V1)), ConfigKind::V1);
        assert!(normalize_inline(&doc("mapping:\n  file: x.ttl\n"), &ParseOptions::default()).is_err());
    }

    #[test]
    fn missing_fields_default() {
        let mapping = normalize_v2(
            &doc("mapping:\n  sources:\n    - {}\n"),
            &ParseOptions::default(),
        )
        .expect("v2");
        let source = &mapping.sources[0];
        assert_eq!(source.name, "source_1");
        assert_eq!(source.entity_class, UNKNOWN);
        assert!(source.properties.is_empty());
    }

    #[test]
    fn wrong_container_types_are_shape_errors() {
        let err = normalize_v1(&doc("sheets: nope\n"), &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::Shape { .. }));
    }
}
