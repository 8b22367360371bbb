//! RML / R2RML triple maps (Turtle serialization) → normalized sources.
//!
//! Pipeline: [`lexer`] → [`prefixes`] → [`segment`] → [`tree`] → [`extract`],
//! then identifiers are resolved across blocks here. Parsing never fails; a
//! document without recognizable triple maps yields an empty source list.

pub mod extract;
pub mod lexer;
pub mod prefixes;
pub mod segment;
pub mod token;
pub mod tree;

use std::collections::{HashMap, HashSet};

use mapscope_model::{
    first_brace_placeholder, local_name, MappingFormat, NormalizedMapping,
    ObjectPropertyMapping, PropertyMap, PropertyMapping, Source, UNKNOWN,
};

use crate::options::{DebugLog, ParseOptions};
use crate::vocab::{R2RML, RML};
use extract::{extract_record, TripleMapRecord};
use prefixes::PrefixMap;
use tree::{build_statements, PoList, Statement, Term};

/// Predicates whose object is a map that may be declared as a separate,
/// named or labelled node instead of an inline `[ ... ]`.
const MAP_PREDICATES: &[&str] = &[
    R2RML::SUBJECT_MAP,
    R2RML::PREDICATE_OBJECT_MAP,
    R2RML::PREDICATE_MAP,
    R2RML::OBJECT_MAP,
    R2RML::JOIN_CONDITION,
    R2RML::LOGICAL_TABLE,
    RML::LOGICAL_SOURCE,
];

const MAX_NODE_DEPTH: usize = 8;

pub fn parse_rml(text: &str, options: &ParseOptions) -> NormalizedMapping {
    let log = options.log("rml");
    let tokens = lexer::tokenize(text);
    let prefixes = PrefixMap::from_tokens(&tokens);
    let blocks = segment::segment(&tokens, &prefixes, options.identifier_strategy);

    log.debug(format_args!(
        "{} tokens, {} triple map blocks",
        tokens.len(),
        blocks.len()
    ));
    if blocks.is_empty() {
        return NormalizedMapping::empty(MappingFormat::Rml);
    }

    let named = NamedNodes::collect(&build_statements(&tokens), &prefixes);
    let records: Vec<TripleMapRecord> = blocks
        .iter()
        .map(|block| {
            let body = block_body(&block.id, build_statements(&tokens[block.start..block.end]));
            let body = named.inline(&body, &prefixes, &mut Vec::new());
            extract_record(&block.id, &body, &prefixes)
        })
        .collect();

    let by_id: HashMap<&str, &TripleMapRecord> =
        records.iter().map(|r| (r.id.as_str(), r)).collect();
    let referenced: HashSet<&str> = records
        .iter()
        .flat_map(|r| r.fragments.iter())
        .filter_map(|f| f.parent.as_deref())
        .collect();

    let sources = records
        .iter()
        .filter(|r| !referenced.contains(r.id.as_str()))
        .map(|r| to_source(r, &by_id, log))
        .collect();

    NormalizedMapping {
        format: MappingFormat::Rml,
        sources,
    }
}

/// Merge every statement about the block's own identifier into one body.
fn block_body(id: &str, statements: Vec<Statement>) -> PoList {
    let mut body = PoList::default();
    for stmt in statements {
        if stmt.subject.as_ref().and_then(Term::text) == Some(id) {
            body.entries.extend(stmt.body.entries);
        }
    }
    body
}

/// Statement bodies keyed by subject, so `rr:subjectMap <#LoanSubject>` can
/// be read as if the subject map had been written inline.
struct NamedNodes {
    bodies: HashMap<String, PoList>,
}

impl NamedNodes {
    fn collect(statements: &[Statement], prefixes: &PrefixMap) -> Self {
        let mut bodies: HashMap<String, PoList> = HashMap::new();
        for stmt in statements {
            if let Some(key) = stmt.subject.as_ref().and_then(|s| node_key(s, prefixes)) {
                bodies
                    .entry(key)
                    .or_default()
                    .entries
                    .extend(stmt.body.entries.iter().cloned());
            }
        }
        Self { bodies }
    }

    /// Copy of `list` with named map objects replaced by their bodies.
    /// References to triple maps (`rr:parentTriplesMap`) are left as written,
    /// and a node already being inlined on the current path is not expanded
    /// again.
    fn inline(&self, list: &PoList, prefixes: &PrefixMap, path: &mut Vec<String>) -> PoList {
        let mut out = list.clone();
        for entry in &mut out.entries {
            let is_map = MAP_PREDICATES.iter().any(|p| prefixes.is(&entry.predicate, p));
            for object in &mut entry.objects {
                match object {
                    Term::Node(inner) => {
                        let resolved = self.inline(inner, prefixes, path);
                        *inner = resolved;
                    }
                    _ if is_map => {
                        let Some(key) = node_key(object, prefixes) else {
                            continue;
                        };
                        if path.len() >= MAX_NODE_DEPTH || path.contains(&key) {
                            continue;
                        }
                        let Some(body) = self.bodies.get(&key) else {
                            continue;
                        };
                        path.push(key);
                        let resolved = self.inline(body, prefixes, path);
                        path.pop();
                        *object = Term::Node(resolved);
                    }
                    _ => {}
                }
            }
        }
        out
    }
}

/// Identity of a node: its full IRI where the prefix is known, otherwise the
/// text as written.
fn node_key(term: &Term, prefixes: &PrefixMap) -> Option<String> {
    match term {
        Term::Iri(_) | Term::PrefixedName(_) => prefixes
            .resolve(term)
            .or_else(|| term.text().map(str::to_string)),
        Term::BlankNodeLabel(label) => Some(label.clone()),
        _ => None,
    }
}

fn data_properties(record: &TripleMapRecord) -> PropertyMap {
    let mut properties = PropertyMap::new();
    for fragment in &record.fragments {
        if fragment.parent.is_some() {
            continue;
        }
        if let Some(column) = fragment.column.as_deref().filter(|c| !c.is_empty()) {
            properties.insert(
                column.to_string(),
                PropertyMapping::new(fragment.predicate.clone(), column)
                    .with_datatype(fragment.datatype.clone()),
            );
        }
    }
    properties
}

fn to_source(
    record: &TripleMapRecord,
    by_id: &HashMap<&str, &TripleMapRecord>,
    log: DebugLog,
) -> Source {
    let mut source = Source::new(local_name(&record.id));
    if let Some(class) = &record.class {
        source.entity_class = class.clone();
    } else {
        log.debug(format_args!("triple map {} has no class", record.id));
    }
    source.iri_template = record.template.clone().unwrap_or_default();
    source.source_file = record.source.clone();
    source.properties = data_properties(record);

    for fragment in &record.fragments {
        let Some(parent) = fragment.parent.as_deref() else {
            continue;
        };
        let Some(target) = by_id.get(parent) else {
            log.debug(format_args!(
                "{} -> {}: parent triple map not found, relationship omitted",
                record.id, parent
            ));
            continue;
        };

        let target_template = target.template.clone().unwrap_or_default();
        let join_column = first_brace_placeholder(&target_template)
            .map(str::to_string)
            .or_else(|| fragment.join_child.clone().filter(|c| !c.is_empty()))
            .unwrap_or_else(|| UNKNOWN.to_string());

        source.object_properties.push(ObjectPropertyMapping {
            predicate: fragment.predicate.clone(),
            target_class: target.class.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            target_iri_template: target_template,
            join_column,
            properties: data_properties(target),
        });
    }
    source
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::IdentifierStrategy;

    const LOANS: &str = r#"
@prefix rr: <http://www.w3.org/ns/r2rml#> .
@prefix rml: <http://semweb.mmlab.be/ns/rml#> .
@prefix ex: <http://example.com/> .

<LoanMap> a rr:TriplesMap ;
    rml:logicalSource [ rml:source "loans.csv" ] ;
    rr:subjectMap [ rr:template "ex:loan/{LoanID}" ; rr:class ex:Loan ] ;
    rr:predicateObjectMap [
        rr:predicate ex:hasAmount ;
        rr:objectMap [ rml:reference "LoanAmount" ; rr:datatype xsd:decimal ]
    ] ;
    rr:predicateObjectMap [
        rr:predicate ex:hasBorrower ;
        rr:objectMap [ rr:parentTriplesMap <BorrowerMap> ]
    ] .

<BorrowerMap> a rr:TriplesMap ;
    rr:subjectMap [ rr:template "ex:borrower/{BorrowerID}" ; rr:class ex:Borrower ] ;
    rr:predicateObjectMap [
        rr:predicate ex:hasName ;
        rr:objectMap [ rml:reference "BorrowerName" ]
    ] .
"#;

    #[test]
    fn nested_targets_are_filtered_from_the_top_level() {
        let mapping = parse_rml(LOANS, &ParseOptions::default());
        assert_eq!(mapping.format, MappingFormat::Rml);
        assert_eq!(mapping.sources.len(), 1);

        let loan = &mapping.sources[0];
        assert_eq!(loan.name, "LoanMap");
        assert_eq!(loan.entity_class, "ex:Loan");
        assert_eq!(loan.iri_template, "ex:loan/{LoanID}");
        assert_eq!(loan.source_file.as_deref(), Some("loans.csv"));
        assert_eq!(loan.properties["LoanAmount"].predicate, "ex:hasAmount");
        assert_eq!(
            loan.properties["LoanAmount"].datatype.as_deref(),
            Some("xsd:decimal")
        );

        let rel = &loan.object_properties[0];
        assert_eq!(rel.predicate, "ex:hasBorrower");
        assert_eq!(rel.target_class, "ex:Borrower");
        assert_eq!(rel.join_column, "BorrowerID");
        assert!(rel.properties.contains_key("BorrowerName"));
    }

    #[test]
    fn no_triple_maps_means_no_sources() {
        let mapping = parse_rml("@prefix ex: <http://ex.org/> .\nex:a ex:b ex:c .", &ParseOptions::default());
        assert!(mapping.is_empty());
        assert!(parse_rml("", &ParseOptions::default()).is_empty());
    }

    #[test]
    fn incomplete_blocks_are_emitted_with_defaults() {
        let mapping = parse_rml("<Bare> a rr:TriplesMap .", &ParseOptions::default());
        assert_eq!(mapping.sources.len(), 1);
        assert_eq!(mapping.sources[0].entity_class, UNKNOWN);
        assert_eq!(mapping.sources[0].iri_template, "");
    }

    #[test]
    fn dangling_parent_is_omitted_without_error() {
        let text = r#"<A> a rr:TriplesMap ;
            rr:predicateObjectMap [ rr:predicate ex:p ; rr:objectMap [ rr:parentTriplesMap <Missing> ] ] ."#;
        let mapping = parse_rml(text, &ParseOptions::default().with_debug(true));
        assert_eq!(mapping.sources.len(), 1);
        assert!(mapping.sources[0].object_properties.is_empty());
    }

    #[test]
    fn join_child_is_used_when_target_template_has_no_placeholder() {
        let text = r#"<A> a rr:TriplesMap ;
            rr:predicateObjectMap [ rr:predicate ex:p ;
                rr:objectMap [ rr:parentTriplesMap <B> ;
                    rr:joinCondition [ rr:child "B_FK" ; rr:parent "ID" ] ] ] .
            <B> a rr:TriplesMap ; rr:subjectMap [ rr:constant ex:only ] ."#;
        let mapping = parse_rml(text, &ParseOptions::default());
        assert_eq!(mapping.sources[0].object_properties[0].join_column, "B_FK");
    }

    #[test]
    fn join_column_defaults_to_unknown() {
        let text = r#"<A> a rr:TriplesMap ;
            rr:predicateObjectMap [ rr:predicate ex:p ; rr:objectMap [ rr:parentTriplesMap <B> ] ] .
            <B> a rr:TriplesMap ."#;
        let mapping = parse_rml(text, &ParseOptions::default());
        assert_eq!(mapping.sources[0].object_properties[0].join_column, UNKNOWN);
    }

    #[test]
    fn repeated_subject_statements_merge_into_the_block() {
        let text = r#"<A> a rr:TriplesMap .
            <A> rr:subjectMap [ rr:class ex:A ] ."#;
        let mapping = parse_rml(text, &ParseOptions::default());
        assert_eq!(mapping.sources[0].entity_class, "ex:A");
    }

    #[test]
    fn rebound_namespaces_and_full_iris_are_recognized() {
        let text = r#"@prefix r: <http://www.w3.org/ns/r2rml#> .
            <A> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> r:TriplesMap ;
                r:subjectMap [ <http://www.w3.org/ns/r2rml#class> <http://ex.org/A> ] ;
                r:predicateObjectMap [ r:predicate <http://ex.org/p> ; r:objectMap [ r:column "COL" ] ] ."#;
        let mapping = parse_rml(text, &ParseOptions::default());
        let source = &mapping.sources[0];
        assert_eq!(source.entity_class, "http://ex.org/A");
        assert_eq!(source.properties["COL"].predicate, "http://ex.org/p");
    }

    #[test]
    fn merged_strategy_keeps_mixed_identifier_forms() {
        let text = "<A> a rr:TriplesMap ; rr:subjectMap [ rr:class ex:A ] .\n\
                    ex:B a rr:TriplesMap ; rr:subjectMap [ rr:class ex:B ] .";
        let first = parse_rml(text, &ParseOptions::default());
        assert_eq!(first.sources.len(), 1);

        let merged = parse_rml(
            text,
            &ParseOptions::default().with_identifier_strategy(IdentifierStrategy::Merged),
        );
        let names: Vec<_> = merged.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "ex:B"]);
    }

    #[test]
    fn named_maps_are_read_from_their_own_statements() {
        let text = r#"@prefix ex: <http://example.com/> .
<LoanMap> a rr:TriplesMap ;
    rml:logicalSource _:src ;
    rr:subjectMap <#LoanSubject> ;
    rr:predicateObjectMap <#LoanAmountPom>, ex:LoanBorrowerPom .
<#LoanSubject> rr:template "ex:loan/{LoanID}" ; rr:class ex:Loan .
_:src rml:source "loans.csv" .
<#LoanAmountPom> rr:predicate ex:hasAmount ; rr:objectMap [ rml:reference "LoanAmount" ] .
<http://example.com/LoanBorrowerPom> rr:predicate ex:hasBorrower ; rr:objectMap ex:BorrowerRef .
ex:BorrowerRef rr:parentTriplesMap <BorrowerMap> .
<BorrowerMap> a rr:TriplesMap ;
    rr:subjectMap [ rr:template "ex:borrower/{BorrowerID}" ; rr:class ex:Borrower ] .
"#;
        let mapping = parse_rml(text, &ParseOptions::default());
        assert_eq!(mapping.sources.len(), 1);

        let loan = &mapping.sources[0];
        assert_eq!(loan.entity_class, "ex:Loan");
        assert_eq!(loan.iri_template, "ex:loan/{LoanID}");
        assert_eq!(loan.source_file.as_deref(), Some("loans.csv"));
        assert_eq!(loan.properties["LoanAmount"].predicate, "ex:hasAmount");
        assert_eq!(loan.object_properties[0].target_class, "ex:Borrower");
        assert_eq!(loan.object_properties[0].join_column, "BorrowerID");
    }

    #[test]
    fn self_referencing_named_maps_terminate() {
        let text = "<A> a rr:TriplesMap ; rr:subjectMap <#S> .\n<#S> rr:class ex:A ; rr:subjectMap <#S> .";
        let mapping = parse_rml(text, &ParseOptions::default());
        assert_eq!(mapping.sources[0].entity_class, "ex:A");
    }

    #[test]
    fn prefixed_parent_references_resolve_exactly() {
        let text = r#"ex:A a rr:TriplesMap ;
                rr:predicateObjectMap [ rr:predicate ex:p ; rr:objectMap [ rr:parentTriplesMap ex:B ] ] .
            ex:B a rr:TriplesMap ; rr:subjectMap [ rr:template "b/{BID}" ; rr:class ex:B ] .
            ex:BB a rr:TriplesMap ."#;
        let mapping = parse_rml(text, &ParseOptions::default());
        let names: Vec<_> = mapping.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ex:A", "ex:BB"]);
        assert_eq!(mapping.sources[0].object_properties[0].join_column, "BID");
    }
}
