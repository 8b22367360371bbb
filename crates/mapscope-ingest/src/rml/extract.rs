//! Pulling triple-map facts out of a block's predicate/object tree.

use super::prefixes::PrefixMap;
use super::tree::{PoList, Term};
use crate::vocab::{R2RML, RML};

/// What one triple-map block says, before cross-block resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleMapRecord {
    pub id: String,
    pub class: Option<String>,
    pub template: Option<String>,
    pub source: Option<String>,
    pub fragments: Vec<PoFragment>,
}

/// One predicate/object-map pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoFragment {
    pub predicate: String,
    pub column: Option<String>,
    pub datatype: Option<String>,
    /// Referenced triple-map identifier, as written.
    pub parent: Option<String>,
    /// `rr:child` of the first join condition.
    pub join_child: Option<String>,
}

pub fn extract_record(id: &str, body: &PoList, prefixes: &PrefixMap) -> TripleMapRecord {
    // Fallback lookups must not wander into object maps.
    let outer = body.without(prefixes, R2RML::PREDICATE_OBJECT_MAP);
    let subject_map = body.nodes(prefixes, R2RML::SUBJECT_MAP).next();

    let class = subject_map
        .and_then(|sm| sm.first(prefixes, R2RML::CLASS))
        .or_else(|| outer.find_nested(prefixes, R2RML::CLASS))
        .and_then(term_text);

    let template = subject_map
        .and_then(|sm| sm.first(prefixes, R2RML::TEMPLATE))
        .or_else(|| outer.find_nested(prefixes, R2RML::TEMPLATE))
        .and_then(term_text);

    let source = logical_source(&outer, prefixes);

    let fragments = body
        .nodes(prefixes, R2RML::PREDICATE_OBJECT_MAP)
        .flat_map(|pom| fragments_of(pom, prefixes))
        .collect();

    TripleMapRecord {
        id: id.to_string(),
        class,
        template,
        source,
        fragments,
    }
}

fn logical_source(outer: &PoList, prefixes: &PrefixMap) -> Option<String> {
    let declared = outer
        .nodes(prefixes, RML::LOGICAL_SOURCE)
        .chain(outer.nodes(prefixes, R2RML::LOGICAL_TABLE))
        .find_map(|node| {
            node.first(prefixes, RML::SOURCE)
                .or_else(|| node.first(prefixes, R2RML::TABLE_NAME))
        });

    declared
        .or_else(|| outer.find_nested(prefixes, RML::SOURCE))
        .or_else(|| outer.find_nested(prefixes, R2RML::TABLE_NAME))
        .and_then(term_text)
}

/// One fragment per (predicate, object map) pair. A map without a predicate
/// contributes nothing.
fn fragments_of(pom: &PoList, prefixes: &PrefixMap) -> Vec<PoFragment> {
    let mut predicates: Vec<String> = pom
        .objects(prefixes, R2RML::PREDICATE)
        .filter_map(term_text)
        .collect();
    if predicates.is_empty() {
        predicates = pom
            .nodes(prefixes, R2RML::PREDICATE_MAP)
            .filter_map(|pm| pm.first(prefixes, R2RML::CONSTANT))
            .filter_map(term_text)
            .collect();
    }
    if predicates.is_empty() {
        return Vec::new();
    }

    let mut object_maps: Vec<&PoList> = pom.nodes(prefixes, R2RML::OBJECT_MAP).collect();
    if object_maps.is_empty() {
        object_maps.push(pom);
    }

    let mut fragments = Vec::with_capacity(predicates.len() * object_maps.len());
    for predicate in &predicates {
        for om in &object_maps {
            let lookup = |p: &str| om.find_nested(prefixes, p).and_then(term_text);
            fragments.push(PoFragment {
                predicate: predicate.clone(),
                column: lookup(RML::REFERENCE).or_else(|| lookup(R2RML::COLUMN)),
                datatype: lookup(R2RML::DATATYPE),
                parent: lookup(R2RML::PARENT_TRIPLES_MAP),
                join_child: lookup(R2RML::CHILD),
            });
        }
    }
    fragments
}

fn term_text(term: &Term) -> Option<String> {
    term.text().map(str::to_string)
}
