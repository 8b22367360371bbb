//! Triple-map vocabulary IRIs (R2RML + RML extensions).

pub struct R2RML;

impl R2RML {
    pub const NS: &'static str = "http://www.w3.org/ns/r2rml#";

    pub const TRIPLES_MAP: &'static str = "http://www.w3.org/ns/r2rml#TriplesMap";

    pub const LOGICAL_TABLE: &'static str = "http://www.w3.org/ns/r2rml#logicalTable";
    pub const TABLE_NAME: &'static str = "http://www.w3.org/ns/r2rml#tableName";

    pub const SUBJECT_MAP: &'static str = "http://www.w3.org/ns/r2rml#subjectMap";
    pub const CLASS: &'static str = "http://www.w3.org/ns/r2rml#class";
    pub const TEMPLATE: &'static str = "http://www.w3.org/ns/r2rml#template";
    pub const COLUMN: &'static str = "http://www.w3.org/ns/r2rml#column";
    pub const CONSTANT: &'static str = "http://www.w3.org/ns/r2rml#constant";

    pub const PREDICATE_OBJECT_MAP: &'static str =
        "http://www.w3.org/ns/r2rml#predicateObjectMap";
    pub const PREDICATE: &'static str = "http://www.w3.org/ns/r2rml#predicate";
    pub const PREDICATE_MAP: &'static str = "http://www.w3.org/ns/r2rml#predicateMap";
    pub const OBJECT_MAP: &'static str = "http://www.w3.org/ns/r2rml#objectMap";
    pub const DATATYPE: &'static str = "http://www.w3.org/ns/r2rml#datatype";

    pub const PARENT_TRIPLES_MAP: &'static str = "http://www.w3.org/ns/r2rml#parentTriplesMap";
    pub const JOIN_CONDITION: &'static str = "http://www.w3.org/ns/r2rml#joinCondition";
    pub const CHILD: &'static str = "http://www.w3.org/ns/r2rml#child";
    pub const PARENT: &'static str = "http://www.w3.org/ns/r2rml#parent";
}

pub struct RML;

impl RML {
    pub const NS: &'static str = "http://semweb.mmlab.be/ns/rml#";

    pub const LOGICAL_SOURCE: &'static str = "http://semweb.mmlab.be/ns/rml#logicalSource";
    pub const SOURCE: &'static str = "http://semweb.mmlab.be/ns/rml#source";
    pub const REFERENCE: &'static str = "http://semweb.mmlab.be/ns/rml#reference";
}

pub const QL_NS: &str = "http://semweb.mmlab.be/ns/ql#";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Bindings assumed when a document uses a prefix without declaring it.
pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("rr", R2RML::NS),
    ("rml", RML::NS),
    ("ql", QL_NS),
    ("rdf", RDF_NS),
    ("rdfs", RDFS_NS),
    ("xsd", XSD_NS),
];
