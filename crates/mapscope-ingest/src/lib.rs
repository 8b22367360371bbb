//! mapscope mapping ingestion
//!
//! Turns mapping documents in any supported format into a
//! [`mapscope_model::NormalizedMapping`]:
//!
//! - RML / R2RML triple maps in Turtle ([`rml`])
//! - YARRRML rules ([`yarrrml`])
//! - inline v2 (`mapping.sources`) and v1 (`sheets`) configs ([`inline`])
//!
//! [`parse_mapping_document`] detects the format and never panics or returns
//! an error: unrecognized input becomes [`ParseOutcome::Unrecognized`] and
//! unreadable input [`ParseOutcome::Failed`]. [`load_mapping_config`] does the
//! same for config documents that may point at an external mapping file.

pub mod detect;
pub mod error;
pub mod fetch;
pub mod inline;
pub mod options;
pub mod outcome;
pub mod rml;
pub mod session;
pub mod vocab;
pub mod yaml;
pub mod yarrrml;

pub use detect::{detect_format, DetectedFormat};
pub use error::{IngestError, Result};
pub use fetch::{load_mapping_config, FsFetcher, MappingFetcher};
pub use inline::{classify_config, normalize_inline, normalize_v1, normalize_v2, ConfigKind};
pub use options::{DebugLog, IdentifierStrategy, ParseOptions};
pub use outcome::{parse_mapping_document, ParseOutcome};
pub use rml::parse_rml;
pub use session::{LatestSlot, Ticket};
pub use yarrrml::{normalize_yarrrml, parse_yarrrml};
