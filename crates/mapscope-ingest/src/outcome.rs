use mapscope_model::{MappingFormat, NormalizedMapping};

use crate::detect::{detect_format, DetectedFormat};
use crate::error::Result;
use crate::inline::normalize_inline;
use crate::options::ParseOptions;
use crate::rml::parse_rml;
use crate::yaml::parse_document;
use crate::yarrrml::parse_yarrrml;

/// Result of ingesting a mapping document at the outermost boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(NormalizedMapping),
    /// No detection rule matched.
    Unrecognized,
    /// The format was identified but the document could not be read.
    Failed {
        format: Option<MappingFormat>,
        message: String,
    },
}

impl ParseOutcome {
    pub fn mapping(&self) -> Option<&NormalizedMapping> {
        match self {
            ParseOutcome::Parsed(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Sources of a parsed mapping; empty for every other outcome.
    pub fn sources(&self) -> &[mapscope_model::Source] {
        self.mapping().map(|m| m.sources.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn from_result(format: Option<MappingFormat>, result: Result<NormalizedMapping>) -> Self {
        match result {
            Ok(mapping) => ParseOutcome::Parsed(mapping),
            Err(err) => {
                tracing::warn!(format = ?format, error = %err, "mapping document could not be parsed");
                ParseOutcome::Failed {
                    format,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Detect the format of `text` and run the matching parser.
pub fn parse_mapping_document(text: &str, options: &ParseOptions) -> ParseOutcome {
    let detected = detect_format(text);
    options
        .log("detect")
        .debug(format_args!("detected format: {detected}"));

    match detected {
        DetectedFormat::Rml => ParseOutcome::Parsed(parse_rml(text, options)),
        DetectedFormat::Yarrrml | DetectedFormat::YarrrmlHeaderless => {
            ParseOutcome::from_result(Some(MappingFormat::Yarrrml), parse_yarrrml(text, options))
        }
        DetectedFormat::V2Inline => {
            ParseOutcome::from_result(Some(MappingFormat::V2Inline), parse_inline(text, options))
        }
        DetectedFormat::V1Inline => {
            ParseOutcome::from_result(Some(MappingFormat::V1), parse_inline(text, options))
        }
        DetectedFormat::Unrecognized => ParseOutcome::Unrecognized,
    }
}

fn parse_inline(text: &str, options: &ParseOptions) -> Result<NormalizedMapping> {
    normalize_inline(&parse_document(text)?, options)
}
