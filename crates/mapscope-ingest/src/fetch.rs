//! Loading configs that point at an external mapping file.
//!
//! Fetching happens exactly once per load; parsing only starts after the
//! referenced content is in hand.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{IngestError, Result};
use crate::inline::{classify_config, normalize_inline, ConfigKind};
use crate::options::ParseOptions;
use crate::outcome::{parse_mapping_document, ParseOutcome};
use crate::yaml::parse_document;

// ============================================================================
// Fetcher interface
// ============================================================================

/// Source of externally referenced mapping documents.
#[async_trait]
pub trait MappingFetcher: Send + Sync {
    /// Return the full text of `reference`. Single attempt, no retry.
    async fn fetch(&self, reference: &str) -> Result<String>;
}

/// Resolves references by file name inside one base directory, the way
/// uploaded project files are stored side by side.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    base_dir: PathBuf,
}

impl FsFetcher {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve(&self, reference: &str) -> Result<PathBuf> {
        let name = Path::new(reference.trim())
            .file_name()
            .ok_or_else(|| IngestError::Fetch {
                reference: reference.to_string(),
                message: "reference has no file name".to_string(),
            })?;
        Ok(self.base_dir.join(name))
    }
}

#[async_trait]
impl MappingFetcher for FsFetcher {
    async fn fetch(&self, reference: &str) -> Result<String> {
        let path = self.resolve(reference)?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| IngestError::Fetch {
                reference: reference.to_string(),
                message: format!("{}: {err}", path.display()),
            })
    }
}

// ============================================================================
// Config loading
// ============================================================================

/// Load a config document: fetch and parse the external mapping it points
/// at, or normalize it as an inline v2/v1 config.
pub async fn load_mapping_config(
    config_text: &str,
    fetcher: &dyn MappingFetcher,
    options: &ParseOptions,
) -> ParseOutcome {
    let log = options.log("config");
    let doc = match parse_document(config_text) {
        Ok(doc) => doc,
        Err(err) => return ParseOutcome::from_result(None, Err(err)),
    };

    match classify_config(&doc) {
        ConfigKind::External { file } => {
            log.debug(format_args!("fetching external mapping {file}"));
            match fetcher.fetch(&file).await {
                Ok(text) => parse_mapping_document(&text, options),
                Err(err) => {
                    tracing::warn!(reference = %file, error = %err, "external mapping could not be loaded");
                    ParseOutcome::Failed {
                        format: None,
                        message: err.to_string(),
                    }
                }
            }
        }
        kind => {
            let format = match kind {
                ConfigKind::V2 => mapscope_model::MappingFormat::V2Inline,
                _ => mapscope_model::MappingFormat::V1,
            };
            ParseOutcome::from_result(Some(format), normalize_inline(&doc, options))
        }
    }
}
