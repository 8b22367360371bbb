#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unexpected shape in {context}: {message}")]
    Shape { context: String, message: String },
    #[error("failed to load external mapping file {reference}: {message}")]
    Fetch { reference: String, message: String },
}

impl IngestError {
    pub fn shape(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Shape {
            context: context.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
