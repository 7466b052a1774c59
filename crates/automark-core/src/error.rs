//! Errors raised while loading a rubric. Scoring itself never fails.

#[derive(Debug, thiserror::Error)]
pub enum RubricError {
    /// Rubric file could not be read.
    #[error("failed to read rubric {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Rubric YAML did not match the expected shape.
    #[error("failed to parse rubric: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A guide pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Rubric parsed but is unusable.
    #[error("invalid rubric: {message}")]
    Invalid { message: String },
}

impl RubricError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}
