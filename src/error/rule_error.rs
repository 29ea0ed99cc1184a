//! Configuration errors raised while building rules.

/// Errors raised when a rule definition is malformed.
///
/// These indicate a programming mistake rather than bad runtime data, so they
/// are returned while a chain is being built and never during evaluation.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The regular expression given for a pattern or replacement rule does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A bound assertion was declared without any parameters to bind.
    #[error("bound assertion requires at least one parameter")]
    MissingParameters,
}

impl RuleError {
    pub(crate) fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    }
}
