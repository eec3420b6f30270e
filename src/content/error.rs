//! Errors raised while discovering, parsing and loading posts

use thiserror::Error;

/// Failure modes of the post collector and loader
#[derive(Debug, Error)]
pub enum ContentError {
    /// The requested slug has no loadable source file
    #[error("Could not find {0}")]
    NotFound(String),

    /// A discovered post is missing a required field or carries an invalid value
    #[error("Post {slug:?} has malformed `{field}`: {reason}")]
    MalformedMetadata {
        slug: String,
        field: &'static str,
        reason: String,
    },

    #[error("Invalid posts pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContentError {
    pub(crate) fn malformed(slug: &str, field: &'static str, reason: impl Into<String>) -> Self {
        ContentError::MalformedMetadata {
            slug: slug.to_string(),
            field,
            reason: reason.into(),
        }
    }

    /// Whether this error means "no such post" rather than a broken one
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound(_))
    }
}
