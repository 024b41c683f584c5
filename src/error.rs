use thiserror::Error;

/// A syntax error in a template, anchored at a byte offset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("template syntax error at offset {offset}: {message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A template inside a transformation failed to parse; names the
    /// offending template.
    #[error("parsing '{template}': {source}")]
    ParseTemplate {
        template: String,
        #[source]
        source: ParseError,
    },

    /// The pattern is well-formed but does not match the needle.
    #[error("string does not match pattern")]
    NoMatch,

    /// A pattern word has no matching expression bound to it.
    #[error("no binding for '{0}'")]
    UnboundWord(String),

    /// A bound expression is not a valid regular expression.
    #[error("invalid expression for '{name}': {source}")]
    InvalidExpr {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to build pattern regex: {0}")]
    RegexBuild(#[from] regex::Error),

    /// Apply was given no value for a pattern word the template uses.
    #[error("missing binding for '{0}'")]
    MissingValue(String),

    /// A value-synthesis callback reported failure.
    #[error("binding '{name}': {message}")]
    BindValue { name: String, message: String },

    /// A template referenced a pattern word the source pattern lacks.
    #[error("unknown pattern word '{0}'")]
    UnknownWord(String),

    #[error("transformation is not reversible")]
    NotReversible,

    /// Sentinel returned by a search visitor to end the scan early.
    /// Recognized only by `search`; never surfaced to the caller.
    #[error("stopped searching")]
    StopSearch,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(7, "empty pattern word");
        assert_eq!(
            err.to_string(),
            "template syntax error at offset 7: empty pattern word"
        );

        // Wrapping in the crate error preserves the message.
        let err = Error::from(ParseError::new(2, "incomplete $ escape"));
        assert_eq!(
            err.to_string(),
            "template syntax error at offset 2: incomplete $ escape"
        );
    }

    #[test]
    fn test_parse_template_display() {
        let err = Error::ParseTemplate {
            template: "${".to_string(),
            source: ParseError::new(0, "incomplete pattern word"),
        };
        assert_eq!(
            err.to_string(),
            "parsing '${': template syntax error at offset 0: incomplete pattern word"
        );
    }
}
