use std::path::PathBuf;

/// This is the enumeration of all the different kinds of errors which this
/// crate generates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying line source failed before the end of the message
    /// was reached.
    #[error("cannot read message input: {0}")]
    Io(#[from] std::io::Error),

    /// The message file at the attached path could not be opened.
    #[error("cannot open '{}': {}", .path.display(), .source)]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The attached line begins with whitespace, marking it as a folded
    /// continuation, but no header field was open to fold it into.
    #[error("error parsing input at line {line_no}: no match for continuation")]
    NoOpenField { line_no: usize, line: String },

    /// The attached line was expected to be a header field, but does not
    /// have a colon-delimited field name in it.
    #[error("error parsing input at line {line_no}: cannot parse field")]
    UnparsableField { line_no: usize, line: String },

    /// A lookup on a parsed message matched nothing.  The attached text
    /// identifies what was looked up.
    #[error("{what} not found")]
    NotFound { what: String },
}

impl Error {
    /// Create an `OpenFile` variant from a path and an `io::Error`.
    pub(crate) fn open_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OpenFile {
            path: path.into(),
            source,
        }
    }
}
