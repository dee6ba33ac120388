use std::path::PathBuf;

/// Errors raised by matrix, table and model operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Row/column counts disagree for construction, arithmetic, matmul or
    /// row/column appends.
    #[error("shape mismatch in {op}: expected {expected}, found {found}")]
    ShapeMismatch {
        op: &'static str,
        expected: String,
        found: String,
    },

    #[error("{axis} index {index} is out of bounds for length {len}")]
    IndexOutOfBounds {
        axis: Axis,
        index: usize,
        len: usize,
    },

    /// A value could not be interpreted as any of the accepted kinds.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("label-based indexing requires column labels, but the table has none")]
    MissingLabels,

    #[error("label '{0}' not found")]
    LabelNotFound(String),

    #[error("duplicate column label '{0}'")]
    DuplicateLabel(String),

    #[error("model is not fitted; call fit() first")]
    NotFitted,

    #[error("invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Axis named in [`Error::IndexOutOfBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

impl Error {
    pub(crate) fn shape(op: &'static str, expected: impl ToString, found: impl ToString) -> Self {
        Error::ShapeMismatch {
            op,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}
