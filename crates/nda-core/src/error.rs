use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArrayError {
    #[error("allocation failed on {device}: {reason}")]
    Allocation { device: String, reason: String },
    #[error("{op} failed with backend status {status}")]
    Transfer { op: &'static str, status: i32 },
    #[error("shape mismatch: lhs {lhs:?}, rhs {rhs:?}")]
    ShapeMismatch { lhs: Vec<i64>, rhs: Vec<i64> },
    #[error("dtype mismatch: lhs {lhs}, rhs {rhs}")]
    DTypeMismatch { lhs: String, rhs: String },
    #[error("context mismatch: lhs {lhs}, rhs {rhs}")]
    ContextMismatch { lhs: String, rhs: String },
    #[error("unsupported dtype {dtype} for {op}")]
    UnsupportedDType { op: &'static str, dtype: String },
    #[error("operation {op} is not provided by this backend")]
    Unimplemented { op: &'static str },
    #[error("{0}")]
    Backend(String),
}

impl ArrayError {
    /// The backend status code carried by a transfer failure, if any.
    /// Always nonzero when present.
    pub fn transfer_status(&self) -> Option<i32> {
        match self {
            ArrayError::Transfer { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArrayError>;
