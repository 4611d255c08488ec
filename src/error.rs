//! Errors surfaced at the plan, registry and wisdom boundary.
//!
//! Codelets themselves keep a plain `bool` contract; these types only appear once a caller goes
//! through a [`Plan`](crate::planner::Plan) or the [`Wisdom`](crate::wisdom::Wisdom) store.
use thiserror::Error;

pub type FftResult<T> = Result<T, FftError>;

#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FftError {
    /// The length is not a shape any registered engine can transform.
    #[error("invalid transform length {len}: must be a non-zero 2/3/5-smooth size up to {max}")]
    InvalidLength { len: usize, max: usize },
    #[error("{buffer} buffer holds {actual} elements but the transform needs {required}")]
    BufferTooShort {
        buffer: &'static str,
        required: usize,
        actual: usize,
    },
    #[error("real and imaginary parts differ in length ({reals} vs {imags})")]
    LengthMismatch { reals: usize, imags: usize },
    #[error("codelet {signature} rejected a size-{size} transform")]
    KernelFailed {
        signature: &'static str,
        size: usize,
    },
    /// No entry at all is registered for this size, not even the generic fallback.
    #[error("no codelet registered for size {size}")]
    Unregistered { size: usize },
    #[error("malformed wisdom on line {line}: {reason}")]
    InvalidWisdom { line: usize, reason: String },
    /// A strided call whose stride is zero or whose last index overflows `usize`.
    #[error("invalid stride {stride}")]
    InvalidStride { stride: usize },
    #[error("cannot access wisdom file {path}: {reason}")]
    WisdomFile { path: String, reason: String },
}

impl FftError {
    pub(crate) fn wisdom_file(path: &std::path::Path, err: &std::io::Error) -> Self {
        FftError::WisdomFile {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}
