use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad class of a failure, used by callers to decide how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// The deployed model does not agree with the label set.
    Configuration,

    /// The image could not be decoded, preprocessed or run.
    Processing,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error(
        "Bentuk output model {actual} tidak sesuai dengan jumlah label {expected}. \
         Pastikan model dilatih dengan jumlah kelas yang sama dengan label yang diberikan."
    )]
    ShapeMismatch { actual: usize, expected: usize },

    #[error("model error: {0}")]
    Model(String),

    #[error("bad input tensor: expected {expected} values, got {actual}")]
    Tensor { actual: usize, expected: usize },
}

impl Error {
    pub fn category(&self) -> Category {
        match self {
            Error::ShapeMismatch { .. } => Category::Configuration,
            Error::Decode(_) | Error::Model(_) | Error::Tensor { .. } => Category::Processing,
        }
    }
}

impl From<tensorflow::Status> for Error {
    fn from(status: tensorflow::Status) -> Self {
        Error::Model(status.to_string())
    }
}
