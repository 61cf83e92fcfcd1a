use thiserror::Error;

/// Main error type for smoothfn
#[derive(Error, Debug)]
pub enum SfError {
    #[error("Vector error: {0}")]
    Vector(#[from] VectorError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Partitioned-vector errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorError {
    #[error("Shape mismatch in partition {partition}: {left} elements vs {right}")]
    ShapeMismatch {
        partition: usize,
        left: usize,
        right: usize,
    },

    #[error("Partition count mismatch: {left} partitions vs {right}")]
    PartitionCountMismatch { left: usize, right: usize },

    #[error("Invalid partition count: {count}")]
    InvalidPartitionCount { count: usize },

    #[error("Partition {index} out of range for vector with {count} partitions")]
    PartitionOutOfRange { index: usize, count: usize },
}

/// Smooth-function evaluation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// The evaluation mode did not request a value.
    #[error("Contract violation: value requested from an evaluation that did not compute one")]
    ValueNotComputed,

    /// The evaluation mode did not request a gradient.
    #[error("Contract violation: gradient requested from an evaluation that did not compute one")]
    GradientNotComputed,

    #[error("Invalid huber threshold: tau must be finite and positive, got {tau}")]
    InvalidThreshold { tau: f64 },
}

impl SfError {
    /// True for shape errors raised while pairing two vectors.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            SfError::Vector(VectorError::ShapeMismatch { .. })
                | SfError::Vector(VectorError::PartitionCountMismatch { .. })
        )
    }

    /// True for accessor misuse on a partial evaluation.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            SfError::Evaluation(EvaluationError::ValueNotComputed)
                | SfError::Evaluation(EvaluationError::GradientNotComputed)
        )
    }
}

/// Result type alias for smoothfn operations
pub type SfResult<T> = Result<T, SfError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::SfError::Validation(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::SfError::Config(format!($($arg)*))
    };
}
