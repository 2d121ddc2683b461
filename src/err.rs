use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum NetError {
    /// Forward-pass input length differs from the input-layer neuron count
    InputSizeMismatch { expected: usize, actual: usize },
    /// Expected-output length differs from the output-layer neuron count
    OutputSizeMismatch { expected: usize, actual: usize },
    /// Dot-product operands or replacement weights have the wrong length/shape
    WeightVectorSizeMismatch { expected: usize, actual: usize },
    ArraySizeMismatch { expected: usize, actual: usize },
    /// Topology-mutation (or column) index outside of the valid bounds
    IndexOutOfRange { index: usize, len: usize },
    UnknownActivation(String),
    InvalidFormat(String),
    InvalidLayerSize,
    EmptyTrainingSet,
}

pub type NetResult<T> = Result<T, NetError>;

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetError::InputSizeMismatch { expected, actual } => {
                write!(f, "Input size mismatch : expected {}, got {}", expected, actual)
            }
            NetError::OutputSizeMismatch { expected, actual } => {
                write!(f, "Output size mismatch : expected {}, got {}", expected, actual)
            }
            NetError::WeightVectorSizeMismatch { expected, actual } => {
                write!(f, "Weight vector size mismatch : expected {}, got {}", expected, actual)
            }
            NetError::ArraySizeMismatch { expected, actual } => {
                write!(f, "Array size mismatch : expected {}, got {}", expected, actual)
            }
            NetError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} is out of range (length {})", index, len)
            }
            NetError::UnknownActivation(name) => {
                write!(f, "Unknown activation function : {}", name)
            }
            NetError::InvalidFormat(reason) => {
                write!(f, "Invalid format : {}", reason)
            }
            NetError::InvalidLayerSize => {
                write!(f, "{}", "Layer must contain at least one neuron")
            }
            NetError::EmptyTrainingSet => {
                write!(f, "{}", "Training set is empty")
            }
        }
    }
}

impl std::error::Error for NetError {}
