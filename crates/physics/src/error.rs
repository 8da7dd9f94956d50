use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("state shape mismatch: expected {expected} values, got {actual}")]
    StateShape { expected: usize, actual: usize },
    #[error("control shape mismatch: expected {expected} values, got {actual}")]
    ControlShape { expected: usize, actual: usize },
    #[error("unknown body: {0}")]
    UnknownBody(String),
    #[error("invalid model: {0}")]
    InvalidModel(String),
    #[error("mass matrix is not positive definite")]
    SingularMassMatrix,
}
