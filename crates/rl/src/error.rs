use physics::PhysicsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("action shape mismatch: expected {expected} values, got {actual}")]
    ActionShape { expected: usize, actual: usize },
    #[error("physics error: {0}")]
    Physics(#[from] PhysicsError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("step called before reset")]
    NeedsReset,
}
