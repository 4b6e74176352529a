use crate::domain::value_objects::MatchPhase;

/// Errors returned by match engine operations
///
/// Both kinds are recoverable: the engine leaves its state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("Cannot {operation} during {phase}")]
    InvalidPhaseTransition {
        operation: &'static str,
        phase: MatchPhase,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MatchError {
    pub fn phase(operation: &'static str, phase: MatchPhase) -> Self {
        MatchError::InvalidPhaseTransition { operation, phase }
    }
}
