use crate::types::MachineId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Duplicate machine id in fleet: {0}")]
    DuplicateMachine(MachineId),

    #[error("Validation failed: {0}")]
    Validation(String),
}
