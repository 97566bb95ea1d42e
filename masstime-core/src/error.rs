use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeControlError {
    #[error("Mass simulation engine is not available")]
    EngineUnavailable,

    #[error("World settings are not available")]
    WorldUnavailable,

    #[error("Already at the highest simulation speed")]
    AtTopSpeed,

    #[error("Already at the lowest simulation speed")]
    AtBottomSpeed,
}
