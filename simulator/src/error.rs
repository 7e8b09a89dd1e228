use crate::config::ConfigError;
use crate::source::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("set {set_id} is not loaded")]
    SetNotLoaded { set_id: String },

    #[error("set {set_id} has no collectible cards")]
    NoCardsForSet { set_id: String },

    #[error("pack count {count} out of range 1..={max}")]
    InvalidPackCount { count: u32, max: u32 },

    #[error("invalid pack config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

pub type SimulatorResult<T> = Result<T, SimulatorError>;
