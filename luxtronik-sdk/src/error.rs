use luxtronik_state::{CommandGroup, EntityId};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("API error: {0}")]
    Api(#[from] luxtronik_api::ApiError),

    #[error("Transform error: {0}")]
    Transform(#[from] luxtronik_state::TransformError),

    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("Entity {0} does not accept commands")]
    NotWritable(EntityId),

    #[error("{group} frame too short: {len} registers, {required} required")]
    FrameTooShort {
        group: CommandGroup,
        len: usize,
        required: usize,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Driver has stopped")]
    DriverStopped,
}

pub type Result<T> = std::result::Result<T, SdkError>;
