use crate::map::{ConfigError, EmitError, HeightFieldError};
use crate::renderer::BridgeError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid height field")]
    HeightField(#[from] HeightFieldError),
    #[error("invalid terrain config")]
    Config(#[from] ConfigError),
    #[error("failed to read or write config file")]
    ConfigFile(#[from] ron::Error),
    #[error("terrain, node and patch sizes are fixed once the terrain is loaded")]
    LayoutChanged,
    #[error("failed to emit node instances")]
    Emit(#[from] EmitError),
    #[error("render backend failed")]
    Render(#[from] BridgeError),
}
