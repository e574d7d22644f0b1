use std::path::PathBuf;

/// Failures of the layers around the renderer. Rendering itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid scene: {0}")]
    InvalidScene(String),
}

pub type Result<T> = std::result::Result<T, Error>;
