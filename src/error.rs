#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("No selectable object is bound")]
    NoSelectable,
    #[error("A selection session is already active, apply or cancel it first")]
    SessionActive,
    #[error("No selection session is active")]
    NoSession,
    #[error("Nothing is selected")]
    EmptySelection,
    #[error("The selectable object has no column bounds")]
    NoColumnBounds,
    #[error("Raster shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("Image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Io: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = SelectionError> = std::result::Result<T, E>;
