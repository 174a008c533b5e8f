use thiserror::Error;
use uuid::Uuid;

/// Errors raised by document lookups and edits
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("No layer with id {0}")]
    UnknownLayer(Uuid),
    #[error("Layer \"{0}\" is not a Tile Layer")]
    NotATileLayer(String),
    #[error("No tileset with id {0}")]
    UnknownTileset(Uuid),
    #[error("Position ({x}, {y}) is outside the layer")]
    OutOfBounds { x: i32, y: i32 },
    #[error("A {width}x{height} tile layer needs {expected} cells, found {found}")]
    CellCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },
}
