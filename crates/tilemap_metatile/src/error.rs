use thiserror::Error;

/// Reasons a metatile import is rejected before anything is written
#[derive(Debug, Error)]
pub enum MetatileError {
    #[error("Tile width and height must be above 0.")]
    ZeroTileSize,
    #[error("The metatileset has no image, so it has no source map.")]
    MissingImage,
    #[error("The source map for this metatileset does not contain any tiles, so there are no terrains to copy.")]
    NoTileLayer,
    #[error("The source map for this metatileset does not use any tilesets, so there are no terrains to copy.")]
    NoTilesets,
    #[error("Failed to read source map: {0}")]
    Io(#[from] std::io::Error),
    #[error("The source map is malformed: {0}")]
    MalformedSourceMap(#[from] serde_json::Error),
}
