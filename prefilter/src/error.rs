//! Error types for prefilter setup and region passes.

use thiserror::Error;

use crate::rect::Rect;
use crate::tiles::Axis;

/// Errors reported while validating a tile layout, a configuration or the
/// buffers handed to a prefilter pass.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid {axis} tile bounds {bounds:?}: expected b0 <= b1 < b2 <= b3")]
    InvalidTileBounds { axis: Axis, bounds: [i32; 4] },

    #[error("Prefilter rect {rect} is empty")]
    EmptyRect { rect: Rect },

    #[error("Prefilter rect {rect} is not inside the tile layout bounds {bounds}")]
    RectOutsideLayout { rect: Rect, bounds: Rect },

    #[error("Tile {tile} overlaps prefilter rect {rect} but has no buffer")]
    MissingTile { tile: usize, rect: Rect },

    #[error(
        "Render buffer of tile {tile} holds {actual} floats, pixels in {region} need {required}"
    )]
    TileBufferTooSmall {
        tile: usize,
        region: Rect,
        required: usize,
        actual: usize,
    },

    #[error("Render buffer offset of tile {tile} points before the buffer start at pixel ({x}, {y})")]
    NegativeTileOffset { tile: usize, x: i32, y: i32 },

    #[error("Output buffer '{name}' holds {actual} floats, rect needs {required}")]
    BufferTooSmall {
        name: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Sample count {sample} is too small, at least {required} samples are needed")]
    TooFewSamples { sample: u32, required: u32 },

    #[error("Combine radius {radius} exceeds the maximum of {max}")]
    RadiusTooLarge { radius: u32, max: u32 },

    #[error(
        "Pass stride {pass_stride} cannot hold a denoising record of {record_len} floats at offset {denoising_offset}"
    )]
    RecordTooShort {
        pass_stride: usize,
        denoising_offset: usize,
        record_len: usize,
    },

    #[error("Feature offsets ({mean_offset}, {variance_offset}) exceed the denoising record of {record_len} floats")]
    FeatureOffsetOutOfRange {
        mean_offset: usize,
        variance_offset: usize,
        record_len: usize,
    },

    #[error("Failed to parse prefilter config: {0}")]
    ConfigParse(#[from] serde_yml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
