//! Layout of the denoising record inside each render-buffer pixel.
//!
//! Offsets are relative to the pass's denoising offset.

use strum_macros::{Display, EnumIter};

pub const NORMAL_OFFSET: usize = 0;
pub const NORMAL_VARIANCE_OFFSET: usize = 3;
pub const ALBEDO_OFFSET: usize = 6;
pub const ALBEDO_VARIANCE_OFFSET: usize = 9;
pub const DEPTH_OFFSET: usize = 12;
pub const DEPTH_VARIANCE_OFFSET: usize = 13;
/// Shadow half A: weight sum, ratio numerator, second moment.
pub const SHADOW_A_OFFSET: usize = 14;
/// Shadow half B, same three slots as half A.
pub const SHADOW_B_OFFSET: usize = 17;
pub const COLOR_OFFSET: usize = 20;
pub const COLOR_VARIANCE_OFFSET: usize = 23;

/// Floats in one shadow sub-record (both halves).
pub const SHADOW_RECORD_LEN: usize = 6;

/// Floats in the complete denoising record.
pub const DENOISING_RECORD_LEN: usize = 26;

/// Scalar features stored as a (mean, variance accumulator) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Feature {
    NormalX,
    NormalY,
    NormalZ,
    AlbedoR,
    AlbedoG,
    AlbedoB,
    Depth,
    ColorR,
    ColorG,
    ColorB,
}

impl Feature {
    /// Offset of the accumulated mean.
    pub const fn mean_offset(self) -> usize {
        match self {
            Feature::NormalX => NORMAL_OFFSET,
            Feature::NormalY => NORMAL_OFFSET + 1,
            Feature::NormalZ => NORMAL_OFFSET + 2,
            Feature::AlbedoR => ALBEDO_OFFSET,
            Feature::AlbedoG => ALBEDO_OFFSET + 1,
            Feature::AlbedoB => ALBEDO_OFFSET + 2,
            Feature::Depth => DEPTH_OFFSET,
            Feature::ColorR => COLOR_OFFSET,
            Feature::ColorG => COLOR_OFFSET + 1,
            Feature::ColorB => COLOR_OFFSET + 2,
        }
    }

    /// Offset of the accumulated variance (or sum of squares).
    pub const fn variance_offset(self) -> usize {
        match self {
            Feature::NormalX => NORMAL_VARIANCE_OFFSET,
            Feature::NormalY => NORMAL_VARIANCE_OFFSET + 1,
            Feature::NormalZ => NORMAL_VARIANCE_OFFSET + 2,
            Feature::AlbedoR => ALBEDO_VARIANCE_OFFSET,
            Feature::AlbedoG => ALBEDO_VARIANCE_OFFSET + 1,
            Feature::AlbedoB => ALBEDO_VARIANCE_OFFSET + 2,
            Feature::Depth => DEPTH_VARIANCE_OFFSET,
            Feature::ColorR => COLOR_VARIANCE_OFFSET,
            Feature::ColorG => COLOR_VARIANCE_OFFSET + 1,
            Feature::ColorB => COLOR_VARIANCE_OFFSET + 2,
        }
    }
}
