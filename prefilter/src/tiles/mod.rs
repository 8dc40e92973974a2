//! 3×3 neighbourhood of render tiles and pixel-to-record resolution.
//!
//! A prefilter region may straddle the tile being denoised and its eight
//! neighbours. Each tile keeps its own render buffer with its own stride and
//! base offset, so every pixel lookup first resolves the owning tile from the
//! per-axis split boundaries and then addresses that tile's memory.

#[cfg(test)]
mod tests;

use strum_macros::Display;

use crate::error::{Error, Result};
use crate::rect::Rect;

/// Number of tiles per axis in a layout.
pub const TILES_PER_AXIS: usize = 3;

/// Number of tiles in a layout.
pub const TILE_COUNT: usize = TILES_PER_AXIS * TILES_PER_AXIS;

/// Index of the tile being denoised.
pub const CENTER_TILE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// One render tile: a borrowed render buffer plus its addressing parameters.
///
/// The record of pixel `(x, y)` starts at element
/// `(y * stride + x + offset) * pass_stride`; `offset` is usually negative so
/// that global pixel coordinates address tile-local memory.
#[derive(Debug, Clone, Copy)]
pub struct Tile<'a> {
    pub buffer: &'a [f32],
    pub offset: isize,
    /// Row stride in pixels.
    pub stride: usize,
}

impl<'a> Tile<'a> {
    pub fn new(buffer: &'a [f32], offset: isize, stride: usize) -> Self {
        Self {
            buffer,
            offset,
            stride,
        }
    }

    /// Pixel index of `(x, y)` inside this tile's buffer, before scaling by
    /// the pass stride. Negative when the offset points before the buffer.
    #[inline]
    fn pixel_index(&self, x: i32, y: i32) -> isize {
        y as isize * self.stride as isize + x as isize + self.offset
    }
}

/// Resolved location of one pixel's render-buffer record.
#[derive(Debug, Clone, Copy)]
pub struct TileLocation<'a> {
    /// Row-major tile index, `ytile * 3 + xtile`.
    pub tile: usize,
    pub buffer: &'a [f32],
    /// Element offset of the record's first float.
    pub offset: usize,
}

impl<'a> TileLocation<'a> {
    /// The `len` floats of the record starting `start` floats into it.
    #[inline]
    pub fn record(&self, start: usize, len: usize) -> &'a [f32] {
        let begin = self.offset + start;
        &self.buffer[begin..begin + len]
    }
}

/// Bin of `value` among three bins separated by `bounds[1]` and `bounds[2]`.
#[inline]
pub fn split_bin(value: i32, bounds: &[i32; 4]) -> usize {
    if value < bounds[1] {
        0
    } else if value < bounds[2] {
        1
    } else {
        2
    }
}

/// Row-major tile index owning `(x, y)`.
#[inline]
pub fn tile_index(x: i32, y: i32, x_bounds: &[i32; 4], y_bounds: &[i32; 4]) -> usize {
    split_bin(y, y_bounds) * TILES_PER_AXIS + split_bin(x, x_bounds)
}

/// Immutable description of the up to nine tiles surrounding a denoised tile.
#[derive(Debug, Clone)]
pub struct TileLayout<'a> {
    x: [i32; 4],
    y: [i32; 4],
    tiles: [Option<Tile<'a>>; TILE_COUNT],
}

fn validate_bounds(axis: Axis, bounds: [i32; 4]) -> Result<()> {
    let [b0, b1, b2, b3] = bounds;
    if b0 <= b1 && b1 < b2 && b2 <= b3 {
        Ok(())
    } else {
        Err(Error::InvalidTileBounds { axis, bounds })
    }
}

impl<'a> TileLayout<'a> {
    /// Builds a layout from per-axis tile boundaries and the nine tiles in
    /// row-major order. Absent neighbours (at image borders) are `None` and
    /// normally have zero extent.
    pub fn new(x: [i32; 4], y: [i32; 4], tiles: [Option<Tile<'a>>; TILE_COUNT]) -> Result<Self> {
        validate_bounds(Axis::X, x)?;
        validate_bounds(Axis::Y, y)?;
        Ok(Self { x, y, tiles })
    }

    /// Layout whose centre tile covers `bounds` and whose neighbours are empty.
    pub fn single(bounds: Rect, tile: Tile<'a>) -> Result<Self> {
        let mut tiles = [None; TILE_COUNT];
        tiles[CENTER_TILE] = Some(tile);
        Self::new(
            [bounds.min.x, bounds.min.x, bounds.max.x, bounds.max.x],
            [bounds.min.y, bounds.min.y, bounds.max.y, bounds.max.y],
            tiles,
        )
    }

    pub fn x_bounds(&self) -> &[i32; 4] {
        &self.x
    }

    pub fn y_bounds(&self) -> &[i32; 4] {
        &self.y
    }

    pub fn tile(&self, index: usize) -> Option<&Tile<'a>> {
        self.tiles[index].as_ref()
    }

    /// Union of all tiles.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x[0], self.y[0], self.x[3], self.y[3])
    }

    /// Pixel extent of tile `index`.
    pub fn tile_rect(&self, index: usize) -> Rect {
        let (xt, yt) = (index % TILES_PER_AXIS, index / TILES_PER_AXIS);
        Rect::new(self.x[xt], self.y[yt], self.x[xt + 1], self.y[yt + 1])
    }

    #[inline]
    pub fn tile_index(&self, x: i32, y: i32) -> usize {
        tile_index(x, y, &self.x, &self.y)
    }

    /// Resolves the tile owning `(x, y)` and the element offset of its record.
    ///
    /// # Panics
    /// When the owning tile is absent or the tile's offset addresses memory
    /// before the start of its buffer. Both are caller contract violations;
    /// [`TileLayout::validate_region`] checks them for a whole rectangle.
    #[inline]
    pub fn locate(&self, x: i32, y: i32, pass_stride: usize) -> TileLocation<'a> {
        debug_assert!(
            self.bounds().contains(x, y),
            "pixel ({}, {}) outside tile layout {}",
            x,
            y,
            self.bounds()
        );

        let index = self.tile_index(x, y);
        let tile = self.tiles[index]
            .unwrap_or_else(|| panic!("pixel ({}, {}) falls into empty tile {}", x, y, index));

        let pixel = tile.pixel_index(x, y);
        assert!(
            pixel >= 0,
            "pixel ({}, {}) maps before the start of tile {}",
            x,
            y,
            index
        );

        TileLocation {
            tile: index,
            buffer: tile.buffer,
            offset: pixel as usize * pass_stride,
        }
    }

    /// Checks that every pixel of `rect` resolves to a present tile whose
    /// buffer holds at least `record_end` floats of that pixel's record.
    pub fn validate_region(&self, rect: &Rect, pass_stride: usize, record_end: usize) -> Result<()> {
        let bounds = self.bounds();
        if !bounds.contains_rect(rect) {
            return Err(Error::RectOutsideLayout {
                rect: *rect,
                bounds,
            });
        }

        for index in 0..TILE_COUNT {
            let region = self.tile_rect(index).intersect(rect);
            if region.is_empty() {
                continue;
            }
            let tile = self.tiles[index].ok_or(Error::MissingTile {
                tile: index,
                rect: *rect,
            })?;

            // Pixel indices grow with x and y, so the extremes sit at the corners.
            let first = tile.pixel_index(region.min.x, region.min.y);
            if first < 0 {
                return Err(Error::NegativeTileOffset {
                    tile: index,
                    x: region.min.x,
                    y: region.min.y,
                });
            }
            let last = tile.pixel_index(region.max.x - 1, region.max.y - 1) as usize;
            let required = last * pass_stride + record_end;
            if tile.buffer.len() < required {
                return Err(Error::TileBufferTooSmall {
                    tile: index,
                    region,
                    required,
                    actual: tile.buffer.len(),
                });
            }
        }

        Ok(())
    }
}
