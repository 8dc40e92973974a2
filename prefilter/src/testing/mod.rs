//! Testing utilities for the prefilter.

#![allow(dead_code)]

use crate::rect::Rect;
use crate::tiles::{TILE_COUNT, TILES_PER_AXIS, Tile, TileLayout};

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

struct OwnedTile {
    buffer: Vec<f32>,
    offset: isize,
    stride: usize,
}

/// Owns the render buffers of a 3×3 tile neighbourhood so tests can fill
/// records by global pixel coordinate and borrow a [`TileLayout`] over them.
///
/// Every tile gets its own stride (`width + padding`) and a negative base
/// offset, so the same pixel lands at unrelated positions in different tiles.
pub struct SyntheticTiles {
    x: [i32; 4],
    y: [i32; 4],
    pass_stride: usize,
    tiles: Vec<Option<OwnedTile>>,
}

impl SyntheticTiles {
    pub fn new(x: [i32; 4], y: [i32; 4], pass_stride: usize, padding: usize) -> Self {
        let tiles = (0..TILE_COUNT)
            .map(|index| {
                let (xt, yt) = (index % TILES_PER_AXIS, index / TILES_PER_AXIS);
                let rect = Rect::new(x[xt], y[yt], x[xt + 1], y[yt + 1]);
                if rect.is_empty() {
                    return None;
                }
                // Vary padding per tile so strides differ between neighbours.
                let stride = rect.width() + padding + index;
                let offset = -(rect.min.y as isize * stride as isize + rect.min.x as isize);
                Some(OwnedTile {
                    buffer: vec![0.0; stride * rect.height() * pass_stride],
                    offset,
                    stride,
                })
            })
            .collect();

        Self {
            x,
            y,
            pass_stride,
            tiles,
        }
    }

    /// Single centre tile covering `bounds`.
    pub fn single(bounds: Rect, pass_stride: usize) -> Self {
        Self::new(
            [bounds.min.x, bounds.min.x, bounds.max.x, bounds.max.x],
            [bounds.min.y, bounds.min.y, bounds.max.y, bounds.max.y],
            pass_stride,
            0,
        )
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x[0], self.y[0], self.x[3], self.y[3])
    }

    pub fn pass_stride(&self) -> usize {
        self.pass_stride
    }

    /// Writes `values` into the record of `(x, y)` starting `start` floats in.
    pub fn set_record(&mut self, x: i32, y: i32, start: usize, values: &[f32]) {
        let index = crate::tiles::tile_index(x, y, &self.x, &self.y);
        let pass_stride = self.pass_stride;
        let tile = self.tiles[index]
            .as_mut()
            .unwrap_or_else(|| panic!("pixel ({}, {}) is in empty tile {}", x, y, index));
        let pixel = y as isize * tile.stride as isize + x as isize + tile.offset;
        let begin = pixel as usize * pass_stride + start;
        tile.buffer[begin..begin + values.len()].copy_from_slice(values);
    }

    /// Fills every pixel's record via `f(x, y)`, starting `start` floats in.
    pub fn fill_records(&mut self, start: usize, f: impl Fn(i32, i32) -> Vec<f32>) {
        for (x, y) in self.bounds().pixels() {
            let values = f(x, y);
            self.set_record(x, y, start, &values);
        }
    }

    /// Drops the buffer of one tile, simulating a missing neighbour.
    pub fn remove_tile(&mut self, index: usize) {
        self.tiles[index] = None;
    }

    pub fn layout(&self) -> TileLayout<'_> {
        let tiles = std::array::from_fn(|index| {
            self.tiles[index]
                .as_ref()
                .map(|t| Tile::new(&t.buffer, t.offset, t.stride))
        });
        TileLayout::new(self.x, self.y, tiles).expect("synthetic tile bounds must be valid")
    }
}
