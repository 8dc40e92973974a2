//! Tests for tile resolution.

use super::*;
use crate::testing::SyntheticTiles;

const X: [i32; 4] = [0, 8, 16, 24];
const Y: [i32; 4] = [100, 104, 112, 115];

#[test]
fn test_split_bin_boundaries() {
    let bounds = [0, 8, 16, 24];
    assert_eq!(split_bin(0, &bounds), 0);
    assert_eq!(split_bin(7, &bounds), 0);
    assert_eq!(split_bin(8, &bounds), 1);
    assert_eq!(split_bin(15, &bounds), 1);
    assert_eq!(split_bin(16, &bounds), 2);
    assert_eq!(split_bin(23, &bounds), 2);
}

#[test]
fn test_tile_index_row_major() {
    assert_eq!(tile_index(0, 100, &X, &Y), 0);
    assert_eq!(tile_index(10, 100, &X, &Y), 1);
    assert_eq!(tile_index(20, 100, &X, &Y), 2);
    assert_eq!(tile_index(0, 104, &X, &Y), 3);
    assert_eq!(tile_index(10, 110, &X, &Y), CENTER_TILE);
    assert_eq!(tile_index(20, 111, &X, &Y), 5);
    assert_eq!(tile_index(7, 112, &X, &Y), 6);
    assert_eq!(tile_index(8, 114, &X, &Y), 7);
    assert_eq!(tile_index(23, 114, &X, &Y), 8);
}

#[test]
fn test_every_pixel_maps_into_its_tile_rect() {
    let tiles = SyntheticTiles::new(X, Y, 1, 0);
    let layout = tiles.layout();
    for (x, y) in layout.bounds().pixels() {
        let index = layout.tile_index(x, y);
        assert!(
            layout.tile_rect(index).contains(x, y),
            "pixel ({}, {}) resolved to tile {} with rect {}",
            x,
            y,
            index,
            layout.tile_rect(index)
        );
    }
}

#[test]
fn test_new_rejects_unordered_splits() {
    let tiles = [None; TILE_COUNT];
    let err = TileLayout::new([0, 10, 10, 20], Y, tiles).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidTileBounds {
            axis: Axis::X,
            bounds: [0, 10, 10, 20]
        }
    ));

    let err = TileLayout::new(X, [5, 4, 8, 9], tiles).unwrap_err();
    assert!(matches!(err, Error::InvalidTileBounds { axis: Axis::Y, .. }));
}

#[test]
fn test_new_accepts_empty_border_tiles() {
    let tiles = [None; TILE_COUNT];
    assert!(TileLayout::new([0, 0, 16, 16], [0, 0, 16, 16], tiles).is_ok());
}

#[test]
fn test_locate_offset_formula() {
    // 4x3 tile at origin, stride 6 (2 pixels padding), offset 5, pass stride 3.
    let buffer = vec![0.0f32; 200];
    let tile = Tile::new(&buffer, 5, 6);
    let layout = TileLayout::single(Rect::new(0, 0, 4, 3), tile).unwrap();

    let loc = layout.locate(2, 1, 3);
    assert_eq!(loc.tile, CENTER_TILE);
    assert_eq!(loc.offset, (6 + 2 + 5) * 3);
}

#[test]
fn test_locate_with_negative_offset() {
    // Tile covering [10, 14)x[20, 22) addressed with global coordinates.
    let stride = 4;
    let offset = -(20 * stride as isize + 10);
    let buffer: Vec<f32> = (0..8).map(|i| i as f32).collect();
    let tile = Tile::new(&buffer, offset, stride);
    let layout = TileLayout::single(Rect::new(10, 20, 14, 22), tile).unwrap();

    let loc = layout.locate(10, 20, 1);
    assert_eq!(loc.offset, 0);
    let loc = layout.locate(13, 21, 1);
    assert_eq!(loc.offset, 7);
    assert_eq!(loc.record(0, 1), &[7.0]);
}

#[test]
fn test_record_reads_from_owning_tile() {
    let mut tiles = SyntheticTiles::new(X, Y, 2, 3);
    tiles.set_record(3, 101, 0, &[1.0, 2.0]);
    tiles.set_record(20, 113, 0, &[3.0, 4.0]);

    let layout = tiles.layout();
    let a = layout.locate(3, 101, 2);
    assert_eq!(a.tile, 0);
    assert_eq!(a.record(0, 2), &[1.0, 2.0]);

    let b = layout.locate(20, 113, 2);
    assert_eq!(b.tile, 8);
    assert_eq!(b.record(1, 1), &[4.0]);
}

#[test]
#[should_panic(expected = "falls into empty tile")]
fn test_locate_panics_on_missing_tile() {
    let mut tiles = SyntheticTiles::new(X, Y, 1, 0);
    tiles.remove_tile(2);
    let layout = tiles.layout();
    layout.locate(20, 100, 1);
}

#[test]
fn test_validate_region_accepts_full_layout() {
    let tiles = SyntheticTiles::new(X, Y, 4, 1);
    let layout = tiles.layout();
    assert!(layout.validate_region(&layout.bounds(), 4, 4).is_ok());
}

#[test]
fn test_validate_region_rejects_rect_outside_bounds() {
    let tiles = SyntheticTiles::new(X, Y, 1, 0);
    let layout = tiles.layout();
    let err = layout
        .validate_region(&Rect::new(0, 100, 25, 101), 1, 1)
        .unwrap_err();
    assert!(matches!(err, Error::RectOutsideLayout { .. }));
}

#[test]
fn test_validate_region_reports_missing_tile_only_when_touched() {
    let mut tiles = SyntheticTiles::new(X, Y, 1, 0);
    tiles.remove_tile(8);
    let layout = tiles.layout();

    // Centre tile only: the missing corner is irrelevant.
    assert!(layout.validate_region(&Rect::new(8, 104, 16, 112), 1, 1).is_ok());

    let err = layout
        .validate_region(&Rect::new(8, 104, 17, 113), 1, 1)
        .unwrap_err();
    assert!(matches!(err, Error::MissingTile { tile: 8, .. }));
}

#[test]
fn test_validate_region_rejects_short_buffer() {
    let buffer = vec![0.0f32; 4 * 4 * 3 - 1];
    let tile = Tile::new(&buffer, 0, 4);
    let layout = TileLayout::single(Rect::new(0, 0, 4, 4), tile).unwrap();

    let err = layout
        .validate_region(&Rect::new(0, 0, 4, 4), 3, 3)
        .unwrap_err();
    match err {
        Error::TileBufferTooSmall {
            tile,
            required,
            actual,
            ..
        } => {
            assert_eq!(tile, CENTER_TILE);
            assert_eq!(required, 48);
            assert_eq!(actual, 47);
        }
        other => panic!("unexpected error {:?}", other),
    }

    // A record that ends before the last float still fits.
    assert!(layout.validate_region(&Rect::new(0, 0, 4, 4), 3, 2).is_ok());
}

#[test]
fn test_validate_region_rejects_negative_offset() {
    let buffer = vec![0.0f32; 64];
    let tile = Tile::new(&buffer, -1, 4);
    let layout = TileLayout::single(Rect::new(0, 0, 4, 4), tile).unwrap();

    let err = layout
        .validate_region(&Rect::new(0, 0, 4, 4), 1, 1)
        .unwrap_err();
    assert!(matches!(err, Error::NegativeTileOffset { x: 0, y: 0, .. }));
}
