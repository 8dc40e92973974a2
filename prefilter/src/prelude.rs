//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use prefilter::prelude::*;
//! ```

pub use crate::{Error, Feature, Prefilter, PrefilterConfig, Rect, ShadowBuffers, Tile, TileLayout};
