//! Point-cache custom data: per-element mesh layers (deform weights, colors,
//! original indices, original-space UVs) written to and read from an abstract
//! hierarchical property store.

pub mod custom_data;
pub mod error;
pub mod layers;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use custom_data::{CustomData, CustomDataReader, CustomDataWriter, Layer, LayerName};
pub use error::{ReadError, StoreError};
pub use layers::{Color, DeformVert, DeformWeight, LayerData, LayerMask, LayerType, OrigSpaceFace};
pub use store::{
    ArrayKind, ArraySample, CompoundId, MemoryStore, PropertyId, PropertyStore, SampleSelector,
};
