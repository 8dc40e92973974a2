//! Error types for the property store and the custom-data codec.

use thiserror::Error;

use crate::layers::LayerType;
use crate::store::{ArrayKind, SampleSelector};

/// Failures of a [`crate::PropertyStore`] operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Unknown property '{name}'")]
    UnknownProperty { name: String },

    #[error("Property '{name}' holds {actual} arrays, {expected} requested")]
    KindMismatch {
        name: String,
        expected: ArrayKind,
        actual: ArrayKind,
    },

    #[error("Property '{name}' has no sample {selector} ({available} stored)")]
    SampleMissing {
        name: String,
        selector: SampleSelector,
        available: usize,
    },

    #[error("Name '{name}' is already used by a property of another type")]
    NameCollision { name: String },
}

/// Failures while reading custom data back from a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Property '{property}' holds {actual} elements, expected {expected}")]
    SizeMismatch {
        property: String,
        expected: usize,
        actual: usize,
    },

    #[error("Layer type {layer_type} has no read implementation")]
    Unsupported { layer_type: LayerType },
}
