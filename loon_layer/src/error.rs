// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by layer and actor operations.

use loon_collision::CollisionError;
use thiserror::Error;

/// Caller misuse detected by an [`ActorLayer`](crate::ActorLayer) or an
/// [`Actor`](crate::Actor) delegate.
///
/// A closed layer and an empty result are not errors.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LayerError {
    /// A sampler was asked for zero locations.
    #[error("count must be positive")]
    InvalidCount,

    /// A layer query was issued through an actor that belongs to no layer.
    #[error("the actor has not been added to a layer")]
    NotInLayer,

    /// The collision index rejected the query.
    #[error(transparent)]
    Collision(#[from] CollisionError),
}

/// Result type for layer operations.
pub type Result<T> = core::result::Result<T, LayerError>;
