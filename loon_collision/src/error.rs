// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by collision queries.

use thiserror::Error;

/// Precondition violations detected by a [`CollisionChecker`](crate::CollisionChecker).
///
/// "Nothing found" is never an error; these only flag caller misuse.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CollisionError {
    /// A range query was issued with a negative radius.
    #[error("radius must not be negative (got {0})")]
    NegativeRadius(f64),

    /// A neighbour query was issued with a negative distance.
    #[error("distance must not be negative (got {0})")]
    NegativeDistance(f64),

    /// The bucket size must be at least one pixel.
    #[error("cell size must be positive (got {0})")]
    InvalidCellSize(u32),
}

/// Result type for collision queries.
pub type Result<T> = core::result::Result<T, CollisionError>;
