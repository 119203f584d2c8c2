// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checker implementations.
//!
//! - [`grid::CollisionManager`]: uniform cell buckets. Point queries visit a
//!   single cell; box and radius queries visit the cells they cover, or the
//!   occupied cells when that set is smaller.
//! - [`linear::LinearChecker`]: scans every object. Useful for a handful of
//!   objects and as a reference when testing the grid.

pub mod grid;
pub mod linear;
