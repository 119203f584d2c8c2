// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loon Collision: axis-aligned boxes and a spatial index for moving 2D objects.
//!
//! - [`RectBox`] is the box every object carries: a floating-point origin and
//!   integral extents, with strict intersection and half-open point tests.
//! - [`CollisionChecker`] is the index contract: register keys with a box and
//!   a [`TypeTag`], tell the index when a box moves or resizes, and query by
//!   point, by box overlap, by radius, or by neighbourhood.
//! - [`CollisionManager`] buckets objects on a uniform grid. [`LinearChecker`]
//!   does the same job with plain scans.
//!
//! Every query returns keys in ascending order, and the "only" queries return
//! the lowest matching key, so results do not depend on hashing.
//!
//! # Example
//!
//! ```rust
//! use loon_collision::{CollisionChecker, CollisionManager, RectBox, TypeTag};
//!
//! const WALL: TypeTag = TypeTag::new("wall");
//! const COIN: TypeTag = TypeTag::new("coin");
//!
//! let mut grid = CollisionManager::new(32).unwrap();
//! grid.add_object(1_u32, RectBox::new(0.0, 0.0, 100, 10), WALL);
//! grid.add_object(2, RectBox::new(40.0, 5.0, 8, 8), COIN);
//!
//! // The coin overlaps the wall.
//! assert_eq!(grid.get_intersecting_objects(2, Some(WALL)), vec![1]);
//!
//! // Move it below the wall and tell the index.
//! let moved = RectBox::new(40.0, 50.0, 8, 8);
//! grid.update_object_location(2, moved, 40.0, 5.0);
//! assert!(grid.get_intersecting_objects(2, None).is_empty());
//! assert_eq!(grid.get_objects_at(44.0, 54.0, None), vec![2]);
//! ```
//!
//! ### Float semantics
//!
//! Coordinates are assumed not to be NaN.

pub mod checker;
pub mod checkers;
pub mod error;
pub mod types;

pub use checker::{CollisionChecker, ObjectKey};
pub use checkers::grid::{CollisionManager, DEFAULT_CELL_SIZE};
pub use checkers::linear::LinearChecker;
pub use error::{CollisionError, Result};
pub use types::{RectBox, TypeTag};
