// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The collision checker trait shared by every index strategy.

use core::fmt::Debug;
use core::hash::Hash;

use crate::error::{CollisionError, Result};
use crate::types::{RectBox, TypeTag};

/// Key bound required by checkers: a small, copyable, totally ordered handle.
///
/// The ordering is load-bearing: every query returns keys in ascending order,
/// and the "only" queries return the lowest matching key.
pub trait ObjectKey: Copy + Ord + Hash + Debug {}

impl<K: Copy + Ord + Hash + Debug> ObjectKey for K {}

/// Spatial index over a dynamic set of moving, resizable objects.
///
/// The index is not self-observing. After an object's box changes, the owner
/// must call [`update_object_location`](Self::update_object_location) or
/// [`update_object_size`](Self::update_object_size) before the next query, or
/// queries may miss the object.
///
/// Results are returned in ascending key order. When a query asks for a single
/// object ("only" variants), the lowest matching key wins.
pub trait CollisionChecker<K: ObjectKey> {
    /// Set the bucket size used to hash positions into cells.
    ///
    /// Existing registrations are re-bucketed if the size changes.
    fn initialize(&mut self, cell_size: u32) -> Result<()>;

    /// Current bucket size in pixels.
    fn cell_size(&self) -> u32;

    /// Register `key` with its current box. Re-adding a key replaces its entry.
    fn add_object(&mut self, key: K, bounds: RectBox, tag: TypeTag);

    /// Remove `key`. Returns whether it was registered.
    fn remove_object(&mut self, key: K) -> bool;

    /// Record that `key` moved from `(old_x, old_y)` to the origin of `bounds`.
    fn update_object_location(&mut self, key: K, bounds: RectBox, old_x: f64, old_y: f64);

    /// Record that `key` changed size.
    fn update_object_size(&mut self, key: K, bounds: RectBox);

    /// Remove every registration. The cell size is kept.
    fn clear(&mut self);

    /// Number of registered objects.
    fn len(&self) -> usize;

    /// Whether nothing is registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is registered.
    fn contains(&self, key: K) -> bool {
        self.bounds_of(key).is_some()
    }

    /// Last box recorded for `key`.
    fn bounds_of(&self, key: K) -> Option<RectBox>;

    /// All objects whose tag passes `tag`.
    fn get_objects(&self, tag: Option<TypeTag>) -> Vec<K>;

    /// Objects whose box contains the point.
    fn get_objects_at(&self, x: f64, y: f64, tag: Option<TypeTag>) -> Vec<K>;

    /// Objects other than `key` whose box strictly intersects the box of `key`.
    fn get_intersecting_objects(&self, key: K, tag: Option<TypeTag>) -> Vec<K>;

    /// Objects whose box center lies within `radius` of the point (Euclidean).
    fn get_objects_in_range(
        &self,
        x: f64,
        y: f64,
        radius: f64,
        tag: Option<TypeTag>,
    ) -> Result<Vec<K>>;

    /// The lowest-keyed object other than `key` whose box contains the point.
    fn get_only_object_at(&self, key: K, x: f64, y: f64, tag: Option<TypeTag>) -> Option<K> {
        self.get_objects_at(x, y, tag)
            .into_iter()
            .find(|&k| k != key)
    }

    /// The lowest-keyed object intersecting `key`.
    fn get_only_intersecting_object(&self, key: K, tag: Option<TypeTag>) -> Option<K> {
        self.get_intersecting_objects(key, tag).into_iter().next()
    }

    /// Objects around `key`, excluding `key` itself.
    ///
    /// With `diagonal` the neighbourhood is the Euclidean disc of radius
    /// `distance` around the center of `key`; without it, only objects within
    /// `distance` in Manhattan metric are kept, which drops the diagonal corners.
    fn get_neighbours(
        &self,
        key: K,
        distance: f64,
        diagonal: bool,
        tag: Option<TypeTag>,
    ) -> Result<Vec<K>> {
        if distance < 0.0 {
            return Err(CollisionError::NegativeDistance(distance));
        }
        let Some(anchor) = self.bounds_of(key) else {
            return Ok(Vec::new());
        };
        let (cx, cy) = (anchor.center_x(), anchor.center_y());
        let mut found = self.get_objects_in_range(cx, cy, distance, tag)?;
        found.retain(|&k| {
            k != key
                && (diagonal
                    || self
                        .bounds_of(k)
                        .is_some_and(|b| within_manhattan(&b, cx, cy, distance)))
        });
        Ok(found)
    }
}

/// Whether the center of `bounds` is within `radius` of `(x, y)`.
pub(crate) fn within_radius(bounds: &RectBox, x: f64, y: f64, radius: f64) -> bool {
    let dx = bounds.center_x() - x;
    let dy = bounds.center_y() - y;
    dx * dx + dy * dy <= radius * radius
}

fn within_manhattan(bounds: &RectBox, x: f64, y: f64, distance: f64) -> bool {
    (bounds.center_x() - x).abs() + (bounds.center_y() - y).abs() <= distance
}
