// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear-scan checker. Small and simple; good for tiny sets and as a test oracle.

use std::collections::BTreeMap;

use crate::checker::{CollisionChecker, ObjectKey, within_radius};
use crate::error::{CollisionError, Result};
use crate::types::{RectBox, TypeTag};

/// Checker that keeps objects in key order and scans them all on every query.
pub struct LinearChecker<K: ObjectKey> {
    cell_size: u32,
    entries: BTreeMap<K, (RectBox, TypeTag)>,
}

impl<K: ObjectKey> LinearChecker<K> {
    /// Create an empty checker. The cell size is only recorded.
    pub fn new(cell_size: u32) -> Result<Self> {
        if cell_size == 0 {
            return Err(CollisionError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            entries: BTreeMap::new(),
        })
    }

    fn scan(&self, tag: Option<TypeTag>, pred: impl Fn(K, &RectBox) -> bool) -> Vec<K> {
        self.entries
            .iter()
            .filter(|(k, (b, t))| t.matches(tag) && pred(**k, b))
            .map(|(k, _)| *k)
            .collect()
    }
}

impl<K: ObjectKey> core::fmt::Debug for LinearChecker<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LinearChecker")
            .field("objects", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<K: ObjectKey> CollisionChecker<K> for LinearChecker<K> {
    fn initialize(&mut self, cell_size: u32) -> Result<()> {
        if cell_size == 0 {
            return Err(CollisionError::InvalidCellSize(cell_size));
        }
        self.cell_size = cell_size;
        Ok(())
    }

    fn cell_size(&self) -> u32 {
        self.cell_size
    }

    fn add_object(&mut self, key: K, bounds: RectBox, tag: TypeTag) {
        self.entries.insert(key, (bounds, tag));
    }

    fn remove_object(&mut self, key: K) -> bool {
        self.entries.remove(&key).is_some()
    }

    fn update_object_location(&mut self, key: K, bounds: RectBox, _old_x: f64, _old_y: f64) {
        if let Some(e) = self.entries.get_mut(&key) {
            e.0 = bounds;
        }
    }

    fn update_object_size(&mut self, key: K, bounds: RectBox) {
        if let Some(e) = self.entries.get_mut(&key) {
            e.0 = bounds;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn bounds_of(&self, key: K) -> Option<RectBox> {
        self.entries.get(&key).map(|e| e.0)
    }

    fn get_objects(&self, tag: Option<TypeTag>) -> Vec<K> {
        self.scan(tag, |_, _| true)
    }

    fn get_objects_at(&self, x: f64, y: f64, tag: Option<TypeTag>) -> Vec<K> {
        self.scan(tag, |_, b| b.contains_point(x, y))
    }

    fn get_intersecting_objects(&self, key: K, tag: Option<TypeTag>) -> Vec<K> {
        let Some(me) = self.bounds_of(key) else {
            return Vec::new();
        };
        self.scan(tag, |k, b| k != key && b.intersects(&me))
    }

    fn get_objects_in_range(
        &self,
        x: f64,
        y: f64,
        radius: f64,
        tag: Option<TypeTag>,
    ) -> Result<Vec<K>> {
        if radius < 0.0 {
            return Err(CollisionError::NegativeRadius(radius));
        }
        Ok(self.scan(tag, |_, b| within_radius(b, x, y, radius)))
    }
}
