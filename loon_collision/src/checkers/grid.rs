// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid checker. Buckets objects by the cells their boxes cover.

use std::collections::{BTreeSet, HashMap};

use tracing::{trace, warn};

use crate::checker::{CollisionChecker, ObjectKey, within_radius};
use crate::error::{CollisionError, Result};
use crate::types::{RectBox, TypeTag};

/// Default bucket size in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 32;

type CellKey = (i32, i32);

/// Inclusive range of cells covered by a box.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct CellRange {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl CellRange {
    fn contains(&self, (cx, cy): CellKey) -> bool {
        cx >= self.min_x && cx <= self.max_x && cy >= self.min_y && cy <= self.max_y
    }

    fn cell_count(&self) -> u64 {
        // Widen first: a saturated range spans the whole i32 domain.
        let w = (i64::from(self.max_x) - i64::from(self.min_x)).unsigned_abs() + 1;
        let h = (i64::from(self.max_y) - i64::from(self.min_y)).unsigned_abs() + 1;
        w.saturating_mul(h)
    }

    fn cells(self) -> impl Iterator<Item = CellKey> {
        (self.min_y..=self.max_y).flat_map(move |y| (self.min_x..=self.max_x).map(move |x| (x, y)))
    }
}

#[derive(Clone, Debug)]
struct Entry {
    bounds: RectBox,
    tag: TypeTag,
    cells: CellRange,
}

/// Cell-bucketed collision index.
///
/// Each object is stored in every cell its box touches, so any two
/// intersecting objects share at least one cell and a point query only has
/// to visit the single cell under the point. Adds and removes cost one hash
/// operation per covered cell.
pub struct CollisionManager<K: ObjectKey> {
    cell_size: u32,
    entries: HashMap<K, Entry>,
    cells: HashMap<CellKey, Vec<K>>,
}

impl<K: ObjectKey> CollisionManager<K> {
    /// Create an empty index with the given cell size.
    pub fn new(cell_size: u32) -> Result<Self> {
        if cell_size == 0 {
            return Err(CollisionError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            entries: HashMap::new(),
            cells: HashMap::new(),
        })
    }

    /// An empty index with the same cell size.
    pub fn empty_like(&self) -> Self {
        Self {
            cell_size: self.cell_size,
            entries: HashMap::new(),
            cells: HashMap::new(),
        }
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn floor_to_cell(&self, v: f64) -> i32 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Cell indices saturate at the i32 range; worlds never get that large."
        )]
        let i = (v / f64::from(self.cell_size)).floor() as i32;
        i
    }

    fn key_for(&self, x: f64, y: f64) -> CellKey {
        (self.floor_to_cell(x), self.floor_to_cell(y))
    }

    fn range_for(&self, b: &RectBox) -> CellRange {
        // Corners are ordered so that boxes with negative extents still land
        // in the cells they span.
        let (x0, x1) = (b.x.min(b.right()), b.x.max(b.right()));
        let (y0, y1) = (b.y.min(b.bottom()), b.y.max(b.bottom()));
        let (min_x, min_y) = self.key_for(x0, y0);
        let (max_x, max_y) = self.key_for(x1, y1);
        CellRange {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    fn range_around(&self, x: f64, y: f64, radius: f64) -> CellRange {
        let (min_x, min_y) = self.key_for(x - radius, y - radius);
        let (max_x, max_y) = self.key_for(x + radius, y + radius);
        CellRange {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    fn insert_into_cells(&mut self, key: K, range: CellRange) {
        for cell in range.cells() {
            self.cells.entry(cell).or_default().push(key);
        }
    }

    fn remove_from_cells(&mut self, key: K, range: CellRange) {
        for cell in range.cells() {
            if let Some(slots) = self.cells.get_mut(&cell) {
                if let Some(pos) = slots.iter().position(|&k| k == key) {
                    slots.swap_remove(pos);
                }
                if slots.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }

    /// Gather the distinct keys stored in `range`, visiting whichever is
    /// smaller: the cells of the range or the occupied cells.
    fn candidates(&self, range: CellRange) -> BTreeSet<K> {
        let mut set = BTreeSet::new();
        if range.cell_count() > self.cells.len() as u64 {
            for (cell, slots) in &self.cells {
                if range.contains(*cell) {
                    set.extend(slots.iter().copied());
                }
            }
        } else {
            for cell in range.cells() {
                if let Some(slots) = self.cells.get(&cell) {
                    set.extend(slots.iter().copied());
                }
            }
        }
        set
    }

    fn rebucket(&mut self, key: K, bounds: RectBox) {
        let new_range = self.range_for(&bounds);
        let Some(entry) = self.entries.get_mut(&key) else {
            warn!(?key, "update for an object that is not registered");
            return;
        };
        entry.bounds = bounds;
        let old_range = entry.cells;
        if old_range == new_range {
            return;
        }
        entry.cells = new_range;
        self.remove_from_cells(key, old_range);
        self.insert_into_cells(key, new_range);
    }
}

impl<K: ObjectKey> CollisionChecker<K> for CollisionManager<K> {
    fn initialize(&mut self, cell_size: u32) -> Result<()> {
        if cell_size == 0 {
            return Err(CollisionError::InvalidCellSize(cell_size));
        }
        if cell_size == self.cell_size {
            return Ok(());
        }
        self.cell_size = cell_size;
        self.cells.clear();
        let keys: Vec<K> = self.entries.keys().copied().collect();
        for key in keys {
            let Some(bounds) = self.entries.get(&key).map(|e| e.bounds) else {
                continue;
            };
            let range = self.range_for(&bounds);
            if let Some(e) = self.entries.get_mut(&key) {
                e.cells = range;
            }
            self.insert_into_cells(key, range);
        }
        trace!(cell_size, objects = self.entries.len(), "collision grid re-bucketed");
        Ok(())
    }

    fn cell_size(&self) -> u32 {
        self.cell_size
    }

    fn add_object(&mut self, key: K, bounds: RectBox, tag: TypeTag) {
        if let Some(old) = self.entries.remove(&key) {
            self.remove_from_cells(key, old.cells);
        }
        let cells = self.range_for(&bounds);
        self.insert_into_cells(key, cells);
        self.entries.insert(key, Entry { bounds, tag, cells });
    }

    fn remove_object(&mut self, key: K) -> bool {
        match self.entries.remove(&key) {
            Some(entry) => {
                self.remove_from_cells(key, entry.cells);
                true
            }
            None => false,
        }
    }

    fn update_object_location(&mut self, key: K, bounds: RectBox, old_x: f64, old_y: f64) {
        trace!(?key, old_x, old_y, x = bounds.x, y = bounds.y, "object moved");
        self.rebucket(key, bounds);
    }

    fn update_object_size(&mut self, key: K, bounds: RectBox) {
        trace!(?key, width = bounds.width, height = bounds.height, "object resized");
        self.rebucket(key, bounds);
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn bounds_of(&self, key: K) -> Option<RectBox> {
        self.entries.get(&key).map(|e| e.bounds)
    }

    fn get_objects(&self, tag: Option<TypeTag>) -> Vec<K> {
        let set: BTreeSet<K> = self
            .entries
            .iter()
            .filter(|(_, e)| e.tag.matches(tag))
            .map(|(&k, _)| k)
            .collect();
        set.into_iter().collect()
    }

    fn get_objects_at(&self, x: f64, y: f64, tag: Option<TypeTag>) -> Vec<K> {
        let Some(slots) = self.cells.get(&self.key_for(x, y)) else {
            return Vec::new();
        };
        let set: BTreeSet<K> = slots
            .iter()
            .copied()
            .filter(|k| {
                self.entries
                    .get(k)
                    .is_some_and(|e| e.tag.matches(tag) && e.bounds.contains_point(x, y))
            })
            .collect();
        set.into_iter().collect()
    }

    fn get_intersecting_objects(&self, key: K, tag: Option<TypeTag>) -> Vec<K> {
        let Some(me) = self.entries.get(&key) else {
            return Vec::new();
        };
        self.candidates(me.cells)
            .into_iter()
            .filter(|&k| {
                k != key
                    && self
                        .entries
                        .get(&k)
                        .is_some_and(|e| e.tag.matches(tag) && e.bounds.intersects(&me.bounds))
            })
            .collect()
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
        Ok(self
            .candidates(self.range_around(x, y, radius))
            .into_iter()
            .filter(|k| {
                self.entries
                    .get(k)
                    .is_some_and(|e| e.tag.matches(tag) && within_radius(&e.bounds, x, y, radius))
            })
            .collect())
    }
}

impl<K: ObjectKey> core::fmt::Debug for CollisionManager<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CollisionManager")
            .field("cell_size", &self.cell_size)
            .field("objects", &self.entries.len())
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}
