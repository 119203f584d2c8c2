// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Actors: positioned, sized entities that live in at most one layer.

use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use kurbo::{Point, Size};
use loon_collision::{RectBox, TypeTag};
use parking_lot::RwLock;

use crate::error::{LayerError, Result};
use crate::layer::{ActorLayer, LayerShared};

/// Identity of an actor.
///
/// Ids are allocated from a process-wide counter, never reused, and ordered
/// by creation. Layer queries return actors in ascending id order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u64);

impl ActorId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value of the id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

bitflags::bitflags! {
    /// Actor flags controlling visibility and input.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ActorFlags: u8 {
        /// Actor is drawn.
        const VISIBLE   = 0b0000_0001;
        /// Actor receives pointer input.
        const CLICKABLE = 0b0000_0010;
        /// Actor can be dragged.
        const DRAGGABLE = 0b0000_0100;
    }
}

impl Default for ActorFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::CLICKABLE
    }
}

/// Shared handle to an actor.
pub type ActorRef = Arc<Actor>;

#[derive(Debug)]
pub(crate) struct ActorState {
    pub(crate) bounds: RectBox,
    tag: Option<String>,
    flags: ActorFlags,
    pub(crate) layer: Option<Weak<LayerShared>>,
}

/// A positioned, sized entity that takes part in collision and paint order.
///
/// Actors are shared as [`ActorRef`]. The layer they were added to is held
/// weakly: a layer owns membership, never lifetime.
///
/// Moving or resizing an actor through [`set_location`](Self::set_location),
/// [`move_by`](Self::move_by), or [`set_size`](Self::set_size) keeps its
/// layer's collision index current. In a bounded layer positions are clamped
/// to `[0, layer extent - actor extent]`.
#[derive(Debug)]
pub struct Actor {
    id: ActorId,
    kind: TypeTag,
    state: RwLock<ActorState>,
}

impl Actor {
    /// Create a detached actor of the given kind.
    pub fn new(kind: TypeTag, bounds: RectBox) -> ActorRef {
        Arc::new(Self {
            id: ActorId::next(),
            kind,
            state: RwLock::new(ActorState {
                bounds,
                tag: None,
                flags: ActorFlags::default(),
                layer: None,
            }),
        })
    }

    /// Identity of this actor.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Kind used by type-filtered queries.
    pub fn kind(&self) -> TypeTag {
        self.kind
    }

    /// Copy of the current box.
    pub fn bounds(&self) -> RectBox {
        self.state.read().bounds
    }

    /// Top-left corner.
    pub fn location(&self) -> Point {
        let b = self.bounds();
        Point::new(b.x, b.y)
    }

    /// Current size.
    pub fn size(&self) -> Size {
        let b = self.bounds();
        Size::new(f64::from(b.width), f64::from(b.height))
    }

    /// Opaque user tag, compared by [`ActorLayer::get_only_collision_objects_at`].
    pub fn tag(&self) -> Option<String> {
        self.state.read().tag.clone()
    }

    pub(crate) fn tag_matches(&self, tag: Option<&str>) -> bool {
        tag.is_none_or(|t| self.state.read().tag.as_deref() == Some(t))
    }

    /// Replace the user tag.
    pub fn set_tag(&self, tag: Option<String>) {
        self.state.write().tag = tag;
    }

    /// Visibility and input flags.
    pub fn flags(&self) -> ActorFlags {
        self.state.read().flags
    }

    /// Replace the flags.
    pub fn set_flags(&self, flags: ActorFlags) {
        self.state.write().flags = flags;
    }

    /// Layer this actor is a member of.
    ///
    /// `None` when it was never added, has been removed, or was evicted by
    /// [`ActorLayer::reset`].
    pub fn layer(&self) -> Option<ActorLayer> {
        self.linked_layer().filter(|l| l.has_member(self))
    }

    /// Layer the back-reference points at, member or not.
    pub(crate) fn linked_layer(&self) -> Option<ActorLayer> {
        let weak = self.state.read().layer.clone()?;
        weak.upgrade().map(ActorLayer::from_shared)
    }

    /// Whether the actor is currently a member of a live layer.
    pub fn is_in_layer(&self) -> bool {
        self.layer().is_some()
    }

    fn require_layer(&self) -> Result<ActorLayer> {
        self.layer().ok_or(LayerError::NotInLayer)
    }

    /// Move the top-left corner to `p`.
    ///
    /// The position is clamped in a bounded layer, and the layer's index is
    /// told about the move.
    pub fn set_location(&self, p: Point) {
        let layer = self.layer();
        let mut target = p;
        if let Some(l) = &layer
            && l.is_bounded()
        {
            target = l.clamp_location(p, self.size());
        }
        let old = {
            let mut st = self.state.write();
            let old = st.bounds;
            st.bounds.set_location(target.x, target.y);
            old
        };
        if old.x == target.x && old.y == target.y {
            return;
        }
        if let Some(l) = layer {
            l.update_object_location(self, old.x, old.y);
        }
    }

    /// Move by an offset from the current location.
    pub fn move_by(&self, dx: f64, dy: f64) {
        let at = self.location();
        self.set_location(Point::new(at.x + dx, at.y + dy));
    }

    /// Change the size. Extents are truncated toward zero.
    pub fn set_size(&self, size: Size) {
        let changed = {
            let mut st = self.state.write();
            let old = st.bounds;
            st.bounds.set_size(size.width, size.height);
            old != st.bounds
        };
        if changed && let Some(l) = self.layer() {
            l.update_object_size(self);
        }
    }

    /// Paint this actor last in its layer.
    pub fn send_to_front(&self) -> Result<()> {
        self.require_layer()?.send_to_front(self);
        Ok(())
    }

    /// Paint this actor first in its layer.
    pub fn send_to_back(&self) -> Result<()> {
        self.require_layer()?.send_to_back(self);
        Ok(())
    }

    /// Actors whose boxes intersect this one.
    pub fn collision_objects(&self, kind: Option<TypeTag>) -> Result<Vec<ActorRef>> {
        Ok(self.require_layer()?.get_intersecting_objects(self, kind))
    }

    /// Lowest-id actor whose box intersects this one.
    pub fn only_collision_object(&self, kind: Option<TypeTag>) -> Result<Option<ActorRef>> {
        Ok(self.require_layer()?.get_only_intersecting_object(self, kind))
    }

    /// Other actors whose centers lie within `radius` of this actor's center.
    pub fn objects_in_range(&self, radius: f64, kind: Option<TypeTag>) -> Result<Vec<ActorRef>> {
        let layer = self.require_layer()?;
        let b = self.bounds();
        let mut found =
            layer.get_objects_in_range(Point::new(b.center_x(), b.center_y()), radius, kind)?;
        found.retain(|a| a.id() != self.id);
        Ok(found)
    }

    /// Neighbours within `distance`; see [`ActorLayer::get_neighbours`].
    pub fn neighbours(
        &self,
        distance: f64,
        diagonal: bool,
        kind: Option<TypeTag>,
    ) -> Result<Vec<ActorRef>> {
        self.require_layer()?
            .get_neighbours(self, distance, diagonal, kind)
    }

    /// Actors covering the point at `(dx, dy)` from this actor's corner.
    pub fn collision_objects_at_offset(
        &self,
        dx: f64,
        dy: f64,
        kind: Option<TypeTag>,
    ) -> Result<Vec<ActorRef>> {
        let layer = self.require_layer()?;
        let at = self.location();
        Ok(layer.get_collision_objects_at(Point::new(at.x + dx, at.y + dy), kind))
    }

    /// Lowest-id other actor covering the point at `(dx, dy)` from this actor's corner.
    pub fn only_collision_object_at_offset(
        &self,
        dx: f64,
        dy: f64,
        kind: Option<TypeTag>,
    ) -> Result<Option<ActorRef>> {
        let layer = self.require_layer()?;
        let at = self.location();
        Ok(layer.get_only_object_at(self, Point::new(at.x + dx, at.y + dy), kind))
    }

    /// A random free cell in this actor's layer, sized for this actor.
    pub fn random_location(&self) -> Result<Option<RectBox>> {
        let layer = self.require_layer()?;
        Ok(layer
            .get_random_layer_location_for(self, 1)?
            .and_then(|cells| cells.into_iter().next()))
    }

    pub(crate) fn state(&self) -> &RwLock<ActorState> {
        &self.state
    }

    /// Clear the back-reference if it still points at `layer`.
    pub(crate) fn detach_from(&self, layer: &Arc<LayerShared>) {
        let mut st = self.state.write();
        if st
            .layer
            .as_ref()
            .is_some_and(|w| core::ptr::eq(w.as_ptr(), Arc::as_ptr(layer)))
        {
            st.layer = None;
        }
    }
}
