// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The actor layer: paint order and collision index kept in lockstep.
//!
//! ## Locking
//!
//! The ordering set and the collision index live together behind one
//! read-write lock. Structural changes take the write lock, queries take the
//! read lock, so a loader thread may add actors while the update thread
//! queries. When both locks are needed the layer lock is taken first and the
//! actor lock second; actor methods release their own lock before calling
//! into the layer.

use core::sync::atomic::{AtomicBool, Ordering};
use std::collections::HashSet;
use std::sync::{Arc, Weak};

use kurbo::{Point, Rect, Size, Vec2};
use loon_collision::{CollisionChecker, CollisionManager, DEFAULT_CELL_SIZE, RectBox, TypeTag};
use parking_lot::RwLock;
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::action::{Action, ActionKind, ActionScheduler, Fade, NoopScheduler};
use crate::actor::{Actor, ActorId, ActorRef};
use crate::error::{LayerError, Result};
use crate::tree_set::ActorTreeSet;
use crate::util::{limit_value, saturating_i32};

/// Smallest cell edge used by the placement sampler.
pub const MIN_PLACEMENT_CELL: i32 = 48;

/// Attempts the placement sampler makes per requested location.
pub const PLACEMENT_ATTEMPTS_PER_CELL: usize = 100;

/// Geometry and indexing parameters of a layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LayerConfig {
    /// Left edge in screen space.
    pub x: i32,
    /// Top edge in screen space.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Bucket size of the collision index.
    pub cell_size: u32,
    /// Clamp actor positions inside the layer.
    pub bounded: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 640,
            height: 480,
            cell_size: DEFAULT_CELL_SIZE,
            bounded: true,
        }
    }
}

#[derive(Debug)]
pub(crate) struct LayerState {
    objects: ActorTreeSet,
    checker: CollisionManager<ActorId>,
}

impl LayerState {
    fn resolve(&self, ids: Vec<ActorId>) -> Vec<ActorRef> {
        ids.into_iter()
            .filter_map(|id| self.objects.get(id).cloned())
            .collect()
    }
}

#[derive(Debug)]
pub(crate) struct LayerShared {
    config: LayerConfig,
    closed: AtomicBool,
    scheduler: Arc<dyn ActionScheduler>,
    state: RwLock<LayerState>,
}

/// Handle to a layer of actors.
///
/// Cloning the handle is cheap and every clone refers to the same layer.
/// Once [`close`](Self::close)d, every operation becomes a no-op: queries
/// return empty lists, `None`, or `0`.
///
/// Query results are ordered by ascending [`ActorId`]; the "only" queries
/// return the lowest id among the matches.
#[derive(Clone, Debug)]
pub struct ActorLayer {
    shared: Arc<LayerShared>,
}

impl ActorLayer {
    /// Create a layer with no action system attached.
    pub fn new(config: LayerConfig) -> Result<Self> {
        Self::with_scheduler(config, Arc::new(NoopScheduler))
    }

    /// Create a layer that routes actions through `scheduler`.
    pub fn with_scheduler(config: LayerConfig, scheduler: Arc<dyn ActionScheduler>) -> Result<Self> {
        let checker = CollisionManager::new(config.cell_size)?;
        Ok(Self {
            shared: Arc::new(LayerShared {
                config,
                closed: AtomicBool::new(false),
                scheduler,
                state: RwLock::new(LayerState {
                    objects: ActorTreeSet::new(),
                    checker,
                }),
            }),
        })
    }

    pub(crate) fn from_shared(shared: Arc<LayerShared>) -> Self {
        Self { shared }
    }

    /// Whether both handles refer to the same layer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Construction parameters.
    pub fn config(&self) -> &LayerConfig {
        &self.shared.config
    }

    /// Screen-space rectangle of the layer.
    pub fn bounds(&self) -> Rect {
        let c = &self.shared.config;
        Rect::from_origin_size(
            (f64::from(c.x), f64::from(c.y)),
            (f64::from(c.width), f64::from(c.height)),
        )
    }

    /// Width in pixels.
    pub fn width(&self) -> i32 {
        self.shared.config.width
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        self.shared.config.height
    }

    /// Bucket size of the collision index.
    pub fn cell_size(&self) -> u32 {
        self.shared.config.cell_size
    }

    /// Whether actor positions are clamped inside the layer.
    pub fn is_bounded(&self) -> bool {
        self.shared.config.bounded
    }

    /// Shut the layer. Every later call is a no-op.
    pub fn close(&self) {
        if !self.shared.closed.swap(true, Ordering::AcqRel) {
            debug!(objects = self.shared.state.read().objects.size(), "layer closed");
        }
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Clamp a top-left corner so an actor of `size` stays inside the layer.
    pub fn clamp_location(&self, p: Point, size: Size) -> Point {
        let c = &self.shared.config;
        Point::new(
            limit_value(p.x, f64::from(c.width) - size.width),
            limit_value(p.y, f64::from(c.height) - size.height),
        )
    }

    /// Cell index containing `pixel`, rounding down.
    pub fn to_cell_floor(&self, pixel: f64) -> i32 {
        saturating_i32((pixel / f64::from(self.cell_size())).floor())
    }

    /// Cell index containing `pixel`, rounding up.
    pub fn to_cell_ceil(&self, pixel: f64) -> i32 {
        saturating_i32((pixel / f64::from(self.cell_size())).ceil())
    }

    /// Pixel coordinate of the center of cell `cell`.
    pub fn cell_center(&self, cell: f64) -> f64 {
        let s = f64::from(self.cell_size());
        cell * s + s / 2.0
    }

    // --- membership ---

    /// Add `actor` at its current location.
    pub fn add_object(&self, actor: &ActorRef) {
        let at = actor.location();
        self.add_object_at(actor, at);
    }

    /// Add `actor` with its top-left corner at `at`.
    ///
    /// Adding a member again does nothing. An actor that belongs to another
    /// layer is removed from it first.
    pub fn add_object_at(&self, actor: &ActorRef, at: Point) {
        loop {
            if self.is_closed() {
                return;
            }
            if let Some(prev) = actor.linked_layer()
                && !prev.ptr_eq(self)
            {
                prev.remove_object(actor);
            }
            let mut state = self.shared.state.write();
            let mut st = actor.state().write();
            // Another thread may have claimed the actor since the check above.
            if self.foreign_owner(st.layer.as_ref()).is_some() {
                continue;
            }
            if !state.objects.add(Arc::clone(actor)) {
                return;
            }
            let size = Size::new(f64::from(st.bounds.width), f64::from(st.bounds.height));
            let p = if self.is_bounded() {
                self.clamp_location(at, size)
            } else {
                at
            };
            st.bounds.set_location(p.x, p.y);
            st.layer = Some(Arc::downgrade(&self.shared));
            let bounds = st.bounds;
            drop(st);
            state.checker.add_object(actor.id(), bounds, actor.kind());
            trace!(id = actor.id().get(), kind = %actor.kind(), %bounds, "actor added");
            return;
        }
    }

    /// Live, open layer other than this one that `link` points at.
    fn foreign_owner(&self, link: Option<&Weak<LayerShared>>) -> Option<Arc<LayerShared>> {
        link.and_then(Weak::upgrade).filter(|other| {
            !Arc::ptr_eq(other, &self.shared) && !other.closed.load(Ordering::Acquire)
        })
    }

    /// Whether `actor` is a member. Always `false` once closed.
    pub fn contains(&self, actor: &Actor) -> bool {
        !self.is_closed() && self.has_member(actor)
    }

    pub(crate) fn has_member(&self, actor: &Actor) -> bool {
        self.shared.state.read().objects.contains(actor.id())
    }

    /// Remove `actor`, cancel its pending actions, and clear its layer.
    ///
    /// Returns whether it was a member.
    pub fn remove_object(&self, actor: &Actor) -> bool {
        if self.is_closed() {
            return false;
        }
        let removed = {
            let mut state = self.shared.state.write();
            let removed = state.objects.remove(actor.id()).is_some();
            if removed {
                state.checker.remove_object(actor.id());
            }
            removed
        };
        self.shared.scheduler.remove_action(actor.id(), None);
        actor.detach_from(&self.shared);
        if removed {
            trace!(id = actor.id().get(), "actor removed");
        }
        removed
    }

    /// Remove every actor of `kind`, or every actor with `None`.
    ///
    /// Returns how many were removed.
    pub fn remove_objects_of_kind(&self, kind: Option<TypeTag>) -> usize {
        if self.is_closed() {
            return 0;
        }
        let removed = {
            let mut state = self.shared.state.write();
            let removed = state.objects.remove_where(|a| a.kind().matches(kind));
            for a in &removed {
                state.checker.remove_object(a.id());
            }
            removed
        };
        for a in &removed {
            self.shared.scheduler.remove_action(a.id(), None);
            a.detach_from(&self.shared);
        }
        debug!(count = removed.len(), kind = ?kind, "actors removed by kind");
        removed.len()
    }

    /// Remove each actor in `actors`. Returns how many were members.
    pub fn remove_objects(&self, actors: &[ActorRef]) -> usize {
        actors.iter().filter(|a| self.remove_object(a)).count()
    }

    /// Re-bucket `actor` after it moved from `(old_x, old_y)`.
    ///
    /// [`Actor::set_location`] calls this; call it directly only when the
    /// box was changed some other way.
    pub fn update_object_location(&self, actor: &Actor, old_x: f64, old_y: f64) {
        if self.is_closed() {
            return;
        }
        let mut state = self.shared.state.write();
        if !state.objects.contains(actor.id()) {
            return;
        }
        let bounds = actor.bounds();
        state
            .checker
            .update_object_location(actor.id(), bounds, old_x, old_y);
    }

    /// Refresh `actor`'s box after a size change.
    pub fn update_object_size(&self, actor: &Actor) {
        if self.is_closed() {
            return;
        }
        let mut state = self.shared.state.write();
        if !state.objects.contains(actor.id()) {
            return;
        }
        let bounds = actor.bounds();
        state.checker.update_object_size(actor.id(), bounds);
    }

    /// Paint `actor` last.
    pub fn send_to_front(&self, actor: &Actor) {
        if self.is_closed() {
            return;
        }
        self.shared.state.write().objects.send_to_front(actor.id());
    }

    /// Paint `actor` first.
    pub fn send_to_back(&self, actor: &Actor) {
        if self.is_closed() {
            return;
        }
        self.shared.state.write().objects.send_to_back(actor.id());
    }

    /// Drop every member at once by swapping in an empty set and index.
    ///
    /// Actors are not told. They stop counting as members at once, and moves
    /// they make afterwards are not indexed.
    pub fn reset(&self) {
        if self.is_closed() {
            return;
        }
        let old = {
            let mut state = self.shared.state.write();
            let fresh = LayerState {
                objects: ActorTreeSet::new(),
                checker: state.checker.empty_like(),
            };
            core::mem::replace(&mut *state, fresh)
        };
        debug!(evicted = old.objects.size(), "layer reset");
    }

    // --- queries ---

    /// Number of members.
    pub fn size(&self) -> usize {
        if self.is_closed() {
            return 0;
        }
        self.shared.state.read().objects.size()
    }

    /// Members back to front.
    pub fn objects_in_paint_order(&self) -> Vec<ActorRef> {
        if self.is_closed() {
            return Vec::new();
        }
        self.shared.state.read().objects.iter().cloned().collect()
    }

    /// Every member of `kind`, or every member with `None`.
    pub fn get_collision_objects(&self, kind: Option<TypeTag>) -> Vec<ActorRef> {
        self.query(|c| c.get_objects(kind))
    }

    /// Members whose boxes contain `p`.
    pub fn get_collision_objects_at(&self, p: Point, kind: Option<TypeTag>) -> Vec<ActorRef> {
        self.query(|c| c.get_objects_at(p.x, p.y, kind))
    }

    /// Members of any kind whose boxes contain `p`.
    pub fn get_collision_objects_at_point(&self, p: Point) -> Vec<ActorRef> {
        self.get_collision_objects_at(p, None)
    }

    /// Topmost member containing `p`, optionally requiring an equal user tag.
    pub fn get_only_collision_objects_at(&self, p: Point, tag: Option<&str>) -> Option<ActorRef> {
        if self.is_closed() {
            return None;
        }
        self.shared
            .state
            .read()
            .objects
            .get_only_collision_objects_at(p.x, p.y, tag)
    }

    /// Topmost visible, clickable member containing `p`.
    pub fn get_synchronized_object(&self, p: Point) -> Option<ActorRef> {
        if self.is_closed() {
            return None;
        }
        self.shared
            .state
            .read()
            .objects
            .get_synchronized_object(p.x, p.y)
    }

    /// Members other than `actor` whose boxes strictly intersect it.
    pub fn get_intersecting_objects(&self, actor: &Actor, kind: Option<TypeTag>) -> Vec<ActorRef> {
        self.query(|c| c.get_intersecting_objects(actor.id(), kind))
    }

    /// Lowest-id member intersecting `actor`.
    pub fn get_only_intersecting_object(
        &self,
        actor: &Actor,
        kind: Option<TypeTag>,
    ) -> Option<ActorRef> {
        self.query_one(|c| c.get_only_intersecting_object(actor.id(), kind))
    }

    /// Lowest-id member other than `actor` containing `p`.
    pub fn get_only_object_at(
        &self,
        actor: &Actor,
        p: Point,
        kind: Option<TypeTag>,
    ) -> Option<ActorRef> {
        self.query_one(|c| c.get_only_object_at(actor.id(), p.x, p.y, kind))
    }

    /// Members whose centers lie within `radius` of `p`.
    ///
    /// A negative radius is an error.
    pub fn get_objects_in_range(
        &self,
        p: Point,
        radius: f64,
        kind: Option<TypeTag>,
    ) -> Result<Vec<ActorRef>> {
        if self.is_closed() {
            return Ok(Vec::new());
        }
        let state = self.shared.state.read();
        let ids = state.checker.get_objects_in_range(p.x, p.y, radius, kind)?;
        Ok(state.resolve(ids))
    }

    /// Members around `actor`, excluding it.
    ///
    /// With `diagonal` the neighbourhood is the disc of radius `distance`
    /// around the actor's center; without it, the Manhattan diamond. A
    /// negative distance is an error.
    pub fn get_neighbours(
        &self,
        actor: &Actor,
        distance: f64,
        diagonal: bool,
        kind: Option<TypeTag>,
    ) -> Result<Vec<ActorRef>> {
        if self.is_closed() {
            return Ok(Vec::new());
        }
        let state = self.shared.state.read();
        let ids = state
            .checker
            .get_neighbours(actor.id(), distance, diagonal, kind)?;
        Ok(state.resolve(ids))
    }

    fn query(&self, f: impl FnOnce(&CollisionManager<ActorId>) -> Vec<ActorId>) -> Vec<ActorRef> {
        if self.is_closed() {
            return Vec::new();
        }
        let state = self.shared.state.read();
        let ids = f(&state.checker);
        state.resolve(ids)
    }

    fn query_one(
        &self,
        f: impl FnOnce(&CollisionManager<ActorId>) -> Option<ActorId>,
    ) -> Option<ActorRef> {
        if self.is_closed() {
            return None;
        }
        let state = self.shared.state.read();
        f(&state.checker).and_then(|id| state.objects.get(id).cloned())
    }

    // --- placement ---

    /// Sample up to `count` distinct free cells sized for `around`.
    ///
    /// See [`get_random_layer_location_with`](Self::get_random_layer_location_with).
    pub fn get_random_layer_location(
        &self,
        around: RectBox,
        count: usize,
    ) -> Result<Option<Vec<RectBox>>> {
        self.get_random_layer_location_with(&mut rand::thread_rng(), around, count)
    }

    /// Sample up to `count` distinct cells sized for `actor`, avoiding its own cell.
    pub fn get_random_layer_location_for(
        &self,
        actor: &Actor,
        count: usize,
    ) -> Result<Option<Vec<RectBox>>> {
        self.get_random_layer_location(actor.bounds(), count)
    }

    /// Sample up to `count` distinct cells of the layer using `rng`.
    ///
    /// The layer is cut into cells of `max(width, 48) x max(height, 48)` taken
    /// from `around`. Cells are drawn at random, skipping the cell that holds
    /// the corner of `around` and any cell already picked, for at most
    /// `count * 100` draws. Returns all `count` cells when found, the partial
    /// list when the draws run out, and `None` when not a single cell was
    /// found. A zero `count` is an error.
    pub fn get_random_layer_location_with<R: Rng>(
        &self,
        rng: &mut R,
        around: RectBox,
        count: usize,
    ) -> Result<Option<Vec<RectBox>>> {
        if self.is_closed() {
            return Ok(None);
        }
        if count == 0 {
            return Err(LayerError::InvalidCount);
        }
        let cell_w = around.width.max(MIN_PLACEMENT_CELL);
        let cell_h = around.height.max(MIN_PLACEMENT_CELL);
        let cols = self.width() / cell_w;
        let rows = self.height() / cell_h;
        if cols <= 0 || rows <= 0 {
            warn!(cell_w, cell_h, "layer is smaller than one placement cell");
            return Ok(None);
        }
        let origin = (around.x_px() / cell_w, around.y_px() / cell_h);
        let mut picked = Vec::with_capacity(count);
        let mut seen = HashSet::new();
        for _ in 0..count.saturating_mul(PLACEMENT_ATTEMPTS_PER_CELL) {
            if picked.len() >= count {
                break;
            }
            let cell = (rng.gen_range(0..cols), rng.gen_range(0..rows));
            if cell == origin || !seen.insert(cell) {
                continue;
            }
            picked.push(RectBox::new(
                f64::from(cell.0 * cell_w),
                f64::from(cell.1 * cell_h),
                cell_w,
                cell_h,
            ));
        }
        if picked.is_empty() {
            warn!(count, "no free placement cell found");
            return Ok(None);
        }
        if picked.len() < count {
            warn!(count, found = picked.len(), "placement sampler ran out of attempts");
        }
        Ok(Some(picked))
    }

    // --- actions ---

    /// Queue `action` for `actor`.
    pub fn add_action_event(&self, actor: &Actor, action: Action, paused: bool) {
        if self.is_closed() {
            return;
        }
        self.shared.scheduler.add_action(actor.id(), action, paused);
    }

    /// Cancel the actions of `kind` bound to `actor`.
    pub fn remove_action_event(&self, actor: &Actor, kind: ActionKind) {
        if self.is_closed() {
            return;
        }
        self.shared.scheduler.remove_action(actor.id(), Some(kind));
    }

    /// Cancel every action bound to `actor`.
    pub fn remove_action_events(&self, actor: &Actor) {
        if self.is_closed() {
            return;
        }
        self.shared.scheduler.remove_action(actor.id(), None);
    }

    /// First pending action of `kind` bound to `actor`.
    pub fn get_action_event(&self, actor: &Actor, kind: ActionKind) -> Option<Action> {
        if self.is_closed() {
            return None;
        }
        self.shared.scheduler.get_action(actor.id(), kind)
    }

    /// Stop the actions bound to `actor`.
    pub fn stop_action_event(&self, actor: &Actor) {
        if self.is_closed() {
            return;
        }
        self.shared.scheduler.stop(actor.id());
    }

    /// Pause or resume the actions bound to `actor`.
    pub fn pause_action_event(&self, actor: &Actor, paused: bool) {
        if self.is_closed() {
            return;
        }
        self.shared.scheduler.pause(actor.id(), paused);
    }

    /// Resume the actions bound to `actor`.
    pub fn start_action_event(&self, actor: &Actor) {
        if self.is_closed() {
            return;
        }
        self.shared.scheduler.start(actor.id());
    }

    /// Pause or resume the whole scheduler.
    pub fn pause_all_action_events(&self, paused: bool) {
        if self.is_closed() {
            return;
        }
        self.shared.scheduler.set_pause_all(paused);
    }

    /// Whether the whole scheduler is paused.
    pub fn is_pause_all_action_events(&self) -> bool {
        !self.is_closed() && self.shared.scheduler.is_paused_all()
    }

    /// Stop every action of every actor.
    pub fn stop_all_action_events(&self) {
        if self.is_closed() {
            return;
        }
        self.shared.scheduler.stop_all();
    }

    /// Number of registered actions.
    pub fn action_event_count(&self) -> usize {
        if self.is_closed() {
            return 0;
        }
        self.shared.scheduler.count()
    }

    fn call(&self, actor: &Actor, action: Action) -> Option<Action> {
        if self.is_closed() {
            return None;
        }
        self.add_action_event(actor, action, false);
        Some(action)
    }

    /// Walk `actor` to `target` over a 32px tile grid.
    pub fn call_move_to(&self, actor: &Actor, target: Point, all_directions: bool) -> Option<Action> {
        self.call(
            actor,
            Action::MoveTo {
                target,
                all_directions,
                tile: Vec2::new(32.0, 32.0),
            },
        )
    }

    /// Fade `actor` in.
    pub fn call_fade_in_to(&self, actor: &Actor, speed: i32) -> Option<Action> {
        self.call(
            actor,
            Action::FadeTo {
                fade: Fade::In,
                speed,
            },
        )
    }

    /// Fade `actor` out.
    pub fn call_fade_out_to(&self, actor: &Actor, speed: i32) -> Option<Action> {
        self.call(
            actor,
            Action::FadeTo {
                fade: Fade::Out,
                speed,
            },
        )
    }

    /// Rotate `actor` to `angle` degrees.
    pub fn call_rotate_to(&self, actor: &Actor, angle: f64, speed: f64) -> Option<Action> {
        self.call(actor, Action::RotateTo { angle, speed })
    }

    /// Make `actor` jump.
    pub fn call_jump_to(&self, actor: &Actor, impulse: i32, gravity: f64) -> Option<Action> {
        self.call(actor, Action::JumpTo { impulse, gravity })
    }

    /// Circle `actor` around its position.
    pub fn call_circle_to(&self, actor: &Actor, radius: i32, velocity: i32) -> Option<Action> {
        self.call(actor, Action::CircleTo { radius, velocity })
    }

    /// Fire `actor` toward `target` like a projectile.
    pub fn call_fire_to(&self, actor: &Actor, target: Point, speed: f64) -> Option<Action> {
        self.call(actor, Action::FireTo { target, speed })
    }

    /// Scale `actor` by independent factors.
    pub fn call_scale_to(&self, actor: &Actor, scale: Vec2) -> Option<Action> {
        self.call(actor, Action::ScaleTo { scale })
    }

    /// Send `actor` along an arrow arc to `target`.
    pub fn call_arrow_to(&self, actor: &Actor, target: Point) -> Option<Action> {
        self.call(actor, Action::ArrowTo { target })
    }
}
