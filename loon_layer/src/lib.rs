// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loon Layer: actors, paint order, and a collision index kept consistent.
//!
//! - [`Actor`] is a positioned, sized entity with a [`TypeTag`] kind, an
//!   optional user tag, and [`ActorFlags`]. Actors are shared as
//!   [`ActorRef`] and hold their layer weakly.
//! - [`ActorLayer`] owns membership: it keeps an [`ActorTreeSet`] (paint
//!   order) and a [`CollisionManager`](loon_collision::CollisionManager)
//!   (spatial index) in lockstep, and answers point, overlap, range, and
//!   neighbour queries.
//! - Timed actions are routed to an [`ActionScheduler`]; removing an actor
//!   cancels its actions.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use loon_collision::{RectBox, TypeTag};
//! use loon_layer::{Actor, ActorLayer, LayerConfig};
//!
//! const SHIP: TypeTag = TypeTag::new("ship");
//! const ROCK: TypeTag = TypeTag::new("rock");
//!
//! let layer = ActorLayer::new(LayerConfig::default()).unwrap();
//! let ship = Actor::new(SHIP, RectBox::new(0.0, 0.0, 32, 32));
//! let rock = Actor::new(ROCK, RectBox::new(100.0, 0.0, 32, 32));
//! layer.add_object(&ship);
//! layer.add_object(&rock);
//!
//! // Fly into the rock; the index follows the move.
//! ship.set_location(Point::new(80.0, 0.0));
//! let hits = ship.collision_objects(Some(ROCK)).unwrap();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].id(), rock.id());
//! ```
//!
//! ## Threading
//!
//! [`ActorLayer`] and [`Actor`] are `Send + Sync`. Structural changes from
//! several threads never leave the paint order and the index disagreeing.

pub mod action;
pub mod actor;
pub mod error;
pub mod layer;
pub mod tree_set;
pub mod util;

pub use action::{
    Action, ActionKind, ActionRegistry, ActionScheduler, ActionState, Fade, NoopScheduler,
    ScheduledAction,
};
pub use actor::{Actor, ActorFlags, ActorId, ActorRef};
pub use error::{LayerError, Result};
pub use layer::{ActorLayer, LayerConfig, MIN_PLACEMENT_CELL, PLACEMENT_ATTEMPTS_PER_CELL};
pub use tree_set::ActorTreeSet;
pub use util::{rect_from_kurbo, rect_to_kurbo};

pub use loon_collision::{RectBox, TypeTag};
