// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timed actions and the scheduler a layer routes them through.
//!
//! A layer never runs actions itself. It hands them to an
//! [`ActionScheduler`] keyed by [`ActorId`], and cancels them when an actor
//! leaves the layer. Two schedulers are provided: [`NoopScheduler`] drops
//! everything, and [`ActionRegistry`] keeps pending actions in memory for a
//! driver loop to pick up.

use core::fmt::Debug;
use core::sync::atomic::{AtomicBool, Ordering};

use kurbo::{Point, Vec2};
use parking_lot::Mutex;

use crate::actor::ActorId;

/// Direction of a fade.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fade {
    /// From transparent to opaque.
    In,
    /// From opaque to transparent.
    Out,
}

/// A timed action bound to an actor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Action {
    /// Walk to a target over a tile grid.
    MoveTo {
        /// Destination.
        target: Point,
        /// Allow diagonal steps.
        all_directions: bool,
        /// Tile size of the walk grid.
        tile: Vec2,
    },
    /// Fade in or out.
    FadeTo {
        /// Direction.
        fade: Fade,
        /// Speed in alpha steps per tick.
        speed: i32,
    },
    /// Rotate to an angle in degrees.
    RotateTo {
        /// Target angle.
        angle: f64,
        /// Degrees per tick.
        speed: f64,
    },
    /// Jump with an initial impulse under gravity.
    JumpTo {
        /// Initial vertical impulse.
        impulse: i32,
        /// Gravity applied each tick.
        gravity: f64,
    },
    /// Circle around the current position.
    CircleTo {
        /// Circle radius.
        radius: i32,
        /// Angular velocity.
        velocity: i32,
    },
    /// Fly like a projectile toward a target.
    FireTo {
        /// Destination.
        target: Point,
        /// Pixels per tick.
        speed: f64,
    },
    /// Scale to the given factors.
    ScaleTo {
        /// Horizontal and vertical factors.
        scale: Vec2,
    },
    /// Follow an arrow arc toward a target.
    ArrowTo {
        /// Destination.
        target: Point,
    },
}

/// Discriminant of an [`Action`], used to cancel or look up actions by kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// [`Action::MoveTo`].
    MoveTo,
    /// [`Action::FadeTo`].
    FadeTo,
    /// [`Action::RotateTo`].
    RotateTo,
    /// [`Action::JumpTo`].
    JumpTo,
    /// [`Action::CircleTo`].
    CircleTo,
    /// [`Action::FireTo`].
    FireTo,
    /// [`Action::ScaleTo`].
    ScaleTo,
    /// [`Action::ArrowTo`].
    ArrowTo,
}

impl Action {
    /// Kind of this action.
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::MoveTo { .. } => ActionKind::MoveTo,
            Self::FadeTo { .. } => ActionKind::FadeTo,
            Self::RotateTo { .. } => ActionKind::RotateTo,
            Self::JumpTo { .. } => ActionKind::JumpTo,
            Self::CircleTo { .. } => ActionKind::CircleTo,
            Self::FireTo { .. } => ActionKind::FireTo,
            Self::ScaleTo { .. } => ActionKind::ScaleTo,
            Self::ArrowTo { .. } => ActionKind::ArrowTo,
        }
    }
}

/// Registers, cancels, and pauses actions keyed by actor identity.
pub trait ActionScheduler: Send + Sync + Debug {
    /// Queue `action` for `target`, optionally starting paused.
    fn add_action(&self, target: ActorId, action: Action, paused: bool);

    /// Cancel the actions of `target`: only those of `kind`, or all with `None`.
    fn remove_action(&self, target: ActorId, kind: Option<ActionKind>);

    /// First pending action of `kind` for `target`.
    fn get_action(&self, target: ActorId, kind: ActionKind) -> Option<Action>;

    /// Stop every action of `target` without removing it.
    fn stop(&self, target: ActorId);

    /// Pause or resume every action of `target`.
    fn pause(&self, target: ActorId, paused: bool);

    /// Resume the stopped or paused actions of `target`.
    fn start(&self, target: ActorId);

    /// Pause or resume the scheduler as a whole.
    fn set_pause_all(&self, paused: bool);

    /// Whether the scheduler as a whole is paused.
    fn is_paused_all(&self) -> bool;

    /// Stop every action of every actor.
    fn stop_all(&self);

    /// Number of registered actions.
    fn count(&self) -> usize;
}

/// Scheduler for callers without an action system. Accepts and forgets everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopScheduler;

impl ActionScheduler for NoopScheduler {
    fn add_action(&self, _target: ActorId, _action: Action, _paused: bool) {}
    fn remove_action(&self, _target: ActorId, _kind: Option<ActionKind>) {}
    fn get_action(&self, _target: ActorId, _kind: ActionKind) -> Option<Action> {
        None
    }
    fn stop(&self, _target: ActorId) {}
    fn pause(&self, _target: ActorId, _paused: bool) {}
    fn start(&self, _target: ActorId) {}
    fn set_pause_all(&self, _paused: bool) {}
    fn is_paused_all(&self) -> bool {
        false
    }
    fn stop_all(&self) {}
    fn count(&self) -> usize {
        0
    }
}

/// Playback state of a registered action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionState {
    /// Advancing on each tick.
    Running,
    /// Suspended; resumes where it left off.
    Paused,
    /// Halted; kept until removed or restarted.
    Stopped,
}

/// An action registered with an [`ActionRegistry`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScheduledAction {
    /// Actor the action is bound to.
    pub target: ActorId,
    /// The action itself.
    pub action: Action,
    /// Current playback state.
    pub state: ActionState,
}

/// In-memory scheduler that records actions for a driver loop.
///
/// The registry only tracks state. Stepping the actions each frame is left to
/// whoever owns the registry; [`ActionRegistry::snapshot`] hands out the
/// current list.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Mutex<Vec<ScheduledAction>>,
    paused_all: AtomicBool,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every registered action in registration order.
    pub fn snapshot(&self) -> Vec<ScheduledAction> {
        self.actions.lock().clone()
    }

    fn set_state(&self, target: ActorId, state: ActionState) {
        for a in self.actions.lock().iter_mut().filter(|a| a.target == target) {
            a.state = state;
        }
    }
}

impl ActionScheduler for ActionRegistry {
    fn add_action(&self, target: ActorId, action: Action, paused: bool) {
        let state = if paused {
            ActionState::Paused
        } else {
            ActionState::Running
        };
        self.actions.lock().push(ScheduledAction {
            target,
            action,
            state,
        });
    }

    fn remove_action(&self, target: ActorId, kind: Option<ActionKind>) {
        self.actions
            .lock()
            .retain(|a| a.target != target || kind.is_some_and(|k| a.action.kind() != k));
    }

    fn get_action(&self, target: ActorId, kind: ActionKind) -> Option<Action> {
        self.actions
            .lock()
            .iter()
            .find(|a| a.target == target && a.action.kind() == kind)
            .map(|a| a.action)
    }

    fn stop(&self, target: ActorId) {
        self.set_state(target, ActionState::Stopped);
    }

    fn pause(&self, target: ActorId, paused: bool) {
        let state = if paused {
            ActionState::Paused
        } else {
            ActionState::Running
        };
        self.set_state(target, state);
    }

    fn start(&self, target: ActorId) {
        self.set_state(target, ActionState::Running);
    }

    fn set_pause_all(&self, paused: bool) {
        self.paused_all.store(paused, Ordering::Relaxed);
    }

    fn is_paused_all(&self) -> bool {
        self.paused_all.load(Ordering::Relaxed)
    }

    fn stop_all(&self) {
        for a in self.actions.lock().iter_mut() {
            a.state = ActionState::Stopped;
        }
    }

    fn count(&self) -> usize {
        self.actions.lock().len()
    }
}
