// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loon Animation: a frame timeline advanced by elapsed-time deltas.
//!
//! An [`Animation`] holds `(visual, cumulative end time)` frames. Each call to
//! [`Animation::update`] adds the delta to the time spent in the current
//! cycle and moves the current frame forward. Running past the last frame
//! fires the [`AnimationListener`], wraps the time, and counts a loop; an
//! optional loop limit freezes the timeline once exceeded.
//!
//! The visual type is generic: sprites, texture handles, or plain indices
//! all work. Time is in milliseconds.
//!
//! ```rust
//! use loon_animation::Animation;
//!
//! let mut blink = Animation::from_visuals(["open", "closed"], None, 250);
//! blink.set_loop_count(Some(2));
//! for _ in 0..20 {
//!     blink.update(100);
//! }
//! assert!(blink.is_exhausted());
//! ```

pub mod animation;

pub use animation::{Animation, AnimationListener, Frame};
