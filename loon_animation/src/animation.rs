// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyframe timeline driven by elapsed-time deltas.

use core::fmt;

use tracing::debug;

/// One keyframe: a visual and the cumulative time at which it ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame<V> {
    /// Visual shown while this frame is current.
    pub visual: V,
    /// Cumulative end time in milliseconds, measured from the start of the cycle.
    pub end_ms: u64,
}

/// Callback fired each time an animation runs past its last frame.
///
/// Any `FnMut(&Animation<V>)` closure is a listener.
pub trait AnimationListener<V> {
    /// Called before the timeline wraps back to the first frame.
    fn on_complete(&mut self, animation: &Animation<V>);
}

impl<V, F: FnMut(&Animation<V>)> AnimationListener<V> for F {
    fn on_complete(&mut self, animation: &Animation<V>) {
        self(animation);
    }
}

/// A sequence of frames plus playback state.
///
/// The timeline only consumes the deltas handed to [`update`](Self::update);
/// it never reads a clock. Frame end times are cumulative and never decrease,
/// and [`total_duration`](Self::total_duration) is always the end time of the
/// last frame.
///
/// ```
/// use loon_animation::Animation;
///
/// let mut walk = Animation::new();
/// walk.add_frame('a', 100);
/// walk.add_frame('b', 100);
/// walk.update(150);
/// assert_eq!(walk.get_sprite_image(), Some(&'b'));
/// walk.update(100);
/// assert_eq!(walk.get_sprite_image(), Some(&'a'));
/// assert_eq!(walk.loops_played(), 1);
/// ```
pub struct Animation<V> {
    frames: Vec<Frame<V>>,
    current: usize,
    elapsed: u64,
    total_duration: u64,
    running: bool,
    loop_limit: Option<u32>,
    loops_played: u32,
    listener: Option<Box<dyn AnimationListener<V> + Send>>,
}

impl<V> Animation<V> {
    /// Create an empty, running animation with unlimited loops.
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            current: 0,
            elapsed: 0,
            total_duration: 0,
            running: true,
            loop_limit: None,
            loops_played: 0,
            listener: None,
        }
    }

    /// Create an animation from `(visual, duration_ms)` pairs.
    pub fn from_frames(frames: impl IntoIterator<Item = (V, u64)>) -> Self {
        let mut anim = Self::new();
        for (visual, duration) in frames {
            anim.add_frame(visual, duration);
        }
        anim
    }

    /// Create an animation that shows each visual for `duration_ms`.
    ///
    /// With `max_frames` only the first `max_frames` visuals are used.
    pub fn from_visuals(
        visuals: impl IntoIterator<Item = V>,
        max_frames: Option<usize>,
        duration_ms: u64,
    ) -> Self {
        let limit = max_frames.unwrap_or(usize::MAX);
        Self::from_frames(visuals.into_iter().take(limit).map(|v| (v, duration_ms)))
    }

    /// Append a frame displayed for `duration_ms` after the current last frame.
    ///
    /// Allowed at any time, including mid-playback and while stopped.
    pub fn add_frame(&mut self, visual: V, duration_ms: u64) {
        self.total_duration = self.total_duration.saturating_add(duration_ms);
        self.frames.push(Frame {
            visual,
            end_ms: self.total_duration,
        });
    }

    /// Rewind to the first frame without touching loop state.
    pub fn start(&mut self) {
        self.elapsed = 0;
        self.current = 0;
    }

    /// Clear all timing and loop state, lift the loop limit, and resume.
    pub fn reset(&mut self) {
        self.elapsed = 0;
        self.current = 0;
        self.loops_played = 0;
        self.loop_limit = None;
        self.running = true;
    }

    /// Advance the timeline by `delta_ms`.
    ///
    /// Does nothing while stopped, after the loop limit is exhausted, or when
    /// the animation has no duration. When the accumulated time passes the end
    /// of the last frame the listener fires once, the time wraps modulo the
    /// total duration, and the loop counter increments.
    pub fn update(&mut self, delta_ms: u64) {
        if self.is_exhausted() || !self.running || self.frames.is_empty() || self.total_duration == 0
        {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(delta_ms);
        if self.elapsed > self.total_duration {
            if let Some(mut listener) = self.listener.take() {
                listener.on_complete(self);
                self.listener = Some(listener);
            }
            self.elapsed %= self.total_duration;
            self.current = 0;
            self.loops_played = self.loops_played.saturating_add(1);
            debug!(loops_played = self.loops_played, "animation cycle complete");
        }
        let last = self.frames.len() - 1;
        while self.current < last && self.elapsed > self.frames[self.current].end_ms {
            self.current += 1;
        }
    }

    /// Visual of the current frame, or `None` when there are no frames.
    pub fn get_sprite_image(&self) -> Option<&V> {
        self.frames.get(self.current).map(|f| &f.visual)
    }

    /// Visual at `index`, clamped to the first or last frame when out of range.
    pub fn sprite_image_at(&self, index: isize) -> Option<&V> {
        let last = self.frames.len().checked_sub(1)?;
        let i = usize::try_from(index).map_or(0, |i| i.min(last));
        self.frames.get(i).map(|f| &f.visual)
    }

    /// Cap the number of completed cycles; `None` means unlimited.
    ///
    /// Updates stop once more than `limit` cycles have played.
    pub fn set_loop_count(&mut self, limit: Option<u32>) {
        self.loop_limit = limit;
    }

    /// Current loop limit.
    pub fn loop_count(&self) -> Option<u32> {
        self.loop_limit
    }

    /// Completed cycles since the last reset.
    pub fn loops_played(&self) -> u32 {
        self.loops_played
    }

    /// True once the loop limit has been exceeded.
    pub fn is_exhausted(&self) -> bool {
        self.loop_limit.is_some_and(|limit| self.loops_played > limit)
    }

    /// Pause or resume playback. A stopped timeline keeps its frame and time.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Whether [`update`](Self::update) advances the timeline.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Index of the current frame.
    pub fn current_frame_index(&self) -> usize {
        self.current
    }

    /// Jump to a frame, clamped to the last one.
    pub fn set_current_frame_index(&mut self, index: usize) {
        self.current = index.min(self.frames.len().saturating_sub(1));
    }

    /// Time accumulated in the current cycle.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Sum of all frame durations.
    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }

    /// Number of frames.
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    /// All frames in playback order.
    pub fn frames(&self) -> &[Frame<V>] {
        &self.frames
    }

    /// Install the completion callback, replacing any previous one.
    pub fn set_listener(&mut self, listener: impl AnimationListener<V> + Send + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Remove the completion callback.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Drop every frame and the listener, and stop playback.
    pub fn dispose(&mut self) {
        self.frames = Vec::new();
        self.listener = None;
        self.total_duration = 0;
        self.current = 0;
        self.elapsed = 0;
        self.running = false;
    }
}

impl<V> Default for Animation<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies frames and playback state. The listener is not shared.
impl<V: Clone> Clone for Animation<V> {
    fn clone(&self) -> Self {
        Self {
            frames: self.frames.clone(),
            current: self.current,
            elapsed: self.elapsed,
            total_duration: self.total_duration,
            running: self.running,
            loop_limit: self.loop_limit,
            loops_played: self.loops_played,
            listener: None,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Animation<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("frames", &self.frames)
            .field("current", &self.current)
            .field("elapsed", &self.elapsed)
            .field("total_duration", &self.total_duration)
            .field("running", &self.running)
            .field("loop_limit", &self.loop_limit)
            .field("loops_played", &self.loops_played)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn abc() -> Animation<char> {
        Animation::from_frames([('a', 100), ('b', 100), ('c', 100)])
    }

    fn counting(anim: &mut Animation<char>) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        anim.set_listener(move |_: &Animation<char>| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        hits
    }

    #[test]
    fn end_times_are_cumulative() {
        let anim = abc();
        let ends: Vec<u64> = anim.frames().iter().map(|f| f.end_ms).collect();
        assert_eq!(ends, vec![100, 200, 300]);
        assert_eq!(anim.total_duration(), 300);
    }

    #[test]
    fn wraps_once_past_the_end() {
        let mut anim = abc();
        let hits = counting(&mut anim);
        for delta in [120, 120, 110] {
            anim.update(delta);
        }
        assert_eq!(anim.loops_played(), 1);
        assert_eq!(anim.elapsed(), 50);
        assert_eq!(anim.current_frame_index(), 0);
        assert_eq!(anim.get_sprite_image(), Some(&'a'));
        assert_eq!(hits.load(Ordering::SeqCst), 1, "listener fires once per wrap");
    }

    #[test]
    fn frame_boundaries_are_inclusive() {
        let mut anim = abc();
        anim.update(100);
        assert_eq!(anim.current_frame_index(), 0);
        anim.update(1);
        assert_eq!(anim.current_frame_index(), 1);
        anim.update(199);
        assert_eq!(anim.current_frame_index(), 2, "exactly the total does not wrap");
        assert_eq!(anim.loops_played(), 0);
    }

    #[test]
    fn stopped_timeline_is_frozen_but_accepts_frames() {
        let mut anim = abc();
        anim.update(150);
        anim.set_running(false);
        anim.update(1_000);
        assert_eq!(anim.current_frame_index(), 1);
        assert_eq!(anim.elapsed(), 150);
        anim.add_frame('d', 50);
        assert_eq!(anim.total_duration(), 350);
        anim.set_running(true);
        anim.update(160);
        assert_eq!(anim.get_sprite_image(), Some(&'d'));
    }

    #[test]
    fn loop_limit_stops_updates() {
        let mut anim = abc();
        anim.set_loop_count(Some(0));
        anim.update(301);
        assert_eq!(anim.loops_played(), 1);
        assert!(anim.is_exhausted());
        let frozen = anim.elapsed();
        anim.update(50);
        assert_eq!(anim.elapsed(), frozen);

        anim.reset();
        assert_eq!(anim.loop_count(), None);
        assert!(!anim.is_exhausted());
        anim.update(150);
        assert_eq!(anim.current_frame_index(), 1);
    }

    #[test]
    fn zero_duration_is_a_no_op() {
        let mut anim = Animation::from_frames([('x', 0), ('y', 0)]);
        anim.update(10);
        assert_eq!(anim.loops_played(), 0);
        assert_eq!(anim.current_frame_index(), 0);

        let mut empty: Animation<char> = Animation::new();
        empty.update(10);
        assert_eq!(empty.get_sprite_image(), None);
        assert_eq!(empty.sprite_image_at(3), None);
    }

    #[test]
    fn sprite_lookup_clamps() {
        let anim = abc();
        assert_eq!(anim.sprite_image_at(-4), Some(&'a'));
        assert_eq!(anim.sprite_image_at(1), Some(&'b'));
        assert_eq!(anim.sprite_image_at(99), Some(&'c'));
    }

    #[test]
    fn large_delta_wraps_by_modulo() {
        let mut anim = abc();
        anim.update(1_250);
        assert_eq!(anim.loops_played(), 1);
        assert_eq!(anim.elapsed(), 50);
        assert_eq!(anim.current_frame_index(), 0);
    }

    #[test]
    fn from_visuals_respects_max_frames() {
        let anim = Animation::from_visuals(['a', 'b', 'c', 'd'], Some(2), 40);
        assert_eq!(anim.total_frames(), 2);
        assert_eq!(anim.total_duration(), 80);
        let all = Animation::from_visuals(['a', 'b', 'c'], None, 40);
        assert_eq!(all.total_frames(), 3);
    }

    #[test]
    fn clone_drops_listener_and_keeps_state() {
        let mut anim = abc();
        let hits = counting(&mut anim);
        anim.update(250);
        let mut copy = anim.clone();
        assert_eq!(copy.current_frame_index(), 2);
        copy.update(100);
        assert_eq!(copy.loops_played(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dispose_releases_frames() {
        let mut anim = abc();
        anim.dispose();
        assert_eq!(anim.total_frames(), 0);
        assert!(!anim.is_running());
        assert_eq!(anim.get_sprite_image(), None);
    }
}
