// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation basics.
//!
//! Drive a three-frame walk cycle with a fixed timestep and a loop limit.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p loon_demos --example animation_basics`

use loon_animation::Animation;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    init_tracing();

    let mut walk = Animation::from_frames([("step-left", 120), ("stand", 80), ("step-right", 120)]);
    walk.set_loop_count(Some(2));
    walk.set_listener(|a: &Animation<&'static str>| {
        info!(loops = a.loops_played() + 1, "cycle finished");
    });

    // 60 Hz frames.
    let mut tick = 0;
    while !walk.is_exhausted() {
        walk.update(16);
        tick += 1;
        if tick % 10 == 0 {
            info!(
                tick,
                frame = walk.current_frame_index(),
                sprite = walk.get_sprite_image().copied().unwrap_or("-"),
                "tick"
            );
        }
    }
    info!(ticks = tick, total = walk.total_duration(), "exhausted");

    walk.reset();
    info!(running = walk.is_running(), limit = ?walk.loop_count(), "after reset");
}
