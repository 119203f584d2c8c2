// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer basics.
//!
//! Add a few actors, move one, reorder paint, and run collision queries.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p loon_demos --example layer_basics`

use kurbo::{Point, Size, Vec2};
use loon_layer::{
    Action, ActionKind, ActionRegistry, Actor, ActorLayer, LayerConfig, LayerError, RectBox,
    TypeTag, rect_to_kurbo,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const PLAYER: TypeTag = TypeTag::new("player");
const COIN: TypeTag = TypeTag::new("coin");

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<(), LayerError> {
    init_tracing();

    let actions = Arc::new(ActionRegistry::new());
    let layer = ActorLayer::with_scheduler(
        LayerConfig {
            width: 320,
            height: 240,
            cell_size: 16,
            ..LayerConfig::default()
        },
        actions.clone(),
    )?;

    let player = Actor::new(PLAYER, RectBox::new(0.0, 0.0, 24, 24));
    let coins: Vec<_> = (0..4_i32)
        .map(|i| Actor::new(COIN, RectBox::new(40.0 + f64::from(i) * 30.0, 8.0, 8, 8)))
        .collect();
    layer.add_object(&player);
    for c in &coins {
        layer.add_object(c);
    }

    // Walk right and pick up whatever the player touches.
    for step in 0..6 {
        player.move_by(20.0, 0.0);
        let touched = player.collision_objects(Some(COIN))?;
        for coin in &touched {
            layer.remove_object(coin);
        }
        info!(
            step,
            at = ?player.location(),
            picked = touched.len(),
            left = layer.get_collision_objects(Some(COIN)).len(),
            "walk"
        );
    }

    // Bounded layers clamp positions.
    player.set_location(Point::new(1000.0, -50.0));
    info!(at = ?rect_to_kurbo(&player.bounds()), "clamped");

    // Growing the player extends its reach.
    player.set_size(Size::new(200.0, 200.0));
    let near = player.neighbours(150.0, true, None)?;
    info!(count = near.len(), "neighbours after growing");

    // Paint order and topmost hit.
    player.send_to_back()?;
    let top = layer.get_only_collision_objects_at(Point::new(130.0, 10.0), None);
    info!(top = ?top.map(|a| a.id()), "topmost at (130, 10)");

    layer.call_scale_to(&player, Vec2::new(1.5, 1.5));
    layer.call_fade_out_to(&player, 4);
    info!(
        pending = layer.action_event_count(),
        fade = ?layer.get_action_event(&player, ActionKind::FadeTo),
        "actions"
    );
    if let Some(Action::ScaleTo { scale }) = layer.get_action_event(&player, ActionKind::ScaleTo) {
        info!(?scale, "scale queued");
    }

    layer.reset();
    info!(size = layer.size(), "after reset");
    Ok(())
}
