// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Random placement.
//!
//! Ask a layer for free cells around an actor, then spawn actors there.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p loon_demos --example random_placement`

use loon_layer::{Actor, ActorLayer, LayerConfig, LayerError, RectBox, TypeTag};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TREE: TypeTag = TypeTag::new("tree");

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

    let layer = ActorLayer::new(LayerConfig {
        width: 480,
        height: 320,
        ..LayerConfig::default()
    })?;
    let seed = Actor::new(TREE, RectBox::new(0.0, 0.0, 32, 32));
    layer.add_object(&seed);

    match layer.get_random_layer_location_for(&seed, 8)? {
        Some(cells) => {
            for cell in cells {
                let tree = Actor::new(TREE, RectBox::new(cell.x, cell.y, 32, 32));
                layer.add_object(&tree);
                info!(%cell, "planted");
            }
        }
        None => warn!("no room for trees"),
    }
    info!(trees = layer.size(), "forest");

    // A layer narrower than one cell has nowhere to put anything.
    let strip = ActorLayer::new(LayerConfig {
        width: 40,
        height: 320,
        ..LayerConfig::default()
    })?;
    info!(found = ?strip.get_random_layer_location(seed.bounds(), 3)?, "strip");

    match layer.get_random_layer_location(seed.bounds(), 0) {
        Err(err) => info!(%err, "zero count rejected"),
        Ok(_) => unreachable!("zero count is an error"),
    }
    Ok(())
}
