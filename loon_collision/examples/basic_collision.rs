// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Loon Collision: register, move, and query.

use loon_collision::{CollisionChecker, CollisionManager, RectBox, TypeTag};

const PLAYER: TypeTag = TypeTag::new("player");
const ROCK: TypeTag = TypeTag::new("rock");

fn main() -> Result<(), loon_collision::CollisionError> {
    let mut grid = CollisionManager::new(32)?;
    grid.add_object(1_u32, RectBox::new(0.0, 0.0, 16, 16), PLAYER);
    grid.add_object(2, RectBox::new(40.0, 0.0, 16, 16), ROCK);
    grid.add_object(3, RectBox::new(200.0, 200.0, 16, 16), ROCK);

    // Walk the player into the first rock.
    let moved = RectBox::new(30.0, 0.0, 16, 16);
    grid.update_object_location(1, moved, 0.0, 0.0);
    println!(
        "player touches: {:?}",
        grid.get_intersecting_objects(1, Some(ROCK))
    );

    // Everything within 100px of the player's center.
    let near = grid.get_objects_in_range(moved.center_x(), moved.center_y(), 100.0, None)?;
    println!("near player: {near:?}");

    println!("neighbours: {:?}", grid.get_neighbours(1, 50.0, false, None)?);
    println!("{grid:?}");
    Ok(())
}
