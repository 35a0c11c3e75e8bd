use bevy::prelude::*;
use utils::{math::uniform_inclusive, rng::RollbackRng};

use crate::side::Side;


/// Random point just outside `side` of `bounds`, `offset` units away from the edge.
pub fn edge_spawn_position(
    rng: &mut RollbackRng,
    bounds: Rect,
    side: Side,
    offset: f32,
    depth: f32,
) -> Vec3 {
    let Rect { min, max } = bounds;

    let point = match side {
        Side::Top => Vec2::new(uniform_inclusive(rng, min.x, max.x), max.y + offset),
        Side::Right => Vec2::new(max.x + offset, uniform_inclusive(rng, min.y, max.y)),
        Side::Bottom => Vec2::new(uniform_inclusive(rng, min.x, max.x), min.y - offset),
        Side::Left => Vec2::new(min.x - offset, uniform_inclusive(rng, min.y, max.y)),
    };

    point.extend(depth)
}

/// Same as `edge_spawn_position` for a raw side index.
/// Anything outside 0..4 lands on the centre of the bounds.
pub fn spawn_position_for_index(
    rng: &mut RollbackRng,
    bounds: Rect,
    side_index: usize,
    offset: f32,
    depth: f32,
) -> Vec3 {
    match Side::from_index(side_index) {
        Some(side) => edge_spawn_position(rng, bounds, side, offset, depth),
        None => bounds.center().extend(depth),
    }
}

/// Middle of each edge pushed out by `offset`, in `Side::ALL` order.
pub fn edge_midpoints(bounds: Rect, offset: f32) -> [Vec2; Side::COUNT] {
    let center = bounds.center();
    let half = bounds.half_size();
    Side::ALL.map(|side| {
        let outward = side.outward();
        center + outward * (half + Vec2::splat(offset))
    })
}
