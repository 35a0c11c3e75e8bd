use bevy::prelude::*;

use crate::bounds::transformed_aabb;


#[derive(Clone, Debug, PartialEq)]
pub enum ColliderShape {
    Circle { radius: f32 },
    Rectangle { width: f32, height: f32 },
}

/// Collision shape of the spawner's reference area.
/// Only its world-space extent matters here.
#[derive(Component, Clone, Debug)]
pub struct Collider {
    pub shape: ColliderShape,
    pub offset: Vec2, // Offset from entity transform
}

impl Collider {
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self { shape: ColliderShape::Rectangle { width, height }, offset: Vec2::ZERO }
    }

    pub fn circle(radius: f32) -> Self {
        Self { shape: ColliderShape::Circle { radius }, offset: Vec2::ZERO }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn world_bounds(&self, transform: &GlobalTransform) -> Rect {
        match self.shape {
            ColliderShape::Rectangle { width, height } => {
                transformed_aabb(transform, self.offset, Vec2::new(width, height) / 2.)
            }
            ColliderShape::Circle { radius } => {
                let (scale, _, _) = transform.to_scale_rotation_translation();
                let center = transform.transform_point(self.offset.extend(0.)).truncate();
                let radius = radius * scale.x.abs().max(scale.y.abs());
                Rect::from_center_half_size(center, Vec2::splat(radius))
            }
        }
    }
}
