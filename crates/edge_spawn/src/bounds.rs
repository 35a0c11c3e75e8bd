use bevy::prelude::*;

use crate::collider::Collider;


/// Anything that can report a world-space bounding box.
/// Queried again on every spawn, never cached.
pub trait BoundsProvider {
    fn world_bounds(&self) -> Rect;
}

impl BoundsProvider for Rect {
    fn world_bounds(&self) -> Rect {
        *self
    }
}

/// Where a spawner reads its reference rectangle from, decided once at activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum BoundsSource {
    Collider,
    Visual,
    Fallback,
}

impl BoundsSource {
    /// Collider first, then the sprite when allowed, then the unit box.
    pub fn resolve(has_collider: bool, has_visual: bool, allow_visual: bool) -> Self {
        if has_collider {
            BoundsSource::Collider
        } else if has_visual && allow_visual {
            BoundsSource::Visual
        } else {
            BoundsSource::Fallback
        }
    }
}

/// Unit square centred on the spawner, used when nothing better is configured.
#[derive(Clone, Copy, Debug)]
pub struct FallbackBounds {
    pub center: Vec2,
}

impl BoundsProvider for FallbackBounds {
    fn world_bounds(&self) -> Rect {
        Rect::from_center_size(self.center, Vec2::ONE)
    }
}

pub struct ColliderBounds<'a> {
    pub collider: &'a Collider,
    pub transform: &'a GlobalTransform,
}

impl BoundsProvider for ColliderBounds<'_> {
    fn world_bounds(&self) -> Rect {
        self.collider.world_bounds(self.transform)
    }
}

/// Rendered extent of a sprite.
pub struct VisualBounds<'a> {
    pub sprite: &'a Sprite,
    pub transform: &'a GlobalTransform,
    pub images: Option<&'a Assets<Image>>,
}

impl VisualBounds<'_> {
    fn local_size(&self) -> Vec2 {
        if let Some(custom_size) = self.sprite.custom_size {
            return custom_size;
        }
        match self.images.and_then(|images| images.get(&self.sprite.image)) {
            Some(image) => image.size_f32(),
            None => {
                debug!("sprite image not loaded yet, using a unit size for its bounds");
                Vec2::ONE
            }
        }
    }
}

impl BoundsProvider for VisualBounds<'_> {
    fn world_bounds(&self) -> Rect {
        let size = self.local_size();
        let center = -self.sprite.anchor.as_vec() * size;
        transformed_aabb(self.transform, center, size / 2.)
    }
}

/// Provider picked from the components present on a spawner entity.
pub enum SourceBounds<'a> {
    Collider(ColliderBounds<'a>),
    Visual(VisualBounds<'a>),
    Fallback(FallbackBounds),
}

impl<'a> SourceBounds<'a> {
    /// Uses the resolved source when its component is still there, the unit box otherwise.
    pub fn select(
        source: BoundsSource,
        transform: &'a GlobalTransform,
        collider: Option<&'a Collider>,
        sprite: Option<&'a Sprite>,
        images: Option<&'a Assets<Image>>,
    ) -> Self {
        match (source, collider, sprite) {
            (BoundsSource::Collider, Some(collider), _) => {
                SourceBounds::Collider(ColliderBounds { collider, transform })
            }
            (BoundsSource::Visual, _, Some(sprite)) => {
                SourceBounds::Visual(VisualBounds { sprite, transform, images })
            }
            (source, _, _) => {
                if source != BoundsSource::Fallback {
                    debug!("{:?} bounds component is gone, using the fallback box", source);
                }
                SourceBounds::Fallback(FallbackBounds { center: transform.translation().truncate() })
            }
        }
    }
}

impl BoundsProvider for SourceBounds<'_> {
    fn world_bounds(&self) -> Rect {
        match self {
            SourceBounds::Collider(bounds) => bounds.world_bounds(),
            SourceBounds::Visual(bounds) => bounds.world_bounds(),
            SourceBounds::Fallback(bounds) => bounds.world_bounds(),
        }
    }
}

/// Axis-aligned box around a local rectangle after it went through `transform`.
pub fn transformed_aabb(transform: &GlobalTransform, center: Vec2, half_size: Vec2) -> Rect {
    let corners = [
        Vec2::new(-half_size.x, -half_size.y),
        Vec2::new(half_size.x, -half_size.y),
        Vec2::new(half_size.x, half_size.y),
        Vec2::new(-half_size.x, half_size.y),
    ];

    let first = transform.transform_point((center + corners[0]).extend(0.)).truncate();
    corners[1..].iter().fold(Rect::from_corners(first, first), |rect, corner| {
        rect.union_point(transform.transform_point((center + *corner).extend(0.)).truncate())
    })
}
