use bevy::prelude::*;

use crate::{
    bounds::{BoundsProvider, SourceBounds},
    collider::Collider,
    side::Side,
    spawner::{position::edge_midpoints, EdgeSpawner},
};


#[derive(Resource)]
struct DebugOverlayState {
    is_visible: bool,
}

impl Default for DebugOverlayState {
    fn default() -> Self {
        Self { is_visible: true }
    }
}

/// What the overlay draws for one spawner: its bounds and one sample spawn point per side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeMarkers {
    pub bounds: Rect,
    pub points: [Vec2; Side::COUNT],
}

impl EdgeMarkers {
    pub fn for_spawner<B: BoundsProvider + ?Sized>(spawner: &EdgeSpawner, bounds: &B) -> Self {
        let bounds = bounds.world_bounds();
        Self { bounds, points: edge_midpoints(bounds, spawner.config.edge_offset) }
    }
}

fn toggle_edge_spawner_overlay_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<DebugOverlayState>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyG) {
        state.is_visible = !state.is_visible;
    }
}

pub fn draw_edge_spawner_gizmos_system(
    mut gizmos: Gizmos,
    images: Option<Res<Assets<Image>>>,
    spawners: Query<(&EdgeSpawner, &GlobalTransform, Option<&Collider>, Option<&Sprite>)>,
) {
    let bounds_color = Color::srgb(1.0, 0.92, 0.0);
    let point_color = Color::srgb(0.0, 1.0, 1.0);

    for (spawner, transform, collider, sprite) in spawners.iter() {
        let source = spawner.current_bounds_source(collider.is_some(), sprite.is_some());
        let bounds = SourceBounds::select(source, transform, collider, sprite, images.as_deref());
        let markers = EdgeMarkers::for_spawner(spawner, &bounds);

        gizmos.rect_2d(markers.bounds.center(), markers.bounds.size(), bounds_color);

        let radius = (markers.bounds.size().max_element() * 0.02).max(0.08);
        for point in markers.points {
            gizmos.circle_2d(point, radius, point_color);
        }
    }
}

/// Gizmo overlay for spawners, toggled with G.
pub struct EdgeSpawnerDebugPlugin;

impl Plugin for EdgeSpawnerDebugPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<bevy::gizmos::GizmoPlugin>() {
            app.add_plugins(bevy::gizmos::GizmoPlugin);
        }

        app
            .init_resource::<DebugOverlayState>()
            .add_systems(Update,
                (
                    toggle_edge_spawner_overlay_system,
                    draw_edge_spawner_gizmos_system
                        .run_if(|state: Res<DebugOverlayState>| state.is_visible),
                )
            );
    }
}
