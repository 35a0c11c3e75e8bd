use bevy::{asset::LoadState, ecs::query::Has, prelude::*};
use bevy_common_assets::ron::RonAssetPlugin;
use utils::rng::RollbackRng;

use crate::{
    bounds::SourceBounds,
    collider::Collider,
    config::{EdgeSpawnerConfig, EdgeSpawnerConfigHandle},
    spawner::{EdgeSpawner, SpawnerPhase},
};


/// Asks one spawner to spawn immediately, outside its timer.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEdgeSpawn {
    pub spawner: Entity,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeSpawnerSet;

type SpawnerQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut EdgeSpawner,
        &'static GlobalTransform,
        Option<&'static Collider>,
        Option<&'static Sprite>,
    ),
>;

#[derive(Default)]
pub struct EdgeSpawnerPlugin {
    /// Fixed seed for reproducible spawn sequences; random when `None`.
    pub seed: Option<u32>,
}

impl Plugin for EdgeSpawnerPlugin {
    fn build(&self, app: &mut App) {
        // config assets need the asset server; headless tests run without one
        if app.is_plugin_added::<AssetPlugin>() {
            app.add_plugins(RonAssetPlugin::<EdgeSpawnerConfig>::new(&["spawner.ron"]));
        }

        let seed = self.seed.unwrap_or_else(rand::random);
        info!("edge spawner rng seeded with {}", seed);

        app.insert_resource(RollbackRng::new(seed));
        app.add_event::<TriggerEdgeSpawn>();

        app.add_systems(
            Update,
            (
                activate_edge_spawners_system,
                edge_spawner_tick_system,
                edge_spawner_trigger_system,
            )
                .chain()
                .in_set(EdgeSpawnerSet),
        );
    }
}

pub fn activate_edge_spawners_system(
    asset_server: Option<Res<AssetServer>>,
    config_assets: Option<Res<Assets<EdgeSpawnerConfig>>>,
    mut spawners: Query<(
        Entity,
        &mut EdgeSpawner,
        Option<&EdgeSpawnerConfigHandle>,
        Has<Collider>,
        Has<Sprite>,
    )>,
) {
    for (entity, mut spawner, config_handle, has_collider, has_sprite) in spawners.iter_mut() {
        if spawner.state().phase != SpawnerPhase::Pending {
            continue;
        }

        if let Some(handle) = config_handle {
            match config_assets.as_ref() {
                Some(assets) => {
                    if let Some(config) = assets.get(&handle.0) {
                        spawner.config = config.clone();
                    } else {
                        let load_state = asset_server.as_ref().map(|server| server.load_state(&handle.0));
                        let Some(LoadState::Failed(err)) = load_state else {
                            // still loading
                            continue;
                        };
                        warn!("edge spawner {} config failed to load ({}), using its own settings", entity, err);
                    }
                }
                None => warn!(
                    "edge spawner {} has a config handle but no config assets are registered (add AssetPlugin before EdgeSpawnerPlugin), using its own settings",
                    entity
                ),
            }
        }

        let source = spawner.activate(has_collider, has_sprite);
        info!("edge spawner {} active, bounds from {:?}", entity, source);
    }
}

pub fn edge_spawner_tick_system(
    mut commands: Commands,
    time: Res<Time>,
    mut rng: ResMut<RollbackRng>,
    images: Option<Res<Assets<Image>>>,
    mut spawners: SpawnerQuery,
) {
    let delta = time.delta_secs();

    for (mut spawner, transform, collider, sprite) in spawners.iter_mut() {
        if !spawner.is_active() {
            continue;
        }

        let source = spawner.current_bounds_source(collider.is_some(), sprite.is_some());
        let bounds = SourceBounds::select(source, transform, collider, sprite, images.as_deref());
        spawner.tick(delta, &bounds, &mut commands, &mut rng);
    }
}

pub fn edge_spawner_trigger_system(
    mut commands: Commands,
    mut events: EventReader<TriggerEdgeSpawn>,
    mut rng: ResMut<RollbackRng>,
    images: Option<Res<Assets<Image>>>,
    mut spawners: SpawnerQuery,
) {
    for event in events.read() {
        let Ok((mut spawner, transform, collider, sprite)) = spawners.get_mut(event.spawner) else {
            warn!("spawn requested on {} which has no edge spawner", event.spawner);
            continue;
        };

        let source = spawner.current_bounds_source(collider.is_some(), sprite.is_some());
        let bounds = SourceBounds::select(source, transform, collider, sprite, images.as_deref());
        spawner.spawn_once(&bounds, &mut commands, &mut rng);
    }
}
