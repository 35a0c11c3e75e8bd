use std::{path::{Path, PathBuf}, time::Duration};

use bevy::{app::ScheduleRunnerPlugin, asset::AssetMetaCheck, log::LogPlugin, prelude::*, scene::ron, window::{PrimaryWindow, WindowResolution}};
use clap::Parser;
use edge_spawn::{
    collider::Collider,
    config::{ConfigError, EdgeSpawnerConfig, EdgeSpawnerConfigHandle},
    debug::EdgeSpawnerDebugPlugin,
    template::{ActorTemplate, SpawnedActor},
    EdgeSpawner, EdgeSpawnerPlugin, EdgeSpawnerSet, TriggerEdgeSpawn,
};
use leafwing_input_manager::{prelude::*, InputManagerBundle};
use thiserror::Error;

const ARENA_CONFIG_PATH: &str = "arena.spawner.ron";
const ARENA_SIZE: Vec2 = Vec2::new(480., 320.);

#[derive(Parser, Debug, Default)]
#[clap(about = "Spawns actors around the edges of an arena on a timer")]
struct Opt {
    /// Seconds between spawns
    #[clap(short, long)]
    interval: Option<f32>,
    /// Distance outside the arena edge
    #[clap(short, long)]
    offset: Option<f32>,
    /// Walk the sides in order instead of picking one at random
    #[clap(long)]
    sequential: bool,
    /// Fixed-rate repeat instead of the spawn loop
    #[clap(long)]
    repeating: bool,
    #[clap(long)]
    seed: Option<u32>,
    /// RON spawner config to start from
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Headless run length
    #[clap(long, default_value_t = 10.0)]
    seconds: f32,
    #[clap(short, long)]
    windowed: bool,
}

#[derive(Debug, Error)]
enum DemoError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Resource, Clone, Debug)]
struct DemoSettings {
    config: EdgeSpawnerConfig,
    load_config_asset: bool,
    run_for: f32,
}

#[derive(Actionlike, PartialEq, Eq, Clone, Copy, Hash, Debug, Reflect)]
enum DemoAction {
    SpawnNow,
}

fn read_config_file(path: &Path) -> Result<EdgeSpawnerConfig, DemoError> {
    let text = std::fs::read_to_string(path)?;
    Ok(ron::from_str(&text)?)
}

fn resolve_config(opt: &Opt) -> Result<EdgeSpawnerConfig, DemoError> {
    let mut config = match &opt.config {
        Some(path) => read_config_file(path)?,
        None => EdgeSpawnerConfig::default(),
    };

    if let Some(interval) = opt.interval {
        config.spawn_interval = interval;
    }
    if let Some(offset) = opt.offset {
        config.edge_offset = offset;
    }
    if opt.sequential {
        config.random_side_selection = false;
    }
    if opt.repeating {
        config.use_timer_loop = false;
    }

    config.validate()?;
    Ok(config)
}

fn spawn_arena(
    mut commands: Commands,
    settings: Res<DemoSettings>,
    asset_server: Option<Res<AssetServer>>,
) {
    let template = ActorTemplate::new("zombie")
        .with_depth(1.)
        .with_sprite(Sprite::from_color(Color::srgb(0.45, 0.75, 0.3), Vec2::splat(16.)));

    let mut arena = commands.spawn((
        Name::new("arena"),
        EdgeSpawner::with_template(settings.config.clone(), template),
        Collider::rectangle(ARENA_SIZE.x, ARENA_SIZE.y),
        Transform::default(),
    ));

    if settings.load_config_asset {
        if let Some(asset_server) = asset_server {
            arena.insert(EdgeSpawnerConfigHandle(asset_server.load(ARENA_CONFIG_PATH)));
        }
    }
}

fn setup_windowed(mut commands: Commands) {
    commands.spawn(Camera2d);
    commands.spawn(InputManagerBundle::<DemoAction> {
        action_state: ActionState::default(),
        input_map: InputMap::new([(DemoAction::SpawnNow, KeyCode::Space)]),
    });
}

fn manual_spawn_input_system(
    actions: Query<&ActionState<DemoAction>>,
    spawners: Query<Entity, With<EdgeSpawner>>,
    mut triggers: EventWriter<TriggerEdgeSpawn>,
) {
    if !actions.iter().any(|action_state| action_state.just_pressed(&DemoAction::SpawnNow)) {
        return;
    }
    for spawner in spawners.iter() {
        triggers.send(TriggerEdgeSpawn { spawner });
    }
}

fn next_spawn_title_system(
    spawners: Query<&EdgeSpawner>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Some(remaining) = spawners.iter().filter_map(EdgeSpawner::time_until_next_spawn).reduce(f32::min) else {
        return;
    };
    let Ok(mut window) = windows.get_single_mut() else {
        return;
    };

    let title = format!("edge_spawner - next spawn in {:.1}s", remaining);
    if window.title != title {
        window.title = title;
    }
}

fn log_spawned_actors_system(actors: Query<(Entity, &SpawnedActor, &Transform), Added<SpawnedActor>>) {
    for (entity, actor, transform) in actors.iter() {
        info!("{} {} spawned at {}", actor.template, entity, transform.translation);
    }
}

fn stop_after_system(
    time: Res<Time>,
    settings: Res<DemoSettings>,
    actors: Query<(), With<SpawnedActor>>,
    mut exit: EventWriter<AppExit>,
) {
    if time.elapsed_secs() >= settings.run_for {
        info!("{} actors spawned in {:.1}s", actors.iter().count(), time.elapsed_secs());
        exit.send(AppExit::Success);
    }
}

fn main() {
    let opt = Opt::parse();

    let config = match resolve_config(&opt) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("edge_spawner: {}", err);
            std::process::exit(2);
        }
    };

    let settings = DemoSettings {
        config,
        load_config_asset: opt.windowed && opt.config.is_none(),
        run_for: opt.seconds,
    };

    let mut app = App::new();

    if opt.windowed {
        let window_plugin = WindowPlugin {
            primary_window: Some(Window {
                title: "edge_spawner".to_string(),
                resolution: WindowResolution::new(800., 600.),
                resizable: true,
                ..Default::default()
            }),
            ..Default::default()
        };

        app.add_plugins(
            DefaultPlugins
                .set(ImagePlugin::default_nearest())
                .set(AssetPlugin {
                    meta_check: AssetMetaCheck::Never,
                    ..Default::default()
                })
                .set(window_plugin),
        )
        .add_plugins(InputManagerPlugin::<DemoAction>::default())
        .add_plugins(EdgeSpawnerDebugPlugin)
        .add_systems(Startup, setup_windowed)
        .add_systems(Update, manual_spawn_input_system.before(EdgeSpawnerSet))
        .add_systems(Update, next_spawn_title_system.after(EdgeSpawnerSet));
    } else {
        app.add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
            LogPlugin::default(),
            bevy::transform::TransformPlugin,
        ))
        .add_systems(Update, stop_after_system);
    }

    app.insert_resource(settings)
        .add_plugins(EdgeSpawnerPlugin { seed: opt.seed })
        .add_systems(Startup, spawn_arena)
        .add_systems(Update, log_spawned_actors_system.after(EdgeSpawnerSet))
        .run();
}
