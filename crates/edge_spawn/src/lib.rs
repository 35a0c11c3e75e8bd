pub mod plugins;
pub mod spawner;
pub mod bounds;
pub mod collider;
pub mod config;
pub mod side;
pub mod template;
pub mod debug;

pub use plugins::{EdgeSpawnerPlugin, EdgeSpawnerSet, TriggerEdgeSpawn};
pub use spawner::EdgeSpawner;
