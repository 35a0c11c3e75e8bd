use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Shortest interval accepted; anything lower is clamped here.
pub const MIN_SPAWN_INTERVAL: f32 = 0.05;

/// Delay before the first spawn of the loop strategy.
pub const LOOP_INITIAL_DELAY: f32 = 0.1;
/// Delay before the first spawn of the repeating strategy.
pub const REPEATING_INITIAL_DELAY: f32 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("spawn interval must be a finite number of seconds above zero, got {0}")]
    InvalidInterval(f32),
    #[error("edge offset must be a finite distance of at least zero, got {0}")]
    InvalidOffset(f32),
}

/// How the periodic trigger behaves between spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnTrigger {
    /// Wait, spawn, wait again from the moment of the spawn.
    Loop,
    /// Fixed-rate repeat; surplus time beyond one interval is dropped.
    Repeating,
}

impl SpawnTrigger {
    pub fn initial_delay(self) -> f32 {
        match self {
            SpawnTrigger::Loop => LOOP_INITIAL_DELAY,
            SpawnTrigger::Repeating => REPEATING_INITIAL_DELAY,
        }
    }
}

// Loaded from `*.spawner.ron` files or built in code.
#[derive(Asset, TypePath, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EdgeSpawnerConfig {
    pub spawn_interval: f32,        // Seconds between spawns
    pub edge_offset: f32,           // Distance outside the edge
    pub use_timer_loop: bool,       // Loop strategy when true, repeating otherwise
    pub random_side_selection: bool, // Iterate sides in order when false
    pub allow_visual_bounds_fallback: bool,
}

impl Default for EdgeSpawnerConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 2.0,
            edge_offset: 0.5,
            use_timer_loop: true,
            random_side_selection: true,
            allow_visual_bounds_fallback: true,
        }
    }
}

impl EdgeSpawnerConfig {
    pub fn trigger(&self) -> SpawnTrigger {
        if self.use_timer_loop {
            SpawnTrigger::Loop
        } else {
            SpawnTrigger::Repeating
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.spawn_interval.is_finite() || self.spawn_interval <= 0. {
            return Err(ConfigError::InvalidInterval(self.spawn_interval));
        }
        if !self.edge_offset.is_finite() || self.edge_offset < 0. {
            return Err(ConfigError::InvalidOffset(self.edge_offset));
        }
        Ok(())
    }

    /// Copy with the interval and offset pulled back into their valid ranges.
    pub fn sanitized(&self) -> Self {
        let spawn_interval = if self.spawn_interval.is_finite() {
            self.spawn_interval.max(MIN_SPAWN_INTERVAL)
        } else {
            Self::default().spawn_interval
        };
        let edge_offset = if self.edge_offset.is_finite() { self.edge_offset.max(0.) } else { 0. };

        Self { spawn_interval, edge_offset, ..self.clone() }
    }
}

/// Spawner whose settings come from a config asset.
/// It stays inactive until the asset has loaded.
#[derive(Component, Clone, Debug)]
pub struct EdgeSpawnerConfigHandle(pub Handle<EdgeSpawnerConfig>);
