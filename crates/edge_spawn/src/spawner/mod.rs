pub mod position;

use bevy::prelude::*;
use utils::{math::seconds_until_next, rng::RollbackRng};

use crate::{
    bounds::{BoundsProvider, BoundsSource},
    config::{EdgeSpawnerConfig, SpawnTrigger},
    side::Side,
    template::{ActorInstantiator, ActorTemplate},
};

use self::position::spawn_position_for_index;


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpawnerPhase {
    /// Inserted but not activated yet (waiting for its config asset, or for the first update).
    #[default]
    Pending,
    Active,
    Deactivated,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnerState {
    pub next_sequential_side: usize,
    pub time_since_last_spawn: f32,
    pub bounds_source: Option<BoundsSource>,
    pub phase: SpawnerPhase,
}

/// Spawns actors just outside the edges of a reference rectangle on a fixed cadence.
///
/// Lives on the entity that owns the reference shape. The plugin activates it,
/// ticks it every frame and forwards manual triggers; everything here can also be
/// driven by hand without an `App`.
#[derive(Component, Clone, Debug)]
#[require(Transform)]
pub struct EdgeSpawner {
    pub config: EdgeSpawnerConfig,
    pub template: Option<ActorTemplate>,
    state: SpawnerState,
}

impl Default for EdgeSpawner {
    fn default() -> Self {
        Self::new(EdgeSpawnerConfig::default(), None)
    }
}

impl EdgeSpawner {
    pub fn new(config: EdgeSpawnerConfig, template: Option<ActorTemplate>) -> Self {
        Self { config, template, state: SpawnerState::default() }
    }

    pub fn with_template(config: EdgeSpawnerConfig, template: ActorTemplate) -> Self {
        Self::new(config, Some(template))
    }

    pub fn state(&self) -> &SpawnerState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.phase == SpawnerPhase::Active
    }

    /// Source chosen at activation, or what activation would choose right now. Does not log.
    pub fn current_bounds_source(&self, has_collider: bool, has_visual: bool) -> BoundsSource {
        self.state.bounds_source.unwrap_or_else(|| {
            BoundsSource::resolve(has_collider, has_visual, self.config.allow_visual_bounds_fallback)
        })
    }

    /// Resolves the bounds source, reports misconfiguration and arms the timer.
    pub fn activate(&mut self, has_collider: bool, has_visual: bool) -> BoundsSource {
        if let Err(err) = self.config.validate() {
            error!("edge spawner: {}, continuing with clamped values", err);
            self.config = self.config.sanitized();
        }

        if self.template.is_none() {
            warn!("edge spawner: no actor template assigned, it will never spawn");
        }

        let source = BoundsSource::resolve(has_collider, has_visual, self.config.allow_visual_bounds_fallback);
        if source == BoundsSource::Fallback {
            warn!("edge spawner: no collider or sprite found, using a 1x1 box around the spawner");
        }

        let trigger = self.config.trigger();
        self.state.bounds_source = Some(source);
        // Start short of a full interval so the first spawn comes after the initial delay.
        self.state.time_since_last_spawn = self.config.spawn_interval - trigger.initial_delay();
        self.state.phase = SpawnerPhase::Active;

        debug!("edge spawner activated with {:?} bounds and {:?} trigger", source, trigger);
        source
    }

    /// Stops the timer. Later spawn requests are ignored.
    pub fn deactivate(&mut self) {
        self.state.phase = SpawnerPhase::Deactivated;
    }

    pub fn time_until_next_spawn(&self) -> Option<f32> {
        self.is_active()
            .then(|| seconds_until_next(self.state.time_since_last_spawn, self.config.spawn_interval))
    }

    /// Advances the timer by `delta` seconds and spawns at most once.
    pub fn tick<B, I>(
        &mut self,
        delta: f32,
        bounds: &B,
        instantiator: &mut I,
        rng: &mut RollbackRng,
    ) -> Option<Vec3>
    where
        B: BoundsProvider + ?Sized,
        I: ActorInstantiator + ?Sized,
    {
        if !self.is_active() {
            return None;
        }

        let interval = self.config.spawn_interval;
        self.state.time_since_last_spawn += delta;
        if self.state.time_since_last_spawn < interval {
            return None;
        }

        self.state.time_since_last_spawn = match self.config.trigger() {
            SpawnTrigger::Loop => 0.,
            SpawnTrigger::Repeating => (self.state.time_since_last_spawn - interval) % interval,
        };

        self.spawn_once(bounds, instantiator, rng)
    }

    /// Spawns one actor right now, outside the timer cadence.
    /// Returns the position used, or `None` when nothing was spawned.
    pub fn spawn_once<B, I>(
        &mut self,
        bounds: &B,
        instantiator: &mut I,
        rng: &mut RollbackRng,
    ) -> Option<Vec3>
    where
        B: BoundsProvider + ?Sized,
        I: ActorInstantiator + ?Sized,
    {
        let edge_offset = match self.state.phase {
            SpawnerPhase::Active => self.config.edge_offset,
            // activation has not validated the config yet
            SpawnerPhase::Pending => self.config.sanitized().edge_offset,
            SpawnerPhase::Deactivated => return None,
        };
        let template = self.template.as_ref()?;

        let bounds = bounds.world_bounds();
        let side_index = if self.config.random_side_selection {
            rng.next_index(Side::COUNT)
        } else {
            let side = self.state.next_sequential_side;
            self.state.next_sequential_side = (side + 1) % Side::COUNT;
            side
        };

        let position = spawn_position_for_index(rng, bounds, side_index, edge_offset, template.depth);
        instantiator.instantiate(template, position, Quat::IDENTITY);

        debug!("spawned {} at {} ({:?} edge)", template.name, position, Side::from_index(side_index));
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use crate::{bounds::FallbackBounds, config::{LOOP_INITIAL_DELAY, REPEATING_INITIAL_DELAY}, template::SpawnRequest};

    use super::*;

    fn square() -> Rect {
        Rect::new(-1., -1., 1., 1.)
    }

    fn sequential_spawner() -> EdgeSpawner {
        EdgeSpawner::with_template(
            EdgeSpawnerConfig { random_side_selection: false, ..default() },
            ActorTemplate::new("zombie"),
        )
    }

    fn side_of(position: Vec3) -> Side {
        if position.y == 1.5 {
            Side::Top
        } else if position.x == 1.5 {
            Side::Right
        } else if position.y == -1.5 {
            Side::Bottom
        } else {
            assert_eq!(position.x, -1.5);
            Side::Left
        }
    }

    #[test]
    fn test_sequential_mode_visits_sides_in_order() {
        let mut spawner = sequential_spawner();
        let mut rng = RollbackRng::new(1);
        let mut requests: Vec<SpawnRequest> = Vec::new();

        for _ in 0..8 {
            spawner.spawn_once(&square(), &mut requests, &mut rng);
        }

        let sides: Vec<Side> = requests.iter().map(|r| side_of(r.position)).collect();
        assert_eq!(sides, [
            Side::Top, Side::Right, Side::Bottom, Side::Left,
            Side::Top, Side::Right, Side::Bottom, Side::Left,
        ]);
        assert!(requests.iter().all(|r| r.rotation == Quat::IDENTITY && r.template == "zombie"));
    }

    #[test]
    fn test_random_mode_reaches_every_side_and_keeps_counter() {
        let mut spawner = EdgeSpawner::with_template(EdgeSpawnerConfig::default(), ActorTemplate::new("zombie"));
        let mut rng = RollbackRng::new(99);
        let mut requests: Vec<SpawnRequest> = Vec::new();

        for _ in 0..200 {
            spawner.spawn_once(&square(), &mut requests, &mut rng);
        }

        for side in Side::ALL {
            assert!(requests.iter().any(|r| side_of(r.position) == side), "{:?} never chosen", side);
        }
        assert_eq!(spawner.state().next_sequential_side, 0);
    }

    #[test]
    fn test_missing_template_is_a_silent_noop() {
        let mut spawner = EdgeSpawner::new(EdgeSpawnerConfig { random_side_selection: false, ..default() }, None);
        spawner.activate(true, false);
        let state_before = spawner.state().clone();
        let mut rng = RollbackRng::new(4);
        let mut requests: Vec<SpawnRequest> = Vec::new();

        assert_eq!(spawner.spawn_once(&square(), &mut requests, &mut rng), None);
        assert!(requests.is_empty());
        assert_eq!(spawner.state(), &state_before);
        assert_eq!(rng.seed, 4);
    }

    #[test]
    fn test_fallback_bounds_center_on_spawner() {
        let mut spawner = sequential_spawner();
        assert_eq!(spawner.activate(false, false), BoundsSource::Fallback);

        let mut rng = RollbackRng::new(2);
        let mut requests: Vec<SpawnRequest> = Vec::new();
        let bounds = FallbackBounds { center: Vec2::new(10., 20.) };

        let top = spawner.spawn_once(&bounds, &mut requests, &mut rng).unwrap();
        assert_eq!(top.y, 20.5 + 0.5);
        assert!((9.5..=10.5).contains(&top.x));

        let right = spawner.spawn_once(&bounds, &mut requests, &mut rng).unwrap();
        assert_eq!(right.x, 10.5 + 0.5);
        assert!((19.5..=20.5).contains(&right.y));
    }

    #[test]
    fn test_visual_bounds_only_when_allowed() {
        let mut spawner = sequential_spawner();
        assert_eq!(spawner.activate(false, true), BoundsSource::Visual);

        let mut spawner = EdgeSpawner::with_template(
            EdgeSpawnerConfig { allow_visual_bounds_fallback: false, ..default() },
            ActorTemplate::new("zombie"),
        );
        assert_eq!(spawner.activate(false, true), BoundsSource::Fallback);
        assert_eq!(spawner.state().bounds_source, Some(BoundsSource::Fallback));
    }

    #[test]
    fn test_depth_comes_from_template() {
        let mut spawner = EdgeSpawner::with_template(
            EdgeSpawnerConfig::default(),
            ActorTemplate::new("zombie").with_depth(3.),
        );
        let mut rng = RollbackRng::new(5);
        let mut requests: Vec<SpawnRequest> = Vec::new();
        let bounds = FallbackBounds { center: Vec2::new(0., 0.) };

        for _ in 0..10 {
            assert_eq!(spawner.spawn_once(&bounds, &mut requests, &mut rng).unwrap().z, 3.);
        }
    }

    #[test]
    fn test_loop_trigger_first_spawn_after_initial_delay() {
        let mut spawner = sequential_spawner();
        spawner.activate(true, false);
        let mut rng = RollbackRng::new(1);
        let mut requests: Vec<SpawnRequest> = Vec::new();

        assert_eq!(spawner.tick(LOOP_INITIAL_DELAY * 0.5, &square(), &mut requests, &mut rng), None);
        assert!(spawner.tick(LOOP_INITIAL_DELAY, &square(), &mut requests, &mut rng).is_some());
        assert_eq!(requests.len(), 1);

        // next one a full interval later
        assert_eq!(spawner.tick(1.9, &square(), &mut requests, &mut rng), None);
        assert!(spawner.tick(0.2, &square(), &mut requests, &mut rng).is_some());
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn test_repeating_trigger_first_spawn_after_initial_delay() {
        let mut spawner = EdgeSpawner::with_template(
            EdgeSpawnerConfig { use_timer_loop: false, ..default() },
            ActorTemplate::new("zombie"),
        );
        spawner.activate(true, false);
        let mut rng = RollbackRng::new(1);
        let mut requests: Vec<SpawnRequest> = Vec::new();

        assert_eq!(spawner.tick(REPEATING_INITIAL_DELAY - 0.1, &square(), &mut requests, &mut rng), None);
        assert!(spawner.tick(0.2, &square(), &mut requests, &mut rng).is_some());
        // the surplus 0.1s is kept
        assert!((spawner.state().time_since_last_spawn - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_long_frame_spawns_once_without_catch_up() {
        for use_timer_loop in [true, false] {
            let mut spawner = EdgeSpawner::with_template(
                EdgeSpawnerConfig { use_timer_loop, spawn_interval: 1., ..default() },
                ActorTemplate::new("zombie"),
            );
            spawner.activate(true, false);
            let mut rng = RollbackRng::new(1);
            let mut requests: Vec<SpawnRequest> = Vec::new();

            spawner.tick(10.25, &square(), &mut requests, &mut rng);
            assert_eq!(requests.len(), 1);
            spawner.tick(0.01, &square(), &mut requests, &mut rng);
            assert_eq!(requests.len(), 1, "missed ticks must not be replayed");
        }
    }

    #[test]
    fn test_pending_spawner_does_not_tick() {
        let mut spawner = sequential_spawner();
        let mut rng = RollbackRng::new(1);
        let mut requests: Vec<SpawnRequest> = Vec::new();

        assert_eq!(spawner.tick(100., &square(), &mut requests, &mut rng), None);
        assert!(requests.is_empty());
        assert_eq!(spawner.time_until_next_spawn(), None);
    }

    #[test]
    fn test_deactivate_stops_timer_and_manual_spawns() {
        let mut spawner = sequential_spawner();
        spawner.activate(true, false);
        let mut rng = RollbackRng::new(1);
        let mut requests: Vec<SpawnRequest> = Vec::new();

        spawner.deactivate();
        assert!(!spawner.is_active());
        assert_eq!(spawner.tick(5., &square(), &mut requests, &mut rng), None);
        assert_eq!(spawner.spawn_once(&square(), &mut requests, &mut rng), None);
        assert!(requests.is_empty());
    }

    #[test]
    fn test_invalid_config_is_clamped_on_activation() {
        let mut spawner = EdgeSpawner::with_template(
            EdgeSpawnerConfig { spawn_interval: 0., edge_offset: -2., ..default() },
            ActorTemplate::new("zombie"),
        );
        spawner.activate(true, false);
        assert!(spawner.config.validate().is_ok());
        assert_eq!(spawner.config.edge_offset, 0.);
    }

    #[test]
    fn test_manual_spawn_before_activation_clamps_offset() {
        for edge_offset in [-2., f32::NAN] {
            let mut spawner = EdgeSpawner::with_template(
                EdgeSpawnerConfig { edge_offset, random_side_selection: false, ..default() },
                ActorTemplate::new("zombie"),
            );
            let mut rng = RollbackRng::new(1);
            let mut requests: Vec<SpawnRequest> = Vec::new();

            let top = spawner.spawn_once(&square(), &mut requests, &mut rng).unwrap();
            assert_eq!(top.y, 1.);
            assert!((-1.0..=1.0).contains(&top.x));
            assert_eq!(spawner.state().phase, SpawnerPhase::Pending);
        }
    }

    #[test]
    fn test_time_until_next_spawn_counts_down() {
        let mut spawner = sequential_spawner();
        spawner.activate(true, false);
        let remaining = spawner.time_until_next_spawn().unwrap();
        assert!((remaining - LOOP_INITIAL_DELAY).abs() < 1e-5);
    }
}
