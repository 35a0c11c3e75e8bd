use bevy::prelude::*;


/// Blueprint for the actors a spawner creates.
#[derive(Clone, Debug)]
pub struct ActorTemplate {
    pub name: String,
    /// Authored z. Every spawned actor lands on this plane whatever the spawner's own z.
    pub depth: f32,
    pub sprite: Option<Sprite>,
}

impl ActorTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), depth: 0., sprite: None }
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        self.sprite = Some(sprite);
        self
    }
}

/// Marker on every entity created from an `ActorTemplate`.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct SpawnedActor {
    pub template: String,
}

/// One recorded instantiation.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRequest {
    pub template: String,
    pub position: Vec3,
    pub rotation: Quat,
}

/// Service that turns a template into a live actor. Fire-and-forget.
pub trait ActorInstantiator {
    fn instantiate(&mut self, template: &ActorTemplate, position: Vec3, rotation: Quat);
}

impl ActorInstantiator for Commands<'_, '_> {
    fn instantiate(&mut self, template: &ActorTemplate, position: Vec3, rotation: Quat) {
        let mut entity = self.spawn((
            SpawnedActor { template: template.name.clone() },
            Transform::from_translation(position).with_rotation(rotation),
            Visibility::default(),
        ));

        if let Some(sprite) = &template.sprite {
            entity.insert(sprite.clone());
        }
    }
}

impl ActorInstantiator for Vec<SpawnRequest> {
    fn instantiate(&mut self, template: &ActorTemplate, position: Vec3, rotation: Quat) {
        self.push(SpawnRequest { template: template.name.clone(), position, rotation });
    }
}
