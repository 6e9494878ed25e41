use tether_shared::{EntityId, PrefabKind, Rotation, StatusEffect, Vec3};

/// The engine-side world the authority drives. Implemented by the host game.
pub trait World {
    fn spawn_actor(&mut self, prefab: PrefabKind, position: Vec3, rotation: Rotation) -> EntityId;

    fn destroy_actor(&mut self, entity: EntityId);

    fn contains(&self, entity: EntityId) -> bool;

    fn position(&self, entity: EntityId) -> Option<Vec3>;

    /// Current locomotion speed.
    fn speed(&self, entity: EntityId) -> Option<f32>;

    fn set_speed(&mut self, entity: EntityId, speed: f32);

    /// Whether the entity's locomotion state forbids mounting (casting,
    /// stunned, swimming, ...).
    fn is_busy(&self, entity: EntityId) -> bool;

    fn level(&self, entity: EntityId) -> u32;
}

/// Combat resolution. The authority calls it exactly once per projectile hit.
pub trait Combat {
    fn apply_damage(&mut self, target: EntityId, amount: i32, status_effects: &[StatusEffect]);
}
