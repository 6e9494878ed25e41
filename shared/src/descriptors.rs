//! Static game data handed to the authority by the item and skill systems.

use std::time::Duration;

/// Which prefab the world collaborator should instantiate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrefabKind(pub u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusEffectKind {
    Stun,
    Slow,
    Bleed,
}

/// A status effect riding along with a damage payload.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    pub duration: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DamagePayload {
    pub amount: i32,
    pub status_effects: Vec<StatusEffect>,
}

impl DamagePayload {
    pub fn new(amount: i32) -> Self {
        Self {
            amount,
            status_effects: Vec::new(),
        }
    }

    pub fn with_status_effect(mut self, kind: StatusEffectKind, duration: Duration) -> Self {
        self.status_effects.push(StatusEffect { kind, duration });
        self
    }
}

/// Describes the mount granted by consuming a mount item.
#[derive(Clone, Debug, PartialEq)]
pub struct MountDescriptor {
    pub prefab: PrefabKind,
    /// Applied to the owner's locomotion speed while mounted.
    pub speed_multiplier: f32,
    /// Length of the mount's death animation; the mount actor lingers this long.
    pub death_animation: Duration,
    pub required_level: u32,
}

impl MountDescriptor {
    pub fn new(prefab: PrefabKind, speed_multiplier: f32) -> Self {
        Self {
            prefab,
            speed_multiplier,
            death_animation: Duration::from_secs(2),
            required_level: 0,
        }
    }

    pub fn with_death_animation(mut self, death_animation: Duration) -> Self {
        self.death_animation = death_animation;
        self
    }

    pub fn with_required_level(mut self, required_level: u32) -> Self {
        self.required_level = required_level;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SkillKind {
    /// Spawns an effect that flies to the target and damages it on arrival.
    Projectile {
        prefab: PrefabKind,
        speed: f32,
        damage: DamagePayload,
    },
    /// Grants (or refreshes) a named buff on the target.
    Buff { name: String, duration: Duration },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkillDescriptor {
    pub name: String,
    pub kind: SkillKind,
}

impl SkillDescriptor {
    pub fn projectile(name: &str, prefab: PrefabKind, speed: f32, damage: DamagePayload) -> Self {
        Self {
            name: name.to_string(),
            kind: SkillKind::Projectile {
                prefab,
                speed,
                damage,
            },
        }
    }

    pub fn buff(name: &str, buff: &str, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            kind: SkillKind::Buff {
                name: buff.to_string(),
                duration,
            },
        }
    }
}
