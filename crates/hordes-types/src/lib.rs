pub mod arena_kind;
pub mod item_kind;
pub mod light_kind;
pub mod monster_kind;
pub mod spawn_flags;

pub use arena_kind::ArenaKind;
pub use item_kind::{
    AmmoKind, ArmorKind, ArtifactKind, ItemSize, ItemType, ItemVariant, WeaponKind,
};
pub use light_kind::LightKind;
pub use monster_kind::MonsterKind;
pub use spawn_flags::{AmmoFlags, CounterFlags, HealthFlags, MonsterFlags, TriggerFlags};

/// A vocabulary word that did not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what} '{word}'")]
pub struct UnknownWord {
    pub what: &'static str,
    pub word: String,
}
