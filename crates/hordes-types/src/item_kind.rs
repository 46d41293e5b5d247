use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, EnumString};

use crate::UnknownWord;

/// Item categories accepted by an item's `type` field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, EnumCount,
)]
#[strum(serialize_all = "lowercase")]
pub enum ItemType {
    Health,
    Armor,
    Ammo,
    Artifact,
    Weapon,
}

/// Item sizes accepted by an item's `size` field.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
)]
#[strum(serialize_all = "lowercase")]
pub enum ItemSize {
    Small,
    #[default]
    Medium,
    Big,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, EnumCount,
)]
#[strum(serialize_all = "lowercase")]
pub enum ArmorKind {
    Green,
    Yellow,
    Red,
}

impl ArmorKind {
    pub const fn classname(self) -> &'static str {
        match self {
            Self::Green => "item_armor1",
            Self::Yellow => "item_armor2",
            Self::Red => "item_armorInv",
        }
    }

    /// Armor picked when no sub-type is given.
    pub const fn for_size(size: ItemSize) -> Self {
        match size {
            ItemSize::Small => Self::Green,
            ItemSize::Medium => Self::Yellow,
            ItemSize::Big => Self::Red,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, EnumCount,
)]
#[strum(serialize_all = "lowercase")]
pub enum AmmoKind {
    Shells,
    Spikes,
    Rockets,
    Cells,
}

impl AmmoKind {
    pub fn classname(self) -> String {
        format!("item_{self}")
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, EnumCount,
)]
#[strum(serialize_all = "snake_case")]
pub enum ArtifactKind {
    Invulnerability,
    Envirosuit,
    Invisibility,
    SuperDamage,
}

impl ArtifactKind {
    pub fn classname(self) -> String {
        format!("item_artifact_{self}")
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, EnumCount,
)]
#[strum(serialize_all = "lowercase")]
pub enum WeaponKind {
    Supershotgun,
    Nailgun,
    Supernailgun,
    Grenadelauncher,
    Rocketlauncher,
    Lightning,
}

impl WeaponKind {
    pub fn classname(self) -> String {
        format!("weapon_{self}")
    }
}

/// A fully resolved pickup: exactly one concrete variant per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemVariant {
    Health(ItemSize),
    Armor(ArmorKind),
    Ammo { kind: AmmoKind, big: bool },
    Artifact(ArtifactKind),
    Weapon(WeaponKind),
}

impl Default for ItemVariant {
    fn default() -> Self {
        Self::Health(ItemSize::Medium)
    }
}

impl ItemVariant {
    /// Resolve the three item words of a source record.
    ///
    /// An empty `type` yields a medium health pack; an empty `size` means
    /// medium. Sub-types are mandatory for ammo, artifacts and weapons, and
    /// health packs take none.
    pub fn resolve(item_type: &str, sub_type: &str, size: &str) -> Result<Self, UnknownWord> {
        let size = if size.is_empty() {
            ItemSize::default()
        } else {
            size.parse().map_err(|_| unknown("item size", size))?
        };
        if item_type.is_empty() {
            if !sub_type.is_empty() {
                return Err(unknown("health sub-type", sub_type));
            }
            return Ok(Self::default());
        }
        let item_type: ItemType = item_type
            .parse()
            .map_err(|_| unknown("item type", item_type))?;
        let variant = match item_type {
            ItemType::Health if !sub_type.is_empty() => {
                return Err(unknown("health sub-type", sub_type));
            }
            ItemType::Health => Self::Health(size),
            ItemType::Armor if sub_type.is_empty() => Self::Armor(ArmorKind::for_size(size)),
            ItemType::Armor => Self::Armor(
                sub_type
                    .parse()
                    .map_err(|_| unknown("armor sub-type", sub_type))?,
            ),
            ItemType::Ammo => Self::Ammo {
                kind: sub_type
                    .parse()
                    .map_err(|_| unknown("ammo sub-type", sub_type))?,
                big: size == ItemSize::Big,
            },
            ItemType::Artifact => Self::Artifact(
                sub_type
                    .parse()
                    .map_err(|_| unknown("artifact sub-type", sub_type))?,
            ),
            ItemType::Weapon => Self::Weapon(
                sub_type
                    .parse()
                    .map_err(|_| unknown("weapon sub-type", sub_type))?,
            ),
        };
        Ok(variant)
    }

    pub fn classname(self) -> String {
        match self {
            Self::Health(_) => "item_health".to_string(),
            Self::Armor(kind) => kind.classname().to_string(),
            Self::Ammo { kind, .. } => kind.classname(),
            Self::Artifact(kind) => kind.classname(),
            Self::Weapon(kind) => kind.classname(),
        }
    }
}

fn unknown(what: &'static str, word: &str) -> UnknownWord {
    UnknownWord {
        what,
        word: word.to_string(),
    }
}
