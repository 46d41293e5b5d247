use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Creature kinds a horde may field, named after their `monster_*` classes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum MonsterKind {
    Army,
    Dog,
    Ogre,
    Knight,
    HellKnight,
    Wizard,
    #[strum(to_string = "demon1")]
    Demon1,
    Shambler,
    Zombie,
    Shalrath,
    Enforcer,
    Tarbaby,
}

impl MonsterKind {
    /// Entity classname, e.g. `monster_hell_knight`.
    pub fn classname(self) -> String {
        format!("monster_{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn count() {
        assert_eq!(MonsterKind::COUNT, 12);
    }

    #[test]
    fn parse_snake_case() {
        assert_eq!(MonsterKind::from_str("ogre"), Ok(MonsterKind::Ogre));
        assert_eq!(
            MonsterKind::from_str("hell_knight"),
            Ok(MonsterKind::HellKnight)
        );
        assert_eq!(MonsterKind::from_str("demon1"), Ok(MonsterKind::Demon1));
        assert!(MonsterKind::from_str("cyberdemon").is_err());
    }

    #[test]
    fn classnames() {
        assert_eq!(MonsterKind::Army.classname(), "monster_army");
        assert_eq!(MonsterKind::HellKnight.classname(), "monster_hell_knight");
        assert_eq!(MonsterKind::Demon1.classname(), "monster_demon1");
    }

    #[test]
    fn round_trip() {
        for kind in MonsterKind::iter() {
            let name: &'static str = kind.into();
            assert_eq!(MonsterKind::from_str(name), Ok(kind));
        }
    }
}
