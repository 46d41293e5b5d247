//! Quake `.map` text output.

use std::fmt::{self, Display, Formatter};

use crate::entity::Entity;
use crate::map::Map;

/// `.map` values cannot carry double quotes.
fn quoted(value: &str) -> String {
    value.replace('"', "'")
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        for (key, value) in self.keys() {
            writeln!(f, "\"{key}\" \"{}\"", quoted(&value))?;
        }
        if let Some(brush) = self.brush() {
            writeln!(f, "{brush}")?;
        }
        writeln!(f, "}}")
    }
}

impl Display for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "// Map {}", self.name)?;
        writeln!(f, "{{")?;
        writeln!(f, "\"classname\" \"worldspawn\"")?;
        if !self.intro_message.is_empty() {
            writeln!(f, "\"message\" \"{}\"", quoted(&self.intro_message))?;
        }
        if !self.difficulty.is_empty() {
            writeln!(f, "\"_difficulty\" \"{}\"", quoted(&self.difficulty))?;
        }
        for brush in &self.arena.brushes {
            writeln!(f, "{brush}")?;
        }
        for horde in &self.hordes {
            writeln!(f, "// {} support brush", horde.name)?;
            writeln!(f, "{}", horde.support)?;
        }
        writeln!(f, "}}")?;

        for player in &self.players {
            write!(f, "{player}")?;
        }
        writeln!(f, "// exit")?;
        write!(f, "{}", self.arena.door)?;
        write!(f, "{}", self.arena.changelevel)?;
        write!(f, "{}", self.arena.exit_counter)?;
        for horde in &self.hordes {
            writeln!(f, "// Horde {}", horde.name)?;
            write!(f, "{}", horde.trigger)?;
            for flame in &horde.flames {
                write!(f, "{flame}")?;
            }
            for monster in &horde.monsters {
                writeln!(f, "// Monster {}", monster.name)?;
                for entity in monster.entities() {
                    write!(f, "{entity}")?;
                }
            }
        }
        for item in &self.items {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Number of entity blocks in rendered map text, worldspawn included.
pub fn count_entities(text: &str) -> usize {
    text.lines()
        .filter(|line| line.starts_with("\"classname\""))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::{Brush, material};
    use crate::input::{HordeInput, MapInput, MonsterInput};
    use crate::map::generate;
    use hordes_types::{MonsterFlags, MonsterKind, TriggerFlags};

    /// Rendered values of every `key` line whose entity has `classname`.
    fn values_of<'a>(text: &'a str, classname: &str, key: &str) -> Vec<&'a str> {
        let mut found = Vec::new();
        let mut current = None;
        for line in text.lines() {
            let Some((k, v)) = parse_key(line) else {
                continue;
            };
            if k == "classname" {
                current = Some(v);
            }
            if k == key && current == Some(classname) {
                found.push(v);
            }
        }
        found
    }

    fn parse_key(line: &str) -> Option<(&str, &str)> {
        let rest = line.strip_prefix('"')?;
        let (key, rest) = rest.split_once("\" \"")?;
        Some((key, rest.strip_suffix('"')?))
    }

    #[test]
    fn point_entity() {
        let entity = Entity::Monster {
            kind: MonsterKind::Ogre,
            origin: [64.0, 128.5, 24.0],
            target: "m_a_m0_destination".into(),
            flags: MonsterFlags::AMBUSH,
        };
        let text = entity.to_string();
        assert!(text.starts_with("{\n\"classname\" \"monster_ogre\"\n"));
        assert!(text.contains("\"target\" \"m_a_m0_destination\"\n"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn brush_entity_embeds_its_brush() {
        let entity = Entity::Door {
            targetname: "m_exit_door".into(),
            brush: Brush::cuboid(material::DOOR, [0.0; 3], [128.0, 8.0, 192.0]),
        };
        let text = entity.to_string();
        assert_eq!(text.matches("door02_1").count(), 6);
        assert!(text.contains("\"wait\" \"-1\"\n{\n"));
    }

    #[test]
    fn quotes_are_replaced() {
        let entity = Entity::TriggerOnce {
            targetname: None,
            target: None,
            message: Some("say \"hi\"".into()),
            delay: None,
            flags: TriggerFlags::empty(),
            brush: Brush::unit(material::TRIGGER),
        };
        assert!(entity.to_string().contains("\"message\" \"say 'hi'\"\n"));
    }

    #[test]
    fn whole_map() {
        let input = MapInput {
            name: "first".into(),
            intro_message: "Welcome".into(),
            difficulty: String::new(),
            width: 640.0,
            height: 640.0,
            kind: "walled".into(),
            next_map: "second".into(),
            players: Vec::new(),
            hordes: vec![HordeInput {
                name: "a".into(),
                x: 320.0,
                y: 320.0,
                delay: 0.0,
                fire: None,
                message: String::new(),
                next: None,
                monsters: vec![MonsterInput {
                    id: String::new(),
                    kind: "zombie".into(),
                }],
            }],
            items: Vec::new(),
        };
        let map = generate(&input).expect("generate");
        let text = map.to_string();

        assert!(text.starts_with("// Map first\n{\n\"classname\" \"worldspawn\"\n\"message\" \"Welcome\"\n"));
        assert!(!text.contains("_difficulty"));
        assert_eq!(count_entities(&text), 1 + map.entities().count());
        assert_eq!(values_of(&text, "trigger_changelevel", "map"), ["second"]);
        assert_eq!(values_of(&text, "monster_zombie", "target"), ["first_a_m0_killed"]);
        assert_eq!(text.matches('{').count(), text.matches('}').count());
    }
}
