//! Turning one evaluated map into geometry and entities.

use hordes_types::ArenaKind;

use crate::arena::{self, Arena, Bounds, MAX_SIDE};
use crate::entity::Entity;
use crate::horde::{self, Activation, Horde};
use crate::input::MapInput;
use crate::monster::{self, Placed};
use crate::{item, player};

/// Conditions that make a whole map ungeneratable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenError {
    #[error("map '{map}': unknown arena type '{kind}' (expected cage or walled)")]
    ArenaKind { map: String, kind: String },

    #[error("map '{map}': arena {width:.0}x{height:.0} is smaller than the minimum {min:.0}x{min:.0}")]
    TooSmall {
        map: String,
        width: f64,
        height: f64,
        min: f64,
    },

    #[error("map '{map}': arena {width:.0}x{height:.0} exceeds the maximum side of {max:.0}")]
    TooLarge {
        map: String,
        width: f64,
        height: f64,
        max: f64,
    },

    #[error("map '{map}': no valid hordes")]
    NoHordes { map: String },

    #[error("map '{map}': horde '{horde}' has no valid monsters")]
    EmptyHorde { map: String, horde: String },
}

/// A fully generated level.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub name: String,
    pub intro_message: String,
    pub difficulty: String,
    pub arena: Arena,
    pub players: Vec<Entity>,
    pub hordes: Vec<Horde>,
    pub items: Vec<Entity>,
}

impl Map {
    /// Every entity in output order, worldspawn excluded.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        let arena = [
            &self.arena.door,
            &self.arena.changelevel,
            &self.arena.exit_counter,
        ];
        self.players
            .iter()
            .chain(arena)
            .chain(self.hordes.iter().flat_map(|h| {
                std::iter::once(&h.trigger)
                    .chain(h.flames.iter())
                    .chain(h.monsters.iter().flat_map(|m| m.entities()))
            }))
            .chain(self.items.iter())
    }
}

/// A horde that passed validation, with its surviving monsters.
struct Survivor<'a> {
    declared: usize,
    input: &'a crate::input::HordeInput,
    monsters: Vec<Placed>,
}

/// Validate `input` and expand it into a [`Map`].
///
/// Bad players, items, monsters and horde positions are dropped with a
/// warning; an unknown arena type, an arena too small for its layout, a horde
/// left without monsters, or a map left without hordes fail the whole map.
pub fn generate(input: &MapInput) -> Result<Map, GenError> {
    let name = input.name.as_str();
    let kind: ArenaKind = input.kind.parse().map_err(|_| GenError::ArenaKind {
        map: name.to_string(),
        kind: input.kind.clone(),
    })?;
    let bounds = Bounds::new(input.width, input.height);
    if !bounds.fits_layout() {
        let map = name.to_string();
        let (width, height) = (input.width, input.height);
        return Err(if width.max(height) > MAX_SIDE {
            GenError::TooLarge {
                map,
                width,
                height,
                max: MAX_SIDE,
            }
        } else {
            GenError::TooSmall {
                map,
                width,
                height,
                min: Bounds::min_side(),
            }
        });
    }

    let players = player::place(name, &input.players, &bounds);
    let items = item::place(name, &input.items, &bounds);

    let mut survivors = Vec::new();
    for (declared, horde) in input.hordes.iter().enumerate() {
        if !horde::validate(name, horde, &bounds) {
            continue;
        }
        let monsters = monster::place(name, horde, &bounds);
        if monsters.is_empty() {
            return Err(GenError::EmptyHorde {
                map: name.to_string(),
                horde: horde.name.clone(),
            });
        }
        survivors.push(Survivor {
            declared,
            input: horde,
            monsters,
        });
    }
    let Some(last) = survivors.len().checked_sub(1) else {
        return Err(GenError::NoHordes {
            map: name.to_string(),
        });
    };

    let exit_name = format!("{name}_exit");
    let mut hordes = Vec::with_capacity(survivors.len());
    for (row, survivor) in survivors.iter().enumerate() {
        let horde = survivor.input;
        let activation = match row.checked_sub(1).map(|i| &survivors[i]) {
            Some(prev) if prev.input.next.is_some() => Activation::Fired {
                count: prev.monsters.len(),
            },
            _ => {
                let (x, y) = horde::fire_position(name, horde, &bounds);
                Activation::Player { x, y }
            }
        };

        let kill_target = if row == last {
            if horde.next.is_some() {
                log::warn!(
                    "map '{name}': '{}' is the last horde, its next horde is ignored",
                    horde.name
                );
            }
            Some(exit_name.clone())
        } else {
            match &horde.next {
                Some(next) => {
                    let following = &survivors[row + 1];
                    if next.index != Some(following.declared) {
                        log::warn!(
                            "map '{name}': horde '{}' names '{}' as next, but '{}' follows it",
                            horde.name,
                            next.name,
                            following.input.name
                        );
                    }
                    Some(horde::fire_name(&following.input.name))
                }
                None => None,
            }
        };
        log::debug!(
            "map '{name}': horde '{}' {:?}, kills fire {:?}",
            horde.name,
            activation,
            kill_target
        );

        hordes.push(horde::build(
            row,
            horde,
            &survivor.monsters,
            activation,
            kill_target.as_deref(),
        ));
    }

    let exit_count = survivors[last].monsters.len();
    let arena = arena::build(name, kind, bounds, &input.next_map, exit_count);
    log::info!(
        "map '{name}': {kind} arena, {} hordes, {} monsters, {} items",
        hordes.len(),
        hordes.iter().map(|h| h.monsters.len()).sum::<usize>(),
        items.len()
    );

    Ok(Map {
        name: name.to_string(),
        intro_message: input.intro_message.clone(),
        difficulty: input.difficulty.clone(),
        arena,
        players,
        hordes,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{HordeInput, MonsterInput, NextHorde};

    fn monsters(kinds: &[&str]) -> Vec<MonsterInput> {
        kinds
            .iter()
            .map(|k| MonsterInput {
                id: String::new(),
                kind: k.to_string(),
            })
            .collect()
    }

    fn horde(name: &str, kinds: &[&str]) -> HordeInput {
        HordeInput {
            name: name.into(),
            x: 640.0,
            y: 640.0,
            delay: 0.0,
            fire: None,
            message: String::new(),
            next: None,
            monsters: monsters(kinds),
        }
    }

    fn map(hordes: Vec<HordeInput>) -> MapInput {
        MapInput {
            name: "m".into(),
            intro_message: String::new(),
            difficulty: String::new(),
            width: 1280.0,
            height: 1280.0,
            kind: "cage".into(),
            next_map: "m".into(),
            players: Vec::new(),
            hordes,
            items: Vec::new(),
        }
    }

    fn link(index: usize, name: &str) -> Option<NextHorde> {
        Some(NextHorde {
            index: Some(index),
            name: name.into(),
        })
    }

    #[test]
    fn fired_count_uses_validated_monsters() {
        let mut first = horde("a", &["ogre", "ogre", "wyvern", "ogre", "ogre"]);
        first.next = link(1, "b");
        let second = horde("b", &["shambler"]);
        let generated = generate(&map(vec![first, second])).expect("generate");

        let [a, b] = &generated.hordes[..] else {
            panic!("expected two hordes");
        };
        assert!(!a.is_fired());
        assert!(b.is_fired());
        assert_eq!(b.trigger.get("count").as_deref(), Some("4"));
        assert!(a
            .monsters
            .iter()
            .all(|m| m.kill_trigger.get("target").as_deref() == Some("b_fire")));
        assert!(b
            .monsters
            .iter()
            .all(|m| m.kill_trigger.get("target").as_deref() == Some("m_exit")));
        assert_eq!(generated.arena.exit_counter.get("count").as_deref(), Some("1"));
    }

    #[test]
    fn hordes_without_next_are_player_triggered() {
        let generated =
            generate(&map(vec![horde("a", &["ogre"]), horde("b", &["dog"])])).expect("generate");
        assert!(generated.hordes.iter().all(|h| !h.is_fired()));
        assert!(generated.hordes[0]
            .monsters
            .iter()
            .all(|m| m.kill_trigger.get("target").is_none()));
    }

    #[test]
    fn dropped_hordes_do_not_break_the_chain() {
        let mut first = horde("a", &["ogre", "ogre"]);
        first.next = link(2, "c");
        let mut lost = horde("b", &["ogre"]);
        lost.x = 10.0;
        let third = horde("c", &["knight"]);
        let generated = generate(&map(vec![first, lost, third])).expect("generate");
        assert_eq!(generated.hordes.len(), 2);
        assert_eq!(generated.hordes[1].name, "c");
        assert_eq!(generated.hordes[1].trigger.get("count").as_deref(), Some("2"));
        // Second generated horde sits in the second pen row.
        let (min, _) = generated.hordes[1].support.bounds();
        assert_eq!(min[1], horde::PEN_ROW);
    }

    #[test]
    fn next_pointing_past_the_following_horde() {
        // a names c, but b follows: b is the one fired, with a's count.
        let mut first = horde("a", &["ogre", "ogre", "ogre"]);
        first.next = link(2, "c");
        let second = horde("b", &["dog"]);
        let third = horde("c", &["knight"]);
        let generated = generate(&map(vec![first, second, third])).expect("generate");

        let [a, b, c] = &generated.hordes[..] else {
            panic!("expected three hordes");
        };
        assert!(a
            .monsters
            .iter()
            .all(|m| m.kill_trigger.get("target").as_deref() == Some("b_fire")));
        assert!(b.is_fired());
        assert_eq!(b.trigger.get("count").as_deref(), Some("3"));
        assert!(!c.is_fired());
    }

    #[test]
    fn next_pointing_outside_the_map() {
        let mut first = horde("a", &["ogre"]);
        first.next = Some(NextHorde {
            index: None,
            name: "elsewhere".into(),
        });
        let generated =
            generate(&map(vec![first, horde("b", &["dog", "dog"])])).expect("generate");
        assert_eq!(generated.hordes[1].trigger.get("targetname").as_deref(), Some("b_fire"));
        assert_eq!(generated.hordes[1].trigger.get("count").as_deref(), Some("1"));
    }

    #[test]
    fn empty_horde_fails_the_map() {
        let err = generate(&map(vec![horde("a", &["ogre"]), horde("b", &["dragon"])]))
            .unwrap_err();
        assert_eq!(
            err,
            GenError::EmptyHorde {
                map: "m".into(),
                horde: "b".into()
            }
        );
    }

    #[test]
    fn no_hordes_fails_the_map() {
        assert_eq!(
            generate(&map(Vec::new())).unwrap_err(),
            GenError::NoHordes { map: "m".into() }
        );
        let mut outside = horde("a", &["ogre"]);
        outside.y = 5000.0;
        assert!(matches!(
            generate(&map(vec![outside])),
            Err(GenError::NoHordes { .. })
        ));
    }

    #[test]
    fn arena_checks() {
        let mut input = map(vec![horde("a", &["ogre"])]);
        input.kind = String::new();
        assert!(matches!(generate(&input), Err(GenError::ArenaKind { .. })));
        input.kind = "Walled".into();
        assert!(matches!(generate(&input), Err(GenError::ArenaKind { .. })));
        input.kind = "walled".into();
        input.width = 128.0;
        let err = generate(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "map 'm': arena 128x1280 is smaller than the minimum 256x256"
        );
        input.width = 100_000_000.0 * 64.0;
        let err = generate(&input).unwrap_err();
        assert!(matches!(err, GenError::TooLarge { max, .. } if max == MAX_SIDE), "{err}");
        input.width = 4096.0;
        assert!(generate(&input).is_ok());
    }

    #[test]
    fn entities_are_listed_once() {
        let generated = generate(&map(vec![horde("a", &["ogre", "dog"])])).expect("generate");
        // start + door + changelevel + counter + trigger + 2 flames + 2 * 4
        assert_eq!(generated.entities().count(), 1 + 3 + 1 + 2 + 8);
    }
}
