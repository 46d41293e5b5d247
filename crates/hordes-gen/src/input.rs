//! Snapshot of the evaluated program at the generator boundary.
//!
//! Records are copied out of the interpreter's shared cells into plain
//! structs and every coordinate is converted from meters to engine units
//! here, once. Record references (`next`) become names and indices.

use std::rc::Rc;

use hordes_lang::{Execution, HordeRecord, MapRecord, Record, RecordRef};

use crate::units::meters;

#[derive(Debug, Clone, PartialEq)]
pub struct MapInput {
    pub name: String,
    pub intro_message: String,
    pub difficulty: String,
    pub width: f64,
    pub height: f64,
    pub kind: String,
    /// Name of the level loaded when this one is finished.
    pub next_map: String,
    pub players: Vec<PlayerInput>,
    pub hordes: Vec<HordeInput>,
    pub items: Vec<ItemInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HordeInput {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub delay: f64,
    /// Where the player sets the horde off; `None` when never assigned.
    pub fire: Option<(f64, f64)>,
    pub message: String,
    pub next: Option<NextHorde>,
    pub monsters: Vec<MonsterInput>,
}

/// The horde a horde's `next` field points at.
#[derive(Debug, Clone, PartialEq)]
pub struct NextHorde {
    /// Position among the same map's declared hordes, if it is one of them.
    pub index: Option<usize>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonsterInput {
    pub id: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemInput {
    pub kind: String,
    pub sub_type: String,
    pub size: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInput {
    pub x: f64,
    pub y: f64,
}

/// Copy out every global map, naming unnamed ones `map<n>`.
pub fn snapshot(execution: &Execution) -> Vec<MapInput> {
    let maps: Vec<&RecordRef> = execution.maps().map(|(_, record)| record).collect();
    let names: Vec<String> = maps
        .iter()
        .enumerate()
        .map(|(i, record)| match &*record.borrow() {
            Record::Map(map) if !map.name.is_empty() => map.name.clone(),
            _ => {
                let name = format!("map{}", i + 1);
                log::debug!("unnamed map defaults to '{name}'");
                name
            }
        })
        .collect();

    maps.iter()
        .zip(&names)
        .filter_map(|(record, name)| match &*record.borrow() {
            Record::Map(map) => Some(map_input(map, name, &maps, &names)),
            _ => None,
        })
        .collect()
}

fn map_input(map: &MapRecord, name: &str, maps: &[&RecordRef], names: &[String]) -> MapInput {
    let next_map = match &map.next {
        None => name.to_string(),
        Some(next) => match maps.iter().position(|m| Rc::ptr_eq(m, next)) {
            Some(i) => names[i].clone(),
            None => match &*next.borrow() {
                Record::Map(m) if !m.name.is_empty() => m.name.clone(),
                _ => {
                    log::warn!("map '{name}': next map has no name, the exit reloads '{name}'");
                    name.to_string()
                }
            },
        },
    };

    let declared: Vec<RecordRef> = map.hordes.borrow().items.clone();
    let horde_names = horde_names(name, &declared);
    let hordes = declared
        .iter()
        .enumerate()
        .filter_map(|(i, record)| match &*record.borrow() {
            Record::Horde(horde) => Some(horde_input(horde, i, &declared, &horde_names)),
            _ => None,
        })
        .collect();

    let players = map
        .players
        .borrow()
        .items
        .iter()
        .filter_map(|record| match &*record.borrow() {
            Record::Player(p) => Some(PlayerInput {
                x: meters(p.x),
                y: meters(p.y),
            }),
            _ => None,
        })
        .collect();

    let items = map
        .items
        .borrow()
        .items
        .iter()
        .filter_map(|record| match &*record.borrow() {
            Record::Item(item) => Some(ItemInput {
                kind: item.kind.clone(),
                sub_type: item.sub_type.clone(),
                size: item.size.clone(),
                x: meters(item.x),
                y: meters(item.y),
            }),
            _ => None,
        })
        .collect();

    MapInput {
        name: name.to_string(),
        intro_message: map.intro_message.clone(),
        difficulty: map.difficult.clone(),
        width: meters(map.width),
        height: meters(map.height),
        kind: map.kind.clone(),
        next_map,
        players,
        hordes,
        items,
    }
}

fn horde_name(horde: &HordeRecord, index: usize) -> String {
    if horde.id.is_empty() {
        format!("horde{}", index + 1)
    } else {
        horde.id.clone()
    }
}

/// One name per declared horde, unique within the map. Entity names are
/// derived from horde names, so a repeated one gets its position appended.
fn horde_names(map: &str, declared: &[RecordRef]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(declared.len());
    for (i, record) in declared.iter().enumerate() {
        let base = match &*record.borrow() {
            Record::Horde(horde) => horde_name(horde, i),
            _ => format!("horde{}", i + 1),
        };
        let mut name = base.clone();
        let mut suffix = i + 1;
        while names.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        if name != base {
            log::warn!("map '{map}': horde name '{base}' is used twice, renaming horde {} to '{name}'", i + 1);
        }
        names.push(name);
    }
    names
}

fn horde_input(
    horde: &HordeRecord,
    index: usize,
    declared: &[RecordRef],
    names: &[String],
) -> HordeInput {
    let next = horde.next.as_ref().map(|next| {
        match declared.iter().position(|h| Rc::ptr_eq(h, next)) {
            Some(i) => NextHorde {
                index: Some(i),
                name: names[i].clone(),
            },
            None => NextHorde {
                index: None,
                name: match &*next.borrow() {
                    Record::Horde(h) => h.id.clone(),
                    _ => String::new(),
                },
            },
        }
    });

    let fire = (horde.fire_x != 0 || horde.fire_y != 0)
        .then(|| (meters(horde.fire_x), meters(horde.fire_y)));

    let monsters = horde
        .monsters
        .borrow()
        .items
        .iter()
        .filter_map(|record| match &*record.borrow() {
            Record::Monster(m) => Some(MonsterInput {
                id: m.id.clone(),
                kind: m.kind.clone(),
            }),
            _ => None,
        })
        .collect();

    HordeInput {
        name: names[index].clone(),
        x: meters(horde.x),
        y: meters(horde.y),
        delay: horde.delay,
        fire,
        message: horde.message.clone(),
        next,
        monsters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hordes_lang::execute;

    fn inputs(source: &str) -> Vec<MapInput> {
        snapshot(&execute(source).expect("execute"))
    }

    #[test]
    fn converts_units_and_defaults_names() {
        let maps = inputs(
            "Map a; a.width = 10; a.height = 4;\n\
             Player p; p.x = 1; p.y = 2; a.players.add(p);\n\
             Horde h; h.x = 3; a.hordes.add(h);\n\
             Map b; b.name = \"second\";",
        );
        assert_eq!(maps.len(), 2);
        let a = &maps[0];
        assert_eq!(a.name, "map1");
        assert_eq!((a.width, a.height), (640.0, 256.0));
        assert_eq!(a.players, vec![PlayerInput { x: 64.0, y: 128.0 }]);
        assert_eq!(a.hordes[0].name, "horde1");
        assert_eq!(a.hordes[0].x, 192.0);
        assert_eq!(a.hordes[0].fire, None);
        assert_eq!(a.next_map, "map1");
        assert_eq!(maps[1].name, "second");
    }

    #[test]
    fn resolves_next_links_by_identity() {
        let maps = inputs(
            "Map a; Map b; a.next = b;\n\
             Horde h1; Horde h2; h2.id = \"boss\"; h1.next = h2;\n\
             h1.fireX = 2;\n\
             a.hordes.add(h1, h2);",
        );
        let a = &maps[0];
        assert_eq!(a.next_map, "map2");
        assert_eq!(
            a.hordes[0].next,
            Some(NextHorde {
                index: Some(1),
                name: "boss".into()
            })
        );
        assert_eq!(a.hordes[0].fire, Some((128.0, 0.0)));
        assert_eq!(a.hordes[1].next, None);
    }

    #[test]
    fn next_horde_outside_the_map() {
        let maps = inputs(
            "Map a; Horde h; Horde other; other.id = \"elsewhere\";\n\
             h.next = other; a.hordes.add(h);",
        );
        assert_eq!(
            maps[0].hordes[0].next,
            Some(NextHorde {
                index: None,
                name: "elsewhere".into()
            })
        );
    }

    #[test]
    fn repeated_horde_names_are_made_unique() {
        let maps = inputs(
            "Map a; Horde h1; Horde h2; Horde h3;\n\
             h1.id = \"w\"; h2.id = \"w\"; h3.id = \"horde1\";\n\
             h1.next = h2;\n\
             a.hordes.add(h1, h2, h3, h1);",
        );
        let names: Vec<_> = maps[0].hordes.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["w", "w_2", "horde1", "w_4"]);
        assert_eq!(
            maps[0].hordes[0].next,
            Some(NextHorde {
                index: Some(1),
                name: "w_2".into()
            })
        );
    }
}
