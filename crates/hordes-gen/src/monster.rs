//! Monster placement and the four entities behind every monster.
//!
//! A monster waits in its horde's holding pen until the horde's teleport
//! fires, arrives at its destination in the arena, and on death fires a
//! relay that feeds the next link of the chain.

use std::f64::consts::TAU;

use hordes_types::{MonsterFlags, MonsterKind, TriggerFlags};

use crate::arena::Bounds;
use crate::brush::{Brush, material};
use crate::entity::{Entity, Vec3};
use crate::input::HordeInput;

const SPIRAL_RADIUS: f64 = 96.0;
const SPIRAL_RADIUS_STEP: f64 = 64.0;
const SPIRAL_MAX_POINTS_PER_TURN: usize = 8;
const SPIRAL_STEP_DECAY: f64 = 0.1;
const SPIRAL_MIN_STEP: f64 = 0.1;

/// Height of a standing monster's origin above the floor it stands on.
pub const STAND_HEIGHT: f64 = 24.0;

/// Offsets around a horde center along a widening spiral.
///
/// The angle advances by a fixed step; each full turn widens the radius and
/// shrinks the step, never below [`SPIRAL_MIN_STEP`].
#[derive(Debug, Clone)]
pub struct Spiral {
    angle: f64,
    step: f64,
    radius: f64,
}

impl Spiral {
    /// A spiral sized for `count` monsters.
    pub fn new(count: usize) -> Self {
        let per_turn = count.clamp(1, SPIRAL_MAX_POINTS_PER_TURN);
        Self {
            angle: 0.0,
            step: TAU / per_turn as f64,
            radius: SPIRAL_RADIUS,
        }
    }
}

impl Iterator for Spiral {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let offset = (self.radius * self.angle.cos(), self.radius * self.angle.sin());
        self.angle += self.step;
        if self.angle >= TAU - 1e-9 {
            self.angle -= TAU;
            self.radius += SPIRAL_RADIUS_STEP;
            self.step = (self.step - SPIRAL_STEP_DECAY).max(SPIRAL_MIN_STEP);
        }
        Some(offset)
    }
}

/// A monster that survived validation, with its arena position.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub name: String,
    pub kind: MonsterKind,
    pub x: f64,
    pub y: f64,
}

/// Run every declared monster of `horde` through the spiral, dropping the
/// ones with an unknown type or a position too close to the arena edge.
pub fn place(map: &str, horde: &HordeInput, bounds: &Bounds) -> Vec<Placed> {
    let spiral = Spiral::new(horde.monsters.len());
    horde
        .monsters
        .iter()
        .zip(spiral)
        .enumerate()
        .filter_map(|(k, (monster, (dx, dy)))| {
            let stem = if monster.id.is_empty() { "m" } else { monster.id.as_str() };
            let name = format!("{map}_{}_{stem}{k}", horde.name);
            let kind = match monster.kind.parse::<MonsterKind>() {
                Ok(kind) => kind,
                Err(_) => {
                    log::warn!(
                        "map '{map}', horde '{}': dropping monster {name}: unknown type '{}'",
                        horde.name,
                        monster.kind
                    );
                    return None;
                }
            };
            let (x, y) = (horde.x + dx, horde.y + dy);
            if !bounds.contains(x, y) {
                log::warn!(
                    "map '{map}', horde '{}': dropping monster {name}: ({x:.0}, {y:.0}) is outside the arena",
                    horde.name
                );
                return None;
            }
            Some(Placed { name, kind, x, y })
        })
        .collect()
}

/// The entities that make up one monster.
#[derive(Debug, Clone, PartialEq)]
pub struct Monster {
    pub name: String,
    /// Held in the pen, inactive until teleported in.
    pub spawn: Entity,
    /// Volume around the spawn point, enabled by the horde trigger.
    pub teleport: Entity,
    pub destination: Entity,
    /// Relay fired by the monster's death.
    pub kill_trigger: Entity,
}

impl Monster {
    pub fn entities(&self) -> [&Entity; 4] {
        [
            &self.spawn,
            &self.teleport,
            &self.destination,
            &self.kill_trigger,
        ]
    }
}

/// Build the entities for `placed`, whose pen cell has its minimum corner at
/// `cell`.
///
/// `teleport_name` is shared by the whole horde; `facing` is the point the
/// monster looks at after arriving.
pub fn build(
    placed: &Placed,
    cell: Vec3,
    cell_size: f64,
    teleport_name: &str,
    facing: (f64, f64),
    kill_target: Option<&str>,
) -> Monster {
    let name = &placed.name;
    let killed = format!("{name}_killed");
    let destination = format!("{name}_destination");
    let middle = cell_size / 2.0;
    let angle = (facing.1 - placed.y)
        .atan2(facing.0 - placed.x)
        .to_degrees();

    Monster {
        name: name.clone(),
        spawn: Entity::Monster {
            kind: placed.kind,
            origin: [cell[0] + middle, cell[1] + middle, cell[2] + STAND_HEIGHT],
            target: killed.clone(),
            flags: MonsterFlags::AMBUSH,
        },
        teleport: Entity::Teleport {
            targetname: teleport_name.to_string(),
            target: destination.clone(),
            brush: Brush::cuboid(
                material::TRIGGER,
                [cell[0] + 8.0, cell[1] + 8.0, cell[2]],
                [cell_size - 16.0, cell_size - 16.0, 96.0],
            ),
        },
        destination: Entity::TeleportDestination {
            origin: [placed.x, placed.y, STAND_HEIGHT],
            targetname: destination,
            angle,
        },
        kill_trigger: Entity::TriggerOnce {
            targetname: Some(killed),
            target: kill_target.map(str::to_string),
            message: None,
            delay: None,
            flags: TriggerFlags::NOTOUCH,
            brush: Brush::cuboid(
                material::TRIGGER,
                [cell[0] + middle - 8.0, cell[1] + middle - 8.0, cell[2] + cell_size],
                [16.0, 16.0, 16.0],
            ),
        },
    }
}
