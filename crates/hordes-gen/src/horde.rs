//! Hordes: holding pens, activation triggers and their monsters.

use hordes_types::{CounterFlags, LightKind, TriggerFlags};

use crate::arena::Bounds;
use crate::brush::{Brush, material};
use crate::entity::Entity;
use crate::input::HordeInput;
use crate::monster::{self, Monster, Placed, STAND_HEIGHT};

/// Floor height of the holding pens, well below the arena.
pub const PEN_Z: f64 = -1024.0;
/// Distance between the pens of consecutive hordes.
pub const PEN_ROW: f64 = 256.0;
/// Side of one monster's cell in a pen.
pub const PEN_CELL: f64 = 128.0;

const FIRE_TRIGGER_SIZE: f64 = 64.0;
const FLAME_OFFSET: f64 = 48.0;

/// How a horde is set off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    /// The player walks over a trigger at the fire position.
    Player { x: f64, y: f64 },
    /// The kill relays of the preceding horde count down to zero.
    Fired { count: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Horde {
    pub name: String,
    /// Floor of the holding pen.
    pub support: Brush,
    pub trigger: Entity,
    pub flames: Vec<Entity>,
    pub monsters: Vec<Monster>,
}

impl Horde {
    pub fn is_fired(&self) -> bool {
        matches!(self.trigger, Entity::TriggerCounter { .. })
    }
}

fn teleport_name(horde: &str) -> String {
    format!("{horde}_teleport")
}

/// Name of the counter that sets off a fired horde.
pub fn fire_name(horde: &str) -> String {
    format!("{horde}_fire")
}

/// True when the horde center is usable; warns otherwise.
pub fn validate(map: &str, horde: &HordeInput, bounds: &Bounds) -> bool {
    if bounds.contains(horde.x, horde.y) {
        return true;
    }
    log::warn!(
        "map '{map}': dropping horde '{}': center ({:.0}, {:.0}) is outside the arena",
        horde.name,
        horde.x,
        horde.y
    );
    false
}

/// Where a player-triggered horde is set off: its fire position when that
/// was given and lies inside the arena, its center otherwise.
pub fn fire_position(map: &str, horde: &HordeInput, bounds: &Bounds) -> (f64, f64) {
    match horde.fire {
        Some((x, y)) if bounds.contains(x, y) => (x, y),
        Some((x, y)) => {
            log::warn!(
                "map '{map}', horde '{}': fire position ({x:.0}, {y:.0}) is outside the arena, using the horde center",
                horde.name
            );
            (horde.x, horde.y)
        }
        None => {
            log::debug!("map '{map}', horde '{}': no fire position, using the center", horde.name);
            (horde.x, horde.y)
        }
    }
}

/// Build horde number `row` (0-based among generated hordes) from its
/// validated monsters.
pub fn build(
    row: usize,
    horde: &HordeInput,
    placed: &[Placed],
    activation: Activation,
    kill_target: Option<&str>,
) -> Horde {
    let pen_y = row as f64 * PEN_ROW;
    let teleport = teleport_name(&horde.name);
    let message = (!horde.message.is_empty()).then(|| horde.message.clone());
    let delay = (horde.delay > 0.0).then_some(horde.delay);

    let support = Brush::cuboid(
        material::PEN,
        [0.0, pen_y, PEN_Z - 16.0],
        [placed.len() as f64 * PEN_CELL, PEN_CELL, 16.0],
    );

    let (trigger, flames) = match activation {
        Activation::Player { x, y } => {
            let half = FIRE_TRIGGER_SIZE / 2.0;
            let trigger = Entity::TriggerOnce {
                targetname: None,
                target: Some(teleport.clone()),
                message,
                delay,
                flags: TriggerFlags::empty(),
                brush: Brush::cuboid(
                    material::TRIGGER,
                    [x - half, y - half, 0.0],
                    [FIRE_TRIGGER_SIZE; 3],
                ),
            };
            let flames = [-FLAME_OFFSET, FLAME_OFFSET]
                .into_iter()
                .map(|dx| Entity::Light {
                    kind: LightKind::FlameSmallYellow,
                    origin: [x + dx, y, 0.0],
                })
                .collect();
            (trigger, flames)
        }
        Activation::Fired { count } => {
            let trigger = Entity::TriggerCounter {
                origin: [-PEN_CELL / 2.0, pen_y + PEN_CELL / 2.0, PEN_Z + STAND_HEIGHT],
                targetname: fire_name(&horde.name),
                target: teleport.clone(),
                count,
                message,
                delay,
                flags: CounterFlags::NOMESSAGE,
            };
            (trigger, Vec::new())
        }
    };

    let monsters = placed
        .iter()
        .enumerate()
        .map(|(k, p)| {
            monster::build(
                p,
                [k as f64 * PEN_CELL, pen_y, PEN_Z],
                PEN_CELL,
                &teleport,
                (horde.x, horde.y),
                kill_target,
            )
        })
        .collect();

    Horde {
        name: horde.name.clone(),
        support,
        trigger,
        flames,
        monsters,
    }
}
