//! Arena shells and their exit constructions.
//!
//! The playable floor spans `(0, 0)..(width, height)` with its top at z = 0.
//! The exit always sits in the middle of the north edge.

use hordes_types::{ArenaKind, CounterFlags};

use crate::brush::{Brush, material};
use crate::entity::Entity;

/// Nothing is placed closer than this to the arena edge.
pub const MARGIN: f64 = 64.0;
/// Width of the exit opening.
pub const OPENING: f64 = 128.0;
/// Longest arena side; keeps the shell and its bar lattice inside the
/// engine's +/-4096 coordinate range.
pub const MAX_SIDE: f64 = 4096.0;

const FLOOR_DEPTH: f64 = 16.0;
const BAR_SIZE: f64 = 8.0;
const BAR_SPACING: f64 = 64.0;
const BAR_HEIGHT: f64 = 192.0;
const WALL_THICKNESS: f64 = 16.0;
const WALL_HEIGHT: f64 = 256.0;
const EXIT_DEPTH: f64 = 128.0;

/// The playable rectangle of a map, in engine units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Smallest side length that still leaves room inside the margin for the
    /// exit opening.
    pub const fn min_side() -> f64 {
        2.0 * MARGIN + OPENING
    }

    pub fn fits_layout(&self) -> bool {
        let sides = Self::min_side()..=MAX_SIDE;
        sides.contains(&self.width) && sides.contains(&self.height)
    }

    /// True when `(x, y)` keeps at least [`MARGIN`] from every edge.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (MARGIN..=self.width - MARGIN).contains(&x) && (MARGIN..=self.height - MARGIN).contains(&y)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// West and east edges of the exit opening.
    fn opening(&self) -> (f64, f64) {
        let x0 = (self.width - OPENING) / 2.0;
        (x0, x0 + OPENING)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    pub kind: ArenaKind,
    pub bounds: Bounds,
    /// Static geometry, owned by the world.
    pub brushes: Vec<Brush>,
    pub door: Entity,
    pub changelevel: Entity,
    /// Opens the door once every monster of the last horde is dead.
    pub exit_counter: Entity,
}

/// Build the shell for `kind` together with its exit sequence.
pub fn build(
    map: &str,
    kind: ArenaKind,
    bounds: Bounds,
    next_map: &str,
    exit_count: usize,
) -> Arena {
    let Bounds { width, height } = bounds;
    let (gx0, _) = bounds.opening();

    let mut brushes = vec![Brush::cuboid(
        material::FLOOR,
        [0.0, 0.0, -FLOOR_DEPTH],
        [width, height, FLOOR_DEPTH],
    )];
    let (door, changelevel_min) = match kind {
        ArenaKind::Cage => {
            cage(&bounds, &mut brushes);
            (
                Brush::cuboid(
                    material::DOOR,
                    [gx0, height + BAR_SIZE, 0.0],
                    [OPENING, BAR_SIZE, BAR_HEIGHT],
                ),
                [gx0, height + 32.0, 0.0],
            )
        }
        ArenaKind::Walled => {
            walled(&bounds, &mut brushes);
            (
                Brush::cuboid(
                    material::DOOR,
                    [gx0, height, 0.0],
                    [OPENING, WALL_THICKNESS, WALL_HEIGHT],
                ),
                [gx0, height + 48.0, 0.0],
            )
        }
    };

    let door_name = format!("{map}_exit_door");
    Arena {
        kind,
        bounds,
        brushes,
        door: Entity::Door {
            targetname: door_name.clone(),
            brush: door,
        },
        changelevel: Entity::ChangeLevel {
            map: next_map.to_string(),
            brush: Brush::cuboid(material::TRIGGER, changelevel_min, [OPENING, 64.0, 128.0]),
        },
        exit_counter: Entity::TriggerCounter {
            origin: [width / 2.0, height + EXIT_DEPTH / 2.0, 64.0],
            targetname: format!("{map}_exit"),
            target: door_name,
            count: exit_count,
            message: None,
            delay: None,
            flags: CounterFlags::NOMESSAGE,
        },
    }
}

/// Square bars around the floor, leaving a gap for the exit, plus a floor pad
/// beyond the gap.
fn cage(bounds: &Bounds, brushes: &mut Vec<Brush>) {
    let Bounds { width, height } = *bounds;
    let (gx0, gx1) = bounds.opening();
    let half = BAR_SIZE / 2.0;
    let bar = |x: f64, y: f64| {
        Brush::cuboid(
            material::BARS,
            [x, y, 0.0],
            [BAR_SIZE, BAR_SIZE, BAR_HEIGHT],
        )
    };

    let south = -2.0 * BAR_SIZE;
    let north = height + BAR_SIZE;
    for x in stations(width) {
        brushes.push(bar(x - half, south));
        let in_gap = x + half > gx0 && x - half < gx1;
        if !in_gap {
            brushes.push(bar(x - half, north));
        }
    }
    let west = -2.0 * BAR_SIZE;
    let east = width + BAR_SIZE;
    for y in stations(height) {
        brushes.push(bar(west, y - half));
        brushes.push(bar(east, y - half));
    }

    brushes.push(Brush::cuboid(
        material::FLOOR,
        [gx0, height, -FLOOR_DEPTH],
        [OPENING, EXIT_DEPTH, FLOOR_DEPTH],
    ));
}

/// Bar positions every [`BAR_SPACING`] along an edge, both ends included.
fn stations(length: f64) -> impl Iterator<Item = f64> {
    let count = (length / BAR_SPACING).floor() as usize;
    (0..=count).map(|k| k as f64 * BAR_SPACING)
}

/// Four walls with an opening in the north one, a sky ceiling, and a closed
/// alcove behind the opening.
fn walled(bounds: &Bounds, brushes: &mut Vec<Brush>) {
    let Bounds { width, height } = *bounds;
    let (gx0, gx1) = bounds.opening();
    let t = WALL_THICKNESS;
    let wall = |min: [f64; 3], size: [f64; 3]| Brush::cuboid(material::WALL, min, size);

    brushes.extend([
        wall([-t, -t, 0.0], [width + 2.0 * t, t, WALL_HEIGHT]),
        wall([-t, 0.0, 0.0], [t, height, WALL_HEIGHT]),
        wall([width, 0.0, 0.0], [t, height, WALL_HEIGHT]),
        wall([-t, height, 0.0], [gx0 + t, t, WALL_HEIGHT]),
        wall([gx1, height, 0.0], [width + t - gx1, t, WALL_HEIGHT]),
        Brush::cuboid(
            material::SKY,
            [-t, -t, WALL_HEIGHT],
            [width + 2.0 * t, height + 2.0 * t, t],
        ),
    ]);

    // Exit alcove.
    let back = height + t + EXIT_DEPTH;
    brushes.extend([
        Brush::cuboid(
            material::FLOOR,
            [gx0, height, -FLOOR_DEPTH],
            [OPENING, t + EXIT_DEPTH, FLOOR_DEPTH],
        ),
        wall([gx0 - t, height + t, 0.0], [t, EXIT_DEPTH, WALL_HEIGHT]),
        wall([gx1, height + t, 0.0], [t, EXIT_DEPTH, WALL_HEIGHT]),
        wall([gx0 - t, back, 0.0], [OPENING + 2.0 * t, t, WALL_HEIGHT]),
        Brush::cuboid(
            material::SKY,
            [gx0 - t, height + t, WALL_HEIGHT],
            [OPENING + 2.0 * t, EXIT_DEPTH + t, t],
        ),
    ]);
}
