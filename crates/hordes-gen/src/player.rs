//! Player spawn points.

use crate::arena::Bounds;
use crate::entity::Entity;
use crate::input::PlayerInput;
use crate::monster::STAND_HEIGHT;

/// The first usable player becomes the single-player start, the others
/// cooperative starts. Without any, the start goes to the arena center.
pub fn place(map: &str, players: &[PlayerInput], bounds: &Bounds) -> Vec<Entity> {
    let mut spawns = Vec::with_capacity(players.len().max(1));
    for (i, player) in players.iter().enumerate() {
        if !bounds.contains(player.x, player.y) {
            log::warn!(
                "map '{map}': dropping player {}: ({:.0}, {:.0}) is outside the arena",
                i + 1,
                player.x,
                player.y
            );
            continue;
        }
        let origin = [player.x, player.y, STAND_HEIGHT];
        spawns.push(if spawns.is_empty() {
            Entity::PlayerStart { origin }
        } else {
            Entity::PlayerCoop { origin }
        });
    }

    if spawns.is_empty() {
        let (x, y) = bounds.center();
        log::debug!("map '{map}': no player declared, starting at the center");
        spawns.push(Entity::PlayerStart {
            origin: [x, y, STAND_HEIGHT],
        });
    }
    spawns
}
