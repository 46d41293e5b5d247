//! Pickups scattered over the arena floor.

use hordes_types::ItemVariant;

use crate::arena::Bounds;
use crate::entity::Entity;
use crate::input::ItemInput;

/// Items spawn slightly above the floor and drop onto it.
const ITEM_Z: f64 = 8.0;

pub fn place(map: &str, items: &[ItemInput], bounds: &Bounds) -> Vec<Entity> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let variant = match ItemVariant::resolve(&item.kind, &item.sub_type, &item.size) {
                Ok(variant) => variant,
                Err(e) => {
                    log::warn!("map '{map}': dropping item {}: {e}", i + 1);
                    return None;
                }
            };
            if !bounds.contains(item.x, item.y) {
                log::warn!(
                    "map '{map}': dropping item {}: ({:.0}, {:.0}) is outside the arena",
                    i + 1,
                    item.x,
                    item.y
                );
                return None;
            }
            Some(Entity::Item {
                variant,
                origin: [item.x, item.y, ITEM_Z],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hordes_types::{ItemSize, WeaponKind};

    fn item(kind: &str, sub_type: &str, size: &str) -> ItemInput {
        ItemInput {
            kind: kind.into(),
            sub_type: sub_type.into(),
            size: size.into(),
            x: 128.0,
            y: 128.0,
        }
    }

    #[test]
    fn warn_and_drop() {
        let bounds = Bounds::new(640.0, 640.0);
        let mut outside = item("health", "", "");
        outside.x = 630.0;
        let items = [
            item("", "", ""),
            item("weapon", "rocketlauncher", ""),
            item("weapon", "bfg", ""),
            item("health", "", "huge"),
            item("health", "mega", "big"),
            outside,
        ];
        let placed = place("m", &items, &bounds);
        assert_eq!(
            placed,
            vec![
                Entity::Item {
                    variant: ItemVariant::Health(ItemSize::Medium),
                    origin: [128.0, 128.0, ITEM_Z],
                },
                Entity::Item {
                    variant: ItemVariant::Weapon(WeaponKind::Rocketlauncher),
                    origin: [128.0, 128.0, ITEM_Z],
                },
            ]
        );
        assert_eq!(placed[1].classname(), "weapon_rocketlauncher");
    }
}
