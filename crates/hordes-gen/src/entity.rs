//! Point and brush entities of the target map format.

use hordes_types::{
    AmmoFlags, CounterFlags, HealthFlags, ItemSize, ItemVariant, LightKind, MonsterFlags,
    MonsterKind, TriggerFlags,
};

use crate::brush::Brush;

pub type Vec3 = [f64; 3];

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    PlayerStart {
        origin: Vec3,
    },
    PlayerCoop {
        origin: Vec3,
    },
    /// Fires `target` once, on touch or (with `NOTOUCH`) when used.
    TriggerOnce {
        targetname: Option<String>,
        target: Option<String>,
        message: Option<String>,
        delay: Option<f64>,
        flags: TriggerFlags,
        brush: Brush,
    },
    /// Fires `target` after being used `count` times.
    TriggerCounter {
        origin: Vec3,
        targetname: String,
        target: String,
        count: usize,
        message: Option<String>,
        delay: Option<f64>,
        flags: CounterFlags,
    },
    ChangeLevel {
        map: String,
        brush: Brush,
    },
    Teleport {
        targetname: String,
        target: String,
        brush: Brush,
    },
    TeleportDestination {
        origin: Vec3,
        targetname: String,
        angle: f64,
    },
    /// A door that opens upwards when used and never closes.
    Door {
        targetname: String,
        brush: Brush,
    },
    Monster {
        kind: MonsterKind,
        origin: Vec3,
        target: String,
        flags: MonsterFlags,
    },
    Item {
        variant: ItemVariant,
        origin: Vec3,
    },
    Light {
        kind: LightKind,
        origin: Vec3,
    },
}

fn origin(v: &Vec3) -> String {
    format!(
        "{} {} {}",
        v[0].trunc() as i64,
        v[1].trunc() as i64,
        v[2].trunc() as i64
    )
}

fn number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

impl Entity {
    pub fn classname(&self) -> String {
        match self {
            Entity::PlayerStart { .. } => "info_player_start".into(),
            Entity::PlayerCoop { .. } => "info_player_coop".into(),
            Entity::TriggerOnce { .. } => "trigger_once".into(),
            Entity::TriggerCounter { .. } => "trigger_counter".into(),
            Entity::ChangeLevel { .. } => "trigger_changelevel".into(),
            Entity::Teleport { .. } => "trigger_teleport".into(),
            Entity::TeleportDestination { .. } => "info_teleport_destination".into(),
            Entity::Door { .. } => "func_door".into(),
            Entity::Monster { kind, .. } => kind.classname(),
            Entity::Item { variant, .. } => variant.classname(),
            Entity::Light { kind, .. } => kind.classname(),
        }
    }

    /// Key/value pairs in output order, starting with `classname`.
    pub fn keys(&self) -> Vec<(&'static str, String)> {
        let mut keys = vec![("classname", self.classname())];
        match self {
            Entity::PlayerStart { origin: o }
            | Entity::PlayerCoop { origin: o }
            | Entity::Light { origin: o, .. } => keys.push(("origin", origin(o))),
            Entity::TriggerOnce {
                targetname,
                target,
                message,
                delay,
                flags,
                ..
            } => {
                if let Some(name) = targetname {
                    keys.push(("targetname", name.clone()));
                }
                if let Some(target) = target {
                    keys.push(("target", target.clone()));
                }
                push_common(&mut keys, message, delay, flags.bits());
            }
            Entity::TriggerCounter {
                origin: o,
                targetname,
                target,
                count,
                message,
                delay,
                flags,
            } => {
                keys.push(("origin", origin(o)));
                keys.push(("targetname", targetname.clone()));
                keys.push(("target", target.clone()));
                keys.push(("count", count.to_string()));
                push_common(&mut keys, message, delay, flags.bits());
            }
            Entity::ChangeLevel { map, .. } => keys.push(("map", map.clone())),
            Entity::Teleport {
                targetname, target, ..
            } => {
                keys.push(("targetname", targetname.clone()));
                keys.push(("target", target.clone()));
            }
            Entity::TeleportDestination {
                origin: o,
                targetname,
                angle,
            } => {
                keys.push(("origin", origin(o)));
                keys.push(("targetname", targetname.clone()));
                keys.push(("angle", format!("{}", angle.round() as i64)));
            }
            Entity::Door { targetname, .. } => {
                keys.push(("targetname", targetname.clone()));
                keys.push(("angle", "-1".into()));
                keys.push(("wait", "-1".into()));
            }
            Entity::Monster {
                origin: o,
                target,
                flags,
                ..
            } => {
                keys.push(("origin", origin(o)));
                keys.push(("target", target.clone()));
                push_flags(&mut keys, flags.bits());
            }
            Entity::Item { variant, origin: o } => {
                keys.push(("origin", origin(o)));
                push_flags(&mut keys, item_flags(*variant));
            }
        }
        keys
    }

    pub fn brush(&self) -> Option<&Brush> {
        match self {
            Entity::TriggerOnce { brush, .. }
            | Entity::ChangeLevel { brush, .. }
            | Entity::Teleport { brush, .. }
            | Entity::Door { brush, .. } => Some(brush),
            _ => None,
        }
    }

    /// The value of `key`, if this entity carries it.
    pub fn get(&self, key: &str) -> Option<String> {
        self.keys()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

fn push_common(
    keys: &mut Vec<(&'static str, String)>,
    message: &Option<String>,
    delay: &Option<f64>,
    bits: u32,
) {
    if let Some(message) = message {
        keys.push(("message", message.clone()));
    }
    if let Some(delay) = delay {
        keys.push(("delay", number(*delay)));
    }
    push_flags(keys, bits);
}

fn push_flags(keys: &mut Vec<(&'static str, String)>, bits: u32) {
    if bits != 0 {
        keys.push(("spawnflags", bits.to_string()));
    }
}

fn item_flags(variant: ItemVariant) -> u32 {
    match variant {
        ItemVariant::Health(ItemSize::Small) => HealthFlags::ROTTEN.bits(),
        ItemVariant::Health(ItemSize::Big) => HealthFlags::MEGA.bits(),
        ItemVariant::Ammo { big: true, .. } => AmmoFlags::BIG.bits(),
        _ => 0,
    }
}
