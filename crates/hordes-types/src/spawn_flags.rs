use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// `spawnflags` bits understood by `monster_*` entities.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct MonsterFlags: u32 {
        const AMBUSH = 1;
    }
}

bitflags! {
    /// `spawnflags` bits for `trigger_once` / `trigger_multiple`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct TriggerFlags: u32 {
        /// Only fires when used by another entity, never on touch.
        const NOTOUCH = 1;
    }
}

bitflags! {
    /// `spawnflags` bits for `trigger_counter`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct CounterFlags: u32 {
        /// Suppress the "only N more to go" messages.
        const NOMESSAGE = 1;
    }
}

bitflags! {
    /// `spawnflags` bits for `item_health`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct HealthFlags: u32 {
        const ROTTEN = 1;
        const MEGA   = 2;
    }
}

bitflags! {
    /// `spawnflags` bits for the ammo boxes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct AmmoFlags: u32 {
        const BIG = 1;
    }
}
