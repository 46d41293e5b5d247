use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, EnumString};

/// Level shell archetypes selectable through a map's `type` field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, EnumCount,
)]
#[strum(serialize_all = "lowercase")]
pub enum ArenaKind {
    /// Open floor fenced by a lattice of vertical bars.
    Cage,
    /// Enclosed room with four solid walls and a sky ceiling.
    Walled,
}
