//! Source coordinates are meters; the engine works in units.

pub const UNITS_PER_METER: f64 = 64.0;

/// Convert a source length or coordinate to engine units.
pub fn meters(m: i64) -> f64 {
    m as f64 * UNITS_PER_METER
}
