//! Convex hexahedral brushes and their affine transforms.
//!
//! Points are row vectors in homogeneous coordinates and transforms are
//! applied as `p' = p · M`, so the translation lives in the last row.

use std::fmt;

pub type Point = [f64; 4];
pub type Plane = [Point; 3];
type Matrix = [[f64; 4]; 4];

/// Three points per face of the unit cube, wound so that every face points
/// outwards.
const UNIT_CUBE: [Plane; 6] = [
    [[1.0, 1.0, 1.0, 1.0], [1.0, 0.0, 1.0, 1.0], [0.0, 1.0, 1.0, 1.0]],
    [[1.0, 1.0, 1.0, 1.0], [0.0, 1.0, 1.0, 1.0], [1.0, 1.0, 0.0, 1.0]],
    [[1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 0.0, 1.0], [1.0, 0.0, 1.0, 1.0]],
    [[0.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]],
    [[0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0], [1.0, 0.0, 0.0, 1.0]],
    [[0.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]],
];

/// Texture names used by generated geometry.
pub mod material {
    pub const FLOOR: &str = "ground1_6";
    pub const WALL: &str = "wbrick1_5";
    pub const BARS: &str = "metal1_2";
    pub const SKY: &str = "sky4";
    pub const DOOR: &str = "door02_1";
    pub const PEN: &str = "city4_6";
    pub const TRIGGER: &str = "trigger";
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    planes: [Plane; 6],
    pub material: &'static str,
}

impl Brush {
    /// The unit cube spanning `(0,0,0)..(1,1,1)`.
    pub fn unit(material: &'static str) -> Self {
        Self {
            planes: UNIT_CUBE,
            material,
        }
    }

    /// An axis-aligned box with its minimum corner at `min`.
    pub fn cuboid(material: &'static str, min: [f64; 3], size: [f64; 3]) -> Self {
        let mut brush = Self::unit(material);
        brush
            .scale(size[0], size[1], size[2])
            .translate(min[0], min[1], min[2]);
        brush
    }

    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) -> &mut Self {
        self.transform(&[
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn translate(&mut self, tx: f64, ty: f64, tz: f64) -> &mut Self {
        self.transform(&[
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx, ty, tz, 1.0],
        ])
    }

    fn transform(&mut self, m: &Matrix) -> &mut Self {
        for point in self.planes.iter_mut().flatten() {
            let p = *point;
            for (j, out) in point.iter_mut().enumerate() {
                *out = (0..4).map(|i| p[i] * m[i][j]).sum();
            }
        }
        self
    }

    /// Minimum and maximum corners over every defining point.
    pub fn bounds(&self) -> ([f64; 3], [f64; 3]) {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for point in self.planes.iter().flatten() {
            for axis in 0..3 {
                min[axis] = min[axis].min(point[axis]);
                max[axis] = max[axis].max(point[axis]);
            }
        }
        (min, max)
    }
}

/// Coordinates are truncated towards zero.
impl fmt::Display for Brush {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        for plane in &self.planes {
            for p in plane {
                write!(
                    f,
                    "( {} {} {} ) ",
                    p[0].trunc() as i64,
                    p[1].trunc() as i64,
                    p[2].trunc() as i64
                )?;
            }
            writeln!(f, "{} 0 0 0 1 1", self.material)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xyz(brush: &Brush) -> Vec<[f64; 3]> {
        brush
            .planes
            .iter()
            .flatten()
            .map(|p| [p[0], p[1], p[2]])
            .collect()
    }

    #[test]
    fn scale_then_translate() {
        let mut brush = Brush::unit(material::WALL);
        brush.scale(2.0, 3.0, 1.0).translate(10.0, 0.0, 0.0);
        let expected: Vec<[f64; 3]> = UNIT_CUBE
            .iter()
            .flatten()
            .map(|p| [p[0] * 2.0 + 10.0, p[1] * 3.0, p[2]])
            .collect();
        assert_eq!(xyz(&brush), expected);
        assert_eq!(xyz(&brush)[0], [12.0, 3.0, 1.0]);
        assert_eq!(brush.bounds(), ([10.0, 0.0, 0.0], [12.0, 3.0, 1.0]));
    }

    #[test]
    fn order_matters() {
        let mut a = Brush::unit(material::WALL);
        a.scale(2.0, 3.0, 1.0).translate(10.0, 0.0, 0.0);
        let mut b = Brush::unit(material::WALL);
        b.translate(10.0, 0.0, 0.0).scale(2.0, 3.0, 1.0);
        assert_ne!(a, b);
        assert_eq!(xyz(&b)[0], [22.0, 3.0, 1.0]);
        assert!(a.planes.iter().flatten().all(|p| p[3] == 1.0));
    }

    #[test]
    fn cuboid_spans_size_from_min() {
        let brush = Brush::cuboid(material::FLOOR, [-16.0, 8.0, -16.0], [32.0, 64.0, 16.0]);
        assert_eq!(brush.bounds(), ([-16.0, 8.0, -16.0], [16.0, 72.0, 0.0]));
    }

    #[test]
    fn display_truncates() {
        let mut brush = Brush::unit(material::TRIGGER);
        brush.scale(2.7, 1.0, 1.0).translate(-0.5, 0.0, 0.0);
        let text = brush.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "{");
        assert_eq!(
            lines[1],
            "( 2 1 1 ) ( 2 0 1 ) ( 0 1 1 ) trigger 0 0 0 1 1"
        );
        assert_eq!(lines[7], "}");
    }
}
