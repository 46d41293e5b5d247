use serde::Serialize;
use strum::{Display, EnumIter};

/// Decorative light entities placed by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum LightKind {
    FlameSmallYellow,
}

impl LightKind {
    pub fn classname(self) -> String {
        format!("light_{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classnames() {
        assert_eq!(
            LightKind::FlameSmallYellow.classname(),
            "light_flame_small_yellow"
        );
    }
}
