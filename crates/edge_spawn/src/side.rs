use bevy::prelude::*;


/// One border of the reference rectangle.
/// Discriminants give the cycle order used by sequential selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Side {
    pub const COUNT: usize = 4;
    pub const ALL: [Side; Side::COUNT] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn from_index(index: usize) -> Option<Side> {
        Side::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Side {
        Side::ALL[(self.index() + 1) % Side::COUNT]
    }

    /// Unit vector pointing away from the rectangle.
    pub fn outward(self) -> Vec2 {
        match self {
            Side::Top => Vec2::Y,
            Side::Right => Vec2::X,
            Side::Bottom => Vec2::NEG_Y,
            Side::Left => Vec2::NEG_X,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for side in Side::ALL {
            assert_eq!(Side::from_index(side.index()), Some(side));
        }
        assert_eq!(Side::from_index(4), None);
        assert_eq!(Side::from_index(usize::MAX), None);
    }

    #[test]
    fn test_next_cycles_clockwise() {
        assert_eq!(Side::Top.next(), Side::Right);
        assert_eq!(Side::Right.next(), Side::Bottom);
        assert_eq!(Side::Bottom.next(), Side::Left);
        assert_eq!(Side::Left.next(), Side::Top);
    }
}
