use std::fmt;

/// Stable identifier of a unit, independent of the cell it stands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in cell coordinates.
///
/// `y` grows northwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Orthogonal step distance between two positions.
    pub const fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction a unit is looking at, kept as an unnormalized integer vector.
///
/// Attacks may leave a unit facing diagonally; vision cones use the raw
/// vector so no precision is lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facing {
    pub dx: i32,
    pub dy: i32,
}

impl Facing {
    pub const NORTH: Self = Self { dx: 0, dy: 1 };
    pub const SOUTH: Self = Self { dx: 0, dy: -1 };
    pub const EAST: Self = Self { dx: 1, dy: 0 };
    pub const WEST: Self = Self { dx: -1, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Facing from `from` towards `to`; `None` when both are the same cell.
    pub fn towards(from: Position, to: Position) -> Option<Self> {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        if dx == 0 && dy == 0 {
            None
        } else {
            Some(Self::new(dx, dy))
        }
    }

    pub const fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Nearest cardinal facing. Ties between axes resolve vertically.
    pub fn snap_cardinal(self) -> Self {
        if self.dx.abs() > self.dy.abs() {
            if self.dx > 0 { Self::EAST } else { Self::WEST }
        } else if self.dy > 0 {
            Self::NORTH
        } else {
            Self::SOUTH
        }
    }
}

impl Default for Facing {
    fn default() -> Self {
        Self::NORTH
    }
}

/// Integer resource meter (health, action points) tracked per unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn refill(&mut self) {
        self.current = self.maximum;
    }

    /// Removes up to `amount`, returning what was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds up to `amount` without exceeding the maximum, returning what was added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.maximum.saturating_sub(self.current));
        self.current += added;
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_symmetric() {
        let a = Position::new(1, 4);
        let b = Position::new(-2, 0);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(b.manhattan(a), 7);
    }

    #[test]
    fn snap_cardinal_prefers_dominant_axis() {
        assert_eq!(Facing::new(3, 1).snap_cardinal(), Facing::EAST);
        assert_eq!(Facing::new(-3, 2).snap_cardinal(), Facing::WEST);
        assert_eq!(Facing::new(1, -4).snap_cardinal(), Facing::SOUTH);
        assert_eq!(Facing::new(2, 2).snap_cardinal(), Facing::NORTH);
    }

    #[test]
    fn towards_same_cell_is_none() {
        let p = Position::new(2, 2);
        assert_eq!(Facing::towards(p, p), None);
        assert_eq!(
            Facing::towards(p, Position::new(4, 1)),
            Some(Facing::new(2, -1))
        );
    }

    #[test]
    fn meter_drain_and_restore_clamp() {
        let mut meter = ResourceMeter::new(3, 10);
        assert_eq!(meter.drain(5), 3);
        assert_eq!(meter.current, 0);
        assert_eq!(meter.restore(25), 10);
        assert_eq!(meter.current, 10);
    }
}
