use std::fmt;

/// Unique identifier for a combat unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl UnitId {
    /// Reserved identifier for environmental sources (traps, auras, scripted heals).
    pub const ENVIRONMENT: Self = Self(u32::MAX);

    /// Returns true if this id stands for the environment rather than a unit.
    #[inline]
    pub const fn is_environment(self) -> bool {
        self.0 == Self::ENVIRONMENT.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_environment() {
            f.write_str("env")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Team a unit fights for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team(pub u8);

impl Team {
    pub const fn is_ally_of(self, other: Team) -> bool {
        self.0 == other.0
    }
}
