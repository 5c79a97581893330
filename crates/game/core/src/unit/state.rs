//! Unit state identifiers, allow-sets, and archetypes.

use bitflags::bitflags;

/// Behavioral state of a unit.
///
/// The `AsRefStr` name doubles as the animation trigger played on entry.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum UnitState {
    Idle,
    Attack,
    Move,
    Death,
}

impl UnitState {
    /// Animation trigger name for this state.
    #[inline]
    pub fn trigger(self) -> &'static str {
        self.into()
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, UnitState::Death)
    }
}

bitflags! {
    /// Set of states a behavior may transition into.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StateSet: u8 {
        const IDLE   = 1 << 0;
        const ATTACK = 1 << 1;
        const MOVE   = 1 << 2;
        const DEATH  = 1 << 3;
    }
}

impl From<UnitState> for StateSet {
    fn from(state: UnitState) -> Self {
        match state {
            UnitState::Idle => StateSet::IDLE,
            UnitState::Attack => StateSet::ATTACK,
            UnitState::Move => StateSet::MOVE,
            UnitState::Death => StateSet::DEATH,
        }
    }
}

impl StateSet {
    #[inline]
    pub fn allows(self, state: UnitState) -> bool {
        self.contains(StateSet::from(state))
    }
}

/// Unit type used to pick a state set from a [`StateFactory`](super::StateFactory).
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Archetype {
    #[default]
    Default,
    Melee,
    Ranged,
    Tank,
    Support,
    Boss,
}

/// A completed state change, delivered to transition observers.
///
/// `previous` is `None` only for the initial entry into `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateTransition {
    pub previous: Option<UnitState>,
    pub next: UnitState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn trigger_names_match_state_names() {
        for state in UnitState::iter() {
            assert_eq!(state.trigger(), state.as_ref());
            assert_eq!(state.trigger(), state.to_string());
        }
    }

    #[test]
    fn state_set_membership() {
        let set = StateSet::ATTACK | StateSet::DEATH;
        assert!(set.allows(UnitState::Attack));
        assert!(set.allows(UnitState::Death));
        assert!(!set.allows(UnitState::Idle));
        assert!(!StateSet::empty().allows(UnitState::Move));
    }

    #[test]
    fn archetype_parses_case_insensitively() {
        assert_eq!("Tank".parse::<Archetype>().unwrap(), Archetype::Tank);
        assert_eq!("boss".parse::<Archetype>().unwrap(), Archetype::Boss);
        assert_eq!(Archetype::Ranged.as_ref(), "ranged");
    }
}
