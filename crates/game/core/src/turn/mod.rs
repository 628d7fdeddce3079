//! Round-robin initiative and the per-unit turn state machine.
//!
//! The initiative order is fixed when the encounter starts. Advancing walks
//! that order cyclically and skips units that are dead at the time of
//! advancement. Game over is checked before every advancement and is
//! terminal.
mod tick;

pub use tick::{TickReport, start_of_turn};

use crate::state::{Faction, Roster, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// No unit holds the turn: before the first grant, between turns, or
    /// after a grant was aborted by a lethal tick.
    Idle,
    /// The unit holds the turn and may act.
    UnitActive(UnitId),
    /// The unit's committed action is still playing out.
    Resolving(UnitId),
    GameOver,
}

/// Result of [`TurnController::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnAdvance {
    /// The unit is next; grant it with `begin_turn`.
    Next(UnitId),
    /// A living unit still holds the turn.
    Blocked(UnitId),
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnController {
    initiative: Vec<UnitId>,
    cursor: Option<usize>,
    phase: TurnPhase,
    round: u32,
}

impl TurnController {
    pub fn new(initiative: Vec<UnitId>) -> Self {
        Self {
            initiative,
            cursor: None,
            phase: TurnPhase::Idle,
            round: 0,
        }
    }

    /// Initiative over the living units of `roster`, in roster order.
    pub fn from_roster(roster: &Roster) -> Self {
        Self::new(roster.living_ids())
    }

    pub fn initiative(&self) -> &[UnitId] {
        &self.initiative
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Number of times the initiative order has been entered from the top.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Unit holding the turn, if any.
    pub fn current_unit(&self) -> Option<UnitId> {
        match self.phase {
            TurnPhase::UnitActive(unit) | TurnPhase::Resolving(unit) => Some(unit),
            TurnPhase::Idle | TurnPhase::GameOver => None,
        }
    }

    /// Unit the cursor points at, whether or not its turn was granted.
    pub fn selected_unit(&self) -> Option<UnitId> {
        self.cursor.and_then(|index| self.initiative.get(index).copied())
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    /// True if some faction has no living units.
    pub fn check_game_over(roster: &Roster) -> bool {
        Faction::ALL
            .into_iter()
            .any(|faction| !roster.has_living(faction))
    }

    /// Moves the cursor to the next living unit.
    ///
    /// Refused while a living unit holds the turn. Ends the encounter when a
    /// faction is wiped out or nobody in the initiative order is alive.
    pub fn advance(&mut self, roster: &Roster) -> TurnAdvance {
        if self.is_game_over() {
            return TurnAdvance::GameOver;
        }
        if let Some(unit) = self.current_unit() {
            if roster.living(unit).is_some() {
                return TurnAdvance::Blocked(unit);
            }
        }
        if Self::check_game_over(roster) {
            self.phase = TurnPhase::GameOver;
            return TurnAdvance::GameOver;
        }

        let count = self.initiative.len();
        let start = self.cursor.map_or(0, |index| index + 1);
        for step in 0..count {
            let index = (start + step) % count;
            let unit = self.initiative[index];
            if roster.living(unit).is_none() {
                continue;
            }
            if self.cursor.is_none_or(|previous| index <= previous) {
                self.round += 1;
            }
            self.cursor = Some(index);
            self.phase = TurnPhase::Idle;
            return TurnAdvance::Next(unit);
        }

        self.phase = TurnPhase::GameOver;
        TurnAdvance::GameOver
    }

    /// Hands the turn to the selected unit. Returns false for any other unit
    /// or when a turn is already held.
    pub fn grant(&mut self, unit: UnitId) -> bool {
        if self.phase != TurnPhase::Idle || self.selected_unit() != Some(unit) {
            return false;
        }
        self.phase = TurnPhase::UnitActive(unit);
        true
    }

    /// Clears the unit's turn flag. Refused while its action is resolving.
    pub fn end_turn(&mut self, unit: UnitId) -> bool {
        if self.phase != TurnPhase::UnitActive(unit) {
            return false;
        }
        self.phase = TurnPhase::Idle;
        true
    }

    pub fn begin_resolution(&mut self, unit: UnitId) -> bool {
        if self.phase != TurnPhase::UnitActive(unit) {
            return false;
        }
        self.phase = TurnPhase::Resolving(unit);
        true
    }

    pub fn finish_resolution(&mut self, unit: UnitId) -> bool {
        if self.phase != TurnPhase::Resolving(unit) {
            return false;
        }
        self.phase = TurnPhase::UnitActive(unit);
        true
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.phase, TurnPhase::Resolving(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::testing::{enemy, player};
    use crate::state::Position;

    fn roster() -> Roster {
        let config = GameConfig::new();
        let mut roster = Roster::new();
        roster.insert(player(&config, Position::new(0, 0)));
        roster.insert(enemy(&config, Position::new(1, 0)));
        roster.insert(player(&config, Position::new(2, 0)));
        roster.insert(enemy(&config, Position::new(3, 0)));
        roster
    }

    fn take_turn(turns: &mut TurnController, roster: &Roster) -> UnitId {
        let TurnAdvance::Next(unit) = turns.advance(roster) else {
            panic!("expected a next unit");
        };
        assert!(turns.grant(unit));
        assert!(turns.end_turn(unit));
        unit
    }

    #[test]
    fn order_is_strict_round_robin() {
        let roster = roster();
        let mut turns = TurnController::from_roster(&roster);
        let order: Vec<_> = (0..6).map(|_| take_turn(&mut turns, &roster)).collect();

        assert_eq!(
            order,
            [0, 1, 2, 3, 0, 1].map(UnitId).to_vec()
        );
        assert_eq!(turns.round(), 2);
    }

    #[test]
    fn dead_units_are_skipped() {
        let mut roster = roster();
        let mut turns = TurnController::from_roster(&roster);
        assert_eq!(take_turn(&mut turns, &roster), UnitId(0));

        roster.get_mut(UnitId(1)).unwrap().alive = false;
        assert_eq!(take_turn(&mut turns, &roster), UnitId(2));
        assert_eq!(take_turn(&mut turns, &roster), UnitId(3));
        assert_eq!(take_turn(&mut turns, &roster), UnitId(0));
    }

    #[test]
    fn advancing_is_blocked_while_a_living_unit_holds_the_turn() {
        let roster = roster();
        let mut turns = TurnController::from_roster(&roster);
        let TurnAdvance::Next(unit) = turns.advance(&roster) else {
            panic!("expected a next unit");
        };
        assert!(turns.grant(unit));

        assert_eq!(turns.advance(&roster), TurnAdvance::Blocked(unit));
        assert_eq!(turns.current_unit(), Some(unit));
    }

    #[test]
    fn dead_turn_holder_does_not_block() {
        let mut roster = roster();
        let mut turns = TurnController::from_roster(&roster);
        let TurnAdvance::Next(unit) = turns.advance(&roster) else {
            panic!("expected a next unit");
        };
        turns.grant(unit);
        roster.get_mut(unit).unwrap().alive = false;

        assert_eq!(turns.advance(&roster), TurnAdvance::Next(UnitId(1)));
    }

    #[test]
    fn game_over_is_sticky() {
        let mut roster = roster();
        let mut turns = TurnController::from_roster(&roster);
        roster.get_mut(UnitId(1)).unwrap().alive = false;
        roster.get_mut(UnitId(3)).unwrap().alive = false;

        assert_eq!(turns.advance(&roster), TurnAdvance::GameOver);
        assert!(turns.is_game_over());

        roster.get_mut(UnitId(1)).unwrap().alive = true;
        assert_eq!(turns.advance(&roster), TurnAdvance::GameOver);
        assert_eq!(turns.current_unit(), None);
        assert!(!turns.grant(UnitId(0)));
    }

    #[test]
    fn no_current_unit_before_a_grant() {
        let roster = roster();
        let mut turns = TurnController::from_roster(&roster);
        assert_eq!(turns.current_unit(), None);

        turns.advance(&roster);
        assert_eq!(turns.current_unit(), None);
        assert_eq!(turns.selected_unit(), Some(UnitId(0)));
        assert!(!turns.grant(UnitId(2)));
    }

    #[test]
    fn resolution_blocks_end_turn() {
        let roster = roster();
        let mut turns = TurnController::from_roster(&roster);
        turns.advance(&roster);
        turns.grant(UnitId(0));

        assert!(turns.begin_resolution(UnitId(0)));
        assert!(!turns.end_turn(UnitId(0)));
        assert_eq!(turns.current_unit(), Some(UnitId(0)));
        assert!(turns.finish_resolution(UnitId(0)));
        assert!(turns.end_turn(UnitId(0)));
    }
}
