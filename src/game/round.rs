//! Orbit bookkeeping for a single betting round.
//!
//! [`Round`] tracks whose turn it is and when the orbit closes, without
//! knowing anything about chips. The betting layer reports each turn as
//! a [`TurnAction`] and reads back `in_progress`.

use serde::{Deserialize, Serialize};

use super::entities::SeatIndex;
use super::errors::GameError;

/// How a turn engaged the pot. Aggressive action reopens the orbit;
/// passive action merely keeps the round contested.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Contest {
    Passive,
    Aggressive,
}

/// One player's turn, as the round sees it. A turn engages the pot at
/// most one way, and may additionally drop the player from the orbit
/// (a fold, or an all-in with nothing left to wager).
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TurnAction {
    contest: Option<Contest>,
    leave: bool,
}

impl TurnAction {
    #[must_use]
    pub const fn passive() -> Self {
        Self {
            contest: Some(Contest::Passive),
            leave: false,
        }
    }

    #[must_use]
    pub const fn aggressive() -> Self {
        Self {
            contest: Some(Contest::Aggressive),
            leave: false,
        }
    }

    #[must_use]
    pub const fn leave() -> Self {
        Self {
            contest: None,
            leave: true,
        }
    }

    /// The same engagement, with the player also leaving the orbit.
    #[must_use]
    pub const fn and_leave(self) -> Self {
        Self {
            contest: self.contest,
            leave: true,
        }
    }
}

/// Turn order state for one betting round.
///
/// The round is in progress while more than one player can still act
/// (or the round is contested) and play has not come back around to the
/// last aggressive actor.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Round {
    active_players: Vec<bool>,
    player_to_act: SeatIndex,
    last_aggressive_actor: SeatIndex,
    contested: bool,
    first_action: bool,
    num_active_players: usize,
}

impl Round {
    #[must_use]
    pub fn new(active_players: Vec<bool>, first_to_act: SeatIndex) -> Self {
        debug_assert!(first_to_act < active_players.len());
        let num_active_players = active_players.iter().filter(|active| **active).count();
        Self {
            active_players,
            player_to_act: first_to_act,
            last_aggressive_actor: first_to_act,
            contested: false,
            first_action: true,
            num_active_players,
        }
    }

    #[must_use]
    pub fn active_players(&self) -> &[bool] {
        &self.active_players
    }

    #[must_use]
    pub fn player_to_act(&self) -> SeatIndex {
        self.player_to_act
    }

    #[must_use]
    pub fn last_aggressive_actor(&self) -> SeatIndex {
        self.last_aggressive_actor
    }

    #[must_use]
    pub fn num_active_players(&self) -> usize {
        self.num_active_players
    }

    #[must_use]
    pub fn in_progress(&self) -> bool {
        (self.contested || self.num_active_players > 1)
            && (self.first_action || self.player_to_act != self.last_aggressive_actor)
    }

    #[must_use]
    pub fn is_contested(&self) -> bool {
        self.contested
    }

    /// Record the acting player's turn and pass the action on.
    pub fn action_taken(&mut self, action: TurnAction) -> Result<(), GameError> {
        if !self.in_progress() {
            return Err(GameError::BettingRoundNotInProgress);
        }
        self.first_action = false;
        // Aggressive action makes every later turn a contested one.
        match action.contest {
            Some(Contest::Aggressive) => {
                self.last_aggressive_actor = self.player_to_act;
                self.contested = true;
            }
            Some(Contest::Passive) => self.contested = true,
            None => {}
        }
        if action.leave {
            self.active_players[self.player_to_act] = false;
            self.num_active_players -= 1;
        }
        self.increment_player();
        Ok(())
    }

    /// Advance to the next active seat, stopping early if the orbit
    /// comes back to the last aggressive actor even when that seat is
    /// no longer active.
    fn increment_player(&mut self) {
        loop {
            self.player_to_act += 1;
            if self.player_to_act == self.active_players.len() {
                self.player_to_act = 0;
            }
            if self.player_to_act == self.last_aggressive_actor {
                break;
            }
            if self.active_players[self.player_to_act] {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_player_round() -> Round {
        Round::new(vec![true, true, true], 0)
    }

    #[test]
    fn test_round_starts_in_progress() {
        let round = three_player_round();
        assert!(round.in_progress());
        assert_eq!(round.player_to_act(), 0);
        assert_eq!(round.num_active_players(), 3);
    }

    #[test]
    fn test_passive_actions_close_the_orbit() {
        let mut round = three_player_round();
        round.action_taken(TurnAction::passive()).unwrap();
        assert!(round.in_progress());
        round.action_taken(TurnAction::passive()).unwrap();
        assert!(round.in_progress());
        round.action_taken(TurnAction::passive()).unwrap();
        assert!(!round.in_progress());
    }

    #[test]
    fn test_aggressive_action_reopens_the_orbit() {
        let mut round = three_player_round();
        round.action_taken(TurnAction::passive()).unwrap();
        round.action_taken(TurnAction::aggressive()).unwrap();
        assert_eq!(round.last_aggressive_actor(), 1);
        round.action_taken(TurnAction::passive()).unwrap();
        assert!(round.in_progress());
        round.action_taken(TurnAction::passive()).unwrap();
        assert!(!round.in_progress());
    }

    #[test]
    fn test_leaving_skips_the_seat_next_orbit() {
        let mut round = three_player_round();
        round.action_taken(TurnAction::aggressive()).unwrap();
        round.action_taken(TurnAction::leave()).unwrap();
        assert_eq!(round.num_active_players(), 2);
        assert_eq!(round.player_to_act(), 2);
        round.action_taken(TurnAction::aggressive()).unwrap();
        // Seat 1 left, so action returns straight to seat 0.
        assert_eq!(round.player_to_act(), 0);
    }

    #[test]
    fn test_everyone_folding_ends_the_round() {
        let mut round = three_player_round();
        round.action_taken(TurnAction::leave()).unwrap();
        round.action_taken(TurnAction::leave()).unwrap();
        assert!(!round.in_progress());
        assert_eq!(round.num_active_players(), 1);
    }

    #[test]
    fn test_orbit_stops_on_inactive_aggressor_seat() {
        // The aggressor goes all in and leaves the orbit; play still
        // stops when action returns to that seat.
        let mut round = three_player_round();
        round
            .action_taken(TurnAction::aggressive().and_leave())
            .unwrap();
        round.action_taken(TurnAction::passive()).unwrap();
        round.action_taken(TurnAction::passive()).unwrap();
        assert!(!round.in_progress());
    }

    #[test]
    fn test_action_after_round_over_is_rejected() {
        let mut round = Round::new(vec![true, true], 0);
        round.action_taken(TurnAction::passive()).unwrap();
        round.action_taken(TurnAction::passive()).unwrap();
        assert_eq!(
            round.action_taken(TurnAction::passive()),
            Err(GameError::BettingRoundNotInProgress)
        );
    }
}
