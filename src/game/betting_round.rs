//! Chip-aware betting logic for a single street.
//!
//! [`BettingRound`] layers bet sizing rules over [`Round`]: it tracks
//! the biggest wager and the minimum raise, validates raise amounts,
//! and moves chips on the seat array handed to it. Seats themselves
//! belong to the dealer; this type only ever borrows them.

use serde::{Deserialize, Serialize};

use super::entities::{ChipRange, Chips, Player, SeatIndex};
use super::errors::GameError;
use super::round::{Round, TurnAction};

/// The three ways a betting round models a turn. Folding maps to
/// `Leave`, checking and calling both map to `Match`, and betting or
/// raising map to `Raise`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum BetAction {
    Leave,
    Match,
    Raise,
}

/// What the player to act may do: matching and leaving are always on
/// the table, raising only with chips behind the biggest bet.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BetRange {
    pub can_raise: bool,
    pub chip_range: ChipRange,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BettingRound {
    round: Round,
    biggest_bet: Chips,
    min_raise: Chips,
}

impl BettingRound {
    /// `active_players` flags the seats taking part in this street;
    /// the first to act must be one of them.
    #[must_use]
    pub fn new(
        active_players: Vec<bool>,
        first_to_act: SeatIndex,
        min_raise: Chips,
        biggest_bet: Chips,
    ) -> Self {
        debug_assert!(first_to_act < active_players.len());
        debug_assert!(active_players[first_to_act]);
        Self {
            round: Round::new(active_players, first_to_act),
            biggest_bet,
            min_raise,
        }
    }

    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.round.in_progress()
    }

    #[must_use]
    pub fn is_contested(&self) -> bool {
        self.round.is_contested()
    }

    #[must_use]
    pub fn player_to_act(&self) -> SeatIndex {
        self.round.player_to_act()
    }

    #[must_use]
    pub fn biggest_bet(&self) -> Chips {
        self.biggest_bet
    }

    #[must_use]
    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }

    #[must_use]
    pub fn active_players(&self) -> &[bool] {
        self.round.active_players()
    }

    #[must_use]
    pub fn num_active_players(&self) -> usize {
        self.round.num_active_players()
    }

    /// What the player to act can do with the chips they have.
    pub fn legal_actions(&self, players: &[Option<Player>]) -> Result<BetRange, GameError> {
        let seat = self.round.player_to_act();
        let player = players[seat]
            .as_ref()
            .ok_or(GameError::SeatNotOccupied(seat))?;
        let player_chips = player.total_chips();
        let can_raise = player_chips > self.biggest_bet;
        let chip_range = if can_raise {
            let min_bet = self.biggest_bet + self.min_raise;
            ChipRange::new(min_bet.min(player_chips), player_chips)
        } else {
            ChipRange::default()
        };
        Ok(BetRange {
            can_raise,
            chip_range,
        })
    }

    /// Apply the acting player's turn, moving their chips on `players`.
    /// `bet` is only read for `Raise` and names the turn's total wager.
    pub fn action_taken(
        &mut self,
        action: BetAction,
        bet: Chips,
        players: &mut [Option<Player>],
    ) -> Result<(), GameError> {
        let seat = self.round.player_to_act();
        match action {
            BetAction::Raise => {
                let player = players[seat]
                    .as_mut()
                    .ok_or(GameError::SeatNotOccupied(seat))?;
                if !self.is_raise_valid(bet, player) {
                    return Err(GameError::InvalidBet { bet });
                }
                player.bet(bet);
                self.min_raise = bet - self.biggest_bet;
                self.biggest_bet = bet;
                let turn = if player.stack() == 0 {
                    TurnAction::aggressive().and_leave()
                } else {
                    TurnAction::aggressive()
                };
                self.round.action_taken(turn)
            }
            BetAction::Match => {
                let player = players[seat]
                    .as_mut()
                    .ok_or(GameError::SeatNotOccupied(seat))?;
                player.bet(self.biggest_bet.min(player.total_chips()));
                let turn = if player.stack() == 0 {
                    TurnAction::passive().and_leave()
                } else {
                    TurnAction::passive()
                };
                self.round.action_taken(turn)
            }
            BetAction::Leave => self.round.action_taken(TurnAction::leave()),
        }
    }

    /// A raise must reach the minimum bet, except that a player whose
    /// whole stake falls between the biggest bet and the minimum bet
    /// may move all in.
    fn is_raise_valid(&self, bet: Chips, player: &Player) -> bool {
        let player_chips = player.total_chips();
        let min_bet = self.biggest_bet + self.min_raise;
        if player_chips > self.biggest_bet && player_chips < min_bet {
            return bet == player_chips;
        }
        bet >= min_bet && bet <= player_chips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats(stacks: &[Chips]) -> Vec<Option<Player>> {
        stacks.iter().map(|stack| Some(Player::new(*stack))).collect()
    }

    #[test]
    fn test_opening_bet_range() {
        let players = seats(&[1000, 1000, 1000]);
        let round = BettingRound::new(vec![true; players.len()], 0, 50, 0);
        let range = round.legal_actions(&players).unwrap();
        assert!(range.can_raise);
        assert_eq!(range.chip_range, ChipRange::new(50, 1000));
    }

    #[test]
    fn test_short_stack_cannot_raise() {
        let mut players = seats(&[1000, 200]);
        let mut round = BettingRound::new(vec![true; players.len()], 0, 50, 0);
        round.action_taken(BetAction::Raise, 300, &mut players).unwrap();
        let range = round.legal_actions(&players).unwrap();
        assert!(!range.can_raise);
    }

    #[test]
    fn test_raise_updates_bet_and_min_raise() {
        let mut players = seats(&[1000, 1000]);
        let mut round = BettingRound::new(vec![true; players.len()], 0, 50, 0);
        round.action_taken(BetAction::Raise, 200, &mut players).unwrap();
        assert_eq!(round.biggest_bet(), 200);
        assert_eq!(round.min_raise(), 200);
        let range = round.legal_actions(&players).unwrap();
        assert_eq!(range.chip_range, ChipRange::new(400, 1000));
    }

    #[test]
    fn test_undersized_raise_is_rejected() {
        let mut players = seats(&[1000, 1000]);
        let mut round = BettingRound::new(vec![true; players.len()], 0, 50, 0);
        assert_eq!(
            round.action_taken(BetAction::Raise, 49, &mut players),
            Err(GameError::InvalidBet { bet: 49 })
        );
    }

    #[test]
    fn test_all_in_below_min_raise_must_be_exact() {
        let mut players = seats(&[1000, 80]);
        let mut round = BettingRound::new(vec![true; players.len()], 0, 50, 0);
        round.action_taken(BetAction::Raise, 50, &mut players).unwrap();
        // Seat 1 has 80 total: above the bet of 50, below the minimum
        // bet of 100. Only a full shove is legal.
        assert_eq!(
            round.action_taken(BetAction::Raise, 79, &mut players),
            Err(GameError::InvalidBet { bet: 79 })
        );
        round.action_taken(BetAction::Raise, 80, &mut players).unwrap();
        assert_eq!(round.biggest_bet(), 80);
        assert_eq!(round.min_raise(), 30);
    }

    #[test]
    fn test_match_caps_at_total_chips() {
        let mut players = seats(&[1000, 300]);
        let mut round = BettingRound::new(vec![true; players.len()], 0, 50, 0);
        round.action_taken(BetAction::Raise, 500, &mut players).unwrap();
        round.action_taken(BetAction::Match, 0, &mut players).unwrap();
        let caller = players[1].unwrap();
        assert_eq!(caller.bet_size(), 300);
        assert_eq!(caller.stack(), 0);
        // The all-in caller left the orbit.
        assert_eq!(round.num_active_players(), 1);
    }

    #[test]
    fn test_call_and_check_end_a_heads_up_street() {
        // Blinds 25/50 already posted; the button acts first.
        let mut players = seats(&[100, 100]);
        players[0].as_mut().unwrap().bet(25);
        players[1].as_mut().unwrap().bet(50);
        let mut round = BettingRound::new(vec![true; players.len()], 0, 50, 50);
        round.action_taken(BetAction::Match, 0, &mut players).unwrap();
        assert!(round.in_progress());
        round.action_taken(BetAction::Match, 0, &mut players).unwrap();
        assert!(!round.in_progress());
        assert_eq!(players[0].unwrap().bet_size(), 50);
        assert_eq!(players[1].unwrap().bet_size(), 50);
    }

    #[test]
    fn test_fold_leaves_round() {
        let mut players = seats(&[1000, 1000, 1000]);
        let mut round = BettingRound::new(vec![true; players.len()], 0, 50, 0);
        round.action_taken(BetAction::Raise, 100, &mut players).unwrap();
        round.action_taken(BetAction::Leave, 0, &mut players).unwrap();
        assert_eq!(round.num_active_players(), 2);
        assert!(round.in_progress());
        round.action_taken(BetAction::Match, 0, &mut players).unwrap();
        assert!(!round.in_progress());
    }
}
