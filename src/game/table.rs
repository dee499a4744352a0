//! Session management over the dealer.
//!
//! [`Table`] holds the chairs: who is seated with how many chips,
//! where the button sits, and the deck. Every hand it clones the
//! seated players into a fresh [`Dealer`], forwards actions to it, and
//! reconciles the results back into the chairs afterwards.
//!
//! Players who are not to act can queue an automatic action (fold,
//! check, call and so on) that fires when their turn comes around.
//! Queued actions that a raise makes stale are downgraded before they
//! fire, never upgraded.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::constants::{DEFAULT_NUM_SEATS, MAX_SEATS, NUM_HOLE_CARDS};
use super::dealer::{Action, ActionRange, Dealer, Winner};
use super::entities::{
    Card, Chips, CommunityCards, Deck, ForcedBets, Player, RoundOfBetting, SeatIndex,
};
use super::errors::GameError;
use super::pot::Pot;

/// An action queued to fire on the owner's next turn.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum AutomaticAction {
    Fold,
    CheckFold,
    Check,
    Call,
    CallAny,
    AllIn,
}

impl fmt::Display for AutomaticAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "fold",
            Self::CheckFold => "check/fold",
            Self::Check => "check",
            Self::Call => "call",
            Self::CallAny => "call any",
            Self::AllIn => "all in",
        };
        write!(f, "{repr}")
    }
}

/// The automatic actions a seat may queue right now.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AutomaticActionSet(HashSet<AutomaticAction>);

impl AutomaticActionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, action: AutomaticAction) {
        self.0.insert(action);
    }

    #[must_use]
    pub fn contains(&self, action: &AutomaticAction) -> bool {
        self.0.contains(action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AutomaticAction> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AutomaticActionSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{repr}")
    }
}

/// A table of seats that deals hand after hand.
#[derive(Debug)]
pub struct Table {
    num_seats: usize,
    table_players: Vec<Option<Player>>,
    deck: Deck,
    automatic_actions: Vec<Option<AutomaticAction>>,
    first_time_button: bool,
    button_set_manually: bool,
    button: SeatIndex,
    forced_bets: ForcedBets,
    dealer: Option<Dealer>,
    // Seats that changed occupancy since the hand started. Their table
    // stacks are authoritative and must not be overwritten from the
    // dealer's copies.
    staged: Vec<bool>,
}

impl Table {
    pub fn new(forced_bets: ForcedBets, num_seats: usize) -> Result<Self, GameError> {
        if num_seats == 0 || num_seats > MAX_SEATS {
            return Err(GameError::InvalidSeatCount(num_seats));
        }
        Ok(Self::with_seats(forced_bets, num_seats))
    }

    /// A table with the customary nine seats.
    #[must_use]
    pub fn with_default_seats(forced_bets: ForcedBets) -> Self {
        Self::with_seats(forced_bets, DEFAULT_NUM_SEATS)
    }

    fn with_seats(forced_bets: ForcedBets, num_seats: usize) -> Self {
        Self {
            num_seats,
            table_players: vec![None; num_seats],
            deck: Deck::new(),
            automatic_actions: vec![None; num_seats],
            first_time_button: true,
            button_set_manually: false,
            button: 0,
            forced_bets,
            dealer: None,
            staged: vec![false; num_seats],
        }
    }

    #[must_use]
    pub fn num_seats(&self) -> usize {
        self.num_seats
    }

    /// The players physically present, with their table stacks.
    #[must_use]
    pub fn seats(&self) -> &[Option<Player>] {
        &self.table_players
    }

    #[must_use]
    pub fn forced_bets(&self) -> ForcedBets {
        self.forced_bets
    }

    pub fn set_forced_bets(&mut self, forced_bets: ForcedBets) -> Result<(), GameError> {
        if self.hand_in_progress() {
            return Err(GameError::HandAlreadyInProgress);
        }
        self.forced_bets = forced_bets;
        Ok(())
    }

    #[must_use]
    pub fn hand_in_progress(&self) -> bool {
        self.dealer.as_ref().is_some_and(Dealer::hand_in_progress)
    }

    pub fn betting_round_in_progress(&self) -> Result<bool, GameError> {
        if !self.hand_in_progress() {
            return Err(GameError::HandNotInProgress);
        }
        Ok(self.dealer()?.betting_round_in_progress())
    }

    pub fn betting_rounds_completed(&self) -> Result<bool, GameError> {
        self.dealer()?.betting_rounds_completed()
    }

    pub fn player_to_act(&self) -> Result<SeatIndex, GameError> {
        self.dealer()?.player_to_act()
    }

    pub fn button(&self) -> Result<SeatIndex, GameError> {
        if !self.hand_in_progress() {
            return Err(GameError::HandNotInProgress);
        }
        Ok(self.dealer()?.button())
    }

    /// The hand's seat array as the dealer sees it, including folded
    /// and all-in players.
    pub fn hand_players(&self) -> Result<&[Option<Player>], GameError> {
        if !self.hand_in_progress() {
            return Err(GameError::HandNotInProgress);
        }
        Ok(self.dealer()?.players())
    }

    pub fn num_active_players(&self) -> Result<usize, GameError> {
        if !self.hand_in_progress() {
            return Err(GameError::HandNotInProgress);
        }
        Ok(self.dealer()?.num_active_players())
    }

    pub fn pots(&self) -> Result<&[Pot], GameError> {
        self.dealer()?.pots()
    }

    pub fn round_of_betting(&self) -> Result<RoundOfBetting, GameError> {
        self.dealer()?.round_of_betting()
    }

    pub fn community_cards(&self) -> Result<&CommunityCards, GameError> {
        if !self.hand_in_progress() {
            return Err(GameError::HandNotInProgress);
        }
        Ok(self.dealer()?.community_cards())
    }

    pub fn legal_actions(&self) -> Result<ActionRange, GameError> {
        self.dealer()?.legal_actions()
    }

    pub fn hole_cards(&self) -> Result<&[Option<[Card; NUM_HOLE_CARDS]>], GameError> {
        if !self.hand_in_progress() {
            return Err(GameError::HandNotInProgress);
        }
        Ok(self.dealer()?.hole_cards())
    }

    /// Winners per pot from the last showdown.
    pub fn winners(&self) -> Result<&[Vec<Winner>], GameError> {
        self.dealer()?.winners()
    }

    /// Seat a new player with `buy_in` chips.
    pub fn sit_down(&mut self, seat: SeatIndex, buy_in: Chips) -> Result<(), GameError> {
        if seat >= self.num_seats {
            return Err(GameError::InvalidSeat(seat));
        }
        if self.table_players[seat].is_some() {
            return Err(GameError::SeatOccupied(seat));
        }
        self.table_players[seat] = Some(Player::new(buy_in));
        self.staged[seat] = true;
        debug!("seat {seat} taken with a buy-in of {buy_in}");
        Ok(())
    }

    /// Remove a player from the table. Mid-hand, the player to act
    /// folds immediately; any other player still in the hand folds
    /// automatically when their turn comes.
    pub fn stand_up(&mut self, seat: SeatIndex) -> Result<(), GameError> {
        if seat >= self.num_seats {
            return Err(GameError::InvalidSeat(seat));
        }
        if self.table_players[seat].is_none() {
            return Err(GameError::SeatNotOccupied(seat));
        }
        if self.hand_in_progress() {
            if !self.betting_round_in_progress()? {
                return Err(GameError::BettingRoundNotInProgress);
            }
            if seat == self.player_to_act()? {
                self.action_taken(Action::Fold)?;
                self.table_players[seat] = None;
                self.staged[seat] = true;
            } else if self.dealer()?.is_in_hand(seat) {
                self.automatic_actions[seat] = Some(AutomaticAction::Fold);
                self.table_players[seat] = None;
                self.staged[seat] = true;
                if self.single_active_player_remaining()? {
                    self.act_passively()?;
                }
            } else {
                self.table_players[seat] = None;
                self.staged[seat] = true;
            }
        } else {
            self.table_players[seat] = None;
        }
        debug!("seat {seat} vacated");
        Ok(())
    }

    /// Deal the next hand. `button` pins the button to a specific seat
    /// instead of the normal rotation.
    pub fn start_hand(&mut self, button: Option<SeatIndex>) -> Result<(), GameError> {
        if self.hand_in_progress() {
            return Err(GameError::HandAlreadyInProgress);
        }
        if self.table_players.iter().filter(|seat| seat.is_some()).count() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        if let Some(seat) = button {
            if seat >= self.num_seats {
                return Err(GameError::InvalidSeat(seat));
            }
            self.button = seat;
            self.button_set_manually = true;
        }
        self.staged = vec![false; self.num_seats];
        self.automatic_actions = vec![None; self.num_seats];
        let hand_players = self.table_players.clone();
        self.increment_button(&hand_players);
        self.deck.fill_and_shuffle();
        let mut dealer = Dealer::new(hand_players, self.button, self.forced_bets);
        dealer.start_hand(&mut self.deck)?;
        self.dealer = Some(dealer);
        self.update_table_players();
        Ok(())
    }

    /// Apply the acting player's action, then let any queued automatic
    /// actions play out behind it.
    pub fn action_taken(&mut self, action: Action) -> Result<(), GameError> {
        self.dealer_mut()?.action_taken(action)?;
        self.run_automatic_actions()?;
        if self.dealer()?.betting_round_in_progress() && self.single_active_player_remaining()? {
            // One passive action is enough; the remaining automatic
            // folds unwind on their own behind it.
            self.act_passively()?;
        }
        self.update_table_players();
        Ok(())
    }

    pub fn end_betting_round(&mut self) -> Result<(), GameError> {
        let dealer = self.dealer.as_mut().ok_or(GameError::HandNotInProgress)?;
        dealer.end_betting_round(&mut self.deck)?;
        self.amend_automatic_actions();
        self.update_table_players();
        Ok(())
    }

    pub fn showdown(&mut self) -> Result<(), GameError> {
        self.dealer_mut()?.showdown()?;
        self.update_table_players();
        self.stand_up_busted_players();
        Ok(())
    }

    pub fn automatic_actions(&self) -> Result<&[Option<AutomaticAction>], GameError> {
        if !self.hand_in_progress() {
            return Err(GameError::HandNotInProgress);
        }
        Ok(&self.automatic_actions)
    }

    /// Only players seated since before the hand started may queue
    /// automatic actions.
    pub fn can_set_automatic_action(&self, seat: SeatIndex) -> Result<bool, GameError> {
        if seat >= self.num_seats {
            return Err(GameError::InvalidSeat(seat));
        }
        if !self.betting_round_in_progress()? {
            return Err(GameError::BettingRoundNotInProgress);
        }
        Ok(!self.staged[seat] && self.table_players[seat].is_some())
    }

    pub fn legal_automatic_actions(
        &self,
        seat: SeatIndex,
    ) -> Result<AutomaticActionSet, GameError> {
        if !self.can_set_automatic_action(seat)? {
            return Err(GameError::AutomaticActionNotAllowed);
        }
        let dealer = self.dealer()?;
        let biggest_bet = dealer.biggest_bet();
        let player = self.table_players[seat].ok_or(GameError::SeatNotOccupied(seat))?;

        let mut actions = AutomaticActionSet::new();
        actions.insert(AutomaticAction::Fold);
        actions.insert(AutomaticAction::AllIn);
        if biggest_bet == player.bet_size() {
            actions.insert(AutomaticAction::CheckFold);
            actions.insert(AutomaticAction::Check);
        } else {
            actions.insert(AutomaticAction::Call);
        }
        if biggest_bet < player.total_chips() {
            actions.insert(AutomaticAction::CallAny);
        }
        Ok(actions)
    }

    pub fn set_automatic_action(
        &mut self,
        seat: SeatIndex,
        action: AutomaticAction,
    ) -> Result<(), GameError> {
        if !self.can_set_automatic_action(seat)? {
            return Err(GameError::AutomaticActionNotAllowed);
        }
        if seat == self.player_to_act()? {
            return Err(GameError::AutomaticActionOutOfTurn);
        }
        if !self.legal_automatic_actions(seat)?.contains(&action) {
            return Err(GameError::IllegalAutomaticAction);
        }
        self.automatic_actions[seat] = Some(action);
        debug!("seat {seat} queued: {action}");
        Ok(())
    }

    fn dealer(&self) -> Result<&Dealer, GameError> {
        self.dealer.as_ref().ok_or(GameError::HandNotInProgress)
    }

    fn dealer_mut(&mut self) -> Result<&mut Dealer, GameError> {
        self.dealer.as_mut().ok_or(GameError::HandNotInProgress)
    }

    /// Play queued automatic actions until a seat without one is to
    /// act or the betting round ends.
    fn run_automatic_actions(&mut self) -> Result<(), GameError> {
        loop {
            if !self.dealer()?.betting_round_in_progress() {
                return Ok(());
            }
            self.amend_automatic_actions();
            let player_to_act = self.dealer()?.player_to_act()?;
            let Some(automatic_action) = self.automatic_actions[player_to_act].take() else {
                return Ok(());
            };
            self.take_automatic_action(automatic_action)?;
        }
    }

    fn take_automatic_action(
        &mut self,
        automatic_action: AutomaticAction,
    ) -> Result<(), GameError> {
        let dealer = self.dealer.as_mut().ok_or(GameError::HandNotInProgress)?;
        let seat = dealer.player_to_act()?;
        let player = dealer.players()[seat].ok_or(GameError::SeatNotOccupied(seat))?;
        let biggest_bet = dealer.biggest_bet();
        let bet_gap = biggest_bet - player.bet_size();
        let total_chips = player.total_chips();
        let action = match automatic_action {
            AutomaticAction::Fold => Action::Fold,
            AutomaticAction::CheckFold => {
                if bet_gap == 0 {
                    Action::Check
                } else {
                    Action::Fold
                }
            }
            AutomaticAction::Check => Action::Check,
            AutomaticAction::Call => Action::Call,
            AutomaticAction::CallAny => {
                if bet_gap == 0 {
                    Action::Check
                } else {
                    Action::Call
                }
            }
            AutomaticAction::AllIn => {
                if total_chips < biggest_bet {
                    Action::Call
                } else {
                    Action::Raise(total_chips)
                }
            }
        };
        dealer.action_taken(action)
    }

    /// Downgrade queued actions that a raise has made stale. A queued
    /// check cannot survive a bet; a queued call-any collapses to a
    /// call once the bet covers the whole stake. A plain call is never
    /// invalidated.
    fn amend_automatic_actions(&mut self) {
        let Some(dealer) = self.dealer.as_ref() else {
            return;
        };
        let biggest_bet = dealer.biggest_bet();
        let hand_players = dealer.players().to_vec();
        for (seat, queued) in self.automatic_actions.iter_mut().enumerate() {
            let Some(automatic_action) = queued else {
                continue;
            };
            let Some(player) = hand_players[seat] else {
                continue;
            };
            let bet_gap = biggest_bet.saturating_sub(player.bet_size());
            match automatic_action {
                AutomaticAction::CheckFold if bet_gap > 0 => {
                    *queued = Some(AutomaticAction::Fold);
                }
                AutomaticAction::Check if bet_gap > 0 => {
                    *queued = None;
                }
                AutomaticAction::CallAny if biggest_bet >= player.total_chips() => {
                    *queued = Some(AutomaticAction::Call);
                }
                _ => {}
            }
        }
    }

    /// Check if possible, call otherwise, for the player to act.
    fn act_passively(&mut self) -> Result<(), GameError> {
        let legal_actions = self.dealer()?.legal_actions()?;
        if legal_actions.actions.contains(&Action::Bet(0)) {
            self.action_taken(Action::Check)
        } else {
            self.action_taken(Action::Call)
        }
    }

    fn increment_button(&mut self, hand_players: &[Option<Player>]) {
        if self.button_set_manually {
            self.button_set_manually = false;
            self.first_time_button = false;
        } else if self.first_time_button {
            if let Some(seat) = hand_players.iter().position(Option::is_some) {
                self.button = seat;
            }
            self.first_time_button = false;
        } else {
            let offset = self.button + 1;
            self.button = hand_players
                .iter()
                .skip(offset)
                .position(Option::is_some)
                .map(|seat| seat + offset)
                .or_else(|| hand_players.iter().position(Option::is_some))
                .unwrap_or(0);
        }
    }

    /// Copy hand stacks back into the chairs, skipping seats whose
    /// occupancy changed mid-hand.
    fn update_table_players(&mut self) {
        let Some(dealer) = self.dealer.as_ref() else {
            return;
        };
        let hand_players = dealer.players().to_vec();
        for (seat, staged) in self.staged.iter().enumerate() {
            if !staged {
                if let Some(player) = hand_players[seat] {
                    self.table_players[seat] = Some(player);
                }
            }
        }
    }

    /// Whether exactly one seat that started this street is still
    /// contesting the pot and present at the table.
    fn single_active_player_remaining(&self) -> Result<bool, GameError> {
        let dealer = self.dealer()?;
        let num_active = dealer
            .betting_round_contenders()
            .iter()
            .zip(&self.staged)
            .filter(|(contender, staged)| **contender && !**staged)
            .count();
        Ok(num_active == 1)
    }

    fn stand_up_busted_players(&mut self) {
        debug_assert!(!self.hand_in_progress());
        for seat_player in &mut self.table_players {
            if matches!(seat_player, Some(player) if player.total_chips() == 0) {
                *seat_player = None;
            }
        }
    }
}
