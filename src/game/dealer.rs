//! Hand orchestration.
//!
//! [`Dealer`] runs a single hand from forced bets to showdown: it
//! posts blinds, deals cards, validates player actions against the
//! betting rules, sweeps bets into pots between streets, and divides
//! the pots among the winners.
//!
//! The dealer owns a seat array for the whole hand. Folded and all-in
//! players keep their seat here so showdown can pay them; the
//! `in_hand` and `street_starters` masks track who still contests the
//! pot and who takes part in the current street.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use super::betting_round::{BetAction, BettingRound};
use super::constants::{DECK_SIZE, NUM_HOLE_CARDS};
use super::entities::{
    Card, ChipRange, Chips, CommunityCards, Deck, ForcedBets, Player, RoundOfBetting, SeatIndex,
    next_flagged_seat, next_occupied_seat,
};
use super::errors::GameError;
use super::hand::Hand;
use super::pot::{Pot, PotManager};

/// A player-facing action. The chip amount on `Bet` and `Raise` is the
/// total wager for the street, not the increment.
///
/// Equality and hashing ignore the chip amount, so a set of actions
/// answers "may this player raise at all" independently of the size.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(Chips),
    Raise(Chips),
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Fold => write!(f, "fold"),
            Self::Check => write!(f, "check"),
            Self::Call => write!(f, "call"),
            Self::Bet(amount) => write!(f, "bet (>= {amount})"),
            Self::Raise(amount) => write!(f, "raise (>= {amount})"),
        }
    }
}

/// An unordered set of legal actions.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionSet(HashSet<Action>);

impl ActionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, action: Action) {
        self.0.insert(action);
    }

    #[must_use]
    pub fn contains(&self, action: &Action) -> bool {
        self.0.contains(action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
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

impl FromIterator<Action> for ActionSet {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ActionSet {
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

/// Everything the player to act may do, with the legal wager sizes
/// when betting or raising is among them.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionRange {
    pub actions: ActionSet,
    pub chip_range: Option<ChipRange>,
}

impl ActionRange {
    /// Whether `action` is legal, including its chip amount for bets
    /// and raises.
    #[must_use]
    pub fn contains(&self, action: Action) -> bool {
        if !self.actions.contains(&action) {
            return false;
        }
        match action {
            Action::Bet(amount) | Action::Raise(amount) => self
                .chip_range
                .is_some_and(|chip_range| chip_range.contains(amount)),
            _ => true,
        }
    }
}

/// One winning seat at showdown: the hand that won and the hole cards
/// it was built from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Winner {
    pub seat: SeatIndex,
    pub hand: Hand,
    pub hole_cards: [Card; NUM_HOLE_CARDS],
}

/// Runs one hand of the game. Construct a fresh dealer per hand.
#[derive(Debug)]
pub struct Dealer {
    button: SeatIndex,
    community_cards: CommunityCards,
    hole_cards: Vec<Option<[Card; NUM_HOLE_CARDS]>>,
    players: Vec<Option<Player>>,
    in_hand: Vec<bool>,
    street_starters: Vec<bool>,
    betting_round: Option<BettingRound>,
    forced_bets: ForcedBets,
    hand_in_progress: bool,
    round_of_betting: RoundOfBetting,
    betting_rounds_completed: bool,
    pot_manager: PotManager,
    winners: Vec<Vec<Winner>>,
}

impl Dealer {
    #[must_use]
    pub fn new(players: Vec<Option<Player>>, button: SeatIndex, forced_bets: ForcedBets) -> Self {
        let num_seats = players.len();
        Self {
            button,
            community_cards: CommunityCards::new(),
            hole_cards: vec![None; num_seats],
            players,
            in_hand: vec![false; num_seats],
            street_starters: vec![false; num_seats],
            betting_round: None,
            forced_bets,
            hand_in_progress: false,
            round_of_betting: RoundOfBetting::Preflop,
            betting_rounds_completed: false,
            pot_manager: PotManager::new(),
            winners: Vec::new(),
        }
    }

    #[must_use]
    pub fn hand_in_progress(&self) -> bool {
        self.hand_in_progress
    }

    pub fn betting_rounds_completed(&self) -> Result<bool, GameError> {
        if !self.hand_in_progress {
            return Err(GameError::HandNotInProgress);
        }
        Ok(self.betting_rounds_completed)
    }

    pub fn player_to_act(&self) -> Result<SeatIndex, GameError> {
        self.betting_round
            .as_ref()
            .filter(|betting_round| betting_round.in_progress())
            .map(BettingRound::player_to_act)
            .ok_or(GameError::BettingRoundNotInProgress)
    }

    /// The seat array as the dealer sees it. Seats stay occupied for
    /// the whole hand, folded and all in included.
    #[must_use]
    pub fn players(&self) -> &[Option<Player>] {
        &self.players
    }

    /// Whether `seat` still contests the pot (dealt in and not folded).
    #[must_use]
    pub fn is_in_hand(&self, seat: SeatIndex) -> bool {
        self.in_hand.get(seat).copied().unwrap_or(false)
    }

    /// Seats still contesting the pot in the current betting round.
    #[must_use]
    pub fn betting_round_contenders(&self) -> Vec<bool> {
        self.street_starters
            .iter()
            .zip(&self.in_hand)
            .map(|(started, in_hand)| *started && *in_hand)
            .collect()
    }

    pub fn round_of_betting(&self) -> Result<RoundOfBetting, GameError> {
        if !self.hand_in_progress {
            return Err(GameError::HandNotInProgress);
        }
        Ok(self.round_of_betting)
    }

    #[must_use]
    pub fn num_active_players(&self) -> usize {
        self.betting_round
            .as_ref()
            .map_or(0, BettingRound::num_active_players)
    }

    #[must_use]
    pub fn biggest_bet(&self) -> Chips {
        self.betting_round
            .as_ref()
            .map_or(0, BettingRound::biggest_bet)
    }

    #[must_use]
    pub fn betting_round_in_progress(&self) -> bool {
        self.betting_round
            .as_ref()
            .is_some_and(BettingRound::in_progress)
    }

    #[must_use]
    pub fn is_contested(&self) -> bool {
        self.betting_round
            .as_ref()
            .is_some_and(BettingRound::is_contested)
    }

    /// What the player to act may do. Folding is always legal; the
    /// rest depends on the standing bet and the player's chips.
    pub fn legal_actions(&self) -> Result<ActionRange, GameError> {
        let betting_round = self
            .betting_round
            .as_ref()
            .filter(|betting_round| betting_round.in_progress())
            .ok_or(GameError::BettingRoundNotInProgress)?;
        let seat = betting_round.player_to_act();
        let player = self.players[seat]
            .as_ref()
            .ok_or(GameError::SeatNotOccupied(seat))?;
        let bet_range = betting_round.legal_actions(&self.players)?;

        let mut actions = ActionSet::new();
        actions.insert(Action::Fold);
        if betting_round.biggest_bet() == player.bet_size() {
            actions.insert(Action::Check);
            if bet_range.can_raise {
                // A player who can check with a standing wager is the
                // big blind; anything more is a raise, not a bet.
                if player.bet_size() > 0 {
                    actions.insert(Action::Raise(bet_range.chip_range.min));
                } else {
                    actions.insert(Action::Bet(bet_range.chip_range.min));
                }
            }
        } else {
            actions.insert(Action::Call);
            if bet_range.can_raise {
                actions.insert(Action::Raise(bet_range.chip_range.min));
            }
        }
        Ok(ActionRange {
            actions,
            chip_range: bet_range.can_raise.then_some(bet_range.chip_range),
        })
    }

    pub fn pots(&self) -> Result<&[Pot], GameError> {
        if !self.hand_in_progress {
            return Err(GameError::HandNotInProgress);
        }
        Ok(self.pot_manager.pots())
    }

    #[must_use]
    pub fn button(&self) -> SeatIndex {
        self.button
    }

    #[must_use]
    pub fn hole_cards(&self) -> &[Option<[Card; NUM_HOLE_CARDS]>] {
        &self.hole_cards
    }

    #[must_use]
    pub fn community_cards(&self) -> &CommunityCards {
        &self.community_cards
    }

    /// Winners per pot, best hand first, filled in by [`showdown`].
    /// Empty when the hand ended without a contested showdown.
    ///
    /// [`showdown`]: Self::showdown
    pub fn winners(&self) -> Result<&[Vec<Winner>], GameError> {
        if self.hand_in_progress {
            return Err(GameError::HandAlreadyInProgress);
        }
        Ok(&self.winners)
    }

    /// Collect forced bets, deal hole cards, and open the preflop
    /// betting round. The deck must be full.
    pub fn start_hand(&mut self, deck: &mut Deck) -> Result<(), GameError> {
        if self.hand_in_progress {
            return Err(GameError::HandAlreadyInProgress);
        }
        let num_players = self.players.iter().filter(|seat| seat.is_some()).count();
        if num_players < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        debug_assert!(deck.remaining() == DECK_SIZE, "deck must be whole");

        self.betting_rounds_completed = false;
        self.round_of_betting = RoundOfBetting::Preflop;
        self.winners.clear();
        self.in_hand = self.players.iter().map(Option::is_some).collect();
        self.street_starters = self.in_hand.clone();

        self.collect_ante();
        let big_blind_seat = self.post_blinds(num_players);
        let first_to_act = next_occupied_seat(&self.players, big_blind_seat);
        self.deal_hole_cards(deck);

        let num_with_chips = self
            .players
            .iter()
            .flatten()
            .filter(|player| player.stack() != 0)
            .count();
        self.betting_round = if num_with_chips > 1 {
            let big_blind = self.forced_bets.blinds.big;
            Some(BettingRound::new(
                self.in_hand.clone(),
                first_to_act,
                big_blind,
                big_blind,
            ))
        } else {
            None
        };
        self.hand_in_progress = true;
        debug!(
            "hand started: button seat {}, {num_players} players, blinds {}",
            self.button, self.forced_bets.blinds
        );
        Ok(())
    }

    /// Apply the acting player's action. The action must be legal per
    /// [`legal_actions`].
    ///
    /// [`legal_actions`]: Self::legal_actions
    pub fn action_taken(&mut self, action: Action) -> Result<(), GameError> {
        if !self.legal_actions()?.contains(action) {
            return Err(GameError::IllegalAction);
        }
        let betting_round = self
            .betting_round
            .as_mut()
            .ok_or(GameError::BettingRoundNotInProgress)?;
        let seat = betting_round.player_to_act();
        debug!("seat {seat}: {action}");
        match action {
            Action::Check | Action::Call => {
                betting_round.action_taken(BetAction::Match, 0, &mut self.players)
            }
            Action::Bet(amount) | Action::Raise(amount) => {
                betting_round.action_taken(BetAction::Raise, amount, &mut self.players)
            }
            Action::Fold => {
                let player = self.players[seat]
                    .as_mut()
                    .ok_or(GameError::SeatNotOccupied(seat))?;
                let standing_bet = player.bet_size();
                player.take_from_bet(standing_bet);
                self.pot_manager.bet_folded(standing_bet);
                self.in_hand[seat] = false;
                betting_round.action_taken(BetAction::Leave, 0, &mut self.players)
            }
        }
    }

    /// Sweep the street's bets into the pots and either open the next
    /// street or mark betting complete. With at most one player left
    /// able to act, any remaining community cards come out at once and
    /// play skips ahead to showdown.
    pub fn end_betting_round(&mut self, deck: &mut Deck) -> Result<(), GameError> {
        if !self.hand_in_progress {
            return Err(GameError::HandNotInProgress);
        }
        if self.betting_rounds_completed {
            return Err(GameError::BettingRoundsCompleted);
        }
        if self.betting_round_in_progress() {
            return Err(GameError::BettingRoundInProgress);
        }

        // Sweep against the fold mask, not the street's starters: an
        // all-in seat no longer takes a turn but must stay eligible
        // for the pots it funded.
        self.pot_manager
            .collect_bets_from(&mut self.players, &self.in_hand);
        let num_active = self.num_active_players();
        if num_active <= 1 {
            self.round_of_betting = RoundOfBetting::River;
            let pots = self.pot_manager.pots();
            let uncontested = pots.len() == 1 && pots[0].eligible_players().len() == 1;
            // An uncontested pot needs no further cards; everyone else
            // gets a full board to evaluate against.
            if !uncontested {
                self.deal_community_cards(deck);
            }
            self.betting_rounds_completed = true;
            debug!("betting finished early with {num_active} players able to act");
        } else if self.round_of_betting < RoundOfBetting::River {
            self.round_of_betting = self.round_of_betting.next();
            self.street_starters = self
                .players
                .iter()
                .zip(&self.in_hand)
                .map(|(player, in_hand)| {
                    matches!(player, Some(player) if *in_hand && player.total_chips() != 0)
                })
                .collect();
            let first_to_act = next_flagged_seat(&self.street_starters, self.button);
            let big_blind = self.forced_bets.blinds.big;
            self.betting_round = Some(BettingRound::new(
                self.street_starters.clone(),
                first_to_act,
                big_blind,
                0,
            ));
            self.deal_community_cards(deck);
            debug!("dealing the {}", self.round_of_betting);
        } else {
            self.betting_rounds_completed = true;
            debug!("betting rounds completed");
        }
        Ok(())
    }

    /// Pay out the pots and end the hand. An uncontested pot goes to
    /// its sole eligible seat without evaluating any hands; otherwise
    /// each pot is split among the best hands among its eligible
    /// seats, odd chips going one at a time clockwise from the button.
    pub fn showdown(&mut self) -> Result<(), GameError> {
        if !self.hand_in_progress {
            return Err(GameError::HandNotInProgress);
        }
        if self.betting_round_in_progress() {
            return Err(GameError::BettingRoundInProgress);
        }
        if !self.betting_rounds_completed {
            return Err(GameError::BettingRoundsNotCompleted);
        }
        debug_assert!(self.round_of_betting == RoundOfBetting::River);
        self.hand_in_progress = false;

        let pots = self.pot_manager.pots().to_vec();
        if pots.len() == 1 && pots[0].eligible_players().len() == 1 {
            let seat = pots[0].eligible_players()[0];
            if let Some(player) = self.players[seat].as_mut() {
                player.add_to_stack(pots[0].size());
            }
            debug!("uncontested pot of {} paid to seat {seat}", pots[0].size());
            return Ok(());
        }

        for pot in &pots {
            let mut results: Vec<(SeatIndex, Hand, [Card; NUM_HOLE_CARDS])> = Vec::new();
            for &seat in pot.eligible_players() {
                if let Some(hole_cards) = self.hole_cards[seat] {
                    let hand = Hand::create(hole_cards, &self.community_cards);
                    results.push((seat, hand, hole_cards));
                }
            }
            if results.is_empty() {
                continue;
            }
            results.sort_by(|(_, first, _), (_, second, _)| second.cmp(first));

            let best = results[0].1;
            let num_winners = results.iter().take_while(|(_, hand, _)| *hand == best).count();
            let payout = pot.size() / num_winners as Chips;
            let mut odd_chips = pot.size() % num_winners as Chips;
            let winning = &results[..num_winners];
            for &(seat, _, _) in winning {
                if let Some(player) = self.players[seat].as_mut() {
                    player.add_to_stack(payout);
                }
                debug!("seat {seat} wins {payout} with a {best}");
            }
            self.winners.push(
                winning
                    .iter()
                    .map(|&(seat, hand, hole_cards)| Winner {
                        seat,
                        hand,
                        hole_cards,
                    })
                    .collect(),
            );

            if odd_chips != 0 {
                let mut winner_seats = vec![false; self.players.len()];
                for &(seat, _, _) in winning {
                    winner_seats[seat] = true;
                }
                let mut seat = self.button;
                while odd_chips != 0 {
                    seat = next_flagged_seat(&winner_seats, seat);
                    if let Some(player) = self.players[seat].as_mut() {
                        player.add_to_stack(1);
                    }
                    odd_chips -= 1;
                }
            }
        }
        Ok(())
    }

    fn collect_ante(&mut self) {
        let Some(ante) = self.forced_bets.ante else {
            return;
        };
        let mut total = 0;
        for player in self.players.iter_mut().flatten() {
            let ante = ante.min(player.total_chips());
            player.take_from_stack(ante);
            total += ante;
        }
        self.pot_manager.add_ante(total);
    }

    /// Post the blinds, capped at each player's stake. Returns the big
    /// blind's seat. Heads up, the button posts the small blind.
    fn post_blinds(&mut self, num_players: usize) -> SeatIndex {
        let mut seat = self.button;
        if num_players != 2 {
            seat = next_occupied_seat(&self.players, seat);
        }
        if let Some(player) = self.players[seat].as_mut() {
            player.bet(self.forced_bets.blinds.small.min(player.total_chips()));
        }
        seat = next_occupied_seat(&self.players, seat);
        if let Some(player) = self.players[seat].as_mut() {
            player.bet(self.forced_bets.blinds.big.min(player.total_chips()));
        }
        seat
    }

    fn deal_hole_cards(&mut self, deck: &mut Deck) {
        for (seat, player) in self.players.iter().enumerate() {
            if player.is_some() {
                self.hole_cards[seat] = Some([deck.draw(), deck.draw()]);
            }
        }
    }

    /// Deal the board out to the current street's card count.
    fn deal_community_cards(&mut self, deck: &mut Deck) {
        let target = self.round_of_betting.community_card_target();
        let num_cards = target - self.community_cards.cards().len();
        let cards: Vec<Card> = (0..num_cards).map(|_| deck.draw()).collect();
        self.community_cards.deal(cards);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{CardRank, Suit};

    fn seats(stacks: &[Chips]) -> Vec<Option<Player>> {
        stacks.iter().map(|stack| Some(Player::new(*stack))).collect()
    }

    fn three_handed() -> (Dealer, Deck) {
        let dealer = Dealer::new(seats(&[1000, 1000, 1000]), 0, ForcedBets::blinds(25, 50));
        (dealer, Deck::ordered())
    }

    #[test]
    fn test_start_hand_posts_blinds() {
        let (mut dealer, mut deck) = three_handed();
        dealer.start_hand(&mut deck).unwrap();
        let players = dealer.players();
        assert_eq!(players[1].unwrap().bet_size(), 25);
        assert_eq!(players[2].unwrap().bet_size(), 50);
        assert_eq!(dealer.player_to_act().unwrap(), 0);
        assert_eq!(dealer.biggest_bet(), 50);
    }

    #[test]
    fn test_start_hand_deals_in_seat_order() {
        let (mut dealer, mut deck) = three_handed();
        dealer.start_hand(&mut deck).unwrap();
        let hole_cards = dealer.hole_cards();
        assert_eq!(
            hole_cards[0].unwrap(),
            [
                Card::new(CardRank::Ace, Suit::Spades),
                Card::new(CardRank::King, Suit::Spades),
            ]
        );
        assert_eq!(
            hole_cards[1].unwrap(),
            [
                Card::new(CardRank::Queen, Suit::Spades),
                Card::new(CardRank::Jack, Suit::Spades),
            ]
        );
        assert_eq!(
            hole_cards[2].unwrap(),
            [
                Card::new(CardRank::Ten, Suit::Spades),
                Card::new(CardRank::Nine, Suit::Spades),
            ]
        );
    }

    #[test]
    fn test_heads_up_button_posts_small_blind_and_acts_first() {
        let mut dealer = Dealer::new(seats(&[1000, 1000]), 0, ForcedBets::blinds(25, 50));
        let mut deck = Deck::ordered();
        dealer.start_hand(&mut deck).unwrap();
        assert_eq!(dealer.players()[0].unwrap().bet_size(), 25);
        assert_eq!(dealer.players()[1].unwrap().bet_size(), 50);
        assert_eq!(dealer.player_to_act().unwrap(), 0);
    }

    #[test]
    fn test_start_hand_requires_two_players() {
        let mut dealer = Dealer::new(seats(&[1000]), 0, ForcedBets::blinds(25, 50));
        let mut deck = Deck::ordered();
        assert_eq!(
            dealer.start_hand(&mut deck),
            Err(GameError::NotEnoughPlayers)
        );
    }

    #[test]
    fn test_preflop_legal_actions_facing_the_blind() {
        let (mut dealer, mut deck) = three_handed();
        dealer.start_hand(&mut deck).unwrap();
        let range = dealer.legal_actions().unwrap();
        assert!(range.contains(Action::Fold));
        assert!(range.contains(Action::Call));
        assert!(range.contains(Action::Raise(100)));
        assert!(range.contains(Action::Raise(1000)));
        assert!(!range.contains(Action::Raise(99)));
        assert!(!range.contains(Action::Check));
        assert!(!range.contains(Action::Bet(100)));
    }

    #[test]
    fn test_big_blind_may_check_or_raise() {
        let (mut dealer, mut deck) = three_handed();
        dealer.start_hand(&mut deck).unwrap();
        dealer.action_taken(Action::Call).unwrap();
        dealer.action_taken(Action::Call).unwrap();
        assert_eq!(dealer.player_to_act().unwrap(), 2);
        let range = dealer.legal_actions().unwrap();
        assert!(range.contains(Action::Check));
        assert!(range.contains(Action::Raise(100)));
        assert!(!range.contains(Action::Bet(100)));
        assert!(!range.contains(Action::Call));
    }

    #[test]
    fn test_illegal_action_is_rejected() {
        let (mut dealer, mut deck) = three_handed();
        dealer.start_hand(&mut deck).unwrap();
        assert_eq!(
            dealer.action_taken(Action::Check),
            Err(GameError::IllegalAction)
        );
        assert_eq!(
            dealer.action_taken(Action::Raise(99)),
            Err(GameError::IllegalAction)
        );
    }

    #[test]
    fn test_folds_end_the_hand_without_a_board() {
        let (mut dealer, mut deck) = three_handed();
        dealer.start_hand(&mut deck).unwrap();
        dealer.action_taken(Action::Fold).unwrap();
        dealer.action_taken(Action::Fold).unwrap();
        assert!(!dealer.betting_round_in_progress());
        dealer.end_betting_round(&mut deck).unwrap();
        assert!(dealer.betting_rounds_completed().unwrap());
        assert!(dealer.community_cards().cards().is_empty());
        dealer.showdown().unwrap();
        // The big blind takes back their own 50 plus the small blind.
        assert_eq!(dealer.players()[2].unwrap().total_chips(), 1025);
        assert!(dealer.winners().unwrap().is_empty());
    }

    #[test]
    fn test_calls_advance_to_the_flop() {
        let (mut dealer, mut deck) = three_handed();
        dealer.start_hand(&mut deck).unwrap();
        dealer.action_taken(Action::Call).unwrap();
        dealer.action_taken(Action::Call).unwrap();
        dealer.action_taken(Action::Check).unwrap();
        assert!(!dealer.betting_round_in_progress());
        dealer.end_betting_round(&mut deck).unwrap();
        assert_eq!(dealer.round_of_betting().unwrap(), RoundOfBetting::Flop);
        assert_eq!(dealer.community_cards().cards().len(), 3);
        assert_eq!(dealer.pots().unwrap()[0].size(), 150);
        // Postflop action starts left of the button.
        assert_eq!(dealer.player_to_act().unwrap(), 1);
        assert_eq!(dealer.biggest_bet(), 0);
    }

    #[test]
    fn test_fold_forfeits_the_standing_bet() {
        let (mut dealer, mut deck) = three_handed();
        dealer.start_hand(&mut deck).unwrap();
        dealer.action_taken(Action::Raise(200)).unwrap();
        dealer.action_taken(Action::Fold).unwrap();
        dealer.action_taken(Action::Call).unwrap();
        dealer.end_betting_round(&mut deck).unwrap();
        // 200 each from seats 0 and 2 plus the folded small blind.
        assert_eq!(dealer.pots().unwrap()[0].size(), 425);
        assert_eq!(dealer.players()[1].unwrap().total_chips(), 975);
    }

    #[test]
    fn test_showdown_settles_a_hand_exactly_once() {
        let (mut dealer, mut deck) = three_handed();
        dealer.start_hand(&mut deck).unwrap();
        dealer.action_taken(Action::Fold).unwrap();
        dealer.action_taken(Action::Fold).unwrap();
        dealer.end_betting_round(&mut deck).unwrap();
        dealer.showdown().unwrap();
        // Paying the pots twice would mint chips.
        assert_eq!(dealer.showdown(), Err(GameError::HandNotInProgress));
        assert_eq!(dealer.players()[2].unwrap().total_chips(), 1025);
    }

    #[test]
    fn test_all_in_blind_creates_no_betting_round() {
        let mut dealer = Dealer::new(seats(&[50, 50]), 0, ForcedBets::blinds(25, 50));
        let mut deck = Deck::ordered();
        dealer.start_hand(&mut deck).unwrap();
        // Both players are all in through the blinds; betting never
        // opens and the hand runs straight out.
        assert!(!dealer.betting_round_in_progress());
        dealer.end_betting_round(&mut deck).unwrap();
        assert!(dealer.betting_rounds_completed().unwrap());
        assert_eq!(dealer.community_cards().cards().len(), 5);
    }

    #[test]
    fn test_short_blind_is_capped_at_the_stack() {
        let mut dealer = Dealer::new(seats(&[1000, 10, 1000]), 0, ForcedBets::blinds(25, 50));
        let mut deck = Deck::ordered();
        dealer.start_hand(&mut deck).unwrap();
        assert_eq!(dealer.players()[1].unwrap().bet_size(), 10);
        assert_eq!(dealer.players()[1].unwrap().stack(), 0);
    }

    #[test]
    fn test_ante_is_collected_into_the_first_pot() {
        let forced_bets = ForcedBets {
            ante: Some(10),
            blinds: crate::game::entities::Blinds { small: 25, big: 50 },
        };
        let mut dealer = Dealer::new(seats(&[1000, 1000, 1000]), 0, forced_bets);
        let mut deck = Deck::ordered();
        dealer.start_hand(&mut deck).unwrap();
        assert_eq!(dealer.pots().unwrap()[0].size(), 30);
        assert_eq!(dealer.players()[0].unwrap().total_chips(), 990);
    }

    #[test]
    fn test_action_range_checks_raise_amounts() {
        let mut actions = ActionSet::new();
        actions.insert(Action::Fold);
        actions.insert(Action::Raise(100));
        let range = ActionRange {
            actions,
            chip_range: Some(ChipRange::new(100, 1000)),
        };
        assert!(range.contains(Action::Raise(100)));
        assert!(range.contains(Action::Raise(550)));
        assert!(!range.contains(Action::Raise(1001)));
        assert!(range.contains(Action::Fold));
        assert!(!range.contains(Action::Check));
    }
}
