//! Pot accounting.
//!
//! At the end of every street the standing wagers are swept into pots.
//! Each sweep takes the smallest standing wager from every bettor, so
//! an all-in player's chips land in a pot they are eligible for and
//! everything above their stake spills into side pots behind them.
//! Folded wagers carry no eligibility; they are held in an aggregate
//! and folded into pots up to what each pot's contenders could win.

use serde::{Deserialize, Serialize};

use super::entities::{Chips, Player, SeatIndex};

/// A single pot: its size and the seats that can win it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pot {
    eligible_players: Vec<SeatIndex>,
    size: Chips,
}

impl Pot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn size(&self) -> Chips {
        self.size
    }

    /// Seats eligible to win this pot.
    #[must_use]
    pub fn eligible_players(&self) -> &[SeatIndex] {
        &self.eligible_players
    }

    pub(crate) fn add(&mut self, amount: Chips) {
        self.size += amount;
    }

    /// Sweep one layer of standing wagers into this pot.
    ///
    /// Takes the smallest nonzero wager among seats still in the hand
    /// from every such bettor, marks those bettors eligible, and
    /// returns the amount taken per player. With no wagers standing,
    /// every seat still in the hand becomes eligible and 0 is
    /// returned.
    pub(crate) fn collect_bets_from(
        &mut self,
        players: &mut [Option<Player>],
        in_hand: &[bool],
    ) -> Chips {
        let min_bet = players
            .iter()
            .zip(in_hand)
            .filter_map(|(player, in_hand)| match player {
                Some(player) if *in_hand && player.bet_size() != 0 => Some(player.bet_size()),
                _ => None,
            })
            .min();
        let Some(min_bet) = min_bet else {
            // Nobody wagered this street. Folds may still have thinned
            // the hand, so eligibility is rebuilt from scratch.
            self.eligible_players = players
                .iter()
                .zip(in_hand)
                .enumerate()
                .filter(|(_, (player, in_hand))| player.is_some() && **in_hand)
                .map(|(seat, _)| seat)
                .collect();
            return 0;
        };
        self.eligible_players.clear();
        for (seat, (player, in_hand)) in players.iter_mut().zip(in_hand).enumerate() {
            if let Some(player) = player {
                if *in_hand && player.bet_size() != 0 {
                    player.take_from_bet(min_bet);
                    self.size += min_bet;
                    self.eligible_players.push(seat);
                }
            }
        }
        min_bet
    }
}

/// All pots for one hand, built up street by street.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PotManager {
    pots: Vec<Pot>,
    aggregate_folded_bets: Chips,
}

impl PotManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pots: vec![Pot::new()],
            aggregate_folded_bets: 0,
        }
    }

    #[must_use]
    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    /// Record a wager abandoned by a folding player.
    pub(crate) fn bet_folded(&mut self, amount: Chips) {
        self.aggregate_folded_bets += amount;
    }

    /// Add forced pre-deal chips straight into the first pot.
    pub(crate) fn add_ante(&mut self, amount: Chips) {
        self.pots[0].add(amount);
    }

    /// Sweep all standing wagers, opening side pots while shorter
    /// stakes remain, and pay out the folded-bet aggregate as it fits.
    ///
    /// A player can win at most `n * x` from a pot they put `x` into
    /// alongside `n - 1` other contenders, so each pot absorbs folded
    /// bets only up to `eligible * min_bet`; the rest follows into the
    /// pots behind it.
    pub(crate) fn collect_bets_from(&mut self, players: &mut [Option<Player>], in_hand: &[bool]) {
        loop {
            let last = self.pots.len() - 1;
            let min_bet = self.pots[last].collect_bets_from(players, in_hand);
            let num_eligible = self.pots[last].eligible_players().len() as Chips;
            let consumed = self
                .aggregate_folded_bets
                .min(num_eligible * min_bet);
            self.pots[last].add(consumed);
            self.aggregate_folded_bets -= consumed;
            let bets_remain = players.iter().zip(in_hand).any(|(player, in_hand)| {
                matches!(player, Some(player) if *in_hand && player.bet_size() != 0)
            });
            if bets_remain {
                self.pots.push(Pot::new());
                continue;
            }
            if self.aggregate_folded_bets != 0 {
                self.pots[last].add(self.aggregate_folded_bets);
                self.aggregate_folded_bets = 0;
            }
            break;
        }
    }
}

impl Default for PotManager {
    fn default() -> Self {
        Self::new()
    }
}
