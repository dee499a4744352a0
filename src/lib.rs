//! # Holdem Engine
//!
//! A headless Texas Hold'em rules engine: seats, blinds, betting
//! rounds, side pots, hand evaluation, and payouts, with no I/O or
//! player management attached. Drive it from a server, a bot, or a
//! test harness by feeding it player actions and reading the state
//! back out.
//!
//! ## Example
//!
//! ```
//! use holdem_engine::{Action, ForcedBets, Table};
//!
//! let mut table = Table::new(ForcedBets::blinds(25, 50), 9)?;
//! table.sit_down(0, 1000)?;
//! table.sit_down(1, 1000)?;
//! table.start_hand(None)?;
//! while table.betting_round_in_progress()? {
//!     table.action_taken(Action::Fold)?;
//! }
//! table.end_betting_round()?;
//! table.showdown()?;
//! # Ok::<(), holdem_engine::GameError>(())
//! ```

/// Core rules: betting rounds, the dealer, pots, and hand evaluation.
pub mod game;
pub use game::{
    constants::{self, DEFAULT_NUM_SEATS, MAX_SEATS, NUM_HOLE_CARDS},
    dealer::{Action, ActionRange, ActionSet, Dealer, Winner},
    entities::{
        Blinds, Card, CardRank, ChipRange, Chips, CommunityCards, Deck, ForcedBets, Player,
        RoundOfBetting, SeatIndex, Suit,
    },
    errors::GameError,
    hand::{Hand, HandRanking},
    pot::{Pot, PotManager},
    table::{AutomaticAction, AutomaticActionSet, Table},
};
