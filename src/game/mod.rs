//! Texas Hold'em rules engine.
//!
//! The engine is layered: [`Round`] knows turn order, [`BettingRound`]
//! adds chips and raise rules, [`Dealer`] runs one hand end to end,
//! and [`Table`] keeps seats, the button, and the deck across hands.
//! Hand strength lives in [`hand`], pot accounting in [`pot`].
//!
//! [`Round`]: round::Round
//! [`BettingRound`]: betting_round::BettingRound
//! [`Dealer`]: dealer::Dealer
//! [`Table`]: table::Table

pub mod betting_round;
pub mod constants;
pub mod dealer;
pub mod entities;
pub mod errors;
pub mod hand;
pub mod pot;
pub mod round;
pub mod table;
