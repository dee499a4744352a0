use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::Chips;

/// Errors produced when a caller drives the game out of turn or with
/// an amount outside the legal range. Each one identifies a violated
/// precondition; none of them corrupt game state.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("a hand is already in progress")]
    HandAlreadyInProgress,
    #[error("no hand is in progress")]
    HandNotInProgress,
    #[error("a betting round is still in progress")]
    BettingRoundInProgress,
    #[error("no betting round is in progress")]
    BettingRoundNotInProgress,
    #[error("betting has already finished for this hand")]
    BettingRoundsCompleted,
    #[error("betting has not finished for this hand")]
    BettingRoundsNotCompleted,
    #[error("not enough players to start a hand")]
    NotEnoughPlayers,
    #[error("seat {0} does not exist at this table")]
    InvalidSeat(usize),
    #[error("seat {0} is already occupied")]
    SeatOccupied(usize),
    #[error("seat {0} is not occupied")]
    SeatNotOccupied(usize),
    #[error("a table cannot have {0} seats")]
    InvalidSeatCount(usize),
    #[error("that action is not legal right now")]
    IllegalAction,
    #[error("a bet of {bet} is outside the legal range")]
    InvalidBet { bet: Chips },
    #[error("automatic actions cannot be set right now")]
    AutomaticActionNotAllowed,
    #[error("the player to act cannot set an automatic action")]
    AutomaticActionOutOfTurn,
    #[error("that automatic action is not legal for this seat")]
    IllegalAutomaticAction,
}
