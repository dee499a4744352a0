//! Table and card constants.

/// Hard limit on the number of seats at a table.
pub const MAX_SEATS: usize = 23;

/// Seats at a table when the caller doesn't say otherwise.
pub const DEFAULT_NUM_SEATS: usize = 9;

/// Cards in a whole deck.
pub const DECK_SIZE: usize = 52;

/// Community cards dealt by the river.
pub const BOARD_SIZE: usize = 5;

/// Hole cards dealt to each player.
pub const NUM_HOLE_CARDS: usize = 2;

/// Cards in a ranked hand.
pub const HAND_SIZE: usize = 5;
