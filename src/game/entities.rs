use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{BOARD_SIZE, DECK_SIZE};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Clubs, Self::Diamonds, Self::Hearts, Self::Spades];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Clubs => "♣",
            Self::Diamonds => "♦",
            Self::Hearts => "♥",
            Self::Spades => "♠",
        };
        write!(f, "{repr}")
    }
}

/// Card ranks in ascending order. The discriminant doubles as the rank's
/// numeric value (deuce = 0 through ace = 12), which the hand evaluator
/// leans on for straight detection and strength encoding.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum CardRank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl CardRank {
    pub const ALL: [Self; 13] = [
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
        Self::Ace,
    ];

    /// Numeric value of the rank, deuce = 0 through ace = 12.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for CardRank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Ten => "T",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
            rank => return write!(f, "{}", rank.value() + 2),
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card {
    pub rank: CardRank,
    pub suit: Suit,
}

impl Card {
    #[must_use]
    pub const fn new(rank: CardRank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// A deck of 52 unique cards. Cards are drawn from the top; refilling
/// restores all 52 and reshuffles.
///
/// Shuffling uses [`rand::rng`], which is cryptographically strong.
#[derive(Debug)]
pub struct Deck {
    cards: [Card; DECK_SIZE],
    remaining: usize,
}

impl Deck {
    /// A full deck in construction order, not shuffled. Deterministic
    /// deals for tests.
    #[must_use]
    pub fn ordered() -> Self {
        let mut cards = [Card::new(CardRank::Two, Suit::Clubs); DECK_SIZE];
        let mut index = 0;
        for suit in Suit::ALL {
            for rank in CardRank::ALL {
                cards[index] = Card::new(rank, suit);
                index += 1;
            }
        }
        Self {
            cards,
            remaining: DECK_SIZE,
        }
    }

    /// A full, shuffled deck.
    #[must_use]
    pub fn new() -> Self {
        let mut deck = Self::ordered();
        deck.fill_and_shuffle();
        deck
    }

    /// Restore all 52 cards and reshuffle.
    pub fn fill_and_shuffle(&mut self) {
        self.remaining = DECK_SIZE;
        self.cards.shuffle(&mut rand::rng());
    }

    /// Draw the top card.
    ///
    /// # Panics
    ///
    /// Panics if the deck is empty. A single hand draws at most
    /// `2 * 23 + 5` cards, so the dealer never exhausts a freshly
    /// filled deck.
    pub fn draw(&mut self) -> Card {
        self.remaining -= 1;
        self.cards[self.remaining]
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for chip amounts. All bets and stacks are whole chips.
pub type Chips = u32;

/// Type alias for seat positions at the table.
pub type SeatIndex = usize;

/// An inclusive chip interval.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChipRange {
    pub min: Chips,
    pub max: Chips,
}

impl ChipRange {
    #[must_use]
    pub const fn new(min: Chips, max: Chips) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn contains(&self, amount: Chips) -> bool {
        self.min <= amount && amount <= self.max
    }
}

impl fmt::Display for ChipRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blinds {
    pub small: Chips,
    pub big: Chips,
}

impl fmt::Display for Blinds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.small, self.big)
    }
}

/// Bets collected before any cards are seen.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ForcedBets {
    pub ante: Option<Chips>,
    pub blinds: Blinds,
}

impl ForcedBets {
    #[must_use]
    pub const fn blinds(small: Chips, big: Chips) -> Self {
        Self {
            ante: None,
            blinds: Blinds { small, big },
        }
    }
}

/// A player's chips at one seat.
///
/// `total_chips` is the whole stake, including the amount currently
/// wagered; `bet_size` is what has been moved into the current street's
/// wager but not yet swept into a pot. `stack` is the difference.
///
/// Invariant: `0 <= bet_size <= total_chips`, and within a street a new
/// bet amount never shrinks a previous one.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    total: Chips,
    bet_size: Chips,
}

impl Player {
    #[must_use]
    pub const fn new(stack: Chips) -> Self {
        Self {
            total: stack,
            bet_size: 0,
        }
    }

    #[must_use]
    pub const fn stack(&self) -> Chips {
        self.total - self.bet_size
    }

    #[must_use]
    pub const fn bet_size(&self) -> Chips {
        self.bet_size
    }

    #[must_use]
    pub const fn total_chips(&self) -> Chips {
        self.total
    }

    pub fn add_to_stack(&mut self, amount: Chips) {
        self.total += amount;
    }

    pub fn take_from_stack(&mut self, amount: Chips) {
        debug_assert!(amount <= self.stack());
        self.total -= amount;
    }

    /// Place a wager of `amount` total for the current street.
    pub fn bet(&mut self, amount: Chips) {
        debug_assert!(amount <= self.total, "player cannot bet more than they have");
        debug_assert!(amount >= self.bet_size, "bets only increase within a street");
        self.bet_size = amount;
    }

    /// Sweep `amount` of the standing wager out of this player.
    pub fn take_from_bet(&mut self, amount: Chips) {
        debug_assert!(amount <= self.bet_size, "cannot take more than was bet");
        self.total -= amount;
        self.bet_size -= amount;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({} wagered)", self.total, self.bet_size)
    }
}

/// Streets of a hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum RoundOfBetting {
    Preflop,
    Flop,
    Turn,
    River,
}

impl RoundOfBetting {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Preflop => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn | Self::River => Self::River,
        }
    }

    /// Number of community cards on the board by the end of this street.
    #[must_use]
    pub const fn community_card_target(self) -> usize {
        match self {
            Self::Preflop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River => 5,
        }
    }
}

impl fmt::Display for RoundOfBetting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

/// The board: community cards revealed so far, at most five.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CommunityCards {
    cards: Vec<Card>,
}

impl CommunityCards {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn deal(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
        debug_assert!(self.cards.len() <= BOARD_SIZE);
    }
}

/// The next occupied seat clockwise of `seat`, wrapping around.
/// At least one seat must be occupied.
pub(crate) fn next_occupied_seat(players: &[Option<Player>], seat: SeatIndex) -> SeatIndex {
    let mut seat = seat;
    loop {
        seat += 1;
        if seat == players.len() {
            seat = 0;
        }
        if players[seat].is_some() {
            return seat;
        }
    }
}

/// The next set seat clockwise of `seat` in an occupancy mask, wrapping
/// around. At least one flag must be set.
pub(crate) fn next_flagged_seat(mask: &[bool], seat: SeatIndex) -> SeatIndex {
    let mut seat = seat;
    loop {
        seat += 1;
        if seat == mask.len() {
            seat = 0;
        }
        if mask[seat] {
            return seat;
        }
    }
}
