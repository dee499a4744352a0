//! Seven-card hand evaluation.
//!
//! Evaluation runs two passes over the seven cards. One pass groups
//! cards by rank occurrence and covers high card through four of a
//! kind; the other looks for suited and consecutive spans and covers
//! straights, flushes, and straight flushes. The stronger result wins.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::constants::{HAND_SIZE, NUM_HOLE_CARDS};
use super::entities::{Card, CardRank, CommunityCards};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum HandRanking {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl fmt::Display for HandRanking {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "high card",
            Self::Pair => "pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "straight",
            Self::Flush => "flush",
            Self::FullHouse => "full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "straight flush",
            Self::RoyalFlush => "royal flush",
        };
        write!(f, "{repr}")
    }
}

/// The best five-card hand formed from seven cards.
///
/// Hands order by ranking, then by a strength value that packs the
/// played ranks into a base-13 positional encoding, so two hands of the
/// same ranking compare the way the played cards would. The concrete
/// five cards do not take part in comparison.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Hand {
    ranking: HandRanking,
    strength: u32,
    cards: [Card; HAND_SIZE],
}

impl Hand {
    /// Evaluate a player's hole cards against a complete board.
    #[must_use]
    pub fn create(hole_cards: [Card; NUM_HOLE_CARDS], community_cards: &CommunityCards) -> Self {
        let board = community_cards.cards();
        debug_assert!(board.len() == 5, "all community cards must be dealt");
        Self::of([
            hole_cards[0],
            hole_cards[1],
            board[0],
            board[1],
            board[2],
            board[3],
            board[4],
        ])
    }

    /// Evaluate seven cards.
    #[must_use]
    pub fn of(cards: [Card; 7]) -> Self {
        let high_low = high_low_eval(cards);
        match straight_flush_eval(cards) {
            Some(suited) if suited > high_low => suited,
            _ => high_low,
        }
    }

    #[must_use]
    pub fn ranking(&self) -> HandRanking {
        self.ranking
    }

    #[must_use]
    pub fn strength(&self) -> u32 {
        self.strength
    }

    /// The five cards that play.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl PartialEq for Hand {
    fn eq(&self, other: &Self) -> bool {
        self.ranking == other.ranking && self.strength == other.strength
    }
}

impl Eq for Hand {}

impl PartialOrd for Hand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ranking
            .cmp(&other.ranking)
            .then(self.strength.cmp(&other.strength))
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ranking)
    }
}

fn first_five(cards: &[Card]) -> [Card; HAND_SIZE] {
    [cards[0], cards[1], cards[2], cards[3], cards[4]]
}

/// Length of the leading run of equal-ranked cards.
fn rank_run(cards: &[Card]) -> usize {
    let first = cards[0].rank;
    cards.iter().take_while(|card| card.rank == first).count()
}

/// Base-13 positional encoding of five played cards. Each rank group
/// takes one digit, most significant first, so a higher group always
/// dominates every group after it.
fn strength_of(cards: &[Card; HAND_SIZE]) -> u32 {
    let mut sum = 0;
    let mut multiplier = 13u32.pow(4);
    let mut rest: &[Card] = cards;
    loop {
        let count = rank_run(rest);
        sum += multiplier * u32::from(rest[0].rank.value());
        rest = &rest[count..];
        if rest.is_empty() {
            break;
        }
        multiplier /= 13;
    }
    sum
}

/// Rank-occurrence evaluation: high card through four of a kind.
fn high_low_eval(cards: [Card; 7]) -> Hand {
    let mut occurrences = [0u8; 13];
    for card in &cards {
        occurrences[usize::from(card.rank.value())] += 1;
    }
    let mut cards = cards;
    cards.sort_by(|c1, c2| {
        let occ1 = occurrences[usize::from(c1.rank.value())];
        let occ2 = occurrences[usize::from(c2.rank.value())];
        occ2.cmp(&occ1).then(c2.rank.cmp(&c1.rank))
    });

    let count = rank_run(&cards);
    let ranking = if count == 4 {
        // The three leftovers are occurrence-sorted; the best single
        // kicker is the highest of them by rank.
        cards[4..].sort_by(|c1, c2| c2.rank.cmp(&c1.rank));
        HandRanking::FourOfAKind
    } else if count == 3 {
        if rank_run(&cards[3..]) >= 2 {
            HandRanking::FullHouse
        } else {
            HandRanking::ThreeOfAKind
        }
    } else if count == 2 {
        if rank_run(&cards[2..]) == 2 {
            cards[4..].sort_by(|c1, c2| c2.rank.cmp(&c1.rank));
            HandRanking::TwoPair
        } else {
            HandRanking::Pair
        }
    } else {
        HandRanking::HighCard
    };

    let hand_cards = first_five(&cards);
    Hand {
        ranking,
        strength: strength_of(&hand_cards),
        cards: hand_cards,
    }
}

/// Suited and consecutive spans: straight, flush, straight flush.
/// Returns `None` when the cards hold none of those.
fn straight_flush_eval(cards: [Card; 7]) -> Option<Hand> {
    if let Some(suited) = suited_cards(cards) {
        if let Some(straight) = straight_span(&suited) {
            let (ranking, strength) = if straight[0].rank == CardRank::Ace {
                (HandRanking::RoyalFlush, 0)
            } else {
                (
                    HandRanking::StraightFlush,
                    u32::from(straight[0].rank.value()),
                )
            };
            return Some(Hand {
                ranking,
                strength,
                cards: straight,
            });
        }
        let hand_cards = first_five(&suited);
        return Some(Hand {
            ranking: HandRanking::Flush,
            strength: strength_of(&hand_cards),
            cards: hand_cards,
        });
    }

    let mut cards = cards;
    cards.sort_by(|c1, c2| c2.rank.cmp(&c1.rank));
    let mut deduped: Vec<Card> = Vec::with_capacity(cards.len());
    for card in cards {
        if deduped.last().is_none_or(|last| last.rank != card.rank) {
            deduped.push(card);
        }
    }
    if deduped.len() < 5 {
        return None;
    }
    straight_span(&deduped).map(|straight| Hand {
        ranking: HandRanking::Straight,
        strength: u32::from(straight[0].rank.value()),
        cards: straight,
    })
}

/// If five or more cards share a suit, return them sorted by rank
/// descending.
fn suited_cards(cards: [Card; 7]) -> Option<Vec<Card>> {
    let mut cards = cards;
    cards.sort_by(|c1, c2| c2.suit.cmp(&c1.suit).then(c2.rank.cmp(&c1.rank)));
    let mut first = 0;
    while first < cards.len() {
        let suit = cards[first].suit;
        let mut last = first + 1;
        while last < cards.len() && cards[last].suit == suit {
            last += 1;
        }
        if last - first >= 5 {
            return Some(cards[first..last].to_vec());
        }
        first = last;
    }
    None
}

/// Find five consecutive ranks in a rank-descending, rank-unique run of
/// cards. A four-card run down to the five combines with an ace on top
/// to form the wheel.
fn straight_span(cards: &[Card]) -> Option<[Card; HAND_SIZE]> {
    let mut first = 0;
    while first < cards.len() {
        let mut last = first + 1;
        while last < cards.len() && cards[last - 1].rank.value() == cards[last].rank.value() + 1 {
            last += 1;
        }
        if last - first >= 5 {
            return Some(first_five(&cards[first..]));
        }
        if last - first == 4 && cards[first].rank == CardRank::Five && cards[0].rank == CardRank::Ace
        {
            return Some([
                cards[first],
                cards[first + 1],
                cards[first + 2],
                cards[first + 3],
                cards[0],
            ]);
        }
        if cards.len() - last < 4 {
            return None;
        }
        first = last;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Suit;

    fn c(rank: CardRank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn test_high_card() {
        let hand = Hand::of([
            c(CardRank::Ace, Suit::Spades),
            c(CardRank::Jack, Suit::Hearts),
            c(CardRank::Nine, Suit::Diamonds),
            c(CardRank::Seven, Suit::Clubs),
            c(CardRank::Five, Suit::Spades),
            c(CardRank::Three, Suit::Hearts),
            c(CardRank::Two, Suit::Diamonds),
        ]);
        assert_eq!(hand.ranking(), HandRanking::HighCard);
        assert_eq!(hand.cards()[0].rank, CardRank::Ace);
    }

    #[test]
    fn test_four_of_a_kind_keeps_best_kicker() {
        let hand = Hand::of([
            c(CardRank::Ace, Suit::Spades),
            c(CardRank::Ace, Suit::Hearts),
            c(CardRank::Ace, Suit::Diamonds),
            c(CardRank::Ace, Suit::Clubs),
            c(CardRank::King, Suit::Spades),
            c(CardRank::Two, Suit::Diamonds),
            c(CardRank::Two, Suit::Clubs),
        ]);
        assert_eq!(hand.ranking(), HandRanking::FourOfAKind);
        assert_eq!(hand.cards()[4].rank, CardRank::King);
    }

    #[test]
    fn test_quads_kicker_decides_between_boards() {
        // Board quads; the player with the higher hole card wins.
        let board = [
            c(CardRank::Nine, Suit::Spades),
            c(CardRank::Nine, Suit::Hearts),
            c(CardRank::Nine, Suit::Diamonds),
            c(CardRank::Nine, Suit::Clubs),
            c(CardRank::Four, Suit::Spades),
        ];
        let ace_high = Hand::of([
            c(CardRank::Ace, Suit::Hearts),
            c(CardRank::Three, Suit::Clubs),
            board[0],
            board[1],
            board[2],
            board[3],
            board[4],
        ]);
        let king_high = Hand::of([
            c(CardRank::King, Suit::Hearts),
            c(CardRank::Queen, Suit::Clubs),
            board[0],
            board[1],
            board[2],
            board[3],
            board[4],
        ]);
        assert_eq!(ace_high.ranking(), HandRanking::FourOfAKind);
        assert!(ace_high > king_high);
    }

    #[test]
    fn test_two_triples_make_a_full_house() {
        let hand = Hand::of([
            c(CardRank::King, Suit::Spades),
            c(CardRank::King, Suit::Hearts),
            c(CardRank::King, Suit::Diamonds),
            c(CardRank::Queen, Suit::Spades),
            c(CardRank::Queen, Suit::Hearts),
            c(CardRank::Queen, Suit::Clubs),
            c(CardRank::Two, Suit::Diamonds),
        ]);
        assert_eq!(hand.ranking(), HandRanking::FullHouse);
        assert_eq!(hand.cards()[0].rank, CardRank::King);
        assert_eq!(hand.cards()[3].rank, CardRank::Queen);
    }

    #[test]
    fn test_full_house_over_flush() {
        let hand = Hand::of([
            c(CardRank::Eight, Suit::Spades),
            c(CardRank::Eight, Suit::Hearts),
            c(CardRank::Eight, Suit::Diamonds),
            c(CardRank::Three, Suit::Spades),
            c(CardRank::Three, Suit::Hearts),
            c(CardRank::Nine, Suit::Spades),
            c(CardRank::Two, Suit::Spades),
        ]);
        assert_eq!(hand.ranking(), HandRanking::FullHouse);
    }

    #[test]
    fn test_two_pair_keeps_best_kicker() {
        // Three pairs; the odd ace outkicks the third pair.
        let hand = Hand::of([
            c(CardRank::King, Suit::Spades),
            c(CardRank::King, Suit::Hearts),
            c(CardRank::Queen, Suit::Diamonds),
            c(CardRank::Queen, Suit::Clubs),
            c(CardRank::Three, Suit::Spades),
            c(CardRank::Three, Suit::Hearts),
            c(CardRank::Ace, Suit::Diamonds),
        ]);
        assert_eq!(hand.ranking(), HandRanking::TwoPair);
        assert_eq!(hand.cards()[4].rank, CardRank::Ace);
    }

    #[test]
    fn test_straight_uses_highest_run() {
        let hand = Hand::of([
            c(CardRank::Nine, Suit::Spades),
            c(CardRank::Eight, Suit::Hearts),
            c(CardRank::Seven, Suit::Diamonds),
            c(CardRank::Six, Suit::Clubs),
            c(CardRank::Five, Suit::Spades),
            c(CardRank::Four, Suit::Hearts),
            c(CardRank::King, Suit::Diamonds),
        ]);
        assert_eq!(hand.ranking(), HandRanking::Straight);
        assert_eq!(hand.strength(), u32::from(CardRank::Nine.value()));
    }

    #[test]
    fn test_wheel_straight() {
        let hand = Hand::of([
            c(CardRank::Ace, Suit::Spades),
            c(CardRank::Two, Suit::Hearts),
            c(CardRank::Three, Suit::Diamonds),
            c(CardRank::Four, Suit::Clubs),
            c(CardRank::Five, Suit::Spades),
            c(CardRank::Nine, Suit::Hearts),
            c(CardRank::Jack, Suit::Diamonds),
        ]);
        assert_eq!(hand.ranking(), HandRanking::Straight);
        assert_eq!(hand.strength(), u32::from(CardRank::Five.value()));
        assert_eq!(hand.cards()[4].rank, CardRank::Ace);
    }

    #[test]
    fn test_flush_beats_straight() {
        let hand = Hand::of([
            c(CardRank::Nine, Suit::Spades),
            c(CardRank::Eight, Suit::Spades),
            c(CardRank::Seven, Suit::Diamonds),
            c(CardRank::Six, Suit::Spades),
            c(CardRank::Five, Suit::Spades),
            c(CardRank::Four, Suit::Hearts),
            c(CardRank::Two, Suit::Spades),
        ]);
        assert_eq!(hand.ranking(), HandRanking::Flush);
    }

    #[test]
    fn test_steel_wheel() {
        let hand = Hand::of([
            c(CardRank::Ace, Suit::Clubs),
            c(CardRank::Two, Suit::Clubs),
            c(CardRank::Three, Suit::Clubs),
            c(CardRank::Four, Suit::Clubs),
            c(CardRank::Five, Suit::Clubs),
            c(CardRank::King, Suit::Hearts),
            c(CardRank::King, Suit::Diamonds),
        ]);
        assert_eq!(hand.ranking(), HandRanking::StraightFlush);
        assert_eq!(hand.strength(), u32::from(CardRank::Five.value()));
    }

    #[test]
    fn test_royal_flush() {
        let hand = Hand::of([
            c(CardRank::Ace, Suit::Hearts),
            c(CardRank::King, Suit::Hearts),
            c(CardRank::Queen, Suit::Hearts),
            c(CardRank::Jack, Suit::Hearts),
            c(CardRank::Ten, Suit::Hearts),
            c(CardRank::Two, Suit::Clubs),
            c(CardRank::Three, Suit::Diamonds),
        ]);
        assert_eq!(hand.ranking(), HandRanking::RoyalFlush);
        assert_eq!(hand.strength(), 0);
    }

    #[test]
    fn test_rankings_order_as_expected() {
        assert!(HandRanking::RoyalFlush > HandRanking::StraightFlush);
        assert!(HandRanking::FullHouse > HandRanking::Flush);
        assert!(HandRanking::Flush > HandRanking::Straight);
        assert!(HandRanking::Pair > HandRanking::HighCard);
    }

    #[test]
    fn test_same_ranking_compares_by_strength() {
        let pair_of_aces = Hand::of([
            c(CardRank::Ace, Suit::Spades),
            c(CardRank::Ace, Suit::Hearts),
            c(CardRank::Nine, Suit::Diamonds),
            c(CardRank::Seven, Suit::Clubs),
            c(CardRank::Five, Suit::Spades),
            c(CardRank::Three, Suit::Hearts),
            c(CardRank::Two, Suit::Diamonds),
        ]);
        let pair_of_kings = Hand::of([
            c(CardRank::King, Suit::Spades),
            c(CardRank::King, Suit::Hearts),
            c(CardRank::Nine, Suit::Diamonds),
            c(CardRank::Seven, Suit::Clubs),
            c(CardRank::Five, Suit::Spades),
            c(CardRank::Three, Suit::Hearts),
            c(CardRank::Two, Suit::Diamonds),
        ]);
        assert!(pair_of_aces > pair_of_kings);
    }
}
