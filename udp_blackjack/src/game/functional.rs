//! Card valuation rules.
//!
//! The server and the client value aces differently: the dealer counts an
//! ace as 11 when scoring and detecting busts, while the client shows it as
//! 1 when listing a hand. Both tables are kept as they are.

use super::entities::{Card, Rank};

const fn rank_value(rank: Rank, ace: u32) -> u32 {
    match rank {
        Rank::Ace => ace,
        Rank::Two => 2,
        Rank::Three => 3,
        Rank::Four => 4,
        Rank::Five => 5,
        Rank::Six => 6,
        Rank::Seven => 7,
        Rank::Eight => 8,
        Rank::Nine => 9,
        Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
    }
}

/// Points a card adds to a player's score when dealt.
pub const fn dealing_value(card: &Card) -> u32 {
    rank_value(card.rank, 11)
}

/// Points a client shows next to a card in its own hand.
pub const fn display_value(card: &Card) -> u32 {
    rank_value(card.rank, 1)
}
