use log::debug;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Serialize, Serializer};
use std::{fmt, net::SocketAddr, str::FromStr};
use thiserror::Error;

use super::{
    constants::{BUST_THRESHOLD, DECK_SIZE, MAX_NAME_LENGTH},
    functional,
};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Suit {
    Diamond,
    Heart,
    Spade,
    Club,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Self::Diamond, Self::Heart, Self::Spade, Self::Club];

    pub const fn symbol(self) -> char {
        match self {
            Self::Diamond => '♦',
            Self::Heart => '♥',
            Self::Spade => '♠',
            Self::Club => '♣',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|suit| suit.symbol() == symbol)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Rank {
    Ace,
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
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Self::Ace,
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
    ];

    /// The token used on the wire, e.g. `"A"`, `"10"`, `"K"`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Ace => "A",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rank| rank.token() == token)
    }

    pub const fn is_face(self) -> bool {
        matches!(self, Self::Jack | Self::Queen | Self::King)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A playing card. Cards carry no value of their own; see
/// [`functional::dealing_value`] and [`functional::display_value`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Eq, Error, PartialEq)]
pub enum ParseCardError {
    #[error("empty card")]
    Empty,
    #[error("unknown suit in {0:?}")]
    UnknownSuit(String),
    #[error("unknown rank in {0:?}")]
    UnknownRank(String),
}

impl FromStr for Card {
    type Err = ParseCardError;

    /// The suit is always the last character; everything before it is the
    /// rank token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let symbol = chars.next_back().ok_or(ParseCardError::Empty)?;
        let suit =
            Suit::from_symbol(symbol).ok_or_else(|| ParseCardError::UnknownSuit(s.to_string()))?;
        let rank = Rank::from_token(chars.as_str())
            .ok_or_else(|| ParseCardError::UnknownRank(s.to_string()))?;
        Ok(Self { rank, suit })
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Source of shuffles for a [`Deck`].
pub trait RandomSource {
    fn shuffle(&mut self, cards: &mut [Card]);
}

/// Thread-local OS-seeded randomness. Used by the real server.
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn shuffle(&mut self, cards: &mut [Card]) {
        cards.shuffle(&mut rand::rng());
    }
}

/// Reproducible shuffles for tests and replays.
#[derive(Clone, Debug)]
pub struct SeededRng(StdRng);

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRng {
    fn shuffle(&mut self, cards: &mut [Card]) {
        cards.shuffle(&mut self.0);
    }
}

/// All 52 cards, suit-major, unshuffled.
pub fn build_cards() -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            cards.push(Card::new(rank, suit));
        }
    }
    cards
}

/// The shoe for a round. The top of the deck is the end of `cards`.
#[derive(Debug)]
pub struct Deck<R = SystemRng> {
    cards: Vec<Card>,
    rng: R,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(SystemRng)
    }
}

impl<R: RandomSource> Deck<R> {
    /// A freshly built and shuffled deck.
    pub fn new(rng: R) -> Self {
        let mut deck = Self {
            cards: Vec::with_capacity(DECK_SIZE),
            rng,
        };
        deck.reset();
        deck
    }

    /// Replace whatever is left with a full, shuffled deck.
    pub fn reset(&mut self) {
        self.cards = build_cards();
        self.shuffle();
    }

    fn shuffle(&mut self) {
        self.rng.shuffle(&mut self.cards);
    }

    /// Take the top card. An empty deck silently becomes a new shoe first.
    pub fn draw(&mut self) -> Card {
        loop {
            if let Some(card) = self.cards.pop() {
                return card;
            }
            debug!("deck exhausted, starting a fresh shoe");
            self.reset();
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// A player's identity: the address their datagrams come from. A client
/// that reconnects from another address is a different player.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PlayerId(SocketAddr);

impl PlayerId {
    pub const fn addr(&self) -> SocketAddr {
        self.0
    }
}

impl From<SocketAddr> for PlayerId {
    fn from(value: SocketAddr) -> Self {
        Self(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Trims surrounding whitespace and caps the length. Inner colons and
    /// spaces are kept as typed.
    pub fn new(s: &str) -> Self {
        Self(s.trim().chars().take(MAX_NAME_LENGTH).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Where a player stands within the current round. Players registered
/// while no round is active are reported as `Playing`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Playing,
    Stopped,
    Busted,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Playing => "Jogando",
            Self::Stopped => "Parou",
            Self::Busted => "Perdeu",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerSession {
    pub name: Username,
    pub score: u32,
    pub hand: Vec<Card>,
    pub status: SessionStatus,
}

impl PlayerSession {
    pub fn new(name: Username) -> Self {
        Self {
            name,
            score: 0,
            hand: Vec::new(),
            status: SessionStatus::Playing,
        }
    }

    /// Clear everything but the name for a fresh round.
    pub fn reset(&mut self) {
        self.score = 0;
        self.hand.clear();
        self.status = SessionStatus::Playing;
    }

    /// Add a card to the hand and return the new score. Marks the session
    /// busted when the score passes the threshold.
    pub fn receive(&mut self, card: Card) -> u32 {
        self.hand.push(card);
        self.score += functional::dealing_value(&card);
        if self.score > BUST_THRESHOLD {
            self.status = SessionStatus::Busted;
        }
        self.score
    }

    pub fn stop(&mut self) {
        self.status = SessionStatus::Stopped;
    }

    pub fn is_busted(&self) -> bool {
        self.status == SessionStatus::Busted
    }

    /// Stopped or busted; either way no more cards this round.
    pub fn is_finished(&self) -> bool {
        self.status != SessionStatus::Playing
    }

    /// Human readable line answered to a `STATUS` query.
    pub fn status_line(&self) -> String {
        let cards = self
            .hand
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Nome: {}, Cartas: {}, Pontos: {}, Status: {}",
            self.name, cards, self.score, self.status
        )
    }
}
