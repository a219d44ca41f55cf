//! Round state machine.
//!
//! A single [`RoundManager`] owns the deck, the round counter and every
//! player session. Each command locks the whole round for its entire
//! duration, so bust and round-end detection always see a consistent view
//! of all players. Commands never send anything themselves; they return an
//! [`Outbox`] of notifications for the caller to deliver once the lock is
//! released.

use log::{debug, info, warn};
use serde::Serialize;
use std::{
    collections::HashMap,
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};
use thiserror::Error;

use super::{
    constants::{BUST_THRESHOLD, INITIAL_CARDS, MAX_PLAYERS, MIN_PLAYERS},
    entities::{Card, Deck, PlayerId, PlayerSession, RandomSource, SessionStatus, SystemRng, Username},
};

/// Answer to a `STATUS` query from an address with no session.
pub const NOT_IN_ROUND: &str = "Você não está em uma partida ativa";

/// Rejections sent back to the player whose command couldn't be applied.
/// None of them change any state.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum UserError {
    #[error("Você já está no jogo!")]
    AlreadyJoined,
    #[error("Partida em andamento, aguarde a próxima")]
    RoundInProgress,
    #[error("Não há jogo ativo")]
    NoActiveRound,
    #[error("Você já finalizou sua jogada")]
    TurnFinished,
    #[error("Você já perdeu por estourar 21 pontos")]
    AlreadyBusted,
    #[error("Nome inválido")]
    InvalidName,
    #[error("Comando desconhecido: {0}")]
    UnknownCommand(String),
    #[error("Mensagem inválida")]
    InvalidMessage,
}

/// Table talk: things that happened, told to one or all players.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameEvent {
    Welcome(Username),
    RoundStarted,
    Busted(Username),
    Stood(Username, u32),
    YouStood,
    RoundOver(Vec<Username>),
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome(name) => write!(f, "Bem-vindo, {name}! Aguarde outros jogadores..."),
            Self::RoundStarted => {
                write!(f, "Partida iniciada! Suas cartas iniciais foram enviadas.")
            }
            Self::Busted(name) => write!(f, "{name} estourou 21 pontos!"),
            Self::Stood(name, score) => write!(f, "{name} parou com {score} pontos"),
            Self::YouStood => write!(f, "Você parou. Aguarde os outros jogadores..."),
            Self::RoundOver(winners) => {
                write!(f, "Partida encerrada! Vencedor(es): {}", join_names(winners))
            }
        }
    }
}

/// A player's outcome.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoundResult {
    /// Sent the moment a player's score passes 21.
    Busted,
    Won(u32),
    Tied(u32),
    Lost { winners: Vec<Username>, score: u32 },
    EveryoneBusted,
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busted => write!(f, "perdeu"),
            Self::Won(score) => write!(f, "ganhou com {score} pontos"),
            Self::Tied(score) => write!(f, "empatou com {score} pontos"),
            Self::Lost { winners, score } => write!(
                f,
                "perdeu (vencedor: {} com {score} pontos)",
                join_names(winners)
            ),
            Self::EveryoneBusted => write!(f, "perdeu (todos estouraram 21)"),
        }
    }
}

fn join_names(names: &[Username]) -> String {
    names
        .iter()
        .map(Username::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Something a single player should be told.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notification {
    Card(Card),
    Points(u32),
    Result(RoundResult),
    Event(GameEvent),
    Rejected(UserError),
    Status(String),
}

/// Notifications produced by one command, in the order they were raised.
#[derive(Debug, Default)]
pub struct Outbox(Vec<(PlayerId, Notification)>);

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, to: PlayerId, notification: Notification) {
        self.0.push((to, notification));
    }

    /// Everything addressed to `to`, in order.
    pub fn for_player(&self, to: PlayerId) -> Vec<&Notification> {
        self.0
            .iter()
            .filter(|(id, _)| *id == to)
            .map(|(_, notification)| notification)
            .collect()
    }
}

impl IntoIterator for Outbox {
    type Item = (PlayerId, Notification);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Table size limits.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundSettings {
    /// Registered players needed before a round auto-starts.
    pub min_players: usize,
    /// Cap on registered players while a round is running.
    pub max_players: usize,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            min_players: MIN_PLAYERS,
            max_players: MAX_PLAYERS,
        }
    }
}

/// Table limits that can't produce a legal round.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SettingsError {
    #[error("min players must be at least {min}", min = MIN_PLAYERS)]
    MinTooSmall,
    #[error("max players must be at most {max}", max = MAX_PLAYERS)]
    MaxTooLarge,
    #[error("max players must be at least min players ({0})")]
    MaxBelowMin(usize),
}

impl RoundSettings {
    /// Checks `MIN_PLAYERS <= min_players <= max_players <= MAX_PLAYERS`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_players < MIN_PLAYERS {
            return Err(SettingsError::MinTooSmall);
        }
        if self.max_players > MAX_PLAYERS {
            return Err(SettingsError::MaxTooLarge);
        }
        if self.max_players < self.min_players {
            return Err(SettingsError::MaxBelowMin(self.min_players));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SummaryEntry {
    pub name: Username,
    pub score: u32,
    pub hand: Vec<Card>,
    pub status: SessionStatus,
}

/// Record of a finished round, logged as JSON.
#[derive(Clone, Debug, Serialize)]
pub struct RoundSummary {
    pub round_id: u64,
    pub players: Vec<SummaryEntry>,
    pub winners: Vec<Username>,
    /// `None` when everyone busted.
    pub winning_score: Option<u32>,
}

#[derive(Debug)]
struct RoundData<R> {
    active: bool,
    round_id: u64,
    deck: Deck<R>,
    sessions: HashMap<PlayerId, PlayerSession>,
    /// Join order; dealing and broadcasts follow it.
    seating: Vec<PlayerId>,
    last_summary: Option<RoundSummary>,
}

impl<R: RandomSource> RoundData<R> {
    fn broadcast(&self, out: &mut Outbox, notification: Notification) {
        for id in &self.seating {
            out.push(*id, notification.clone());
        }
    }

    fn start_round(&mut self, out: &mut Outbox) {
        self.round_id += 1;
        self.active = true;
        self.deck.reset();

        let names = self
            .seating
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .map(|session| session.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        info!("Round #{} starting with players: {names}", self.round_id);

        for session in self.sessions.values_mut() {
            session.reset();
        }

        let seating = self.seating.clone();
        for id in seating {
            for _ in 0..INITIAL_CARDS {
                self.deal_card(id, out);
                // Everyone may have busted on the deal, which already ended
                // the round and cleared the table.
                if !self.active {
                    return;
                }
            }
        }

        self.broadcast(out, Notification::Event(GameEvent::RoundStarted));
    }

    fn deal_card(&mut self, id: PlayerId, out: &mut Outbox) {
        let card = self.deck.draw();
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        let score = session.receive(card);
        let busted = session.is_busted();
        let name = session.name.clone();

        out.push(id, Notification::Card(card));
        out.push(id, Notification::Points(score));
        debug!("Player {name} drew {card} (total: {score})");

        if busted {
            out.push(id, Notification::Result(RoundResult::Busted));
            self.broadcast(out, Notification::Event(GameEvent::Busted(name)));
            self.check_round_end(out);
        }
    }

    fn check_round_end(&mut self, out: &mut Outbox) {
        if self.active && self.sessions.values().all(PlayerSession::is_finished) {
            self.end_round(out);
        }
    }

    fn end_round(&mut self, out: &mut Outbox) {
        let seated = self
            .seating
            .iter()
            .filter_map(|id| self.sessions.get(id).map(|session| (*id, session)))
            .collect::<Vec<_>>();

        let winning_score = seated
            .iter()
            .map(|(_, session)| session.score)
            .filter(|score| *score <= BUST_THRESHOLD)
            .max();

        let mut winners = Vec::new();
        match winning_score {
            Some(best) => {
                winners = seated
                    .iter()
                    .filter(|(_, session)| session.score == best)
                    .map(|(_, session)| session.name.clone())
                    .collect::<Vec<_>>();
                let tied = winners.len() > 1;

                for (id, session) in &seated {
                    let result = if session.score != best {
                        RoundResult::Lost {
                            winners: winners.clone(),
                            score: best,
                        }
                    } else if tied {
                        RoundResult::Tied(best)
                    } else {
                        RoundResult::Won(best)
                    };
                    out.push(*id, Notification::Result(result));
                }
                self.broadcast(
                    out,
                    Notification::Event(GameEvent::RoundOver(winners.clone())),
                );
            }
            None => {
                self.broadcast(out, Notification::Result(RoundResult::EveryoneBusted));
            }
        }

        let summary = RoundSummary {
            round_id: self.round_id,
            players: seated
                .iter()
                .map(|(_, session)| SummaryEntry {
                    name: session.name.clone(),
                    score: session.score,
                    hand: session.hand.clone(),
                    status: session.status,
                })
                .collect(),
            winners,
            winning_score,
        };
        match serde_json::to_string(&summary) {
            Ok(json) => info!("Round #{} finished: {json}", self.round_id),
            Err(error) => warn!("Round #{} finished (summary unavailable: {error})", self.round_id),
        }
        self.last_summary = Some(summary);

        self.active = false;
        self.sessions.clear();
        self.seating.clear();
    }
}

/// Owner of the one and only round. Shared between the receiver loop and
/// anything else that needs to look at the table, usually behind an `Arc`.
#[derive(Debug)]
pub struct RoundManager<R = SystemRng> {
    settings: RoundSettings,
    data: Mutex<RoundData<R>>,
}

impl Default for RoundManager {
    fn default() -> Self {
        Self::build(RoundSettings::default(), SystemRng)
    }
}

impl RoundManager {
    /// # Errors
    ///
    /// Returns an error if `settings` fail [`RoundSettings::validate`].
    pub fn new(settings: RoundSettings) -> Result<Self, SettingsError> {
        Self::with_rng(settings, SystemRng)
    }
}

impl<R: RandomSource> RoundManager<R> {
    /// A manager shuffling with `rng` instead of the system generator.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` fail [`RoundSettings::validate`].
    pub fn with_rng(settings: RoundSettings, rng: R) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::build(settings, rng))
    }

    fn build(settings: RoundSettings, rng: R) -> Self {
        let data = RoundData {
            active: false,
            round_id: 0,
            deck: Deck::new(rng),
            sessions: HashMap::with_capacity(settings.max_players),
            seating: Vec::with_capacity(settings.max_players),
            last_summary: None,
        };
        Self {
            settings,
            data: Mutex::new(data),
        }
    }

    /// A panic while holding the lock leaves the round as it was at that
    /// point; later commands keep going with it.
    fn lock(&self) -> MutexGuard<'_, RoundData<R>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new player. Starts a round once enough players are in.
    pub fn join(&self, id: PlayerId, name: &str) -> Outbox {
        let mut out = Outbox::new();
        let mut data = self.lock();

        if data.sessions.contains_key(&id) {
            out.push(id, Notification::Rejected(UserError::AlreadyJoined));
            return out;
        }
        if data.active && data.sessions.len() >= self.settings.max_players {
            out.push(id, Notification::Rejected(UserError::RoundInProgress));
            return out;
        }
        let name = Username::new(name);
        if name.is_empty() {
            out.push(id, Notification::Rejected(UserError::InvalidName));
            return out;
        }

        info!("Player {name} joined from {id}");
        data.sessions.insert(id, PlayerSession::new(name.clone()));
        data.seating.push(id);
        out.push(id, Notification::Event(GameEvent::Welcome(name)));

        if !data.active && data.sessions.len() >= self.settings.min_players {
            data.start_round(&mut out);
        }
        out
    }

    /// Deal one more card to a player still in the round.
    pub fn hit(&self, id: PlayerId) -> Outbox {
        let mut out = Outbox::new();
        let mut data = self.lock();

        let finished = match data.sessions.get(&id) {
            Some(session) if data.active => session.is_finished(),
            _ => {
                out.push(id, Notification::Rejected(UserError::NoActiveRound));
                return out;
            }
        };
        if finished {
            out.push(id, Notification::Rejected(UserError::TurnFinished));
            return out;
        }

        data.deal_card(id, &mut out);
        out
    }

    /// End a player's turn with their current score.
    pub fn stand(&self, id: PlayerId) -> Outbox {
        let mut out = Outbox::new();
        let mut data = self.lock();
        let active = data.active;

        let session = match data.sessions.get_mut(&id) {
            Some(session) if active => session,
            _ => {
                out.push(id, Notification::Rejected(UserError::NoActiveRound));
                return out;
            }
        };
        match session.status {
            SessionStatus::Busted => {
                out.push(id, Notification::Rejected(UserError::AlreadyBusted));
                return out;
            }
            SessionStatus::Stopped => {
                out.push(id, Notification::Rejected(UserError::TurnFinished));
                return out;
            }
            SessionStatus::Playing => session.stop(),
        }
        let name = session.name.clone();
        let score = session.score;

        info!("Player {name} stood with {score}");
        out.push(id, Notification::Event(GameEvent::YouStood));
        data.broadcast(&mut out, Notification::Event(GameEvent::Stood(name, score)));
        data.check_round_end(&mut out);
        out
    }

    /// Describe a player's hand. Works with or without an active round.
    pub fn status(&self, id: PlayerId) -> Outbox {
        let mut out = Outbox::new();
        let data = self.lock();
        let line = match data.sessions.get(&id) {
            Some(session) => session.status_line(),
            None => NOT_IN_ROUND.to_string(),
        };
        out.push(id, Notification::Status(line));
        out
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    pub fn round_id(&self) -> u64 {
        self.lock().round_id
    }

    pub fn player_count(&self) -> usize {
        self.lock().sessions.len()
    }

    /// A copy of a player's session, if they are registered.
    pub fn session(&self, id: PlayerId) -> Option<PlayerSession> {
        self.lock().sessions.get(&id).cloned()
    }

    pub fn last_summary(&self) -> Option<RoundSummary> {
        self.lock().last_summary.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::*;
    use crate::game::entities::{Rank, SeededRng, Suit};

    /// Puts `top` on top of every fresh deck, in dealing order.
    struct Stacked(Vec<Card>);

    impl RandomSource for Stacked {
        fn shuffle(&mut self, cards: &mut [Card]) {
            let mut arranged: Vec<Card> = cards
                .iter()
                .copied()
                .filter(|card| !self.0.contains(card))
                .collect();
            arranged.extend(self.0.iter().rev());
            cards.copy_from_slice(&arranged);
        }
    }

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn stacked(cards: &[&str]) -> RoundManager<Stacked> {
        let top = cards.iter().map(|c| card(c)).collect();
        RoundManager::with_rng(RoundSettings::default(), Stacked(top)).unwrap()
    }

    fn player(port: u16) -> PlayerId {
        SocketAddr::from(([127, 0, 0, 1], port)).into()
    }

    fn results(out: &Outbox, id: PlayerId) -> Vec<RoundResult> {
        out.for_player(id)
            .into_iter()
            .filter_map(|n| match n {
                Notification::Result(result) => Some(result.clone()),
                _ => None,
            })
            .collect()
    }

    fn cards_dealt(out: &Outbox, id: PlayerId) -> usize {
        out.for_player(id)
            .into_iter()
            .filter(|n| matches!(n, Notification::Card(_)))
            .count()
    }

    const ANA: u16 = 4001;
    const BRUNO: u16 = 4002;

    // === Display Tests ===

    #[test]
    fn test_result_wording() {
        assert_eq!(RoundResult::Busted.to_string(), "perdeu");
        assert_eq!(RoundResult::Won(20).to_string(), "ganhou com 20 pontos");
        assert_eq!(RoundResult::Tied(19).to_string(), "empatou com 19 pontos");
        assert_eq!(
            RoundResult::Lost {
                winners: vec![Username::new("Bruno")],
                score: 20
            }
            .to_string(),
            "perdeu (vencedor: Bruno com 20 pontos)"
        );
        assert_eq!(
            RoundResult::EveryoneBusted.to_string(),
            "perdeu (todos estouraram 21)"
        );
    }

    #[test]
    fn test_event_wording() {
        assert_eq!(
            GameEvent::RoundOver(vec![Username::new("Ana"), Username::new("Bruno")]).to_string(),
            "Partida encerrada! Vencedor(es): Ana, Bruno"
        );
        assert_eq!(
            GameEvent::Stood(Username::new("Ana"), 18).to_string(),
            "Ana parou com 18 pontos"
        );
        assert_eq!(
            GameEvent::Busted(Username::new("Ana")).to_string(),
            "Ana estourou 21 pontos!"
        );
    }

    // === Settings Tests ===

    #[test]
    fn test_settings_validation() {
        assert!(RoundSettings::default().validate().is_ok());
        let too_small = RoundSettings {
            min_players: 1,
            max_players: 4,
        };
        assert_eq!(too_small.validate(), Err(SettingsError::MinTooSmall));
        let too_big = RoundSettings {
            min_players: 2,
            max_players: 5,
        };
        assert_eq!(too_big.validate(), Err(SettingsError::MaxTooLarge));
        let inverted = RoundSettings {
            min_players: 3,
            max_players: 2,
        };
        assert_eq!(inverted.validate(), Err(SettingsError::MaxBelowMin(3)));
        assert_eq!(
            inverted.validate().unwrap_err().to_string(),
            "max players must be at least min players (3)"
        );
    }

    #[test]
    fn test_manager_refuses_one_player_rounds() {
        let solo = RoundSettings {
            min_players: 1,
            max_players: 9,
        };
        assert_eq!(
            RoundManager::with_rng(solo.clone(), SeededRng::new(1)).err(),
            Some(SettingsError::MinTooSmall)
        );
        assert_eq!(RoundManager::new(solo).err(), Some(SettingsError::MinTooSmall));

        // The tightest legal table still waits for a second player.
        let pair = RoundSettings {
            min_players: 2,
            max_players: 2,
        };
        let manager = RoundManager::with_rng(pair, SeededRng::new(1)).unwrap();
        manager.join(player(ANA), "Solo");
        assert!(!manager.is_active());
        assert_eq!(manager.round_id(), 0);
        assert_eq!(manager.player_count(), 1);
    }

    // === Join Tests ===

    #[test]
    fn test_single_join_waits() {
        let manager = RoundManager::default();
        let out = manager.join(player(ANA), "Ana");
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Event(GameEvent::Welcome(Username::new("Ana")))]
        );
        assert!(!manager.is_active());
        assert_eq!(manager.player_count(), 1);
        assert_eq!(manager.round_id(), 0);
    }

    #[test]
    fn test_duplicate_join_rejected() {
        let manager = RoundManager::default();
        manager.join(player(ANA), "Ana");
        let out = manager.join(player(ANA), "Ana again");
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Rejected(UserError::AlreadyJoined)]
        );
        assert_eq!(manager.player_count(), 1);
        assert_eq!(manager.session(player(ANA)).unwrap().name.as_str(), "Ana");
    }

    #[test]
    fn test_blank_name_rejected() {
        let manager = RoundManager::default();
        let out = manager.join(player(ANA), "   ");
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Rejected(UserError::InvalidName)]
        );
        assert_eq!(manager.player_count(), 0);
    }

    #[test]
    fn test_second_join_starts_round() {
        let manager = stacked(&["10♦", "8♥", "K♣", "Q♠"]);
        manager.join(player(ANA), "Ana");
        let out = manager.join(player(BRUNO), "Bruno");

        assert!(manager.is_active());
        assert_eq!(manager.round_id(), 1);
        assert_eq!(cards_dealt(&out, player(ANA)), 2);
        assert_eq!(cards_dealt(&out, player(BRUNO)), 2);

        // Card then running score, per card.
        assert_eq!(
            out.for_player(player(ANA)),
            vec![
                &Notification::Card(card("10♦")),
                &Notification::Points(10),
                &Notification::Card(card("8♥")),
                &Notification::Points(18),
                &Notification::Event(GameEvent::RoundStarted),
            ]
        );
        assert_eq!(manager.session(player(BRUNO)).unwrap().score, 20);
    }

    #[test]
    fn test_round_full_rejects_fifth_player() {
        let manager =
            RoundManager::with_rng(RoundSettings::default(), SeededRng::new(1)).unwrap();
        for port in 1..=2 {
            manager.join(player(port), &format!("p{port}"));
        }
        // A bust on the opening deal can end a two-player round early; only
        // carry on when the table is still running.
        if !manager.is_active() {
            return;
        }
        for port in 3..=4 {
            manager.join(player(port), &format!("p{port}"));
        }
        assert_eq!(manager.player_count(), 4);
        let out = manager.join(player(5), "p5");
        assert_eq!(
            out.for_player(player(5)),
            vec![&Notification::Rejected(UserError::RoundInProgress)]
        );
        assert_eq!(manager.player_count(), 4);
    }

    #[test]
    fn test_late_joiner_keeps_round_open() {
        let manager = stacked(&["10♦", "8♥", "K♣", "Q♠"]);
        manager.join(player(ANA), "Ana");
        manager.join(player(BRUNO), "Bruno");
        let out = manager.join(player(4003), "Carla");
        assert_eq!(cards_dealt(&out, player(4003)), 0);

        manager.stand(player(ANA));
        manager.stand(player(BRUNO));
        assert!(manager.is_active());

        let out = manager.stand(player(4003));
        assert!(!manager.is_active());
        assert_eq!(results(&out, player(BRUNO)), vec![RoundResult::Won(20)]);
    }

    // === Hit / Stand Guards ===

    #[test]
    fn test_hit_without_round() {
        let manager = RoundManager::default();
        let out = manager.hit(player(ANA));
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Rejected(UserError::NoActiveRound)]
        );

        manager.join(player(ANA), "Ana");
        let out = manager.hit(player(ANA));
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Rejected(UserError::NoActiveRound)]
        );
        assert!(manager.session(player(ANA)).unwrap().hand.is_empty());
    }

    #[test]
    fn test_stand_without_round() {
        let manager = RoundManager::default();
        let out = manager.stand(player(ANA));
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Rejected(UserError::NoActiveRound)]
        );
    }

    #[test]
    fn test_hit_deals_one_card() {
        let manager = stacked(&["2♦", "3♥", "K♣", "Q♠", "4♣"]);
        manager.join(player(ANA), "Ana");
        manager.join(player(BRUNO), "Bruno");
        let out = manager.hit(player(ANA));
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Card(card("4♣")), &Notification::Points(9)]
        );
        assert!(out.for_player(player(BRUNO)).is_empty());
    }

    #[test]
    fn test_no_cards_after_stand() {
        let manager = stacked(&["10♦", "8♥", "2♣", "3♠"]);
        manager.join(player(ANA), "Ana");
        manager.join(player(BRUNO), "Bruno");
        manager.stand(player(ANA));

        for _ in 0..3 {
            let out = manager.hit(player(ANA));
            assert_eq!(cards_dealt(&out, player(ANA)), 0);
            assert_eq!(
                out.for_player(player(ANA)),
                vec![&Notification::Rejected(UserError::TurnFinished)]
            );
        }
        assert_eq!(manager.session(player(ANA)).unwrap().hand.len(), 2);

        let out = manager.stand(player(ANA));
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Rejected(UserError::TurnFinished)]
        );
    }

    #[test]
    fn test_no_cards_after_bust() {
        let manager = stacked(&["10♦", "8♥", "2♣", "3♠", "K♥"]);
        manager.join(player(ANA), "Ana");
        manager.join(player(BRUNO), "Bruno");

        let out = manager.hit(player(ANA));
        assert_eq!(results(&out, player(ANA)), vec![RoundResult::Busted]);
        assert!(manager.session(player(ANA)).unwrap().is_busted());

        let out = manager.hit(player(ANA));
        assert_eq!(cards_dealt(&out, player(ANA)), 0);
        let out = manager.stand(player(ANA));
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Rejected(UserError::AlreadyBusted)]
        );
    }

    // === Round End Scenarios ===

    #[test]
    fn test_bust_on_opening_deal() {
        let manager = stacked(&["A♥", "A♠", "10♦", "8♣"]);
        manager.join(player(ANA), "Ana");
        let out = manager.join(player(BRUNO), "Bruno");

        let ana = manager.session(player(ANA)).unwrap();
        assert_eq!(ana.score, 22);
        assert!(ana.is_busted());
        assert_eq!(results(&out, player(ANA)), vec![RoundResult::Busted]);

        // The bust is announced to everyone, and Bruno is still dealt in.
        let bust = Notification::Event(GameEvent::Busted(Username::new("Ana")));
        assert!(out.for_player(player(BRUNO)).contains(&&bust));
        assert!(out.for_player(player(ANA)).contains(&&bust));
        assert_eq!(cards_dealt(&out, player(BRUNO)), 2);
        assert!(manager.is_active());

        let out = manager.stand(player(BRUNO));
        assert!(!manager.is_active());
        assert_eq!(results(&out, player(BRUNO)), vec![RoundResult::Won(18)]);
        assert_eq!(
            results(&out, player(ANA)),
            vec![RoundResult::Lost {
                winners: vec![Username::new("Bruno")],
                score: 18
            }]
        );
    }

    #[test]
    fn test_higher_score_wins() {
        let manager = stacked(&["10♦", "8♥", "K♣", "Q♠"]);
        manager.join(player(ANA), "Ana");
        manager.join(player(BRUNO), "Bruno");

        let out = manager.stand(player(ANA));
        let stood = Notification::Event(GameEvent::Stood(Username::new("Ana"), 18));
        assert!(out.for_player(player(BRUNO)).contains(&&stood));
        assert!(manager.is_active());

        let out = manager.stand(player(BRUNO));
        assert_eq!(results(&out, player(BRUNO)), vec![RoundResult::Won(20)]);
        assert_eq!(
            results(&out, player(ANA)),
            vec![RoundResult::Lost {
                winners: vec![Username::new("Bruno")],
                score: 20
            }]
        );
        let over = Notification::Event(GameEvent::RoundOver(vec![Username::new("Bruno")]));
        assert!(out.for_player(player(ANA)).contains(&&over));
        assert!(out.for_player(player(BRUNO)).contains(&&over));
    }

    #[test]
    fn test_tie_at_nineteen() {
        let manager = stacked(&["10♦", "9♥", "J♣", "9♠"]);
        manager.join(player(ANA), "Ana");
        manager.join(player(BRUNO), "Bruno");
        manager.stand(player(ANA));
        let out = manager.stand(player(BRUNO));

        assert_eq!(results(&out, player(ANA)), vec![RoundResult::Tied(19)]);
        assert_eq!(results(&out, player(BRUNO)), vec![RoundResult::Tied(19)]);
        let over = Notification::Event(GameEvent::RoundOver(vec![
            Username::new("Ana"),
            Username::new("Bruno"),
        ]));
        assert!(out.for_player(player(ANA)).contains(&&over));

        let summary = manager.last_summary().unwrap();
        assert_eq!(summary.winning_score, Some(19));
        assert_eq!(summary.winners.len(), 2);
    }

    #[test]
    fn test_everyone_busts_on_deal() {
        let manager = stacked(&["A♦", "A♥", "A♠", "A♣"]);
        manager.join(player(ANA), "Ana");
        let out = manager.join(player(BRUNO), "Bruno");

        for id in [player(ANA), player(BRUNO)] {
            assert_eq!(
                results(&out, id),
                vec![RoundResult::Busted, RoundResult::EveryoneBusted]
            );
            assert!(
                !out.for_player(id)
                    .contains(&&Notification::Event(GameEvent::RoundStarted))
            );
        }
        assert!(!manager.is_active());
        assert_eq!(manager.player_count(), 0);
        assert_eq!(manager.last_summary().unwrap().winning_score, None);
    }

    #[test]
    fn test_hit_into_bust_ends_round() {
        let manager = stacked(&["10♦", "8♥", "K♣", "Q♠", "5♣"]);
        manager.join(player(ANA), "Ana");
        manager.join(player(BRUNO), "Bruno");
        manager.stand(player(BRUNO));

        let out = manager.hit(player(ANA));
        assert_eq!(
            results(&out, player(ANA)),
            vec![
                RoundResult::Busted,
                RoundResult::Lost {
                    winners: vec![Username::new("Bruno")],
                    score: 20
                }
            ]
        );
        assert!(!manager.is_active());
    }

    #[test]
    fn test_round_end_clears_table() {
        let manager = stacked(&["10♦", "8♥", "K♣", "Q♠"]);
        manager.join(player(ANA), "Ana");
        manager.join(player(BRUNO), "Bruno");
        manager.stand(player(ANA));
        manager.stand(player(BRUNO));

        assert!(!manager.is_active());
        assert_eq!(manager.player_count(), 0);
        assert!(manager.session(player(ANA)).is_none());

        // Everyone has to join again; the next round gets a new id.
        let out = manager.hit(player(ANA));
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Rejected(UserError::NoActiveRound)]
        );
        manager.join(player(ANA), "Ana");
        manager.join(player(BRUNO), "Bruno");
        assert_eq!(manager.round_id(), 2);
    }

    // === Status ===

    #[test]
    fn test_status_unknown_player() {
        let manager = RoundManager::default();
        manager.join(player(ANA), "Ana");
        let out = manager.status(player(BRUNO));
        assert_eq!(
            out.for_player(player(BRUNO)),
            vec![&Notification::Status(NOT_IN_ROUND.to_string())]
        );
        assert_eq!(out.into_iter().count(), 1);
        assert_eq!(manager.player_count(), 1);
        assert!(!manager.is_active());
    }

    #[test]
    fn test_status_before_and_during_round() {
        let manager = stacked(&["10♦", "8♥", "K♣", "Q♠"]);
        manager.join(player(ANA), "Ana");
        let out = manager.status(player(ANA));
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Status(
                "Nome: Ana, Cartas: , Pontos: 0, Status: Jogando".to_string()
            )]
        );

        manager.join(player(BRUNO), "Bruno");
        manager.stand(player(ANA));
        let out = manager.status(player(ANA));
        assert_eq!(
            out.for_player(player(ANA)),
            vec![&Notification::Status(
                "Nome: Ana, Cartas: 10♦, 8♥, Pontos: 18, Status: Parou".to_string()
            )]
        );
    }

    #[test]
    fn test_stacked_source_arranges_deck() {
        let mut deck = Deck::new(Stacked(vec![card("5♣"), card("K♦")]));
        assert_eq!(deck.draw(), card("5♣"));
        assert_eq!(deck.draw(), card("K♦"));
        assert_eq!(deck.len(), 50);
        assert_eq!(Card::new(Rank::Five, Suit::Club), card("5♣"));
    }
}
