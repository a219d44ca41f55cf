//! # UDP Blackjack
//!
//! A small multiplayer blackjack server. Players join over UDP by sending
//! their name; once two are in, a round starts and everyone is dealt two
//! cards. Each player then hits or stands until they stop or pass 21. When
//! nobody is left playing, the highest score at or under 21 wins and the
//! table empties for the next round.
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, deck, player sessions and the round state machine
//! - [`net`]: Wire messages, the UDP server loop and a client
//!
//! ## Example
//!
//! ```
//! use std::net::SocketAddr;
//! use udp_blackjack::{Notification, RoundManager, entities::PlayerId};
//!
//! let manager = RoundManager::default();
//! let ana = PlayerId::from(SocketAddr::from(([127, 0, 0, 1], 4001)));
//! let outbox = manager.join(ana, "Ana");
//! assert!(!manager.is_active());
//! assert!(matches!(outbox.for_player(ana)[..], [Notification::Event(_)]));
//! ```

/// Networking components for client-server communication.
pub mod net;
pub use net::{client::Client, messages, server, utils};

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    GameEvent, Notification, Outbox, RoundManager, RoundResult, RoundSettings, RoundSummary,
    SettingsError, UserError,
    constants::{self, DEFAULT_PORT, MAX_PLAYERS, MIN_PLAYERS},
    entities, functional,
};
