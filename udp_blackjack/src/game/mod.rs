//! Blackjack round engine.
//!
//! - Cards, decks and player sessions ([`entities`])
//! - Card valuation ([`functional`])
//! - The round lifecycle: joining, dealing, standing and settling
//!   ([`state_machine`])

pub mod constants;
pub mod entities;
pub mod functional;
pub mod state_machine;

pub use state_machine::{
    GameEvent, NOT_IN_ROUND, Notification, Outbox, RoundManager, RoundResult, RoundSettings,
    RoundSummary, SettingsError, SummaryEntry, UserError,
};
