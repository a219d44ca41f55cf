//! Internal modules for the blackjack client.
//!
//! This library provides menu parsing, hand rendering and the interactive
//! session used by the bj_client binary.

pub mod commands;
pub mod hand;
pub mod session;
