//! Wire messages.
//!
//! Every datagram is a single line of text, either a bare keyword or
//! `KEYWORD:ARGUMENT`. Only the first `:` separates; anything after it is
//! the argument, colons included.

use std::{convert::Infallible, fmt, str::FromStr};

use super::{
    super::game::{Notification, entities::Card},
    errors::ProtocolError,
};

pub const JOIN: &str = "ENTRAR";
pub const HIT: &str = "PEDIR_CARTA";
pub const STAND: &str = "PARAR";
pub const STATUS: &str = "STATUS";

pub const CARD: &str = "CARTA";
pub const POINTS: &str = "PONTOS";
pub const RESULT: &str = "RESULTADO";
pub const NOTICE: &str = "MENSAGEM";

/// A command from a client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClientCommand {
    /// Register under a display name. The name may be empty or contain
    /// colons; validation happens when the join is applied.
    Join(String),
    Hit,
    Stand,
    Status,
    /// Anything that isn't one of the above, kept as received.
    Unrecognized(String),
}

impl FromStr for ClientCommand {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (keyword, argument) = s.split_once(':').unwrap_or((s, ""));
        let command = match keyword {
            JOIN => Self::Join(argument.to_string()),
            HIT => Self::Hit,
            STAND => Self::Stand,
            STATUS => Self::Status,
            _ => Self::Unrecognized(s.to_string()),
        };
        Ok(command)
    }
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Join(name) => write!(f, "{JOIN}:{name}"),
            Self::Hit => write!(f, "{HIT}"),
            Self::Stand => write!(f, "{STAND}"),
            Self::Status => write!(f, "{STATUS}"),
            Self::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

/// A message from the server to one client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ServerMessage {
    /// A card was added to the receiver's hand.
    Card(Card),
    /// The receiver's running score after the last card.
    Points(u32),
    /// The receiver's outcome for the round.
    Result(String),
    /// Free-form table talk or a rejection.
    Notice(String),
    /// Answer to a status query.
    Status(String),
}

impl ServerMessage {
    /// Whether this message ends the receiver's round.
    pub fn is_result(&self) -> bool {
        matches!(self, Self::Result(_))
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card(card) => write!(f, "{CARD}:{card}"),
            Self::Points(points) => write!(f, "{POINTS}:{points}"),
            Self::Result(text) => write!(f, "{RESULT}:{text}"),
            Self::Notice(text) => write!(f, "{NOTICE}:{text}"),
            Self::Status(text) => write!(f, "{STATUS}:{text}"),
        }
    }
}

impl FromStr for ServerMessage {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((prefix, body)) = s.split_once(':') else {
            return Err(ProtocolError::UnknownMessage(s.to_string()));
        };
        let message = match prefix {
            CARD => Self::Card(body.parse()?),
            POINTS => Self::Points(body.parse()?),
            RESULT => Self::Result(body.to_string()),
            NOTICE => Self::Notice(body.to_string()),
            STATUS => Self::Status(body.to_string()),
            _ => return Err(ProtocolError::UnknownMessage(s.to_string())),
        };
        Ok(message)
    }
}

impl From<Notification> for ServerMessage {
    fn from(value: Notification) -> Self {
        match value {
            Notification::Card(card) => Self::Card(card),
            Notification::Points(points) => Self::Points(points),
            Notification::Result(result) => Self::Result(result.to_string()),
            Notification::Event(event) => Self::Notice(event.to_string()),
            Notification::Rejected(error) => Self::Notice(error.to_string()),
            Notification::Status(text) => Self::Status(text),
        }
    }
}
