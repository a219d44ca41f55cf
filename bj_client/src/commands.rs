use std::{fmt, str::FromStr};
use udp_blackjack::messages::ClientCommand;

/// Errors that can occur while parsing a menu choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Anything that isn't one of the menu numbers.
    InvalidChoice(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChoice(_) => write!(f, "Opção inválida. Tente novamente."),
        }
    }
}

impl std::error::Error for ParseError {}

/// An entry of the play menu.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuChoice {
    Hit,
    Stand,
    Status,
    Quit,
}

impl MenuChoice {
    /// The command to send for this choice. Quitting sends nothing.
    pub fn command(self) -> Option<ClientCommand> {
        match self {
            Self::Hit => Some(ClientCommand::Hit),
            Self::Stand => Some(ClientCommand::Stand),
            Self::Status => Some(ClientCommand::Status),
            Self::Quit => None,
        }
    }
}

/// Parse a menu choice.
///
/// # Examples
///
/// ```
/// use bj_client::commands::MenuChoice;
///
/// assert_eq!("1".parse(), Ok(MenuChoice::Hit));
/// assert_eq!(" 0 ".parse(), Ok(MenuChoice::Quit));
/// assert!("9".parse::<MenuChoice>().is_err());
/// ```
impl FromStr for MenuChoice {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Hit),
            "2" => Ok(Self::Stand),
            "3" => Ok(Self::Status),
            "0" => Ok(Self::Quit),
            other => Err(ParseError::InvalidChoice(other.to_string())),
        }
    }
}

pub const MENU: &str = "\
Comandos disponíveis:
1 - Pedir carta (Hit)
2 - Parar (Stand)
3 - Ver status
0 - Sair
";

pub const PROMPT: &str = "Sua escolha (1-3): ";
