//! Table limits and scoring thresholds.

/// Fewest registered players needed before a round auto-starts.
pub const MIN_PLAYERS: usize = 2;

/// Most players a single round can hold.
pub const MAX_PLAYERS: usize = 4;

/// Any score above this busts the hand.
pub const BUST_THRESHOLD: u32 = 21;

/// Cards dealt to every player when a round starts.
pub const INITIAL_CARDS: usize = 2;

/// Cards in a full deck (13 ranks x 4 suits).
pub const DECK_SIZE: usize = 52;

/// Display names are truncated to this many characters.
pub const MAX_NAME_LENGTH: usize = 32;

/// Default port the server binds to.
pub const DEFAULT_PORT: u16 = 5000;
