//! Newtype wrappers shared by the agent, the persistence layer, and the report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tictactoe::Cell;

/// Number of cells on the board, and therefore the number of distinct actions.
pub const BOARD_SIZE: usize = 9;

/// Canonical, losslessly-reversible text form of a board state.
///
/// The encoding is the tuple-like literal `('X', ' ', 'O', ...)` with one
/// quoted marker per cell, separated by `", "`. The same key is used for the
/// in-memory value table and for the top-level keys of the persisted JSON
/// document, so a table round-trips through save/load without translation.
///
/// # Examples
///
/// ```
/// use qtac::tictactoe::BoardState;
/// use qtac::types::StateKey;
///
/// let key = BoardState::new().key();
/// assert_eq!(key.as_str(), "(' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ')");
/// assert!(StateKey::parse(key.as_str()).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// Encode a board into its canonical key text.
    pub fn encode(cells: &[Cell; BOARD_SIZE]) -> Self {
        let inner = cells
            .iter()
            .map(|c| format!("'{}'", c.to_char()))
            .collect::<Vec<_>>()
            .join(", ");
        StateKey(format!("({inner})"))
    }

    /// Decode the key text back into the board it encodes.
    ///
    /// The parse is strict: anything that is not exactly nine quoted markers
    /// in tuple-literal form is rejected, never coerced to a default board.
    ///
    /// # Errors
    ///
    /// Returns an error if the surrounding tuple syntax is malformed, a cell
    /// is not a single quoted character, the marker is not `X`/`O`/` `, or
    /// the cell count is not nine.
    pub fn decode(&self) -> Result<[Cell; BOARD_SIZE], crate::Error> {
        let text = self.0.as_str();
        let malformed = || crate::Error::MalformedStateKey {
            key: text.to_string(),
            expected: "('X', ' ', 'O', ...) with 9 quoted markers".to_string(),
        };

        let inner = text
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(malformed)?;

        let mut cells = [Cell::Empty; BOARD_SIZE];
        let mut count = 0;
        for (i, part) in inner.split(", ").enumerate() {
            if i >= BOARD_SIZE {
                return Err(crate::Error::InvalidKeyLength {
                    expected: BOARD_SIZE,
                    got: i + 1,
                    context: text.to_string(),
                });
            }

            let marker = part
                .strip_prefix('\'')
                .and_then(|rest| rest.strip_suffix('\''))
                .ok_or_else(malformed)?;

            let mut chars = marker.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(malformed());
            };

            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidMarker {
                marker: marker.to_string(),
                position: i,
                context: text.to_string(),
            })?;
            count = i + 1;
        }

        if count != BOARD_SIZE {
            return Err(crate::Error::InvalidKeyLength {
                expected: BOARD_SIZE,
                got: count,
                context: text.to_string(),
            });
        }

        Ok(cells)
    }

    /// Parse and validate a key from arbitrary text (e.g. a file key).
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`decode`](Self::decode).
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let key = StateKey(s.to_string());
        key.decode()?;
        Ok(key)
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
