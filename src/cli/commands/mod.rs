//! CLI command implementations

pub mod evaluate;
pub mod report;
pub mod train;

use anyhow::{Result, anyhow};

use crate::tictactoe::Player;

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" | "p1" => Ok(Player::X),
        "o" | "second" | "p2" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_player_token() {
        assert_eq!(parse_player_token("x", "--agent-player").unwrap(), Player::X);
        assert_eq!(parse_player_token("O", "--agent-player").unwrap(), Player::O);
        assert!(parse_player_token("z", "--agent-player").is_err());
    }
}
