use crate::errors::domain::{DomainError, ValidationKind};

/// Points a team needs to win the game.
pub const WIN_THRESHOLD: u8 = 30;

pub const CARDS_PER_HAND: usize = 3;
pub const ROUNDS_PER_HAND: u8 = 3;
pub const ROUND_WINS_FOR_HAND: u8 = 2;

pub const VALID_PLAYER_COUNTS: [u8; 3] = [2, 4, 6];

pub const MAX_NAME_LEN: usize = 24;

/// Cards a deal consumes: three per seat plus the muestra.
pub const fn cards_needed(player_count: usize) -> usize {
    CARDS_PER_HAND * player_count + 1
}

pub fn validate_player_count(max_players: u8) -> Result<u8, DomainError> {
    if VALID_PLAYER_COUNTS.contains(&max_players) {
        Ok(max_players)
    } else {
        Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!("max_players must be 2, 4 or 6 (got {max_players})"),
        ))
    }
}

/// Trim and bound a display name.
pub fn normalize_player_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerName,
            "player name must not be empty",
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerName,
            format!("player name longer than {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(name.to_string())
}
