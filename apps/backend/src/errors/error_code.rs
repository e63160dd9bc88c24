//! Error codes for the Truco backend.
//!
//! This module defines all error codes used throughout the application, both
//! in HTTP problem responses and in realtime `error` events.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear on the wire.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes for the Truco backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authorization
    /// Capability required for this command
    Forbidden,

    // Request Validation
    /// Card token could not be parsed
    ParseCard,
    /// Room size is not 2, 4 or 6
    InvalidPlayerCount,
    /// Empty or oversized player name
    InvalidPlayerName,
    /// Unknown call type
    UnknownCall,
    /// General validation error
    ValidationError,
    /// Malformed command payload
    BadRequest,
    /// Unsupported protocol version
    BadProtocol,

    // Rule violations
    /// Not the acting player's turn
    OutOfTurn,
    /// A challenge is waiting for a response
    ChallengePending,
    /// Response sent with no challenge pending
    NoPendingChallenge,
    /// Response sent by someone other than the challenge target
    NotChallengeTarget,
    /// Call not allowed at this point of the hand
    CallNotAllowed,
    /// Hand already resolved, next deal pending
    HandOver,
    /// Game already finished
    GameFinished,
    /// Command does not match the room phase
    PhaseMismatch,
    /// Connection already seated in a room
    AlreadyInRoom,

    // Resource Not Found
    /// Room not found
    RoomNotFound,
    /// Player not found
    PlayerNotFound,
    /// Card not in hand
    CardNotInHand,
    /// General not found error
    NotFound,

    // Capacity
    /// Room already full
    RoomFull,

    // System Errors
    /// Deck could not cover the deal
    FatalDeal,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Forbidden => "FORBIDDEN",

            Self::ParseCard => "PARSE_CARD",
            Self::InvalidPlayerCount => "INVALID_PLAYER_COUNT",
            Self::InvalidPlayerName => "INVALID_PLAYER_NAME",
            Self::UnknownCall => "UNKNOWN_CALL",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::BadProtocol => "BAD_PROTOCOL",

            Self::OutOfTurn => "OUT_OF_TURN",
            Self::ChallengePending => "CHALLENGE_PENDING",
            Self::NoPendingChallenge => "NO_PENDING_CHALLENGE",
            Self::NotChallengeTarget => "NOT_CHALLENGE_TARGET",
            Self::CallNotAllowed => "CALL_NOT_ALLOWED",
            Self::HandOver => "HAND_OVER",
            Self::GameFinished => "GAME_FINISHED",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::AlreadyInRoom => "ALREADY_IN_ROOM",

            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::NotFound => "NOT_FOUND",

            Self::RoomFull => "ROOM_FULL",

            Self::FatalDeal => "FATAL_DEAL",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
