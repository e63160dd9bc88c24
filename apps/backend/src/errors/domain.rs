//! Domain-level error type used across the rules engine and room services.
//!
//! This error type is transport-agnostic. HTTP handlers convert it into
//! `crate::error::AppError`; the realtime layer turns it into an `error`
//! event (or drops it silently for in-hand commands).

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::error_code::ErrorCode;

/// Malformed or out-of-range input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    ParseCard,
    InvalidPlayerCount,
    InvalidPlayerName,
    UnknownCall,
    BadPayload,
    Other(String),
}

/// Well-formed command that is not allowed in the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IllegalStateKind {
    OutOfTurn,
    ChallengePending,
    NoPendingChallenge,
    NotChallengeTarget,
    LadderRung,
    SameTeamRaise,
    NotFirstRound,
    AlreadyCalled,
    NoFlor,
    HandOver,
    GameFinished,
    RoomNotPlaying,
    RoomNotFull,
    AlreadyInRoom,
    Forbidden,
}

/// Domain-level not found entities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Player,
    Card,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Malformed payload, unknown room code or call type
    Validation(ValidationKind, String),
    /// Rule violation for the current room/game state
    IllegalState(IllegalStateKind, String),
    /// Missing room, player or card
    NotFound(NotFoundKind, String),
    /// Room already holds `max_players`
    Capacity(String),
    /// Deck too small for the seated players; aborts the deal
    FatalDeal(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::IllegalState(kind, d) => write!(f, "illegal state {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Capacity(d) => write!(f, "capacity: {d}"),
            DomainError::FatalDeal(d) => write!(f, "fatal deal: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }
    pub fn illegal(kind: IllegalStateKind, detail: impl Into<String>) -> Self {
        Self::IllegalState(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn capacity(detail: impl Into<String>) -> Self {
        Self::Capacity(detail.into())
    }
    pub fn fatal_deal(detail: impl Into<String>) -> Self {
        Self::FatalDeal(detail.into())
    }

    /// Stable wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::ParseCard => ErrorCode::ParseCard,
                ValidationKind::InvalidPlayerCount => ErrorCode::InvalidPlayerCount,
                ValidationKind::InvalidPlayerName => ErrorCode::InvalidPlayerName,
                ValidationKind::UnknownCall => ErrorCode::UnknownCall,
                ValidationKind::BadPayload | ValidationKind::Other(_) => ErrorCode::ValidationError,
            },
            DomainError::IllegalState(kind, _) => match kind {
                IllegalStateKind::OutOfTurn => ErrorCode::OutOfTurn,
                IllegalStateKind::ChallengePending => ErrorCode::ChallengePending,
                IllegalStateKind::NoPendingChallenge => ErrorCode::NoPendingChallenge,
                IllegalStateKind::NotChallengeTarget => ErrorCode::NotChallengeTarget,
                IllegalStateKind::LadderRung | IllegalStateKind::SameTeamRaise => {
                    ErrorCode::CallNotAllowed
                }
                IllegalStateKind::NotFirstRound
                | IllegalStateKind::AlreadyCalled
                | IllegalStateKind::NoFlor => ErrorCode::CallNotAllowed,
                IllegalStateKind::HandOver => ErrorCode::HandOver,
                IllegalStateKind::GameFinished => ErrorCode::GameFinished,
                IllegalStateKind::RoomNotPlaying | IllegalStateKind::RoomNotFull => {
                    ErrorCode::PhaseMismatch
                }
                IllegalStateKind::AlreadyInRoom => ErrorCode::AlreadyInRoom,
                IllegalStateKind::Forbidden => ErrorCode::Forbidden,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Room => ErrorCode::RoomNotFound,
                NotFoundKind::Player => ErrorCode::PlayerNotFound,
                NotFoundKind::Card => ErrorCode::CardNotInHand,
            },
            DomainError::Capacity(_) => ErrorCode::RoomFull,
            DomainError::FatalDeal(_) => ErrorCode::FatalDeal,
        }
    }

    /// Human-readable detail without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d)
            | DomainError::IllegalState(_, d)
            | DomainError::NotFound(_, d)
            | DomainError::Capacity(d)
            | DomainError::FatalDeal(d) => d,
        }
    }
}
