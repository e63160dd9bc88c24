// Unit tests for error mapping - pure domain logic without HTTP server
use crate::errors::domain::{DomainError, IllegalStateKind, NotFoundKind, ValidationKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_422() {
    let de = DomainError::validation(ValidationKind::InvalidPlayerCount, "must be 2, 4 or 6");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::InvalidPlayerCount);
    assert_eq!(app.status().as_u16(), 422);
}

#[test]
fn maps_illegal_state_and_capacity_to_409() {
    let turn = DomainError::illegal(IllegalStateKind::OutOfTurn, "not your turn");
    let app: AppError = turn.into();
    assert_eq!(app.code().as_str(), "OUT_OF_TURN");
    assert_eq!(app.status().as_u16(), 409);

    let full = DomainError::capacity("room is full");
    let app: AppError = full.into();
    assert_eq!(app.code().as_str(), "ROOM_FULL");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let nf = DomainError::not_found(NotFoundKind::Room, "no room ABCDE");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "ROOM_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);
}

#[test]
fn maps_fatal_deal_to_internal() {
    let fatal = DomainError::fatal_deal("deck has 5 cards, need 7");
    assert_eq!(fatal.code(), ErrorCode::FatalDeal);
    let app: AppError = fatal.into();
    assert_eq!(app.status().as_u16(), 500);
    assert!(matches!(app, AppError::Internal { .. }));
}

#[test]
fn ladder_violations_share_call_not_allowed() {
    for kind in [
        IllegalStateKind::LadderRung,
        IllegalStateKind::SameTeamRaise,
        IllegalStateKind::NotFirstRound,
        IllegalStateKind::AlreadyCalled,
        IllegalStateKind::NoFlor,
    ] {
        assert_eq!(
            DomainError::illegal(kind, "x").code(),
            ErrorCode::CallNotAllowed
        );
    }
}

#[test]
fn detail_strips_kind_prefix() {
    let de = DomainError::not_found(NotFoundKind::Card, "card not in hand");
    assert_eq!(de.detail(), "card not in hand");
    assert!(de.to_string().starts_with("not found Card"));
}

#[test]
fn maps_missing_capability_to_403() {
    let de = DomainError::illegal(IllegalStateKind::Forbidden, "admin only");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::Forbidden);
    assert_eq!(app.status().as_u16(), 403);
}
