//! Truco ladder and envido/flor calls.
//!
//! At most one challenge is pending per hand. A call comes either from the
//! player on turn (aimed at the next seat) or, as a counter-call, from the
//! pending challenge's target.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::cards_logic::has_flor;
use crate::domain::cards_types::Card;
use crate::domain::scoring::{award, end_hand, falta_envido_value};
use crate::domain::state::{GameState, HandOutcome, Phase, PlayerId, Seat, Team};
use crate::errors::domain::{DomainError, IllegalStateKind, NotFoundKind, ValidationKind};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TrucoCall {
    Truco,
    Retruco,
    Vale4,
}

impl TrucoCall {
    /// Truco level reached once this rung is accepted.
    pub const fn level(self) -> u8 {
        match self {
            TrucoCall::Truco => 1,
            TrucoCall::Retruco => 2,
            TrucoCall::Vale4 => 3,
        }
    }

    /// Points at stake once accepted.
    pub const fn value(self) -> u8 {
        self.level() + 1
    }

    pub const fn for_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(TrucoCall::Truco),
            2 => Some(TrucoCall::Retruco),
            3 => Some(TrucoCall::Vale4),
            _ => None,
        }
    }
}

/// Ordered: a counter-call must be strictly higher.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EnvidoCall {
    Envido,
    RealEnvido,
    FaltaEnvido,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Call {
    Truco(TrucoCall),
    Envido(EnvidoCall),
    Flor,
}

impl Call {
    pub const ALL: [Call; 7] = [
        Call::Truco(TrucoCall::Truco),
        Call::Truco(TrucoCall::Retruco),
        Call::Truco(TrucoCall::Vale4),
        Call::Envido(EnvidoCall::Envido),
        Call::Envido(EnvidoCall::RealEnvido),
        Call::Envido(EnvidoCall::FaltaEnvido),
        Call::Flor,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Call::Truco(TrucoCall::Truco) => "truco",
            Call::Truco(TrucoCall::Retruco) => "retruco",
            Call::Truco(TrucoCall::Vale4) => "vale4",
            Call::Envido(EnvidoCall::Envido) => "envido",
            Call::Envido(EnvidoCall::RealEnvido) => "real_envido",
            Call::Envido(EnvidoCall::FaltaEnvido) => "falta_envido",
            Call::Flor => "flor",
        }
    }

    /// Points this call is worth under the current scores.
    pub fn value(self, state: &GameState) -> u8 {
        match self {
            Call::Truco(t) => t.value(),
            Call::Envido(EnvidoCall::Envido) => 2,
            Call::Envido(EnvidoCall::RealEnvido) => 3,
            Call::Envido(EnvidoCall::FaltaEnvido) => falta_envido_value(&state.team_scores),
            Call::Flor => 3,
        }
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Call {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Call::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(ValidationKind::UnknownCall, format!("Unknown call: {s}"))
            })
    }
}

impl From<Call> for String {
    fn from(call: Call) -> String {
        call.as_str().to_string()
    }
}

impl TryFrom<String> for Call {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Quiero,
    NoQuiero,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Challenge {
    pub call: Call,
    pub from_player_id: PlayerId,
    pub from_seat: Seat,
    pub to_player_id: PlayerId,
    pub to_seat: Seat,
    pub value: u8,
    /// Truco level reached on acceptance; None for envido/flor.
    pub next_truco_level: Option<u8>,
}

impl Challenge {
    pub fn caller_team(&self) -> Team {
        Team::for_seat(self.from_seat)
    }
}

/// What a call or a response changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// A new challenge is waiting for the target.
    Pending(Challenge),
    /// A truco-family rung was accepted.
    Raised { level: u8, points_at_stake: u8 },
    /// Envido/flor points went to a team; play resumes.
    Awarded { team: Team, points: u8 },
    /// A truco-family rung was declined and the hand is over.
    HandEnded { team: Team, points: u8 },
}

fn ensure_in_play(state: &GameState) -> Result<(), DomainError> {
    if state.phase != Phase::InPlay {
        return Err(DomainError::illegal(IllegalStateKind::HandOver, "Hand is over"));
    }
    Ok(())
}

/// The caller's three cards as dealt this hand. Only meaningful in round 1,
/// where a played card is still on the table.
fn round_one_hand(state: &GameState, seat: Seat) -> Vec<Card> {
    let mut cards: Vec<Card> = state.hand_of(seat).iter().map(|dc| dc.card).collect();
    cards.extend(
        state
            .table
            .iter()
            .filter(|play| play.seat == seat)
            .map(|play| play.card.card),
    );
    cards
}

pub fn seat_has_flor(state: &GameState, seat: Seat) -> bool {
    state.round_number == 1 && has_flor(&round_one_hand(state, seat), state.muestra)
}

fn check_one_shot(state: &GameState, seat: Seat, call: Call) -> Result<(), DomainError> {
    if state.round_number != 1 {
        return Err(DomainError::illegal(
            IllegalStateKind::NotFirstRound,
            format!("{call} is only allowed in the first round"),
        ));
    }
    match call {
        Call::Envido(_) if state.envido_played || state.flor_played => Err(DomainError::illegal(
            IllegalStateKind::AlreadyCalled,
            "Envido was already played this hand",
        )),
        Call::Flor if state.flor_played => Err(DomainError::illegal(
            IllegalStateKind::AlreadyCalled,
            "Flor was already played this hand",
        )),
        Call::Flor if !seat_has_flor(state, seat) => {
            Err(DomainError::illegal(IllegalStateKind::NoFlor, "No flor in hand"))
        }
        _ => Ok(()),
    }
}

fn check_truco_rung(state: &GameState, seat: Seat, rung: TrucoCall) -> Result<(), DomainError> {
    if state.truco_level + 1 != rung.level() {
        return Err(DomainError::illegal(
            IllegalStateKind::LadderRung,
            format!("{} is not the next rung", Call::Truco(rung)),
        ));
    }
    if state.last_call_sender == Some(Team::for_seat(seat)) {
        return Err(DomainError::illegal(
            IllegalStateKind::SameTeamRaise,
            "Your team made the last raise",
        ));
    }
    Ok(())
}

fn place_challenge(
    state: &mut GameState,
    from_seat: Seat,
    to_seat: Seat,
    call: Call,
) -> Result<Challenge, DomainError> {
    let seat_id = |seat: Seat| {
        state
            .player_at(seat)
            .map(|p| p.id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("seat {seat}")))
    };
    let challenge = Challenge {
        call,
        from_player_id: seat_id(from_seat)?,
        from_seat,
        to_player_id: seat_id(to_seat)?,
        to_seat,
        value: call.value(state),
        next_truco_level: match call {
            Call::Truco(t) => Some(t.level()),
            _ => None,
        },
    };
    match call {
        Call::Envido(_) => state.envido_played = true,
        Call::Flor => state.flor_played = true,
        Call::Truco(_) => {}
    }
    state.pending_challenge = Some(challenge);
    Ok(challenge)
}

fn accept_truco(state: &mut GameState, challenge: &Challenge, rung: TrucoCall) {
    state.truco_level = rung.level();
    state.points_at_stake = rung.value();
    state.last_call_sender = Some(challenge.caller_team());
}

/// Place a call from `seat`.
pub fn make_call(state: &mut GameState, seat: Seat, call: Call) -> Result<CallOutcome, DomainError> {
    ensure_in_play(state)?;

    let Some(pending) = state.pending_challenge else {
        if state.turn_index != seat {
            return Err(DomainError::illegal(IllegalStateKind::OutOfTurn, "Out of turn"));
        }
        match call {
            Call::Truco(rung) => check_truco_rung(state, seat, rung)?,
            _ => check_one_shot(state, seat, call)?,
        }
        let target = state.next_seat(seat);
        return place_challenge(state, seat, target, call).map(CallOutcome::Pending);
    };

    if pending.to_seat != seat {
        return Err(DomainError::illegal(
            IllegalStateKind::ChallengePending,
            "A call is waiting for an answer",
        ));
    }

    match (pending.call, call) {
        (Call::Truco(pending_rung), Call::Truco(rung)) => {
            if rung.level() != pending_rung.level() + 1 {
                return Err(DomainError::illegal(
                    IllegalStateKind::LadderRung,
                    format!("{call} is not the next rung"),
                ));
            }
            accept_truco(state, &pending, pending_rung);
            state.pending_challenge = None;
            place_challenge(state, seat, pending.from_seat, call).map(CallOutcome::Pending)
        }
        (Call::Envido(pending_env), Call::Envido(env)) if env > pending_env => {
            place_challenge(state, seat, pending.from_seat, call).map(CallOutcome::Pending)
        }
        (Call::Envido(_), Call::Flor) if !state.flor_played && seat_has_flor(state, seat) => {
            place_challenge(state, seat, pending.from_seat, call).map(CallOutcome::Pending)
        }
        (Call::Envido(_), Call::Flor) => Err(DomainError::illegal(
            IllegalStateKind::NoFlor,
            "No flor in hand",
        )),
        _ => Err(DomainError::illegal(
            IllegalStateKind::LadderRung,
            format!("{call} cannot answer {}", pending.call),
        )),
    }
}

/// Accept or decline the pending challenge. Only its target may answer.
pub fn respond_call(
    state: &mut GameState,
    seat: Seat,
    response: Response,
) -> Result<CallOutcome, DomainError> {
    ensure_in_play(state)?;
    let Some(challenge) = state.pending_challenge else {
        return Err(DomainError::illegal(
            IllegalStateKind::NoPendingChallenge,
            "Nothing to answer",
        ));
    };
    if challenge.to_seat != seat {
        return Err(DomainError::illegal(
            IllegalStateKind::NotChallengeTarget,
            "The call is not aimed at you",
        ));
    }

    let team = challenge.caller_team();
    state.pending_challenge = None;

    let outcome = match (challenge.call, response) {
        (Call::Truco(rung), Response::Quiero) => {
            accept_truco(state, &challenge, rung);
            CallOutcome::Raised {
                level: state.truco_level,
                points_at_stake: state.points_at_stake,
            }
        }
        (Call::Truco(_), Response::NoQuiero) => {
            let points = state.points_at_stake;
            end_hand(state, HandOutcome::Declined { team, points });
            CallOutcome::HandEnded { team, points }
        }
        (_, Response::Quiero) => {
            award(state, team, challenge.value);
            CallOutcome::Awarded {
                team,
                points: challenge.value,
            }
        }
        (_, Response::NoQuiero) => {
            award(state, team, 1);
            CallOutcome::Awarded { team, points: 1 }
        }
    };
    Ok(outcome)
}

/// Calls `seat` could legally make right now.
pub fn legal_calls(state: &GameState, seat: Seat) -> Vec<Call> {
    Call::ALL
        .into_iter()
        .filter(|&call| {
            let mut probe = state.clone();
            make_call(&mut probe, seat, call).is_ok()
        })
        .collect()
}
