//! Edge-triggered room transitions derived from before/after snapshots.
//!
//! Commands only mutate the room; the session layer compares a lifecycle
//! view taken before and after to decide which events to emit and whether a
//! deferred deal must be scheduled.

use crate::domain::room::{Room, RoomStatus};
use crate::domain::state::{Phase, PlayerId, Team};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLifecycleView {
    pub version: u64,
    pub status: RoomStatus,
    pub roster: usize,
    pub hand_no: Option<u32>,
    pub phase: Option<Phase>,
    pub turn: Option<PlayerId>,
    pub winner: Option<Team>,
}

impl RoomLifecycleView {
    pub fn of(room: &Room) -> Self {
        Self {
            version: room.version,
            status: room.status,
            roster: room.players.len(),
            hand_no: room.game.as_ref().map(|g| g.hand_no),
            phase: room.game.as_ref().map(|g| g.phase),
            turn: room.turn_player(),
            winner: room.winner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomTransition {
    /// Roster grew.
    PlayerJoined,
    /// Roster shrank.
    PlayerLeft,
    /// Waiting -> Playing: the first hand was dealt.
    GameStarted,
    /// A hand was dealt after the first one.
    HandStarted { hand_no: u32 },
    /// The hand moved to HandOver; a deal for the next one is due.
    HandEnded { hand_no: u32 },
    /// The turn became a specific player.
    TurnBecame { player_id: PlayerId },
    /// Status moved to Finished.
    GameFinished { winner: Team },
}

/// Derive transitions from before/after lifecycle state.
pub fn derive_room_transitions(
    before: &RoomLifecycleView,
    after: &RoomLifecycleView,
) -> Vec<RoomTransition> {
    let mut transitions = Vec::new();

    if after.roster > before.roster {
        transitions.push(RoomTransition::PlayerJoined);
    } else if after.roster < before.roster {
        transitions.push(RoomTransition::PlayerLeft);
    }

    if before.status == RoomStatus::Waiting && after.status == RoomStatus::Playing {
        transitions.push(RoomTransition::GameStarted);
    }

    if let (Some(prev), Some(next)) = (before.hand_no, after.hand_no) {
        if next > prev {
            transitions.push(RoomTransition::HandStarted { hand_no: next });
        }
    }

    // A finished game never schedules another deal.
    if after.status == RoomStatus::Playing
        && after.phase == Some(Phase::HandOver)
        && (before.phase != Some(Phase::HandOver) || before.hand_no != after.hand_no)
    {
        if let Some(hand_no) = after.hand_no {
            transitions.push(RoomTransition::HandEnded { hand_no });
        }
    }

    if let Some(player_id) = after.turn {
        if before.turn != Some(player_id) {
            transitions.push(RoomTransition::TurnBecame { player_id });
        }
    }

    if before.status != RoomStatus::Finished && after.status == RoomStatus::Finished {
        if let Some(winner) = after.winner {
            transitions.push(RoomTransition::GameFinished { winner });
        }
    }

    transitions
}
