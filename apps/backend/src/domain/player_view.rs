//! Per-viewer projection of a room.
//!
//! `project` never touches the canonical state: it builds a fresh view in
//! which every hand held by the other team is replaced by `{"hidden": true}`
//! placeholders, preserving the card count. The viewer's own hand and their
//! teammates' hands stay visible.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::calls::{legal_calls, seat_has_flor, Call, Challenge};
use crate::domain::cards_logic::envido_points;
use crate::domain::cards_types::{Card, DealtCard};
use crate::domain::room::{Player, Room, RoomId, RoomStatus};
use crate::domain::state::{GameState, HandOutcome, Phase, Play, PlayerId, Seat, Team, TeamTally};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CardView {
    Visible(DealtCard),
    Hidden { hidden: bool },
}

impl CardView {
    const HIDDEN: CardView = CardView::Hidden { hidden: true };
}

#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub hand_no: u32,
    pub round_number: u8,
    pub turn_index: Seat,
    pub turn_player_id: Option<PlayerId>,
    pub dealer_index: Seat,
    pub muestra: Card,
    /// Keyed by player id.
    pub hands: BTreeMap<PlayerId, Vec<CardView>>,
    pub table: Vec<Play>,
    pub last_round: Vec<Play>,
    pub team_scores: TeamTally,
    pub round_wins: TeamTally,
    pub points_at_stake: u8,
    pub truco_level: u8,
    pub envido_played: bool,
    pub flor_played: bool,
    pub pending_challenge: Option<Challenge>,
    pub phase: Phase,
    pub last_hand: Option<HandOutcome>,
}

/// What the requesting player may do right now.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerInfo {
    pub player_id: PlayerId,
    pub seat: Seat,
    pub team: Team,
    pub is_turn: bool,
    pub envido_points: Option<u8>,
    pub has_flor: bool,
    pub can_respond: bool,
    pub legal_calls: Vec<Call>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomView {
    pub id: RoomId,
    pub host: String,
    pub max_players: u8,
    pub status: RoomStatus,
    pub players: Vec<Player>,
    pub winner: Option<Team>,
    pub winner_label: Option<String>,
    pub version: u64,
    pub game: Option<GameView>,
    pub viewer: Option<ViewerInfo>,
}

/// Public listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub host: String,
    pub players: usize,
    pub max_players: u8,
    pub status: RoomStatus,
}

pub fn summary(room: &Room) -> RoomSummary {
    RoomSummary {
        id: room.id.clone(),
        host: room.host.clone(),
        players: room.players.len(),
        max_players: room.max_players,
        status: room.status,
    }
}

/// Masked view for one member of the room.
pub fn project(room: &Room, viewer_id: PlayerId) -> RoomView {
    let viewer_team = room.player(viewer_id).map(|p| p.team);
    let game = room
        .game
        .as_ref()
        .map(|g| game_view(g, |seat| Some(Team::for_seat(seat)) == viewer_team));
    let viewer = room
        .game
        .as_ref()
        .and_then(|g| viewer_info(room, g, viewer_id));
    room_view(room, game, viewer)
}

/// Full view with every hand visible.
pub fn project_unmasked(room: &Room) -> RoomView {
    let game = room.game.as_ref().map(|g| game_view(g, |_| true));
    room_view(room, game, None)
}

fn room_view(room: &Room, mut game: Option<GameView>, viewer: Option<ViewerInfo>) -> RoomView {
    // A frozen game has nobody on turn; the seat may have left.
    if room.status == RoomStatus::Finished {
        if let Some(g) = game.as_mut() {
            g.turn_player_id = None;
        }
    }
    RoomView {
        id: room.id.clone(),
        host: room.host.clone(),
        max_players: room.max_players,
        status: room.status,
        players: room.players.clone(),
        winner: room.winner,
        winner_label: room.winner.map(Team::label),
        version: room.version,
        game,
        viewer,
    }
}

fn game_view(game: &GameState, visible: impl Fn(Seat) -> bool) -> GameView {
    let hands = game
        .seats
        .iter()
        .enumerate()
        .map(|(seat, p)| {
            let hand = game.hand_of(seat);
            let cards = if visible(seat) {
                hand.iter().copied().map(CardView::Visible).collect()
            } else {
                vec![CardView::HIDDEN; hand.len()]
            };
            (p.id, cards)
        })
        .collect();

    GameView {
        hand_no: game.hand_no,
        round_number: game.round_number,
        turn_index: game.turn_index,
        turn_player_id: game.player_at(game.turn_index).map(|p| p.id),
        dealer_index: game.dealer_index,
        muestra: game.muestra,
        hands,
        table: game.table.clone(),
        last_round: game.last_round.clone(),
        team_scores: game.team_scores,
        round_wins: game.round_wins,
        points_at_stake: game.points_at_stake,
        truco_level: game.truco_level,
        envido_played: game.envido_played,
        flor_played: game.flor_played,
        pending_challenge: game.pending_challenge,
        phase: game.phase,
        last_hand: game.last_hand,
    }
}

fn viewer_info(room: &Room, game: &GameState, viewer_id: PlayerId) -> Option<ViewerInfo> {
    let seat = game.seat_of(viewer_id).ok()?;
    let active = room.status == RoomStatus::Playing && game.phase == Phase::InPlay;
    let cards: Vec<Card> = game.hand_of(seat).iter().map(|dc| dc.card).collect();
    Some(ViewerInfo {
        player_id: viewer_id,
        seat,
        team: Team::for_seat(seat),
        is_turn: active && game.turn_index == seat,
        envido_points: (cards.len() == 3).then(|| envido_points(&cards, game.muestra)),
        has_flor: seat_has_flor(game, seat),
        can_respond: active
            && game
                .pending_challenge
                .is_some_and(|c| c.to_seat == seat),
        legal_calls: if active {
            legal_calls(game, seat)
        } else {
            Vec::new()
        },
    })
}
