use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::player_view::{CardView, RoomSummary};
use crate::domain::{Card, PlayerId, RoomStatus, Team};
use crate::errors::ErrorCode;
use crate::services::rooms::{Caller, Outbox, RoomService, RoomServiceConfig};
use crate::ws::protocol::{ClientMsg, ServerMsg};

#[derive(Default)]
struct RecordingOutbox {
    sent: Mutex<Vec<(PlayerId, ServerMsg)>>,
    /// Live connections reached by `deliver_all`.
    connected: Mutex<Vec<PlayerId>>,
}

impl Outbox for RecordingOutbox {
    fn deliver(&self, to: PlayerId, msg: ServerMsg) {
        self.sent.lock().push((to, msg));
    }

    fn deliver_all(&self, msg: ServerMsg) {
        let connected = self.connected.lock().clone();
        let mut sent = self.sent.lock();
        for to in connected {
            sent.push((to, msg.clone()));
        }
    }
}

impl RecordingOutbox {
    fn connect(&self, player: PlayerId) {
        self.connected.lock().push(player);
    }

    fn for_player(&self, player: PlayerId) -> Vec<ServerMsg> {
        self.sent
            .lock()
            .iter()
            .filter(|(to, _)| *to == player)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    fn kinds(&self, player: PlayerId) -> Vec<&'static str> {
        self.for_player(player).iter().map(ServerMsg::kind).collect()
    }

    fn last_error(&self, player: PlayerId) -> Option<ErrorCode> {
        self.for_player(player).into_iter().rev().find_map(|msg| match msg {
            ServerMsg::Error { code, .. } => Some(code),
            _ => None,
        })
    }

    fn clear(&self) {
        self.sent.lock().clear();
    }
}

fn service_with(config: RoomServiceConfig) -> (Arc<RoomService>, Arc<RecordingOutbox>) {
    let outbox = Arc::new(RecordingOutbox::default());
    let service = RoomService::new(outbox.clone(), config);
    (service, outbox)
}

fn service() -> (Arc<RoomService>, Arc<RecordingOutbox>) {
    service_with(RoomServiceConfig::default())
}

/// Two-player room with the first hand dealt. Returns (room, host, guest).
fn started_pair(svc: &Arc<RoomService>) -> (String, PlayerId, PlayerId) {
    let host = Uuid::new_v4();
    let guest = Uuid::new_v4();
    let room_id = svc.create_room(host, "Ana", 2).unwrap();
    svc.join_room(guest, &room_id, "Beto").unwrap();
    (room_id, host, guest)
}

fn own_cards(svc: &RoomService, room_id: &str, player: PlayerId) -> Vec<Card> {
    let view = svc.room_state(player, room_id).unwrap();
    view.game.unwrap().hands[&player]
        .iter()
        .filter_map(|c| match c {
            CardView::Visible(dc) => Some(dc.card),
            CardView::Hidden { .. } => None,
        })
        .collect()
}

#[test]
fn create_room_answers_the_host() {
    let (svc, outbox) = service();
    let host = Uuid::new_v4();
    let room_id = svc.create_room(host, "Ana", 4).unwrap();

    assert_eq!(room_id.len(), 5);
    assert_eq!(outbox.kinds(host), vec!["room_created", "game_update"]);
    assert_eq!(svc.room_count(), 1);
    assert_eq!(svc.room_of(host), Some(room_id.clone()));

    let listed = svc.list_rooms();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, room_id);
    assert_eq!(listed[0].players, 1);
    assert_eq!(listed[0].status, RoomStatus::Waiting);
}

#[test]
fn lobby_errors_reach_the_caller() {
    let (svc, outbox) = service();
    let host = Uuid::new_v4();

    svc.dispatch(
        Caller::player(host),
        ClientMsg::CreateRoom {
            host_name: "Ana".into(),
            max_players: 3,
        },
    );
    assert_eq!(outbox.last_error(host), Some(ErrorCode::InvalidPlayerCount));
    assert_eq!(svc.room_count(), 0);

    svc.dispatch(
        Caller::player(host),
        ClientMsg::JoinRoom {
            room_id: "ZZZZZ".into(),
            player_name: "Ana".into(),
        },
    );
    assert_eq!(outbox.last_error(host), Some(ErrorCode::RoomNotFound));

    svc.create_room(host, "Ana", 2).unwrap();
    svc.dispatch(
        Caller::player(host),
        ClientMsg::CreateRoom {
            host_name: "Ana".into(),
            max_players: 2,
        },
    );
    assert_eq!(outbox.last_error(host), Some(ErrorCode::AlreadyInRoom));
    assert_eq!(svc.room_count(), 1);
}

#[test]
fn full_roster_starts_the_game() {
    let (svc, outbox) = service();
    let (room_id, host, guest) = started_pair(&svc);

    for player in [host, guest] {
        let kinds = outbox.kinds(player);
        assert!(kinds.contains(&"room_ready"), "{kinds:?}");
        assert_eq!(kinds.last(), Some(&"game_update"));
    }

    let view = svc.room_state(host, &room_id).unwrap();
    assert_eq!(view.status, RoomStatus::Playing);
    let game = view.game.unwrap();
    assert!(game.hands[&host]
        .iter()
        .all(|c| matches!(c, CardView::Visible(_))));
    assert!(game.hands[&guest]
        .iter()
        .all(|c| matches!(c, CardView::Hidden { .. })));
}

#[test]
fn join_beyond_capacity_sends_error() {
    let (svc, outbox) = service();
    let (room_id, _, _) = started_pair(&svc);
    let late = Uuid::new_v4();

    svc.dispatch(
        Caller::player(late),
        ClientMsg::JoinRoom {
            room_id: room_id.to_lowercase(),
            player_name: "Late".into(),
        },
    );
    assert_eq!(outbox.kinds(late), vec!["error"]);
    assert_eq!(outbox.last_error(late), Some(ErrorCode::RoomFull));
    assert_eq!(svc.room_of(late), None);
}

#[test]
fn in_hand_errors_are_silent() {
    let (svc, outbox) = service();
    let (room_id, host, guest) = started_pair(&svc);
    let version = svc.room_state(host, &room_id).unwrap().version;
    outbox.clear();

    // Guest is not on turn.
    let card = own_cards(&svc, &room_id, guest)[0];
    svc.dispatch(
        Caller::player(guest),
        ClientMsg::PlayCard {
            room_id: room_id.clone(),
            card: card.to_string(),
        },
    );
    // Unparseable card and unknown call.
    svc.dispatch(
        Caller::player(host),
        ClientMsg::PlayCard {
            room_id: room_id.clone(),
            card: "9_oro".into(),
        },
    );
    svc.dispatch(
        Caller::player(host),
        ClientMsg::MakeCall {
            room_id: room_id.clone(),
            call: "contraflor".into(),
        },
    );

    assert!(outbox.sent.lock().is_empty());
    assert_eq!(svc.room_state(host, &room_id).unwrap().version, version);
}

#[test]
fn accepted_play_updates_everyone() {
    let (svc, outbox) = service();
    let (room_id, host, guest) = started_pair(&svc);
    outbox.clear();

    let card = own_cards(&svc, &room_id, host)[0];
    svc.dispatch(
        Caller::player(host),
        ClientMsg::PlayCard {
            room_id: room_id.clone(),
            card: card.to_string(),
        },
    );

    for player in [host, guest] {
        assert_eq!(outbox.kinds(player), vec!["game_update"]);
    }
    let view = svc.room_state(guest, &room_id).unwrap();
    let game = view.game.unwrap();
    assert_eq!(game.table.len(), 1);
    assert_eq!(game.table[0].card.card, card);
    assert_eq!(game.turn_player_id, Some(guest));
}

#[test]
fn admin_read_needs_the_capability() {
    let (svc, outbox) = service_with(RoomServiceConfig {
        admin_token: Some("s3cret".into()),
        ..RoomServiceConfig::default()
    });
    let (room_id, host, guest) = started_pair(&svc);

    assert!(svc.grants_admin(Some("s3cret")));
    assert!(!svc.grants_admin(Some("guess")));
    assert!(!svc.grants_admin(None));

    svc.dispatch(
        Caller::player(host),
        ClientMsg::AdminGameState {
            room_id: room_id.clone(),
        },
    );
    assert_eq!(outbox.last_error(host), Some(ErrorCode::Forbidden));

    let admin = Caller {
        player_id: Uuid::new_v4(),
        is_admin: true,
    };
    let view = svc.admin_game_state(admin, &room_id).unwrap();
    let game = view.game.unwrap();
    assert!(game
        .hands
        .values()
        .flatten()
        .all(|c| matches!(c, CardView::Visible(_))));
    assert_eq!(game.hands[&guest].len(), 3);
}

#[test]
fn admin_disabled_without_token() {
    let (svc, _) = service();
    assert!(!svc.grants_admin(Some("")));
    assert!(!svc.grants_admin(Some("anything")));
}

#[test]
fn leaving_mid_game_forfeits_and_last_leaver_closes() {
    let (svc, outbox) = service();
    let (room_id, host, guest) = started_pair(&svc);
    outbox.clear();

    svc.leave_room(guest, &room_id).unwrap();
    let kinds = outbox.kinds(host);
    assert!(kinds.contains(&"player_left"), "{kinds:?}");
    assert!(kinds.contains(&"game_finished"), "{kinds:?}");
    let finished = outbox.for_player(host).into_iter().find_map(|m| match m {
        ServerMsg::GameFinished {
            winner,
            winner_label,
            ..
        } => Some((winner, winner_label)),
        _ => None,
    });
    assert_eq!(finished, Some((Team::One, "Equipo 1".to_string())));
    assert!(outbox.kinds(guest).is_empty());
    assert_eq!(svc.room_of(guest), None);

    svc.disconnect(host);
    assert_eq!(svc.room_count(), 0);
    assert_eq!(svc.room_of(host), None);
}

#[test]
fn leaving_requires_membership() {
    let (svc, outbox) = service();
    let (room_id, _, _) = started_pair(&svc);
    let stranger = Uuid::new_v4();
    svc.dispatch(
        Caller::player(stranger),
        ClientMsg::LeaveRoom {
            room_id: room_id.clone(),
        },
    );
    assert_eq!(outbox.last_error(stranger), Some(ErrorCode::PlayerNotFound));
    // Disconnect of an unseated connection is harmless.
    svc.disconnect(stranger);
    assert_eq!(svc.room_count(), 1);
}

#[test]
fn stale_scheduled_deals_are_no_ops() {
    let (svc, _) = service();
    let (room_id, host, guest) = started_pair(&svc);

    // Hand 1 is still in play.
    assert!(!svc.deal_scheduled(&room_id, 1));
    // Unknown room.
    assert!(!svc.deal_scheduled("QQQQQ", 1));

    svc.leave_hand(host, &room_id).unwrap();
    svc.leave_room(guest, &room_id).unwrap();
    let view = svc.room_state(host, &room_id).unwrap();
    assert_eq!(view.status, RoomStatus::Finished);

    // Finished games never deal again.
    assert!(!svc.deal_scheduled(&room_id, 1));
    let view = svc.room_state(host, &room_id).unwrap();
    assert_eq!(view.game.unwrap().hand_no, 1);
}

#[tokio::test]
async fn resolved_hand_deals_the_next_after_the_delay() {
    let (svc, outbox) = service_with(RoomServiceConfig {
        next_hand_delay: Duration::from_millis(20),
        ..RoomServiceConfig::default()
    });
    let (room_id, host, guest) = started_pair(&svc);

    svc.dispatch(
        Caller::player(host),
        ClientMsg::LeaveHand {
            room_id: room_id.clone(),
        },
    );
    let view = svc.room_state(host, &room_id).unwrap();
    let game = view.game.unwrap();
    assert_eq!(game.hand_no, 1);
    assert_eq!(game.team_scores.get(Team::Two), 1);
    outbox.clear();

    tokio::time::sleep(Duration::from_millis(200)).await;

    let view = svc.room_state(guest, &room_id).unwrap();
    let game = view.game.unwrap();
    assert_eq!(game.hand_no, 2);
    assert_eq!(game.dealer_index, 1);
    assert_eq!(game.turn_player_id, Some(guest));
    assert_eq!(game.team_scores.get(Team::Two), 1);
    assert_eq!(own_cards(&svc, &room_id, guest).len(), 3);
    assert_eq!(outbox.kinds(guest), vec!["game_update"]);

    // The same generation again does nothing.
    assert!(!svc.deal_scheduled(&room_id, 1));
}

#[test]
fn rooms_list_is_delivered_on_request() {
    let (svc, outbox) = service();
    started_pair(&svc);
    let watcher = Uuid::new_v4();
    svc.dispatch(Caller::player(watcher), ClientMsg::GetRooms);
    match outbox.for_player(watcher).as_slice() {
        [ServerMsg::RoomsList { rooms }] => {
            assert_eq!(rooms.len(), 1);
            assert_eq!(rooms[0].status, RoomStatus::Playing);
        }
        other => panic!("unexpected messages: {other:?}"),
    }
}

fn pushed_lists(outbox: &RecordingOutbox, player: PlayerId) -> Vec<Vec<RoomSummary>> {
    outbox
        .for_player(player)
        .into_iter()
        .filter_map(|msg| match msg {
            ServerMsg::RoomsList { rooms } => Some(rooms),
            _ => None,
        })
        .collect()
}

#[test]
fn room_list_changes_reach_every_connection() {
    let (svc, outbox) = service();
    let lobby = Uuid::new_v4();
    outbox.connect(lobby);

    let host = Uuid::new_v4();
    let guest = Uuid::new_v4();
    let room_id = svc.create_room(host, "Ana", 2).unwrap();
    let lists = pushed_lists(&outbox, lobby);
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].len(), 1);
    assert_eq!(lists[0][0].id, room_id);
    assert_eq!(lists[0][0].players, 1);
    assert_eq!(lists[0][0].status, RoomStatus::Waiting);

    svc.join_room(guest, &room_id, "Beto").unwrap();
    let lists = pushed_lists(&outbox, lobby);
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[1][0].players, 2);
    assert_eq!(lists[1][0].status, RoomStatus::Playing);

    svc.leave_room(guest, &room_id).unwrap();
    let lists = pushed_lists(&outbox, lobby);
    assert_eq!(lists.len(), 3);
    assert_eq!(lists[2][0].players, 1);
    assert_eq!(lists[2][0].status, RoomStatus::Finished);

    // The last player out closes the room.
    svc.disconnect(host);
    let lists = pushed_lists(&outbox, lobby);
    assert_eq!(lists.len(), 4);
    assert!(lists[3].is_empty());

    // Rejected commands change nothing and push nothing.
    assert!(svc.join_room(guest, &room_id, "Beto").is_err());
    assert_eq!(pushed_lists(&outbox, lobby).len(), 4);
}

struct PanicOnListOutbox {
    inner: RecordingOutbox,
}

impl Outbox for PanicOnListOutbox {
    fn deliver(&self, to: PlayerId, msg: ServerMsg) {
        if matches!(msg, ServerMsg::RoomsList { .. }) {
            panic!("transport exploded");
        }
        self.inner.deliver(to, msg);
    }

    fn deliver_all(&self, msg: ServerMsg) {
        self.inner.deliver_all(msg);
    }
}

#[test]
fn handler_panics_are_contained() {
    let outbox = Arc::new(PanicOnListOutbox {
        inner: RecordingOutbox::default(),
    });
    let svc = RoomService::new(outbox.clone(), RoomServiceConfig::default());
    let player = Uuid::new_v4();

    svc.dispatch(Caller::player(player), ClientMsg::GetRooms);
    assert_eq!(outbox.inner.last_error(player), Some(ErrorCode::Internal));

    // The service keeps working.
    svc.create_room(player, "Ana", 2).unwrap();
    assert_eq!(svc.room_count(), 1);
}
