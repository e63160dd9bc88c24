use crate::domain::player_view::{project, project_unmasked, summary, CardView};
use crate::domain::test_state_helpers::{pid, room_with_hands};
use crate::domain::{Call, EnvidoCall, RoomStatus, Team, TrucoCall};

fn four_player_room() -> crate::domain::Room {
    room_with_hands(
        &[
            &["4_copa", "5_copa", "6_copa"],
            &["4_basto", "5_basto", "6_basto"],
            &["1_espada", "5_oro", "6_oro"],
            &["7_copa", "12_copa", "11_copa"],
        ],
        "3_espada",
    )
}

#[test]
fn projection_hides_exactly_the_opponents() {
    let room = four_player_room();
    let viewer = pid(&room, 0);
    let view = project(&room, viewer);
    let game = view.game.expect("game view");

    for (seat, player) in room.players.iter().enumerate() {
        let cards = &game.hands[&player.id];
        assert_eq!(cards.len(), 3);
        let hidden = cards.iter().all(|c| matches!(c, CardView::Hidden { .. }));
        let visible = cards.iter().all(|c| matches!(c, CardView::Visible(_)));
        if Team::for_seat(seat) == Team::One {
            assert!(visible, "teammate seat {seat} should be visible");
        } else {
            assert!(hidden, "opponent seat {seat} should be hidden");
        }
    }
}

#[test]
fn projection_leaves_canonical_state_untouched() {
    let room = four_player_room();
    let before = format!("{:?}", room.game);
    let _ = project(&room, pid(&room, 1));
    assert_eq!(before, format!("{:?}", room.game));
    assert!(room.game.as_ref().unwrap().hands.iter().all(|h| h.len() == 3));
}

#[test]
fn hidden_cards_serialize_as_placeholders() {
    let room = four_player_room();
    let view = project(&room, pid(&room, 1));
    let json = serde_json::to_value(&view).unwrap();
    let p0 = pid(&room, 0).to_string();
    assert_eq!(
        json["game"]["hands"][&p0],
        serde_json::json!([{"hidden": true}, {"hidden": true}, {"hidden": true}])
    );
    let p1 = pid(&room, 1).to_string();
    assert_eq!(json["game"]["hands"][&p1][0]["id"], "4_basto");
    assert_eq!(json["status"], "playing");
}

#[test]
fn unmasked_view_shows_every_hand() {
    let room = four_player_room();
    let view = project_unmasked(&room);
    let game = view.game.unwrap();
    assert!(game
        .hands
        .values()
        .flatten()
        .all(|c| matches!(c, CardView::Visible(_))));
    assert!(view.viewer.is_none());
}

#[test]
fn viewer_block_reports_turn_and_calls() {
    let room = four_player_room();
    let on_turn = project(&room, pid(&room, 0)).viewer.unwrap();
    assert!(on_turn.is_turn);
    assert_eq!(on_turn.team, Team::One);
    // Three copas.
    assert!(on_turn.has_flor);
    assert_eq!(on_turn.envido_points, Some(20));
    assert!(on_turn.legal_calls.contains(&Call::Truco(TrucoCall::Truco)));
    assert!(on_turn.legal_calls.contains(&Call::Flor));
    assert!(!on_turn.can_respond);

    let waiting = project(&room, pid(&room, 1)).viewer.unwrap();
    assert!(!waiting.is_turn);
    assert!(waiting.legal_calls.is_empty());
}

#[test]
fn target_sees_counter_calls() {
    let mut room = four_player_room();
    let p0 = pid(&room, 0);
    room.make_call(p0, Call::Envido(EnvidoCall::Envido)).unwrap();
    let target = project(&room, pid(&room, 1)).viewer.unwrap();
    assert!(target.can_respond);
    assert_eq!(
        target.legal_calls,
        vec![
            Call::Envido(EnvidoCall::RealEnvido),
            Call::Envido(EnvidoCall::FaltaEnvido),
            Call::Flor
        ]
    );
}

#[test]
fn summary_counts_players() {
    let room = four_player_room();
    let s = summary(&room);
    assert_eq!(s.players, 4);
    assert_eq!(s.max_players, 4);
    assert_eq!(s.status, RoomStatus::Playing);
    assert_eq!(s.host, "p0");
}

#[test]
fn forfeited_game_has_nobody_on_turn() {
    let mut room = four_player_room();
    let on_turn = room.game.as_ref().expect("game").turn_index;
    let leaver = pid(&room, on_turn);
    let other = room
        .players
        .iter()
        .map(|p| p.id)
        .find(|id| *id != leaver)
        .expect("another player");
    assert_eq!(
        project(&room, other).game.expect("game view").turn_player_id,
        Some(leaver)
    );

    room.remove_player(leaver).unwrap();
    assert_eq!(room.status, RoomStatus::Finished);

    for view in [project(&room, other), project_unmasked(&room)] {
        assert_eq!(view.game.expect("game view").turn_player_id, None);
    }
    let viewer = project(&room, other).viewer.expect("viewer block");
    assert!(!viewer.is_turn);
    assert!(viewer.legal_calls.is_empty());
}
