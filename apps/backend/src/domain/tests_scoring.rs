use crate::domain::scoring::{award, check_winner, end_hand, falta_envido_value};
use crate::domain::test_state_helpers::game_with_hands;
use crate::domain::{HandOutcome, Phase, Team, TeamTally, WIN_THRESHOLD};

fn tally(team1: u8, team2: u8) -> TeamTally {
    TeamTally { team1, team2 }
}

#[test]
fn winner_at_threshold() {
    assert_eq!(check_winner(&tally(29, 29)), None);
    assert_eq!(check_winner(&tally(WIN_THRESHOLD, 3)), Some(Team::One));
    assert_eq!(check_winner(&tally(12, 31)), Some(Team::Two));
    // Team 1 is checked first.
    assert_eq!(check_winner(&tally(30, 30)), Some(Team::One));
}

#[test]
fn falta_envido_bounds() {
    assert_eq!(falta_envido_value(&tally(0, 0)), 30);
    assert_eq!(falta_envido_value(&tally(25, 14)), 16);
    assert_eq!(falta_envido_value(&tally(30, 31)), 1);
}

#[test]
fn end_hand_awards_and_closes() {
    let mut g = game_with_hands(
        &[&["4_copa", "5_basto", "7_oro"], &["6_espada", "12_basto", "1_copa"]],
        "3_espada",
    );
    award(&mut g, Team::One, 2);
    end_hand(
        &mut g,
        HandOutcome::Abandoned {
            team: Team::Two,
            points: 3,
        },
    );
    assert_eq!(g.team_scores, tally(2, 3));
    assert_eq!(g.phase, Phase::HandOver);
    assert_eq!(g.last_hand.map(|h| h.team()), Some(Team::Two));
}

#[test]
fn scores_saturate() {
    let mut t = tally(250, 0);
    t.add(Team::One, 10);
    assert_eq!(t.get(Team::One), u8::MAX);
}
