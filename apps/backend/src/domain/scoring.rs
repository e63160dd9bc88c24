use crate::domain::rules::WIN_THRESHOLD;
use crate::domain::state::{GameState, HandOutcome, Phase, Team, TeamTally};

/// Add points to a team. Scores never decrease.
pub fn award(state: &mut GameState, team: Team, points: u8) {
    state.team_scores.add(team, points);
}

/// Award the outcome's points, close the hand and record why it ended.
pub fn end_hand(state: &mut GameState, outcome: HandOutcome) {
    let points = match outcome {
        HandOutcome::Rounds { points, .. }
        | HandOutcome::Declined { points, .. }
        | HandOutcome::Abandoned { points, .. } => points,
    };
    award(state, outcome.team(), points);
    state.pending_challenge = None;
    state.phase = Phase::HandOver;
    state.last_hand = Some(outcome);
}

/// First team at or above the threshold, team 1 checked first.
pub fn check_winner(scores: &TeamTally) -> Option<Team> {
    [Team::One, Team::Two]
        .into_iter()
        .find(|&team| scores.get(team) >= WIN_THRESHOLD)
}

/// Falta envido is worth what the trailing team still needs to win.
pub fn falta_envido_value(scores: &TeamTally) -> u8 {
    let trailing = scores.team1.min(scores.team2);
    WIN_THRESHOLD.saturating_sub(trailing).max(1)
}
