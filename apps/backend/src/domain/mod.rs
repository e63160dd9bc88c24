//! Domain layer: pure game logic types and helpers.

pub mod calls;
pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod game_transition;
pub mod player_view;
pub mod room;
pub mod rules;
pub mod scoring;
pub mod seed_derivation;
pub mod state;
pub mod tricks;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_player_view;
#[cfg(test)]
mod tests_props_tricks;
#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use calls::{Call, CallOutcome, Challenge, EnvidoCall, Response, TrucoCall};
pub use cards_logic::{envido_points, has_flor, is_pieza, power};
pub use cards_types::{Card, DealtCard, Rank, Suit};
pub use dealing::{deal, full_deck, shuffled_deck, Deal, DealOptions};
pub use player_view::{project, project_unmasked, summary, RoomSummary, RoomView};
pub use room::{Departure, Player, Room, RoomId, RoomStatus};
pub use rules::WIN_THRESHOLD;
pub use seed_derivation::derive_dealing_seed;
pub use state::{GameState, HandOutcome, Phase, Play, PlayerId, Seat, Team, TeamTally};
