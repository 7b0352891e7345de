//! Beach tennis tournament engine: data model, referee scoring, group
//! standings, group-phase and bracket generation, and the document-store
//! seam the matches live behind.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    add_point, compute_standings, finish_match, generate_bracket, generate_group_matches,
    promote_group_winners, start_match, toggle_serve, GroupStanding, PointOutcome,
};
pub use models::{
    BracketRound, FinishedResult, Match, MatchId, MatchKind, MatchStatus, Player, PlayerId, Points,
    SetScore, Side, Stage, Team, Tournament, TournamentError, TournamentId, TournamentSettings,
    TournamentStatus,
};
pub use store::{InMemoryMatchStore, MatchPatch, MatchStore, NewMatch};
