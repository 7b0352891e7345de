//! Data model: players, teams, matches, tournaments.

mod matches;
mod player;
mod team;
mod tournament;

pub use matches::{
    BracketRound, FinishedResult, Match, MatchId, MatchStatus, Points, SetScore, Side, Stage,
};
pub use player::{Player, PlayerId};
pub use team::Team;
pub use tournament::{
    MatchKind, Tournament, TournamentError, TournamentId, TournamentSettings, TournamentStatus,
};
