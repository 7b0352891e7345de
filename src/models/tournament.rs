//! Tournament entity, rule settings, and the crate error type.

use crate::models::matches::MatchId;
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Fewer teams than the operation needs (group phase needs 3).
    InsufficientParticipants { required: usize, actual: usize },
    /// Brackets support exactly 2, 4, or 8 entrants.
    UnsupportedBracketSize(usize),
    /// Promotion requested for a category with no group-tagged matches.
    NoGroupsFound,
    /// A store write did not complete; the caller may retry or regenerate.
    SyncFailure(String),
    /// No match with this id in the store.
    MatchNotFound(MatchId),
    /// Finishing a match requires a strict sets winner.
    TiedScore,
    /// Match status only moves forward (planned -> ongoing -> finished).
    InvalidStatus,
    /// Athlete names are unique within a tournament (case-insensitive).
    DuplicateAthlete,
    /// Athlete name must be non-empty.
    EmptyAthleteName,
    /// Athlete not found in the roster.
    PlayerNotFound(PlayerId),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InsufficientParticipants { required, actual } => {
                write!(f, "Need at least {} teams, got {}", required, actual)
            }
            TournamentError::UnsupportedBracketSize(count) => {
                write!(f, "Brackets support 2, 4 or 8 teams, got {}", count)
            }
            TournamentError::NoGroupsFound => write!(f, "No groups found for this category"),
            TournamentError::SyncFailure(detail) => write!(f, "Store write failed: {}", detail),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::TiedScore => write!(f, "Cannot finish a match with a tied sets score"),
            TournamentError::InvalidStatus => write!(f, "Match status cannot move backwards"),
            TournamentError::DuplicateAthlete => {
                write!(f, "An athlete with this name already exists")
            }
            TournamentError::EmptyAthleteName => write!(f, "Athlete name must not be empty"),
            TournamentError::PlayerNotFound(_) => write!(f, "Athlete not found"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Where the tournament is in its life.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Entering athletes; no matches generated yet.
    #[default]
    Planning,
    Active,
    Finished,
    Cancelled,
}

/// Singles or doubles play.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Singles,
    #[default]
    Doubles,
}

/// Per-tournament scoring rules.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    /// Games a side needs to take the set; the caller finishes the match
    /// when a side reaches it.
    #[serde(default = "default_games_per_set")]
    pub games_per_set: u32,
    /// Golden point: at 40-40 the next point wins the game outright.
    #[serde(default = "default_no_ad")]
    pub no_ad: bool,
}

fn default_games_per_set() -> u32 {
    6
}

fn default_no_ad() -> bool {
    true
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            games_per_set: default_games_per_set(),
            no_ad: default_no_ad(),
        }
    }
}

/// A tournament: athlete roster, categories, and scoring rules. Matches
/// live in the external store, keyed by this tournament's id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub date: NaiveDate,
    pub status: TournamentStatus,
    pub kind: MatchKind,
    /// Category labels seen in the roster, in first-seen order.
    pub categories: Vec<String>,
    pub athletes: Vec<Player>,
    pub settings: TournamentSettings,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Planning state with an empty roster.
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        kind: MatchKind,
        settings: TournamentSettings,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date,
            status: TournamentStatus::Planning,
            kind,
            categories: Vec::new(),
            athletes: Vec::new(),
            settings,
            created_at: Utc::now(),
        }
    }

    /// Register an athlete. Names are unique per tournament
    /// (case-insensitive); a new category label is recorded on first use.
    pub fn add_athlete(
        &mut self,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<PlayerId, TournamentError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyAthleteName);
        }
        if self
            .athletes
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name))
        {
            return Err(TournamentError::DuplicateAthlete);
        }
        let category = category.into();
        if !self.categories.iter().any(|c| c == &category) {
            self.categories.push(category.clone());
        }
        let player = Player::new(name, category);
        let id = player.id;
        self.athletes.push(player);
        Ok(id)
    }

    /// Remove an athlete from the roster by id.
    pub fn remove_athlete(&mut self, id: PlayerId) -> Result<(), TournamentError> {
        let idx = self
            .athletes
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))?;
        self.athletes.remove(idx);
        Ok(())
    }

    /// Athletes registered in `category`, in roster order.
    pub fn athletes_in_category(&self, category: &str) -> Vec<Player> {
        self.athletes
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }
}
