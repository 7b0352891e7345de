//! Document-store seam: match persistence as four operations.
//!
//! The engine never talks to a concrete backend; it reads and writes
//! matches through [`MatchStore`]. Any store with create /
//! read-by-tournament / merge-patch update / delete semantics works.
//! [`InMemoryMatchStore`] is the reference implementation backing the
//! `web` binary and the tests.

use crate::models::{
    FinishedResult, Match, MatchId, MatchStatus, Points, SetScore, Side, Stage, Team,
    TournamentError, TournamentId,
};
use chrono::{DateTime, Utc};
use std::sync::RwLock;
use uuid::Uuid;

/// Fields for a new match. The store assigns the id and applies the
/// default score and status fields.
#[derive(Clone, Debug)]
pub struct NewMatch {
    pub tournament_id: TournamentId,
    pub category: String,
    pub team_a: Team,
    pub team_b: Team,
    pub stage: Stage,
}

impl NewMatch {
    fn into_match(self, id: MatchId) -> Match {
        Match::new(
            id,
            self.tournament_id,
            self.category,
            self.team_a,
            self.team_b,
            self.stage,
        )
    }
}

/// Merge patch for a match: set fields are applied, unset fields are
/// left untouched.
#[derive(Clone, Debug, Default)]
pub struct MatchPatch {
    pub status: Option<MatchStatus>,
    pub sets_a: Option<u32>,
    pub sets_b: Option<u32>,
    pub points_a: Option<Points>,
    pub points_b: Option<Points>,
    pub history_sets: Option<Vec<SetScore>>,
    pub serving: Option<Side>,
    pub team_a: Option<Team>,
    pub team_b: Option<Team>,
    pub end_time: Option<DateTime<Utc>>,
}

impl MatchPatch {
    /// The full score state of `m`, as a referee client writes it back
    /// after a scoring event.
    pub fn score_of(m: &Match) -> Self {
        Self {
            status: Some(m.status),
            sets_a: Some(m.sets_a),
            sets_b: Some(m.sets_b),
            points_a: Some(m.points_a),
            points_b: Some(m.points_b),
            history_sets: Some(m.history_sets.clone()),
            serving: Some(m.serving),
            ..Self::default()
        }
    }

    /// Apply this patch to a match in place.
    pub fn apply(self, m: &mut Match) {
        if let Some(v) = self.status {
            m.status = v;
        }
        if let Some(v) = self.sets_a {
            m.sets_a = v;
        }
        if let Some(v) = self.sets_b {
            m.sets_b = v;
        }
        if let Some(v) = self.points_a {
            m.points_a = v;
        }
        if let Some(v) = self.points_b {
            m.points_b = v;
        }
        if let Some(v) = self.history_sets {
            m.history_sets = v;
        }
        if let Some(v) = self.serving {
            m.serving = v;
        }
        if let Some(v) = self.team_a {
            m.team_a = v;
        }
        if let Some(v) = self.team_b {
            m.team_b = v;
        }
        if let Some(v) = self.end_time {
            m.end_time = Some(v);
        }
    }
}

/// The external document store the engine reads and writes matches
/// through.
pub trait MatchStore {
    /// Create a match with default score/status fields; returns the new id.
    fn create_match(&self, new: NewMatch) -> Result<MatchId, TournamentError>;

    /// All matches belonging to a tournament, in creation order.
    fn matches_by_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<Match>, TournamentError>;

    /// Merge-patch one match: fields not set in the patch are untouched.
    fn update_match(&self, id: MatchId, patch: MatchPatch) -> Result<(), TournamentError>;

    /// Remove a match.
    fn delete_match(&self, id: MatchId) -> Result<(), TournamentError>;
}

fn lock_poisoned<T>(_: T) -> TournamentError {
    TournamentError::SyncFailure("store lock poisoned".to_string())
}

/// In-memory store: lock-guarded match list plus the finished-results
/// feed.
#[derive(Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<Vec<Match>>,
    results: RwLock<Vec<FinishedResult>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-match read. Not part of the store contract; API handlers
    /// and tests use it.
    pub fn match_by_id(&self, id: MatchId) -> Option<Match> {
        self.matches
            .read()
            .ok()?
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    /// Append an entry to the finished-results feed.
    pub fn record_result(&self, result: FinishedResult) {
        if let Ok(mut results) = self.results.write() {
            results.push(result);
        }
    }

    /// Finished results for a tournament, newest first.
    pub fn results_by_tournament(&self, tournament_id: TournamentId) -> Vec<FinishedResult> {
        match self.results.read() {
            Ok(results) => results
                .iter()
                .filter(|r| r.tournament_id == tournament_id)
                .rev()
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Remove every match and result belonging to a tournament.
    pub fn delete_tournament_data(
        &self,
        tournament_id: TournamentId,
    ) -> Result<(), TournamentError> {
        self.matches
            .write()
            .map_err(lock_poisoned)?
            .retain(|m| m.tournament_id != tournament_id);
        self.results
            .write()
            .map_err(lock_poisoned)?
            .retain(|r| r.tournament_id != tournament_id);
        Ok(())
    }
}

impl MatchStore for InMemoryMatchStore {
    fn create_match(&self, new: NewMatch) -> Result<MatchId, TournamentError> {
        let mut matches = self.matches.write().map_err(lock_poisoned)?;
        let id = Uuid::new_v4();
        matches.push(new.into_match(id));
        Ok(id)
    }

    fn matches_by_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<Match>, TournamentError> {
        let matches = self.matches.read().map_err(lock_poisoned)?;
        Ok(matches
            .iter()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect())
    }

    fn update_match(&self, id: MatchId, patch: MatchPatch) -> Result<(), TournamentError> {
        let mut matches = self.matches.write().map_err(lock_poisoned)?;
        let m = matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))?;
        patch.apply(m);
        Ok(())
    }

    fn delete_match(&self, id: MatchId) -> Result<(), TournamentError> {
        let mut matches = self.matches.write().map_err(lock_poisoned)?;
        let before = matches.len();
        matches.retain(|m| m.id != id);
        if matches.len() == before {
            return Err(TournamentError::MatchNotFound(id));
        }
        Ok(())
    }
}
