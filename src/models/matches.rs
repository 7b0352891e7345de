//! Match score state, lifecycle status, and stage metadata.

use crate::models::team::Team;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One side of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    A,
    B,
}

impl Side {
    /// The opposing side.
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Current-game score for one side: the standard ladder plus the
/// advantage sentinel (carried for score corrections; see scoring).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Points {
    #[default]
    Love,
    Fifteen,
    Thirty,
    Forty,
    Ad,
}

/// Lifecycle status of a match. Only moves forward.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Planned,
    Ongoing,
    Finished,
}

/// Completed-set result: games won per side.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub games_a: u32,
    pub games_b: u32,
}

/// Elimination round, earliest first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketRound {
    Quarterfinal,
    Semifinal,
    Final,
}

/// Where a match sits in the tournament: group stage or elimination
/// bracket. A generated match is always exactly one of the two.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Group {
        /// Group label: "A", "B", ...
        label: String,
    },
    Bracket {
        round: BracketRound,
        /// Zero-based position within the round.
        position: u32,
        /// Match the winner advances into; None for the final.
        #[serde(skip_serializing_if = "Option::is_none")]
        next_match_id: Option<MatchId>,
    },
}

impl Stage {
    /// Group label, if this is a group-stage match.
    pub fn group_label(&self) -> Option<&str> {
        match self {
            Stage::Group { label } => Some(label),
            Stage::Bracket { .. } => None,
        }
    }
}

/// A single contest between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub category: String,
    pub team_a: Team,
    pub team_b: Team,
    /// Sets won per side (the running game tally of the current set in
    /// single-set play).
    pub sets_a: u32,
    pub sets_b: u32,
    pub points_a: Points,
    pub points_b: Points,
    /// Completed-set results, oldest first.
    pub history_sets: Vec<SetScore>,
    pub serving: Side,
    pub status: MatchStatus,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Match {
    /// New match with the default score state: planned, 0-0, love-love,
    /// no set history, side A serving.
    pub fn new(
        id: MatchId,
        tournament_id: TournamentId,
        category: impl Into<String>,
        team_a: Team,
        team_b: Team,
        stage: Stage,
    ) -> Self {
        Self {
            id,
            tournament_id,
            category: category.into(),
            team_a,
            team_b,
            sets_a: 0,
            sets_b: 0,
            points_a: Points::Love,
            points_b: Points::Love,
            history_sets: Vec::new(),
            serving: Side::A,
            status: MatchStatus::Planned,
            stage,
            end_time: None,
        }
    }

    /// Team on the given side.
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    /// Sets won by the given side.
    pub fn sets(&self, side: Side) -> u32 {
        match side {
            Side::A => self.sets_a,
            Side::B => self.sets_b,
        }
    }

    /// Side with strictly more sets, if any.
    pub fn winner(&self) -> Option<Side> {
        match self.sets_a.cmp(&self.sets_b) {
            Ordering::Greater => Some(Side::A),
            Ordering::Less => Some(Side::B),
            Ordering::Equal => None,
        }
    }
}

/// Flat record saved when a match finishes (the results ticker).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FinishedResult {
    pub id: Uuid,
    pub tournament_id: TournamentId,
    pub match_id: MatchId,
    pub team_a_names: String,
    pub team_b_names: String,
    pub sets_a: u32,
    pub sets_b: u32,
    pub end_time: DateTime<Utc>,
}

impl FinishedResult {
    /// Snapshot a finished match; team names are frozen at finish time.
    pub fn from_match(m: &Match) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id: m.tournament_id,
            match_id: m.id,
            team_a_names: m.team_a.display_name(),
            team_b_names: m.team_b.display_name(),
            sets_a: m.sets_a,
            sets_b: m.sets_b,
            end_time: m.end_time.unwrap_or_else(Utc::now),
        }
    }
}
