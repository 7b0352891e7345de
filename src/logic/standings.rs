//! Group standings: wins, game balance, and ranking points derived from
//! finished matches. Never persisted, so they cannot drift from the
//! match data.

use crate::models::{Match, MatchStatus, Side, Team};
use serde::{Deserialize, Serialize};

/// One team's line in a group table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupStanding {
    pub team_key: String,
    pub team_name: String,
    pub team: Team,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    /// Ranking points: 2 per win.
    pub points: u32,
}

impl GroupStanding {
    /// Game differential, the first tie-break after wins.
    pub fn balance(&self) -> i64 {
        i64::from(self.games_won) - i64::from(self.games_lost)
    }

    fn for_team(team: &Team) -> Self {
        Self {
            team_key: team.key(),
            team_name: team.display_name(),
            team: team.clone(),
            played: 0,
            won: 0,
            lost: 0,
            games_won: 0,
            games_lost: 0,
            points: 0,
        }
    }
}

/// Rank every team seen in `group`'s matches.
///
/// Teams are discovered in match-scan order (side A before side B); a
/// team with no finished match still appears, with all-zero stats.
/// Unfinished matches contribute nothing. Sort order is wins, then game
/// balance, then games won; the sort is stable, so full ties keep
/// discovery order.
pub fn compute_standings(group: &str, matches: &[Match]) -> Vec<GroupStanding> {
    let group_matches: Vec<&Match> = matches
        .iter()
        .filter(|m| m.stage.group_label() == Some(group))
        .collect();

    let mut standings: Vec<GroupStanding> = Vec::new();
    for m in &group_matches {
        for team in [&m.team_a, &m.team_b] {
            let key = team.key();
            if !standings.iter().any(|s| s.team_key == key) {
                standings.push(GroupStanding::for_team(team));
            }
        }
    }

    for standing in &mut standings {
        for m in &group_matches {
            if m.status != MatchStatus::Finished {
                continue;
            }
            let side = if m.team_a.key() == standing.team_key {
                Side::A
            } else if m.team_b.key() == standing.team_key {
                Side::B
            } else {
                continue;
            };
            standing.played += 1;
            if m.sets(side) > m.sets(side.other()) {
                standing.won += 1;
            } else {
                standing.lost += 1;
            }
            for set in &m.history_sets {
                let (own, opp) = match side {
                    Side::A => (set.games_a, set.games_b),
                    Side::B => (set.games_b, set.games_a),
                };
                standing.games_won += own;
                standing.games_lost += opp;
            }
        }
        standing.points = standing.won * 2;
    }

    standings.sort_by(|a, b| {
        b.won
            .cmp(&a.won)
            .then_with(|| b.balance().cmp(&a.balance()))
            .then_with(|| b.games_won.cmp(&a.games_won))
    });
    standings
}
