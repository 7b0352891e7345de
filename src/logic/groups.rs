//! Group stage: team building, draw, and round-robin match generation.

use crate::models::{MatchKind, Player, Stage, Team, TournamentError, TournamentId};
use crate::store::{MatchStore, NewMatch};
use rand::seq::SliceRandom;
use rand::Rng;

/// Build teams from the athlete roster: singles is one team per athlete,
/// doubles pairs athletes in roster order (a trailing unpaired athlete
/// is dropped).
fn build_teams(athletes: &[Player], kind: MatchKind) -> Vec<Team> {
    match kind {
        MatchKind::Singles => athletes.iter().cloned().map(Team::singles).collect(),
        MatchKind::Doubles => athletes
            .chunks_exact(2)
            .map(|pair| Team::doubles(pair[0].clone(), pair[1].clone()))
            .collect(),
    }
}

/// Split the drawn teams into groups. Prefers 4; takes 3 whenever taking
/// 4 would strand 1 or 2 teams (remaining counts 5 and 6). A trailing
/// pair never stands alone: it merges into the previous group, so 5
/// teams end up as one group of 5.
fn partition_into_groups(teams: Vec<Team>) -> Vec<Vec<Team>> {
    let mut groups: Vec<Vec<Team>> = Vec::new();
    let mut rest = teams;
    while !rest.is_empty() {
        let remaining = rest.len();
        if remaining == 2 {
            let pair: Vec<Team> = rest.drain(..).collect();
            match groups.last_mut() {
                Some(last) => last.extend(pair),
                None => groups.push(pair),
            }
            break;
        }
        let take = match remaining {
            5 | 6 => 3,
            n if n >= 4 => 4,
            n => n,
        };
        groups.push(rest.drain(..take).collect());
    }
    groups
}

/// Sequential group labels: A, B, C, ...
fn group_label(index: usize) -> String {
    char::from(b'A' + index as u8).to_string()
}

/// Generate the complete group phase for a roster.
///
/// Shuffles the teams (fair swap shuffle), partitions them into groups
/// labeled from 'A', and creates one planned match per unordered pairing
/// in each group (full round robin, category taken from the pairing's
/// first player). Fails before writing anything when fewer than 3 teams
/// come out of the roster. Returns the group labels in draw order.
pub fn generate_group_matches<R: Rng>(
    store: &dyn MatchStore,
    tournament_id: TournamentId,
    athletes: &[Player],
    kind: MatchKind,
    rng: &mut R,
) -> Result<Vec<String>, TournamentError> {
    let mut teams = build_teams(athletes, kind);
    if teams.len() < 3 {
        return Err(TournamentError::InsufficientParticipants {
            required: 3,
            actual: teams.len(),
        });
    }
    teams.shuffle(rng);

    let groups = partition_into_groups(teams);
    let mut labels = Vec::with_capacity(groups.len());
    for (index, group) in groups.iter().enumerate() {
        let label = group_label(index);
        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                store.create_match(NewMatch {
                    tournament_id,
                    category: group[i].player1.category.clone(),
                    team_a: group[i].clone(),
                    team_b: group[j].clone(),
                    stage: Stage::Group {
                        label: label.clone(),
                    },
                })?;
            }
        }
        labels.push(label);
    }
    Ok(labels)
}
