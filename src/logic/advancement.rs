//! Match lifecycle transitions and winner advancement through the
//! bracket.

use crate::models::{Match, MatchStatus, SetScore, Stage, TournamentError};
use crate::store::{MatchPatch, MatchStore};
use chrono::Utc;

/// Move a planned match to ongoing. Already-ongoing is a no-op; the
/// status never regresses from finished.
pub fn start_match(store: &dyn MatchStore, m: &Match) -> Result<(), TournamentError> {
    match m.status {
        MatchStatus::Planned => store.update_match(
            m.id,
            MatchPatch {
                status: Some(MatchStatus::Ongoing),
                ..MatchPatch::default()
            },
        ),
        MatchStatus::Ongoing => Ok(()),
        MatchStatus::Finished => Err(TournamentError::InvalidStatus),
    }
}

/// Finish a match and, for bracket matches, advance the winner one hop.
///
/// The sets tally must have a strict winner. If no set history was
/// recorded yet, the final game tally is stored as the completed set so
/// the standings can read games from it. When the match points at a next
/// match, the winner lands in that match's A slot for even bracket
/// positions and its B slot for odd ones. Finishing later rounds repeats
/// the same single hop; that is how a run cascades to the final, not by
/// walking the tree. Finishing an already-finished match is a no-op.
pub fn finish_match(store: &dyn MatchStore, m: &Match) -> Result<(), TournamentError> {
    if m.status == MatchStatus::Finished {
        return Ok(());
    }
    let winner_side = m.winner().ok_or(TournamentError::TiedScore)?;

    let mut patch = MatchPatch {
        status: Some(MatchStatus::Finished),
        end_time: Some(Utc::now()),
        ..MatchPatch::default()
    };
    if m.history_sets.is_empty() {
        patch.history_sets = Some(vec![SetScore {
            games_a: m.sets_a,
            games_b: m.sets_b,
        }]);
    }
    store.update_match(m.id, patch)?;

    if let Stage::Bracket {
        position,
        next_match_id: Some(next_id),
        ..
    } = &m.stage
    {
        let winner = m.team(winner_side).clone();
        let slot = if position % 2 == 0 {
            MatchPatch {
                team_a: Some(winner),
                ..MatchPatch::default()
            }
        } else {
            MatchPatch {
                team_b: Some(winner),
                ..MatchPatch::default()
            }
        };
        store.update_match(*next_id, slot)?;
    }
    Ok(())
}
