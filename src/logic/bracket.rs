//! Single-elimination bracket generation for 2, 4, or 8 entrants.

use crate::models::{BracketRound, MatchId, Stage, Team, TournamentError, TournamentId};
use crate::store::{MatchStore, NewMatch};

struct Slot<'a> {
    round: BracketRound,
    position: u32,
    next_match_id: Option<MatchId>,
    team_a: Team,
    team_b: Team,
    tournament_id: TournamentId,
    category: &'a str,
}

fn create_slot(store: &dyn MatchStore, slot: Slot<'_>) -> Result<MatchId, TournamentError> {
    store.create_match(NewMatch {
        tournament_id: slot.tournament_id,
        category: slot.category.to_string(),
        team_a: slot.team_a,
        team_b: slot.team_b,
        stage: Stage::Bracket {
            round: slot.round,
            position: slot.position,
            next_match_id: slot.next_match_id,
        },
    })
}

/// Build the bracket tree for `teams`, already in seeding order.
/// Returns the id of the final.
///
/// Shapes:
/// - 2 entrants: the final, directly seeded.
/// - 4 entrants: final placeholder plus two seeded semifinals
///   (0 v 3 and 1 v 2) pointing at it.
/// - 8 entrants: final and semifinal placeholders plus four seeded
///   quarterfinals (0 v 7, 3 v 4, 1 v 6, 2 v 5); quarters 0 and 1 feed
///   semi 0, quarters 2 and 3 feed semi 1.
///
/// The fixed cross-seeding keeps the top entrants apart until the late
/// rounds. Unseeded slots carry placeholder teams so both sides of every
/// match stay populated. Any other team count is rejected before
/// anything is written.
pub fn generate_bracket(
    store: &dyn MatchStore,
    tournament_id: TournamentId,
    category: &str,
    teams: &[Team],
) -> Result<MatchId, TournamentError> {
    let slot = |round, position, next_match_id, team_a: &Team, team_b: &Team| Slot {
        round,
        position,
        next_match_id,
        team_a: team_a.clone(),
        team_b: team_b.clone(),
        tournament_id,
        category,
    };
    let open = || Team::placeholder(category);

    match teams {
        [a, b] => create_slot(store, slot(BracketRound::Final, 0, None, a, b)),
        [t0, t1, t2, t3] => {
            let final_id = create_slot(store, slot(BracketRound::Final, 0, None, &open(), &open()))?;
            create_slot(store, slot(BracketRound::Semifinal, 0, Some(final_id), t0, t3))?;
            create_slot(store, slot(BracketRound::Semifinal, 1, Some(final_id), t1, t2))?;
            Ok(final_id)
        }
        [t0, t1, t2, t3, t4, t5, t6, t7] => {
            let final_id = create_slot(store, slot(BracketRound::Final, 0, None, &open(), &open()))?;
            let semi0 = create_slot(
                store,
                slot(BracketRound::Semifinal, 0, Some(final_id), &open(), &open()),
            )?;
            let semi1 = create_slot(
                store,
                slot(BracketRound::Semifinal, 1, Some(final_id), &open(), &open()),
            )?;
            create_slot(store, slot(BracketRound::Quarterfinal, 0, Some(semi0), t0, t7))?;
            create_slot(store, slot(BracketRound::Quarterfinal, 1, Some(semi0), t3, t4))?;
            create_slot(store, slot(BracketRound::Quarterfinal, 2, Some(semi1), t1, t6))?;
            create_slot(store, slot(BracketRound::Quarterfinal, 3, Some(semi1), t2, t5))?;
            Ok(final_id)
        }
        _ => Err(TournamentError::UnsupportedBracketSize(teams.len())),
    }
}
