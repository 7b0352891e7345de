//! Promotion: group winners into the elimination bracket.

use crate::logic::bracket::generate_bracket;
use crate::logic::standings::compute_standings;
use crate::models::{Match, MatchId, Team, TournamentError, TournamentId};
use crate::store::MatchStore;
use std::collections::BTreeSet;

/// Rank every group of a category and feed the top finishers into a new
/// bracket. Returns the id of the generated final.
///
/// Groups are processed in label order and each contributes its top
/// `qualifiers_per_group` teams (1 or 2) in rank order, so the promotion
/// list is deterministic and group winners land on the bracket's
/// protected seeds. The flat list must come out at 2, 4, or 8 teams;
/// anything else is rejected before a bracket match is written.
pub fn promote_group_winners(
    store: &dyn MatchStore,
    tournament_id: TournamentId,
    category: &str,
    qualifiers_per_group: usize,
) -> Result<MatchId, TournamentError> {
    let matches = store.matches_by_tournament(tournament_id)?;
    let category_matches: Vec<Match> = matches
        .into_iter()
        .filter(|m| m.category == category)
        .collect();

    let groups: BTreeSet<String> = category_matches
        .iter()
        .filter_map(|m| m.stage.group_label())
        .map(str::to_owned)
        .collect();
    if groups.is_empty() {
        return Err(TournamentError::NoGroupsFound);
    }

    let mut promoted: Vec<Team> = Vec::new();
    for group in &groups {
        let standings = compute_standings(group, &category_matches);
        promoted.extend(
            standings
                .into_iter()
                .take(qualifiers_per_group)
                .map(|s| s.team),
        );
    }

    if !matches!(promoted.len(), 2 | 4 | 8) {
        return Err(TournamentError::UnsupportedBracketSize(promoted.len()));
    }
    generate_bracket(store, tournament_id, category, &promoted)
}
