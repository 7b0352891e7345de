//! Integration tests for promotion and winner advancement: groups to
//! bracket, bracket to champion.

use beach_tennis_web::{
    compute_standings, finish_match, generate_bracket, generate_group_matches,
    promote_group_winners, BracketRound, InMemoryMatchStore, Match, MatchId, MatchKind, MatchPatch,
    MatchStatus, MatchStore, Player, SetScore, Side, Stage, Team, TournamentError, TournamentId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

fn teams(n: usize) -> Vec<Team> {
    (0..n)
        .map(|i| Team::singles(Player::new(format!("T{i}"), "A")))
        .collect()
}

fn stage_of(m: &Match) -> (BracketRound, u32, Option<MatchId>) {
    match &m.stage {
        Stage::Bracket {
            round,
            position,
            next_match_id,
        } => (*round, *position, *next_match_id),
        Stage::Group { .. } => panic!("expected a bracket match"),
    }
}

fn by_round(matches: &[Match], round: BracketRound) -> BTreeMap<u32, Match> {
    matches
        .iter()
        .filter(|m| stage_of(m).0 == round)
        .map(|m| (stage_of(m).1, m.clone()))
        .collect()
}

/// Set a final score and run the finish transition.
fn finish_with(store: &InMemoryMatchStore, id: MatchId, sets: (u32, u32)) {
    store
        .update_match(
            id,
            MatchPatch {
                sets_a: Some(sets.0),
                sets_b: Some(sets.1),
                ..MatchPatch::default()
            },
        )
        .unwrap();
    let updated = store.match_by_id(id).unwrap();
    finish_match(store, &updated).unwrap();
}

#[test]
fn six_singles_end_to_end() {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    let athletes: Vec<Player> = (0..6).map(|i| Player::new(format!("P{i}"), "A")).collect();

    let labels = generate_group_matches(
        &store,
        tid,
        &athletes,
        MatchKind::Singles,
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();
    assert_eq!(labels, vec!["A", "B"]);
    let group_matches = store.matches_by_tournament(tid).unwrap();
    assert_eq!(group_matches.len(), 6);

    // side A wins every group match 6-0
    for m in &group_matches {
        finish_with(&store, m.id, (6, 0));
    }
    let finished: Vec<Match> = store.matches_by_tournament(tid).unwrap();
    assert!(finished.iter().all(|m| m.status == MatchStatus::Finished));

    let final_id = promote_group_winners(&store, tid, "A", 1).unwrap();

    let all = store.matches_by_tournament(tid).unwrap();
    assert_eq!(all.len(), 7);
    let final_match = store.match_by_id(final_id).unwrap();
    assert_eq!(
        stage_of(&final_match),
        (BracketRound::Final, 0, None),
    );
    assert_eq!(final_match.status, MatchStatus::Planned);

    // the final is seeded with each group's top-ranked team, group A first
    let winner_a = compute_standings("A", &finished)[0].team_key.clone();
    let winner_b = compute_standings("B", &finished)[0].team_key.clone();
    assert_eq!(final_match.team_a.key(), winner_a);
    assert_eq!(final_match.team_b.key(), winner_b);
}

#[test]
fn promotion_without_group_matches_fails() {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    assert_eq!(
        promote_group_winners(&store, tid, "A", 1).unwrap_err(),
        TournamentError::NoGroupsFound
    );
}

#[test]
fn promotion_filters_by_category() {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    let athletes: Vec<Player> = (0..6).map(|i| Player::new(format!("P{i}"), "A")).collect();
    generate_group_matches(
        &store,
        tid,
        &athletes,
        MatchKind::Singles,
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();
    assert_eq!(
        promote_group_winners(&store, tid, "B", 1).unwrap_err(),
        TournamentError::NoGroupsFound
    );
}

#[test]
fn incompatible_promotion_count_writes_nothing() {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    let athletes: Vec<Player> = (0..3).map(|i| Player::new(format!("P{i}"), "A")).collect();
    generate_group_matches(
        &store,
        tid,
        &athletes,
        MatchKind::Singles,
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();
    for m in store.matches_by_tournament(tid).unwrap() {
        finish_with(&store, m.id, (6, 2));
    }
    // one group, one qualifier: a 1-team bracket does not exist
    assert_eq!(
        promote_group_winners(&store, tid, "A", 1).unwrap_err(),
        TournamentError::UnsupportedBracketSize(1)
    );
    assert_eq!(store.matches_by_tournament(tid).unwrap().len(), 3);
}

#[test]
fn even_position_winner_fills_the_a_slot() {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    let entrants = teams(8);
    generate_bracket(&store, tid, "A", &entrants).unwrap();
    let matches = store.matches_by_tournament(tid).unwrap();
    let quarters = by_round(&matches, BracketRound::Quarterfinal);

    let q0 = &quarters[&0];
    finish_with(&store, q0.id, (2, 0));

    let semi0 = store.match_by_id(stage_of(q0).2.unwrap()).unwrap();
    assert_eq!(semi0.team_a.key(), entrants[0].key());
    // the odd slot stays open
    assert_eq!(semi0.team_b.player1.name, "TBD");
}

#[test]
fn odd_position_winner_fills_the_b_slot() {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    let entrants = teams(8);
    generate_bracket(&store, tid, "A", &entrants).unwrap();
    let matches = store.matches_by_tournament(tid).unwrap();
    let quarters = by_round(&matches, BracketRound::Quarterfinal);

    // quarter 1 is T3 v T4; side B wins
    let q1 = &quarters[&1];
    finish_with(&store, q1.id, (0, 2));

    let semi0 = store.match_by_id(stage_of(q1).2.unwrap()).unwrap();
    assert_eq!(semi0.team_b.key(), entrants[4].key());
    assert_eq!(semi0.team_a.player1.name, "TBD");
}

#[test]
fn winners_cascade_through_all_rounds() {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    let entrants = teams(8);
    let final_id = generate_bracket(&store, tid, "A", &entrants).unwrap();
    let matches = store.matches_by_tournament(tid).unwrap();

    // side A wins every quarter: T0, T3, T1, T2 advance
    let quarters = by_round(&matches, BracketRound::Quarterfinal);
    for position in 0..4 {
        finish_with(&store, quarters[&position].id, (6, 1));
    }
    let semis = by_round(
        &store.matches_by_tournament(tid).unwrap(),
        BracketRound::Semifinal,
    );
    assert_eq!(semis[&0].team_a.key(), entrants[0].key());
    assert_eq!(semis[&0].team_b.key(), entrants[3].key());
    assert_eq!(semis[&1].team_a.key(), entrants[1].key());
    assert_eq!(semis[&1].team_b.key(), entrants[2].key());

    // semi 0 to side A (T0), semi 1 to side B (T2)
    finish_with(&store, semis[&0].id, (6, 4));
    finish_with(&store, semis[&1].id, (3, 6));

    let final_match = store.match_by_id(final_id).unwrap();
    assert_eq!(final_match.team_a.key(), entrants[0].key());
    assert_eq!(final_match.team_b.key(), entrants[2].key());

    finish_with(&store, final_id, (6, 2));
    let final_match = store.match_by_id(final_id).unwrap();
    assert_eq!(final_match.status, MatchStatus::Finished);
    assert_eq!(final_match.winner(), Some(Side::A));
}

#[test]
fn tied_score_cannot_finish() {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    let entrants = teams(2);
    let final_id = generate_bracket(&store, tid, "A", &entrants).unwrap();
    store
        .update_match(
            final_id,
            MatchPatch {
                sets_a: Some(1),
                sets_b: Some(1),
                ..MatchPatch::default()
            },
        )
        .unwrap();
    let m = store.match_by_id(final_id).unwrap();
    assert_eq!(finish_match(&store, &m).unwrap_err(), TournamentError::TiedScore);
    let m = store.match_by_id(final_id).unwrap();
    assert_eq!(m.status, MatchStatus::Planned);
    assert!(m.end_time.is_none());
}

#[test]
fn finish_records_the_game_tally_as_set_history() {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    let entrants = teams(2);
    let final_id = generate_bracket(&store, tid, "A", &entrants).unwrap();
    finish_with(&store, final_id, (6, 3));
    let m = store.match_by_id(final_id).unwrap();
    assert_eq!(m.status, MatchStatus::Finished);
    assert!(m.end_time.is_some());
    assert_eq!(
        m.history_sets,
        vec![SetScore {
            games_a: 6,
            games_b: 3
        }]
    );
}

#[test]
fn finishing_twice_is_a_noop() {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    let entrants = teams(8);
    generate_bracket(&store, tid, "A", &entrants).unwrap();
    let matches = store.matches_by_tournament(tid).unwrap();
    let quarters = by_round(&matches, BracketRound::Quarterfinal);

    let q0_id = quarters[&0].id;
    finish_with(&store, q0_id, (2, 0));
    let finished = store.match_by_id(q0_id).unwrap();
    finish_match(&store, &finished).unwrap();

    let semi0 = store.match_by_id(stage_of(&quarters[&0]).2.unwrap()).unwrap();
    assert_eq!(semi0.team_a.key(), entrants[0].key());
    let q0 = store.match_by_id(q0_id).unwrap();
    assert_eq!(q0.history_sets.len(), 1);
}
