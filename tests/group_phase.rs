//! Integration tests for group phase generation: draw, partition
//! policy, and round-robin output.

use beach_tennis_web::{
    generate_group_matches, InMemoryMatchStore, Match, MatchKind, MatchStatus, MatchStore, Player,
    Stage, Team, TournamentError, TournamentId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, BTreeSet};

fn roster(n: usize) -> Vec<Player> {
    (0..n).map(|i| Player::new(format!("P{i}"), "A")).collect()
}

fn generate(n: usize, kind: MatchKind) -> (InMemoryMatchStore, TournamentId, Vec<String>) {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    let labels =
        generate_group_matches(&store, tid, &roster(n), kind, &mut StdRng::seed_from_u64(7))
            .expect("generation succeeds");
    (store, tid, labels)
}

/// Distinct team keys per group label.
fn group_members(matches: &[Match]) -> BTreeMap<String, BTreeSet<String>> {
    let mut members: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for m in matches {
        let label = m.stage.group_label().expect("group match").to_string();
        let entry = members.entry(label).or_default();
        entry.insert(m.team_a.key());
        entry.insert(m.team_b.key());
    }
    members
}

fn group_sizes(n: usize) -> Vec<usize> {
    let (store, tid, _) = generate(n, MatchKind::Singles);
    let matches = store.matches_by_tournament(tid).unwrap();
    let mut sizes: Vec<usize> = group_members(&matches).values().map(BTreeSet::len).collect();
    sizes.sort_unstable();
    sizes
}

#[test]
fn fewer_than_three_teams_is_rejected() {
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    let err = generate_group_matches(
        &store,
        tid,
        &roster(2),
        MatchKind::Singles,
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap_err();
    assert_eq!(
        err,
        TournamentError::InsufficientParticipants {
            required: 3,
            actual: 2
        }
    );
    assert!(store.matches_by_tournament(tid).unwrap().is_empty());
}

#[test]
fn six_entrants_make_two_groups_of_three() {
    let (store, tid, labels) = generate(6, MatchKind::Singles);
    assert_eq!(labels, vec!["A", "B"]);
    let matches = store.matches_by_tournament(tid).unwrap();
    assert_eq!(matches.len(), 6);
    let members = group_members(&matches);
    assert_eq!(members["A"].len(), 3);
    assert_eq!(members["B"].len(), 3);
}

#[test]
fn partition_prefers_four_and_never_strands_a_pair() {
    assert_eq!(group_sizes(3), vec![3]);
    assert_eq!(group_sizes(4), vec![4]);
    // 5 has no 3/4 split; the trailing pair merges into the only group
    assert_eq!(group_sizes(5), vec![5]);
    assert_eq!(group_sizes(7), vec![3, 4]);
    assert_eq!(group_sizes(8), vec![4, 4]);
    assert_eq!(group_sizes(10), vec![3, 3, 4]);
    assert_eq!(group_sizes(12), vec![4, 4, 4]);
}

#[test]
fn full_round_robin_per_group() {
    let (store, tid, _) = generate(10, MatchKind::Singles);
    let matches = store.matches_by_tournament(tid).unwrap();
    // one group of 4 and two of 3: C(4,2) + C(3,2) + C(3,2)
    assert_eq!(matches.len(), 6 + 3 + 3);
    for (label, members) in group_members(&matches) {
        let in_group = matches
            .iter()
            .filter(|m| m.stage.group_label() == Some(label.as_str()))
            .count();
        assert_eq!(in_group, members.len() * (members.len() - 1) / 2);
    }
}

#[test]
fn each_team_plays_every_other_group_member_once() {
    let (store, tid, _) = generate(7, MatchKind::Singles);
    let matches = store.matches_by_tournament(tid).unwrap();
    for (label, members) in group_members(&matches) {
        for key in &members {
            let appearances = matches
                .iter()
                .filter(|m| {
                    m.stage.group_label() == Some(label.as_str())
                        && (m.team_a.key() == *key || m.team_b.key() == *key)
                })
                .count();
            assert_eq!(appearances, members.len() - 1);
        }
    }
}

#[test]
fn matches_start_planned_with_clean_score() {
    let (store, tid, _) = generate(6, MatchKind::Singles);
    for m in store.matches_by_tournament(tid).unwrap() {
        assert_eq!(m.status, MatchStatus::Planned);
        assert_eq!((m.sets_a, m.sets_b), (0, 0));
        assert!(m.history_sets.is_empty());
        assert!(matches!(m.stage, Stage::Group { .. }));
    }
}

#[test]
fn doubles_pairs_roster_order_and_drops_trailing_athlete() {
    let athletes = roster(7);
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    generate_group_matches(
        &store,
        tid,
        &athletes,
        MatchKind::Doubles,
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap();
    let matches = store.matches_by_tournament(tid).unwrap();
    // three consecutive pairs form one group of 3; P6 sits out
    assert_eq!(matches.len(), 3);
    let expected: BTreeSet<String> = athletes
        .chunks_exact(2)
        .map(|pair| Team::doubles(pair[0].clone(), pair[1].clone()).key())
        .collect();
    let seen: BTreeSet<String> = matches
        .iter()
        .flat_map(|m| [m.team_a.key(), m.team_b.key()])
        .collect();
    assert_eq!(seen, expected);
}

#[test]
fn category_comes_from_the_pairing_first_player() {
    let athletes: Vec<Player> = (0..4).map(|i| Player::new(format!("P{i}"), "B")).collect();
    let store = InMemoryMatchStore::new();
    let tid = TournamentId::new_v4();
    generate_group_matches(
        &store,
        tid,
        &athletes,
        MatchKind::Singles,
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap();
    for m in store.matches_by_tournament(tid).unwrap() {
        assert_eq!(m.category, "B");
    }
}

#[test]
fn same_seed_same_draw() {
    let athletes = roster(10);
    let mut draws = Vec::new();
    for _ in 0..2 {
        let store = InMemoryMatchStore::new();
        let tid = TournamentId::new_v4();
        generate_group_matches(
            &store,
            tid,
            &athletes,
            MatchKind::Singles,
            &mut StdRng::seed_from_u64(42),
        )
        .unwrap();
        draws.push(group_members(&store.matches_by_tournament(tid).unwrap()));
    }
    assert_eq!(draws[0], draws[1]);
}
