//! Integration tests for standings: aggregation, tie-breaks, prizes.

use br_tournament_web::{
    aggregate_standings, consistency_score, Match, MatchResult, MatchStatus, PrizePolicy,
    ScoringRule, ScoringTable, TeamId, TournamentError,
};
use uuid::Uuid;

/// A completed match with `(team, position, kills)` results in the given order.
fn completed_match(sequence: u32, results: &[(TeamId, u32, u32)]) -> Match {
    let mut m = Match::new(Uuid::nil(), sequence);
    let match_id = m.id;
    m.results = results
        .iter()
        .map(|&(team, position, kills)| MatchResult::new(match_id, team, position, kills, 0))
        .collect();
    m.status = MatchStatus::Completed;
    m
}

fn teams(n: usize) -> Vec<TeamId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

fn table(rules: &[(u32, u32)]) -> ScoringTable {
    ScoringTable::new(
        rules
            .iter()
            .map(|&(position, points)| ScoringRule::new(position, points, ""))
            .collect(),
    )
    .unwrap()
}

#[test]
fn mirrored_results_tie_fully_and_fall_back_to_insertion_order() {
    let t = teams(2);
    let (a, b) = (t[0], t[1]);
    let matches = vec![
        completed_match(1, &[(a, 1, 8), (b, 2, 6)]),
        completed_match(2, &[(b, 1, 8), (a, 2, 6)]),
    ];

    let standings =
        aggregate_standings(&matches, &ScoringTable::default(), 0.0, &PrizePolicy::default()).unwrap();

    assert_eq!(standings.len(), 2);
    for s in &standings {
        assert_eq!(s.total_points, 27);
        assert_eq!(s.total_kills, 14);
        assert_eq!(s.victories, 1);
        assert_eq!(s.avg_placement, 1.5);
        assert_eq!(s.games_played, 2);
        assert_eq!(s.best_placement, 1);
        assert_eq!(s.worst_placement, 2);
        assert_eq!(s.kills_per_game, 7.0);
        assert_eq!(s.points_per_game, 13.5);
    }
    assert_eq!(standings[0].team_id, a);
    assert_eq!(standings[0].rank, 1);
    assert_eq!(standings[1].team_id, b);
    assert_eq!(standings[1].rank, 2);
}

#[test]
fn more_victories_wins_a_points_tie() {
    let t = teams(2);
    let (a, b) = (t[0], t[1]);
    let scoring = table(&[(1, 10), (2, 8), (3, 6), (4, 4)]);
    // b appears first, a has the victory: 10 + 4 vs 8 + 6.
    let matches = vec![
        completed_match(1, &[(b, 2, 0), (a, 1, 0)]),
        completed_match(2, &[(b, 3, 0), (a, 4, 0)]),
    ];

    let standings = aggregate_standings(&matches, &scoring, 0.0, &PrizePolicy::default()).unwrap();

    assert_eq!(standings[0].total_points, standings[1].total_points);
    assert_eq!(standings[0].team_id, a);
    assert_eq!(standings[0].victories, 1);
}

#[test]
fn lower_average_placement_wins_when_victories_tie() {
    let t = teams(4);
    let (a, b) = (t[0], t[1]);
    let scoring = table(&[(2, 5), (3, 5)]);
    let matches = vec![
        completed_match(1, &[(b, 3, 0), (a, 2, 0), (t[2], 1, 0)]),
        completed_match(2, &[(b, 3, 0), (a, 2, 0), (t[3], 1, 0)]),
    ];

    let standings = aggregate_standings(&matches, &scoring, 0.0, &PrizePolicy::default()).unwrap();

    let pos_a = standings.iter().position(|s| s.team_id == a).unwrap();
    let pos_b = standings.iter().position(|s| s.team_id == b).unwrap();
    assert_eq!(standings[pos_a].total_points, standings[pos_b].total_points);
    assert_eq!(standings[pos_a].avg_placement, 2.0);
    assert_eq!(standings[pos_b].avg_placement, 3.0);
    assert!(pos_a < pos_b);
}

#[test]
fn more_kills_wins_when_placements_tie() {
    let t = teams(2);
    let (a, b) = (t[0], t[1]);
    let matches = vec![
        completed_match(1, &[(a, 2, 1), (b, 3, 4)]),
        completed_match(2, &[(a, 3, 1), (b, 2, 4)]),
    ];

    let standings =
        aggregate_standings(&matches, &ScoringTable::default(), 0.0, &PrizePolicy::default()).unwrap();

    assert_eq!(standings[0].total_points, standings[1].total_points);
    assert_eq!(standings[0].team_id, b);
    assert_eq!(standings[0].total_kills, 8);
}

#[test]
fn default_prize_split_pays_the_podium_only() {
    let t = teams(4);
    let matches = vec![completed_match(
        1,
        &[(t[0], 1, 0), (t[1], 2, 0), (t[2], 3, 0), (t[3], 4, 0)],
    )];

    let standings =
        aggregate_standings(&matches, &ScoringTable::default(), 5000.0, &PrizePolicy::default()).unwrap();

    let prizes: Vec<f64> = standings.iter().map(|s| s.prize).collect();
    assert_eq!(prizes, vec![2500.0, 1500.0, 1000.0, 0.0]);
}

#[test]
fn custom_prize_policy_can_pay_beyond_third() {
    let t = teams(4);
    let matches = vec![completed_match(
        1,
        &[(t[0], 1, 0), (t[1], 2, 0), (t[2], 3, 0), (t[3], 4, 0)],
    )];
    let policy = PrizePolicy::new(vec![40.0, 30.0, 20.0, 10.0]).unwrap();

    let standings = aggregate_standings(&matches, &ScoringTable::default(), 1000.0, &policy).unwrap();

    assert_eq!(standings[3].prize, 100.0);
}

#[test]
fn prize_policy_rejects_more_than_the_pool() {
    assert!(matches!(
        PrizePolicy::new(vec![60.0, 30.0, 20.0]),
        Err(TournamentError::InvalidConfig(_))
    ));
    assert!(matches!(
        PrizePolicy::new(vec![-5.0]),
        Err(TournamentError::InvalidConfig(_))
    ));
}

#[test]
fn games_played_adds_up_to_all_results() {
    let t = teams(5);
    let matches = vec![
        completed_match(1, &[(t[0], 1, 3), (t[1], 2, 2), (t[2], 3, 1)]),
        completed_match(2, &[(t[3], 1, 5), (t[0], 2, 0), (t[4], 3, 2), (t[1], 4, 0)]),
        completed_match(3, &[(t[2], 1, 1), (t[3], 2, 1)]),
    ];
    let total_results: usize = matches.iter().map(|m| m.results.len()).sum();

    let standings =
        aggregate_standings(&matches, &ScoringTable::default(), 0.0, &PrizePolicy::default()).unwrap();

    let games: u32 = standings.iter().map(|s| s.games_played).sum();
    assert_eq!(games as usize, total_results);
    let t0 = standings.iter().find(|s| s.team_id == t[0]).unwrap();
    assert_eq!(t0.games_played, 2);
    assert_eq!(t0.total_points, 15 + 12);
}

#[test]
fn teams_without_completed_results_are_left_out() {
    let t = teams(3);
    let mut pending = Match::new(Uuid::nil(), 2);
    pending
        .results
        .push(MatchResult::new(pending.id, t[2], 1, 9, 15));
    let matches = vec![completed_match(1, &[(t[0], 1, 0), (t[1], 2, 0)]), pending];

    let standings =
        aggregate_standings(&matches, &ScoringTable::default(), 0.0, &PrizePolicy::default()).unwrap();

    assert_eq!(standings.len(), 2);
    assert!(standings.iter().all(|s| s.team_id != t[2]));
}

#[test]
fn position_without_rule_scores_zero() {
    let t = teams(1);
    let matches = vec![completed_match(1, &[(t[0], 9, 2)])];

    let standings =
        aggregate_standings(&matches, &ScoringTable::default(), 0.0, &PrizePolicy::default()).unwrap();

    assert_eq!(standings[0].total_points, 0);
    assert_eq!(standings[0].total_kills, 2);
}

#[test]
fn duplicate_position_in_a_match_is_invalid_input() {
    let t = teams(2);
    let matches = vec![completed_match(1, &[(t[0], 1, 0), (t[1], 1, 0)])];

    assert!(matches!(
        aggregate_standings(&matches, &ScoringTable::default(), 0.0, &PrizePolicy::default()),
        Err(TournamentError::InvalidInput(_))
    ));
}

#[test]
fn no_completed_matches_is_invalid_input() {
    let matches = vec![Match::new(Uuid::nil(), 1)];

    assert!(matches!(
        aggregate_standings(&matches, &ScoringTable::default(), 0.0, &PrizePolicy::default()),
        Err(TournamentError::InvalidInput(_))
    ));
}

#[test]
fn aggregation_is_deterministic() {
    let t = teams(4);
    let matches = vec![
        completed_match(1, &[(t[0], 2, 3), (t[1], 1, 2), (t[2], 4, 1), (t[3], 3, 1)]),
        completed_match(2, &[(t[1], 2, 3), (t[0], 1, 2), (t[3], 4, 1), (t[2], 3, 1)]),
    ];

    let first =
        aggregate_standings(&matches, &ScoringTable::default(), 900.0, &PrizePolicy::default()).unwrap();
    let second =
        aggregate_standings(&matches, &ScoringTable::default(), 900.0, &PrizePolicy::default()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn consistency_rewards_steady_placements() {
    assert_eq!(consistency_score(&[4]), 100.0);
    assert_eq!(consistency_score(&[3, 3, 3]), 100.0);
    // Same average placement, wider spread scores lower.
    assert!(consistency_score(&[2, 2]) > consistency_score(&[1, 3]));
    assert!(consistency_score(&[1, 3]) > consistency_score(&[1, 5]));
    let spread = consistency_score(&[1, 20, 1, 20]);
    assert!((0.0..=100.0).contains(&spread));
}

#[test]
fn kill_totals_grow_past_a_single_match_counter() {
    let t = teams(2);
    let (a, b) = (t[0], t[1]);
    let matches = vec![
        completed_match(1, &[(a, 1, u32::MAX), (b, 2, 0)]),
        completed_match(2, &[(a, 1, 1), (b, 2, 0)]),
    ];

    let standings =
        aggregate_standings(&matches, &ScoringTable::default(), 0.0, &PrizePolicy::default()).unwrap();

    assert_eq!(standings[0].team_id, a);
    assert_eq!(standings[0].total_kills, u64::from(u32::MAX) + 1);
    assert_eq!(standings[0].total_points, 30);
    assert_eq!(standings[0].kills_per_game, (u64::from(u32::MAX) + 1) as f64 / 2.0);
}
