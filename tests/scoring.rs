//! Integration tests for the scoring table editor.

use br_tournament_web::{GroupConfig, ScoringRule, ScoringTable, Tournament, TournamentError, TournamentStatus};

fn positions(table: &ScoringTable) -> Vec<u32> {
    table.rules().iter().map(|r| r.position).collect()
}

#[test]
fn default_table_matches_battle_royale_points() {
    let table = ScoringTable::default();
    assert_eq!(positions(&table), vec![1, 2, 3, 4, 5]);
    assert_eq!(table.points_for(1), 15);
    assert_eq!(table.points_for(2), 12);
    assert_eq!(table.points_for(5), 6);
    assert_eq!(table.points_for(6), 0);
}

#[test]
fn new_sorts_and_rejects_duplicates() {
    let table = ScoringTable::new(vec![
        ScoringRule::new(3, 10, ""),
        ScoringRule::new(1, 15, ""),
        ScoringRule::new(2, 12, ""),
    ])
    .unwrap();
    assert_eq!(positions(&table), vec![1, 2, 3]);

    let dup = ScoringTable::new(vec![ScoringRule::new(1, 15, ""), ScoringRule::new(1, 10, "")]);
    assert!(matches!(dup, Err(TournamentError::InvalidConfig(_))));
}

#[test]
fn position_zero_is_rejected() {
    let mut table = ScoringTable::empty();
    assert!(matches!(
        table.add_rule(ScoringRule::new(0, 20, "")),
        Err(TournamentError::InvalidConfig(_))
    ));
    assert!(table.is_empty());
}

#[test]
fn edits_keep_table_sorted_and_unique() {
    let mut table = ScoringTable::default();

    table.add_rule(ScoringRule::new(7, 2, "7th")).unwrap();
    table.add_rule(ScoringRule::new(6, 4, "6th")).unwrap();
    assert_eq!(positions(&table), vec![1, 2, 3, 4, 5, 6, 7]);

    assert!(table.add_rule(ScoringRule::new(6, 1, "again")).is_err());

    // Move 7th to 10th.
    table.update_rule(7, ScoringRule::new(10, 1, "10th")).unwrap();
    assert_eq!(positions(&table), vec![1, 2, 3, 4, 5, 6, 10]);
    assert_eq!(table.points_for(7), 0);
    assert_eq!(table.points_for(10), 1);

    // Moving onto an occupied position fails and changes nothing.
    assert!(table.update_rule(10, ScoringRule::new(1, 99, "")).is_err());
    assert_eq!(table.points_for(1), 15);

    let removed = table.remove_rule(3).unwrap();
    assert_eq!(removed.points, 10);
    assert_eq!(table.points_for(3), 0);
    assert!(table.remove_rule(3).is_err());
}

#[test]
fn table_deserializes_sorted() {
    let table: ScoringTable = serde_json::from_str(
        r#"[{"position": 2, "points": 12}, {"position": 1, "points": 15, "description": "win"}]"#,
    )
    .unwrap();
    assert_eq!(positions(&table), vec![1, 2]);

    let dup: Result<ScoringTable, _> =
        serde_json::from_str(r#"[{"position": 2, "points": 12}, {"position": 2, "points": 1}]"#);
    assert!(dup.is_err());
}

#[test]
fn finished_tournament_scoring_is_frozen() {
    let mut t = Tournament::new("Cup", GroupConfig::default());
    t.add_scoring_rule(ScoringRule::new(6, 4, "6th")).unwrap();
    t.update_scoring_rule(6, ScoringRule::new(6, 5, "6th")).unwrap();
    assert_eq!(t.scoring.points_for(6), 5);

    t.status = TournamentStatus::Finished;
    assert!(matches!(
        t.add_scoring_rule(ScoringRule::new(7, 2, "")),
        Err(TournamentError::InvalidState)
    ));
    assert!(matches!(
        t.remove_scoring_rule(6),
        Err(TournamentError::InvalidState)
    ));
}
