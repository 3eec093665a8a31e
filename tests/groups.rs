//! Integration tests for group capacity and the group draw.

use br_tournament_web::{
    draw_groups, draw_tournament_groups, teams_per_group, GroupConfig, Team, Tournament,
    TournamentError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn teams_per_group_rounds_up() {
    assert_eq!(teams_per_group(25, 1).unwrap(), 25);
    assert_eq!(teams_per_group(26, 3).unwrap(), 9);
    assert_eq!(teams_per_group(24, 3).unwrap(), 8);
    assert_eq!(teams_per_group(1, 4).unwrap(), 1);
    for max_teams in 1..=60 {
        for group_count in 1..=10 {
            let per_group = teams_per_group(max_teams, group_count).unwrap();
            assert!(per_group * group_count >= max_teams);
            assert!((per_group - 1) * group_count < max_teams);
        }
    }
}

#[test]
fn zero_groups_is_invalid_config() {
    assert!(matches!(
        teams_per_group(25, 0),
        Err(TournamentError::InvalidConfig(_))
    ));
    assert!(GroupConfig::new(25, 0).is_err());
}

#[test]
fn group_config_recomputes_on_every_change() {
    let mut config = GroupConfig::new(25, 1).unwrap();
    assert_eq!(config.teams_per_group(), 25);

    config.set_max_teams(26).unwrap();
    config.set_group_count(3).unwrap();
    assert_eq!(config.teams_per_group(), 9);

    assert!(config.set_group_count(0).is_err());
    // A rejected change leaves the config untouched.
    assert_eq!(config.group_count(), 3);
    assert_eq!(config.teams_per_group(), 9);
}

#[test]
fn group_config_deserializes_with_recomputed_capacity() {
    let config: GroupConfig =
        serde_json::from_str(r#"{"max_teams": 26, "group_count": 3, "teams_per_group": 1}"#).unwrap();
    assert_eq!(config.teams_per_group(), 9);

    let zero: Result<GroupConfig, _> = serde_json::from_str(r#"{"max_teams": 26, "group_count": 0}"#);
    assert!(zero.is_err());
}

#[test]
fn draw_spreads_every_team_within_capacity() {
    let config = GroupConfig::new(26, 3).unwrap();
    let teams: Vec<Uuid> = (0..26).map(|_| Uuid::new_v4()).collect();

    let groups = draw_groups(&teams, &config, &mut StdRng::seed_from_u64(7)).unwrap();

    assert_eq!(groups.len(), 3);
    for g in &groups {
        assert!(g.len() as u32 <= config.teams_per_group());
    }
    let drawn: HashSet<Uuid> = groups.iter().flatten().copied().collect();
    assert_eq!(drawn, teams.iter().copied().collect());
}

#[test]
fn draw_rejects_more_teams_than_capacity() {
    let config = GroupConfig::new(4, 2).unwrap();
    let teams: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();

    assert!(matches!(
        draw_groups(&teams, &config, &mut StdRng::seed_from_u64(1)),
        Err(TournamentError::InvalidConfig(_))
    ));
}

#[test]
fn tournament_draw_stores_groups_for_registered_teams() {
    let mut t = Tournament::new("Weekend Cup", GroupConfig::new(6, 2).unwrap());
    assert!(matches!(
        draw_tournament_groups(&mut t),
        Err(TournamentError::InvalidState)
    ));

    t.open_registration().unwrap();
    for i in 0..5 {
        let team = Team::new(format!("Squad {i}"), format!("S{i}"), vec!["a".into(), "b".into(), "c".into()], "cap")
            .unwrap();
        t.register_team(&team).unwrap();
    }
    draw_tournament_groups(&mut t).unwrap();

    let groups = t.group_draw.as_ref().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 5);

    // Changing the layout invalidates the draw.
    t.set_group_config(6, 3).unwrap();
    assert!(t.group_draw.is_none());
    assert_eq!(t.groups.teams_per_group(), 2);
}
