//! Group stage layout: capacity per group and the random group draw.

use crate::models::{GroupConfig, TeamId, Tournament, TournamentError, TournamentStatus};
use rand::seq::SliceRandom;
use rand::Rng;

/// `ceil(max_teams / group_count)`. Fails with `InvalidConfig` when `group_count` is zero.
pub fn teams_per_group(max_teams: u32, group_count: u32) -> Result<u32, TournamentError> {
    if group_count == 0 {
        return Err(TournamentError::InvalidConfig(
            "group count must be at least 1".to_string(),
        ));
    }
    Ok(max_teams.div_ceil(group_count))
}

/// Split teams into `group_count` groups.
///
/// 1. Reject more teams than `max_teams`.
/// 2. Shuffle.
/// 3. Deal round-robin, so group sizes differ by at most one and never exceed `teams_per_group`.
pub fn draw_groups<R: Rng + ?Sized>(
    teams: &[TeamId],
    config: &GroupConfig,
    rng: &mut R,
) -> Result<Vec<Vec<TeamId>>, TournamentError> {
    if teams.len() > config.max_teams() as usize {
        return Err(TournamentError::InvalidConfig(format!(
            "{} teams do not fit a capacity of {}",
            teams.len(),
            config.max_teams()
        )));
    }
    let mut shuffled = teams.to_vec();
    shuffled.shuffle(rng);

    let group_count = config.group_count() as usize;
    let mut groups: Vec<Vec<TeamId>> = vec![Vec::new(); group_count];
    for (i, team) in shuffled.into_iter().enumerate() {
        groups[i % group_count].push(team);
    }
    Ok(groups)
}

/// Draw groups for the registered teams and store the result on the tournament.
/// Allowed while registration is open or once the tournament is live.
pub fn draw_tournament_groups(tournament: &mut Tournament) -> Result<(), TournamentError> {
    use TournamentStatus::*;
    if !matches!(tournament.status, RegistrationOpen | Live) {
        return Err(TournamentError::InvalidState);
    }
    if tournament.registered_teams.is_empty() {
        return Err(TournamentError::InvalidState);
    }
    let groups = draw_groups(
        &tournament.registered_teams,
        &tournament.groups,
        &mut rand::thread_rng(),
    )?;
    tournament.group_draw = Some(groups);
    Ok(())
}
