//! Match play: create matches, record placements, complete matches.

use crate::models::{
    Match, MatchId, MatchResult, MatchStatus, TeamId, Tournament, TournamentError,
    TournamentStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One team's placement as entered by the organizer (or resolved from an import).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub team_id: TeamId,
    pub position: u32,
    #[serde(default)]
    pub kills: u32,
}

/// Append a pending match with the next sequence number (Live only), played on the
/// next map of the rotation. Returns its id.
pub fn create_match(tournament: &mut Tournament) -> Result<MatchId, TournamentError> {
    if tournament.status != TournamentStatus::Live {
        return Err(TournamentError::InvalidState);
    }
    let sequence = tournament
        .matches
        .iter()
        .map(|m| m.sequence)
        .max()
        .unwrap_or(0)
        + 1;
    let mut m = Match::new(tournament.id, sequence);
    m.map = tournament.map_for(sequence).map(str::to_string);
    let id = m.id;
    tournament.matches.push(m);
    Ok(id)
}

/// Replace the results of a pending match.
///
/// Every team must be registered and appear once; positions must be >= 1 and unique.
/// Points are looked up from the tournament's scoring table (0 when no rule covers the position).
pub fn record_match_results(
    tournament: &mut Tournament,
    match_id: MatchId,
    entries: &[ResultEntry],
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Live {
        return Err(TournamentError::InvalidState);
    }
    let pending = tournament
        .get_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?
        .status
        == MatchStatus::Pending;
    if !pending {
        return Err(TournamentError::InvalidState);
    }

    validate_entries(tournament, entries)?;

    let results: Vec<MatchResult> = entries
        .iter()
        .map(|e| {
            let points = tournament.scoring.points_for(e.position);
            MatchResult::new(match_id, e.team_id, e.position, e.kills, points)
        })
        .collect();

    // Presence checked above.
    if let Some(m) = tournament.get_match_mut(match_id) {
        m.results = results;
    }
    Ok(())
}

/// Mark a match completed. It must be pending and have at least one result.
pub fn complete_match(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Live {
        return Err(TournamentError::InvalidState);
    }
    let m = tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if m.status != MatchStatus::Pending {
        return Err(TournamentError::InvalidState);
    }
    if m.results.is_empty() {
        return Err(TournamentError::InvalidInput(format!(
            "match {} has no results",
            m.sequence
        )));
    }
    m.status = MatchStatus::Completed;
    Ok(())
}

fn validate_entries(tournament: &Tournament, entries: &[ResultEntry]) -> Result<(), TournamentError> {
    if entries.is_empty() {
        return Err(TournamentError::InvalidInput("no results given".to_string()));
    }
    let mut positions = HashSet::new();
    let mut teams = HashSet::new();
    for e in entries {
        if !tournament.is_registered(e.team_id) {
            return Err(TournamentError::TeamNotFound(e.team_id));
        }
        if e.position == 0 {
            return Err(TournamentError::InvalidInput(
                "positions start at 1".to_string(),
            ));
        }
        if !positions.insert(e.position) {
            return Err(TournamentError::InvalidInput(format!(
                "position {} given to more than one team",
                e.position
            )));
        }
        if !teams.insert(e.team_id) {
            return Err(TournamentError::InvalidInput(format!(
                "team {} listed more than once",
                e.team_id
            )));
        }
    }
    Ok(())
}
