//! Match and MatchResult: one battle-royale lobby and each team's placement in it.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Whether a match still accepts results.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
}

/// A single team's outcome in one match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: Uuid,
    pub match_id: MatchId,
    pub team_id: TeamId,
    /// 1-based finishing position, unique within the match.
    pub position: u32,
    pub kills: u32,
    /// Points from the scoring table at the time the result was recorded.
    pub points: u32,
}

impl MatchResult {
    pub fn new(match_id: MatchId, team_id: TeamId, position: u32, kills: u32, points: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            team_id,
            position,
            kills,
            points,
        }
    }
}

/// One lobby of the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// 1-based order of play.
    pub sequence: u32,
    /// Map from the tournament's rotation, if it had one when the match was created.
    #[serde(default)]
    pub map: Option<String>,
    pub status: MatchStatus,
    pub results: Vec<MatchResult>,
}

impl Match {
    pub fn new(tournament_id: TournamentId, sequence: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            sequence,
            map: None,
            status: MatchStatus::Pending,
            results: Vec::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }
}
