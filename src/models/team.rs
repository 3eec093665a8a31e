//! Team data structure.

use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in results and registrations).
pub type TeamId = Uuid;

/// Minimum number of players on a roster.
pub const MIN_PLAYERS: usize = 3;
/// Maximum number of players on a roster.
pub const MAX_PLAYERS: usize = 5;

/// A registered squad.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Short clan tag, stored upper-case.
    pub tag: String,
    /// Player names in roster order.
    pub players: Vec<String>,
    /// Name of the captain who owns the team.
    pub captain: String,
}

impl Team {
    /// Create a team. Blank player slots are dropped; 3 to 5 players must remain.
    pub fn new(
        name: impl Into<String>,
        tag: impl Into<String>,
        players: Vec<String>,
        captain: impl Into<String>,
    ) -> Result<Self, TournamentError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(TournamentError::InvalidInput("team name is empty".to_string()));
        }
        let tag = tag.into().trim().to_uppercase();
        if tag.is_empty() {
            return Err(TournamentError::InvalidInput("team tag is empty".to_string()));
        }
        let players: Vec<String> = players
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
            return Err(TournamentError::InvalidInput(format!(
                "a team needs {} to {} players, got {}",
                MIN_PLAYERS,
                MAX_PLAYERS,
                players.len()
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            tag,
            players,
            captain: captain.into().trim().to_string(),
        })
    }

    /// Whether `label` names this team, by name or tag (case-insensitive).
    pub fn answers_to(&self, label: &str) -> bool {
        let label = label.trim();
        self.name.eq_ignore_ascii_case(label) || self.tag.eq_ignore_ascii_case(label)
    }
}
