//! Standing (derived per-team aggregate) and the prize distribution policy.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};

/// A team's aggregate performance across a tournament's completed matches.
/// Recomputed from the full result set on demand, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub team_id: TeamId,
    /// 1-based rank after tie-breaks.
    pub rank: u32,
    pub total_points: u64,
    pub total_kills: u64,
    pub games_played: u32,
    pub avg_placement: f64,
    pub best_placement: u32,
    pub worst_placement: u32,
    /// Matches finished in 1st place.
    pub victories: u32,
    /// Matches finished in the top 3.
    pub top3: u32,
    pub kills_per_game: f64,
    pub points_per_game: f64,
    /// 0..=100, higher for steadier placements.
    pub consistency: f64,
    pub prize: f64,
}

/// Percentage of the prize pool paid to each rank, starting at rank 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PrizePolicy {
    shares: Vec<f64>,
}

impl Default for PrizePolicy {
    /// 50% / 30% / 20% to the podium, nothing below.
    fn default() -> Self {
        Self {
            shares: vec![50.0, 30.0, 20.0],
        }
    }
}

impl PrizePolicy {
    /// Shares must be non-negative and add up to at most 100%.
    pub fn new(shares: Vec<f64>) -> Result<Self, TournamentError> {
        if shares.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(TournamentError::InvalidConfig(
                "prize shares must be non-negative".to_string(),
            ));
        }
        let total: f64 = shares.iter().sum();
        if total > 100.0 {
            return Err(TournamentError::InvalidConfig(format!(
                "prize shares add up to {}%, more than the whole pool",
                total
            )));
        }
        Ok(Self { shares })
    }

    /// Prize for a 1-based rank out of `prize_pool`; zero for ranks without a share.
    pub fn prize_for(&self, rank: u32, prize_pool: f64) -> f64 {
        let idx = match (rank as usize).checked_sub(1) {
            Some(idx) => idx,
            None => return 0.0,
        };
        self.shares
            .get(idx)
            .map(|share| prize_pool * share / 100.0)
            .unwrap_or(0.0)
    }
}

impl TryFrom<Vec<f64>> for PrizePolicy {
    type Error = TournamentError;

    fn try_from(shares: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(shares)
    }
}

impl From<PrizePolicy> for Vec<f64> {
    fn from(policy: PrizePolicy) -> Self {
        policy.shares
    }
}
