//! Standings: fold completed match results against the scoring table into a ranked table.

use crate::models::{
    Match, PrizePolicy, ScoringTable, Standing, TeamId, Tournament, TournamentError,
};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Running totals for one team while folding results.
struct TeamTally {
    team_id: TeamId,
    total_points: u64,
    total_kills: u64,
    placements: Vec<u32>,
}

impl TeamTally {
    fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            total_points: 0,
            total_kills: 0,
            placements: Vec::new(),
        }
    }

    fn games(&self) -> u32 {
        self.placements.len() as u32
    }

    fn victories(&self) -> u32 {
        self.placements.iter().filter(|&&p| p == 1).count() as u32
    }

    fn placement_sum(&self) -> u64 {
        self.placements.iter().map(|&p| u64::from(p)).sum()
    }

    fn into_standing(self, rank: u32, prize_pool: f64, prize_policy: &PrizePolicy) -> Standing {
        let games = self.games();
        let per_game = |total: u64| total as f64 / f64::from(games);
        Standing {
            team_id: self.team_id,
            rank,
            total_points: self.total_points,
            total_kills: self.total_kills,
            games_played: games,
            avg_placement: self.placement_sum() as f64 / f64::from(games),
            best_placement: self.placements.iter().copied().min().unwrap_or(0),
            worst_placement: self.placements.iter().copied().max().unwrap_or(0),
            victories: self.victories(),
            top3: self.placements.iter().filter(|&&p| p <= 3).count() as u32,
            kills_per_game: per_game(self.total_kills),
            points_per_game: per_game(self.total_points),
            consistency: consistency_score(&self.placements),
            prize: prize_policy.prize_for(rank, prize_pool),
        }
    }
}

/// Standings for a tournament from its completed matches, scoring table and prize settings.
pub fn compute_standings(tournament: &Tournament) -> Result<Vec<Standing>, TournamentError> {
    aggregate_standings(
        &tournament.matches,
        &tournament.scoring,
        tournament.prize_pool,
        &tournament.prize_policy,
    )
}

/// Fold match results into sorted standings.
///
/// 1. Keep completed matches only; at least one is required.
/// 2. Validate each: positions >= 1 and unique, each team at most once.
/// 3. Group by team in order of first appearance; points come from `scoring` (0 if no rule).
/// 4. Sort by points desc, then victories desc, average placement asc, kills desc,
///    then first appearance (stable sort).
/// 5. Rank from 1 and pay out prizes from `prize_policy`.
///
/// Teams with no results in a completed match do not appear.
pub fn aggregate_standings(
    matches: &[Match],
    scoring: &ScoringTable,
    prize_pool: f64,
    prize_policy: &PrizePolicy,
) -> Result<Vec<Standing>, TournamentError> {
    let completed: Vec<&Match> = matches.iter().filter(|m| m.is_completed()).collect();
    if completed.is_empty() {
        return Err(TournamentError::InvalidInput(
            "no completed matches to rank".to_string(),
        ));
    }
    for m in &completed {
        validate_match(m)?;
    }

    let mut index: HashMap<TeamId, usize> = HashMap::new();
    let mut tallies: Vec<TeamTally> = Vec::new();
    for result in completed.iter().flat_map(|m| m.results.iter()) {
        let idx = *index.entry(result.team_id).or_insert_with(|| {
            tallies.push(TeamTally::new(result.team_id));
            tallies.len() - 1
        });
        let tally = &mut tallies[idx];
        tally.total_points += u64::from(scoring.points_for(result.position));
        tally.total_kills += u64::from(result.kills);
        tally.placements.push(result.position);
    }

    tallies.sort_by(compare_tallies);

    Ok(tallies
        .into_iter()
        .enumerate()
        .map(|(i, tally)| tally.into_standing(i as u32 + 1, prize_pool, prize_policy))
        .collect())
}

/// Tie-break chain; `Ordering::Equal` leaves insertion order to the stable sort.
fn compare_tallies(a: &TeamTally, b: &TeamTally) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| b.victories().cmp(&a.victories()))
        // Lower average first, compared without division: sum_a / n_a < sum_b / n_b.
        .then_with(|| {
            (a.placement_sum() * u64::from(b.games()))
                .cmp(&(b.placement_sum() * u64::from(a.games())))
        })
        .then_with(|| b.total_kills.cmp(&a.total_kills))
}

/// Reject a completed match whose placements cannot be ranked.
fn validate_match(m: &Match) -> Result<(), TournamentError> {
    let mut positions = HashSet::new();
    let mut teams = HashSet::new();
    for r in &m.results {
        if r.position == 0 {
            return Err(TournamentError::InvalidInput(format!(
                "match {}: positions start at 1",
                m.sequence
            )));
        }
        if !positions.insert(r.position) {
            return Err(TournamentError::InvalidInput(format!(
                "match {}: position {} appears twice",
                m.sequence, r.position
            )));
        }
        if !teams.insert(r.team_id) {
            return Err(TournamentError::InvalidInput(format!(
                "match {}: team {} has more than one result",
                m.sequence, r.team_id
            )));
        }
    }
    Ok(())
}

/// Placement stability in [0, 100]: `100 / (1 + variance)` of the placements.
/// A single game, or identical placements, scores 100.
pub fn consistency_score(placements: &[u32]) -> f64 {
    if placements.is_empty() {
        return 0.0;
    }
    let n = placements.len() as f64;
    let mean = placements.iter().map(|&p| f64::from(p)).sum::<f64>() / n;
    let variance = placements
        .iter()
        .map(|&p| {
            let d = f64::from(p) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (100.0 / (1.0 + variance)).clamp(0.0, 100.0)
}
