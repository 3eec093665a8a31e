//! Standings export as CSV.

use crate::models::{Standing, Team, TournamentError};
use serde::Serialize;

#[derive(Serialize)]
struct StandingRow<'a> {
    rank: u32,
    team: &'a str,
    tag: &'a str,
    points: u64,
    kills: u64,
    games: u32,
    avg_placement: String,
    victories: u32,
    top3: u32,
    consistency: String,
    prize: String,
}

/// Write standings as CSV, one row per team in rank order. Teams missing from `teams`
/// are written with an empty name.
pub fn standings_to_csv(standings: &[Standing], teams: &[Team]) -> Result<String, TournamentError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for s in standings {
        let team = teams.iter().find(|t| t.id == s.team_id);
        writer
            .serialize(StandingRow {
                rank: s.rank,
                team: team.map(|t| t.name.as_str()).unwrap_or(""),
                tag: team.map(|t| t.tag.as_str()).unwrap_or(""),
                points: s.total_points,
                kills: s.total_kills,
                games: s.games_played,
                avg_placement: format!("{:.2}", s.avg_placement),
                victories: s.victories,
                top3: s.top3,
                consistency: format!("{:.1}", s.consistency),
                prize: format!("{:.2}", s.prize),
            })
            .map_err(csv_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TournamentError::InvalidInput(format!("csv export: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| TournamentError::InvalidInput(format!("csv export: {}", e)))
}

fn csv_error(e: csv::Error) -> TournamentError {
    TournamentError::InvalidInput(format!("csv export: {}", e))
}
