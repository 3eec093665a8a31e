//! Result extraction collaborators.
//!
//! Screenshot recognition is an external service; it plugs in behind [`ResultSource`]
//! and hands back placements by team label. [`CsvResultSource`] reads scoresheets typed
//! up by the organizer.

use crate::logic::results::ResultEntry;
use crate::models::{Team, TournamentError};
use serde::{Deserialize, Serialize};

/// A placement read from an upload, before team labels are matched to registered teams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtractedResult {
    /// Team name or tag as it appeared in the source.
    pub team_name: String,
    pub position: u32,
    pub kills: u32,
    /// Extractor confidence, 0.0..=1.0.
    pub confidence: f64,
}

/// Anything that can turn an uploaded payload (screenshot, scoresheet) into placements.
pub trait ResultSource {
    fn extract(&self, payload: &[u8]) -> Result<Vec<ExtractedResult>, TournamentError>;
}

/// Reads `team,position,kills` CSV scoresheets. Hand-entered, so confidence is always 1.0.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsvResultSource;

#[derive(Deserialize)]
struct ScoresheetRow {
    team: String,
    position: u32,
    #[serde(default)]
    kills: u32,
}

impl ResultSource for CsvResultSource {
    fn extract(&self, payload: &[u8]) -> Result<Vec<ExtractedResult>, TournamentError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(payload);
        reader
            .deserialize::<ScoresheetRow>()
            .map(|row| -> Result<ExtractedResult, TournamentError> {
                let row = row.map_err(|e| TournamentError::InvalidInput(format!("scoresheet: {}", e)))?;
                Ok(ExtractedResult {
                    team_name: row.team,
                    position: row.position,
                    kills: row.kills,
                    confidence: 1.0,
                })
            })
            .collect()
    }
}

/// Match extracted labels against `teams` (by name or tag, case-insensitive).
///
/// Fails with `InvalidInput` when a label matches no team or more than one, or when a
/// row's confidence is missing (not finite) or below `min_confidence`.
pub fn resolve_extracted(
    extracted: &[ExtractedResult],
    teams: &[Team],
    min_confidence: f64,
) -> Result<Vec<ResultEntry>, TournamentError> {
    if !min_confidence.is_finite() {
        return Err(TournamentError::InvalidConfig(format!(
            "confidence threshold {} is not a number",
            min_confidence
        )));
    }
    extracted
        .iter()
        .map(|row| -> Result<ResultEntry, TournamentError> {
            if !row.confidence.is_finite() || row.confidence < min_confidence {
                return Err(TournamentError::InvalidInput(format!(
                    "result for '{}' read with confidence {:.2}, below {:.2}; enter it manually",
                    row.team_name, row.confidence, min_confidence
                )));
            }
            let mut matching = teams.iter().filter(|t| t.answers_to(&row.team_name));
            let team = matching.next().ok_or_else(|| {
                TournamentError::InvalidInput(format!("unknown team '{}'", row.team_name))
            })?;
            if let Some(other) = matching.next() {
                return Err(TournamentError::InvalidInput(format!(
                    "'{}' matches both {} and {}; enter it manually",
                    row.team_name, team.name, other.name
                )));
            }
            Ok(ResultEntry {
                team_id: team.id,
                position: row.position,
                kills: row.kills,
            })
        })
        .collect()
}
