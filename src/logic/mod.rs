//! Tournament business logic: groups, match results, standings, import/export.

mod export;
mod groups;
mod import;
mod ranking;
mod results;

pub use export::standings_to_csv;
pub use groups::{draw_groups, draw_tournament_groups, teams_per_group};
pub use import::{resolve_extracted, CsvResultSource, ExtractedResult, ResultSource};
pub use ranking::{aggregate_standings, compute_standings, consistency_score};
pub use results::{complete_match, create_match, record_match_results, ResultEntry};
