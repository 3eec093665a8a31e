//! Battle-royale tournament manager: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    aggregate_standings, complete_match, compute_standings, consistency_score, create_match,
    draw_groups, draw_tournament_groups, record_match_results, resolve_extracted,
    standings_to_csv, teams_per_group, CsvResultSource, ExtractedResult, ResultEntry,
    ResultSource,
};
pub use models::{
    GameMode, GroupConfig, Match, MatchId, MatchResult, MatchStatus, PrizePolicy, Schedule,
    ScoringRule, ScoringTable, Standing, Team, TeamId, Tournament, TournamentError,
    TournamentFormat, TournamentId, TournamentStatus, MAX_PLAYERS, MIN_PLAYERS,
};
