//! Data structures for the tournament: teams, matches, scoring, standings.

mod game;
mod scoring;
mod standing;
mod team;
mod tournament;

pub use game::{Match, MatchId, MatchResult, MatchStatus};
pub use scoring::{ScoringRule, ScoringTable};
pub use standing::{PrizePolicy, Standing};
pub use team::{Team, TeamId, MAX_PLAYERS, MIN_PLAYERS};
pub use tournament::{
    GameMode, GroupConfig, Schedule, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentStatus,
};
