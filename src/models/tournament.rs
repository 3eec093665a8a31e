//! Tournament, TournamentStatus, and the configuration it owns.

use crate::logic::teams_per_group;
use crate::models::game::{Match, MatchId};
use crate::models::scoring::{ScoringRule, ScoringTable};
use crate::models::standing::PrizePolicy;
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Bad group counts, scoring table edits, prize or schedule settings.
    InvalidConfig(String),
    /// Malformed or inconsistent result data (e.g. duplicate positions within one match).
    InvalidInput(String),
    /// Tournament or match is not in a state that allows this action.
    InvalidState,
    /// Team is unknown or not registered in this tournament.
    TeamNotFound(TeamId),
    /// Match id does not belong to this tournament.
    MatchNotFound(MatchId),
    /// Team is already registered.
    DuplicateTeam,
    /// Registration is at capacity.
    TournamentFull { max_teams: u32 },
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            TournamentError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::TeamNotFound(_) => write!(f, "Team not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::DuplicateTeam => write!(f, "Team is already registered"),
            TournamentError::TournamentFull { max_teams } => {
                write!(f, "Tournament is full ({} teams)", max_teams)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Being configured by the organizer.
    #[default]
    Draft,
    /// Teams may sign up.
    RegistrationOpen,
    /// Matches are being played and results recorded.
    Live,
    Finished,
}

/// How long the tournament runs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Played out in a single day.
    #[default]
    Short,
    /// Spread over several days.
    Long,
}

/// Game mode the lobbies are played in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    #[default]
    BattleRoyale,
    Multiplayer,
    Ranked,
}

/// Group layout. `teams_per_group` is always `ceil(max_teams / group_count)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GroupConfigFields")]
pub struct GroupConfig {
    max_teams: u32,
    group_count: u32,
    teams_per_group: u32,
}

impl Default for GroupConfig {
    /// A single lobby of 25 squads.
    fn default() -> Self {
        Self {
            max_teams: 25,
            group_count: 1,
            teams_per_group: 25,
        }
    }
}

impl GroupConfig {
    pub fn new(max_teams: u32, group_count: u32) -> Result<Self, TournamentError> {
        Ok(Self {
            max_teams,
            group_count,
            teams_per_group: teams_per_group(max_teams, group_count)?,
        })
    }

    pub fn max_teams(&self) -> u32 {
        self.max_teams
    }

    pub fn group_count(&self) -> u32 {
        self.group_count
    }

    pub fn teams_per_group(&self) -> u32 {
        self.teams_per_group
    }

    pub fn set_max_teams(&mut self, max_teams: u32) -> Result<(), TournamentError> {
        *self = Self::new(max_teams, self.group_count)?;
        Ok(())
    }

    pub fn set_group_count(&mut self, group_count: u32) -> Result<(), TournamentError> {
        *self = Self::new(self.max_teams, group_count)?;
        Ok(())
    }
}

/// Incoming group settings; `teams_per_group` is always recomputed.
#[derive(Deserialize)]
struct GroupConfigFields {
    max_teams: u32,
    group_count: u32,
}

impl TryFrom<GroupConfigFields> for GroupConfig {
    type Error = TournamentError;

    fn try_from(fields: GroupConfigFields) -> Result<Self, Self::Error> {
        Self::new(fields.max_teams, fields.group_count)
    }
}

/// Registration deadline and play window. Any bound may be left open.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub registration_deadline: Option<DateTime<Utc>>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Schedule {
    fn validate(&self) -> Result<(), TournamentError> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(TournamentError::InvalidConfig(
                    "tournament ends before it starts".to_string(),
                ));
            }
        }
        if let (Some(deadline), Some(start)) = (self.registration_deadline, self.start) {
            if deadline > start {
                return Err(TournamentError::InvalidConfig(
                    "registration closes after the tournament starts".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Full tournament: configuration, registrations and the matches it owns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: TournamentStatus,
    pub scoring: ScoringTable,
    pub groups: GroupConfig,
    pub prize_pool: f64,
    pub prize_policy: PrizePolicy,
    pub schedule: Schedule,
    #[serde(default)]
    pub format: TournamentFormat,
    /// Days of play; always 1 for a short tournament.
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,
    #[serde(default)]
    pub game_mode: GameMode,
    /// Maps played in order, repeating once exhausted.
    #[serde(default = "default_map_rotation")]
    pub map_rotation: Vec<String>,
    #[serde(default)]
    pub entry_fee: f64,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default = "default_true")]
    pub allow_spectators: bool,
    /// Registered team ids in sign-up order.
    pub registered_teams: Vec<TeamId>,
    /// Last group draw, one list of team ids per group.
    pub group_draw: Option<Vec<Vec<TeamId>>>,
    pub matches: Vec<Match>,
    pub created_at: DateTime<Utc>,
}

fn default_duration_days() -> u32 {
    1
}

fn default_map_rotation() -> Vec<String> {
    vec!["Blackout".to_string()]
}

fn default_true() -> bool {
    true
}

impl Tournament {
    /// Create a draft tournament with the default scoring table and prize policy.
    pub fn new(name: impl Into<String>, groups: GroupConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            description: String::new(),
            status: TournamentStatus::Draft,
            scoring: ScoringTable::default(),
            groups,
            prize_pool: 0.0,
            prize_policy: PrizePolicy::default(),
            schedule: Schedule::default(),
            format: TournamentFormat::Short,
            duration_days: default_duration_days(),
            game_mode: GameMode::BattleRoyale,
            map_rotation: default_map_rotation(),
            entry_fee: 0.0,
            is_public: true,
            allow_spectators: true,
            registered_teams: Vec::new(),
            group_draw: None,
            matches: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Look up a match by id.
    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Mutable reference to a match by id.
    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Map for the match with this 1-based sequence, cycling through the rotation.
    pub fn map_for(&self, sequence: u32) -> Option<&str> {
        if self.map_rotation.is_empty() || sequence == 0 {
            return None;
        }
        let idx = (sequence as usize - 1) % self.map_rotation.len();
        Some(self.map_rotation[idx].as_str())
    }

    pub fn is_registered(&self, team_id: TeamId) -> bool {
        self.registered_teams.contains(&team_id)
    }

    /// Draft -> RegistrationOpen.
    pub fn open_registration(&mut self) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Draft {
            return Err(TournamentError::InvalidState);
        }
        self.status = TournamentStatus::RegistrationOpen;
        Ok(())
    }

    /// RegistrationOpen -> Live. Needs at least two registered teams.
    pub fn start(&mut self) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::RegistrationOpen {
            return Err(TournamentError::InvalidState);
        }
        if self.registered_teams.len() < 2 {
            return Err(TournamentError::InvalidConfig(
                "need at least 2 registered teams to start".to_string(),
            ));
        }
        self.status = TournamentStatus::Live;
        Ok(())
    }

    /// Live -> Finished. Needs at least one completed match.
    pub fn finish(&mut self) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Live {
            return Err(TournamentError::InvalidState);
        }
        if !self.matches.iter().any(Match::is_completed) {
            return Err(TournamentError::InvalidState);
        }
        self.status = TournamentStatus::Finished;
        Ok(())
    }

    /// Register a team (RegistrationOpen only, up to `max_teams`).
    pub fn register_team(&mut self, team: &Team) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::RegistrationOpen {
            return Err(TournamentError::InvalidState);
        }
        if self.is_registered(team.id) {
            return Err(TournamentError::DuplicateTeam);
        }
        let max_teams = self.groups.max_teams();
        if self.registered_teams.len() >= max_teams as usize {
            return Err(TournamentError::TournamentFull { max_teams });
        }
        self.registered_teams.push(team.id);
        Ok(())
    }

    /// Withdraw a registration (RegistrationOpen only).
    pub fn unregister_team(&mut self, team_id: TeamId) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::RegistrationOpen {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .registered_teams
            .iter()
            .position(|&id| id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        self.registered_teams.remove(idx);
        Ok(())
    }

    /// Change team capacity and group count (before the tournament goes live).
    /// Capacity cannot drop below the number of teams already registered.
    pub fn set_group_config(&mut self, max_teams: u32, group_count: u32) -> Result<(), TournamentError> {
        self.ensure_configurable()?;
        let groups = GroupConfig::new(max_teams, group_count)?;
        if (max_teams as usize) < self.registered_teams.len() {
            return Err(TournamentError::InvalidConfig(format!(
                "{} teams are already registered",
                self.registered_teams.len()
            )));
        }
        self.groups = groups;
        self.group_draw = None;
        Ok(())
    }

    pub fn set_prize_pool(&mut self, prize_pool: f64) -> Result<(), TournamentError> {
        if self.status == TournamentStatus::Finished {
            return Err(TournamentError::InvalidState);
        }
        if !prize_pool.is_finite() || prize_pool < 0.0 {
            return Err(TournamentError::InvalidConfig(
                "prize pool must be a non-negative amount".to_string(),
            ));
        }
        self.prize_pool = prize_pool;
        Ok(())
    }

    pub fn set_prize_policy(&mut self, policy: PrizePolicy) -> Result<(), TournamentError> {
        if self.status == TournamentStatus::Finished {
            return Err(TournamentError::InvalidState);
        }
        self.prize_policy = policy;
        Ok(())
    }

    pub fn set_schedule(&mut self, schedule: Schedule) -> Result<(), TournamentError> {
        self.ensure_not_finished()?;
        schedule.validate()?;
        self.schedule = schedule;
        Ok(())
    }

    /// Short tournaments last exactly one day; long ones at least two.
    pub fn set_format(&mut self, format: TournamentFormat, duration_days: u32) -> Result<(), TournamentError> {
        self.ensure_configurable()?;
        match format {
            TournamentFormat::Short if duration_days != 1 => {
                return Err(TournamentError::InvalidConfig(
                    "a short tournament lasts one day".to_string(),
                ));
            }
            TournamentFormat::Long if duration_days < 2 => {
                return Err(TournamentError::InvalidConfig(
                    "a long tournament runs over at least two days".to_string(),
                ));
            }
            _ => {}
        }
        self.format = format;
        self.duration_days = duration_days;
        Ok(())
    }

    pub fn set_game_mode(&mut self, game_mode: GameMode) -> Result<(), TournamentError> {
        self.ensure_configurable()?;
        self.game_mode = game_mode;
        Ok(())
    }

    /// Replace the map rotation. Names are trimmed and blank entries dropped; only
    /// matches created afterwards pick up the new order.
    pub fn set_map_rotation<S: AsRef<str>>(&mut self, maps: &[S]) -> Result<(), TournamentError> {
        self.ensure_not_finished()?;
        self.map_rotation = maps
            .iter()
            .map(|m| m.as_ref().trim())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        Ok(())
    }

    pub fn set_entry_fee(&mut self, entry_fee: f64) -> Result<(), TournamentError> {
        self.ensure_configurable()?;
        if !entry_fee.is_finite() || entry_fee < 0.0 {
            return Err(TournamentError::InvalidConfig(
                "entry fee must be a non-negative amount".to_string(),
            ));
        }
        self.entry_fee = entry_fee;
        Ok(())
    }

    pub fn set_visibility(&mut self, is_public: bool, allow_spectators: bool) -> Result<(), TournamentError> {
        self.ensure_not_finished()?;
        self.is_public = is_public;
        self.allow_spectators = allow_spectators;
        Ok(())
    }

    /// Add a scoring rule (not allowed once finished).
    pub fn add_scoring_rule(&mut self, rule: ScoringRule) -> Result<(), TournamentError> {
        self.ensure_not_finished()?;
        self.scoring.add_rule(rule)
    }

    /// Replace the scoring rule at `position` (not allowed once finished).
    pub fn update_scoring_rule(&mut self, position: u32, rule: ScoringRule) -> Result<(), TournamentError> {
        self.ensure_not_finished()?;
        self.scoring.update_rule(position, rule)
    }

    /// Remove the scoring rule at `position` (not allowed once finished).
    pub fn remove_scoring_rule(&mut self, position: u32) -> Result<ScoringRule, TournamentError> {
        self.ensure_not_finished()?;
        self.scoring.remove_rule(position)
    }

    fn ensure_configurable(&self) -> Result<(), TournamentError> {
        use TournamentStatus::*;
        if !matches!(self.status, Draft | RegistrationOpen) {
            return Err(TournamentError::InvalidState);
        }
        Ok(())
    }

    fn ensure_not_finished(&self) -> Result<(), TournamentError> {
        if self.status == TournamentStatus::Finished {
            return Err(TournamentError::InvalidState);
        }
        Ok(())
    }
}
