//! Scoring rules: finishing position -> points awarded.

use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};

/// Points awarded for finishing in a given position.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    /// 1-based finishing position.
    pub position: u32,
    pub points: u32,
    #[serde(default)]
    pub description: String,
}

impl ScoringRule {
    pub fn new(position: u32, points: u32, description: impl Into<String>) -> Self {
        Self {
            position,
            points,
            description: description.into(),
        }
    }
}

/// Ordered scoring table. Positions are unique and kept sorted ascending after every edit.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScoringRule>", into = "Vec<ScoringRule>")]
pub struct ScoringTable {
    rules: Vec<ScoringRule>,
}

impl Default for ScoringTable {
    /// Battle-royale defaults: 1st 15, 2nd 12, 3rd 10, 4th 8, 5th 6.
    fn default() -> Self {
        Self {
            rules: vec![
                ScoringRule::new(1, 15, "Royale victory"),
                ScoringRule::new(2, 12, "2nd place"),
                ScoringRule::new(3, 10, "3rd place"),
                ScoringRule::new(4, 8, "4th place"),
                ScoringRule::new(5, 6, "5th place"),
            ],
        }
    }
}

impl ScoringTable {
    /// Build a table from arbitrary rules: validates positions and sorts ascending.
    pub fn new(rules: Vec<ScoringRule>) -> Result<Self, TournamentError> {
        let mut table = Self { rules: Vec::with_capacity(rules.len()) };
        for rule in rules {
            table.add_rule(rule)?;
        }
        Ok(table)
    }

    /// Table with no rules: every position scores zero.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Points for a finishing position; zero when no rule covers it.
    pub fn points_for(&self, position: u32) -> u32 {
        self.rules
            .binary_search_by_key(&position, |r| r.position)
            .map(|idx| self.rules[idx].points)
            .unwrap_or(0)
    }

    /// Insert a rule. Fails if the position is zero or already has a rule.
    pub fn add_rule(&mut self, rule: ScoringRule) -> Result<(), TournamentError> {
        check_position(rule.position)?;
        match self.rules.binary_search_by_key(&rule.position, |r| r.position) {
            Ok(_) => Err(TournamentError::InvalidConfig(format!(
                "position {} already has a scoring rule",
                rule.position
            ))),
            Err(idx) => {
                self.rules.insert(idx, rule);
                Ok(())
            }
        }
    }

    /// Replace the rule at `position`. The replacement may move to another free position.
    pub fn update_rule(&mut self, position: u32, rule: ScoringRule) -> Result<(), TournamentError> {
        check_position(rule.position)?;
        let idx = self.index_of(position)?;
        if rule.position != position && self.index_of(rule.position).is_ok() {
            return Err(TournamentError::InvalidConfig(format!(
                "position {} already has a scoring rule",
                rule.position
            )));
        }
        self.rules[idx] = rule;
        self.rules.sort_by_key(|r| r.position);
        Ok(())
    }

    /// Remove the rule at `position`, returning it.
    pub fn remove_rule(&mut self, position: u32) -> Result<ScoringRule, TournamentError> {
        let idx = self.index_of(position)?;
        Ok(self.rules.remove(idx))
    }

    fn index_of(&self, position: u32) -> Result<usize, TournamentError> {
        self.rules
            .binary_search_by_key(&position, |r| r.position)
            .map_err(|_| {
                TournamentError::InvalidConfig(format!("no scoring rule for position {}", position))
            })
    }
}

fn check_position(position: u32) -> Result<(), TournamentError> {
    if position == 0 {
        return Err(TournamentError::InvalidConfig(
            "scoring positions start at 1".to_string(),
        ));
    }
    Ok(())
}

impl TryFrom<Vec<ScoringRule>> for ScoringTable {
    type Error = TournamentError;

    fn try_from(rules: Vec<ScoringRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<ScoringTable> for Vec<ScoringRule> {
    fn from(table: ScoringTable) -> Self {
        table.rules
    }
}
