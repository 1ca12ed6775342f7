//! Win/loss record, team status, and record-group entries.

use crate::models::error::SwissError;
use crate::models::team::Team;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wins needed to qualify.
pub const QUALIFY_WINS: u32 = 3;
/// Losses that eliminate a team.
pub const ELIMINATE_LOSSES: u32 = 3;

/// A team's win/loss tally. Displays and parses as `"<wins>-<losses>"`, which is also the
/// record-group key. Ordered by wins, then losses.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

impl Record {
    pub const fn new(wins: u32, losses: u32) -> Self {
        Self { wins, losses }
    }

    /// Matches played so far.
    pub fn played(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn status(&self) -> TeamStatus {
        if self.wins >= QUALIFY_WINS {
            TeamStatus::Qualified
        } else if self.losses >= ELIMINATE_LOSSES {
            TeamStatus::Eliminated
        } else {
            TeamStatus::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == TeamStatus::Active
    }

    /// Record after one more win.
    pub fn after_win(self) -> Self {
        Self::new(self.wins + 1, self.losses)
    }

    /// Record after one more loss.
    pub fn after_loss(self) -> Self {
        Self::new(self.wins, self.losses + 1)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}

impl FromStr for Record {
    type Err = SwissError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SwissError::InvalidRecordKey(s.to_string());
        let (wins, losses) = s.trim().split_once('-').ok_or_else(invalid)?;
        let wins = wins.parse().map_err(|_| invalid())?;
        let losses = losses.parse().map_err(|_| invalid())?;
        Ok(Self { wins, losses })
    }
}

impl TryFrom<String> for Record {
    type Error = SwissError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Record> for String {
    fn from(record: Record) -> Self {
        record.to_string()
    }
}

/// Whether a team is still playing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    #[default]
    Active,
    Qualified,
    Eliminated,
}

/// Status plus a human-readable reason (empty while active).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: TeamStatus,
    pub reason: String,
}

/// A team merged with its current record; the element of a record group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RecordedTeam {
    #[serde(flatten)]
    pub team: Team,
    pub record: Record,
}

impl RecordedTeam {
    pub fn name(&self) -> &str {
        &self.team.name
    }

    pub fn is_active(&self) -> bool {
        self.record.is_active()
    }
}

/// One entry of an opponent-probability distribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpponentProbability {
    pub opponent: String,
    pub probability: f64,
}

/// Sort by descending probability, ties broken by opponent name.
pub fn sort_by_probability(probabilities: &mut [OpponentProbability]) {
    probabilities.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| a.opponent.cmp(&b.opponent))
    });
}
