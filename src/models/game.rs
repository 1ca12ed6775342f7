//! Match and MatchFormat for the Swiss stage.

use crate::models::record::Record;
use serde::{Deserialize, Serialize};

/// Placeholder entrant for a slot that has not been drawn yet.
pub const TBD: &str = "TBD";

/// Best-of-one or best-of-three.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MatchFormat {
    #[default]
    Bo1,
    Bo3,
}

/// A single Swiss match. `group` is the bracket the match was drawn in, i.e. both
/// teams' record before playing it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub round: u32,
    pub group: Record,
    pub team_a: String,
    pub team_b: String,
    /// None while pending.
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub format: MatchFormat,
}

impl Match {
    /// A pending match.
    pub fn new(
        round: u32,
        group: Record,
        team_a: impl Into<String>,
        team_b: impl Into<String>,
        format: MatchFormat,
    ) -> Self {
        Self {
            round,
            group,
            team_a: team_a.into(),
            team_b: team_b.into(),
            winner: None,
            format,
        }
    }

    /// Same match with the winner set.
    pub fn decided(mut self, winner: impl Into<String>) -> Self {
        self.winner = Some(winner.into());
        self
    }

    /// True if either slot is still the TBD placeholder.
    pub fn has_tbd(&self) -> bool {
        self.team_a == TBD || self.team_b == TBD
    }

    /// Both entrants are real and a winner is set.
    pub fn is_decided(&self) -> bool {
        self.winner.is_some() && !self.has_tbd()
    }

    /// Both entrants are real but no winner is set yet.
    pub fn is_pending(&self) -> bool {
        self.winner.is_none() && !self.has_tbd()
    }

    pub fn involves(&self, team: &str) -> bool {
        self.team_a == team || self.team_b == team
    }

    /// The other entrant, if `team` plays in this match.
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.team_a == team {
            Some(&self.team_b)
        } else if self.team_b == team {
            Some(&self.team_a)
        } else {
            None
        }
    }

    /// Whether this match is between `a` and `b`, in either order.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.team_a == a && self.team_b == b) || (self.team_a == b && self.team_b == a)
    }
}
