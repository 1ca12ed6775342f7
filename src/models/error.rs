//! Errors raised by the draw and probability engine.

/// Errors that can occur during draw simulation or probability estimation.
#[derive(Clone, Debug, PartialEq)]
pub enum SwissError {
    /// Round 1 draws depend on seeding rules the engine does not model.
    FirstRoundUnsupported,
    /// Round outside 1..=5.
    InvalidRound(u32),
    /// A match references a team that is not in the team list.
    UnknownTeam(String),
    /// A configured win probability is outside [0, 1].
    InvalidWinProbability { key: String, value: f64 },
    /// A record-group key that is not `"<wins>-<losses>"`.
    InvalidRecordKey(String),
    /// A Monte Carlo estimate was requested with zero simulations.
    NoSimulations,
    /// An earlier round still has an undecided match or a TBD entrant.
    UndecidedEarlierMatch(String),
    /// The requested round is later than the next round that can be drawn.
    RoundNotReady { round: u32, next_round: u32 },
}

impl std::fmt::Display for SwissError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwissError::FirstRoundUnsupported => {
                write!(f, "First-round seeding unsupported: round 1 cannot be simulated")
            }
            SwissError::InvalidRound(round) => write!(f, "Round {} is outside rounds 1-5", round),
            SwissError::UnknownTeam(name) => write!(f, "Unknown team: {}", name),
            SwissError::InvalidWinProbability { key, value } => {
                write!(f, "Win probability for {} must be within 0..=1 (got {})", key, value)
            }
            SwissError::InvalidRecordKey(key) => {
                write!(f, "Invalid record key {:?}, expected \"<wins>-<losses>\"", key)
            }
            SwissError::NoSimulations => write!(f, "At least one simulation is required"),
            SwissError::UndecidedEarlierMatch(message) => write!(f, "{}", message),
            SwissError::RoundNotReady { round, next_round } => write!(
                f,
                "Round {} cannot be drawn yet: round {} is still incomplete",
                round, next_round
            ),
        }
    }
}

impl std::error::Error for SwissError {}
