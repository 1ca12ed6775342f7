//! Data structures for the Swiss stage: teams, matches, records, errors.

mod error;
mod game;
mod record;
mod team;

pub use error::SwissError;
pub use game::{Match, MatchFormat, TBD};
pub use record::{
    sort_by_probability, OpponentProbability, Record, RecordedTeam, StatusReport, TeamStatus,
    ELIMINATE_LOSSES, QUALIFY_WINS,
};
pub use team::Team;
