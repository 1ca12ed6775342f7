//! Swiss stage odds: library with models and the draw / probability engine.

pub mod config;
pub mod logic;
pub mod models;

pub use config::ValidationConfig;
pub use logic::{
    calculate_conditional_probabilities, calculate_meeting_probability,
    calculate_meeting_probability_exact, calculate_opponent_probabilities,
    calculate_opponent_probabilities_monte_carlo, calculate_qualification_probabilities,
    calculate_qualification_probability, calculate_team_draw_probabilities, check_draw_round,
    ensure_round_ready, generate_possible_matches, get_match_format, get_next_draw_round,
    get_played_opponents, get_possible_opponents, get_team_record, get_team_status,
    group_teams_by_record, is_valid_matchup, opponent_report, simulate_draw_for_round,
    simulate_first_round_draw, simulate_round_draw, validate_draw_state, DrawOutlook, DrawPolicy,
    DrawResult, DrawValidation, OpponentReport, Outcome, QualificationOdds, QualificationReport,
    TeamOutcomes, WinProbabilities,
};
pub use models::{
    Match, MatchFormat, OpponentProbability, Record, RecordedTeam, StatusReport, SwissError,
    Team, TeamStatus, TBD,
};
