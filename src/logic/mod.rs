//! Swiss stage engine: records, pairing, draw simulation, and probability estimators.

mod closed_form;
mod draw;
mod monte_carlo;
mod pairing;
mod records;
mod validation;

pub use closed_form::{
    binomial_probability, calculate_meeting_probability as calculate_meeting_probability_exact,
    calculate_opponent_probabilities, calculate_qualification_probability,
    calculate_team_draw_probabilities, combination, final_record_probabilities,
    possible_final_records, DrawOutlook, DrawPolicy, Outcome, QualificationOdds,
    ADJACENT_GROUP_FLAT_WEIGHT, ADJACENT_GROUP_WEIGHT, MATCH_WIN_PROBABILITY, SAME_REGION_DISCOUNT,
};
pub use draw::{
    check_draw_round, ensure_round_ready, expected_matches_for_round, get_next_draw_round, simulate_draw_for_round,
    simulate_first_round_draw, simulate_round_draw, validate_draw_state, DrawResult,
    DrawValidation, MATCHES_PER_ROUND, TOTAL_ROUNDS, TOURNAMENT_FINISHED,
};
pub use monte_carlo::{
    calculate_conditional_probabilities, calculate_meeting_probability,
    calculate_opponent_probabilities_monte_carlo, calculate_qualification_probabilities,
    merge_hypothetical, QualificationReport, TeamOutcomes, WinProbabilities,
    DEFAULT_DRAW_SIMULATIONS, DEFAULT_SIMULATIONS, DEFAULT_WIN_PROBABILITY,
};
pub use pairing::{
    generate_possible_matches, get_match_format, get_possible_opponents, is_same_region,
    is_valid_matchup, pair_group,
};
pub use records::{
    decided_matches, decided_matches_before, get_played_opponents, get_team_record,
    get_team_status, group_teams_by_record, RecordGroups,
};
pub use validation::{max_deviation, opponent_report, OpponentReport};
