//! Optional Monte Carlo cross-check of the analytic opponent distribution.

use crate::config::ValidationConfig;
use crate::logic::closed_form::{calculate_opponent_probabilities, DrawPolicy};
use crate::logic::monte_carlo::calculate_opponent_probabilities_monte_carlo;
use crate::models::{Match, OpponentProbability, SwissError, Team};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Analytic opponent distribution, plus the simulated one when validation is enabled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentReport {
    pub team: String,
    pub round: u32,
    pub analytic: Vec<OpponentProbability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<Vec<OpponentProbability>>,
    /// Largest absolute per-opponent gap between the two distributions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_deviation: Option<f64>,
}

/// Build the opponent report for `team` in `round`.
pub fn opponent_report<R: Rng + ?Sized>(
    team: &str,
    teams: &[Team],
    matches: &[Match],
    round: u32,
    policy: &DrawPolicy,
    config: &ValidationConfig,
    rng: &mut R,
) -> Result<OpponentReport, SwissError> {
    let analytic = calculate_opponent_probabilities(team, teams, matches, round, policy);
    let mut report = OpponentReport {
        team: team.to_string(),
        round,
        analytic,
        monte_carlo: None,
        max_deviation: None,
    };
    if !config.enabled {
        return Ok(report);
    }

    let simulated = calculate_opponent_probabilities_monte_carlo(
        team,
        teams,
        matches,
        round,
        config.simulations,
        rng,
    )?;
    let deviation = max_deviation(&report.analytic, &simulated);
    log::info!(
        "Cross-check for {} in round {}: max deviation {:.3} over {} draws",
        team,
        round,
        deviation,
        config.simulations
    );
    report.monte_carlo = Some(simulated);
    report.max_deviation = Some(deviation);
    Ok(report)
}

/// Largest |p_a - p_b| over the union of opponents; a missing opponent counts as 0.
pub fn max_deviation(a: &[OpponentProbability], b: &[OpponentProbability]) -> f64 {
    let lookup = |list: &[OpponentProbability], name: &str| {
        list.iter()
            .find(|p| p.opponent == name)
            .map_or(0.0, |p| p.probability)
    };
    a.iter()
        .chain(b)
        .map(|p| (lookup(a, &p.opponent) - lookup(b, &p.opponent)).abs())
        .fold(0.0, f64::max)
}
