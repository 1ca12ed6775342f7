//! Monte Carlo estimators: draw-meeting frequencies, empirical opponent distributions, and
//! full-stage qualification odds.

use crate::logic::draw::{check_draw_round, draw_checked_round, TOTAL_ROUNDS};
use crate::logic::records::get_team_record;
use crate::models::{
    sort_by_probability, Match, OpponentProbability, Record, SwissError, Team, ELIMINATE_LOSSES,
    QUALIFY_WINS,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Default trial count for draw-level estimates.
pub const DEFAULT_DRAW_SIMULATIONS: usize = 1_000;
/// Default trial count for full-stage estimates.
pub const DEFAULT_SIMULATIONS: usize = 10_000;
/// Win probability used for any matchup without an explicit entry.
pub const DEFAULT_WIN_PROBABILITY: f64 = 0.5;

/// Per-matchup win probabilities keyed `"<teamA>_vs_<teamB>"`, giving P(teamA beats teamB).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinProbabilities(HashMap<String, f64>);

impl WinProbabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(team_a: &str, team_b: &str) -> String {
        format!("{}_vs_{}", team_a, team_b)
    }

    /// Set P(`team_a` beats `team_b`).
    pub fn set(&mut self, team_a: &str, team_b: &str, probability: f64) {
        self.0.insert(Self::key(team_a, team_b), probability);
    }

    /// P(`team_a` beats `team_b`): the explicit key, else the complement of the mirror key,
    /// else [`DEFAULT_WIN_PROBABILITY`].
    pub fn win_probability(&self, team_a: &str, team_b: &str) -> f64 {
        if let Some(&p) = self.0.get(&Self::key(team_a, team_b)) {
            p
        } else if let Some(&p) = self.0.get(&Self::key(team_b, team_a)) {
            1.0 - p
        } else {
            DEFAULT_WIN_PROBABILITY
        }
    }

    /// Every entry must be a probability.
    pub fn validate(&self) -> Result<(), SwissError> {
        match self.0.iter().find(|(_, p)| !(0.0..=1.0).contains(*p)) {
            Some((key, &value)) => Err(SwissError::InvalidWinProbability {
                key: key.clone(),
                value,
            }),
            None => Ok(()),
        }
    }
}

/// Aggregated outcomes for one team. Probabilities are percentages with one decimal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOutcomes {
    pub team: String,
    pub qualified: usize,
    pub eliminated: usize,
    pub final_records: BTreeMap<Record, usize>,
    pub qualification_probability: f64,
    pub elimination_probability: f64,
    pub final_record_probabilities: BTreeMap<Record, f64>,
}

/// Full-stage Monte Carlo result, one entry per team in input order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationReport {
    /// Trials actually run; every percentage uses this denominator.
    pub simulations: usize,
    pub teams: Vec<TeamOutcomes>,
}

impl QualificationReport {
    pub fn team(&self, name: &str) -> Option<&TeamOutcomes> {
        self.teams.iter().find(|t| t.team == name)
    }
}

/// Fraction of simulated draws of `round` in which `team_a` meets `team_b`.
pub fn calculate_meeting_probability<R: Rng + ?Sized>(
    team_a: &str,
    team_b: &str,
    teams: &[Team],
    matches: &[Match],
    round: u32,
    simulations: usize,
    rng: &mut R,
) -> Result<f64, SwissError> {
    if simulations == 0 {
        return Err(SwissError::NoSimulations);
    }
    check_draw_round(teams, matches, round)?;
    let mut meetings = 0usize;
    for _ in 0..simulations {
        let draw = draw_checked_round(teams, matches, round, rng);
        if draw.matches.iter().any(|m| m.is_between(team_a, team_b)) {
            meetings += 1;
        }
    }
    Ok(meetings as f64 / simulations as f64)
}

/// Empirical next-round opponent distribution for `team`, sorted by descending probability.
/// Trials in which the team is not drawn add to no opponent, so the list may sum below 1.
pub fn calculate_opponent_probabilities_monte_carlo<R: Rng + ?Sized>(
    team: &str,
    teams: &[Team],
    matches: &[Match],
    round: u32,
    simulations: usize,
    rng: &mut R,
) -> Result<Vec<OpponentProbability>, SwissError> {
    if simulations == 0 {
        return Err(SwissError::NoSimulations);
    }
    check_draw_round(teams, matches, round)?;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for _ in 0..simulations {
        let draw = draw_checked_round(teams, matches, round, rng);
        if let Some(opponent) = draw.matches.iter().find_map(|m| m.opponent_of(team)) {
            *counts.entry(opponent.to_string()).or_default() += 1;
        }
    }

    let mut probabilities: Vec<OpponentProbability> = counts
        .into_iter()
        .map(|(opponent, count)| OpponentProbability {
            opponent,
            probability: count as f64 / simulations as f64,
        })
        .collect();
    sort_by_probability(&mut probabilities);
    Ok(probabilities)
}

/// Simulate the rest of the stage `simulations` times and report qualification, elimination,
/// and final-record frequencies per team.
///
/// Inputs are validated before the first trial, so every trial completes and the reported
/// denominator is exact.
pub fn calculate_qualification_probabilities<R: Rng + ?Sized>(
    teams: &[Team],
    matches: &[Match],
    simulations: usize,
    win_probabilities: &WinProbabilities,
    rng: &mut R,
) -> Result<QualificationReport, SwissError> {
    if simulations == 0 {
        return Err(SwissError::NoSimulations);
    }
    win_probabilities.validate()?;
    let stage = StageState::new(teams, matches)?;
    log::debug!(
        "Simulating {} stages for {} teams ({} pending matches)",
        simulations,
        teams.len(),
        stage.pending_count()
    );

    let mut outcomes: Vec<TeamOutcomes> = teams
        .iter()
        .map(|t| TeamOutcomes {
            team: t.name.clone(),
            ..TeamOutcomes::default()
        })
        .collect();

    for _ in 0..simulations {
        let finals = simulate_swiss_rounds(&stage, teams, win_probabilities, rng);
        for (outcome, record) in outcomes.iter_mut().zip(finals) {
            if record.wins >= QUALIFY_WINS {
                outcome.qualified += 1;
            } else if record.losses >= ELIMINATE_LOSSES {
                outcome.eliminated += 1;
            }
            *outcome.final_records.entry(record).or_default() += 1;
        }
    }

    for outcome in &mut outcomes {
        outcome.qualification_probability = percent(outcome.qualified, simulations);
        outcome.elimination_probability = percent(outcome.eliminated, simulations);
        outcome.final_record_probabilities = outcome
            .final_records
            .iter()
            .map(|(record, &count)| (*record, percent(count, simulations)))
            .collect();
    }

    Ok(QualificationReport {
        simulations,
        teams: outcomes,
    })
}

/// Same as [`calculate_qualification_probabilities`] with hypothetical results merged into
/// the history first. A hypothetical result replaces any listed match between the same pair
/// in the same round.
pub fn calculate_conditional_probabilities<R: Rng + ?Sized>(
    teams: &[Team],
    matches: &[Match],
    hypothetical_matches: &[Match],
    simulations: usize,
    win_probabilities: &WinProbabilities,
    rng: &mut R,
) -> Result<QualificationReport, SwissError> {
    let combined = merge_hypothetical(matches, hypothetical_matches);
    calculate_qualification_probabilities(teams, &combined, simulations, win_probabilities, rng)
}

/// History with each hypothetical match replacing its listed counterpart.
pub fn merge_hypothetical(matches: &[Match], hypothetical_matches: &[Match]) -> Vec<Match> {
    let mut combined: Vec<Match> = matches
        .iter()
        .filter(|m| {
            !hypothetical_matches
                .iter()
                .any(|h| h.round == m.round && h.is_between(&m.team_a, &m.team_b))
        })
        .cloned()
        .collect();
    combined.extend(hypothetical_matches.iter().cloned());
    combined
}

/// Starting point shared by every trial: current tallies plus what is already listed for
/// each round.
struct StageState {
    records: Vec<Record>,
    /// Index `r` holds round `r + 1`.
    rounds: Vec<ScheduledRound>,
}

/// Teams already placed in one round.
#[derive(Default)]
struct ScheduledRound {
    /// Teams whose result for this round is already counted in the tallies.
    decided: Vec<usize>,
    /// Listed matches with two real entrants and no winner.
    pending: Vec<(usize, usize)>,
}

impl StageState {
    fn new(teams: &[Team], matches: &[Match]) -> Result<Self, SwissError> {
        let index: HashMap<&str, usize> = teams
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.as_str(), i))
            .collect();
        let lookup = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| SwissError::UnknownTeam(name.to_string()))
        };

        let mut rounds: Vec<ScheduledRound> = (0..TOTAL_ROUNDS)
            .map(|_| ScheduledRound::default())
            .collect();
        for m in matches.iter().filter(|m| !m.has_tbd()) {
            let (a, b) = (lookup(&m.team_a)?, lookup(&m.team_b)?);
            let round = m
                .round
                .checked_sub(1)
                .and_then(|r| rounds.get_mut(r as usize))
                .ok_or(SwissError::InvalidRound(m.round))?;
            match &m.winner {
                Some(winner) => {
                    lookup(winner)?;
                    round.decided.extend([a, b]);
                }
                None => round.pending.push((a, b)),
            }
        }

        let records = teams
            .iter()
            .map(|t| get_team_record(&t.name, matches))
            .collect();
        Ok(Self { records, rounds })
    }

    fn pending_count(&self) -> usize {
        self.rounds.iter().map(|r| r.pending.len()).sum()
    }
}

/// Play one stage to completion and return every team's final record.
///
/// Each round resolves its listed pending matches, then pairs every active team not yet placed
/// in that round: record groups are shuffled and adjacent teams paired, ignoring rematch
/// avoidance to keep trials cheap. A team left over by an odd group is paired with the next
/// leftover in record order.
fn simulate_swiss_rounds<R: Rng + ?Sized>(
    stage: &StageState,
    teams: &[Team],
    win_probabilities: &WinProbabilities,
    rng: &mut R,
) -> Vec<Record> {
    let mut records = stage.records.clone();
    let mut placed = vec![false; records.len()];

    for round in &stage.rounds {
        placed.fill(false);
        for &i in &round.decided {
            placed[i] = true;
        }
        for &(a, b) in &round.pending {
            if records[a].is_active() && records[b].is_active() {
                placed[a] = true;
                placed[b] = true;
                play(&mut records, a, b, teams, win_probabilities, rng);
            }
        }

        let mut groups: BTreeMap<Record, Vec<usize>> = BTreeMap::new();
        for (i, record) in records.iter().enumerate() {
            if record.is_active() && !placed[i] {
                groups.entry(*record).or_default().push(i);
            }
        }
        let mut leftovers = Vec::new();
        for (_, mut group) in groups {
            group.shuffle(rng);
            let pairs = group.chunks_exact(2);
            leftovers.extend_from_slice(pairs.remainder());
            for pair in pairs {
                play(&mut records, pair[0], pair[1], teams, win_probabilities, rng);
            }
        }
        for pair in leftovers.chunks_exact(2) {
            play(&mut records, pair[0], pair[1], teams, win_probabilities, rng);
        }
    }
    records
}

fn play<R: Rng + ?Sized>(
    records: &mut [Record],
    a: usize,
    b: usize,
    teams: &[Team],
    win_probabilities: &WinProbabilities,
    rng: &mut R,
) {
    let p = win_probabilities.win_probability(&teams[a].name, &teams[b].name);
    let (winner, loser) = if rng.gen::<f64>() < p { (a, b) } else { (b, a) };
    records[winner] = records[winner].after_win();
    records[loser] = records[loser].after_loss();
}

/// Percentage rounded to one decimal.
fn percent(count: usize, total: usize) -> f64 {
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}
