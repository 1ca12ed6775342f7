//! Closed-form estimators: binomial qualification odds, weighted next-round opponent
//! distributions, and analytic meeting probabilities. No sampling.

use crate::logic::draw::TOTAL_ROUNDS;
use crate::logic::pairing::is_same_region;
use crate::logic::records::{
    decided_matches_before, get_played_opponents, get_team_record, group_teams_by_record,
    RecordGroups,
};
use crate::models::{
    sort_by_probability, Match, OpponentProbability, Record, RecordedTeam, Team, TeamStatus,
    ELIMINATE_LOSSES, QUALIFY_WINS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Weight multiplier for a candidate from the same region.
pub const SAME_REGION_DISCOUNT: f64 = 0.3;
/// Multiplicative weight for candidates from an adjacent record group.
pub const ADJACENT_GROUP_WEIGHT: f64 = 0.5;
/// Flat weight spread over an adjacent group's candidates, without region discount.
pub const ADJACENT_GROUP_FLAT_WEIGHT: f64 = 0.1;
/// Per-match win rate assumed by every closed-form estimate.
pub const MATCH_WIN_PROBABILITY: f64 = 0.5;

/// Weights applied when building an analytic opponent distribution.
///
/// Two adjacent-group weightings exist and neither is authoritative: [`DrawPolicy::default`]
/// applies [`ADJACENT_GROUP_WEIGHT`] and keeps the region discount across groups, while
/// [`DrawPolicy::flat_adjacent`] spreads [`ADJACENT_GROUP_FLAT_WEIGHT`] with no region discount.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawPolicy {
    pub same_region_discount: f64,
    pub adjacent_group_weight: f64,
    pub region_discount_across_groups: bool,
}

impl Default for DrawPolicy {
    fn default() -> Self {
        Self {
            same_region_discount: SAME_REGION_DISCOUNT,
            adjacent_group_weight: ADJACENT_GROUP_WEIGHT,
            region_discount_across_groups: true,
        }
    }
}

impl DrawPolicy {
    pub fn flat_adjacent() -> Self {
        Self {
            same_region_discount: SAME_REGION_DISCOUNT,
            adjacent_group_weight: ADJACENT_GROUP_FLAT_WEIGHT,
            region_discount_across_groups: false,
        }
    }
}

/// Closed-form qualification chance for one team.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationOdds {
    pub team: String,
    pub probability: f64,
    pub status: TeamStatus,
    pub current_record: Record,
}

/// Result the team would get in its pending match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Lose,
}

/// What a team faces in a later draw under a hypothetical result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "opponents", rename_all = "snake_case")]
pub enum DrawOutlook {
    Qualified,
    Eliminated,
    Opponents(Vec<OpponentProbability>),
}

/// n choose k, computed multiplicatively in floating point.
pub fn combination(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (1..=k).fold(1.0, |acc, i| acc * f64::from(n - k + i) / f64::from(i))
}

/// P(exactly `k` successes in `n` independent trials with success rate `p`).
pub fn binomial_probability(n: u32, k: u32, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    combination(n, k) * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32)
}

/// Chance the team finishes with at least three wins, assuming every remaining match is a
/// coin flip. Already-qualified teams get 1.0 and eliminated teams 0.0.
pub fn calculate_qualification_probability(team: &str, matches: &[Match]) -> QualificationOdds {
    let record = get_team_record(team, matches);
    let status = record.status();
    let probability = match status {
        TeamStatus::Qualified => 1.0,
        TeamStatus::Eliminated => 0.0,
        TeamStatus::Active => {
            let remaining = TOTAL_ROUNDS.saturating_sub(record.played());
            (0..=remaining)
                .filter(|&wins| record.wins + wins >= QUALIFY_WINS)
                .map(|wins| binomial_probability(remaining, wins, MATCH_WIN_PROBABILITY))
                .sum()
        }
    };
    log::debug!(
        "Closed-form qualification for {} at {}: {:.4}",
        team,
        record,
        probability
    );
    QualificationOdds {
        team: team.to_string(),
        probability,
        status,
        current_record: record,
    }
}

/// Terminal records (3-x or x-3) the team can still finish on.
pub fn possible_final_records(team: &str, matches: &[Match]) -> Vec<Record> {
    let current = get_team_record(team, matches);
    if !current.is_active() {
        return vec![current];
    }
    let qualified =
        (current.losses..ELIMINATE_LOSSES).map(|losses| Record::new(QUALIFY_WINS, losses));
    let eliminated =
        (current.wins..QUALIFY_WINS).map(|wins| Record::new(wins, ELIMINATE_LOSSES));
    qualified.chain(eliminated).collect()
}

/// Probability of finishing on each terminal record with coin-flip matches. A team ends on
/// 3-L when its last match is the third win, which gives a negative binomial.
pub fn final_record_probabilities(team: &str, matches: &[Match]) -> Vec<(Record, f64)> {
    let current = get_team_record(team, matches);
    possible_final_records(team, matches)
        .into_iter()
        .map(|record| {
            if !current.is_active() {
                return (record, 1.0);
            }
            let wins = record.wins - current.wins;
            let losses = record.losses - current.losses;
            // The deciding match is fixed; the rest are arranged freely.
            let arrangements = if record.wins >= QUALIFY_WINS {
                combination(wins + losses - 1, losses)
            } else {
                combination(wins + losses - 1, wins)
            };
            (record, arrangements * MATCH_WIN_PROBABILITY.powi((wins + losses) as i32))
        })
        .collect()
}

/// Analytic next-round opponent distribution for `team` in `round`.
///
/// Candidates are active, unplayed teams from the team's own record group, each weighted
/// equally and discounted when sharing a region. With no such candidate, the groups one win
/// above and one loss below are used at [`DrawPolicy::adjacent_group_weight`]. Weights are
/// normalized to sum to 1. An empty list means the distribution is indeterminate (the team is
/// not active or has no candidate at all).
pub fn calculate_opponent_probabilities(
    team: &str,
    teams: &[Team],
    matches: &[Match],
    round: u32,
    policy: &DrawPolicy,
) -> Vec<OpponentProbability> {
    let history = decided_matches_before(matches, round);
    draw_probabilities(team, teams, &history, policy)
}

/// Apply `outcome` to the team's pending match in `current_round`, then describe its draw in
/// `target_round`.
pub fn calculate_team_draw_probabilities(
    team: &str,
    teams: &[Team],
    matches: &[Match],
    current_round: u32,
    target_round: u32,
    outcome: Outcome,
    policy: &DrawPolicy,
) -> DrawOutlook {
    let hypothetical = apply_outcome(matches, team, current_round, outcome);
    match get_team_record(team, &hypothetical).status() {
        TeamStatus::Qualified => DrawOutlook::Qualified,
        TeamStatus::Eliminated => DrawOutlook::Eliminated,
        TeamStatus::Active => DrawOutlook::Opponents(calculate_opponent_probabilities(
            team,
            teams,
            &hypothetical,
            target_round,
            policy,
        )),
    }
}

/// Analytic chance that `team_a` and `team_b` are drawn together in `target_round`.
///
/// Each team's record at that draw follows a binomial over the rounds it still has to play.
/// For every active record both could hold, the pair meets with probability `1 / (n - 1)`,
/// where `n` is the expected size of that group: the two teams plus every other active team
/// weighted by its chance of holding the same record.
pub fn calculate_meeting_probability(
    team_a: &str,
    team_b: &str,
    teams: &[Team],
    matches: &[Match],
    target_round: u32,
) -> f64 {
    let history = decided_matches_before(matches, target_round);
    let record_a = get_team_record(team_a, &history);
    let record_b = get_team_record(team_b, &history);
    if !record_a.is_active() || !record_b.is_active() {
        return 0.0;
    }
    if get_played_opponents(team_a, &history).contains(team_b) {
        return 0.0;
    }

    let draw_index = target_round.saturating_sub(1);
    let dist_a = record_distribution(record_a, draw_index);
    let dist_b = record_distribution(record_b, draw_index);
    let others: Vec<Vec<(Record, f64)>> = teams
        .iter()
        .filter(|t| t.name != team_a && t.name != team_b)
        .map(|t| get_team_record(&t.name, &history))
        .filter(Record::is_active)
        .map(|r| record_distribution(r, draw_index))
        .collect();

    let mut total = 0.0;
    for &(record, p_a) in dist_a.iter().filter(|(r, _)| r.is_active()) {
        let Some(&(_, p_b)) = dist_b.iter().find(|(r, _)| *r == record) else {
            continue;
        };
        let expected_others: f64 = others
            .iter()
            .flat_map(|dist| dist.iter())
            .filter(|(r, _)| *r == record)
            .map(|(_, p)| p)
            .sum();
        let group_size = 2.0 + expected_others;
        total += p_a * p_b / (group_size - 1.0);
    }
    log::debug!(
        "Closed-form meeting {} vs {} in round {}: {:.4}",
        team_a,
        team_b,
        target_round,
        total
    );
    total.min(1.0)
}

/// Records a team could hold after `played` matches, starting from `record`, with their
/// binomial probabilities.
fn record_distribution(record: Record, played: u32) -> Vec<(Record, f64)> {
    let rounds = played.saturating_sub(record.played());
    (0..=rounds)
        .map(|wins| {
            (
                Record::new(record.wins + wins, record.losses + rounds - wins),
                binomial_probability(rounds, wins, MATCH_WIN_PROBABILITY),
            )
        })
        .collect()
}

fn draw_probabilities(
    team: &str,
    teams: &[Team],
    history: &[Match],
    policy: &DrawPolicy,
) -> Vec<OpponentProbability> {
    let record = get_team_record(team, history);
    if !record.is_active() {
        return Vec::new();
    }
    let groups = group_teams_by_record(teams, history);
    let played = get_played_opponents(team, history);
    let target = teams.iter().find(|t| t.name == team);
    let weight = |opponent: &Team, base: f64, discount_region: bool| {
        let same_region = target.map_or(false, |t| is_same_region(t, opponent));
        if discount_region && same_region {
            base * policy.same_region_discount
        } else {
            base
        }
    };

    let mut probabilities = Vec::new();
    let same_group = candidates(&groups, record, team, &played);
    if !same_group.is_empty() {
        let base = 1.0 / same_group.len() as f64;
        for opponent in same_group {
            probabilities.push(OpponentProbability {
                opponent: opponent.name().to_string(),
                probability: weight(&opponent.team, base, true),
            });
        }
    } else {
        for group in [record.after_win(), record.after_loss()] {
            let adjacent = candidates(&groups, group, team, &played);
            let base = policy.adjacent_group_weight / adjacent.len().max(1) as f64;
            for opponent in adjacent {
                probabilities.push(OpponentProbability {
                    opponent: opponent.name().to_string(),
                    probability: weight(&opponent.team, base, policy.region_discount_across_groups),
                });
            }
        }
    }

    let total: f64 = probabilities.iter().map(|p| p.probability).sum();
    if total > 0.0 {
        for p in &mut probabilities {
            p.probability /= total;
        }
    }
    sort_by_probability(&mut probabilities);
    probabilities
}

fn candidates<'a>(
    groups: &'a RecordGroups,
    group: Record,
    team: &str,
    played: &BTreeSet<String>,
) -> Vec<&'a RecordedTeam> {
    groups
        .get(&group)
        .map(|members| {
            members
                .iter()
                .filter(|t| t.name() != team && t.is_active() && !played.contains(t.name()))
                .collect()
        })
        .unwrap_or_default()
}

/// Copy of `matches` with the team's pending match in `round` decided by `outcome`.
fn apply_outcome(matches: &[Match], team: &str, round: u32, outcome: Outcome) -> Vec<Match> {
    let mut hypothetical = matches.to_vec();
    let pending = hypothetical
        .iter_mut()
        .find(|m| m.round == round && m.involves(team) && m.winner.is_none());
    if let Some(m) = pending {
        let winner = match outcome {
            Outcome::Win => team.to_string(),
            Outcome::Lose => m.opponent_of(team).unwrap_or_default().to_string(),
        };
        m.winner = Some(winner);
    }
    hypothetical
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_distribution_sums_to_one() {
        let dist = record_distribution(Record::new(1, 0), 4);
        assert_eq!(dist.len(), 4);
        let total: f64 = dist.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn record_distribution_without_rounds_is_current_record() {
        let dist = record_distribution(Record::new(2, 1), 3);
        assert_eq!(dist, vec![(Record::new(2, 1), 1.0)]);
    }
}
