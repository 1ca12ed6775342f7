//! Pairing generator: match formats, candidate enumeration, and the randomized greedy
//! pairing of a single record group.

use crate::logic::records::{get_played_opponents, group_teams_by_record};
use crate::models::{Match, MatchFormat, Record, RecordedTeam, Team};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// Format for a match drawn in `round` from bracket `group`.
///
/// Rounds 1-2 are Bo1. Round 3 is Bo3 only for the 2-0 and 0-2 brackets (the matches that
/// decide qualification or elimination). Rounds 4 and 5 are always Bo3.
pub fn get_match_format(round: u32, group: Record) -> MatchFormat {
    match round {
        0..=2 => MatchFormat::Bo1,
        3 if group == Record::new(2, 0) || group == Record::new(0, 2) => MatchFormat::Bo3,
        3 => MatchFormat::Bo1,
        _ => MatchFormat::Bo3,
    }
}

pub fn is_same_region(a: &Team, b: &Team) -> bool {
    a.region == b.region
}

/// Every unordered pair of active, not-yet-met teams inside each record group, as pending
/// matches for `round`. Only matches from earlier rounds count as history.
pub fn generate_possible_matches(teams: &[Team], matches: &[Match], round: u32) -> Vec<Match> {
    let history = history_before(matches, round);
    let groups = group_teams_by_record(teams, &history);
    let mut possible = Vec::new();

    for (record, group) in &groups {
        let active: Vec<&RecordedTeam> = group.iter().filter(|t| t.is_active()).collect();
        if active.len() < 2 {
            continue;
        }
        for (i, a) in active.iter().enumerate() {
            let played = get_played_opponents(a.name(), &history);
            for b in &active[i + 1..] {
                if !played.contains(b.name()) {
                    possible.push(Match::new(
                        round,
                        *record,
                        a.name(),
                        b.name(),
                        get_match_format(round, *record),
                    ));
                }
            }
        }
    }
    possible
}

/// Active teams in `group` that `team` could face in `round`: not itself, not already played.
pub fn get_possible_opponents(
    team: &str,
    group: Record,
    teams: &[Team],
    matches: &[Match],
    round: u32,
) -> Vec<RecordedTeam> {
    let history = history_before(matches, round);
    let played = get_played_opponents(team, &history);
    let mut groups = group_teams_by_record(teams, &history);
    groups
        .remove(&group)
        .unwrap_or_default()
        .into_iter()
        .filter(|t| t.name() != team && t.is_active() && !played.contains(t.name()))
        .collect()
}

/// True if `a` and `b` have never met and neither is already scheduled in the round being built.
pub fn is_valid_matchup(a: &str, b: &str, matches: &[Match], current_round_matches: &[Match]) -> bool {
    if get_played_opponents(a, matches).contains(b) {
        return false;
    }
    !current_round_matches
        .iter()
        .any(|m| m.involves(a) || m.involves(b))
}

/// Randomly pair one record group.
///
/// 1. Shuffle the group.
/// 2. Take the first remaining team and pick a random opponent it has not played.
/// 3. If every remaining team has been played, pick any remaining team (forced rematch).
/// 4. A single leftover team stays unpaired.
pub fn pair_group<R: Rng + ?Sized>(
    group: &[RecordedTeam],
    history: &[Match],
    rng: &mut R,
) -> Vec<(String, String)> {
    let mut pool: Vec<(&str, BTreeSet<String>)> = group
        .iter()
        .map(|t| (t.name(), get_played_opponents(t.name(), history)))
        .collect();
    pool.shuffle(rng);

    let mut pairs = Vec::with_capacity(pool.len() / 2);
    while pool.len() >= 2 {
        let (team_a, played) = pool.remove(0);
        let unplayed: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, (name, _))| !played.contains(*name))
            .map(|(i, _)| i)
            .collect();

        let index = match unplayed.choose(rng) {
            Some(&i) => i,
            None => {
                let i = rng.gen_range(0..pool.len());
                log::warn!(
                    "No unplayed opponent left for {}; forcing rematch with {}",
                    team_a,
                    pool[i].0
                );
                i
            }
        };
        let (team_b, _) = pool.remove(index);
        pairs.push((team_a.to_string(), team_b.to_string()));
    }

    if let Some((leftover, _)) = pool.first() {
        log::debug!("Odd-sized group: {} left unpaired", leftover);
    }
    pairs
}

fn history_before(matches: &[Match], round: u32) -> Vec<Match> {
    matches.iter().filter(|m| m.round < round).cloned().collect()
}
