//! Shared fixtures: a 16-team field and helpers that play rounds deterministically.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use swiss_stage_odds::{get_match_format, simulate_round_draw, Match, Record, Team};

pub const REGIONS: [&str; 4] = ["LPL", "LCK", "LEC", "LTA"];

/// T01..T16 with regions cycling LPL, LCK, LEC, LTA.
pub fn sixteen_teams() -> Vec<Team> {
    (0..16)
        .map(|i| Team::new(format!("T{:02}", i + 1), REGIONS[i % REGIONS.len()]))
        .collect()
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A decided match; the group label is informational.
pub fn decided(round: u32, group: &str, a: &str, b: &str, winner: &str) -> Match {
    let group: Record = group.parse().unwrap();
    Match::new(round, group, a, b, get_match_format(round, group)).decided(winner)
}

/// Round 1 as T01-T02, T03-T04, ... with the first team of each pair winning.
pub fn round_one(teams: &[Team]) -> Vec<Match> {
    teams
        .chunks_exact(2)
        .map(|pair| decided(1, "0-0", &pair[0].name, &pair[1].name, &pair[0].name))
        .collect()
}

/// Draw `round` with the engine and let team A win every match.
pub fn play_round(teams: &[Team], history: &[Match], round: u32, rng: &mut StdRng) -> Vec<Match> {
    simulate_round_draw(teams, history, round, rng)
        .into_iter()
        .map(|m| {
            let winner = m.team_a.clone();
            m.decided(winner)
        })
        .collect()
}

/// Round 1 plus rounds 2..=`last_round`, all decided.
pub fn played_through(teams: &[Team], last_round: u32, seed: u64) -> Vec<Match> {
    let mut rng = rng(seed);
    let mut matches = round_one(teams);
    for round in 2..=last_round {
        let next = play_round(teams, &matches, round, &mut rng);
        matches.extend(next);
    }
    matches
}
