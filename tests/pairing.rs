//! Integration tests for the pairing generator.

mod common;

use common::{decided, played_through, rng, round_one, sixteen_teams};
use swiss_stage_odds::logic::{is_same_region, pair_group};
use swiss_stage_odds::{
    generate_possible_matches, get_match_format, get_possible_opponents, group_teams_by_record,
    is_valid_matchup, Match, MatchFormat, Record, Team,
};

#[test]
fn match_format_table() {
    assert_eq!(get_match_format(1, Record::new(0, 0)), MatchFormat::Bo1);
    assert_eq!(get_match_format(2, Record::new(1, 0)), MatchFormat::Bo1);
    assert_eq!(get_match_format(3, Record::new(2, 0)), MatchFormat::Bo3);
    assert_eq!(get_match_format(3, Record::new(0, 2)), MatchFormat::Bo3);
    assert_eq!(get_match_format(3, Record::new(1, 1)), MatchFormat::Bo1);
    assert_eq!(get_match_format(4, Record::new(2, 1)), MatchFormat::Bo3);
    assert_eq!(get_match_format(5, Record::new(2, 2)), MatchFormat::Bo3);
}

#[test]
fn possible_matches_after_round_one() {
    let teams = sixteen_teams();
    let matches = round_one(&teams);
    let possible = generate_possible_matches(&teams, &matches, 2);

    // Nobody in either 8-team group has met: C(8,2) pairs per group.
    assert_eq!(possible.len(), 56);
    assert!(possible.iter().all(|m| m.round == 2
        && m.format == MatchFormat::Bo1
        && m.winner.is_none()));
    assert_eq!(
        possible.iter().filter(|m| m.group == Record::new(1, 0)).count(),
        28
    );
    assert!(!possible.iter().any(|m| m.is_between("T01", "T02")));
}

#[test]
fn possible_matches_skip_played_pairs_and_finished_teams() {
    let teams = vec![
        Team::new("A", "LPL"),
        Team::new("B", "LCK"),
        Team::new("C", "LEC"),
        Team::new("D", "LTA"),
    ];
    let matches = vec![
        decided(1, "0-0", "A", "B", "A"),
        decided(1, "0-0", "C", "D", "C"),
        decided(2, "1-0", "A", "C", "A"),
        decided(2, "0-1", "B", "D", "B"),
    ];
    // 1-1 group: B and C, who have not met.
    let possible = generate_possible_matches(&teams, &matches, 3);
    assert_eq!(possible.len(), 1);
    assert!(possible[0].is_between("B", "C"));
    assert_eq!(possible[0].group, Record::new(1, 1));
    assert_eq!(possible[0].format, MatchFormat::Bo1);

    let with_qualified = vec![
        decided(1, "0-0", "A", "B", "A"),
        decided(2, "1-0", "A", "C", "A"),
        decided(3, "2-0", "A", "D", "A"),
    ];
    let possible = generate_possible_matches(&teams, &with_qualified, 4);
    assert!(possible.iter().all(|m| !m.involves("A")));
}

#[test]
fn possible_opponents_exclude_self_and_played() {
    let teams = sixteen_teams();
    let matches = played_through(&teams, 2, 7);
    let groups = group_teams_by_record(&teams, &matches);
    let (record, group) = groups
        .iter()
        .find(|(r, _)| **r == Record::new(1, 1))
        .unwrap();
    let team = group[0].name();

    let opponents = get_possible_opponents(team, *record, &teams, &matches, 3);
    let played: Vec<&str> = matches.iter().filter_map(|m| m.opponent_of(team)).collect();
    assert!(opponents.iter().all(|o| o.name() != team));
    assert!(opponents.iter().all(|o| !played.contains(&o.name())));
    assert!(opponents.iter().all(|o| o.record == Record::new(1, 1)));
    assert!(opponents.len() >= 5 && opponents.len() <= 7);

    assert!(get_possible_opponents(team, Record::new(3, 0), &teams, &matches, 3).is_empty());
}

#[test]
fn valid_matchup_checks_history_and_schedule() {
    let history = vec![decided(1, "0-0", "A", "B", "A")];
    assert!(!is_valid_matchup("A", "B", &history, &[]));
    assert!(!is_valid_matchup("B", "A", &history, &[]));
    assert!(is_valid_matchup("A", "C", &history, &[]));

    let scheduled = vec![Match::new(2, Record::new(1, 0), "C", "D", MatchFormat::Bo1)];
    assert!(!is_valid_matchup("A", "C", &history, &scheduled));
    assert!(is_valid_matchup("A", "E", &history, &scheduled));
}

#[test]
fn region_comparison() {
    assert!(is_same_region(&Team::new("A", "LPL"), &Team::with_zone("B", "LPL", "CN")));
    assert!(!is_same_region(&Team::new("A", "LPL"), &Team::new("C", "LCK")));
    // Zone is bookkeeping only and defaults to the region.
    assert_eq!(Team::new("A", "LPL").zone(), "LPL");
    assert_eq!(Team::with_zone("B", "LPL", "CN").zone(), "CN");

    let parsed: Team = serde_json::from_str(r#"{"name": "C", "region": "LEC"}"#).unwrap();
    assert_eq!(parsed, Team::new("C", "LEC"));
    assert!(!serde_json::to_string(&parsed).unwrap().contains("zone"));
}

#[test]
fn group_pairing_avoids_rematches_when_possible() {
    let teams = vec![
        Team::new("A", "LPL"),
        Team::new("B", "LCK"),
        Team::new("C", "LEC"),
        Team::new("D", "LTA"),
    ];
    let history = vec![
        decided(1, "0-0", "A", "B", "A"),
        decided(1, "0-0", "C", "D", "C"),
    ];
    let group: Vec<_> = group_teams_by_record(&teams, &[]).into_values().next().unwrap();

    for seed in 0..50 {
        let pairs = pair_group(&group, &history, &mut rng(seed));
        assert_eq!(pairs.len(), 2);
        for (a, b) in &pairs {
            assert!(is_valid_matchup(a, b, &history, &[]), "seed {seed}: {a} vs {b}");
        }
    }
}

#[test]
fn group_pairing_forces_rematch_rather_than_leaving_team_out() {
    let teams = vec![Team::new("A", "LPL"), Team::new("B", "LCK")];
    let history = vec![decided(1, "0-0", "A", "B", "A")];
    let group: Vec<_> = group_teams_by_record(&teams, &[]).into_values().next().unwrap();

    let pairs = pair_group(&group, &history, &mut rng(1));
    assert_eq!(pairs.len(), 1);
}

#[test]
fn odd_group_leaves_one_team_unpaired() {
    let teams = vec![
        Team::new("A", "LPL"),
        Team::new("B", "LCK"),
        Team::new("C", "LEC"),
    ];
    let group: Vec<_> = group_teams_by_record(&teams, &[]).into_values().next().unwrap();

    let pairs = pair_group(&group, &[], &mut rng(3));
    assert_eq!(pairs.len(), 1);
    let (a, b) = &pairs[0];
    assert_ne!(a, b);
}
