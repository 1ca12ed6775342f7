//! Integration tests for the record engine: records, status, opponents, grouping.

mod common;

use common::{decided, round_one, sixteen_teams};
use swiss_stage_odds::logic::decided_matches_before;
use swiss_stage_odds::{
    get_next_draw_round, get_played_opponents, get_team_record, get_team_status,
    group_teams_by_record, Match, MatchFormat, Record, TeamStatus, TBD,
};

#[test]
fn record_counts_decided_matches_only() {
    let matches = vec![
        decided(1, "0-0", "A", "B", "A"),
        decided(2, "1-0", "C", "A", "C"),
        Match::new(3, Record::new(1, 1), "A", "D", MatchFormat::Bo1),
        Match::new(3, Record::new(1, 1), "A", TBD, MatchFormat::Bo1).decided("A"),
    ];
    let record = get_team_record("A", &matches);
    assert_eq!(record, Record::new(1, 1));
    assert_eq!(record.to_string(), "1-1");
    assert_eq!(get_team_record("B", &matches), Record::new(0, 1));
    assert_eq!(get_team_record("Z", &matches), Record::new(0, 0));
}

#[test]
fn status_thresholds_are_exclusive() {
    for wins in 0..=3 {
        for losses in 0..=3 {
            if wins + losses > 5 {
                continue;
            }
            let report = get_team_status(&Record::new(wins, losses));
            let expected = if wins >= 3 {
                TeamStatus::Qualified
            } else if losses >= 3 {
                TeamStatus::Eliminated
            } else {
                TeamStatus::Active
            };
            assert_eq!(report.status, expected, "{}-{}", wins, losses);
        }
    }
}

#[test]
fn status_reason_echoes_record() {
    assert_eq!(get_team_status(&Record::new(3, 1)).reason, "3-1 qualified");
    assert_eq!(get_team_status(&Record::new(2, 3)).reason, "2-3 eliminated");
    assert!(get_team_status(&Record::new(2, 2)).reason.is_empty());
}

#[test]
fn played_opponents_is_a_set() {
    // Corrupted input: A and B listed twice.
    let matches = vec![
        decided(1, "0-0", "A", "B", "A"),
        decided(2, "1-0", "B", "A", "B"),
        decided(3, "1-1", "A", "C", "A"),
        Match::new(4, Record::new(2, 1), "A", TBD, MatchFormat::Bo3),
    ];
    let played = get_played_opponents("A", &matches);
    assert_eq!(played.len(), 2);
    assert!(played.contains("B"));
    assert!(played.contains("C"));
    assert!(!played.contains(TBD));
}

#[test]
fn fresh_field_is_one_group_and_round_one_is_next() {
    let teams = sixteen_teams();
    let groups = group_teams_by_record(&teams, &[]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[&Record::new(0, 0)].len(), 16);
    assert_eq!(get_next_draw_round(&teams, &[]), 1);
}

#[test]
fn groups_after_round_one_keep_team_order() {
    let teams = sixteen_teams();
    let matches = round_one(&teams);
    let groups = group_teams_by_record(&teams, &matches);
    assert_eq!(groups.len(), 2);

    let winners: Vec<&str> = groups[&Record::new(1, 0)].iter().map(|t| t.name()).collect();
    assert_eq!(
        winners,
        ["T01", "T03", "T05", "T07", "T09", "T11", "T13", "T15"]
    );
    assert!(groups[&Record::new(0, 1)]
        .iter()
        .all(|t| t.record == Record::new(0, 1)));
    assert_eq!(get_next_draw_round(&teams, &matches), 2);
}

#[test]
fn decided_before_filters_round_and_pending() {
    let matches = vec![
        decided(1, "0-0", "A", "B", "A"),
        Match::new(1, Record::new(0, 0), "C", "D", MatchFormat::Bo1),
        decided(2, "1-0", "A", "E", "E"),
    ];
    let before = decided_matches_before(&matches, 2);
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].team_b, "B");
}
