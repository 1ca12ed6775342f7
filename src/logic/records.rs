//! Record engine: records, status, opponent history, and record groups, all derived
//! from the match list on every call.

use crate::models::{Match, Record, RecordedTeam, StatusReport, Team, TeamStatus};
use std::collections::{BTreeMap, BTreeSet};

/// Record groups keyed by record, iterated in (wins, losses) order.
pub type RecordGroups = BTreeMap<Record, Vec<RecordedTeam>>;

/// Count a team's wins and losses. Pending matches and matches with a TBD entrant are ignored.
pub fn get_team_record(team: &str, matches: &[Match]) -> Record {
    let mut record = Record::default();
    for m in matches.iter().filter(|m| m.is_decided() && m.involves(team)) {
        match m.winner.as_deref() {
            Some(w) if w == team => record.wins += 1,
            Some(_) => record.losses += 1,
            None => {}
        }
    }
    record
}

/// Status for a record, with a reason echoing the record and outcome.
pub fn get_team_status(record: &Record) -> StatusReport {
    let status = record.status();
    let reason = match status {
        TeamStatus::Qualified => format!("{} qualified", record),
        TeamStatus::Eliminated => format!("{} eliminated", record),
        TeamStatus::Active => String::new(),
    };
    StatusReport { status, reason }
}

/// Every opponent the team has been drawn against, as a set. TBD placeholders are skipped.
pub fn get_played_opponents(team: &str, matches: &[Match]) -> BTreeSet<String> {
    matches
        .iter()
        .filter(|m| !m.has_tbd())
        .filter_map(|m| m.opponent_of(team))
        .map(str::to_string)
        .collect()
}

/// Partition teams by current record. Within a group, teams keep their input order.
pub fn group_teams_by_record(teams: &[Team], matches: &[Match]) -> RecordGroups {
    let mut groups = RecordGroups::new();
    for team in teams {
        let record = get_team_record(&team.name, matches);
        groups.entry(record).or_default().push(RecordedTeam {
            team: team.clone(),
            record,
        });
    }
    groups
}

/// Matches with a winner and two real entrants.
pub fn decided_matches(matches: &[Match]) -> Vec<Match> {
    matches.iter().filter(|m| m.is_decided()).cloned().collect()
}

/// Decided matches from rounds strictly before `round`.
pub fn decided_matches_before(matches: &[Match], round: u32) -> Vec<Match> {
    matches
        .iter()
        .filter(|m| m.round < round && m.is_decided())
        .cloned()
        .collect()
}
