//! Draw simulator: next-round detection, draw-state validation, and randomized round draws.

use crate::logic::pairing::{get_match_format, pair_group};
use crate::logic::records::{
    decided_matches, decided_matches_before, get_team_record, group_teams_by_record,
};
use crate::models::{Match, RecordedTeam, SwissError, Team};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Rounds in a Swiss stage.
pub const TOTAL_ROUNDS: u32 = 5;
/// 16 teams give 8 pairings per round.
pub const MATCHES_PER_ROUND: usize = 8;
/// Returned by [`get_next_draw_round`] once all five rounds are complete.
pub const TOURNAMENT_FINISHED: u32 = TOTAL_ROUNDS + 1;

/// Outcome of [`validate_draw_state`]. Invalid state is expected while results are still
/// being entered, so it is reported here rather than as an error.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawValidation {
    pub is_valid: bool,
    pub next_round: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Pairings drawn for one round; every match is pending.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DrawResult {
    pub matches: Vec<Match>,
}

/// First round with fewer decided matches than it needs, or [`TOURNAMENT_FINISHED`] when
/// every round is complete. Only decided matches with real entrants count.
pub fn get_next_draw_round(teams: &[Team], matches: &[Match]) -> u32 {
    let decided = decided_matches(matches);
    (1..=TOTAL_ROUNDS)
        .find(|&round| {
            let completed = decided.iter().filter(|m| m.round == round).count();
            completed < expected_matches_for_round(teams, &decided, round)
        })
        .unwrap_or(TOURNAMENT_FINISHED)
}

/// Pairings a complete round holds: one per two teams still active when it is drawn.
/// With 16 teams this is [`MATCHES_PER_ROUND`] for rounds 1-3, then 6 and 3 once teams
/// start qualifying and dropping out.
pub fn expected_matches_for_round(teams: &[Team], matches: &[Match], round: u32) -> usize {
    let history = decided_matches_before(matches, round);
    teams
        .iter()
        .filter(|t| get_team_record(&t.name, &history).is_active())
        .count()
        / 2
}

/// Check that every match before the next draw round is decided.
pub fn validate_draw_state(teams: &[Team], matches: &[Match]) -> DrawValidation {
    let next_round = get_next_draw_round(teams, matches);
    let undecided = matches
        .iter()
        .filter(|m| m.round < next_round)
        .find(|m| !m.is_decided());

    match undecided {
        Some(m) => DrawValidation {
            is_valid: false,
            next_round,
            error: Some(format!(
                "Round {} has an undecided match ({} vs {}); cannot simulate the draw",
                m.round, m.team_a, m.team_b
            )),
        },
        None => DrawValidation {
            is_valid: true,
            next_round,
            error: None,
        },
    }
}

/// Draw one round (> 1): each record group is shuffled and paired independently.
/// Qualified and eliminated teams are left out; groups with fewer than two active teams
/// produce no matches.
pub fn simulate_round_draw<R: Rng + ?Sized>(
    teams: &[Team],
    previous_matches: &[Match],
    round: u32,
    rng: &mut R,
) -> Vec<Match> {
    let groups = group_teams_by_record(teams, previous_matches);
    let mut matches = Vec::with_capacity(MATCHES_PER_ROUND);

    for (record, group) in groups {
        let active: Vec<RecordedTeam> = group.into_iter().filter(|t| t.is_active()).collect();
        if active.len() < 2 {
            continue;
        }
        let format = get_match_format(round, record);
        for (team_a, team_b) in pair_group(&active, previous_matches, rng) {
            matches.push(Match::new(round, record, team_a, team_b, format));
        }
    }
    matches
}

/// Round 1 depends on seeding pools the engine does not model, so it always fails.
pub fn simulate_first_round_draw(_teams: &[Team]) -> Result<Vec<Match>, SwissError> {
    Err(SwissError::FirstRoundUnsupported)
}

/// Err unless every earlier round is complete and decided, so `round` can be drawn now.
/// Rounds before the next draw round may be redrawn.
pub fn ensure_round_ready(teams: &[Team], matches: &[Match], round: u32) -> Result<(), SwissError> {
    let state = validate_draw_state(teams, matches);
    if let Some(error) = state.error {
        return Err(SwissError::UndecidedEarlierMatch(error));
    }
    if round > state.next_round {
        return Err(SwissError::RoundNotReady {
            round,
            next_round: state.next_round,
        });
    }
    Ok(())
}

/// Err unless `round` is a round the engine can draw from `matches` right now.
pub fn check_draw_round(teams: &[Team], matches: &[Match], round: u32) -> Result<(), SwissError> {
    match round {
        1 => simulate_first_round_draw(teams).map(|_| ()),
        2..=TOTAL_ROUNDS => ensure_round_ready(teams, matches, round),
        _ => Err(SwissError::InvalidRound(round)),
    }
}

/// Draw `target_round` from the decided matches of earlier rounds. Fails while an earlier
/// round is still incomplete or undecided.
pub fn simulate_draw_for_round<R: Rng + ?Sized>(
    teams: &[Team],
    all_matches: &[Match],
    target_round: u32,
    rng: &mut R,
) -> Result<DrawResult, SwissError> {
    check_draw_round(teams, all_matches, target_round)?;
    Ok(draw_checked_round(teams, all_matches, target_round, rng))
}

/// Draw a round that [`check_draw_round`] already accepted.
pub(crate) fn draw_checked_round<R: Rng + ?Sized>(
    teams: &[Team],
    all_matches: &[Match],
    target_round: u32,
    rng: &mut R,
) -> DrawResult {
    let history = decided_matches_before(all_matches, target_round);
    DrawResult {
        matches: simulate_round_draw(teams, &history, target_round, rng),
    }
}
