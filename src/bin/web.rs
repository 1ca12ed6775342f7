//! Single binary web server: stateless JSON API over the Swiss stage engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, MONTE_CARLO_VALIDATION_ENABLED, MONTE_CARLO_VALIDATION_SIMULATIONS.
//!
//! Every request carries the full team and match lists; nothing is stored between requests.

use actix_web::{
    error::BlockingError,
    get, post,
    web::{self, Data, Json},
    App, HttpResponse, HttpServer, Responder,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use swiss_stage_odds::logic::{DEFAULT_DRAW_SIMULATIONS, DEFAULT_SIMULATIONS};
use swiss_stage_odds::{
    calculate_conditional_probabilities, calculate_meeting_probability,
    calculate_meeting_probability_exact, calculate_qualification_probability, ensure_round_ready,
    get_next_draw_round, opponent_report, simulate_draw_for_round, validate_draw_state,
    DrawPolicy, Match, SwissError, Team, ValidationConfig, WinProbabilities,
};

/// Upper bound on trials per request.
const MAX_SIMULATIONS: usize = 100_000;

/// Settings shared by every handler, read once at startup.
struct AppConfig {
    validation: ValidationConfig,
    policy: DrawPolicy,
}

type AppState = Data<AppConfig>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct StageBody {
    teams: Vec<Team>,
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Deserialize)]
struct DrawBody {
    teams: Vec<Team>,
    #[serde(default)]
    matches: Vec<Match>,
    /// Defaults to the next round needing a draw.
    round: Option<u32>,
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct OpponentsBody {
    teams: Vec<Team>,
    #[serde(default)]
    matches: Vec<Match>,
    team: String,
    round: Option<u32>,
    /// Overrides the server's draw policy for this request.
    policy: Option<DrawPolicy>,
    seed: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeetingBody {
    teams: Vec<Team>,
    #[serde(default)]
    matches: Vec<Match>,
    team_a: String,
    team_b: String,
    round: Option<u32>,
    simulations: Option<usize>,
    seed: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MeetingResponse {
    round: u32,
    closed_form: f64,
    monte_carlo: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QualificationBody {
    teams: Vec<Team>,
    #[serde(default)]
    matches: Vec<Match>,
    simulations: Option<usize>,
    #[serde(default)]
    win_probabilities: WinProbabilities,
    /// Extra decided results to assume before simulating ("what if" queries).
    #[serde(default)]
    hypothetical_matches: Vec<Match>,
    seed: Option<u64>,
}

/// Seeded when the caller wants a reproducible run, otherwise from OS entropy.
fn request_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn bad_request(message: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message.to_string() }))
}

/// Results of engine work run on the blocking pool.
fn engine_response<T: Serialize>(
    result: Result<Result<T, SwissError>, BlockingError>,
) -> HttpResponse {
    match result {
        Ok(Ok(value)) => HttpResponse::Ok().json(value),
        Ok(Err(e)) => bad_request(e),
        Err(e) => {
            log::error!("Simulation worker failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

/// Refuse rounds that cannot be drawn yet: earlier rounds must be complete and decided.
fn check_round(teams: &[Team], matches: &[Match], round: u32) -> Result<(), HttpResponse> {
    ensure_round_ready(teams, matches, round).map_err(bad_request)
}

fn check_simulations(simulations: usize) -> Result<usize, HttpResponse> {
    if simulations > MAX_SIMULATIONS {
        return Err(bad_request(format!(
            "At most {} simulations per request",
            MAX_SIMULATIONS
        )));
    }
    Ok(simulations)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-stage-odds",
    })
}

/// Which round is next and whether it can be drawn yet.
#[post("/api/draw/state")]
async fn api_draw_state(body: Json<StageBody>) -> HttpResponse {
    HttpResponse::Ok().json(validate_draw_state(&body.teams, &body.matches))
}

/// Simulate one draw of the requested (or next) round. Refused while an earlier round is
/// incomplete or undecided.
#[post("/api/draw/simulate")]
async fn api_draw_simulate(body: Json<DrawBody>) -> HttpResponse {
    let round = body.round.unwrap_or_else(|| get_next_draw_round(&body.teams, &body.matches));
    let mut rng = request_rng(body.seed);
    match simulate_draw_for_round(&body.teams, &body.matches, round, &mut rng) {
        Ok(draw) => HttpResponse::Ok().json(draw),
        Err(e) => bad_request(e),
    }
}

/// Analytic opponent distribution, cross-checked by simulation when validation is enabled.
#[post("/api/probabilities/opponents")]
async fn api_opponents(state: AppState, body: Json<OpponentsBody>) -> HttpResponse {
    let body = body.into_inner();
    let round = body.round.unwrap_or_else(|| get_next_draw_round(&body.teams, &body.matches));
    if let Err(resp) = check_round(&body.teams, &body.matches, round) {
        return resp;
    }
    let policy = body.policy.unwrap_or(state.policy);
    let validation = state.validation;
    let result = web::block(move || {
        let mut rng = request_rng(body.seed);
        opponent_report(
            &body.team,
            &body.teams,
            &body.matches,
            round,
            &policy,
            &validation,
            &mut rng,
        )
    })
    .await;
    engine_response(result)
}

/// Chance two teams meet in a round, by both estimators.
#[post("/api/probabilities/meeting")]
async fn api_meeting(body: Json<MeetingBody>) -> HttpResponse {
    let body = body.into_inner();
    let round = body.round.unwrap_or_else(|| get_next_draw_round(&body.teams, &body.matches));
    if let Err(resp) = check_round(&body.teams, &body.matches, round) {
        return resp;
    }
    let simulations = match check_simulations(body.simulations.unwrap_or(DEFAULT_DRAW_SIMULATIONS))
    {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    let result = web::block(move || {
        let closed_form = calculate_meeting_probability_exact(
            &body.team_a,
            &body.team_b,
            &body.teams,
            &body.matches,
            round,
        );
        let mut rng = request_rng(body.seed);
        calculate_meeting_probability(
            &body.team_a,
            &body.team_b,
            &body.teams,
            &body.matches,
            round,
            simulations,
            &mut rng,
        )
        .map(|monte_carlo| MeetingResponse {
            round,
            closed_form,
            monte_carlo,
        })
    })
    .await;
    engine_response(result)
}

/// Monte Carlo qualification odds, optionally conditioned on hypothetical results.
#[post("/api/probabilities/qualification")]
async fn api_qualification(body: Json<QualificationBody>) -> HttpResponse {
    let body = body.into_inner();
    let simulations = match check_simulations(body.simulations.unwrap_or(DEFAULT_SIMULATIONS)) {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    let result = web::block(move || {
        let mut rng = request_rng(body.seed);
        calculate_conditional_probabilities(
            &body.teams,
            &body.matches,
            &body.hypothetical_matches,
            simulations,
            &body.win_probabilities,
            &mut rng,
        )
    })
    .await;
    engine_response(result)
}

/// Closed-form qualification odds for every team.
#[post("/api/probabilities/closed-form")]
async fn api_closed_form(body: Json<StageBody>) -> HttpResponse {
    let odds: Vec<_> = body
        .teams
        .iter()
        .map(|t| calculate_qualification_probability(&t.name, &body.matches))
        .collect();
    HttpResponse::Ok().json(odds)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let validation = ValidationConfig::from_env();
    log::info!(
        "Monte Carlo validation {} ({} simulations)",
        if validation.enabled { "enabled" } else { "disabled" },
        validation.simulations
    );

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppConfig {
        validation,
        policy: DrawPolicy::default(),
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_draw_state)
            .service(api_draw_simulate)
            .service(api_opponents)
            .service(api_meeting)
            .service(api_qualification)
            .service(api_closed_form)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use swiss_stage_odds::{MatchFormat, Record};

    /// Sixteen teams with round 1 played, the first team of each pair winning.
    fn round_one_field() -> (Vec<Team>, Vec<Match>) {
        let regions = ["LPL", "LCK", "LEC", "LTA"];
        let teams: Vec<Team> = (0..16)
            .map(|i: usize| Team::new(format!("T{:02}", i + 1), regions[i % regions.len()]))
            .collect();
        let matches = teams
            .chunks_exact(2)
            .map(|pair| {
                Match::new(1, Record::new(0, 0), &pair[0].name, &pair[1].name, MatchFormat::Bo1)
                    .decided(&pair[0].name)
            })
            .collect();
        (teams, matches)
    }

    fn app_state() -> AppState {
        Data::new(AppConfig {
            validation: ValidationConfig::default(),
            policy: DrawPolicy::default(),
        })
    }

    #[actix_web::test]
    async fn draw_refused_while_round_one_is_open() {
        let app = test::init_service(
            App::new()
                .app_data(app_state())
                .service(api_draw_simulate)
                .service(api_meeting)
                .service(api_opponents),
        )
        .await;
        let (teams, mut matches) = round_one_field();
        matches[0].winner = None;

        for uri in [
            "/api/draw/simulate",
            "/api/probabilities/meeting",
            "/api/probabilities/opponents",
        ] {
            let req = test::TestRequest::post()
                .uri(uri)
                .set_json(serde_json::json!({
                    "teams": teams,
                    "matches": matches,
                    "round": 2,
                    "team": "T03",
                    "teamA": "T03",
                    "teamB": "T05",
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn meeting_runs_both_estimators() {
        let app = test::init_service(App::new().app_data(app_state()).service(api_meeting)).await;
        let (teams, matches) = round_one_field();

        let req = test::TestRequest::post()
            .uri("/api/probabilities/meeting")
            .set_json(serde_json::json!({
                "teams": teams,
                "matches": matches,
                "teamA": "T01",
                "teamB": "T03",
                "simulations": 200,
                "seed": 3,
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["round"], 2);
        let closed_form = body["closedForm"].as_f64().unwrap_or_default();
        assert!((closed_form - 1.0 / 7.0).abs() < 1e-9);
        assert!(body["monteCarlo"].is_number());
    }

    #[actix_web::test]
    async fn qualification_reports_every_team() {
        let app =
            test::init_service(App::new().app_data(app_state()).service(api_qualification)).await;
        let (teams, matches) = round_one_field();

        let req = test::TestRequest::post()
            .uri("/api/probabilities/qualification")
            .set_json(serde_json::json!({
                "teams": teams,
                "matches": matches,
                "simulations": 200,
                "seed": 5,
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["simulations"], 200);
        assert_eq!(body["teams"].as_array().map(Vec::len), Some(16));
    }

    #[actix_web::test]
    async fn too_many_simulations_is_a_bad_request() {
        let app =
            test::init_service(App::new().app_data(app_state()).service(api_qualification)).await;
        let (teams, matches) = round_one_field();

        let req = test::TestRequest::post()
            .uri("/api/probabilities/qualification")
            .set_json(serde_json::json!({
                "teams": teams,
                "matches": matches,
                "simulations": MAX_SIMULATIONS + 1,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
