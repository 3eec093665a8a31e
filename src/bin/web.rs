//! Single binary web server: JSON API for tournaments, teams, results and standings.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), MIN_CONFIDENCE (e.g. 0.5).

use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use br_tournament_web::{
    complete_match, compute_standings, create_match, draw_tournament_groups,
    record_match_results, resolve_extracted, standings_to_csv, CsvResultSource, GameMode,
    GroupConfig, MatchId, PrizePolicy, ResultEntry, ResultSource, Schedule, ScoringRule, ScoringTable,
    Standing, Team, TeamId, Tournament, TournamentError, TournamentFormat, TournamentId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory store: tournaments and the teams they reference.
#[derive(Default)]
struct Store {
    tournaments: HashMap<TournamentId, Tournament>,
    teams: HashMap<TeamId, Team>,
}

impl Store {
    /// Teams registered in `tournament`, in sign-up order.
    fn registered_teams(&self, tournament: &Tournament) -> Vec<Team> {
        tournament
            .registered_teams
            .iter()
            .filter_map(|id| self.teams.get(id).cloned())
            .collect()
    }
}

type AppState = Data<RwLock<Store>>;

/// Pluggable result extraction used by the import endpoint.
struct Importer {
    source: Arc<dyn ResultSource + Send + Sync>,
    min_confidence: f64,
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTeamBody {
    name: String,
    tag: String,
    players: Vec<String>,
    #[serde(default)]
    captain: String,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_max_teams")]
    max_teams: u32,
    #[serde(default = "default_group_count")]
    group_count: u32,
    #[serde(default)]
    prize_pool: f64,
    #[serde(default)]
    prize_shares: Option<PrizePolicy>,
    #[serde(default)]
    scoring_rules: Option<ScoringTable>,
    #[serde(default)]
    schedule: Schedule,
    #[serde(default, rename = "type")]
    format: TournamentFormat,
    #[serde(default = "default_duration_days")]
    duration_days: u32,
    #[serde(default)]
    game_mode: GameMode,
    #[serde(default)]
    map_rotation: Option<Vec<String>>,
    #[serde(default)]
    entry_fee: f64,
    #[serde(default = "default_true")]
    is_public: bool,
    #[serde(default = "default_true")]
    allow_spectators: bool,
}

fn default_duration_days() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_max_teams() -> u32 {
    25
}

fn default_group_count() -> u32 {
    1
}

#[derive(Deserialize)]
struct GroupsBody {
    max_teams: u32,
    group_count: u32,
}

#[derive(Deserialize)]
struct PrizeBody {
    prize_pool: f64,
    #[serde(default)]
    prize_shares: Option<PrizePolicy>,
}

#[derive(Deserialize)]
struct RegisterTeamBody {
    team_id: TeamId,
}

#[derive(Deserialize)]
struct ResultsBody {
    results: Vec<ResultEntry>,
}

#[derive(Serialize)]
struct MatchCreated<'a> {
    match_id: MatchId,
    tournament: &'a Tournament,
}

/// Standing with the team's display name attached.
#[derive(Serialize)]
struct StandingView {
    #[serde(flatten)]
    standing: Standing,
    team_name: String,
    team_tag: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

/// Path segments: tournament id and team id.
#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    team_id: TeamId,
}

/// Path segments: tournament id and scoring position.
#[derive(Deserialize)]
struct TournamentRulePath {
    id: TournamentId,
    position: u32,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::TeamNotFound(_) | TournamentError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Run `op` on one tournament under the write lock and answer with the updated tournament.
fn update_tournament<F>(state: &AppState, id: TournamentId, action: &str, op: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament, &HashMap<TeamId, Team>) -> Result<(), TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let store = &mut *g;
    let t = match store.tournaments.get_mut(&id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    match op(t, &store.teams) {
        Ok(()) => {
            log::info!("Tournament {}: {}", id, action);
            HttpResponse::Ok().json(t)
        }
        Err(e) => {
            log::warn!("Tournament {}: {} rejected: {}", id, action, e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "br-tournament-web",
    })
}

/// List teams by name.
#[get("/api/teams")]
async fn api_list_teams(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut teams: Vec<&Team> = g.teams.values().collect();
    teams.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    HttpResponse::Ok().json(teams)
}

/// Create a team (3 to 5 players).
#[post("/api/teams")]
async fn api_create_team(state: AppState, body: Json<CreateTeamBody>) -> HttpResponse {
    let body = body.into_inner();
    let team = match Team::new(body.name, body.tag, body.players, body.captain) {
        Ok(team) => team,
        Err(e) => return error_response(&e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if g.teams.values().any(|t| t.name.eq_ignore_ascii_case(&team.name)) {
        return error_response(&TournamentError::DuplicateTeam);
    }
    log::info!("Created team {} [{}]", team.name, team.tag);
    let response = HttpResponse::Ok().json(&team);
    g.teams.insert(team.id, team);
    response
}

/// List tournaments, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut tournaments: Vec<&Tournament> = g.tournaments.values().collect();
    tournaments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    HttpResponse::Ok().json(tournaments)
}

/// Create a draft tournament.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let mut body = body.into_inner();
    let groups = match GroupConfig::new(body.max_teams, body.group_count) {
        Ok(groups) => groups,
        Err(e) => return error_response(&e),
    };
    let mut tournament = Tournament::new(body.name.as_str(), groups);
    tournament.description = std::mem::take(&mut body.description);
    if let Some(scoring) = body.scoring_rules.take() {
        tournament.scoring = scoring;
    }
    let prize_shares = body.prize_shares.take();
    if let Err(e) = configure_prize_and_schedule(&mut tournament, body.prize_pool, prize_shares, body.schedule)
        .and_then(|()| configure_play(&mut tournament, &body))
    {
        return error_response(&e);
    }

    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    log::info!("Created tournament {} ({})", tournament.name, tournament.id);
    let response = HttpResponse::Ok().json(&tournament);
    g.tournaments.insert(tournament.id, tournament);
    response
}

fn configure_prize_and_schedule(
    tournament: &mut Tournament,
    prize_pool: f64,
    prize_shares: Option<PrizePolicy>,
    schedule: Schedule,
) -> Result<(), TournamentError> {
    tournament.set_prize_pool(prize_pool)?;
    if let Some(policy) = prize_shares {
        tournament.set_prize_policy(policy)?;
    }
    tournament.set_schedule(schedule)
}

/// Format, game mode, map rotation, entry fee and visibility from the create form.
fn configure_play(tournament: &mut Tournament, body: &CreateTournamentBody) -> Result<(), TournamentError> {
    tournament.set_format(body.format, body.duration_days)?;
    tournament.set_game_mode(body.game_mode)?;
    if let Some(maps) = &body.map_rotation {
        tournament.set_map_rotation(maps.as_slice())?;
    }
    tournament.set_entry_fee(body.entry_fee)?;
    tournament.set_visibility(body.is_public, body.allow_spectators)
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.tournaments.get(&path.id) {
        Some(t) => HttpResponse::Ok().json(t),
        None => no_tournament(),
    }
}

/// Draft -> RegistrationOpen.
#[post("/api/tournaments/{id}/registration/open")]
async fn api_open_registration(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, "registration opened", |t, _| t.open_registration())
}

/// RegistrationOpen -> Live.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, "started", |t, _| t.start())
}

/// Live -> Finished.
#[post("/api/tournaments/{id}/finish")]
async fn api_finish_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, "finished", |t, _| t.finish())
}

/// Set team capacity and group count; teams per group is recomputed.
#[put("/api/tournaments/{id}/groups")]
async fn api_set_groups(state: AppState, path: Path<TournamentPath>, body: Json<GroupsBody>) -> HttpResponse {
    update_tournament(&state, path.id, "groups configured", |t, _| {
        t.set_group_config(body.max_teams, body.group_count)
    })
}

/// Randomly split registered teams into groups.
#[post("/api/tournaments/{id}/groups/draw")]
async fn api_draw_groups(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, "groups drawn", |t, _| draw_tournament_groups(t))
}

/// Set prize pool and (optionally) shares per rank.
#[put("/api/tournaments/{id}/prize")]
async fn api_set_prize(state: AppState, path: Path<TournamentPath>, body: Json<PrizeBody>) -> HttpResponse {
    let body = body.into_inner();
    update_tournament(&state, path.id, "prize updated", move |t, _| {
        t.set_prize_pool(body.prize_pool)?;
        if let Some(policy) = body.prize_shares {
            t.set_prize_policy(policy)?;
        }
        Ok(())
    })
}

/// Add a scoring rule.
#[post("/api/tournaments/{id}/scoring-rules")]
async fn api_add_scoring_rule(state: AppState, path: Path<TournamentPath>, body: Json<ScoringRule>) -> HttpResponse {
    let rule = body.into_inner();
    update_tournament(&state, path.id, "scoring rule added", move |t, _| t.add_scoring_rule(rule))
}

/// Replace the scoring rule at a position.
#[put("/api/tournaments/{id}/scoring-rules/{position}")]
async fn api_update_scoring_rule(
    state: AppState,
    path: Path<TournamentRulePath>,
    body: Json<ScoringRule>,
) -> HttpResponse {
    let rule = body.into_inner();
    let position = path.position;
    update_tournament(&state, path.id, "scoring rule updated", move |t, _| {
        t.update_scoring_rule(position, rule)
    })
}

/// Remove the scoring rule at a position.
#[delete("/api/tournaments/{id}/scoring-rules/{position}")]
async fn api_remove_scoring_rule(state: AppState, path: Path<TournamentRulePath>) -> HttpResponse {
    let position = path.position;
    update_tournament(&state, path.id, "scoring rule removed", move |t, _| {
        t.remove_scoring_rule(position).map(|_| ())
    })
}

/// Register an existing team (RegistrationOpen only).
#[post("/api/tournaments/{id}/teams")]
async fn api_register_team(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RegisterTeamBody>,
) -> HttpResponse {
    let team_id = body.team_id;
    update_tournament(&state, path.id, "team registered", move |t, teams| {
        let team = teams.get(&team_id).ok_or(TournamentError::TeamNotFound(team_id))?;
        t.register_team(team)
    })
}

/// Withdraw a team's registration (RegistrationOpen only).
#[delete("/api/tournaments/{id}/teams/{team_id}")]
async fn api_unregister_team(state: AppState, path: Path<TournamentTeamPath>) -> HttpResponse {
    let team_id = path.team_id;
    update_tournament(&state, path.id, "team unregistered", move |t, _| t.unregister_team(team_id))
}

/// Create the next match (Live only).
#[post("/api/tournaments/{id}/matches")]
async fn api_create_match(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.tournaments.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    match create_match(t) {
        Ok(match_id) => {
            log::info!("Tournament {}: created match {}", path.id, match_id);
            HttpResponse::Ok().json(MatchCreated { match_id, tournament: &*t })
        }
        Err(e) => error_response(&e),
    }
}

/// Enter results for a pending match by hand.
#[put("/api/tournaments/{id}/matches/{match_id}/results")]
async fn api_record_results(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ResultsBody>,
) -> HttpResponse {
    let match_id = path.match_id;
    update_tournament(&state, path.id, "results recorded", |t, _| {
        record_match_results(t, match_id, &body.results)
    })
}

/// Extract results from an uploaded payload with the configured source, then record them.
#[post("/api/tournaments/{id}/matches/{match_id}/import")]
async fn api_import_results(
    state: AppState,
    importer: Data<Importer>,
    path: Path<TournamentMatchPath>,
    payload: Bytes,
) -> HttpResponse {
    let source = Arc::clone(&importer.source);
    let extracted = match tokio::task::spawn_blocking(move || source.extract(&payload)).await {
        Ok(Ok(rows)) => rows,
        Ok(Err(e)) => return error_response(&e),
        Err(e) => {
            log::error!("Result extraction task failed: {}", e);
            return HttpResponse::InternalServerError().body("extraction failed");
        }
    };
    log::info!("Extracted {} result(s) for match {}", extracted.len(), path.match_id);

    let match_id = path.match_id;
    let min_confidence = importer.min_confidence;
    let registered = match state.read() {
        Ok(g) => match g.tournaments.get(&path.id) {
            Some(t) => g.registered_teams(t),
            None => return no_tournament(),
        },
        Err(_) => return lock_error(),
    };
    update_tournament(&state, path.id, "results imported", |t, _| {
        let entries = resolve_extracted(&extracted, &registered, min_confidence)?;
        record_match_results(t, match_id, &entries)
    })
}

/// Lock in a match's results.
#[post("/api/tournaments/{id}/matches/{match_id}/complete")]
async fn api_complete_match(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    let match_id = path.match_id;
    update_tournament(&state, path.id, "match completed", |t, _| complete_match(t, match_id))
}

/// Current standings (recomputed on every request).
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.tournaments.get(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    match compute_standings(t) {
        Ok(standings) => {
            let view: Vec<StandingView> = standings
                .into_iter()
                .map(|standing| {
                    let team = g.teams.get(&standing.team_id);
                    StandingView {
                        team_name: team.map(|t| t.name.clone()).unwrap_or_default(),
                        team_tag: team.map(|t| t.tag.clone()).unwrap_or_default(),
                        standing,
                    }
                })
                .collect();
            HttpResponse::Ok().json(view)
        }
        Err(e) => error_response(&e),
    }
}

/// Standings as a CSV download.
#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.tournaments.get(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    let csv = compute_standings(t).and_then(|s| standings_to_csv(&s, &g.registered_teams(t)));
    match csv {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"standings-{}.csv\"", t.id),
            ))
            .body(body),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_min_confidence() -> f64 {
    0.5
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let min_confidence = match std::env::var("MIN_CONFIDENCE") {
        Ok(raw) => match raw.parse::<f64>() {
            Ok(c) if (0.0..=1.0).contains(&c) => c,
            _ => {
                log::warn!(
                    "MIN_CONFIDENCE={} is not a number in 0..=1, using {}",
                    raw,
                    default_min_confidence()
                );
                default_min_confidence()
            }
        },
        Err(_) => default_min_confidence(),
    };
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Importing results from CSV scoresheets (min confidence {})", min_confidence);

    let state = Data::new(RwLock::new(Store::default()));
    let importer = Data::new(Importer {
        source: Arc::new(CsvResultSource),
        min_confidence,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(importer.clone())
            .service(api_health)
            .service(api_list_teams)
            .service(api_create_team)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_get_tournament)
            .service(api_open_registration)
            .service(api_start_tournament)
            .service(api_finish_tournament)
            .service(api_set_groups)
            .service(api_draw_groups)
            .service(api_set_prize)
            .service(api_add_scoring_rule)
            .service(api_update_scoring_rule)
            .service(api_remove_scoring_rule)
            .service(api_register_team)
            .service(api_unregister_team)
            .service(api_create_match)
            .service(api_record_results)
            .service(api_import_results)
            .service(api_complete_match)
    })
    .bind(bind)?
    .run()
    .await
}
