//! Single binary web server: REST API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use beach_tennis_web::{
    add_point, compute_standings, finish_match, generate_group_matches, promote_group_winners,
    start_match, toggle_serve, FinishedResult, InMemoryMatchStore, MatchId, MatchKind, MatchPatch,
    MatchStatus, MatchStore, PlayerId, PointOutcome, Side, Tournament, TournamentError,
    TournamentId, TournamentSettings, TournamentStatus,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory app state: tournaments by id plus the match store.
struct AppData {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
    store: InMemoryMatchStore,
}

type AppState = Data<AppData>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    date: NaiveDate,
    #[serde(default)]
    kind: MatchKind,
    #[serde(default)]
    settings: TournamentSettings,
}

#[derive(Deserialize)]
struct AddAthleteBody {
    name: String,
    category: String,
}

#[derive(Deserialize)]
struct GenerateGroupsBody {
    category: String,
}

#[derive(Deserialize)]
struct PromoteBody {
    category: String,
    qualifiers_per_group: usize,
}

#[derive(Deserialize)]
struct AddPointBody {
    side: Side,
}

#[derive(Deserialize)]
struct StandingsQuery {
    category: String,
    group: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and athlete id.
#[derive(Deserialize)]
struct TournamentAthletePath {
    id: TournamentId,
    athlete_id: PlayerId,
}

/// Path segment: match id (e.g. /api/matches/{id}/point)
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::MatchNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn no_match() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No match" }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "beach-tennis-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new tournament (returns it with id; clients store the id for
/// subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let tournament = Tournament::new(body.name.trim(), body.date, body.kind, body.settings);
    let id = tournament.id;
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(id, tournament);
    HttpResponse::Ok().json(&g[&id])
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.tournaments.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(&path.id) {
        Some(t) => HttpResponse::Ok().json(t),
        None => no_tournament(),
    }
}

/// Delete a tournament and everything keyed by it (matches, results).
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    if g.remove(&path.id).is_none() {
        return no_tournament();
    }
    drop(g);
    match state.store.delete_tournament_data(path.id) {
        Ok(()) => {
            log::info!("Deleted tournament {} and its matches", path.id);
            HttpResponse::Ok().json(serde_json::json!({ "deleted": path.id }))
        }
        Err(e) => error_response(e),
    }
}

/// Register an athlete in a tournament.
#[post("/api/tournaments/{id}/athletes")]
async fn api_add_athlete(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddAthleteBody>,
) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    match t.add_athlete(body.name.as_str(), body.category.as_str()) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

/// Remove an athlete from the roster.
#[delete("/api/tournaments/{id}/athletes/{athlete_id}")]
async fn api_remove_athlete(state: AppState, path: Path<TournamentAthletePath>) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    match t.remove_athlete(path.athlete_id) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

/// Bulk import athletes from CSV rows of `name,category` (no header).
/// Bad rows and duplicates are skipped, not fatal.
#[post("/api/tournaments/{id}/athletes/import")]
async fn api_import_athletes(
    state: AppState,
    path: Path<TournamentPath>,
    body: String,
) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());
    let mut imported = 0usize;
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        match (record.get(0), record.get(1)) {
            (Some(name), Some(category)) => match t.add_athlete(name, category) {
                Ok(_) => imported += 1,
                Err(_) => skipped += 1,
            },
            _ => skipped += 1,
        }
    }
    log::info!(
        "Imported {} athlete(s) ({} skipped) into tournament {}",
        imported,
        skipped,
        t.id
    );
    HttpResponse::Ok().json(serde_json::json!({ "imported": imported, "skipped": skipped }))
}

/// Generate the group phase for one category; marks the tournament
/// active on success.
#[post("/api/tournaments/{id}/groups/generate")]
async fn api_generate_groups(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<GenerateGroupsBody>,
) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    let athletes = t.athletes_in_category(&body.category);
    match generate_group_matches(
        &state.store,
        t.id,
        &athletes,
        t.kind,
        &mut rand::thread_rng(),
    ) {
        Ok(labels) => {
            t.status = TournamentStatus::Active;
            log::info!(
                "Generated {} group(s) for category {} in tournament {}",
                labels.len(),
                body.category,
                t.id
            );
            HttpResponse::Ok().json(serde_json::json!({ "groups": labels }))
        }
        Err(e) => error_response(e),
    }
}

/// All matches of a tournament, in creation order.
#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.matches_by_tournament(path.id) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(e),
    }
}

/// Current standings for one group of a category, computed on demand.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<StandingsQuery>,
) -> HttpResponse {
    let matches = match state.store.matches_by_tournament(path.id) {
        Ok(matches) => matches,
        Err(e) => return error_response(e),
    };
    let category_matches: Vec<_> = matches
        .into_iter()
        .filter(|m| m.category == query.category)
        .collect();
    HttpResponse::Ok().json(compute_standings(&query.group, &category_matches))
}

/// Promote the top group finishers of a category into a bracket.
#[post("/api/tournaments/{id}/promote")]
async fn api_promote(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<PromoteBody>,
) -> HttpResponse {
    if !(1..=2).contains(&body.qualifiers_per_group) {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "qualifiers_per_group must be 1 or 2" }));
    }
    match promote_group_winners(
        &state.store,
        path.id,
        &body.category,
        body.qualifiers_per_group,
    ) {
        Ok(final_id) => {
            log::info!(
                "Promoted group winners for category {} in tournament {} (final {})",
                body.category,
                path.id,
                final_id
            );
            HttpResponse::Ok().json(serde_json::json!({ "final_match_id": final_id }))
        }
        Err(e) => error_response(e),
    }
}

/// Finished-results feed for a tournament, newest first.
#[get("/api/tournaments/{id}/results")]
async fn api_results(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.results_by_tournament(path.id))
}

/// Move a planned match to ongoing.
#[post("/api/matches/{id}/start")]
async fn api_start_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let m = match state.store.match_by_id(path.id) {
        Some(m) => m,
        None => return no_match(),
    };
    match start_match(&state.store, &m) {
        Ok(()) => match state.store.match_by_id(path.id) {
            Some(fresh) => HttpResponse::Ok().json(fresh),
            None => no_match(),
        },
        Err(e) => error_response(e),
    }
}

/// Referee scoring: award one point. When the game win reaches the
/// tournament's games-per-set target, the match is finished and the
/// winner advanced into the next bracket match.
#[post("/api/matches/{id}/point")]
async fn api_add_point(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<AddPointBody>,
) -> HttpResponse {
    let mut m = match state.store.match_by_id(path.id) {
        Some(m) => m,
        None => return no_match(),
    };
    let settings = {
        let g = match state.tournaments.read() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        g.get(&m.tournament_id)
            .map(|t| t.settings)
            .unwrap_or_default()
    };

    let outcome = add_point(&mut m, body.side, &settings);
    if outcome == PointOutcome::Ignored {
        return HttpResponse::Ok().json(m);
    }
    if let Err(e) = state.store.update_match(m.id, MatchPatch::score_of(&m)) {
        return error_response(e);
    }

    let target_reached = m.sets_a >= settings.games_per_set || m.sets_b >= settings.games_per_set;
    if outcome == PointOutcome::GameWon && target_reached {
        if let Err(e) = finish_match(&state.store, &m) {
            return error_response(e);
        }
        if let Some(finished) = state.store.match_by_id(m.id) {
            state
                .store
                .record_result(FinishedResult::from_match(&finished));
            log::info!(
                "Match {} finished {}-{}",
                finished.id,
                finished.sets_a,
                finished.sets_b
            );
        }
    }

    match state.store.match_by_id(path.id) {
        Some(fresh) => HttpResponse::Ok().json(fresh),
        None => no_match(),
    }
}

/// Flip the serving side (referee correction).
#[post("/api/matches/{id}/serve")]
async fn api_toggle_serve(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let mut m = match state.store.match_by_id(path.id) {
        Some(m) => m,
        None => return no_match(),
    };
    toggle_serve(&mut m);
    let patch = MatchPatch {
        serving: Some(m.serving),
        ..MatchPatch::default()
    };
    match state.store.update_match(m.id, patch) {
        Ok(()) => HttpResponse::Ok().json(m),
        Err(e) => error_response(e),
    }
}

/// Remove a match from the store.
#[delete("/api/matches/{id}")]
async fn api_delete_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match state.store.delete_match(path.id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "deleted": path.id })),
        Err(e) => error_response(e),
    }
}

/// Finish a match explicitly (e.g. retirement with the score as it
/// stands). Requires a strict sets winner; advances bracket winners.
#[post("/api/matches/{id}/finish")]
async fn api_finish_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let m = match state.store.match_by_id(path.id) {
        Some(m) => m,
        None => return no_match(),
    };
    let already_finished = m.status == MatchStatus::Finished;
    if let Err(e) = finish_match(&state.store, &m) {
        return error_response(e);
    }
    let fresh = match state.store.match_by_id(path.id) {
        Some(fresh) => fresh,
        None => return no_match(),
    };
    if !already_finished {
        state.store.record_result(FinishedResult::from_match(&fresh));
        log::info!("Match {} finished {}-{}", fresh.id, fresh.sets_a, fresh.sets_b);
    }
    HttpResponse::Ok().json(fresh)
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
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppData {
        tournaments: RwLock::new(HashMap::new()),
        store: InMemoryMatchStore::new(),
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_add_athlete)
            .service(api_remove_athlete)
            .service(api_import_athletes)
            .service(api_generate_groups)
            .service(api_list_matches)
            .service(api_standings)
            .service(api_promote)
            .service(api_results)
            .service(api_start_match)
            .service(api_add_point)
            .service(api_toggle_serve)
            .service(api_delete_match)
            .service(api_finish_match)
    })
    .bind(bind)?
    .run()
    .await
}
