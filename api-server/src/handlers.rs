use actix_web::{
    error::{InternalError, QueryPayloadError},
    http::{Method, StatusCode},
    web::{Bytes, Data, Query},
    HttpRequest, HttpResponse, Responder,
};
use serde_json::Value;

use crate::config::AppState;
use crate::response::{
    json_error, json_ok, BAD_JSON, BAD_PAYLOAD, INTERNAL_ERROR, NOT_FOUND, PAYLOAD_TOO_LARGE,
};
use crate::types::{NewScore, ScoresQuery};

pub(crate) async fn health() -> impl Responder {
    json_ok(StatusCode::OK)
}

pub(crate) async fn list_scores(state: Data<AppState>, query: Query<ScoresQuery>) -> HttpResponse {
    let game = query.game();
    let limit = query.limit(state.default_limit);
    let store = state.store.clone();

    let lookup_game = game.clone();
    match tokio::task::spawn_blocking(move || store.top(&lookup_game, limit)).await {
        Ok(Ok(rows)) => HttpResponse::Ok().json(rows),
        Ok(Err(e)) => {
            tracing::error!(game = %game, limit, "list_scores failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
        Err(e) => {
            tracing::error!(game = %game, "list_scores worker failure: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
    }
}

/// Query strings serde cannot read (a repeated key, bad percent-encoding).
pub(crate) fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(query = req.query_string(), "rejected query: {err}");
    InternalError::from_response(err, json_error(StatusCode::BAD_REQUEST, BAD_PAYLOAD)).into()
}

pub(crate) async fn submit_score(
    state: Data<AppState>,
    body: Result<Bytes, actix_web::Error>,
) -> HttpResponse {
    let body = match body {
        Ok(body) => body,
        Err(e) if e.as_response_error().status_code() == StatusCode::PAYLOAD_TOO_LARGE => {
            return json_error(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE);
        }
        Err(e) => {
            tracing::debug!("unreadable body: {e}");
            return json_error(StatusCode::BAD_REQUEST, BAD_JSON);
        }
    };
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, BAD_JSON),
    };
    let score = match NewScore::from_json(&payload) {
        Ok(score) => score,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, e.message()),
    };

    let store = state.store.clone();
    let accepted = score.clone();
    match tokio::task::spawn_blocking(move || store.insert(&accepted)).await {
        Ok(Ok(())) => {
            tracing::info!(
                game = %score.game,
                player = %score.player,
                score = score.score,
                "score accepted"
            );
            json_ok(StatusCode::CREATED)
        }
        Ok(Err(e)) => {
            tracing::error!(game = %score.game, "submit_score failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
        Err(e) => {
            tracing::error!(game = %score.game, "submit_score worker failure: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
    }
}

/// Fallback for unmatched routes. Bare `OPTIONS` requests that the CORS layer
/// did not answer get an empty 204.
pub(crate) async fn not_found(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return HttpResponse::NoContent().finish();
    }
    json_error(StatusCode::NOT_FOUND, NOT_FOUND)
}
