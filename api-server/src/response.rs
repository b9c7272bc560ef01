use actix_web::{
    dev::ServiceResponse,
    http::{header, StatusCode},
    middleware::{ErrorHandlerResponse, ErrorHandlers},
    HttpResponse,
};

pub const BAD_JSON: &str = "bad json";
pub const BAD_PAYLOAD: &str = "bad payload";
pub const BAD_REQUEST: &str = "bad request";
pub const SCORE_OUT_OF_RANGE: &str = "score out of range";
pub const PAYLOAD_TOO_LARGE: &str = "payload too large";
pub const NOT_FOUND: &str = "not found";
pub const INTERNAL_ERROR: &str = "internal error";

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": message.into(),
    }))
}

pub fn json_ok(status: StatusCode) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({ "ok": true }))
}

/// Rewrites 400s produced outside the handlers (the CORS layer rejecting an
/// origin) into `{"error":"bad request"}`. Wrap it outside the CORS layer.
pub fn json_fallback<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::BAD_REQUEST, plain_error_to_json)
}

fn plain_error_to_json<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let status = res.status();
    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, json_error(status, BAD_REQUEST)).map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}
