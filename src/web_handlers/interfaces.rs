use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse, ResponseError};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ConvertError;
use crate::interfaces::{convert_content, fetch_and_convert, ConversionResult};
use crate::models::AppState;
use crate::utils::http::fetch_document;

/// Query parameters for `GET /api/convert`
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ConvertQuery {
    /// Clash configuration URL to fetch
    pub source_url: Option<String>,
    /// `clash`, `v2ray` or `shadowrocket`
    pub target_format: Option<String>,
}

/// Body of `POST /api/convert`
#[derive(Deserialize, Debug, Clone)]
pub struct ConvertContentRequest {
    /// Clash configuration text
    pub content: String,
    pub target_format: String,
}

/// Query parameters for `GET /api/fetch-yaml`
#[derive(Deserialize, Debug, Default, Clone)]
pub struct FetchQuery {
    pub url: Option<String>,
}

#[derive(Serialize, Debug)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    remedy: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ResponseError for ConvertError {
    fn status_code(&self) -> StatusCode {
        match self {
            ConvertError::MalformedDocument(_)
            | ConvertError::MissingProxies
            | ConvertError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            ConvertError::UpstreamFetchFailed(_) => StatusCode::BAD_GATEWAY,
            ConvertError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let remedy = self.remedy();
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.kind().as_str(),
            message: self.to_string(),
            remedy: Some(remedy.as_str()),
            details: Some(remedy.hint()),
        })
    }
}

fn missing_parameter(name: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorBody {
        error: "missing_parameter",
        message: format!("Missing parameter {}", name),
        remedy: None,
        details: None,
    })
}

fn failure_response(err: ConvertError) -> HttpResponse {
    error!("Conversion error: {}", err);
    err.error_response()
}

fn conversion_response(result: ConversionResult, state: &AppState) -> HttpResponse {
    let mut resp = HttpResponse::Ok();
    resp.content_type(result.target.content_type());
    if let Some(filename) = result.target.filename() {
        resp.insert_header((
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", filename),
        ));
    }
    let userinfo = result
        .subscription_userinfo
        .unwrap_or_else(|| state.config.subscription_userinfo.clone());
    resp.insert_header(("Subscription-Userinfo", userinfo));
    resp.body(result.content)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Handler for fetching a remote configuration and converting it
pub async fn convert_handler(
    query: web::Query<ConvertQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    debug!("Received convert request: {:?}", query);
    let Some(source_url) = non_blank(&query.source_url) else {
        return missing_parameter("source_url");
    };
    let Some(target_format) = non_blank(&query.target_format) else {
        return missing_parameter("target_format");
    };

    match fetch_and_convert(source_url, target_format, &state.fetch).await {
        Ok(result) => conversion_response(result, &state),
        Err(e) => failure_response(e),
    }
}

/// Handler for converting configuration text supplied by the client
pub async fn convert_content_handler(
    body: web::Json<ConvertContentRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    debug!(
        "Received {} bytes to convert to {}",
        body.content.len(),
        body.target_format
    );
    match convert_content(&body.content, body.target_format.trim()) {
        Ok(result) => conversion_response(result, &state),
        Err(e) => failure_response(e),
    }
}

/// Handler relaying a remote configuration as plain text, for browsers blocked by CORS
pub async fn fetch_yaml_handler(
    query: web::Query<FetchQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let Some(url) = non_blank(&query.url) else {
        return missing_parameter("url");
    };

    match fetch_document(url, &state.fetch).await {
        Ok(fetched) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(fetched.body),
        Err(e) => failure_response(e),
    }
}

pub async fn health_handler() -> HttpResponse {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Register the API endpoints with Actix Web
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/convert", web::get().to(convert_handler))
            .route("/convert", web::post().to(convert_content_handler))
            .route("/fetch-yaml", web::get().to(fetch_yaml_handler))
            .route("/health", web::get().to(health_handler)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use actix_web::{body::to_bytes, test, App};

    fn app_state() -> web::Data<AppState> {
        web::Data::new(AppState::new(Settings::default()))
    }

    #[actix_web::test]
    async fn test_missing_source_url() {
        let app = test::init_service(App::new().app_data(app_state()).configure(config)).await;
        let req = test::TestRequest::get()
            .uri("/api/convert?target_format=clash")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "missing_parameter");
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().app_data(app_state()).configure(config)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn test_error_response_shape() {
        let resp = ConvertError::MissingProxies.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "missing_proxies");
        assert_eq!(body["remedy"], "fix_input");
    }
}
