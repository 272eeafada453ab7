use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        OnceLock,
    },
    time::{Instant, SystemTime, UNIX_EPOCH},
};
use tower_http::services::{ServeDir, ServeFile};

use crate::config::{non_empty, parse_u64_with_bounds};
use crate::telemetry::{log_event, set_min_level, LogLevel, DEFAULT_LOG_LEVEL};

const DEFAULT_PORT: u64 = 8080;
const DEFAULT_STATIC_DIR: &str = "dist";
const PORT_BOUNDS: (u64, u64) = (1, 65_535);
const REQUEST_ID_HEADER: &str = "x-request-id";

const NO_CACHE: &str = "no-cache";
const IMMUTABLE: &str = "public, max-age=31536000, immutable";
const SHORT_LIVED: &str = "public, max-age=3600";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
static STARTED_AT: OnceLock<Instant> = OnceLock::new();

#[derive(Clone, Debug, PartialEq)]
struct ServerConfig {
    port: u16,
    static_dir: PathBuf,
    log_level: LogLevel,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = parse_u64_with_bounds(lookup("PORT").as_deref(), DEFAULT_PORT, PORT_BOUNDS);
        let static_dir = non_empty(lookup("STATIC_DIR").as_deref())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));
        let log_level = lookup("LOG_LEVEL")
            .as_deref()
            .and_then(LogLevel::parse)
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            port: u16::try_from(port).unwrap_or(DEFAULT_PORT as u16),
            static_dir,
            log_level,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthPayload {
    ok: bool,
    service: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    mark_started();
    let config = ServerConfig::from_env();
    set_min_level(config.log_level);

    if !config.static_dir.join("index.html").is_file() {
        log_event(
            LogLevel::Warn,
            "static_index_missing",
            serde_json::json!({
                "static_dir": config.static_dir.display().to_string(),
                "hint": "run `trunk build --release` first",
            }),
        );
    }

    let app = build_router(&config);
    let bind_address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    log_event(
        LogLevel::Info,
        "server_listening",
        serde_json::json!({
            "url": format!("http://127.0.0.1:{}", config.port),
            "static_dir": config.static_dir.display().to_string(),
        }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(config: &ServerConfig) -> Router {
    let index = config.static_dir.join("index.html");
    let static_service = ServeDir::new(&config.static_dir).not_found_service(ServeFile::new(index));

    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(static_service)
        .layer(middleware::from_fn(observe_request))
}

async fn healthz() -> Json<HealthPayload> {
    Json(HealthPayload {
        ok: true,
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime_seconds(),
    })
}

/// Stamps a request id and cache policy on every response and logs it.
async fn observe_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let request_id = resolve_request_id(request.headers().get(REQUEST_ID_HEADER));
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await.into_response();
    let headers = response.headers_mut();
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_policy(&path)));
    }
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }

    let status = response.status();
    log_event(
        if status.is_server_error() {
            LogLevel::Warn
        } else {
            LogLevel::Debug
        },
        "request",
        serde_json::json!({
            "request_id": request_id,
            "method": method.as_str(),
            "path": path,
            "status": status.as_u16(),
            "elapsed_ms": started_at.elapsed().as_millis() as u64,
        }),
    );

    response
}

/// Trunk fingerprints the wasm, js and css it emits, so those can be cached
/// forever. Documents must revalidate so a deploy is picked up.
fn cache_policy(path: &str) -> &'static str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let extension = file_name.rsplit_once('.').map(|(_, extension)| extension);
    match extension {
        _ if path == "/healthz" => NO_CACHE,
        Some("html") | None => NO_CACHE,
        Some("wasm" | "js" | "css") => IMMUTABLE,
        Some(_) => SHORT_LIVED,
    }
}

fn resolve_request_id(header: Option<&HeaderValue>) -> String {
    header
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(generate_request_id)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0);
    format!("req-{millis}-{counter}")
}

fn mark_started() -> Instant {
    *STARTED_AT.get_or_init(Instant::now)
}

fn uptime_seconds() -> u64 {
    mark_started().elapsed().as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, PathBuf::from("dist"));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("STATIC_DIR", " public "),
            ("LOG_LEVEL", "debug"),
        ]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn invalid_port_falls_back() {
        assert_eq!(config_from(&[("PORT", "0")]).port, 8080);
        assert_eq!(config_from(&[("PORT", "70000")]).port, 8080);
        assert_eq!(config_from(&[("PORT", "http")]).port, 8080);
    }

    #[test]
    fn unknown_log_level_falls_back() {
        assert_eq!(config_from(&[("LOG_LEVEL", "loud")]).log_level, LogLevel::Info);
    }

    #[test]
    fn cache_policy_by_path() {
        assert_eq!(cache_policy("/"), NO_CACHE);
        assert_eq!(cache_policy("/index.html"), NO_CACHE);
        assert_eq!(cache_policy("/healthz"), NO_CACHE);
        assert_eq!(cache_policy("/projects"), NO_CACHE);
        assert_eq!(cache_policy("/arnav-portfolio-3f2a_bg.wasm"), IMMUTABLE);
        assert_eq!(cache_policy("/arnav-portfolio-3f2a.js"), IMMUTABLE);
        assert_eq!(cache_policy("/styles-91ab.css"), IMMUTABLE);
        assert_eq!(cache_policy("/assets/arnav.jpg"), SHORT_LIVED);
    }

    #[test]
    fn dotted_directories_do_not_count_as_extensions() {
        assert_eq!(cache_policy("/releases/v1.2/notes"), NO_CACHE);
        assert_eq!(cache_policy("/releases/v1.2/"), NO_CACHE);
        assert_eq!(cache_policy("/releases/v1.2/app.js"), IMMUTABLE);
    }

    #[test]
    fn uptime_counts_from_server_start() {
        mark_started();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(uptime_seconds() >= 1);
    }

    #[test]
    fn request_id_prefers_incoming_header() {
        let header = HeaderValue::from_static("  abc-123 ");
        assert_eq!(resolve_request_id(Some(&header)), "abc-123");

        let blank = HeaderValue::from_static("   ");
        assert!(resolve_request_id(Some(&blank)).starts_with("req-"));
        assert!(resolve_request_id(None).starts_with("req-"));
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let Json(payload) = healthz().await;
        assert!(payload.ok);
        assert_eq!(payload.service, "arnav-portfolio");
        assert!(!payload.version.is_empty());
    }

    #[test]
    fn router_builds_for_missing_static_dir() {
        let config = config_from(&[("STATIC_DIR", "/nonexistent/portfolio-dist")]);
        let _router = build_router(&config);
    }
}
