//! JSON API and dashboard web module.

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::monitor::{FanReading, HistoryEntry, Monitor, TempStats, ZoneReading};
use thermwatch_sensors::{FanSensor, ThermalZone};

/// Dashboard page template.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate;

const STATUS_SUCCESS: &str = "success";

/// Response timestamp, generated at response time.
fn now_iso() -> String {
    Local::now().to_rfc3339()
}

#[derive(Serialize)]
struct TemperatureResponse {
    temperature: f64,
    timestamp: String,
    status: &'static str,
}

#[derive(Serialize)]
struct AllTemperaturesResponse {
    zones: HashMap<String, ZoneReading>,
    timestamp: String,
    status: &'static str,
}

#[derive(Serialize)]
struct StatsResponse {
    stats: TempStats,
    history_count: usize,
    timestamp: String,
    status: &'static str,
}

#[derive(Serialize)]
struct HistoryResponse {
    history: Vec<HistoryEntry>,
    timestamp: String,
    status: &'static str,
}

#[derive(Serialize)]
struct ZonesResponse {
    zones: Vec<ThermalZone>,
    count: usize,
    timestamp: String,
    status: &'static str,
}

#[derive(Serialize)]
struct FansResponse {
    fans: HashMap<String, FanReading>,
    timestamp: String,
    status: &'static str,
}

#[derive(Serialize)]
struct FanSensorsResponse {
    sensors: Vec<FanSensor>,
    count: usize,
    timestamp: String,
    status: &'static str,
}

/// Creates the web router with all routes.
pub fn create_router(monitor: Arc<Monitor>) -> Router {
    Router::new()
        // Dashboard
        .route("/", get(index))
        // JSON API
        .route("/api/temperature", get(temperature))
        .route("/api/all-temperatures", get(all_temperatures))
        .route("/api/stats", get(stats))
        .route("/api/history", get(history))
        .route("/api/zones", get(zones))
        .route("/api/fans", get(fans))
        .route("/api/fan-sensors", get(fan_sensors))
        .layer(CorsLayer::permissive())
        .with_state(monitor)
}

/// GET / - Dashboard page
async fn index() -> impl IntoResponse {
    Html(IndexTemplate.render().unwrap())
}

/// GET /api/temperature - Current CPU temperature
async fn temperature(State(monitor): State<Arc<Monitor>>) -> Json<TemperatureResponse> {
    Json(TemperatureResponse {
        temperature: monitor.stats().cpu_temp,
        timestamp: now_iso(),
        status: STATUS_SUCCESS,
    })
}

/// GET /api/all-temperatures - All zone readings from the current cycle
async fn all_temperatures(State(monitor): State<Arc<Monitor>>) -> Json<AllTemperaturesResponse> {
    Json(AllTemperaturesResponse {
        zones: monitor.current_temperatures(),
        timestamp: now_iso(),
        status: STATUS_SUCCESS,
    })
}

/// GET /api/stats - Rolling temperature statistics
async fn stats(State(monitor): State<Arc<Monitor>>) -> Json<StatsResponse> {
    let (stats, history_count) = monitor.stats_snapshot();
    Json(StatsResponse {
        stats,
        history_count,
        timestamp: now_iso(),
        status: STATUS_SUCCESS,
    })
}

/// GET /api/history - CPU temperature history, oldest first
async fn history(State(monitor): State<Arc<Monitor>>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: monitor.history(),
        timestamp: now_iso(),
        status: STATUS_SUCCESS,
    })
}

/// GET /api/zones - Discovered thermal zones
async fn zones(State(monitor): State<Arc<Monitor>>) -> Json<ZonesResponse> {
    let zones = monitor.zones().to_vec();
    Json(ZonesResponse {
        count: zones.len(),
        zones,
        timestamp: now_iso(),
        status: STATUS_SUCCESS,
    })
}

/// GET /api/fans - Fan readings from the current cycle
async fn fans(State(monitor): State<Arc<Monitor>>) -> Json<FansResponse> {
    Json(FansResponse {
        fans: monitor.current_fans(),
        timestamp: now_iso(),
        status: STATUS_SUCCESS,
    })
}

/// GET /api/fan-sensors - Discovered fan sensors
async fn fan_sensors(State(monitor): State<Arc<Monitor>>) -> Json<FanSensorsResponse> {
    let sensors = monitor.fan_sensors().to_vec();
    Json(FanSensorsResponse {
        count: sensors.len(),
        sensors,
        timestamp: now_iso(),
        status: STATUS_SUCCESS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use thermwatch_sensors::{fan, thermal};
    use tower::ServiceExt;

    fn fixture_monitor(root: &Path) -> Arc<Monitor> {
        let thermal_root = root.join("thermal");
        let zone_dir = thermal_root.join("thermal_zone0");
        fs::create_dir_all(&zone_dir).unwrap();
        fs::write(zone_dir.join("temp"), "47000\n").unwrap();
        fs::write(zone_dir.join("type"), "x86_pkg_temp\n").unwrap();

        let hwmon_root = root.join("hwmon");
        let hwmon_dir = hwmon_root.join("hwmon0");
        fs::create_dir_all(&hwmon_dir).unwrap();
        fs::write(hwmon_dir.join("name"), "nct6775\n").unwrap();
        fs::write(hwmon_dir.join("fan1_input"), "1200\n").unwrap();

        let monitor = Arc::new(Monitor::new(
            thermal::discover_zones_in(&thermal_root),
            fan::discover_fans_in(&hwmon_root),
        ));
        monitor.poll_cycle();
        monitor
    }

    async fn get_json(router: Router, uri: &str) -> serde_json::Value {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_temperature_endpoint() {
        let dir = TempDir::new().unwrap();
        let router = create_router(fixture_monitor(dir.path()));

        let body = get_json(router, "/api/temperature").await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["temperature"], 47.0);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let dir = TempDir::new().unwrap();
        let router = create_router(fixture_monitor(dir.path()));

        let body = get_json(router, "/api/stats").await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["history_count"], 1);
        assert_eq!(body["stats"]["cpu_temp"], 47.0);
        assert_eq!(body["stats"]["avg_temp"], 47.0);
    }

    #[tokio::test]
    async fn test_all_temperatures_endpoint() {
        let dir = TempDir::new().unwrap();
        let router = create_router(fixture_monitor(dir.path()));

        let body = get_json(router, "/api/all-temperatures").await;
        assert_eq!(body["zones"]["0"]["temperature"], 47.0);
        assert_eq!(body["zones"]["0"]["type"], "x86_pkg_temp");
    }

    #[tokio::test]
    async fn test_history_endpoint() {
        let dir = TempDir::new().unwrap();
        let router = create_router(fixture_monitor(dir.path()));

        let body = get_json(router, "/api/history").await;
        let history = body["history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["temperature"], 47.0);
        assert!(history[0]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_zones_endpoint() {
        let dir = TempDir::new().unwrap();
        let router = create_router(fixture_monitor(dir.path()));

        let body = get_json(router, "/api/zones").await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["zones"][0]["id"], "0");
        assert_eq!(body["zones"][0]["type"], "x86_pkg_temp");
    }

    #[tokio::test]
    async fn test_fan_endpoints() {
        let dir = TempDir::new().unwrap();
        let monitor = fixture_monitor(dir.path());

        let body = get_json(create_router(monitor.clone()), "/api/fans").await;
        assert_eq!(body["fans"]["nct6775_1"]["speed"], 1200);

        let body = get_json(create_router(monitor), "/api/fan-sensors").await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["sensors"][0]["id"], "nct6775_1");
        assert_eq!(body["sensors"][0]["label"], "Fan 1");
    }

    #[tokio::test]
    async fn test_empty_monitor_returns_empty_structures() {
        let monitor = Arc::new(Monitor::new(vec![], vec![]));

        let body = get_json(create_router(monitor.clone()), "/api/stats").await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["history_count"], 0);
        assert_eq!(body["stats"]["cpu_temp"], 0.0);

        let body = get_json(create_router(monitor), "/api/zones").await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_dashboard_page_renders() {
        let monitor = Arc::new(Monitor::new(vec![], vec![]));
        let response = create_router(monitor)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
