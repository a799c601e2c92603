//! Liveness and readiness probes
//!
//! `/health` and `/live` only prove the process answers. `/ready` asks the
//! catalog for its entries and reports what the loaded classifier serves;
//! the classifier itself cannot be unready since startup refuses to bind
//! without it.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;

use super::state::AppState;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Healthy,
    Unhealthy,
}

impl ProbeStatus {
    fn from_components(components: &[ComponentReport]) -> Self {
        if components.iter().all(|c| c.status == ProbeStatus::Healthy) {
            ProbeStatus::Healthy
        } else {
            ProbeStatus::Unhealthy
        }
    }

    fn status_code(self) -> StatusCode {
        match self {
            ProbeStatus::Healthy => StatusCode::OK,
            ProbeStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub status: ProbeStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentReport>,
}

#[derive(Debug, Serialize)]
pub struct ComponentReport {
    pub name: &'static str,
    pub status: ProbeStatus,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl ComponentReport {
    fn healthy(name: &'static str, detail: String) -> Self {
        Self {
            name,
            status: ProbeStatus::Healthy,
            detail,
            latency_ms: None,
        }
    }

    fn unhealthy(name: &'static str, detail: String) -> Self {
        Self {
            name,
            status: ProbeStatus::Unhealthy,
            detail,
            latency_ms: None,
        }
    }

    fn timed(mut self, start: Instant) -> Self {
        self.latency_ms = Some(start.elapsed().as_millis() as u64);
        self
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(ProbeResponse {
        status: ProbeStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
        components: Vec::new(),
    })
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /ready
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let components = vec![catalog_report(&state).await, classifier_report(&state)];
    let status = ProbeStatus::from_components(&components);

    (
        status.status_code(),
        Json(ProbeResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            components,
        }),
    )
}

async fn catalog_report(state: &AppState) -> ComponentReport {
    let start = Instant::now();

    let report = match state.catalog.list_all().await {
        Ok(fruits) => ComponentReport::healthy("catalog", format!("{} fruits", fruits.len())),
        Err(e) => ComponentReport::unhealthy("catalog", e.to_string()),
    };

    report.timed(start)
}

fn classifier_report(state: &AppState) -> ComponentReport {
    let service = &state.prediction_service;

    ComponentReport::healthy(
        "classifier",
        format!(
            "contract {}, {} labels, input {}",
            service.contract_version(),
            service.labels().len(),
            service.input_shape()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_unhealthy_component_fails_readiness() {
        let components = vec![
            ComponentReport::healthy("classifier", "ok".to_string()),
            ComponentReport::unhealthy("catalog", "Connection refused".to_string()),
        ];

        let status = ProbeStatus::from_components(&components);

        assert_eq!(status, ProbeStatus::Unhealthy);
        assert_eq!(status.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_liveness_body_has_no_components() {
        let response = ProbeResponse {
            status: ProbeStatus::Healthy,
            version: "1.0.0",
            components: Vec::new(),
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "healthy");
        assert!(json.get("components").is_none());
    }

    #[test]
    fn test_timed_report_records_latency() {
        let report = ComponentReport::healthy("catalog", "10 fruits".to_string())
            .timed(Instant::now());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["latency_ms"].is_u64());
        assert_eq!(json["detail"], "10 fruits");
    }
}
